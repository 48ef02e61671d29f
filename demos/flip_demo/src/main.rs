use std::rc::Rc;

use anyhow::Context;
use flipdeck_core::*;
use flipdeck_ui::*;
use serde::Deserialize;
use web_time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);
const MAX_FRAMES: usize = 1_000;

/// Used when no script path is given: a tap, a committed drag back to the
/// front, a short drag that snaps back, then a scroll through the carousel.
const BUILTIN_SCRIPT: &str = r#"{
  "steps": [
    { "op": "down", "x": 150, "y": 200, "at_ms": 0 },
    { "op": "up", "x": 150, "y": 200, "at_ms": 80 },
    { "op": "settle" },
    { "op": "down", "x": 200, "y": 200, "at_ms": 1000 },
    { "op": "move", "x": 170, "y": 202, "at_ms": 1016 },
    { "op": "move", "x": 120, "y": 204, "at_ms": 1050 },
    { "op": "up", "x": 110, "y": 204, "at_ms": 1080 },
    { "op": "settle" },
    { "op": "down", "x": 100, "y": 200, "at_ms": 2000 },
    { "op": "move", "x": 130, "y": 200, "at_ms": 2100 },
    { "op": "up", "x": 130, "y": 200, "at_ms": 2300 },
    { "op": "settle" },
    { "op": "scroll", "y": 300 },
    { "op": "scroll", "y": 520 },
    { "op": "release" },
    { "op": "settle" }
  ]
}"#;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Down { x: f32, y: f32, at_ms: u64 },
    Move { x: f32, y: f32, at_ms: u64 },
    Up { x: f32, y: f32, at_ms: u64 },
    Cancel { at_ms: u64 },
    /// Runs frames until nothing is animating.
    Settle,
    Scroll { y: f32 },
    /// Lets go of the carousel so it snaps to a page.
    Release,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Script {
    config: FlipConfig,
    card_width: f32,
    card_height: f32,
    pages: usize,
    page_size: f32,
    variant: ShowcaseVariant,
    appearance: Appearance,
    platform: Platform,
    steps: Vec<Step>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            config: FlipConfig::default(),
            card_width: 300.0,
            card_height: 420.0,
            pages: 3,
            page_size: 800.0,
            variant: ShowcaseVariant::Standard,
            appearance: Appearance::Dark,
            platform: Platform::Ios,
            steps: Vec::new(),
        }
    }
}

fn load_script() -> anyhow::Result<Script> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text =
                std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
        }
        None => serde_json::from_str(BUILTIN_SCRIPT).context("parsing built-in script"),
    }
}

fn log_card(card: &FlipCard<&str>) {
    let styles = card.face_styles();
    log::info!(
        "{:?} rot={:.1} front(op={:.2}, visible={}) back(op={:.2}, visible={})",
        card.phase(),
        card.rotation(),
        styles.front.opacity,
        styles.front.backface_visible,
        styles.back.opacity,
        styles.back.backface_visible,
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let script = load_script()?;

    // Frames are simulated, so the animation clock is driven by hand.
    let clock = TestClock::new(Instant::now());
    set_clock(Box::new(clock.clone()));

    let (haptics, pulses) = HapticChannel::new();
    let buzzer = std::thread::spawn(move || {
        let mut count = 0usize;
        for style in pulses {
            count += 1;
            log::info!("haptic #{count}: {style:?}");
        }
        count
    });

    {
        let card = FlipCard::with_config(
            FlipCardProps::new("front", "back")
                .width(Dimension::Points(script.card_width))
                .height(Dimension::Points(script.card_height)),
            script.config,
            Rc::new(haptics.clone()),
        )?;
        let carousel = Carousel::new(script.pages, script.page_size, Rc::new(haptics))?;

        card.state().subscribe(|s| {
            log::trace!("state: rotation={:.2} flipped={}", s.rotation(), s.is_flipped())
        });

        let size = card.size(Size {
            width: script.card_width,
            height: script.card_height,
        });
        log::info!("card {}x{}", size.width, size.height);
        log_card(&card);

        for step in &script.steps {
            log::debug!("step {step:?}");
            let pointer = |event, x, y, at_ms| {
                PointerEvent::touch(event, Vec2::new(x, y), Duration::from_millis(at_ms))
            };
            let outcomes = match *step {
                Step::Down { x, y, at_ms } => card.handle_pointer(&pointer(
                    PointerEventKind::Down(PointerButton::Primary),
                    x,
                    y,
                    at_ms,
                )),
                Step::Move { x, y, at_ms } => {
                    card.handle_pointer(&pointer(PointerEventKind::Move, x, y, at_ms))
                }
                Step::Up { x, y, at_ms } => card.handle_pointer(&pointer(
                    PointerEventKind::Up(PointerButton::Primary),
                    x,
                    y,
                    at_ms,
                )),
                Step::Cancel { at_ms } => {
                    card.handle_pointer(&pointer(PointerEventKind::Cancel, 0.0, 0.0, at_ms))
                }
                Step::Settle => {
                    let mut frames = 0;
                    loop {
                        clock.advance(FRAME);
                        let card_moving = card.update();
                        let carousel_moving = carousel.update();
                        frames += 1;
                        if !(card_moving || carousel_moving) || frames >= MAX_FRAMES {
                            break;
                        }
                    }
                    log::info!("settled after {frames} frames");
                    Vec::new()
                }
                Step::Scroll { y } => {
                    carousel.scroll_to(y);
                    Vec::new()
                }
                Step::Release => {
                    carousel.release();
                    Vec::new()
                }
            };
            for outcome in outcomes {
                log::info!("{outcome:?}");
            }

            match step {
                Step::Scroll { .. } | Step::Release => {
                    log::info!(
                        "carousel offset={:.1} page={}",
                        carousel.offset(),
                        carousel.page()
                    );
                }
                Step::Settle if carousel.offset() != 0.0 => {
                    for index in 0..carousel.page_count() {
                        let style = carousel.item_style(
                            index,
                            script.variant,
                            script.appearance,
                            script.platform,
                        );
                        log::info!("page {index}: {style:?}");
                    }
                }
                _ => log_card(&card),
            }
        }
    }

    let pulses = buzzer
        .join()
        .map_err(|_| anyhow::anyhow!("haptic thread panicked"))?;
    log::info!("{pulses} haptic pulses");
    Ok(())
}
