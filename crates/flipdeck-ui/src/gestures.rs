//! Exclusive tap / horizontal-pan recognition over raw pointer events.
//!
//! One pointer is tracked at a time. Until the pan activates, the press may
//! still end as a tap; once the pan is active (or the press moved too far)
//! it never will. Vertical movement past the fail offset fails the pan
//! before it can activate, so vertical scrolls pass through untouched.

use flipdeck_core::*;
use smallvec::SmallVec;
use web_time::Duration;

/// Velocity is estimated over samples no older than this.
const VELOCITY_WINDOW: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanConfig {
    /// Horizontal travel (px) that activates the pan.
    pub active_offset_x: f32,
    /// Vertical travel (px) that fails the pan before activation.
    pub fail_offset_y: f32,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            active_offset_x: 10.0,
            fail_offset_y: 15.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TapConfig {
    /// Furthest the pointer may wander (px) and still tap.
    pub max_distance: f32,
    pub max_duration: Duration,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            max_distance: 10.0,
            max_duration: Duration::from_millis(500),
        }
    }
}

/// What the recognizer reports to a flip state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GestureEvent {
    Tap,
    DragBegin,
    /// Horizontal translation (px) since the pointer went down.
    DragUpdate { translation_x: f32 },
    /// Release of an active drag; velocity in px/s.
    DragEnd { translation_x: f32, velocity_x: f32 },
    /// The pointer was lost while dragging.
    DragCancel,
}

pub type GestureEvents = SmallVec<[GestureEvent; 2]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PanPhase {
    Undetermined,
    Active,
    Failed,
}

#[derive(Clone, Copy, Debug)]
struct Sample {
    position: Vec2,
    timestamp: Duration,
}

#[derive(Clone, Debug)]
struct Track {
    pointer: PointerId,
    origin: Vec2,
    pressed_at: Duration,
    max_travel: f32,
    phase: PanPhase,
    samples: SmallVec<[Sample; 8]>,
}

impl Track {
    fn push(&mut self, position: Vec2, timestamp: Duration) {
        self.max_travel = self.max_travel.max((position - self.origin).length());
        self.samples.push(Sample {
            position,
            timestamp,
        });
        // Keep only what the velocity window can still use.
        let cutoff = timestamp.saturating_sub(VELOCITY_WINDOW);
        let stale = self
            .samples
            .iter()
            .take_while(|s| s.timestamp < cutoff)
            .count();
        // Leave one sample older than the window as the velocity anchor.
        if stale > 1 {
            self.samples.drain(..stale - 1);
        }
    }

    fn velocity_x(&self) -> f32 {
        let (Some(first), Some(last)) = (self.samples.first(), self.samples.last()) else {
            return 0.0;
        };
        let dt = last.timestamp.saturating_sub(first.timestamp).as_secs_f32();
        if dt <= 0.0 {
            return 0.0;
        }
        (last.position.x - first.position.x) / dt
    }
}

/// Tap and pan composed exclusively for a single flip target.
#[derive(Clone, Debug, Default)]
pub struct FlipGestureDetector {
    pan: PanConfig,
    tap: TapConfig,
    track: Option<Track>,
}

impl FlipGestureDetector {
    pub fn new(pan: PanConfig, tap: TapConfig) -> Self {
        Self {
            pan,
            tap,
            track: None,
        }
    }

    /// True while a pointer is down and being tracked.
    pub fn is_tracking(&self) -> bool {
        self.track.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(&self.track, Some(t) if t.phase == PanPhase::Active)
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) -> GestureEvents {
        let mut out = GestureEvents::new();
        match event.event {
            PointerEventKind::Down(PointerButton::Primary) => {
                if let Some(track) = &self.track {
                    log::trace!(
                        "ignoring pointer {:?}; {:?} is already tracked",
                        event.id,
                        track.pointer
                    );
                    return out;
                }
                let mut samples = SmallVec::new();
                samples.push(Sample {
                    position: event.position,
                    timestamp: event.timestamp,
                });
                self.track = Some(Track {
                    pointer: event.id,
                    origin: event.position,
                    pressed_at: event.timestamp,
                    max_travel: 0.0,
                    phase: PanPhase::Undetermined,
                    samples,
                });
            }
            PointerEventKind::Down(_) => {}
            PointerEventKind::Move => {
                let Some(track) = self.track.as_mut().filter(|t| t.pointer == event.id) else {
                    return out;
                };
                track.push(event.position, event.timestamp);
                let delta = event.position - track.origin;

                match track.phase {
                    PanPhase::Undetermined => {
                        if delta.y.abs() > self.pan.fail_offset_y {
                            log::trace!("pan failed: vertical travel {:.1}px", delta.y);
                            track.phase = PanPhase::Failed;
                        } else if delta.x.abs() >= self.pan.active_offset_x {
                            track.phase = PanPhase::Active;
                            out.push(GestureEvent::DragBegin);
                            out.push(GestureEvent::DragUpdate {
                                translation_x: delta.x,
                            });
                        }
                    }
                    PanPhase::Active => out.push(GestureEvent::DragUpdate {
                        translation_x: delta.x,
                    }),
                    PanPhase::Failed => {}
                }
            }
            PointerEventKind::Up(button) => {
                let Some(mut track) = self.take_track(event.id) else {
                    return out;
                };
                track.push(event.position, event.timestamp);

                if track.phase == PanPhase::Active {
                    out.push(GestureEvent::DragEnd {
                        translation_x: event.position.x - track.origin.x,
                        velocity_x: track.velocity_x(),
                    });
                } else {
                    let held = event.timestamp.saturating_sub(track.pressed_at);
                    if button == PointerButton::Primary
                        && track.max_travel <= self.tap.max_distance
                        && held <= self.tap.max_duration
                    {
                        out.push(GestureEvent::Tap);
                    }
                }
            }
            PointerEventKind::Cancel => {
                if let Some(track) = self.take_track(event.id) {
                    if track.phase == PanPhase::Active {
                        out.push(GestureEvent::DragCancel);
                    }
                }
            }
        }
        out
    }

    /// Drops the tracked pointer without emitting anything.
    pub fn reset(&mut self) {
        self.track = None;
    }

    fn take_track(&mut self, id: PointerId) -> Option<Track> {
        if self.track.as_ref().is_some_and(|t| t.pointer == id) {
            self.track.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(kind: PointerEventKind, x: f32, y: f32, ms: u64) -> PointerEvent {
        PointerEvent::touch(kind, Vec2::new(x, y), Duration::from_millis(ms))
    }

    fn down(x: f32, y: f32, ms: u64) -> PointerEvent {
        ev(PointerEventKind::Down(PointerButton::Primary), x, y, ms)
    }

    fn mv(x: f32, y: f32, ms: u64) -> PointerEvent {
        ev(PointerEventKind::Move, x, y, ms)
    }

    fn up(x: f32, y: f32, ms: u64) -> PointerEvent {
        ev(PointerEventKind::Up(PointerButton::Primary), x, y, ms)
    }

    fn run(d: &mut FlipGestureDetector, events: &[PointerEvent]) -> Vec<GestureEvent> {
        events.iter().flat_map(|e| d.handle_pointer(e)).collect()
    }

    #[test]
    fn test_quick_press_is_tap() {
        let mut d = FlipGestureDetector::default();
        let out = run(&mut d, &[down(50.0, 50.0, 0), mv(53.0, 52.0, 40), up(53.0, 52.0, 80)]);
        assert_eq!(out, vec![GestureEvent::Tap]);
        assert!(!d.is_tracking());
    }

    #[test]
    fn test_long_press_is_not_tap() {
        let mut d = FlipGestureDetector::default();
        let out = run(&mut d, &[down(0.0, 0.0, 0), up(0.0, 0.0, 900)]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_horizontal_drag_is_pan_not_tap() {
        let mut d = FlipGestureDetector::default();
        let out = run(&mut d, &[down(0.0, 0.0, 0), mv(20.0, 0.0, 16), up(20.0, 0.0, 32)]);
        assert_eq!(out[0], GestureEvent::DragBegin);
        assert_eq!(out[1], GestureEvent::DragUpdate { translation_x: 20.0 });
        assert!(matches!(
            out[2],
            GestureEvent::DragEnd { translation_x, .. } if translation_x == 20.0
        ));
        assert!(!out.contains(&GestureEvent::Tap));
    }

    #[test]
    fn test_activation_needs_ten_pixels() {
        let mut d = FlipGestureDetector::default();
        assert!(run(&mut d, &[down(0.0, 0.0, 0), mv(9.5, 0.0, 16)]).is_empty());
        assert!(!d.is_dragging());
        let out = run(&mut d, &[mv(-10.0, 0.0, 32)]);
        assert_eq!(out[0], GestureEvent::DragBegin);
        assert!(d.is_dragging());
    }

    #[test]
    fn test_vertical_scroll_fails_pan_and_tap() {
        let mut d = FlipGestureDetector::default();
        let out = run(&mut d, &[
            down(0.0, 0.0, 0),
            mv(2.0, 16.0, 16),
            mv(40.0, 60.0, 32),
            up(40.0, 60.0, 48),
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_active_pan_ignores_later_vertical_travel() {
        let mut d = FlipGestureDetector::default();
        let out = run(&mut d, &[down(0.0, 0.0, 0), mv(12.0, 0.0, 16), mv(30.0, 40.0, 32)]);
        assert_eq!(out.last(), Some(&GestureEvent::DragUpdate { translation_x: 30.0 }));
    }

    #[test]
    fn test_release_velocity_uses_recent_samples() {
        let mut d = FlipGestureDetector::default();
        let out = run(&mut d, &[
            down(0.0, 0.0, 0),
            mv(20.0, 0.0, 500),
            mv(40.0, 0.0, 550),
            mv(60.0, 0.0, 600),
            up(80.0, 0.0, 650),
        ]);
        let Some(GestureEvent::DragEnd { velocity_x, .. }) = out.last().copied() else {
            panic!("expected drag end, got {out:?}");
        };
        // The 500 ms sample anchors the window: 60px over 150ms.
        assert!((velocity_x - 400.0).abs() < 1.0, "velocity {velocity_x}");
    }

    #[test]
    fn test_cancel_while_dragging() {
        let mut d = FlipGestureDetector::default();
        let out = run(&mut d, &[
            down(0.0, 0.0, 0),
            mv(30.0, 0.0, 16),
            ev(PointerEventKind::Cancel, 30.0, 0.0, 32),
        ]);
        assert_eq!(out.last(), Some(&GestureEvent::DragCancel));
        assert!(!d.is_tracking());
    }

    #[test]
    fn test_second_pointer_is_ignored() {
        let mut d = FlipGestureDetector::default();
        d.handle_pointer(&down(0.0, 0.0, 0));
        let mut other = down(100.0, 0.0, 5);
        other.id = PointerId(7);
        assert!(d.handle_pointer(&other).is_empty());
        other.event = PointerEventKind::Move;
        other.position = Vec2::new(200.0, 0.0);
        assert!(d.handle_pointer(&other).is_empty());
        assert_eq!(run(&mut d, &[up(0.0, 0.0, 50)]), vec![GestureEvent::Tap]);
    }
}
