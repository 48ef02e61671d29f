//! Haptic feedback as a one-way effect.
//!
//! Widgets call `HapticFeedback::impact` from inside their transitions and
//! never wait on it. Platform backends that must run on another thread
//! (main-thread-only vibration APIs) sit behind `HapticChannel`.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use parking_lot::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImpactStyle {
    #[default]
    Light,
    Medium,
    Heavy,
}

/// Fire-and-forget haptic sink. Implementations must not block.
pub trait HapticFeedback {
    fn impact(&self, style: ImpactStyle);
}

/// Discards every pulse.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHaptics;

impl HapticFeedback for NoopHaptics {
    fn impact(&self, _style: ImpactStyle) {}
}

/// Forwards pulses over an unbounded channel; the receiving end is drained by
/// whichever thread owns the platform vibration API.
#[derive(Clone, Debug)]
pub struct HapticChannel {
    tx: Sender<ImpactStyle>,
}

impl HapticChannel {
    pub fn new() -> (Self, Receiver<ImpactStyle>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl HapticFeedback for HapticChannel {
    fn impact(&self, style: ImpactStyle) {
        if self.tx.send(style).is_err() {
            log::trace!("haptic receiver gone; dropping {style:?}");
        }
    }
}

/// Records pulses in order. Clones share the same log.
#[derive(Clone, Debug, Default)]
pub struct HapticRecorder {
    pulses: Arc<Mutex<Vec<ImpactStyle>>>,
}

impl HapticRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.pulses.lock().len()
    }

    pub fn pulses(&self) -> Vec<ImpactStyle> {
        self.pulses.lock().clone()
    }

    pub fn clear(&self) {
        self.pulses.lock().clear();
    }
}

impl HapticFeedback for HapticRecorder {
    fn impact(&self, style: ImpactStyle) {
        self.pulses.lock().push(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_delivers_in_order() {
        let (haptics, rx) = HapticChannel::new();
        haptics.impact(ImpactStyle::Light);
        haptics.impact(ImpactStyle::Heavy);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![
            ImpactStyle::Light,
            ImpactStyle::Heavy
        ]);
    }

    #[test]
    fn test_channel_never_blocks_without_receiver() {
        let (haptics, rx) = HapticChannel::new();
        drop(rx);
        haptics.impact(ImpactStyle::Light);
    }

    #[test]
    fn test_channel_crosses_threads() {
        let (haptics, rx) = HapticChannel::new();
        let worker = std::thread::spawn(move || rx.recv().ok());
        haptics.impact(ImpactStyle::Medium);
        assert_eq!(worker.join().unwrap(), Some(ImpactStyle::Medium));
    }

    #[test]
    fn test_recorder_clones_share_log() {
        let rec = HapticRecorder::new();
        let other = rec.clone();
        other.impact(ImpactStyle::Light);
        assert_eq!(rec.count(), 1);
        rec.clear();
        assert!(other.pulses().is_empty());
    }
}
