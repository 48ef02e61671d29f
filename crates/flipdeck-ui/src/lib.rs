//! Flip cards and the showcase effects around them.
//!
//! Everything here is headless. Hosts feed pointer events and frame deltas
//! in, and read back rotations, layer styles and haptic pulses.

pub mod carousel;
pub mod deck;
pub mod error;
pub mod flip_card;
pub mod gestures;
pub mod haptics;
pub mod pager;
pub mod sheet;

pub use carousel::*;
pub use deck::*;
pub use error::*;
pub use flip_card::*;
pub use gestures::*;
pub use haptics::*;
pub use pager::*;
pub use sheet::*;
