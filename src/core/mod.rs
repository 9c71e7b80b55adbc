//! Engine primitives shared by every battle: constants, errors, randomness,
//! the event timeline and damage math. Offline progression lives here too.

pub mod combat_math;
pub mod constants;
pub mod error;
pub mod offline;
pub mod rng;
pub mod timeline;

pub use error::{ConfigError, SimError, SnapshotError};
pub use offline::{FastForwardResult, OfflineFastForwardEngine};
pub use rng::RandomStream;
pub use timeline::Timeline;
