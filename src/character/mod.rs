//! Character inputs consumed by the battle engine.

pub mod profile;
pub mod stats;

pub use profile::CharacterProfile;
pub use stats::{CharacterStats, EquipmentBonuses, EquipmentSource, NoEquipment};
