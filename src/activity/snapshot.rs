//! Opaque battle-state blob stored on an activity plan.
//!
//! Blob format:
//! - Version magic (8 bytes)
//! - Payload length (4 bytes)
//! - bincode-serialized [`BattleSnapshot`] (variable length)
//! - SHA256 checksum over magic + length + payload (32 bytes)

use crate::combat::encounter::Encounter;
use crate::core::constants::SNAPSHOT_VERSION_MAGIC;
use crate::core::error::SnapshotError;
use crate::core::rng::RandomStream;
use crate::profession::Profession;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const HEADER_LEN: usize = 8 + 4;
const CHECKSUM_LEN: usize = 32;

/// The part of a battle that survives between offline sessions.
///
/// Only the fight itself is kept: RNG state, the encounter, character health and
/// kills. Active buffs, skill cooldowns, the GCD and resource pool levels are not
/// stored, so a resumed battle reapplies its start buffs and begins its rotation
/// from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub profession: Profession,
    pub rng: RandomStream,
    /// Living enemies plus any queued waves.
    pub encounter: Encounter,
    pub character_hp: u32,
    pub kills: u32,
    /// Total simulated seconds behind this snapshot.
    pub simulated_seconds: f64,
}

impl BattleSnapshot {
    pub fn new(
        profession: Profession,
        rng: RandomStream,
        encounter: Encounter,
        character_hp: u32,
        kills: u32,
        simulated_seconds: f64,
    ) -> Self {
        Self {
            profession,
            rng,
            encounter,
            character_hp,
            kills,
            simulated_seconds,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        let data = bincode::serialize(self)?;
        let data_len = data.len() as u32;

        let mut hasher = Sha256::new();
        hasher.update(SNAPSHOT_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        let mut blob = Vec::with_capacity(HEADER_LEN + data.len() + CHECKSUM_LEN);
        blob.extend_from_slice(&SNAPSHOT_VERSION_MAGIC.to_le_bytes());
        blob.extend_from_slice(&data_len.to_le_bytes());
        blob.extend_from_slice(&data);
        blob.extend_from_slice(&checksum);
        Ok(blob)
    }

    /// Verifies magic and checksum, then decodes.
    pub fn decode(blob: &[u8]) -> Result<Self, SnapshotError> {
        if blob.len() < HEADER_LEN + CHECKSUM_LEN {
            return Err(SnapshotError::Truncated(blob.len()));
        }

        let (magic_bytes, rest) = blob.split_at(8);
        let mut magic = [0u8; 8];
        magic.copy_from_slice(magic_bytes);
        let version = u64::from_le_bytes(magic);
        if version != SNAPSHOT_VERSION_MAGIC {
            return Err(SnapshotError::BadVersion {
                expected: SNAPSHOT_VERSION_MAGIC,
                found: version,
            });
        }

        let (len_bytes, rest) = rest.split_at(4);
        let mut len = [0u8; 4];
        len.copy_from_slice(len_bytes);
        let data_len = u32::from_le_bytes(len) as usize;
        if rest.len() != data_len + CHECKSUM_LEN {
            return Err(SnapshotError::Truncated(blob.len()));
        }
        let (data, stored_checksum) = rest.split_at(data_len);

        let mut hasher = Sha256::new();
        hasher.update(magic);
        hasher.update(len);
        hasher.update(data);
        let computed = hasher.finalize();
        if computed.as_slice() != stored_checksum {
            return Err(SnapshotError::ChecksumMismatch);
        }

        Ok(bincode::deserialize(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::encounter::EncounterSpec;
    use crate::combat::types::Enemy;

    fn sample() -> BattleSnapshot {
        let mut rng = RandomStream::new(11);
        rng.next_float();
        BattleSnapshot::new(
            Profession::Rogue,
            rng,
            Encounter::new(EncounterSpec::Endless(vec![Enemy::new("Bandit", 80, 4)])),
            95,
            7,
            1800.0,
        )
    }

    #[test]
    fn test_encode_decode_preserves_rng_position() {
        let snapshot = sample();
        let blob = snapshot.encode().unwrap();
        let mut restored = BattleSnapshot::decode(&blob).unwrap();
        assert_eq!(restored, snapshot);
        let mut original_rng = snapshot.rng.clone();
        assert_eq!(
            restored.rng.next_float().to_bits(),
            original_rng.next_float().to_bits()
        );
    }

    #[test]
    fn test_flipped_byte_fails_checksum() {
        let mut blob = sample().encode().unwrap();
        let middle = blob.len() / 2;
        blob[middle] ^= 0xFF;
        assert!(matches!(
            BattleSnapshot::decode(&blob),
            Err(SnapshotError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_wrong_magic_and_truncation() {
        let mut blob = sample().encode().unwrap();
        blob[0] ^= 0x01;
        assert!(matches!(
            BattleSnapshot::decode(&blob),
            Err(SnapshotError::BadVersion { .. })
        ));
        assert!(matches!(
            BattleSnapshot::decode(&[1, 2, 3]),
            Err(SnapshotError::Truncated(3))
        ));
        let good = sample().encode().unwrap();
        assert!(matches!(
            BattleSnapshot::decode(&good[..good.len() - 1]),
            Err(SnapshotError::Truncated(_))
        ));
    }
}
