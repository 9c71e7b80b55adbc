use thiserror::Error;

/// Invalid definitions rejected before a battle starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("skill `{0}` has a negative cooldown")]
    NegativeCooldown(String),

    #[error("skill `{0}` has a negative cast time or GCD")]
    NegativeCastTiming(String),

    #[error("buff `{0}` has a negative duration")]
    NegativeDuration(String),

    #[error("buff `{0}` is periodic but its interval is not positive")]
    InvalidPeriodicInterval(String),

    #[error("`{owner}` references unknown resource `{resource}`")]
    UnknownResource { owner: String, resource: String },

    #[error("proc `{proc_id}` references unknown buff `{buff_id}`")]
    UnknownBuff { proc_id: String, buff_id: String },

    #[error("proc `{0}` has a chance outside 0..=1 or a negative internal cooldown")]
    InvalidProc(String),

    #[error("id `{0}` is already registered with a different definition")]
    DuplicateId(String),

    #[error("invalid battle setting: {0}")]
    InvalidSetting(String),
}

/// Failures decoding a persisted battle snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is truncated ({0} bytes)")]
    Truncated(usize),

    #[error("invalid snapshot version: expected 0x{expected:016X}, got 0x{found:016X}")]
    BadVersion { expected: u64, found: u64 },

    #[error("snapshot checksum verification failed")]
    ChecksumMismatch,

    #[error("snapshot payload codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Errors surfaced by the batch simulator and its CLI.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
