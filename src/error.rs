use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("System time error: {0}")]
    SystemTime(#[from] std::time::SystemTimeError),

    #[error("could not get mirror list from {url}: {reason}")]
    SourceUnavailable { url: String, reason: String },

    #[error("could not get {requested} mirror(s), only {available} responded")]
    InsufficientMirrors { requested: usize, available: usize },

    #[error("can not use both --http-only and --https-only flags")]
    ConflictingProtocols,

    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}

pub type Result<T> = std::result::Result<T, MirrorError>;
