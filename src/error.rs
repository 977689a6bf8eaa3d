use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid hex color `{0}`, expected RRGGBB (e.g. 1a1b26)")]
    InvalidColor(String),

    #[error("invalid canvas size `{0}`, expected WIDTHxHEIGHT (e.g. 960x540)")]
    InvalidCanvas(String),
}

pub type Result<T> = std::result::Result<T, Error>;
