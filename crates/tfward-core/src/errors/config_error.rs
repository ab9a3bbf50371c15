//! Configuration loading errors.

use super::error_code::{self, TfwardErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: String, value: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl TfwardErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => error_code::CONFIG_PARSE_ERROR,
            Self::InvalidValue { .. } => error_code::CONFIG_INVALID_VALUE,
            Self::Io { .. } => error_code::CONFIG_IO_ERROR,
        }
    }
}
