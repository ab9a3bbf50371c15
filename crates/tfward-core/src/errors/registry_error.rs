//! Rule registration errors.

use super::error_code::{self, TfwardErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("rule `{id}` is already registered")]
    DuplicateRule { id: String },

    #[error("rule in service `{service}` has an empty short code")]
    EmptyShortCode { service: String },
}

impl TfwardErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateRule { .. } => error_code::REGISTRY_DUPLICATE_RULE,
            Self::EmptyShortCode { .. } => error_code::REGISTRY_INVALID_RULE,
        }
    }
}
