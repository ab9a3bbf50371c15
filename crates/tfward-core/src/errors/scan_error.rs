//! Scanner setup errors. A running scan never fails; see `ScanReport`.

use super::error_code::{self, TfwardErrorCode};
use super::registry_error::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to build worker pool with {threads} threads: {message}")]
    ThreadPool { threads: usize, message: String },

    #[error("rule registry unavailable: {0}")]
    Registry(#[from] RegistryError),
}

impl TfwardErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ThreadPool { .. } => error_code::SCAN_THREAD_POOL,
            Self::Registry(e) => e.error_code(),
        }
    }
}
