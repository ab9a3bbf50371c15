//! Stable error codes for embedders that need to branch on error kind.

pub const CONFIG_PARSE_ERROR: &str = "CONFIG_PARSE_ERROR";
pub const CONFIG_INVALID_VALUE: &str = "CONFIG_INVALID_VALUE";
pub const CONFIG_IO_ERROR: &str = "CONFIG_IO_ERROR";
pub const REGISTRY_DUPLICATE_RULE: &str = "REGISTRY_DUPLICATE_RULE";
pub const REGISTRY_INVALID_RULE: &str = "REGISTRY_INVALID_RULE";
pub const SCAN_THREAD_POOL: &str = "SCAN_THREAD_POOL";

/// Implemented by every error enum in the workspace.
pub trait TfwardErrorCode {
    fn error_code(&self) -> &'static str;
}
