//! Error taxonomy. One `thiserror` enum per subsystem, each mapped to a
//! stable code through [`error_code::TfwardErrorCode`].
//!
//! Missing attributes, type mismatches, unresolvable references and rule
//! faults are not errors here: they become defaults, orphans, and scan
//! diagnostics respectively.

pub mod error_code;

mod config_error;
mod registry_error;
mod scan_error;

pub use config_error::ConfigError;
pub use registry_error::RegistryError;
pub use scan_error::ScanError;
