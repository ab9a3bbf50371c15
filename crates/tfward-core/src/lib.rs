//! # tfward-core
//!
//! Foundation crate for the tfward configuration scanner.
//! Defines the shared types, errors, config, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{ScanConfig, TfwardConfig};
pub use errors::error_code::TfwardErrorCode;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::metadata::{Metadata, SourceRange};
pub use types::provider::Provider;
pub use types::severity::Severity;
