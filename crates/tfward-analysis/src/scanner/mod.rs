//! Scanner: runs adapters, then evaluates every (rule, target) pair in
//! parallel with per-evaluation panic isolation.
//!
//! - `scanner.rs`: the `Scanner` orchestrator
//! - `cancellation.rs`: shared cancellation flag
//! - `types.rs`: `ScanReport`, `ScanDiagnostic`, `ScanStats`

pub mod cancellation;
#[allow(clippy::module_inception)]
pub mod scanner;
pub mod types;

pub use cancellation::ScanCancellation;
pub use scanner::Scanner;
pub use types::{DiagnosticKind, ScanDiagnostic, ScanReport, ScanStats};
