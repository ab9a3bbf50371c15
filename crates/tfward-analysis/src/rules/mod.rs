//! Rules: descriptors, the registry, check output, and the built-in checks.
//!
//! A rule either checks raw blocks selected by its applicability filter
//! (`BlockRule`) or checks adapter-produced state once per scan (`StateRule`).
//! Both go through the same `Rule::check(&CheckContext)` entry point.

pub mod builtin;
pub mod cidr;
pub mod registry;
pub mod results;
pub mod types;

pub use registry::RuleRegistry;
pub use results::{Cause, Finding, HasMetadata, Results};
pub use types::{BlockRule, CheckContext, Rule, RuleDefinition, RuleDocumentation, RuleInput, StateRule};
