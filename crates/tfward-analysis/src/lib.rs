//! # tfward-analysis
//!
//! Analysis engine for the tfward configuration scanner.
//! Builds the module graph from parsed blocks, resolves cross-block
//! references, normalizes resource families through provider adapters,
//! and evaluates registered rules against the result.

pub mod adapters;
pub mod graph;
pub mod rules;
pub mod scanner;

pub use adapters::{adapt, State};
pub use graph::{Block, ModuleGraph, RawBlock, RawModule, Value};
pub use rules::{Finding, Rule, RuleRegistry};
pub use scanner::{ScanReport, Scanner};
