//! Scan output types.

use serde::Serialize;
use tfward_core::SourceRange;

use crate::rules::Finding;

/// Engine-level problems reported alongside findings. None of them abort a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A rule's check function panicked on one target.
    RulePanicked,
    /// An adapter panicked; its partial output was discarded.
    AdapterPanicked,
    /// Outstanding work was skipped after cancellation or the deadline.
    Cancelled,
    /// The graph held two blocks with the same identifier; the first was kept.
    DuplicateBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanDiagnostic {
    pub kind: DiagnosticKind,
    /// Long ID of the rule involved, if any.
    pub rule_id: Option<String>,
    /// Block address, adapter name, or "state".
    pub target: String,
    pub location: Option<SourceRange>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanStats {
    /// Rules that were eligible to run (registered and not excluded).
    pub rules_executed: usize,
    /// Distinct blocks at least one legacy rule was evaluated against.
    pub blocks_evaluated: usize,
    /// (rule, target) pairs that ran to completion or panicked.
    pub evaluations: usize,
    /// (rule, target) pairs skipped by cancellation or the deadline.
    pub skipped: usize,
    pub findings: usize,
    /// Findings dropped by the severity and unmanaged filters.
    pub filtered: usize,
    pub adapters_run: usize,
    pub duration_ms: u64,
}

/// Everything a scan produced. A scan always returns one of these.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    /// Ordered by rule registration, then block encounter order.
    pub findings: Vec<Finding>,
    pub diagnostics: Vec<ScanDiagnostic>,
    pub stats: ScanStats,
    /// True when cancellation or the deadline cut the scan short.
    pub partial: bool,
}

impl ScanReport {
    pub fn findings_for<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.rule_id == rule_id)
    }

    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &ScanDiagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}
