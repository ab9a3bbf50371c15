//! Top-level Scanner: adapters → work items → parallel rule evaluation → report.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tfward_core::errors::ScanError;
use tfward_core::{FxHashSet, ScanConfig, Severity};

use crate::adapters::{self, Adapter, State};
use crate::graph::{Block, ModuleGraph};
use crate::rules::registry::{self, RuleRegistry};
use crate::rules::{CheckContext, Finding, Rule, RuleInput};

use super::cancellation::ScanCancellation;
use super::types::{DiagnosticKind, ScanDiagnostic, ScanReport};

/// One (rule, target) evaluation. `block` is `None` for state rules.
#[derive(Debug, Clone, Copy)]
struct WorkItem {
    rule: usize,
    block: Option<usize>,
}

enum Outcome {
    Findings(Vec<Finding>),
    Panicked(ScanDiagnostic),
    Skipped,
}

/// Evaluates every registered rule against a module graph.
pub struct Scanner {
    config: ScanConfig,
    registry: Arc<RuleRegistry>,
    adapters: Vec<Box<dyn Adapter>>,
    pool: Option<rayon::ThreadPool>,
    cancellation: ScanCancellation,
}

impl Scanner {
    /// Scanner over the process-wide rule registry.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        Self::with_registry(config, registry::global()?)
    }

    pub fn with_registry(config: ScanConfig, registry: Arc<RuleRegistry>) -> Result<Self, ScanError> {
        let threads = config.effective_threads();
        let pool = if threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("tfward-scan-{i}"))
                .build()
                .map_err(|e| ScanError::ThreadPool {
                    threads,
                    message: e.to_string(),
                })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            config,
            registry,
            adapters: adapters::default_adapters(),
            pool,
            cancellation: ScanCancellation::new(),
        })
    }

    /// Replace the adapter set.
    pub fn with_adapters(mut self, adapters: Vec<Box<dyn Adapter>>) -> Self {
        self.adapters = adapters;
        self
    }

    /// Handle for cancelling from another thread.
    pub fn cancellation(&self) -> &ScanCancellation {
        &self.cancellation
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Run a full scan. Never fails: rule and adapter faults, cancellation,
    /// and the deadline all surface as diagnostics on the report.
    pub fn scan(&self, graph: &ModuleGraph) -> ScanReport {
        let start = Instant::now();
        let deadline = self.config.effective_timeout().map(|t| start + t);
        let mut report = ScanReport::default();

        for d in graph.diagnostics() {
            report.diagnostics.push(ScanDiagnostic {
                kind: DiagnosticKind::DuplicateBlock,
                rule_id: None,
                target: d.address.clone(),
                location: Some(d.range.clone()),
                message: d.message.clone(),
            });
        }

        let rules: Vec<&Arc<dyn Rule>> = self
            .registry
            .rules()
            .iter()
            .filter(|r| !self.config.is_rule_excluded(&r.definition().long_id()))
            .collect();
        report.stats.rules_executed = rules.len();

        // Adapter output is only handed to rules once every adapter has finished.
        let state = if rules.iter().any(|r| r.input() == RuleInput::State) {
            self.run_adapters(graph, deadline, &mut report)
        } else {
            State::default()
        };

        let items = work_items(&rules, graph);
        let evaluate = |item: &WorkItem| self.evaluate(&**rules[item.rule], item, graph, &state, deadline);
        let outcomes: Vec<Outcome> = match &self.pool {
            Some(pool) => pool.install(|| items.par_iter().map(evaluate).collect()),
            None => items.par_iter().map(evaluate).collect(),
        };

        self.collect(outcomes, &items, &mut report);

        if report.stats.skipped > 0 {
            report.partial = true;
        }
        if report.partial {
            let reason = if self.cancellation.is_cancelled() {
                "scan cancelled"
            } else {
                "scan deadline exceeded"
            };
            tracing::warn!(
                skipped = report.stats.skipped,
                completed = report.stats.evaluations,
                reason,
                "scan returned partial results"
            );
            report.diagnostics.push(ScanDiagnostic {
                kind: DiagnosticKind::Cancelled,
                rule_id: None,
                target: "scan".to_string(),
                location: None,
                message: format!(
                    "{reason}: {} of {} rule evaluations skipped",
                    report.stats.skipped,
                    items.len()
                ),
            });
        }

        report.stats.blocks_evaluated = items
            .iter()
            .filter_map(|i| i.block)
            .collect::<FxHashSet<_>>()
            .len();
        report.stats.duration_ms = duration_ms(start.elapsed());

        tracing::info!(
            rules = report.stats.rules_executed,
            evaluations = report.stats.evaluations,
            findings = report.stats.findings,
            diagnostics = report.diagnostics.len(),
            partial = report.partial,
            duration_ms = report.stats.duration_ms,
            "scan complete"
        );

        report
    }

    fn interrupted(&self, deadline: Option<Instant>) -> bool {
        self.cancellation.is_cancelled() || deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn run_adapters(&self, graph: &ModuleGraph, deadline: Option<Instant>, report: &mut ScanReport) -> State {
        let mut state = State::default();
        for adapter in &self.adapters {
            if self.interrupted(deadline) {
                report.partial = true;
                break;
            }
            let mut candidate = state.clone();
            match catch_unwind(AssertUnwindSafe(|| adapter.adapt(graph, &mut candidate))) {
                Ok(()) => {
                    state = candidate;
                    report.stats.adapters_run += 1;
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(
                        adapter = adapter.name(),
                        panic = %message,
                        "adapter panicked, discarding its output"
                    );
                    report.diagnostics.push(ScanDiagnostic {
                        kind: DiagnosticKind::AdapterPanicked,
                        rule_id: None,
                        target: adapter.name().to_string(),
                        location: None,
                        message,
                    });
                }
            }
        }
        state
    }

    fn evaluate(
        &self,
        rule: &dyn Rule,
        item: &WorkItem,
        graph: &ModuleGraph,
        state: &State,
        deadline: Option<Instant>,
    ) -> Outcome {
        if self.interrupted(deadline) {
            return Outcome::Skipped;
        }

        let block: Option<&Block> = item.block.map(|i| &graph.blocks[i]);
        let ctx = match block {
            Some(block) => CheckContext::Block { block, graph },
            None => CheckContext::State { state, graph },
        };

        match catch_unwind(AssertUnwindSafe(|| rule.check(&ctx))) {
            Ok(results) => {
                let definition = rule.definition();
                Outcome::Findings(
                    results
                        .into_iter()
                        .map(|cause| Finding::new(definition, cause))
                        .collect(),
                )
            }
            Err(payload) => {
                let rule_id = rule.definition().long_id();
                let message = panic_message(payload.as_ref());
                let target = block.map_or_else(|| "state".to_string(), |b| b.id().to_string());
                tracing::error!(
                    rule_id = %rule_id,
                    target = %target,
                    panic = %message,
                    "rule panicked during check"
                );
                Outcome::Panicked(ScanDiagnostic {
                    kind: DiagnosticKind::RulePanicked,
                    rule_id: Some(rule_id),
                    target,
                    location: block.map(|b| b.range().clone()),
                    message,
                })
            }
        }
    }

    fn collect(&self, outcomes: Vec<Outcome>, items: &[WorkItem], report: &mut ScanReport) {
        debug_assert_eq!(outcomes.len(), items.len());
        let minimum = self.config.effective_minimum_severity();
        let include_unmanaged = self.config.effective_include_unmanaged();

        for outcome in outcomes {
            match outcome {
                Outcome::Findings(findings) => {
                    report.stats.evaluations += 1;
                    for finding in findings {
                        if keep(&finding, minimum, include_unmanaged) {
                            report.findings.push(finding);
                        } else {
                            report.stats.filtered += 1;
                        }
                    }
                }
                Outcome::Panicked(diagnostic) => {
                    report.stats.evaluations += 1;
                    report.diagnostics.push(diagnostic);
                }
                Outcome::Skipped => report.stats.skipped += 1,
            }
        }
        report.stats.findings = report.findings.len();
    }
}

fn keep(finding: &Finding, minimum: Severity, include_unmanaged: bool) -> bool {
    finding.severity >= minimum && (include_unmanaged || finding.managed)
}

/// Work items in rule registration order, then block encounter order.
fn work_items(rules: &[&Arc<dyn Rule>], graph: &ModuleGraph) -> Vec<WorkItem> {
    let mut items = Vec::new();
    for (rule_index, rule) in rules.iter().enumerate() {
        match rule.input() {
            RuleInput::State => items.push(WorkItem {
                rule: rule_index,
                block: None,
            }),
            RuleInput::Block => {
                let definition = rule.definition();
                items.extend(
                    graph
                        .blocks()
                        .enumerate()
                        .filter(|(_, b)| definition.matches(b))
                        .map(|(block_index, _)| WorkItem {
                            rule: rule_index,
                            block: Some(block_index),
                        }),
                );
            }
        }
    }
    items
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
