//! Rule descriptors and the unified check interface.

use serde::Serialize;
use tfward_core::{Provider, Severity};

use crate::adapters::State;
use crate::graph::{Block, ModuleGraph};

use super::results::Results;

/// Human-readable documentation carried on every finding a rule produces.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleDocumentation {
    pub summary: &'static str,
    pub explanation: &'static str,
    pub impact: &'static str,
    pub resolution: &'static str,
    pub bad_examples: &'static [&'static str],
    pub good_examples: &'static [&'static str],
    pub links: &'static [&'static str],
}

/// Immutable rule descriptor: identity, severity, applicability, documentation.
#[derive(Debug, Clone, Serialize)]
pub struct RuleDefinition {
    pub provider: Provider,
    pub service: &'static str,
    pub short_code: &'static str,
    pub severity: Severity,
    /// Top-level block types a legacy rule applies to (`resource`, `data`, ...).
    /// Empty means every block type.
    pub required_types: &'static [&'static str],
    /// First-label filter. A trailing `*` is a prefix wildcard. Empty means any label.
    pub required_labels: &'static [&'static str],
    pub documentation: RuleDocumentation,
}

impl RuleDefinition {
    /// `<provider>-<service>-<short_code>`, unique within a registry.
    pub fn long_id(&self) -> String {
        format!("{}-{}-{}", self.provider.name(), self.service, self.short_code)
    }

    /// Applicability filter for legacy block rules.
    pub fn matches(&self, block: &Block) -> bool {
        let type_ok = self.required_types.is_empty()
            || self.required_types.contains(&block.block_type());
        type_ok
            && (self.required_labels.is_empty()
                || self
                    .required_labels
                    .iter()
                    .any(|pattern| label_matches(pattern, block.type_label())))
    }
}

fn label_matches(pattern: &str, label: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => label.starts_with(prefix),
        None => pattern == label,
    }
}

/// What a rule's check function is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleInput {
    /// One raw block at a time, selected by the applicability filter.
    Block,
    /// The adapter-produced domain state, once per scan.
    State,
}

/// Everything a check may read. Checks never mutate it.
#[derive(Debug, Clone, Copy)]
pub enum CheckContext<'a> {
    Block {
        block: &'a Block,
        graph: &'a ModuleGraph,
    },
    State {
        state: &'a State,
        graph: &'a ModuleGraph,
    },
}

impl<'a> CheckContext<'a> {
    pub fn graph(&self) -> &'a ModuleGraph {
        match self {
            Self::Block { graph, .. } | Self::State { graph, .. } => graph,
        }
    }
}

/// A registered security check.
pub trait Rule: Send + Sync {
    fn definition(&self) -> &RuleDefinition;

    fn input(&self) -> RuleInput;

    /// Zero or more causes. A context of the wrong kind yields nothing.
    fn check(&self, ctx: &CheckContext<'_>) -> Results;
}

/// A check over a single raw block, with the graph for cross-block context.
pub struct BlockRule {
    pub definition: RuleDefinition,
    pub check: fn(&Block, &ModuleGraph) -> Results,
}

impl Rule for BlockRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn input(&self) -> RuleInput {
        RuleInput::Block
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Results {
        match ctx {
            CheckContext::Block { block, graph } => (self.check)(block, graph),
            CheckContext::State { .. } => Results::default(),
        }
    }
}

/// A check over adapter-produced domain objects.
pub struct StateRule {
    pub definition: RuleDefinition,
    pub check: fn(&State) -> Results,
}

impl Rule for StateRule {
    fn definition(&self) -> &RuleDefinition {
        &self.definition
    }

    fn input(&self) -> RuleInput {
        RuleInput::State
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Results {
        match ctx {
            CheckContext::State { state, .. } => (self.check)(state),
            CheckContext::Block { .. } => Results::default(),
        }
    }
}
