//! RuleRegistry: ordered rule storage with long-ID uniqueness, plus the
//! process-wide instance the scanner uses by default.

use std::sync::{Arc, OnceLock};

use tfward_core::errors::RegistryError;
use tfward_core::{FxHashSet, TfwardErrorCode};

use super::builtin;
use super::types::Rule;

/// Process-wide registry. Populated once, read-only afterwards.
static GLOBAL: OnceLock<Arc<RuleRegistry>> = OnceLock::new();

/// Registered rules in registration order.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
    ids: FxHashSet<String>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with every built-in rule.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        builtin::register_all(&mut registry)?;
        Ok(registry)
    }

    /// Append a rule. Rejects an empty short code and a long ID that is
    /// already registered.
    pub fn register(&mut self, rule: impl Rule + 'static) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(rule))
    }

    pub fn register_arc(&mut self, rule: Arc<dyn Rule>) -> Result<(), RegistryError> {
        let definition = rule.definition();
        if definition.short_code.trim().is_empty() {
            return Err(RegistryError::EmptyShortCode {
                service: definition.service.to_string(),
            });
        }
        let id = definition.long_id();
        if !self.ids.insert(id.clone()) {
            tracing::error!(rule_id = %id, "duplicate rule registration rejected");
            return Err(RegistryError::DuplicateRule { id });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Rules in registration order.
    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn get(&self, long_id: &str) -> Option<&Arc<dyn Rule>> {
        self.rules
            .iter()
            .find(|r| r.definition().long_id() == long_id)
    }

    pub fn contains(&self, long_id: &str) -> bool {
        self.ids.contains(long_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Install `registry` as the process-wide registry. Returns false, leaving
/// the existing one in place, when a registry is already installed.
pub fn install(registry: RuleRegistry) -> bool {
    GLOBAL.set(Arc::new(registry)).is_ok()
}

/// The process-wide registry, built from the built-in rules on first use
/// unless [`install`] ran earlier. A failed build is not cached.
pub fn global() -> Result<Arc<RuleRegistry>, RegistryError> {
    if let Some(registry) = GLOBAL.get() {
        return Ok(Arc::clone(registry));
    }
    let registry = RuleRegistry::with_builtins().inspect_err(|e| {
        tracing::error!(
            error = %e,
            code = e.error_code(),
            "built-in rule registration failed"
        );
    })?;
    Ok(Arc::clone(GLOBAL.get_or_init(|| Arc::new(registry))))
}
