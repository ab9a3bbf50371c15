//! Scanner configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::severity::Severity;

/// Configuration for the rule-evaluation scanner.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// Number of worker threads. 0 = rayon default (one per core).
    pub threads: Option<usize>,
    /// Scan deadline in milliseconds. Outstanding rule evaluations are
    /// skipped once it passes and the report is marked partial.
    pub timeout_ms: Option<u64>,
    /// Long rule IDs (`<provider>-<service>-<short_code>`) that are not executed.
    #[serde(default)]
    pub exclude_rules: Vec<String>,
    /// Findings below this severity are dropped. Default: "low".
    pub minimum_severity: Option<String>,
    /// Report findings located on synthetic unmanaged objects. Default: true.
    pub include_unmanaged: Option<bool>,
}

impl ScanConfig {
    /// Returns the effective thread count, defaulting to 0 (auto-detect).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }

    /// Returns the scan deadline, if one is configured.
    pub fn effective_timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Returns the minimum reported severity, defaulting to `Low`.
    ///
    /// Unknown names fall back to `Low`; [`ScanConfig::validate`] rejects them
    /// at load time.
    pub fn effective_minimum_severity(&self) -> Severity {
        self.minimum_severity
            .as_deref()
            .and_then(Severity::parse_str)
            .unwrap_or_default()
    }

    /// Returns whether unmanaged findings are reported, defaulting to true.
    pub fn effective_include_unmanaged(&self) -> bool {
        self.include_unmanaged.unwrap_or(true)
    }

    pub fn is_rule_excluded(&self, rule_id: &str) -> bool {
        self.exclude_rules.iter().any(|r| r == rule_id)
    }

    /// Reject values that deserialize but carry no meaning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref name) = self.minimum_severity {
            if Severity::parse_str(name).is_none() {
                return Err(ConfigError::InvalidValue {
                    field: "scan.minimum_severity".to_string(),
                    value: name.clone(),
                });
            }
        }
        Ok(())
    }
}
