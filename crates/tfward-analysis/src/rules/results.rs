//! Check output: causes collected by a check, and the findings the scanner
//! builds from them.

use serde::Serialize;
use tfward_core::{Metadata, Provider, Severity, SourceRange};

use crate::adapters::aws::apigateway::{AccessLogging, Api, RestMethod, RestMethodSettings, Stage};
use crate::graph::{Attr, Attribute, Block, Typed};

use super::types::RuleDefinition;

/// Anything a finding can cite.
pub trait HasMetadata {
    fn metadata(&self) -> Metadata;
}

impl HasMetadata for Metadata {
    fn metadata(&self) -> Metadata {
        self.clone()
    }
}

impl HasMetadata for Block {
    fn metadata(&self) -> Metadata {
        Block::metadata(self)
    }
}

impl HasMetadata for Attr<'_> {
    fn metadata(&self) -> Metadata {
        Attr::metadata(self)
    }
}

impl HasMetadata for Attribute {
    fn metadata(&self) -> Metadata {
        Attribute::metadata(self)
    }
}

impl<T> HasMetadata for Typed<T> {
    fn metadata(&self) -> Metadata {
        Typed::metadata(self).clone()
    }
}

macro_rules! has_metadata_field {
    ($($ty:ty),* $(,)?) => {
        $(impl HasMetadata for $ty {
            fn metadata(&self) -> Metadata {
                self.metadata.clone()
            }
        })*
    };
}

has_metadata_field!(Api, Stage, AccessLogging, RestMethodSettings, RestMethod);

/// One reason a check failed, cited at a source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Cause {
    pub description: String,
    pub metadata: Metadata,
}

/// Causes produced by one check invocation, in the order the check added them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Results {
    causes: Vec<Cause>,
}

impl Results {
    pub fn add(&mut self, description: impl Into<String>, source: &impl HasMetadata) {
        self.causes.push(Cause {
            description: description.into(),
            metadata: source.metadata(),
        });
    }

    pub fn len(&self) -> usize {
        self.causes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.causes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cause> {
        self.causes.iter()
    }
}

impl IntoIterator for Results {
    type Item = Cause;
    type IntoIter = std::vec::IntoIter<Cause>;

    fn into_iter(self) -> Self::IntoIter {
        self.causes.into_iter()
    }
}

/// A reported issue: rule identity and documentation plus the cited location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub rule_id: String,
    pub provider: Provider,
    pub service: String,
    pub short_code: String,
    pub severity: Severity,
    pub summary: String,
    pub resolution: String,
    pub description: String,
    pub location: SourceRange,
    /// Address of the cited block or attribute.
    pub reference: String,
    pub managed: bool,
}

impl Finding {
    pub fn new(definition: &RuleDefinition, cause: Cause) -> Self {
        Self {
            rule_id: definition.long_id(),
            provider: definition.provider,
            service: definition.service.to_string(),
            short_code: definition.short_code.to_string(),
            severity: definition.severity,
            summary: definition.documentation.summary.to_string(),
            resolution: definition.documentation.resolution.to_string(),
            description: cause.description,
            location: cause.metadata.range,
            reference: cause.metadata.reference,
            managed: cause.metadata.managed,
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} {}", self.severity, self.rule_id, self.description)?;
        if !self.location.is_empty() {
            write!(f, " ({})", self.location)?;
        }
        Ok(())
    }
}
