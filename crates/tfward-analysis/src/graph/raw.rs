//! Parser hand-off types.
//!
//! The tokenizer/parser lives outside this crate. It hands over one
//! [`RawModule`] per module (root included), with module expansion already
//! materialized into concrete blocks. The types are serde-friendly so the
//! hand-off can also cross a process boundary as JSON.

use serde::{Deserialize, Serialize};

use super::address::{ModulePath, Reference};
use super::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAttribute {
    pub name: String,
    pub value: Value,
    #[serde(default)]
    pub start_line: u32,
    #[serde(default)]
    pub end_line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    pub block_type: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<RawAttribute>,
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
    #[serde(default)]
    pub start_line: u32,
    #[serde(default)]
    pub end_line: u32,
}

impl RawBlock {
    pub fn new<I, S>(block_type: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            block_type: block_type.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            attributes: Vec::new(),
            blocks: Vec::new(),
            start_line: 0,
            end_line: 0,
        }
    }

    /// `resource "<kind>" "<name>" { ... }`
    pub fn resource(kind: &str, name: &str) -> Self {
        Self::new("resource", [kind, name])
    }

    /// `data "<kind>" "<name>" { ... }`
    pub fn data(kind: &str, name: &str) -> Self {
        Self::new("data", [kind, name])
    }

    /// `module "<name>" { ... }`
    pub fn module(name: &str) -> Self {
        Self::new("module", [name])
    }

    /// An unlabelled nested block such as `settings { ... }`.
    pub fn nested(block_type: &str) -> Self {
        Self::new(block_type, std::iter::empty::<String>())
    }

    pub fn at_lines(mut self, start_line: u32, end_line: u32) -> Self {
        self.start_line = start_line;
        self.end_line = end_line;
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.push(RawAttribute {
            name: name.to_string(),
            value: value.into(),
            start_line: 0,
            end_line: 0,
        });
        self
    }

    pub fn with_attr_at(mut self, name: &str, value: impl Into<Value>, line: u32) -> Self {
        self.attributes.push(RawAttribute {
            name: name.to_string(),
            value: value.into(),
            start_line: line,
            end_line: line,
        });
        self
    }

    /// Shorthand for an attribute holding an unevaluated traversal.
    pub fn with_ref(self, name: &str, traversal: &str) -> Self {
        self.with_attr(name, Reference::parse(traversal))
    }

    pub fn with_block(mut self, block: RawBlock) -> Self {
        self.blocks.push(block);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFile {
    pub path: String,
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
}

impl RawFile {
    pub fn new(path: impl Into<String>, blocks: Vec<RawBlock>) -> Self {
        Self {
            path: path.into(),
            blocks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawModule {
    #[serde(default)]
    pub path: ModulePath,
    #[serde(default)]
    pub files: Vec<RawFile>,
}

impl RawModule {
    pub fn root(files: Vec<RawFile>) -> Self {
        Self {
            path: ModulePath::root(),
            files,
        }
    }

    pub fn nested(path: ModulePath, files: Vec<RawFile>) -> Self {
        Self { path, files }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
