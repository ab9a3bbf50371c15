//! Blocks: typed, labelled configuration nodes with attributes and children.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use smallvec::SmallVec;
use tfward_core::{Metadata, SourceRange};

use super::address::ModulePath;
use super::attribute::{Attr, Attribute};
use super::value::Value;

/// Returned by [`Block::get_block`] when no nested block matches.
static NIL_BLOCK: LazyLock<Block> = LazyLock::new(Block::nil);

/// A parsed configuration node (`resource`, `data`, `module`, or any nested block).
///
/// Blocks are immutable once the graph is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub(crate) block_type: String,
    pub(crate) labels: SmallVec<[String; 2]>,
    pub(crate) attributes: BTreeMap<String, Attribute>,
    pub(crate) blocks: Vec<Block>,
    pub(crate) address: String,
    pub(crate) module: ModulePath,
    pub(crate) range: SourceRange,
    pub(crate) nil: bool,
}

impl Block {
    fn nil() -> Self {
        Self {
            block_type: String::new(),
            labels: SmallVec::new(),
            attributes: BTreeMap::new(),
            blocks: Vec::new(),
            address: String::new(),
            module: ModulePath::root(),
            range: SourceRange::default(),
            nil: true,
        }
    }

    /// Stable identifier (the block's address), unique within its graph.
    pub fn id(&self) -> &str {
        &self.address
    }

    pub fn block_type(&self) -> &str {
        &self.block_type
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// First label: the resource or data-source type.
    pub fn type_label(&self) -> &str {
        self.labels.first().map(String::as_str).unwrap_or_default()
    }

    /// Second label: the resource or data-source name.
    pub fn name_label(&self) -> &str {
        self.labels.get(1).map(String::as_str).unwrap_or_default()
    }

    pub fn module(&self) -> &ModulePath {
        &self.module
    }

    pub fn range(&self) -> &SourceRange {
        &self.range
    }

    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::new(self.range.clone(), self.address.clone());
        metadata.managed = !self.nil;
        metadata
    }

    pub fn is_nil(&self) -> bool {
        self.nil
    }

    pub fn is_not_nil(&self) -> bool {
        !self.nil
    }

    /// True for `resource "<resource_type>" "..."` blocks.
    pub fn is_resource_type(&self, resource_type: &str) -> bool {
        self.block_type == "resource" && self.type_label() == resource_type
    }

    // ---- Attributes ----

    /// Nil-safe read of an attribute.
    pub fn get_attribute(&self, name: &str) -> Attr<'_> {
        Attr::new(self, self.attributes.get(name))
    }

    /// Presence query for checks that must distinguish "absent" from
    /// "present and equal to the default".
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// The literal when present and convertible to the fallback's kind,
    /// otherwise `fallback` marked as defaulted. Never fails.
    pub fn get(&self, name: &str, fallback: impl Into<Value>) -> Attribute {
        let fallback = fallback.into();
        if let Some(attr) = self.attributes.get(name) {
            if let Some(value) = attr.value.coerce(fallback.kind()) {
                return Attribute {
                    value,
                    ..attr.clone()
                };
            }
        }
        Attribute {
            name: name.to_string(),
            value: fallback,
            range: self.range.clone(),
            reference: format!("{}.{}", self.address, name),
            defaulted: true,
        }
    }

    /// Attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    // ---- Nested blocks ----

    /// First nested block named `name`, or a nil sentinel whose reads all default.
    pub fn get_block(&self, name: &str) -> &Block {
        self.blocks
            .iter()
            .find(|b| b.block_type == name)
            .unwrap_or(&*NIL_BLOCK)
    }

    /// Every nested block named `name`, in source order.
    pub fn get_blocks<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.blocks.iter().filter(move |b| b.block_type == name)
    }

    pub fn has_block(&self, name: &str) -> bool {
        self.blocks.iter().any(|b| b.block_type == name)
    }

    pub fn children(&self) -> &[Block] {
        &self.blocks
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.nil {
            f.write_str("<nil>")
        } else {
            f.write_str(&self.address)
        }
    }
}
