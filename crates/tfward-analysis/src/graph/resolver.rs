//! Reference resolution: which blocks of a given type point at a target block.
//!
//! An attribute on block `B` resolves to target `T` when its value is a
//! traversal whose target address (relative to `B`'s module unless absolute)
//! is `T`'s address, or a string literal equal to `T`'s address, or a string
//! literal equal to `T`'s own `id`, `name`, or same-named attribute. Lists
//! resolve when any element does. Resolution is one hop, so reference cycles
//! cannot recurse.

use smallvec::SmallVec;
use tfward_core::FxHashSet;

use super::block::Block;
use super::module_graph::{BlockIndex, ModuleGraph};
use super::value::Value;

/// Literal attributes on a target that referencing blocks may match by value.
const IDENTITY_ATTRIBUTES: &[&str] = &["id", "name"];

impl ModuleGraph {
    /// Every `resource` block of `ref_type` whose `ref_attr` resolves to `target`,
    /// in encounter order. The target itself is never included.
    pub fn get_referencing_resources(
        &self,
        target: &Block,
        ref_type: &str,
        ref_attr: &str,
    ) -> Vec<&Block> {
        if target.is_nil() {
            return Vec::new();
        }

        let mut hits: FxHashSet<BlockIndex> = FxHashSet::default();

        if let Some(entries) = self.references.get(target.id()) {
            hits.extend(
                entries
                    .iter()
                    .filter(|(i, attr)| attr == ref_attr && self.blocks[*i].is_resource_type(ref_type))
                    .map(|(i, _)| *i),
            );
        }

        let keys = literal_keys(target, ref_attr);
        if let Some(candidates) = self.by_resource_type.get(ref_type) {
            for &i in candidates {
                if hits.contains(&i) {
                    continue;
                }
                if let Some(attr) = self.blocks[i].attributes.get(ref_attr) {
                    if literal_matches(&attr.value, &keys) {
                        hits.insert(i);
                    }
                }
            }
        }

        if let Some(own) = self.index_of(target.id()) {
            hits.remove(&own);
        }

        let mut ordered: Vec<BlockIndex> = hits.into_iter().collect();
        ordered.sort_unstable();
        ordered.into_iter().map(|i| &self.blocks[i]).collect()
    }

    /// Direct check of whether `block.attr` resolves to `target`, without the
    /// reference index.
    pub fn attribute_resolves_to(&self, block: &Block, attr: &str, target: &Block) -> bool {
        if target.is_nil() || block.id() == target.id() {
            return false;
        }
        let Some(attribute) = block.attributes.get(attr) else {
            return false;
        };
        let keys = literal_keys(target, attr);
        self.value_resolves(&attribute.value, block, target.id(), &keys)
    }

    fn value_resolves(&self, value: &Value, from: &Block, target_id: &str, keys: &[&str]) -> bool {
        match value {
            Value::Reference(r) => self.resolve_reference(r, from.module()).as_deref() == Some(target_id),
            Value::String(s) => !s.is_empty() && keys.contains(&s.as_str()),
            Value::List(items) => items.iter().any(|v| self.value_resolves(v, from, target_id, keys)),
            _ => false,
        }
    }
}

/// The strings a literal attribute may equal to point at `target`.
fn literal_keys<'a>(target: &'a Block, ref_attr: &str) -> SmallVec<[&'a str; 4]> {
    let mut keys: SmallVec<[&'a str; 4]> = SmallVec::new();
    keys.push(target.id());
    for name in IDENTITY_ATTRIBUTES {
        push_literal(&mut keys, target, name);
    }
    push_literal(&mut keys, target, ref_attr);
    keys
}

fn push_literal<'a>(keys: &mut SmallVec<[&'a str; 4]>, target: &'a Block, name: &str) {
    if let Some(Value::String(s)) = target.attributes.get(name).map(|a| &a.value) {
        if !s.is_empty() && !keys.contains(&s.as_str()) {
            keys.push(s.as_str());
        }
    }
}

fn literal_matches(value: &Value, keys: &[&str]) -> bool {
    match value {
        Value::String(s) => !s.is_empty() && keys.contains(&s.as_str()),
        Value::List(items) => items.iter().any(|v| literal_matches(v, keys)),
        _ => false,
    }
}
