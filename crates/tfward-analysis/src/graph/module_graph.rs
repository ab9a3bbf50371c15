//! The module graph: an arena of every top-level block across the root
//! configuration and its nested modules, with type and reference indexes.
//!
//! Built once, synchronously, before any rule runs; read-only afterwards, so
//! it can be shared across scan workers without locking.

use std::collections::BTreeMap;

use smallvec::SmallVec;
use tfward_core::{FxHashMap, SourceRange};

use super::address::{local_address, nested_address, ModulePath, Reference};
use super::attribute::Attribute;
use super::block::Block;
use super::id_map::ResolvedIdMap;
use super::raw::{RawAttribute, RawBlock, RawModule};
use super::value::Value;

/// Arena index of a top-level block. Encounter order.
pub(crate) type BlockIndex = usize;

/// A problem found while building the graph. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphDiagnostic {
    pub address: String,
    pub range: SourceRange,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ModuleGraph {
    pub(crate) blocks: Vec<Block>,
    pub(crate) by_address: FxHashMap<String, BlockIndex>,
    /// `resource`, `data`, `module`, ... → blocks.
    pub(crate) by_block_type: FxHashMap<String, Vec<BlockIndex>>,
    /// Resource type label → `resource` blocks.
    pub(crate) by_resource_type: FxHashMap<String, Vec<BlockIndex>>,
    /// Target address → (referencing block, attribute name) for traversal values.
    pub(crate) references: FxHashMap<String, Vec<(BlockIndex, String)>>,
    pub(crate) modules: Vec<ModulePath>,
    pub(crate) diagnostics: Vec<GraphDiagnostic>,
}

impl ModuleGraph {
    /// Build a graph from parsed modules. Encounter order is module order,
    /// then file order, then block order within each file.
    pub fn from_modules(modules: impl IntoIterator<Item = RawModule>) -> Self {
        let mut graph = Self::default();
        for module in modules {
            graph.add_module(module);
        }
        graph.index_references();
        tracing::debug!(
            blocks = graph.blocks.len(),
            modules = graph.modules.len(),
            reference_targets = graph.references.len(),
            "module graph built"
        );
        graph
    }

    /// Convenience for a root-only configuration held in a single file.
    pub fn from_blocks(filename: &str, blocks: Vec<RawBlock>) -> Self {
        Self::from_modules([RawModule::root(vec![super::raw::RawFile::new(filename, blocks)])])
    }

    fn add_module(&mut self, module: RawModule) {
        if !self.modules.contains(&module.path) {
            self.modules.push(module.path.clone());
        }
        for file in module.files {
            for raw in file.blocks {
                self.add_top_level(raw, &module.path, &file.path);
            }
        }
    }

    fn add_top_level(&mut self, raw: RawBlock, module: &ModulePath, filename: &str) {
        let address = module.qualify(&local_address(&raw.block_type, &raw.labels));
        if let Some(&existing) = self.by_address.get(&address) {
            let range = SourceRange::new(filename, raw.start_line, raw.end_line);
            tracing::warn!(
                address = %address,
                first = %self.blocks[existing].range,
                duplicate = %range,
                "duplicate block identifier, keeping the first declaration"
            );
            self.diagnostics.push(GraphDiagnostic {
                message: format!(
                    "block '{address}' is declared more than once; first declared at {}",
                    self.blocks[existing].range
                ),
                address,
                range,
            });
            return;
        }

        let block = convert(raw, address.clone(), module, filename);
        let index = self.blocks.len();

        self.by_block_type
            .entry(block.block_type.clone())
            .or_default()
            .push(index);
        if block.block_type == "resource" {
            self.by_resource_type
                .entry(block.type_label().to_string())
                .or_default()
                .push(index);
        }
        self.by_address.insert(address, index);
        self.blocks.push(block);
    }

    // ---- Lookups ----

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Every top-level block, in encounter order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn modules(&self) -> &[ModulePath] {
        &self.modules
    }

    pub fn diagnostics(&self) -> &[GraphDiagnostic] {
        &self.diagnostics
    }

    /// All `resource` blocks of `resource_type` across every module, in encounter order.
    pub fn get_resources_by_type(&self, resource_type: &str) -> Vec<&Block> {
        self.collect(self.by_resource_type.get(resource_type))
    }

    /// All top-level blocks whose block type is `block_type` (`resource`, `data`, ...).
    pub fn get_blocks_by_type(&self, block_type: &str) -> Vec<&Block> {
        self.collect(self.by_block_type.get(block_type))
    }

    /// Top-level blocks matching any of `block_types`, in encounter order.
    /// An empty slice matches every block.
    pub fn get_blocks_by_types(&self, block_types: &[&str]) -> Vec<&Block> {
        if block_types.is_empty() {
            return self.blocks.iter().collect();
        }
        let mut indices: Vec<BlockIndex> = block_types
            .iter()
            .filter_map(|t| self.by_block_type.get(*t))
            .flatten()
            .copied()
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices.into_iter().map(|i| &self.blocks[i]).collect()
    }

    pub fn get_block_by_id(&self, id: &str) -> Option<&Block> {
        self.by_address.get(id).map(|&i| &self.blocks[i])
    }

    /// Direct identifier lookup. Unknown identifiers are skipped.
    pub fn get_resource_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&Block> {
        ids.iter()
            .filter_map(|id| self.get_block_by_id(id.as_ref()))
            .collect()
    }

    /// A resolved-ID map seeded with every `resource_type` identifier, all unresolved.
    pub fn get_child_resource_id_map_by_type(&self, resource_type: &str) -> ResolvedIdMap {
        ResolvedIdMap::seeded(
            resource_type,
            self.get_resources_by_type(resource_type)
                .into_iter()
                .map(|b| b.id().to_string()),
        )
    }

    /// Full address a traversal points at from `from`. An absolute
    /// `module.<n>.<a>.<b>` traversal falls back to the module call
    /// `module.<n>` when no block lives at the absolute address.
    pub(crate) fn resolve_reference(&self, reference: &Reference, from: &ModulePath) -> Option<String> {
        let target = reference.resolve_in(from)?;
        if self.by_address.contains_key(&target) {
            return Some(target);
        }
        match reference
            .module_output_reading()
            .and_then(|output| output.resolve_in(from))
        {
            Some(call) if self.by_address.contains_key(&call) => Some(call),
            _ => Some(target),
        }
    }

    /// Runs once every block is known, so traversal targets can be checked
    /// against the address index.
    fn index_references(&mut self) {
        let mut references: FxHashMap<String, Vec<(BlockIndex, String)>> = FxHashMap::default();
        for (index, block) in self.blocks.iter().enumerate() {
            for attr in block.attributes.values() {
                let mut targets: SmallVec<[String; 2]> = SmallVec::new();
                self.collect_targets(&attr.value, &block.module, &mut targets);
                for target in targets {
                    let entries = references.entry(target).or_default();
                    if !entries.iter().any(|(i, name)| *i == index && *name == attr.name) {
                        entries.push((index, attr.name.clone()));
                    }
                }
            }
        }
        self.references = references;
    }

    fn collect_targets(&self, value: &Value, module: &ModulePath, out: &mut SmallVec<[String; 2]>) {
        match value {
            Value::Reference(r) => {
                if let Some(target) = self.resolve_reference(r, module) {
                    out.push(target);
                }
            }
            Value::List(items) => {
                for item in items {
                    self.collect_targets(item, module, out);
                }
            }
            _ => {}
        }
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<BlockIndex> {
        self.by_address.get(id).copied()
    }

    fn collect(&self, indices: Option<&Vec<BlockIndex>>) -> Vec<&Block> {
        indices
            .map(|ix| ix.iter().map(|&i| &self.blocks[i]).collect())
            .unwrap_or_default()
    }
}

fn convert(raw: RawBlock, address: String, module: &ModulePath, filename: &str) -> Block {
    let range = SourceRange::new(filename, raw.start_line, raw.end_line);

    let mut attributes = BTreeMap::new();
    for RawAttribute {
        name,
        value,
        start_line,
        end_line,
    } in raw.attributes
    {
        let attr_range = if start_line == 0 {
            range.clone()
        } else {
            SourceRange::new(filename, start_line, end_line)
        };
        let attribute = Attribute {
            reference: format!("{address}.{name}"),
            name: name.clone(),
            value,
            range: attr_range,
            defaulted: false,
        };
        // Last declaration wins, as it would after the parser merges duplicates.
        attributes.insert(name, attribute);
    }

    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    let blocks = raw
        .blocks
        .into_iter()
        .map(|child| {
            let n = counts.entry(child.block_type.clone()).or_insert(0);
            let child_address = nested_address(&address, &child.block_type, *n);
            *n += 1;
            convert(child, child_address, module, filename)
        })
        .collect();

    Block {
        block_type: raw.block_type,
        labels: raw.labels.into_iter().collect(),
        attributes,
        blocks,
        address,
        module: module.clone(),
        range,
        nil: false,
    }
}
