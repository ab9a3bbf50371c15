//! Configuration graph: values, blocks, the module graph, and reference resolution.
//!
//! - `value.rs`: closed set of attribute value variants with total conversions
//! - `address.rs`: block addresses, module paths, reference traversals
//! - `attribute.rs`: attributes, the nil-safe `Attr` view, adapter-side `Typed<T>`
//! - `block.rs`: blocks and the nil sentinel
//! - `raw.rs`: parser hand-off types
//! - `module_graph.rs`: the block arena with type and reference indexes
//! - `resolver.rs`: `get_referencing_resources`
//! - `id_map.rs`: resolved-ID maps for orphan tracking

pub mod address;
pub mod attribute;
pub mod block;
pub mod id_map;
pub mod module_graph;
pub mod raw;
mod resolver;
pub mod value;

pub use address::{ModulePath, Reference};
pub use attribute::{Attr, Attribute, BoolValue, IntValue, StringValue, Typed};
pub use block::Block;
pub use id_map::ResolvedIdMap;
pub use module_graph::{GraphDiagnostic, ModuleGraph};
pub use raw::{RawAttribute, RawBlock, RawFile, RawModule};
pub use value::{Value, ValueKind};
