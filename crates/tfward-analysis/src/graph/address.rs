//! Block addresses, module paths, and reference traversals.
//!
//! A block's address is its stable identifier:
//! `[module.<name>.]*<type>.<name>` for resources, `data.<type>.<name>` for
//! data sources, `module.<name>` for module calls, and
//! `<block_type>[.<label>]*` for any other top-level block.

use serde::{Deserialize, Serialize};

/// Path from the root configuration to a nested module. The root is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModulePath(Vec<String>);

impl ModulePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The module path one level further down.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    /// `module.a.module.b.` for `[a, b]`, empty for the root.
    pub fn address_prefix(&self) -> String {
        let mut prefix = String::new();
        for segment in &self.0 {
            prefix.push_str("module.");
            prefix.push_str(segment);
            prefix.push('.');
        }
        prefix
    }

    /// Qualify a module-local address with this path.
    pub fn qualify(&self, local: &str) -> String {
        format!("{}{}", self.address_prefix(), local)
    }
}

impl std::fmt::Display for ModulePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(self.address_prefix().trim_end_matches('.'))
        }
    }
}

/// Module-local address for a top-level block.
pub fn local_address(block_type: &str, labels: &[String]) -> String {
    match (block_type, labels) {
        ("resource", [kind, name, ..]) => format!("{kind}.{name}"),
        ("data", [kind, name, ..]) => format!("data.{kind}.{name}"),
        ("module", [name, ..]) => format!("module.{name}"),
        (other, labels) => {
            let mut address = other.to_string();
            for label in labels {
                address.push('.');
                address.push_str(label);
            }
            address
        }
    }
}

/// Address for the `index`-th nested block of `block_type` under `parent`.
pub fn nested_address(parent: &str, block_type: &str, index: usize) -> String {
    format!("{parent}.{block_type}[{index}]")
}

/// Roots of traversals that never point at a block.
const NON_BLOCK_ROOTS: &[&str] = &["var", "local", "each", "count", "path", "terraform", "self"];

/// An unevaluated traversal such as `aws_api_gateway_rest_api.example.id`.
///
/// Parsing never fails: traversals that cannot name a block (`var.x`,
/// `local.y`) simply have no target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Reference {
    raw: String,
    module: Option<ModulePath>,
    target: Option<String>,
    attribute: Option<String>,
}

impl Reference {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments: Vec<&str> = raw.split('.').filter(|s| !s.is_empty()).collect();

        let mut module: Option<Vec<String>> = None;
        let mut i = 0;
        // `module.<name>` followed by at least `<type>.<name>` descends into that module.
        while segments.get(i) == Some(&"module") && segments.len() >= i + 4 {
            module.get_or_insert_with(Vec::new).push(segments[i + 1].to_string());
            i += 2;
        }

        let rest = &segments[i.min(segments.len())..];
        let (target, attribute) = match rest {
            ["module", name, tail @ ..] => (Some(format!("module.{name}")), join(tail)),
            ["data", kind, name, tail @ ..] => (Some(format!("data.{kind}.{name}")), join(tail)),
            [root, ..] if NON_BLOCK_ROOTS.contains(&strip_index(root)) => (None, None),
            [kind, name, tail @ ..] => (Some(format!("{kind}.{name}")), join(tail)),
            _ => (None, None),
        };

        Self {
            raw,
            module: module.map(ModulePath),
            target,
            attribute,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Module-local address of the referenced block, if the traversal names one.
    ///
    /// `module.<n>.<a>.<b>` is read as block `<a>.<b>` inside module `<n>`.
    /// The same text is also a valid module output; see
    /// [`Reference::module_output_reading`].
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// The attribute path after the block address (`id`, `name`, ...).
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// True when the traversal spells out the module path itself.
    pub fn is_absolute(&self) -> bool {
        self.module.is_some()
    }

    /// The module-output reading of an absolute traversal:
    /// `module.<n>.<a>.<b>` as output `<a>.<b>` of the call `module.<n>`.
    /// `None` for traversals that are not absolute. The graph falls back to
    /// this reading when no block lives at the absolute address.
    pub fn module_output_reading(&self) -> Option<Reference> {
        self.module.as_ref()?;
        let mut segments = self.raw.split('.').filter(|s| !s.is_empty());
        let (Some("module"), Some(name)) = (segments.next(), segments.next()) else {
            return None;
        };
        let tail: Vec<&str> = segments.collect();
        Some(Self {
            raw: self.raw.clone(),
            module: None,
            target: Some(format!("module.{name}")),
            attribute: join(&tail),
        })
    }

    /// Full graph address of the target, resolving relative traversals against
    /// the module the referencing block lives in.
    pub fn resolve_in(&self, from: &ModulePath) -> Option<String> {
        let target = self.target.as_deref()?;
        let module = self.module.as_ref().unwrap_or(from);
        Some(module.qualify(target))
    }
}

fn strip_index(segment: &str) -> &str {
    segment.split('[').next().unwrap_or(segment)
}

fn join(tail: &[&str]) -> Option<String> {
    if tail.is_empty() {
        None
    } else {
        Some(tail.join("."))
    }
}

impl From<String> for Reference {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<&str> for Reference {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Reference> for String {
    fn from(reference: Reference) -> Self {
        reference.raw
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
