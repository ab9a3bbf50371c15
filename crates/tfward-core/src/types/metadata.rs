//! Source locations and provenance attached to blocks, attributes, and findings.

use serde::{Deserialize, Serialize};

/// Marker reference used by objects synthesized outside any source file.
pub const UNMANAGED_REFERENCE: &str = "<unmanaged>";

/// A file and inclusive line span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub filename: String,
    pub start_line: u32,
    pub end_line: u32,
}

impl SourceRange {
    pub fn new(filename: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            filename: filename.into(),
            start_line,
            end_line: end_line.max(start_line),
        }
    }

    /// True when this range was never given a file (synthetic objects).
    pub fn is_empty(&self) -> bool {
        self.filename.is_empty()
    }
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start_line == self.end_line {
            write!(f, "{}:{}", self.filename, self.start_line)
        } else {
            write!(f, "{}:{}-{}", self.filename, self.start_line, self.end_line)
        }
    }
}

/// Where something came from: its source range, the address used to cite it,
/// and whether it exists in the configuration at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metadata {
    pub range: SourceRange,
    pub reference: String,
    pub managed: bool,
}

impl Metadata {
    pub fn new(range: SourceRange, reference: impl Into<String>) -> Self {
        Self {
            range,
            reference: reference.into(),
            managed: true,
        }
    }

    /// Metadata for an object synthesized by an adapter, e.g. the container
    /// that collects orphaned children.
    pub fn unmanaged() -> Self {
        Self {
            range: SourceRange::default(),
            reference: UNMANAGED_REFERENCE.to_string(),
            managed: false,
        }
    }

    pub fn is_managed(&self) -> bool {
        self.managed
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::unmanaged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_display() {
        assert_eq!(SourceRange::new("main.tf", 3, 3).to_string(), "main.tf:3");
        assert_eq!(SourceRange::new("main.tf", 3, 9).to_string(), "main.tf:3-9");
    }

    #[test]
    fn end_line_never_precedes_start() {
        let range = SourceRange::new("a.tf", 10, 2);
        assert_eq!(range.end_line, 10);
    }

    #[test]
    fn unmanaged_has_no_file() {
        let meta = Metadata::unmanaged();
        assert!(!meta.is_managed());
        assert!(meta.range.is_empty());
        assert_eq!(meta.reference, UNMANAGED_REFERENCE);
    }
}
