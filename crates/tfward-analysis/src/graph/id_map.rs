//! Orphan tracking for provider adapters.

use tfward_core::FxHashMap;

/// Identifiers of one resource type, each resolved or not.
///
/// Seeded with every identifier of the tracked type, all unresolved. An
/// adapter resolves an identifier when it attaches the block to a parent;
/// whatever is left afterwards is an orphan.
#[derive(Debug, Clone, Default)]
pub struct ResolvedIdMap {
    resource_type: String,
    entries: Vec<(String, bool)>,
    index: FxHashMap<String, usize>,
}

impl ResolvedIdMap {
    pub fn seeded(resource_type: impl Into<String>, ids: impl IntoIterator<Item = String>) -> Self {
        let mut map = Self {
            resource_type: resource_type.into(),
            ..Self::default()
        };
        for id in ids {
            if map.index.contains_key(&id) {
                continue;
            }
            map.index.insert(id.clone(), map.entries.len());
            map.entries.push((id, false));
        }
        map
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Mark `id` resolved. Idempotent. Returns false for identifiers the map
    /// was never seeded with.
    pub fn resolve(&mut self, id: &str) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                self.entries[i].1 = true;
                true
            }
            None => false,
        }
    }

    pub fn is_resolved(&self, id: &str) -> bool {
        self.index.get(id).is_some_and(|&i| self.entries[i].1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Identifiers never resolved, in seed order.
    pub fn orphans(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, resolved)| !resolved)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.entries.iter().filter(|(_, resolved)| *resolved).count()
    }
}
