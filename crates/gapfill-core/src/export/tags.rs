//! Tag lookup

use std::collections::HashMap;

/// Source of tags attached to an entity
pub trait TagSource: Send + Sync {
    /// Tags of the entity `kind` (e.g. `question`) with the given id
    fn tags(&self, kind: &str, id: u64) -> Vec<String>;
}

/// Tag source with no tags
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTags;

impl TagSource for NoTags {
    fn tags(&self, _kind: &str, _id: u64) -> Vec<String> {
        Vec::new()
    }
}

/// In-memory snapshot of tags
#[derive(Debug, Default, Clone)]
pub struct MemoryTags {
    tags: HashMap<(String, u64), Vec<String>>,
}

impl MemoryTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a tag to an entity
    pub fn tag(mut self, kind: &str, id: u64, tag: impl Into<String>) -> Self {
        self.tags
            .entry((kind.to_string(), id))
            .or_default()
            .push(tag.into());
        self
    }
}

impl TagSource for MemoryTags {
    fn tags(&self, kind: &str, id: u64) -> Vec<String> {
        self.tags
            .get(&(kind.to_string(), id))
            .cloned()
            .unwrap_or_default()
    }
}
