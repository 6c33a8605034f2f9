//! File attachment lookup

use crate::types::ContextId;
use std::collections::HashMap;

/// A stored file referenced from a rich-text field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name
    pub name: String,
    /// Directory path inside the file area, e.g. `/`
    pub path: String,
    /// Raw file content
    pub content: Vec<u8>,
    /// Directory entries are listed by some stores and never exported
    pub is_directory: bool,
}

impl Attachment {
    /// Create a file at the root of its area
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            path: "/".to_string(),
            content: content.into(),
            is_directory: false,
        }
    }

    /// Set the directory path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Create a directory entry
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            name: ".".to_string(),
            path: path.into(),
            content: Vec::new(),
            is_directory: true,
        }
    }
}

/// Source of file attachments for a question's fields
pub trait AttachmentSource: Send + Sync {
    /// Files of one area, e.g. component `question`, area `questiontext`,
    /// item = question id
    fn area_files(
        &self,
        context: ContextId,
        component: &str,
        area: &str,
        item_id: u64,
    ) -> Vec<Attachment>;
}

/// Attachment source with no files
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAttachments;

impl AttachmentSource for NoAttachments {
    fn area_files(&self, _: ContextId, _: &str, _: &str, _: u64) -> Vec<Attachment> {
        Vec::new()
    }
}

type AreaKey = (ContextId, String, String, u64);

/// In-memory snapshot of file areas
#[derive(Debug, Default, Clone)]
pub struct MemoryAttachments {
    areas: HashMap<AreaKey, Vec<Attachment>>,
}

impl MemoryAttachments {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to an area
    pub fn insert(
        &mut self,
        context: ContextId,
        component: &str,
        area: &str,
        item_id: u64,
        attachment: Attachment,
    ) {
        self.areas
            .entry((context, component.to_string(), area.to_string(), item_id))
            .or_default()
            .push(attachment);
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with_file(
        mut self,
        context: ContextId,
        component: &str,
        area: &str,
        item_id: u64,
        attachment: Attachment,
    ) -> Self {
        self.insert(context, component, area, item_id, attachment);
        self
    }
}

impl AttachmentSource for MemoryAttachments {
    fn area_files(
        &self,
        context: ContextId,
        component: &str,
        area: &str,
        item_id: u64,
    ) -> Vec<Attachment> {
        self.areas
            .get(&(context, component.to_string(), area.to_string(), item_id))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_lookup_keys() {
        let store = MemoryAttachments::new().with_file(
            ContextId(1),
            "question",
            "questiontext",
            5,
            Attachment::new("a.png", b"png".to_vec()),
        );

        assert_eq!(store.area_files(ContextId(1), "question", "questiontext", 5).len(), 1);
        assert!(store.area_files(ContextId(2), "question", "questiontext", 5).is_empty());
        assert!(store.area_files(ContextId(1), "question", "generalfeedback", 5).is_empty());
        assert!(store.area_files(ContextId(1), "question", "questiontext", 6).is_empty());
    }

    #[test]
    fn test_files_keep_insertion_order() {
        let mut store = MemoryAttachments::new();
        store.insert(ContextId(1), "question", "hint", 3, Attachment::new("b.txt", "b"));
        store.insert(ContextId(1), "question", "hint", 3, Attachment::new("a.txt", "a"));

        let names: Vec<_> = store
            .area_files(ContextId(1), "question", "hint", 3)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn test_no_attachments() {
        assert!(NoAttachments.area_files(ContextId(1), "question", "answer", 1).is_empty());
    }
}
