//! Tag catalog.

use crate::models::{Tag, TagId};

/// Ordered tag definitions. Catalog order decides shortcut collisions.
#[derive(Debug, Clone, Default)]
pub struct TagCatalog {
    tags: Vec<Tag>,
}

impl TagCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, id: TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TagId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get_mut(&mut self, id: TagId) -> Option<&mut Tag> {
        self.tags.iter_mut().find(|t| t.id == id)
    }

    pub(crate) fn insert(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    pub(crate) fn remove(&mut self, id: TagId) -> Option<Tag> {
        let index = self.tags.iter().position(|t| t.id == id)?;
        Some(self.tags.remove(index))
    }

    /// First tag (in catalog order) bound to `key`.
    pub fn find_by_shortcut(&self, key: char) -> Option<&Tag> {
        self.tags.iter().find(|t| t.matches_shortcut(key))
    }

    pub(crate) fn increment_usage(&mut self, id: TagId) {
        if let Some(tag) = self.get_mut(id) {
            tag.usage_count += 1;
        }
    }

    /// Decrement the usage count, floored at zero.
    pub(crate) fn decrement_usage(&mut self, id: TagId) {
        if let Some(tag) = self.get_mut(id) {
            tag.usage_count = tag.usage_count.saturating_sub(1);
        }
    }
}
