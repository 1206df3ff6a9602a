//! Schema Registry - resolve server type tags to record schemas
//!
//! The registry is an explicit value: built once by the client and shared
//! read-only with every resource it hands out.

use super::SchemaKind;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Separator between segments of a hierarchical type tag, most specific last
const TAG_SEPARATOR: char = '/';

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: HashMap<String, SchemaKind>,
}

impl SchemaRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with every geometry schema
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for kind in SchemaKind::GEOMETRY {
            registry.register(kind.tag(), *kind);
        }
        registry
    }

    /// Build a registry from explicit entries, rejecting repeated tags
    pub fn from_entries<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, SchemaKind)>,
    {
        let mut registry = Self::new();
        for (tag, kind) in entries {
            registry.try_register(tag, kind)?;
        }
        Ok(registry)
    }

    /// Insert `tag -> kind`. The last registration for a tag wins; the
    /// replaced schema is returned.
    pub fn register(&mut self, tag: &str, kind: SchemaKind) -> Option<SchemaKind> {
        let key = tag.to_lowercase();
        let previous = self.entries.insert(key, kind);
        if let Some(previous) = previous {
            if previous != kind {
                tracing::warn!(
                    "Schema for type tag '{}' replaced: {:?} -> {:?}",
                    tag,
                    previous,
                    kind
                );
            }
        }
        previous
    }

    /// Insert `tag -> kind`, failing if the tag is already registered
    pub fn try_register(&mut self, tag: &str, kind: SchemaKind) -> Result<()> {
        let key = tag.to_lowercase();
        if self.entries.contains_key(&key) {
            return Err(Error::DuplicateSchema(key));
        }
        self.entries.insert(key, kind);
        Ok(())
    }

    /// Resolve a server-supplied type tag.
    ///
    /// Hierarchical tags (`"a/b/c"`) are tried from the most specific segment
    /// to the least specific one; the first registered segment wins.
    pub fn resolve(&self, type_tag: &str) -> Option<SchemaKind> {
        type_tag
            .rsplit(TAG_SEPARATOR)
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .find_map(|segment| self.entries.get(&segment.to_lowercase()).copied())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered tags (for diagnostics and completion)
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.entries.keys().map(|s| s.as_str()).collect();
        tags.sort_unstable();
        tags
    }
}
