//! Registry of stable owner type tags.
//!
//! The `owner_type` column must not change when a Rust type is renamed or
//! moved, so owners register a short tag here. Unregistered types fall
//! back to [`std::any::type_name`].

use std::any::TypeId;
use std::collections::HashMap;

/// Mapping from owner types to the tag stored in `owner_type`.
#[derive(Debug, Clone, Default)]
pub struct MorphMap {
    tags: HashMap<TypeId, String>,
}

impl MorphMap {
    /// Empty map; every type resolves to its Rust type name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tag` for `T`, replacing any earlier registration.
    #[must_use]
    pub fn with<T: 'static>(mut self, tag: impl Into<String>) -> Self {
        self.register::<T>(tag);
        self
    }

    /// Register `tag` for `T`, replacing any earlier registration.
    pub fn register<T: 'static>(&mut self, tag: impl Into<String>) {
        self.tags.insert(TypeId::of::<T>(), tag.into());
    }

    /// Tag for `T`, or its type name when unregistered.
    #[must_use]
    pub fn resolve<T: 'static>(&self) -> String {
        self.tags
            .get(&TypeId::of::<T>())
            .cloned()
            .unwrap_or_else(|| std::any::type_name::<T>().to_string())
    }

    /// Whether `T` has an explicit tag.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.tags.contains_key(&TypeId::of::<T>())
    }
}
