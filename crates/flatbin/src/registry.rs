// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide type descriptor registry.
//!
//! The wire format carries no schema, so emit and parse must agree on one
//! descriptor per type name. The registry is insert-if-absent: a name can
//! never be rebound to a structurally different descriptor, which pins the
//! field order and classification for the process lifetime.

use crate::descriptor::TypeDescriptor;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Errors for registry operations.
#[derive(Debug)]
pub enum RegistryError {
    /// Descriptors without a name cannot be registered.
    Anonymous,
    /// The name is already bound to a structurally different descriptor.
    Conflict(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "cannot register an unnamed type"),
            Self::Conflict(name) => {
                write!(f, "type {} already registered with a different shape", name)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Concurrent name-to-descriptor map.
#[derive(Debug, Default)]
pub struct Registry {
    types: DashMap<String, Arc<TypeDescriptor>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            types: DashMap::new(),
        }
    }

    /// Register a descriptor under its own name.
    ///
    /// Registering the same structure twice returns the first `Arc`;
    /// registering a different structure under a taken name fails.
    pub fn register(&self, descriptor: TypeDescriptor) -> Result<Arc<TypeDescriptor>, RegistryError> {
        if descriptor.name.is_empty() {
            return Err(RegistryError::Anonymous);
        }

        match self.types.entry(descriptor.name.clone()) {
            Entry::Occupied(entry) => {
                if **entry.get() == descriptor {
                    Ok(entry.get().clone())
                } else {
                    Err(RegistryError::Conflict(descriptor.name))
                }
            }
            Entry::Vacant(entry) => {
                log::debug!("[registry] registered type {}", descriptor.name);
                let arc = Arc::new(descriptor);
                entry.insert(arc.clone());
                Ok(arc)
            }
        }
    }

    /// Look up a descriptor by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(name).map(|entry| entry.clone())
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Process-wide registry shared by all callers.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TypeDescriptorBuilder;
    use crate::descriptor::PrimitiveKind;

    fn point_desc(name: &str) -> TypeDescriptor {
        TypeDescriptorBuilder::new(name)
            .field("x", PrimitiveKind::I32)
            .field("y", PrimitiveKind::I32)
            .build()
    }

    #[test]
    fn test_register_and_lookup() {
        let reg = Registry::new();
        let desc = reg.register(point_desc("RegPoint")).expect("register");
        let found = reg.lookup("RegPoint").expect("lookup");
        assert!(Arc::ptr_eq(&desc, &found));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_reregister_same_shape_returns_original() {
        let reg = Registry::new();
        let first = reg.register(point_desc("SamePoint")).expect("register");
        let second = reg.register(point_desc("SamePoint")).expect("re-register");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_conflicting_shape_is_rejected() {
        let reg = Registry::new();
        reg.register(point_desc("Pinned")).expect("register");

        // Same field types, different declared order: a different type.
        let swapped = TypeDescriptorBuilder::new("Pinned")
            .field("y", PrimitiveKind::I32)
            .field("x", PrimitiveKind::I32)
            .build();
        assert!(matches!(
            reg.register(swapped),
            Err(RegistryError::Conflict(_))
        ));
    }

    #[test]
    fn test_process_wide_registry_is_shared() {
        let desc = registry()
            .register(point_desc("GlobalPoint"))
            .expect("register");
        let found = registry().lookup("GlobalPoint").expect("lookup");
        assert!(Arc::ptr_eq(&desc, &found));
        assert!(std::ptr::eq(registry(), registry()));
    }

    #[test]
    fn test_anonymous_is_rejected() {
        let reg = Registry::new();
        let anon = TypeDescriptorBuilder::new("")
            .field("x", PrimitiveKind::I32)
            .build();
        assert!(matches!(reg.register(anon), Err(RegistryError::Anonymous)));
    }
}
