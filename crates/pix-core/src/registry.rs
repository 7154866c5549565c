//! # Type Registry
//!
//! Maps a PIX type name to the ordered list of behaviors mixed into objects
//! of that type. Registration order is precedence order: the first behavior
//! registered under a name is consulted first.
//!
//! ## Lifecycle
//!
//! Registrations are expected to happen during start-up, before any data is
//! promoted. Entries are only ever appended, never removed. The map is held
//! behind a `parking_lot::RwLock` so a registry can be shared across threads,
//! but registering while another thread is promoting data means that
//! traversal may observe either the old or the new behavior list.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::object::{Behavior, PixClass};

/// Name-to-behaviors registry.
#[derive(Default)]
pub struct TypeRegistry {
    entries: RwLock<HashMap<String, Vec<Arc<dyn Behavior>>>>,
}

impl TypeRegistry {
    /// Create an empty registry, independent of the process-wide one.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by [`Factory::new`](crate::Factory::new).
    pub fn global() -> Arc<TypeRegistry> {
        static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(TypeRegistry::new())))
    }

    /// Append `behavior` to the list registered under `type_name` and hand
    /// it back unchanged. Registering under an existing name accumulates.
    pub fn register<B: Behavior>(&self, type_name: &str, behavior: Arc<B>) -> Arc<B> {
        let erased: Arc<dyn Behavior> = behavior.clone();
        let mut entries = self.entries.write();
        let bases = entries.entry(type_name.to_string()).or_default();
        bases.push(erased);
        tracing::debug!(
            type_name,
            behavior = behavior.name(),
            position = bases.len() - 1,
            "registered PIX behavior"
        );
        behavior
    }

    /// Build the class for `type_name`. Unregistered names fall back to the
    /// default base; absence of a registration is not an error.
    pub fn synthesize(&self, type_name: &str) -> PixClass {
        let bases = self.bases_for(type_name);
        tracing::trace!(type_name, bases = bases.len(), "synthesized PIX class");
        PixClass::new(type_name, bases)
    }

    /// Behaviors registered under `type_name`, in precedence order.
    pub fn bases_for(&self, type_name: &str) -> Vec<Arc<dyn Behavior>> {
        self.entries
            .read()
            .get(type_name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.entries.read().contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn registered_types(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}

/// Register `behavior` under `type_name` in the process-wide registry.
pub fn register<B: Behavior>(type_name: &str, behavior: B) -> Arc<B> {
    TypeRegistry::global().register(type_name, Arc::new(behavior))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::DEFAULT_BASE_NAME;

    struct Tagged(&'static str);

    impl Behavior for Tagged {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn register_returns_the_same_behavior() {
        let registry = TypeRegistry::new();
        let behavior = Arc::new(Tagged("Image"));
        let returned = registry.register("PIXImage", Arc::clone(&behavior));
        assert!(Arc::ptr_eq(&behavior, &returned));
    }

    #[test]
    fn registrations_accumulate_in_order() {
        let registry = TypeRegistry::new();
        registry.register("PIXImage", Arc::new(Tagged("B1")));
        registry.register("PIXImage", Arc::new(Tagged("B2")));
        registry.register("PIXClip", Arc::new(Tagged("C1")));

        let class = registry.synthesize("PIXImage");
        assert_eq!(class.name(), "PIXImage");
        assert_eq!(class.base_names(), vec!["B1", "B2"]);
        assert!(!class.is_default());

        let again = registry.synthesize("PIXImage");
        assert_eq!(again.base_names(), class.base_names());
        assert_eq!(registry.registered_types(), vec!["PIXClip", "PIXImage"]);
    }

    #[test]
    fn unregistered_name_falls_back_to_default_base() {
        let registry = TypeRegistry::new();
        let class = registry.synthesize("Unknown");
        assert_eq!(class.name(), "Unknown");
        assert!(class.is_default());
        assert_eq!(class.base_names(), vec![DEFAULT_BASE_NAME]);
        assert!(!registry.is_registered("Unknown"));
    }

    #[test]
    fn global_registry_is_shared() {
        let behavior = register("GlobalRegistryProbe", Tagged("Probe"));
        assert_eq!(behavior.name(), "Probe");
        assert!(TypeRegistry::global().is_registered("GlobalRegistryProbe"));
        assert_eq!(
            TypeRegistry::global().synthesize("GlobalRegistryProbe").base_names(),
            vec!["Probe"]
        );
    }
}
