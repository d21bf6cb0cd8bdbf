//! Plugin-based store registry
//!
//! The registry allows store implementations to be registered dynamically
//! at runtime, avoiding hardcoded if-else chains in boundary layers.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use people_core::registry::StoreRegistry;
//! use people_core::config::StoreConfig;
//!
//! let registry = StoreRegistry::with_builtin();
//! registry.register_store("postgres", Box::new(PostgresFactory));
//!
//! let stores = registry.create_stores(&StoreConfig::Memory).await?;
//! ```

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::{FileStoreFactory, MemoryStoreFactory};
use crate::traits::{StoreFactory, StoreHandles};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Store registry for plugin-based store creation
///
/// Maps store type names to factory objects, allowing dynamic
/// instantiation based on [`StoreConfig::type_name`].
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct StoreRegistry {
    factories: RwLock<HashMap<String, Arc<dyn StoreFactory>>>,
}

impl StoreRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the `memory` and `file` stores registered
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_store("memory", Box::new(MemoryStoreFactory));
        registry.register_store("file", Box::new(FileStoreFactory));
        registry
    }

    /// Register a store factory
    ///
    /// # Parameters
    ///
    /// - `name`: Store type name (e.g., "file", "memory")
    /// - `factory`: Factory object for creating store instances
    pub fn register_store(&self, name: impl Into<String>, factory: Box<dyn StoreFactory>) {
        let mut factories = self.factories.write().unwrap_or_else(PoisonError::into_inner);
        factories.insert(name.into(), Arc::from(factory));
    }

    /// Create the store pair described by `config`
    ///
    /// # Returns
    ///
    /// - `Ok(StoreHandles)`: Created stores
    /// - `Err(Error)`: If the config is invalid, the type is not registered,
    ///   or creation fails
    pub async fn create_stores(&self, config: &StoreConfig) -> Result<StoreHandles> {
        config.validate()?;

        let store_type = config.type_name();
        let factory = {
            let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
            factories
                .get(store_type)
                .cloned()
                .ok_or_else(|| Error::config(format!("Unknown store type: {}", store_type)))?
        };

        tracing::debug!("Creating '{}' store", store_type);
        factory.create(config).await
    }

    /// List all registered store types
    pub fn list_stores(&self) -> Vec<String> {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        factories.keys().cloned().collect()
    }

    /// Check if a store type is registered
    pub fn has_store(&self, name: &str) -> bool {
        let factories = self.factories.read().unwrap_or_else(PoisonError::into_inner);
        factories.contains_key(name)
    }
}
