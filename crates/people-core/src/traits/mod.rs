//! Core traits for the people registry
//!
//! This module defines the storage interfaces that the services consume.
//!
//! - [`PersonStore`]: Authoritative storage for person records
//! - [`AddressStore`]: Authoritative storage for address records, keyed by owner
//! - [`StoreFactory`]: Builds both stores from configuration

pub mod address_store;
pub mod person_store;

pub use address_store::{AddressStore, AddressWrite, WriteBatch};
pub use person_store::PersonStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::Result;

/// Pair of store handles handed to the services
///
/// Both handles usually point at the same backing object.
#[derive(Clone)]
pub struct StoreHandles {
    pub persons: Arc<dyn PersonStore>,
    pub addresses: Arc<dyn AddressStore>,
}

impl StoreHandles {
    /// Use a single object as both the person and the address store
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: PersonStore + AddressStore + 'static,
    {
        Self {
            persons: store.clone(),
            addresses: store,
        }
    }
}

impl std::fmt::Debug for StoreHandles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandles").finish_non_exhaustive()
    }
}

/// Helper trait for constructing stores from configuration
#[async_trait]
pub trait StoreFactory: Send + Sync {
    /// Create the store pair described by `config`
    async fn create(&self, config: &StoreConfig) -> Result<StoreHandles>;
}
