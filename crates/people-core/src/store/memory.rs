// # Memory Store
//
// In-memory implementation of PersonStore and AddressStore.
//
// ## Purpose
//
// Provides a simple, fast store that doesn't persist across restarts.
// Useful for testing and for embedding the services in a process that
// owns its own persistence.
//
// ## Crash Behavior
//
// - All records are lost on restart/crash
// - Ids restart from 1

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::records::Records;
use crate::Error;
use crate::config::StoreConfig;
use crate::model::{
    Address, AddressDraft, AddressId, Person, PersonDraft, PersonId, PersonPatch,
};
use crate::traits::{AddressStore, PersonStore, StoreFactory, StoreHandles, WriteBatch};

/// In-memory store implementation
///
/// All records live in tables protected by a single RwLock, so every
/// [`WriteBatch`] is applied under one write guard.
///
/// # Example
///
/// ```rust,no_run
/// use people_core::store::MemoryStore;
/// use people_core::{PersonDraft, PersonStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryStore::new();
///
///     let ana = store.create_person(PersonDraft::new("Ana", "01/02/1990")).await?;
///     assert!(store.exists(ana.id).await?);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Records>>,
}

impl MemoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Records::default())),
        }
    }

    /// Get the number of persons in the store
    pub async fn person_count(&self) -> usize {
        self.inner.read().await.persons().count()
    }

    /// Get the number of addresses in the store
    pub async fn address_count(&self) -> usize {
        self.inner.read().await.addresses().count()
    }

    /// Clear all records from the store
    pub async fn clear(&self) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        *guard = Records::default();
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn exists(&self, id: PersonId) -> Result<bool, Error> {
        let guard = self.inner.read().await;
        Ok(guard.person(id).is_some())
    }

    async fn get_person(&self, id: PersonId) -> Result<Option<Person>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.person(id).cloned())
    }

    async fn create_person(&self, draft: PersonDraft) -> Result<Person, Error> {
        let mut guard = self.inner.write().await;
        guard.create_person(draft)
    }

    async fn save_person(&self, person: &Person) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.save_person(person.clone())
    }

    async fn update_person(
        &self,
        id: PersonId,
        patch: PersonPatch,
    ) -> Result<Option<Person>, Error> {
        let mut guard = self.inner.write().await;
        Ok(guard.update_person(id, patch))
    }

    async fn list_all(&self) -> Result<Vec<Person>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.persons().cloned().collect())
    }
}

#[async_trait]
impl AddressStore for MemoryStore {
    async fn get_address(&self, id: AddressId) -> Result<Option<Address>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.address(id).cloned())
    }

    async fn list_by_person(&self, person_id: PersonId) -> Result<Vec<Address>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.addresses_of(person_id))
    }

    async fn create_address(&self, person_id: PersonId, draft: AddressDraft) -> Result<Address, Error> {
        let mut guard = self.inner.write().await;
        guard.create_address(person_id, draft)
    }

    async fn save_address(&self, address: &Address) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.save_address(address.clone())
    }

    async fn clear_principal_for_person(&self, person_id: PersonId) -> Result<usize, Error> {
        let mut guard = self.inner.write().await;
        Ok(guard.clear_principal(person_id))
    }

    async fn apply(&self, batch: WriteBatch) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.apply(batch)
    }
}

/// Factory registered as `memory` in the store registry
#[derive(Debug, Default)]
pub struct MemoryStoreFactory;

#[async_trait]
impl StoreFactory for MemoryStoreFactory {
    async fn create(&self, config: &StoreConfig) -> Result<StoreHandles, Error> {
        match config {
            StoreConfig::Memory => Ok(StoreHandles::shared(Arc::new(MemoryStore::new()))),
            other => Err(Error::config(format!(
                "Memory store factory cannot build a '{}' store",
                other.type_name()
            ))),
        }
    }
}
