//! Test doubles and common utilities for the contract tests
//!
//! The doubles wrap a real `MemoryStore` and only add call counting or
//! injected failures, so the behavior under test is the store's own.

#![allow(dead_code)]

use async_trait::async_trait;
use people_core::error::Result;
use people_core::store::MemoryStore;
use people_core::traits::{AddressStore, PersonStore, WriteBatch};
use people_core::{
    Address, AddressDraft, AddressId, AddressPrincipalManager, Error, Person, PersonDraft,
    PersonId, PersonPatch, PersonService,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// An AddressStore that counts mutating calls and can be told to fail batches
pub struct RecordingAddressStore {
    inner: Arc<MemoryStore>,
    writes: AtomicUsize,
    fail_batches: AtomicBool,
}

impl RecordingAddressStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            writes: AtomicUsize::new(0),
            fail_batches: AtomicBool::new(false),
        }
    }

    /// Number of mutating calls that reached the store
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every following `apply` fail without touching the tables
    pub fn fail_batches(&self, fail: bool) {
        self.fail_batches.store(fail, Ordering::SeqCst);
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AddressStore for RecordingAddressStore {
    async fn get_address(&self, id: AddressId) -> Result<Option<Address>> {
        self.inner.get_address(id).await
    }

    async fn list_by_person(&self, person_id: PersonId) -> Result<Vec<Address>> {
        self.inner.list_by_person(person_id).await
    }

    async fn create_address(&self, person_id: PersonId, draft: AddressDraft) -> Result<Address> {
        self.record_write();
        self.inner.create_address(person_id, draft).await
    }

    async fn save_address(&self, address: &Address) -> Result<()> {
        self.record_write();
        self.inner.save_address(address).await
    }

    async fn clear_principal_for_person(&self, person_id: PersonId) -> Result<usize> {
        self.record_write();
        self.inner.clear_principal_for_person(person_id).await
    }

    async fn apply(&self, batch: WriteBatch) -> Result<()> {
        self.record_write();
        if self.fail_batches.load(Ordering::SeqCst) {
            return Err(Error::store("injected batch failure"));
        }
        self.inner.apply(batch).await
    }
}

/// A PersonStore that yields to the scheduler before every call
///
/// Widens the window between a read and a write issued by the same caller,
/// so interleavings that a single-threaded run would hide show up.
pub struct YieldingPersonStore {
    inner: Arc<MemoryStore>,
}

impl YieldingPersonStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl PersonStore for YieldingPersonStore {
    async fn exists(&self, id: PersonId) -> Result<bool> {
        tokio::task::yield_now().await;
        self.inner.exists(id).await
    }

    async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
        tokio::task::yield_now().await;
        self.inner.get_person(id).await
    }

    async fn create_person(&self, draft: PersonDraft) -> Result<Person> {
        tokio::task::yield_now().await;
        self.inner.create_person(draft).await
    }

    async fn save_person(&self, person: &Person) -> Result<()> {
        tokio::task::yield_now().await;
        self.inner.save_person(person).await
    }

    async fn update_person(&self, id: PersonId, patch: PersonPatch) -> Result<Option<Person>> {
        tokio::task::yield_now().await;
        self.inner.update_person(id, patch).await
    }

    async fn list_all(&self) -> Result<Vec<Person>> {
        tokio::task::yield_now().await;
        self.inner.list_all().await
    }
}

/// Stores and services wired together for a test
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub addresses: Arc<RecordingAddressStore>,
    pub manager: AddressPrincipalManager,
    pub persons: PersonService,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let addresses = Arc::new(RecordingAddressStore::new(store.clone()));
        let manager = AddressPrincipalManager::new(store.clone(), addresses.clone());
        let persons = PersonService::new(store.clone());
        Self {
            store,
            addresses,
            manager,
            persons,
        }
    }

    /// Person 1 with addresses 10 and 11, neither principal
    pub async fn with_two_addresses() -> Self {
        let fixture = Self::new();
        fixture.seed_person(1, "Ana", "01/02/1990").await;
        fixture.seed_address(10, 1, "Rua A").await;
        fixture.seed_address(11, 1, "Rua B").await;
        fixture
    }

    pub async fn seed_person(&self, id: i64, name: &str, birth_date: &str) -> Person {
        let person = Person {
            id: PersonId(id),
            name: name.to_string(),
            birth_date: birth_date.to_string(),
        };
        self.store.save_person(&person).await.unwrap();
        person
    }

    /// Seed directly into the backing store, bypassing the write counter
    pub async fn seed_address(&self, id: i64, person_id: i64, street: &str) -> Address {
        let address = Address::from_draft(
            AddressId(id),
            PersonId(person_id),
            AddressDraft::new(street, "50000-000", "10", "Recife"),
        );
        self.store.save_address(&address).await.unwrap();
        address
    }

    /// Seed an address already flagged principal, bypassing the manager
    pub async fn seed_principal_address(&self, id: i64, person_id: i64, street: &str) -> Address {
        let address = Address {
            principal: true,
            ..Address::from_draft(
                AddressId(id),
                PersonId(person_id),
                AddressDraft::new(street, "50000-000", "10", "Recife"),
            )
        };
        self.store.save_address(&address).await.unwrap();
        address
    }

    pub async fn address(&self, id: i64) -> Address {
        self.store
            .get_address(AddressId(id))
            .await
            .unwrap()
            .expect("seeded address exists")
    }

    /// Ids of the person's addresses currently flagged principal
    pub async fn principal_ids(&self, person_id: i64) -> Vec<AddressId> {
        self.store
            .list_by_person(PersonId(person_id))
            .await
            .unwrap()
            .into_iter()
            .filter(|a| a.principal)
            .map(|a| a.id)
            .collect()
    }
}

pub fn draft(street: &str) -> AddressDraft {
    AddressDraft::new(street, "50000-000", "10", "Recife")
}
