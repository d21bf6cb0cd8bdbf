// # Address Store Trait
//
// Defines the interface for authoritative storage of address records.
//
// Every address carries the id of its owning person, and the store keeps a
// lookup by owner (`list_by_person`). The store knows nothing about
// principal-address rules: it offers the primitives (`clear_principal_for_person`,
// `save_address`) and an atomic batch (`apply`) that the
// `AddressPrincipalManager` composes into a transition.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Address, AddressDraft, AddressId, PersonId};

/// A single write inside a [`WriteBatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressWrite {
    /// Set `principal = false` on every address owned by the person
    ClearPrincipal(PersonId),
    /// Create or overwrite the address stored under `address.id`
    Save(Address),
}

/// Ordered set of address writes applied as one unit
///
/// # Example
///
/// ```rust
/// use people_core::traits::{AddressWrite, WriteBatch};
/// use people_core::PersonId;
///
/// let batch = WriteBatch::new().clear_principal(PersonId(1));
/// assert_eq!(batch.writes(), &[AddressWrite::ClearPrincipal(PersonId(1))]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<AddressWrite>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bulk principal-clear for `person_id`
    pub fn clear_principal(mut self, person_id: PersonId) -> Self {
        self.writes.push(AddressWrite::ClearPrincipal(person_id));
        self
    }

    /// Append a save of `address`
    pub fn save(mut self, address: Address) -> Self {
        self.writes.push(AddressWrite::Save(address));
        self
    }

    /// Writes in application order
    pub fn writes(&self) -> &[AddressWrite] {
        &self.writes
    }

    /// Consume the batch, yielding its writes in application order
    pub fn into_writes(self) -> Vec<AddressWrite> {
        self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Trait for address store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
///
/// # Atomicity
///
/// [`AddressStore::apply`] is the transactional unit of this trait.
/// Implementations must apply every write of a batch inside one exclusive
/// critical section and make it durable as a whole:
///
/// - no concurrent reader may observe a batch half-applied
/// - two batches never interleave
/// - if the batch fails, none of its writes are visible
///
/// [`AddressStore::clear_principal_for_person`] on its own must be atomic
/// for all addresses of the person.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Get an address by id
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Address))`: The stored address
    /// - `Ok(None)`: No such address
    /// - `Err(Error)`: Storage error
    async fn get_address(&self, id: AddressId) -> Result<Option<Address>>;

    /// List every address owned by `person_id`, ordered by id
    async fn list_by_person(&self, person_id: PersonId) -> Result<Vec<Address>>;

    /// Insert a new address owned by `person_id`, assigning a fresh id
    ///
    /// The address starts with `principal = false`. The store does not check
    /// that the person exists.
    async fn create_address(&self, person_id: PersonId, draft: AddressDraft) -> Result<Address>;

    /// Create or overwrite the address stored under `address.id`
    async fn save_address(&self, address: &Address) -> Result<()>;

    /// Set `principal = false` on every address owned by `person_id`
    ///
    /// # Returns
    ///
    /// The number of addresses whose flag actually changed.
    async fn clear_principal_for_person(&self, person_id: PersonId) -> Result<usize>;

    /// Apply all writes of `batch` atomically, in order
    async fn apply(&self, batch: WriteBatch) -> Result<()>;
}
