//! Principal address management
//!
//! The [`AddressPrincipalManager`] owns the one rule with a real contract in
//! this crate: for every person, at most one owned address is flagged
//! principal after any successful operation.
//!
//! ## Transition
//!
//! ```text
//! set_principal(P, A)
//!     │
//!     ├── PersonStore::exists(P) ──────────── no ──▶ NotFound(Person)
//!     ├── AddressStore::list_by_person(P) ── A missing ──▶ NotFound(Address)
//!     ├── A the only principal already? ──── yes ─▶ Ok (no write)
//!     │
//!     ▼
//! AddressStore::apply(WriteBatch[ClearPrincipal(P), Save(A, principal=true)])
//! ```
//!
//! Every precondition is checked before the first mutating call, and the
//! two writes travel in one batch that the store applies atomically.

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{Address, AddressDraft, AddressId, PersonId};
use crate::traits::{AddressStore, PersonStore, WriteBatch};

/// Assigns and reassigns the principal address of a person
///
/// The manager holds no state of its own between calls: every read goes to
/// the stores, so principal status is never served from a stale copy.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use people_core::store::MemoryStore;
/// use people_core::{AddressDraft, AddressPrincipalManager, PersonDraft, PersonStore};
///
/// #[tokio::main]
/// async fn main() -> people_core::Result<()> {
///     let store = Arc::new(MemoryStore::new());
///     let manager = AddressPrincipalManager::new(store.clone(), store.clone());
///
///     let ana = store.create_person(PersonDraft::new("Ana", "01/02/1990")).await?;
///     let home = manager
///         .add_address(ana.id, AddressDraft::new("Rua A", "50000-000", "10", "Recife"))
///         .await?;
///
///     manager.set_principal(ana.id, home.id).await?;
///     assert_eq!(manager.get_principal(ana.id).await?.id, home.id);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct AddressPrincipalManager {
    persons: Arc<dyn PersonStore>,
    addresses: Arc<dyn AddressStore>,
}

impl AddressPrincipalManager {
    /// Create a manager over the given stores
    pub fn new(persons: Arc<dyn PersonStore>, addresses: Arc<dyn AddressStore>) -> Self {
        Self { persons, addresses }
    }

    /// Make `address_id` the principal address of `person_id`
    ///
    /// Every other address of the person ends with `principal = false`.
    /// Calling this for an address that is already the person's only
    /// principal is a no-op; any other state is rewritten.
    ///
    /// # Errors
    ///
    /// - `NotFound(Person)` if the person does not exist
    /// - `NotFound(Address)` if the address does not exist or belongs to
    ///   another person
    pub async fn set_principal(&self, person_id: PersonId, address_id: AddressId) -> Result<()> {
        self.ensure_person(person_id).await?;
        let owned = self.addresses.list_by_person(person_id).await?;

        let Some(target) = owned.iter().find(|address| address.id == address_id) else {
            if let Some(foreign) = self.addresses.get_address(address_id).await? {
                debug!(
                    "Address {} belongs to person {}, not {}",
                    address_id, foreign.person_id, person_id
                );
            }
            return Err(Error::address_not_found(address_id));
        };

        // Already the only principal: nothing to write
        let other_principal = owned
            .iter()
            .any(|address| address.principal && address.id != address_id);
        if target.principal && !other_principal {
            debug!(
                "Address {} is already principal for person {}, skipping",
                address_id, person_id
            );
            return Ok(());
        }

        let promoted = Address {
            principal: true,
            ..target.clone()
        };
        let batch = WriteBatch::new()
            .clear_principal(person_id)
            .save(promoted);
        self.addresses.apply(batch).await?;

        info!("Principal address of person {} set to {}", person_id, address_id);
        Ok(())
    }

    /// Get the principal address of `person_id`
    ///
    /// # Errors
    ///
    /// - `NotFound(Person)` if the person does not exist
    /// - `NotFound(Address)` ("no principal address set") if none is flagged
    /// - `Store` if the store holds more than one principal for the person
    pub async fn get_principal(&self, person_id: PersonId) -> Result<Address> {
        self.ensure_person(person_id).await?;

        let mut principals = self
            .addresses
            .list_by_person(person_id)
            .await?
            .into_iter()
            .filter(|address| address.principal);

        let principal = principals
            .next()
            .ok_or_else(|| Error::no_principal_address(person_id))?;

        if let Some(extra) = principals.next() {
            return Err(Error::store(format!(
                "person {} has more than one principal address ({} and {})",
                person_id, principal.id, extra.id
            )));
        }

        Ok(principal)
    }

    /// List every address owned by `person_id`, principal included
    ///
    /// # Errors
    ///
    /// - `NotFound(Person)` if the person does not exist
    pub async fn list_addresses(&self, person_id: PersonId) -> Result<Vec<Address>> {
        self.ensure_person(person_id).await?;
        self.addresses.list_by_person(person_id).await
    }

    /// Create a new, non-principal address owned by `person_id`
    ///
    /// `draft` is expected to have passed edge validation already.
    ///
    /// # Errors
    ///
    /// - `NotFound(Person)` if the person does not exist; nothing is created
    pub async fn add_address(&self, person_id: PersonId, draft: AddressDraft) -> Result<Address> {
        self.ensure_person(person_id).await?;

        let address = self.addresses.create_address(person_id, draft).await?;
        info!("Added address {} for person {}", address.id, person_id);
        Ok(address)
    }

    async fn ensure_person(&self, person_id: PersonId) -> Result<()> {
        if self.persons.exists(person_id).await? {
            Ok(())
        } else {
            Err(Error::person_not_found(person_id))
        }
    }
}

impl std::fmt::Debug for AddressPrincipalManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressPrincipalManager").finish_non_exhaustive()
    }
}
