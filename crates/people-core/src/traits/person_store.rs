// # Person Store Trait
//
// Defines the interface for authoritative storage of person records.
//
// ## Implementations
//
// - `MemoryStore`: process-local, for tests and embedding
// - `FileStore`: JSON snapshot file with atomic writes
//
// ## Usage
//
// ```rust,ignore
// use people_core::{PersonDraft, PersonStore};
//
// let person = store.create_person(PersonDraft::new("Ana", "01/02/1990")).await?;
// assert!(store.exists(person.id).await?);
// ```

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Person, PersonDraft, PersonId, PersonPatch};

/// Trait for person store implementations
///
/// Stores are plain persistence: they assign ids and keep records, but
/// never enforce business rules. Those belong to
/// [`PersonService`](crate::service::PersonService).
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Check whether a person with this id exists
    async fn exists(&self, id: PersonId) -> Result<bool>;

    /// Get a person by id
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Person))`: The stored person
    /// - `Ok(None)`: No such person
    /// - `Err(Error)`: Storage error
    async fn get_person(&self, id: PersonId) -> Result<Option<Person>>;

    /// Insert a new person, assigning a fresh id
    async fn create_person(&self, draft: PersonDraft) -> Result<Person>;

    /// Create or overwrite the person stored under `person.id`
    async fn save_person(&self, person: &Person) -> Result<()>;

    /// Overwrite the fields present in `patch` on the stored person
    ///
    /// The read and the write happen inside one exclusive critical section,
    /// so concurrent patches touching different fields never undo each other.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Person))`: The person after the patch
    /// - `Ok(None)`: No such person; nothing was written
    async fn update_person(&self, id: PersonId, patch: PersonPatch) -> Result<Option<Person>>;

    /// List every stored person, ordered by id
    async fn list_all(&self) -> Result<Vec<Person>>;
}
