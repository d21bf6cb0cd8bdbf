//! Person lifecycle
//!
//! Thin service over [`PersonStore`]. The only rule it enforces is that a
//! partial update must carry at least one field.

use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{Person, PersonDraft, PersonId, PersonPatch};
use crate::traits::PersonStore;

/// Creates, updates and looks up person records
#[derive(Clone)]
pub struct PersonService {
    persons: Arc<dyn PersonStore>,
}

impl PersonService {
    pub fn new(persons: Arc<dyn PersonStore>) -> Self {
        Self { persons }
    }

    /// Insert a new person
    ///
    /// `draft` is expected to have passed edge validation already.
    pub async fn create(&self, draft: PersonDraft) -> Result<Person> {
        let person = self.persons.create_person(draft).await?;
        info!("Created person {}", person.id);
        Ok(person)
    }

    /// Overwrite the fields present in `patch`
    ///
    /// The patch is applied by the store in one step, so concurrent updates
    /// of different fields all survive.
    ///
    /// # Errors
    ///
    /// - `InvalidArguments` if the patch carries no field; checked before
    ///   the person is looked up
    /// - `NotFound(Person)` if the person does not exist
    pub async fn update(&self, person_id: PersonId, patch: PersonPatch) -> Result<Person> {
        if patch.is_empty() {
            return Err(Error::invalid_arguments(
                "person update must contain at least one non-empty field",
            ));
        }

        let person = self
            .persons
            .update_person(person_id, patch)
            .await?
            .ok_or_else(|| Error::person_not_found(person_id))?;

        info!("Updated person {}", person_id);
        Ok(person)
    }

    /// Get a person by id
    ///
    /// # Errors
    ///
    /// - `NotFound(Person)` if the person does not exist
    pub async fn get(&self, person_id: PersonId) -> Result<Person> {
        self.persons
            .get_person(person_id)
            .await?
            .ok_or_else(|| Error::person_not_found(person_id))
    }

    /// List every person, ordered by id
    pub async fn list_all(&self) -> Result<Vec<Person>> {
        let persons = self.persons.list_all().await?;
        debug!("Listed {} persons", persons.len());
        Ok(persons)
    }
}

impl std::fmt::Debug for PersonService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonService").finish_non_exhaustive()
    }
}
