//! Record types for persons and their addresses
//!
//! Addresses reference their owner through [`Address::person_id`]; a
//! [`Person`] never holds its addresses directly. Use
//! [`AddressStore::list_by_person`](crate::traits::AddressStore::list_by_person)
//! to walk the relation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a person, assigned by the store on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub i64);

/// Identifier of an address, assigned by the store on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressId(pub i64);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for PersonId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i64> for AddressId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A stored person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Store-assigned identity, immutable
    pub id: PersonId,
    /// Full name
    pub name: String,
    /// Birth date as entered, `dd/MM/yyyy`
    pub birth_date: String,
}

impl Person {
    /// Overwrite the fields present in `patch`, leaving the others as they are
    pub fn apply_patch(&mut self, patch: PersonPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(birth_date) = patch.birth_date {
            self.birth_date = birth_date;
        }
    }
}

/// Payload for creating a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDraft {
    pub name: String,
    pub birth_date: String,
}

impl PersonDraft {
    pub fn new(name: impl Into<String>, birth_date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            birth_date: birth_date.into(),
        }
    }
}

/// Partial update of a person; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
}

impl PersonPatch {
    /// Set the name to overwrite
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the birth date to overwrite
    pub fn with_birth_date(mut self, birth_date: impl Into<String>) -> Self {
        self.birth_date = Some(birth_date.into());
        self
    }

    /// Returns `true` if the patch carries no field at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.birth_date.is_none()
    }
}

/// A stored postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Store-assigned identity, immutable
    pub id: AddressId,
    /// Owning person, set at creation and never reassigned
    pub person_id: PersonId,
    pub street: String,
    pub postal_code: String,
    pub number: String,
    pub city: String,
    /// Whether this is the person's principal address
    #[serde(default)]
    pub principal: bool,
}

impl Address {
    /// Build a non-principal address from a draft
    pub fn from_draft(id: AddressId, person_id: PersonId, draft: AddressDraft) -> Self {
        Self {
            id,
            person_id,
            street: draft.street,
            postal_code: draft.postal_code,
            number: draft.number,
            city: draft.city,
            principal: false,
        }
    }

    /// Returns `true` if `person_id` owns this address
    pub fn is_owned_by(&self, person_id: PersonId) -> bool {
        self.person_id == person_id
    }
}

/// Payload for creating an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDraft {
    pub street: String,
    pub postal_code: String,
    pub number: String,
    pub city: String,
}

impl AddressDraft {
    pub fn new(
        street: impl Into<String>,
        postal_code: impl Into<String>,
        number: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            postal_code: postal_code.into(),
            number: number.into(),
            city: city.into(),
        }
    }
}
