// # Record Tables
//
// Plain in-memory tables shared by the store implementations. Holds no
// locks: callers wrap it in whatever synchronization they need and apply
// mutations while holding exclusive access.

use std::collections::BTreeMap;

use crate::error::{Entity, Error, Result};
use crate::model::{
    Address, AddressDraft, AddressId, Person, PersonDraft, PersonId, PersonPatch,
};
use crate::traits::{AddressWrite, WriteBatch};

#[derive(Debug, Clone)]
pub(crate) struct Records {
    next_person_id: i64,
    next_address_id: i64,
    persons: BTreeMap<PersonId, Person>,
    addresses: BTreeMap<AddressId, Address>,
}

impl Default for Records {
    fn default() -> Self {
        Self {
            next_person_id: 1,
            next_address_id: 1,
            persons: BTreeMap::new(),
            addresses: BTreeMap::new(),
        }
    }
}

impl Records {
    /// Rebuild tables from loaded rows
    ///
    /// Counters never go backwards past an id already present in the rows.
    pub(crate) fn from_parts(
        next_person_id: i64,
        next_address_id: i64,
        persons: Vec<Person>,
        addresses: Vec<Address>,
    ) -> Result<Self> {
        let mut records = Self {
            next_person_id: next_person_id.max(1),
            next_address_id: next_address_id.max(1),
            ..Self::default()
        };
        for person in persons {
            records.save_person(person)?;
        }
        for address in addresses {
            records.save_address(address)?;
        }
        Ok(records)
    }

    pub(crate) fn next_person_id(&self) -> i64 {
        self.next_person_id
    }

    pub(crate) fn next_address_id(&self) -> i64 {
        self.next_address_id
    }

    pub(crate) fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(&id)
    }

    pub(crate) fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    pub(crate) fn address(&self, id: AddressId) -> Option<&Address> {
        self.addresses.get(&id)
    }

    pub(crate) fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.addresses.values()
    }

    pub(crate) fn addresses_of(&self, person_id: PersonId) -> Vec<Address> {
        self.addresses
            .values()
            .filter(|address| address.is_owned_by(person_id))
            .cloned()
            .collect()
    }

    pub(crate) fn create_person(&mut self, draft: PersonDraft) -> Result<Person> {
        let person = Person {
            id: PersonId(self.next_person_id),
            name: draft.name,
            birth_date: draft.birth_date,
        };
        self.save_person(person.clone())?;
        Ok(person)
    }

    pub(crate) fn save_person(&mut self, person: Person) -> Result<()> {
        self.next_person_id = counter_after(self.next_person_id, person.id.0, Entity::Person)?;
        self.persons.insert(person.id, person);
        Ok(())
    }

    /// Returns `None` without writing if the person is absent
    pub(crate) fn update_person(&mut self, id: PersonId, patch: PersonPatch) -> Option<Person> {
        let person = self.persons.get_mut(&id)?;
        person.apply_patch(patch);
        Some(person.clone())
    }

    pub(crate) fn create_address(
        &mut self,
        person_id: PersonId,
        draft: AddressDraft,
    ) -> Result<Address> {
        let address = Address::from_draft(AddressId(self.next_address_id), person_id, draft);
        self.save_address(address.clone())?;
        Ok(address)
    }

    pub(crate) fn save_address(&mut self, address: Address) -> Result<()> {
        self.next_address_id =
            counter_after(self.next_address_id, address.id.0, Entity::Address)?;
        self.addresses.insert(address.id, address);
        Ok(())
    }

    /// Returns the number of flags that changed
    pub(crate) fn clear_principal(&mut self, person_id: PersonId) -> usize {
        let mut cleared = 0;
        for address in self.addresses.values_mut() {
            if address.is_owned_by(person_id) && address.principal {
                address.principal = false;
                cleared += 1;
            }
        }
        cleared
    }

    /// Apply every write of `batch`, or none of them
    pub(crate) fn apply(&mut self, batch: WriteBatch) -> Result<()> {
        // Only saves can fail, so settle the counter before touching any row
        let mut next_address_id = self.next_address_id;
        for write in batch.writes() {
            if let AddressWrite::Save(address) = write {
                next_address_id = counter_after(next_address_id, address.id.0, Entity::Address)?;
            }
        }

        for write in batch.into_writes() {
            match write {
                AddressWrite::ClearPrincipal(person_id) => {
                    self.clear_principal(person_id);
                }
                AddressWrite::Save(address) => {
                    self.addresses.insert(address.id, address);
                }
            }
        }
        self.next_address_id = next_address_id;
        Ok(())
    }
}

/// Next free id once `id` is taken
fn counter_after(current: i64, id: i64, entity: Entity) -> Result<i64> {
    if id < current {
        return Ok(current);
    }
    id.checked_add(1)
        .ok_or_else(|| Error::store(format!("{} id space exhausted at {}", entity, id)))
}
