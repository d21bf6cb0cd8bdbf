//! Services consumed by boundary layers
//!
//! - [`AddressPrincipalManager`]: principal address transitions and address lookups
//! - [`PersonService`]: person lifecycle
//!
//! Both take their stores at construction time; see [`Services::new`] for
//! wiring them from a [`StoreHandles`] pair.

pub mod person;
pub mod principal;

pub use person::PersonService;
pub use principal::AddressPrincipalManager;

use crate::traits::StoreHandles;

/// Both services built over the same store pair
#[derive(Debug, Clone)]
pub struct Services {
    pub persons: PersonService,
    pub addresses: AddressPrincipalManager,
}

impl Services {
    pub fn new(stores: StoreHandles) -> Self {
        Self {
            persons: PersonService::new(stores.persons.clone()),
            addresses: AddressPrincipalManager::new(stores.persons, stores.addresses),
        }
    }
}
