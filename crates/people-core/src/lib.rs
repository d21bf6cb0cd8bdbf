// # people-core
//
// Core library for managing persons and their postal addresses.
//
// ## Architecture Overview
//
// - **PersonStore** / **AddressStore**: Traits for authoritative record storage
// - **AddressPrincipalManager**: Keeps at most one principal address per person
//   and performs the atomic handoff between addresses
// - **PersonService**: Person creation, partial update and lookup
// - **StoreRegistry**: Plugin-based registry building stores from configuration
// - **validation**: Edge checks run by boundary layers before calling services
//
// ## Design Principles
//
// 1. **Validate before mutate**: Every precondition is checked before the
//    first store write
// 2. **Atomic transitions**: Clearing and setting the principal flag travel
//    in one `WriteBatch` the store applies as a unit
// 3. **Explicit wiring**: Stores are passed in at construction, no globals
// 4. **No caching**: Principal status is always read from the store

pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod service;
pub mod store;
pub mod traits;
pub mod validation;

// Re-export core types for convenience
pub use config::{PeopleConfig, StoreConfig};
pub use error::{Entity, Error, Result};
pub use model::{Address, AddressDraft, AddressId, Person, PersonDraft, PersonId, PersonPatch};
pub use registry::StoreRegistry;
pub use service::{AddressPrincipalManager, PersonService, Services};
pub use store::{FileStore, MemoryStore};
pub use traits::{AddressStore, PersonStore, StoreFactory, StoreHandles, WriteBatch};
pub use validation::Validate;
