// # Store Implementations
//
// This module provides implementations of the PersonStore and AddressStore
// traits for different persistence strategies. Each implementation serves
// both traits from one set of tables, so a `WriteBatch` is applied under a
// single lock.

pub mod file;
pub mod memory;
mod records;

pub use file::{FileStore, FileStoreFactory};
pub use memory::{MemoryStore, MemoryStoreFactory};
