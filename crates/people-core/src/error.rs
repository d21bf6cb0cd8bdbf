//! Error types for the people registry
//!
//! This module defines all error types used throughout the crate.

use std::fmt;
use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of record a [`Error::NotFound`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A person record
    Person,
    /// An address record
    Address,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Person => f.write_str("person"),
            Entity::Address => f.write_str("address"),
        }
    }
}

/// Core error type for the people registry
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced record does not exist (or is not visible from the given owner)
    #[error("{entity} not found: {message}")]
    NotFound {
        /// Which kind of record was missing
        entity: Entity,
        /// Human readable detail
        message: String,
    },

    /// Caller-supplied payload violates a business rule
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Edge validation failed; one message per offending field
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Store-related errors
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a "person not found" error
    pub fn person_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: Entity::Person,
            message: format!("no person with id {}", id),
        }
    }

    /// Create an "address not found" error
    pub fn address_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: Entity::Address,
            message: format!("no address with id {}", id),
        }
    }

    /// Create the error reported when a person has no principal address yet
    pub fn no_principal_address(person_id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: Entity::Address,
            message: format!("no principal address set for person {}", person_id),
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns `true` if this is a [`Error::NotFound`] for the given entity
    pub fn is_not_found(&self, which: Entity) -> bool {
        matches!(self, Error::NotFound { entity, .. } if *entity == which)
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
