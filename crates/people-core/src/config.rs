//! Configuration types for the people registry
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeopleConfig {
    /// Backing store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

impl PeopleConfig {
    /// Create a configuration backed by the given store
    pub fn new(store: StoreConfig) -> Self {
        Self { store }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.store.validate()
    }
}

/// Store configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// JSON file store
    File {
        /// Path to the snapshot file
        path: String,
    },

    /// In-memory store (not persistent)
    #[default]
    Memory,

    /// Custom store
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::File { path } => {
                if path.trim().is_empty() {
                    return Err(crate::Error::config("File store path cannot be empty"));
                }
                Ok(())
            }
            StoreConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("Custom store factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom store config cannot be null"));
                }
                Ok(())
            }
            StoreConfig::Memory => Ok(()),
        }
    }

    /// Get the store type name used for registry lookup
    pub fn type_name(&self) -> &str {
        match self {
            StoreConfig::File { .. } => "file",
            StoreConfig::Memory => "memory",
            StoreConfig::Custom { factory, .. } => factory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_config_is_tagged_by_type() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"type":"file","path":"/tmp/people.json"}"#).unwrap();
        assert_eq!(
            config,
            StoreConfig::File {
                path: "/tmp/people.json".to_string()
            }
        );
        assert_eq!(config.type_name(), "file");

        let config: PeopleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.store, StoreConfig::Memory);
    }

    #[test]
    fn rejects_empty_file_path() {
        let config = PeopleConfig::new(StoreConfig::File {
            path: "  ".to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_null_custom_config() {
        let config = StoreConfig::Custom {
            factory: "sql".to_string(),
            config: serde_json::Value::Null,
        };
        assert!(config.validate().is_err());
        assert_eq!(config.type_name(), "sql");
    }
}
