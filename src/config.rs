//! Configuration for a routing engine instance.
//!
//! This module provides a builder for Rust callers and [`EngineConfig::from_value`]
//! for the loosely typed constructor argument a host runtime passes in.

use crate::error::ConfigError;
use serde_json::Value;
use std::path::PathBuf;

/// Configuration for one routing engine instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Location of the prepared dataset on disk.
    pub path: Option<PathBuf>,

    /// Attach to a dataset already loaded into shared memory instead of `path`.
    pub shared_memory: bool,

    /// Maximum number of coordinates a table query may use.
    pub distance_table_limit: Option<u32>,
}

impl EngineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Build a configuration from the host's constructor argument.
    ///
    /// A string is shorthand for `{path: string}` and `null` (no argument)
    /// attaches to shared memory. Unknown object fields are ignored.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::Null => Self::builder().shared_memory(true).build(),
            Value::String(path) => Self::builder().path(path).build(),
            Value::Object(options) => {
                let mut builder = Self::builder();

                match options.get("path") {
                    None | Some(Value::Null) => {}
                    Some(Value::String(path)) => builder = builder.path(path),
                    Some(_) => return Err(ConfigError::PathNotString),
                }

                match options.get("shared_memory") {
                    None => {}
                    Some(Value::Bool(flag)) => builder = builder.shared_memory(*flag),
                    Some(_) => return Err(ConfigError::SharedMemoryNotBool),
                }

                if let Some(limit) = options.get("distance_table_limit") {
                    let limit = limit
                        .as_u64()
                        .and_then(|l| u32::try_from(l).ok())
                        .ok_or(ConfigError::DistanceTableLimit)?;
                    builder = builder.distance_table_limit(limit);
                }

                builder.build()
            }
            _ => Err(ConfigError::InvalidArgument),
        }
    }
}

/// Builder for creating an [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    path: Option<PathBuf>,
    shared_memory: bool,
    distance_table_limit: Option<u32>,
}

impl EngineConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dataset location. An empty path counts as no path.
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        let path = path.into();
        self.path = if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        };
        self
    }

    /// Attach to a shared-memory dataset.
    ///
    /// Default is false.
    pub fn shared_memory(mut self, enabled: bool) -> Self {
        self.shared_memory = enabled;
        self
    }

    /// Cap the number of coordinates accepted by table queries.
    pub fn distance_table_limit(mut self, limit: u32) -> Self {
        self.distance_table_limit = Some(limit);
        self
    }

    /// Build the configuration, validating all settings.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        if self.path.is_none() && !self.shared_memory {
            return Err(ConfigError::MissingPath);
        }

        Ok(EngineConfig {
            path: self.path,
            shared_memory: self.shared_memory,
            distance_table_limit: self.distance_table_limit,
        })
    }
}
