//! Configuration for seqstore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, SeqError};

/// Main configuration for a store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Store file holding articles, orders and users.
    /// Saves go through a `{data_file}.tmp` sibling that is renamed into place.
    pub data_file: PathBuf,

    /// fsync the temporary file before renaming it over `data_file`
    pub sync_on_save: bool,

    // -------------------------------------------------------------------------
    // Load Configuration
    // -------------------------------------------------------------------------
    /// What to keep when a load fails part-way through the file
    pub load_policy: LoadPolicy,
}

/// How a store load reacts to a failure inside the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Discard everything and return the error
    #[default]
    Strict,

    /// Keep every element decoded before the failure and stop reading
    /// the containers that follow
    Partial,
}

impl std::str::FromStr for LoadPolicy {
    type Err = SeqError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strict" => Ok(LoadPolicy::Strict),
            "partial" => Ok(LoadPolicy::Partial),
            other => Err(SeqError::Config(format!(
                "unknown load policy '{}' (expected 'strict' or 'partial')",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("./seqstore.dat"),
            sync_on_save: true,
            load_policy: LoadPolicy::Strict,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store file
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    /// Set whether saves fsync before the final rename
    pub fn sync_on_save(mut self, sync: bool) -> Self {
        self.config.sync_on_save = sync;
        self
    }

    /// Set the load failure policy
    pub fn load_policy(mut self, policy: LoadPolicy) -> Self {
        self.config.load_policy = policy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
