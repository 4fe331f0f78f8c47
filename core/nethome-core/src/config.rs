//! Identity configuration: hardware address to recognized name.
//!
//! The map is supplied by the embedding application at startup and is
//! immutable for the process lifetime. Addresses are matched exactly as
//! supplied (colon-separated hex octets, case preserved).

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Static mapping from hardware address to logical identity name.
#[derive(Debug, Clone, Default)]
pub struct IdentityMap {
    entries: HashMap<String, String>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an identity map from a JSON object of hardware address to name.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| Error::Config {
            path: path.to_path_buf(),
            details: err.to_string(),
        })?;
        let entries: HashMap<String, String> =
            serde_json::from_str(&content).map_err(|err| Error::Config {
                path: path.to_path_buf(),
                details: err.to_string(),
            })?;
        Ok(Self { entries })
    }

    pub fn insert(&mut self, hw_address: impl Into<String>, name: impl Into<String>) {
        self.entries.insert(hw_address.into(), name.into());
    }

    /// Returns the identity name configured for a hardware address, if any.
    pub fn name_for(&self, hw_address: &str) -> Option<&str> {
        self.entries.get(hw_address).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<(String, String)> for IdentityMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
