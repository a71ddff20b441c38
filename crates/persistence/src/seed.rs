// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seed documents for preloading a store.

use std::path::Path;

use serde::{Deserialize, Serialize};
use workmode_domain::{NewOverride, TeamRule, TeleworkProfile};

use crate::data_models::GroupMembership;
use crate::error::PersistenceError;

/// Records to load into an empty store at startup.
///
/// Every section is optional in the JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedDocument {
    #[serde(default)]
    pub profiles: Vec<TeleworkProfile>,
    #[serde(default)]
    pub overrides: Vec<NewOverride>,
    #[serde(default)]
    pub team_rules: Vec<TeamRule>,
    #[serde(default)]
    pub memberships: Vec<GroupMembership>,
}

impl SeedDocument {
    /// Reads a seed document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InitializationError` if the file cannot be
    /// read, or `PersistenceError::SerializationError` if it is not a valid
    /// seed document.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let contents: String = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            PersistenceError::InitializationError(format!(
                "Cannot read seed file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}
