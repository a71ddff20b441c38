// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence for the workmode engine.
//!
//! [`SqliteStore`] implements the engine's store traits on top of Diesel.
//! Migrations are embedded and run whenever a store is opened.
//!
//! ## Tables
//!
//! - `telework_profiles`: one JSON profile document per user
//! - `telework_overrides`: one row per override, with the approval state
//!   split into a `status` column for filtering
//! - `team_rules`: one JSON rule document per rule, with its scope columns
//! - `group_memberships`: which users belong to which team or project
//!
//! ## Guarantees beyond the store contract
//!
//! A write that would leave two approved overrides of the same source for
//! the same user and day is refused with `StoreError::Conflict`.
//!
//! ## Testing
//!
//! [`SqliteStore::new_in_memory`] gives every caller its own shared
//! in-memory database, so tests never see each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::Date;
use tokio::sync::Mutex;
use tracing::info;
use workmode::{OverrideStore, ProfileStore, StoreError, TeamRuleStore};
use workmode_domain::{
    NewOverride, OverrideId, RuleScope, TeamRule, TeleworkOverride, TeleworkProfile, UserId,
};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod seed;

#[cfg(test)]
mod tests;

pub use data_models::GroupMembership;
pub use error::PersistenceError;
pub use seed::SeedDocument;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A store holding one `SQLite` connection behind an async mutex.
pub struct SqliteStore {
    conn: Mutex<SqliteConnection>,
}

impl SqliteStore {
    /// Opens a fresh in-memory database.
    ///
    /// Each call receives its own database instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:workmode_mem_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens or creates a file-backed database.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8 or the database
    /// cannot be opened or migrated.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Adds `user_id` to a team or project so that rules scoped there
    /// apply to the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn add_group_membership(
        &self,
        user_id: &UserId,
        scope: &RuleScope,
    ) -> Result<(), PersistenceError> {
        let mut conn = self.conn.lock().await;
        mutations::add_group_membership(&mut conn, user_id, scope)
    }

    /// Loads every record of a seed document.
    ///
    /// # Errors
    ///
    /// Returns an error if a record is invalid or a write fails. Records
    /// written before the failure stay in place.
    pub async fn load_seed(&self, seed: &SeedDocument) -> Result<(), PersistenceError> {
        let mut conn = self.conn.lock().await;

        for profile in &seed.profiles {
            profile
                .constraints
                .validate()
                .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;
            mutations::save_profile(&mut conn, profile)?;
        }
        for new_override in &seed.overrides {
            mutations::insert_override(&mut conn, new_override)?;
        }
        for rule in &seed.team_rules {
            rule.recurrence
                .validate()
                .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;
            mutations::save_team_rule(&mut conn, rule)?;
        }
        for membership in &seed.memberships {
            mutations::add_group_membership(&mut conn, &membership.user_id, &membership.scope)?;
        }

        info!(
            profiles = seed.profiles.len(),
            overrides = seed.overrides.len(),
            team_rules = seed.team_rules.len(),
            memberships = seed.memberships.len(),
            "Seed loaded"
        );
        Ok(())
    }
}

impl ProfileStore for SqliteStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<TeleworkProfile>, StoreError> {
        let mut conn = self.conn.lock().await;
        Ok(queries::get_profile(&mut conn, user_id)?)
    }

    async fn save_profile(&self, profile: &TeleworkProfile) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;
        Ok(mutations::save_profile(&mut conn, profile)?)
    }
}

impl OverrideStore for SqliteStore {
    async fn get_override(&self, id: &OverrideId) -> Result<Option<TeleworkOverride>, StoreError> {
        let mut conn = self.conn.lock().await;
        Ok(queries::get_override(&mut conn, id)?)
    }

    async fn get_overrides(
        &self,
        user_id: &UserId,
        start: Date,
        end: Date,
    ) -> Result<Vec<TeleworkOverride>, StoreError> {
        let mut conn = self.conn.lock().await;
        Ok(queries::get_overrides(&mut conn, user_id, start, end)?)
    }

    async fn create_override(&self, new_override: &NewOverride) -> Result<OverrideId, StoreError> {
        let mut conn = self.conn.lock().await;
        let rowid: i64 = mutations::insert_override(&mut conn, new_override)?;
        Ok(OverrideId::new(&rowid.to_string()))
    }

    async fn update_override(&self, telework_override: &TeleworkOverride) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;
        Ok(mutations::update_override(&mut conn, telework_override)?)
    }

    async fn delete_override(&self, id: &OverrideId) -> Result<bool, StoreError> {
        let Some(rowid) = data_models::override_rowid(id) else {
            return Ok(false);
        };
        let mut conn = self.conn.lock().await;
        Ok(mutations::delete_override(&mut conn, rowid)?)
    }
}

impl TeamRuleStore for SqliteStore {
    async fn get_team_rules_for_user(&self, user_id: &UserId) -> Result<Vec<TeamRule>, StoreError> {
        let mut conn = self.conn.lock().await;
        Ok(queries::get_team_rules_for_user(&mut conn, user_id)?)
    }

    async fn save_team_rule(&self, rule: &TeamRule) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;
        Ok(mutations::save_team_rule(&mut conn, rule)?)
    }
}
