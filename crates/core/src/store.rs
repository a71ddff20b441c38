// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store contracts consumed by the engine.
//!
//! The engine owns no storage. It loads profiles, overrides and team rules
//! through these traits, computes in memory, and writes back through them.
//! Implementations decide how records are kept and may add stronger
//! guarantees (for example rejecting a second approved override for the
//! same user, date and source with [`StoreError::Conflict`]).

use std::future::Future;

use time::Date;
use workmode_domain::{NewOverride, OverrideId, TeamRule, TeleworkOverride, TeleworkProfile, UserId};

use crate::error::StoreError;

/// Access to telework profiles, one per user.
pub trait ProfileStore: Send + Sync {
    /// Returns the profile for `user_id`, or `None` if the user has none.
    fn get_profile(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<TeleworkProfile>, StoreError>> + Send;

    /// Inserts or replaces the profile keyed by its `user_id`.
    fn save_profile(
        &self,
        profile: &TeleworkProfile,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Access to date-specific overrides.
pub trait OverrideStore: Send + Sync {
    fn get_override(
        &self,
        id: &OverrideId,
    ) -> impl Future<Output = Result<Option<TeleworkOverride>, StoreError>> + Send;

    /// Returns every override for `user_id` dated within `start..=end`,
    /// whatever its approval state.
    fn get_overrides(
        &self,
        user_id: &UserId,
        start: Date,
        end: Date,
    ) -> impl Future<Output = Result<Vec<TeleworkOverride>, StoreError>> + Send;

    /// Persists a new override and returns its assigned identifier.
    fn create_override(
        &self,
        new_override: &NewOverride,
    ) -> impl Future<Output = Result<OverrideId, StoreError>> + Send;

    /// Replaces a stored override. Fails with [`StoreError::NotFound`] if
    /// the id is unknown.
    fn update_override(
        &self,
        telework_override: &TeleworkOverride,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Deletes an override. Returns `false` if nothing was stored under `id`.
    fn delete_override(
        &self,
        id: &OverrideId,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Access to team rules.
pub trait TeamRuleStore: Send + Sync {
    /// Returns the rules whose scope includes `user_id`, exemptions attached.
    ///
    /// Inactive rules and rules exempting the user may be included; the
    /// engine filters them per date.
    fn get_team_rules_for_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Vec<TeamRule>, StoreError>> + Send;

    /// Inserts or replaces a rule keyed by its id.
    fn save_team_rule(&self, rule: &TeamRule)
    -> impl Future<Output = Result<(), StoreError>> + Send;
}
