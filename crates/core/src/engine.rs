// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The engine service.
//!
//! Every read path follows the same shape: load the user's profile, the
//! overrides in the window of interest and the rules scoped to the user,
//! then hand the loaded records to the pure functions in
//! `workmode_domain`. Nothing computed here is cached; each call reflects
//! the store as it is at that moment.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};
use workmode_domain::{
    Approval, DayResolution, NewOverride, OverrideId, PatternPreview, ProfileUpdate,
    ResolutionInputs, TeamRule, TeleworkOverride, TeleworkProfile, TeleworkStats, UserId,
    ValidationResult, WeekView, WeeklyPattern, WorkMode, add_days, week_bounds,
};

use crate::error::CoreError;
use crate::policy::EnginePolicy;
use crate::store::{OverrideStore, ProfileStore, TeamRuleStore};

/// Approver recorded when a request needs no manager sign-off.
pub const AUTO_APPROVER: &str = "system";

/// A user's request for a date-specific override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRequest {
    pub user_id: UserId,
    pub date: Date,
    pub mode: WorkMode,
    #[serde(default)]
    pub reason: Option<String>,
}

/// What happened to a request: the validation verdict and the stored override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOutcome {
    pub validation: ValidationResult,
    #[serde(rename = "override")]
    pub created: TeleworkOverride,
}

/// Records loaded for one user over one date window.
struct Loaded {
    profile: Option<TeleworkProfile>,
    overrides: Vec<TeleworkOverride>,
    team_rules: Vec<TeamRule>,
}

impl Loaded {
    fn inputs(&self) -> ResolutionInputs<'_> {
        ResolutionInputs {
            profile: self.profile.as_ref(),
            overrides: &self.overrides,
            team_rules: &self.team_rules,
        }
    }
}

/// Resolves, validates and records telework decisions against a store.
pub struct TeleworkEngine<S> {
    store: S,
    policy: EnginePolicy,
    clock: fn() -> OffsetDateTime,
}

impl<S> TeleworkEngine<S>
where
    S: ProfileStore + OverrideStore + TeamRuleStore,
{
    /// Creates an engine reading the wall clock in UTC.
    pub fn new(store: S, policy: EnginePolicy) -> Self {
        Self {
            store,
            policy,
            clock: OffsetDateTime::now_utc,
        }
    }

    /// Replaces the clock used to stamp audit fields.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> OffsetDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    fn now(&self) -> OffsetDateTime {
        (self.clock)()
    }

    async fn load(&self, user_id: &UserId, start: Date, end: Date) -> Result<Loaded, CoreError> {
        let profile: Option<TeleworkProfile> = self.store.get_profile(user_id).await?;
        let overrides: Vec<TeleworkOverride> =
            self.store.get_overrides(user_id, start, end).await?;
        let team_rules: Vec<TeamRule> = self.store.get_team_rules_for_user(user_id).await?;

        if profile.is_none() {
            warn!(user_id = %user_id, "No telework profile, resolution degrades to office");
        }
        debug!(
            user_id = %user_id,
            %start,
            %end,
            overrides = overrides.len(),
            team_rules = team_rules.len(),
            "Loaded resolution inputs"
        );

        Ok(Loaded {
            profile,
            overrides,
            team_rules,
        })
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolves one user's mode on one day.
    ///
    /// A missing profile is not an error here: the result is forced to
    /// office with confidence 0 and an error-severity conflict.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if any store call fails.
    pub async fn resolve_day(
        &self,
        user_id: &UserId,
        date: Date,
    ) -> Result<DayResolution, CoreError> {
        let loaded: Loaded = self.load(user_id, date, date).await?;
        let resolution: DayResolution =
            workmode_domain::resolve_day(user_id, date, &loaded.inputs());

        debug!(
            user_id = %user_id,
            %date,
            mode = %resolution.resolved_mode,
            source = ?resolution.source,
            conflicts = resolution.conflicts.len(),
            "Resolved day"
        );
        Ok(resolution)
    }

    /// Resolves the Monday-start week containing `date`, weekends included.
    ///
    /// # Errors
    ///
    /// Returns an error if a store call fails or the week falls outside the
    /// supported calendar range.
    pub async fn resolve_week(&self, user_id: &UserId, date: Date) -> Result<WeekView, CoreError> {
        let (start, end) = week_bounds(date)?;
        let loaded: Loaded = self.load(user_id, start, end).await?;
        Ok(workmode_domain::resolve_week(
            user_id,
            date,
            &loaded.inputs(),
        )?)
    }

    /// Resolves every day in `start..=end`. Weekends are skipped unless the
    /// policy includes them.
    ///
    /// # Errors
    ///
    /// Returns an error if a store call fails or `end` precedes `start`.
    pub async fn resolve_period(
        &self,
        user_id: &UserId,
        start: Date,
        end: Date,
    ) -> Result<Vec<DayResolution>, CoreError> {
        let loaded: Loaded = self.load(user_id, start, end).await?;
        Ok(workmode_domain::resolve_period(
            user_id,
            start,
            end,
            self.policy.include_weekends_in_period,
            &loaded.inputs(),
        )?)
    }

    /// Returns only the resolved mode for a day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if any store call fails.
    #[deprecated(since = "0.1.0", note = "use `resolve_day` and read `resolved_mode`")]
    pub async fn effective_mode(&self, user_id: &UserId, date: Date) -> Result<WorkMode, CoreError> {
        warn!(
            target: "workmode::deprecation",
            operation = "effective_mode",
            replacement = "resolve_day",
            user_id = %user_id,
            "Deprecated entry point called"
        );
        Ok(self.resolve_day(user_id, date).await?.resolved_mode)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Aggregates the working days in `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns an error if a store call fails or `end` precedes `start`.
    pub async fn calculate_stats(
        &self,
        user_id: &UserId,
        start: Date,
        end: Date,
    ) -> Result<TeleworkStats, CoreError> {
        let loaded: Loaded = self.load(user_id, start, end).await?;
        Ok(workmode_domain::calculate_stats(
            user_id,
            start,
            end,
            &loaded.inputs(),
        )?)
    }

    /// Compares the current resolution with a baseline built from
    /// `new_pattern`. Nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ProfileNotFound` if the user has no profile, or
    /// an error if a store call fails or the range is reversed.
    pub async fn preview_pattern_change(
        &self,
        user_id: &UserId,
        new_pattern: &WeeklyPattern,
        start: Date,
        end: Date,
    ) -> Result<PatternPreview, CoreError> {
        let loaded: Loaded = self.load(user_id, start, end).await?;
        let profile: &TeleworkProfile = loaded
            .profile
            .as_ref()
            .ok_or_else(|| CoreError::ProfileNotFound(user_id.clone()))?;

        Ok(workmode_domain::preview_pattern_change(
            profile,
            new_pattern,
            start,
            end,
            &loaded.overrides,
            &loaded.team_rules,
        )?)
    }

    // ========================================================================
    // Overrides
    // ========================================================================

    /// Checks a prospective override without storing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if a store call fails.
    pub async fn validate_override_request(
        &self,
        user_id: &UserId,
        date: Date,
        mode: WorkMode,
    ) -> Result<ValidationResult, CoreError> {
        let padding: i64 = i64::from(self.policy.override_window_padding_days);
        let (week_start, week_end) = week_bounds(date)?;
        let start: Date = add_days(week_start, -padding)?;
        let end: Date = add_days(week_end, padding)?;

        let loaded: Loaded = self.load(user_id, start, end).await?;
        let result: ValidationResult =
            workmode_domain::validate_override_request(user_id, date, mode, &loaded.inputs())?;

        debug!(
            user_id = %user_id,
            %date,
            %mode,
            is_valid = result.is_valid,
            requires_approval = result.requires_approval,
            "Validated override request"
        );
        Ok(result)
    }

    /// Validates and stores a user request.
    ///
    /// Requests that need no approval are approved on creation by
    /// [`AUTO_APPROVER`]; the rest stay pending. Requests that fail
    /// validation are still stored (pending) since the violations are
    /// advisory. Only a missing profile refuses the write.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ProfileNotFound` if the user has no profile, or
    /// `CoreError::Store` if the store rejects the write. An approved user
    /// request is never replaced: a store that keeps one approved request
    /// per (user, date) answers an auto-approved second request with
    /// `StoreError::Conflict`, even when validation passed. Delete the
    /// earlier override to change the day.
    pub async fn request_override(
        &self,
        request: OverrideRequest,
        requested_by: &str,
    ) -> Result<RequestOutcome, CoreError> {
        let validation: ValidationResult = self
            .validate_override_request(&request.user_id, request.date, request.mode)
            .await?;
        if !validation.can_proceed {
            return Err(CoreError::ProfileNotFound(request.user_id));
        }

        let now: OffsetDateTime = self.now();
        let mut new_override: NewOverride = NewOverride::user_request(
            request.user_id,
            request.date,
            request.mode,
            request.reason,
            requested_by,
            now,
        );
        if !validation.requires_approval {
            new_override.approval = Approval::Approved {
                by: AUTO_APPROVER.to_string(),
                at: now,
                note: None,
            };
        }

        let id: OverrideId = self.store.create_override(&new_override).await?;
        let created: TeleworkOverride = new_override.with_id(id);

        info!(
            override_id = %created.id,
            user_id = %created.user_id,
            date = %created.date,
            mode = %created.mode,
            status = %created.status(),
            "Override requested"
        );
        Ok(RequestOutcome {
            validation,
            created,
        })
    }

    /// Stores an administrative mandate for one user and day, approved
    /// immediately. No validation runs.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store rejects the write.
    pub async fn impose_override(
        &self,
        user_id: &UserId,
        date: Date,
        mode: WorkMode,
        reason: Option<String>,
        imposed_by: &str,
    ) -> Result<TeleworkOverride, CoreError> {
        let new_override: NewOverride =
            NewOverride::admin_imposed(user_id.clone(), date, mode, reason, imposed_by, self.now());
        let id: OverrideId = self.store.create_override(&new_override).await?;
        let created: TeleworkOverride = new_override.with_id(id);

        info!(
            override_id = %created.id,
            user_id = %user_id,
            %date,
            %mode,
            imposed_by,
            "Override imposed"
        );
        Ok(created)
    }

    async fn fetch_override(&self, id: &OverrideId) -> Result<TeleworkOverride, CoreError> {
        self.store
            .get_override(id)
            .await?
            .ok_or_else(|| CoreError::OverrideNotFound(id.clone()))
    }

    /// Approves a pending override. Validation is not repeated.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::OverrideNotFound`, `CoreError::Domain` if the
    /// override is not pending, or `CoreError::Store` on a store failure.
    pub async fn approve_override(
        &self,
        id: &OverrideId,
        approver: &str,
        note: Option<String>,
    ) -> Result<TeleworkOverride, CoreError> {
        let mut telework_override: TeleworkOverride = self.fetch_override(id).await?;
        telework_override.approve(approver, note, self.now())?;
        self.store.update_override(&telework_override).await?;

        info!(override_id = %id, approver, "Override approved");
        Ok(telework_override)
    }

    /// Rejects a pending override with a reason.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::OverrideNotFound`, `CoreError::Domain` if the
    /// reason is blank or the override is not pending, or `CoreError::Store`
    /// on a store failure.
    pub async fn reject_override(
        &self,
        id: &OverrideId,
        approver: &str,
        reason: &str,
    ) -> Result<TeleworkOverride, CoreError> {
        let mut telework_override: TeleworkOverride = self.fetch_override(id).await?;
        telework_override.reject(approver, reason, self.now())?;
        self.store.update_override(&telework_override).await?;

        info!(override_id = %id, approver, "Override rejected");
        Ok(telework_override)
    }

    /// Deletes an override in any state.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::OverrideNotFound` if nothing is stored under `id`.
    pub async fn delete_override(&self, id: &OverrideId) -> Result<(), CoreError> {
        if !self.store.delete_override(id).await? {
            return Err(CoreError::OverrideNotFound(id.clone()));
        }
        info!(override_id = %id, "Override deleted");
        Ok(())
    }

    /// Lists a user's overrides dated within `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store call fails.
    pub async fn list_overrides(
        &self,
        user_id: &UserId,
        start: Date,
        end: Date,
    ) -> Result<Vec<TeleworkOverride>, CoreError> {
        Ok(self.store.get_overrides(user_id, start, end).await?)
    }

    // ========================================================================
    // Profiles
    // ========================================================================

    /// # Errors
    ///
    /// Returns `CoreError::ProfileNotFound` if the user has no profile.
    pub async fn get_profile(&self, user_id: &UserId) -> Result<TeleworkProfile, CoreError> {
        self.store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| CoreError::ProfileNotFound(user_id.clone()))
    }

    /// Creates a profile with the organisation defaults.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ProfileAlreadyExists` if the user has a profile.
    pub async fn create_default_profile(
        &self,
        user_id: &UserId,
        display_name: &str,
        created_by: &str,
    ) -> Result<TeleworkProfile, CoreError> {
        if self.store.get_profile(user_id).await?.is_some() {
            return Err(CoreError::ProfileAlreadyExists(user_id.clone()));
        }

        let profile: TeleworkProfile =
            TeleworkProfile::with_defaults(user_id.clone(), display_name, created_by, self.now());
        self.store.save_profile(&profile).await?;

        info!(user_id = %user_id, created_by, "Telework profile created");
        Ok(profile)
    }

    /// Returns the user's profile, creating a default one on first access.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Store` if a store call fails.
    pub async fn get_or_create_profile(
        &self,
        user_id: &UserId,
        display_name: &str,
        actor: &str,
    ) -> Result<TeleworkProfile, CoreError> {
        match self.store.get_profile(user_id).await? {
            Some(profile) => Ok(profile),
            None => self.create_default_profile(user_id, display_name, actor).await,
        }
    }

    /// Applies a partial update to a profile.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ProfileNotFound`, `CoreError::Domain` for
    /// out-of-range constraints, or `CoreError::Store` on a store failure.
    pub async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
        updated_by: &str,
    ) -> Result<TeleworkProfile, CoreError> {
        let mut profile: TeleworkProfile = self.get_profile(user_id).await?;
        profile.apply_update(update, updated_by, self.now())?;
        self.store.save_profile(&profile).await?;

        info!(user_id = %user_id, updated_by, "Telework profile updated");
        Ok(profile)
    }

    /// Marks a profile inactive. Profiles are never deleted.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ProfileNotFound` or `CoreError::Store`.
    pub async fn deactivate_profile(
        &self,
        user_id: &UserId,
        updated_by: &str,
    ) -> Result<TeleworkProfile, CoreError> {
        let update: ProfileUpdate = ProfileUpdate {
            is_active: Some(false),
            ..ProfileUpdate::default()
        };
        self.update_profile(user_id, update, updated_by).await
    }

    // ========================================================================
    // Team rules
    // ========================================================================

    /// Stores a team rule after checking its recurrence.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Domain` for a recurrence that can never fire, or
    /// `CoreError::Store` on a store failure.
    pub async fn save_team_rule(&self, rule: TeamRule) -> Result<TeamRule, CoreError> {
        rule.recurrence.validate()?;
        self.store.save_team_rule(&rule).await?;

        info!(rule_id = %rule.id, name = %rule.name, "Team rule saved");
        Ok(rule)
    }

    /// # Errors
    ///
    /// Returns `CoreError::Store` if the store call fails.
    pub async fn team_rules_for_user(&self, user_id: &UserId) -> Result<Vec<TeamRule>, CoreError> {
        Ok(self.store.get_team_rules_for_user(user_id).await?)
    }
}
