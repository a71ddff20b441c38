// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{OffsetDateTime, Weekday};

/// Identifies an employee.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new `UserId` without validation.
    ///
    /// Use [`UserId::parse`] for untrusted input.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    /// Parses a user identifier, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUserId` if the value is blank.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidUserId(String::from(
                "User id cannot be empty",
            )));
        }
        Ok(Self::new(trimmed))
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a date-specific override.
///
/// Ids that are plain integers (store row ids) order numerically and sort
/// before any other id; everything else orders as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideId(String);

impl OverrideId {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl Ord for OverrideId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self.0.parse::<u64>(), other.0.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for OverrideId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for OverrideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a team rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.to_string())
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where an employee works on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkMode {
    #[default]
    Office,
    Remote,
}

impl WorkMode {
    /// Converts this mode to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::Remote => "remote",
        }
    }
}

impl std::fmt::Display for WorkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "office" => Ok(Self::Office),
            "remote" => Ok(Self::Remote),
            _ => Err(DomainError::InvalidWorkMode(s.to_string())),
        }
    }
}

/// A single weekday entry in a weekly pattern.
///
/// `Default` defers to the profile's default mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DayPreference {
    Office,
    Remote,
    #[default]
    Default,
}

impl DayPreference {
    /// Returns the concrete mode, or `None` when the entry defers to the default.
    #[must_use]
    pub const fn mode(&self) -> Option<WorkMode> {
        match self {
            Self::Office => Some(WorkMode::Office),
            Self::Remote => Some(WorkMode::Remote),
            Self::Default => None,
        }
    }
}

impl From<WorkMode> for DayPreference {
    fn from(mode: WorkMode) -> Self {
        match mode {
            WorkMode::Office => Self::Office,
            WorkMode::Remote => Self::Remote,
        }
    }
}

/// A per-weekday preference table.
///
/// Every weekday is a named field, so a pattern can never be missing a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct WeeklyPattern {
    pub monday: DayPreference,
    pub tuesday: DayPreference,
    pub wednesday: DayPreference,
    pub thursday: DayPreference,
    pub friday: DayPreference,
    pub saturday: DayPreference,
    pub sunday: DayPreference,
}

impl WeeklyPattern {
    /// A pattern where every day defers to the profile default.
    #[must_use]
    pub fn all_default() -> Self {
        Self::default()
    }

    /// Returns the preference for a weekday.
    #[must_use]
    pub const fn get(&self, weekday: Weekday) -> DayPreference {
        match weekday {
            Weekday::Monday => self.monday,
            Weekday::Tuesday => self.tuesday,
            Weekday::Wednesday => self.wednesday,
            Weekday::Thursday => self.thursday,
            Weekday::Friday => self.friday,
            Weekday::Saturday => self.saturday,
            Weekday::Sunday => self.sunday,
        }
    }

    /// Sets the preference for a weekday.
    pub const fn set(&mut self, weekday: Weekday, preference: DayPreference) {
        match weekday {
            Weekday::Monday => self.monday = preference,
            Weekday::Tuesday => self.tuesday = preference,
            Weekday::Wednesday => self.wednesday = preference,
            Weekday::Thursday => self.thursday = preference,
            Weekday::Friday => self.friday = preference,
            Weekday::Saturday => self.saturday = preference,
            Weekday::Sunday => self.sunday = preference,
        }
    }

    /// Returns a copy of this pattern with one weekday replaced.
    #[must_use]
    pub const fn with(mut self, weekday: Weekday, preference: DayPreference) -> Self {
        self.set(weekday, preference);
        self
    }
}

/// Remote-work limits attached to a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileConstraints {
    /// Maximum remote days in one Monday-start week (0..=7).
    pub max_remote_days_per_week: u8,
    /// Maximum remote weekdays in a row (at least 1).
    pub max_consecutive_remote_days: u8,
    /// Whether every user request needs manager approval.
    pub requires_approval: bool,
}

impl Default for ProfileConstraints {
    fn default() -> Self {
        Self {
            max_remote_days_per_week: 2,
            max_consecutive_remote_days: 2,
            requires_approval: false,
        }
    }
}

impl ProfileConstraints {
    /// Creates validated constraints.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConstraints` if the weekly limit exceeds 7
    /// or the consecutive limit is 0.
    pub fn new(
        max_remote_days_per_week: u8,
        max_consecutive_remote_days: u8,
        requires_approval: bool,
    ) -> Result<Self, DomainError> {
        let constraints: Self = Self {
            max_remote_days_per_week,
            max_consecutive_remote_days,
            requires_approval,
        };
        constraints.validate()?;
        Ok(constraints)
    }

    /// Checks the numeric bounds.
    ///
    /// Deserialized constraints bypass [`ProfileConstraints::new`], so callers
    /// accepting external input should run this.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConstraints` on an out-of-range value.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_remote_days_per_week > 7 {
            return Err(DomainError::InvalidConstraints {
                reason: format!(
                    "max_remote_days_per_week must be at most 7, got {}",
                    self.max_remote_days_per_week
                ),
            });
        }
        if self.max_consecutive_remote_days == 0 {
            return Err(DomainError::InvalidConstraints {
                reason: String::from("max_consecutive_remote_days must be at least 1"),
            });
        }
        Ok(())
    }
}

/// A user's default work mode, weekly pattern and remote-work limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleworkProfile {
    pub user_id: UserId,
    pub display_name: String,
    pub default_mode: WorkMode,
    pub weekly_pattern: WeeklyPattern,
    pub constraints: ProfileConstraints,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub created_by: String,
    pub updated_at: OffsetDateTime,
    pub updated_by: String,
}

impl TeleworkProfile {
    /// Creates a profile with the organisation defaults.
    ///
    /// Defaults: office mode, every weekday deferring to the default,
    /// at most 2 remote days per week and 2 in a row, no approval needed.
    #[must_use]
    pub fn with_defaults(
        user_id: UserId,
        display_name: &str,
        created_by: &str,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            user_id,
            display_name: display_name.to_string(),
            default_mode: WorkMode::Office,
            weekly_pattern: WeeklyPattern::all_default(),
            constraints: ProfileConstraints::default(),
            is_active: true,
            created_at: now,
            created_by: created_by.to_string(),
            updated_at: now,
            updated_by: created_by.to_string(),
        }
    }

    /// Applies a partial update, stamping the audit fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the new constraints are out of range. The profile
    /// is left untouched in that case.
    pub fn apply_update(
        &mut self,
        update: ProfileUpdate,
        updated_by: &str,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        if let Some(constraints) = &update.constraints {
            constraints.validate()?;
        }

        if let Some(display_name) = update.display_name {
            self.display_name = display_name;
        }
        if let Some(default_mode) = update.default_mode {
            self.default_mode = default_mode;
        }
        if let Some(weekly_pattern) = update.weekly_pattern {
            self.weekly_pattern = weekly_pattern;
        }
        if let Some(constraints) = update.constraints {
            self.constraints = constraints;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = now;
        self.updated_by = updated_by.to_string();
        Ok(())
    }
}

/// A partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub default_mode: Option<WorkMode>,
    #[serde(default)]
    pub weekly_pattern: Option<WeeklyPattern>,
    #[serde(default)]
    pub constraints: Option<ProfileConstraints>,
    #[serde(default)]
    pub is_active: Option<bool>,
}
