// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rule evaluation for hybrid-work day resolution.
//!
//! Everything in this crate is a pure function of already-loaded records:
//! profiles, overrides and team rules in, resolutions, conflicts,
//! validation results and statistics out. Loading and persisting those
//! records is the engine's job.

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

mod calendar;
mod conflicts;
mod error;
mod overrides;
mod period;
mod resolution;
mod stats;
mod team_rule;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use calendar::{
    WEEKDAYS, add_days, days_in_range, is_weekend, week_bounds, week_start, weekday_name,
};
pub use conflicts::{
    CERTAINTY_THRESHOLD, Conflict, ConflictKind, Severity, detect_conflicts, warnings_for,
};
pub use error::DomainError;
pub use overrides::{
    ADMIN_IMPOSED_PRIORITY, Approval, ApprovalStatus, NewOverride, OverrideSource,
    TeleworkOverride, USER_REQUEST_PRIORITY,
};
pub use period::{WeekView, WeeklyStats, resolve_period, resolve_week};
pub use resolution::{
    AppliedRule, DayResolution, ResolutionInputs, ResolutionSource, baseline_mode, resolve_day,
};
pub use stats::{
    Compliance, PatternPreview, PreviewDay, TeleworkStats, WORK_DAYS_PER_WEEK, WeekdayBreakdown,
    calculate_stats, preview_pattern_change,
};
pub use team_rule::{Recurrence, RuleScope, TeamRule, winning_rule};
pub use types::{
    DayPreference, OverrideId, ProfileConstraints, ProfileUpdate, RuleId, TeleworkProfile, UserId,
    WeeklyPattern, WorkMode,
};
pub use validation::{ValidationResult, validate_override_request};
