// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Period statistics and weekly-pattern previews.
//!
//! Statistics are computed over working days only. A pattern preview
//! compares the full resolution against a baseline built from tiers 4-5
//! with a hypothetical pattern; overrides and team rules are intentionally
//! not reapplied to the baseline.

use crate::calendar::{WEEKDAYS, is_weekend, weekday_name};
use crate::error::DomainError;
use crate::period::resolve_period;
use crate::overrides::TeleworkOverride;
use crate::resolution::{DayResolution, ResolutionInputs, ResolutionSource, baseline_mode};
use crate::team_rule::TeamRule;
use crate::types::{ProfileConstraints, TeleworkProfile, UserId, WeeklyPattern, WorkMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

/// Working days per week used for weekly averages and limits.
pub const WORK_DAYS_PER_WEEK: u32 = 5;

/// Remote and office counts for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayBreakdown {
    pub weekday: String,
    pub remote: u32,
    pub office: u32,
}

/// Whether a period stayed within the user's remote-work limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compliance {
    /// No error-severity conflict occurred in the period.
    pub within_limits: bool,
    /// Remote days above `policy_limit`.
    pub exceed_days: u32,
    /// Weekly remote limit multiplied by the number of started work weeks.
    pub policy_limit: u32,
}

/// Aggregated remote/office figures for a user over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleworkStats {
    pub user_id: UserId,
    pub period_start: Date,
    pub period_end: Date,
    pub total_work_days: u32,
    pub remote_days: u32,
    pub office_days: u32,
    /// Rounded to the nearest whole percent, 0 for an empty period.
    pub remote_percentage: u32,
    pub by_source: BTreeMap<ResolutionSource, u32>,
    pub by_weekday: Vec<WeekdayBreakdown>,
    pub average_remote_days_per_week: f64,
    pub compliance: Compliance,
}

/// Computes statistics for `user_id` over the working days of `start..=end`.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` if `end` precedes `start`.
pub fn calculate_stats(
    user_id: &UserId,
    start: Date,
    end: Date,
    inputs: &ResolutionInputs<'_>,
) -> Result<TeleworkStats, DomainError> {
    let days: Vec<DayResolution> = resolve_period(user_id, start, end, false, inputs)?;
    let constraints: ProfileConstraints = inputs
        .profile
        .map_or_else(ProfileConstraints::default, |p| p.constraints);
    Ok(aggregate(user_id, start, end, &days, &constraints))
}

fn aggregate(
    user_id: &UserId,
    start: Date,
    end: Date,
    days: &[DayResolution],
    constraints: &ProfileConstraints,
) -> TeleworkStats {
    let mut remote_days: u32 = 0;
    let mut office_days: u32 = 0;
    let mut by_source: BTreeMap<ResolutionSource, u32> = BTreeMap::new();
    let mut by_weekday: Vec<WeekdayBreakdown> = WEEKDAYS
        .iter()
        .filter(|weekday| !matches!(weekday, time::Weekday::Saturday | time::Weekday::Sunday))
        .map(|weekday| WeekdayBreakdown {
            weekday: weekday_name(*weekday).to_string(),
            remote: 0,
            office: 0,
        })
        .collect();

    for day in days.iter().filter(|day| !is_weekend(day.date)) {
        *by_source.entry(day.source).or_insert(0) += 1;
        let slot: Option<&mut WeekdayBreakdown> = by_weekday
            .iter_mut()
            .find(|entry| entry.weekday == weekday_name(day.date.weekday()));
        match day.resolved_mode {
            WorkMode::Remote => {
                remote_days += 1;
                if let Some(entry) = slot {
                    entry.remote += 1;
                }
            }
            WorkMode::Office => {
                office_days += 1;
                if let Some(entry) = slot {
                    entry.office += 1;
                }
            }
        }
    }

    let total_work_days: u32 = remote_days + office_days;
    let weeks: u32 = total_work_days.div_ceil(WORK_DAYS_PER_WEEK);
    let policy_limit: u32 = u32::from(constraints.max_remote_days_per_week) * weeks;
    let within_limits: bool = !days
        .iter()
        .flat_map(|day| day.conflicts.iter())
        .any(|conflict| conflict.is_error());

    TeleworkStats {
        user_id: user_id.clone(),
        period_start: start,
        period_end: end,
        total_work_days,
        remote_days,
        office_days,
        remote_percentage: percentage(remote_days, total_work_days),
        by_source,
        by_weekday,
        average_remote_days_per_week: average_per_week(remote_days, total_work_days),
        compliance: Compliance {
            within_limits,
            exceed_days: remote_days.saturating_sub(policy_limit),
            policy_limit,
        },
    }
}

/// `round(100 * part / whole)` with halves rounded up; 0 when `whole` is 0.
fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part: u64 = u64::from(part);
    let whole: u64 = u64::from(whole);
    let rounded: u64 = (200 * part + whole) / (2 * whole);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

fn average_per_week(remote_days: u32, total_work_days: u32) -> f64 {
    if total_work_days == 0 {
        return 0.0;
    }
    f64::from(remote_days) / (f64::from(total_work_days) / f64::from(WORK_DAYS_PER_WEEK))
}

/// One day of a baseline projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewDay {
    pub date: Date,
    pub mode: WorkMode,
    pub source: ResolutionSource,
}

/// Current resolution next to a hypothetical-pattern baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternPreview {
    pub current: Vec<DayResolution>,
    pub preview: Vec<PreviewDay>,
    /// Days whose baseline mode differs from the current resolved mode.
    pub changes: u32,
}

/// Projects what `new_pattern` would produce over the working days of
/// `start..=end` without touching stored state.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` if `end` precedes `start`.
pub fn preview_pattern_change(
    profile: &TeleworkProfile,
    new_pattern: &WeeklyPattern,
    start: Date,
    end: Date,
    overrides: &[TeleworkOverride],
    team_rules: &[TeamRule],
) -> Result<PatternPreview, DomainError> {
    let inputs: ResolutionInputs<'_> = ResolutionInputs {
        profile: Some(profile),
        overrides,
        team_rules,
    };
    let current: Vec<DayResolution> =
        resolve_period(&profile.user_id, start, end, false, &inputs)?;

    let preview: Vec<PreviewDay> = current
        .iter()
        .map(|day| {
            let (mode, source) = baseline_mode(profile.default_mode, new_pattern, day.date);
            PreviewDay {
                date: day.date,
                mode,
                source,
            }
        })
        .collect();

    let changes: u32 = current
        .iter()
        .zip(&preview)
        .fold(0, |count, (day, projected)| {
            if day.resolved_mode == projected.mode {
                count
            } else {
                count + 1
            }
        });

    Ok(PatternPreview {
        current,
        preview,
        changes,
    })
}
