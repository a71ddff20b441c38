// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Multi-day views built from single-day resolutions.
//!
//! Each day is resolved independently; ordering only matters for output.

use crate::calendar::{add_days, days_in_range, is_weekend, week_start};
use crate::error::DomainError;
use crate::resolution::{DayResolution, ResolutionInputs, resolve_day};
use crate::types::{UserId, WorkMode};
use serde::{Deserialize, Serialize};
use time::Date;

/// Per-week counters shown alongside a week view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub remote_days: u32,
    pub office_days: u32,
    pub total_conflicts: u32,
    /// Days with a user request still awaiting approval.
    pub pending_requests: u32,
}

impl WeeklyStats {
    fn from_days(days: &[DayResolution]) -> Self {
        days.iter().fold(Self::default(), |mut stats, day| {
            match day.resolved_mode {
                WorkMode::Remote => stats.remote_days += 1,
                WorkMode::Office => stats.office_days += 1,
            }
            stats.total_conflicts += u32::try_from(day.conflicts.len()).unwrap_or(u32::MAX);
            if day.has_pending_request {
                stats.pending_requests += 1;
            }
            stats
        })
    }
}

/// Seven resolved days, Monday through Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekView {
    pub week_start: Date,
    pub week_end: Date,
    pub days: Vec<DayResolution>,
    pub weekly_stats: WeeklyStats,
}

/// Resolves every day in `start..=end`.
///
/// Weekends are skipped unless `include_weekends` is set; statistics use
/// working days only.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` if `end` precedes `start`.
pub fn resolve_period(
    user_id: &UserId,
    start: Date,
    end: Date,
    include_weekends: bool,
    inputs: &ResolutionInputs<'_>,
) -> Result<Vec<DayResolution>, DomainError> {
    Ok(days_in_range(start, end)?
        .into_iter()
        .filter(|date| include_weekends || !is_weekend(*date))
        .map(|date| resolve_day(user_id, date, inputs))
        .collect())
}

/// Resolves the Monday-start week containing `date`.
///
/// Any date in the week is accepted and normalised to its Monday. Weekend
/// days are included and flagged through `DayResolution::is_weekend`.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` at the calendar bounds.
pub fn resolve_week(
    user_id: &UserId,
    date: Date,
    inputs: &ResolutionInputs<'_>,
) -> Result<WeekView, DomainError> {
    let start: Date = week_start(date)?;
    let end: Date = add_days(start, 6)?;
    let days: Vec<DayResolution> = resolve_period(user_id, start, end, true, inputs)?;
    let weekly_stats: WeeklyStats = WeeklyStats::from_days(&days);

    Ok(WeekView {
        week_start: start,
        week_end: end,
        days,
        weekly_stats,
    })
}
