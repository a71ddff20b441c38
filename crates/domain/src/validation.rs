// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-time validation of new override requests.
//!
//! Findings are advisory: only a missing profile stops a request outright.
//! Everything else is reported as conflicts and the caller decides whether
//! to block the write. The check is best-effort; two concurrent requests
//! for the same week can both pass.

use crate::calendar::{add_days, is_weekend, week_bounds};
use crate::conflicts::{Conflict, ConflictKind, Severity};
use crate::error::DomainError;
use crate::resolution::{DayContext, ResolutionInputs, determine};
use crate::types::{TeleworkProfile, UserId, WorkMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::Date;

/// Outcome of validating an override request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// No error-severity conflicts were found.
    pub is_valid: bool,
    /// The request may be stored. False only when the profile is missing.
    pub can_proceed: bool,
    #[serde(default)]
    pub reason: Option<String>,
    pub conflicts: Vec<Conflict>,
    pub requires_approval: bool,
}

impl ValidationResult {
    fn missing_profile() -> Self {
        Self {
            is_valid: false,
            can_proceed: false,
            reason: Some(String::from("Telework profile not found")),
            conflicts: Vec::new(),
            requires_approval: false,
        }
    }

    fn from_conflicts(profile: &TeleworkProfile, conflicts: Vec<Conflict>) -> Self {
        let has_error: bool = conflicts.iter().any(Conflict::is_error);
        let has_rule_conflict: bool = conflicts
            .iter()
            .any(|c| c.kind == ConflictKind::TeamRuleConflict);
        let reason: Option<String> = conflicts
            .iter()
            .find(|c| c.is_error())
            .map(|c| c.message.clone());

        Self {
            is_valid: !has_error,
            can_proceed: true,
            reason,
            requires_approval: profile.constraints.requires_approval
                || has_rule_conflict
                || has_error,
            conflicts,
        }
    }
}

/// Validates a request for `user_id` to work in `requested_mode` on `date`.
///
/// `inputs.overrides` should cover at least the Monday-start week around
/// `date`; a wider window lets the consecutive-day check see further.
///
/// # Errors
///
/// Returns `DomainError::DateArithmeticOverflow` at the calendar bounds.
pub fn validate_override_request(
    user_id: &UserId,
    date: Date,
    requested_mode: WorkMode,
    inputs: &ResolutionInputs<'_>,
) -> Result<ValidationResult, DomainError> {
    let Some(profile) = inputs.profile else {
        return Ok(ValidationResult::missing_profile());
    };

    let mut conflicts: Vec<Conflict> = Vec::new();

    if requested_mode == WorkMode::Remote {
        if let Some(conflict) = check_weekly_limit(user_id, date, profile, inputs)? {
            conflicts.push(conflict);
        }
        if let Some(conflict) = check_consecutive_limit(user_id, date, profile, inputs)? {
            conflicts.push(conflict);
        }
    }

    conflicts.extend(
        inputs
            .team_rules
            .iter()
            .filter(|rule| rule.applies_to(user_id, date) && rule.required_mode != requested_mode)
            .map(|rule| Conflict {
                kind: ConflictKind::TeamRuleConflict,
                severity: Severity::Warning,
                message: format!(
                    "Team rule '{}' requires {} on {date}",
                    rule.name, rule.required_mode
                ),
                source: rule.id.value().to_string(),
                resolution_suggestions: vec![
                    String::from("Choose a date the team rule does not cover"),
                    String::from("Request an exemption from the rule owner"),
                ],
            }),
    );

    Ok(ValidationResult::from_conflicts(profile, conflicts))
}

/// Counts approved remote days in the week of `date`, excluding `date`
/// itself so a re-request does not count twice.
fn check_weekly_limit(
    user_id: &UserId,
    date: Date,
    profile: &TeleworkProfile,
    inputs: &ResolutionInputs<'_>,
) -> Result<Option<Conflict>, DomainError> {
    let (week_start, week_end) = week_bounds(date)?;
    let remote_dates: BTreeSet<Date> = inputs
        .overrides
        .iter()
        .filter(|o| {
            &o.user_id == user_id
                && o.is_approved()
                && o.mode == WorkMode::Remote
                && o.date != date
                && (week_start..=week_end).contains(&o.date)
        })
        .map(|o| o.date)
        .collect();

    let limit: u8 = profile.constraints.max_remote_days_per_week;
    if remote_dates.len() < usize::from(limit) {
        return Ok(None);
    }

    Ok(Some(Conflict {
        kind: ConflictKind::ConstraintViolation,
        severity: Severity::Error,
        message: format!(
            "Weekly limit of {limit} remote days reached ({} already approved for the week of {week_start})",
            remote_dates.len()
        ),
        source: user_id.value().to_string(),
        resolution_suggestions: vec![
            String::from("Pick another day in a different week"),
            String::from("Request a manager exception to the weekly limit"),
        ],
    }))
}

/// Flags a request that would extend a run of remote weekdays past the
/// consecutive limit. Weekends neither count toward nor break a run.
fn check_consecutive_limit(
    user_id: &UserId,
    date: Date,
    profile: &TeleworkProfile,
    inputs: &ResolutionInputs<'_>,
) -> Result<Option<Conflict>, DomainError> {
    let limit: u32 = u32::from(profile.constraints.max_consecutive_remote_days);
    let before: u32 = remote_run(user_id, date, -1, limit, profile, inputs)?;
    let after: u32 = remote_run(user_id, date, 1, limit, profile, inputs)?;
    let run: u32 = before + 1 + after;

    if run <= limit {
        return Ok(None);
    }

    Ok(Some(Conflict {
        kind: ConflictKind::ConstraintViolation,
        severity: Severity::Warning,
        message: format!(
            "Request would create {run} consecutive remote days (limit {limit})"
        ),
        source: user_id.value().to_string(),
        resolution_suggestions: vec![String::from(
            "Break up the remote stretch with an office day",
        )],
    }))
}

fn remote_run(
    user_id: &UserId,
    from: Date,
    step: i64,
    limit: u32,
    profile: &TeleworkProfile,
    inputs: &ResolutionInputs<'_>,
) -> Result<u32, DomainError> {
    let mut run: u32 = 0;
    let mut current: Date = from;
    while run <= limit {
        current = add_days(current, step)?;
        if is_weekend(current) {
            continue;
        }
        let ctx: DayContext<'_> =
            DayContext::new(user_id, current, profile, inputs.overrides, inputs.team_rules);
        if determine(&ctx).mode != WorkMode::Remote {
            break;
        }
        run += 1;
    }
    Ok(run)
}
