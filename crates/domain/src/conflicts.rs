// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conflict and warning detection for a single day.
//!
//! The detector looks at the raw inputs, not only the winning tier, so it
//! also reports disagreements that did not decide the outcome.

use crate::calendar::is_weekend;
use crate::overrides::{OverrideSource, TeleworkOverride};
use crate::resolution::{DayContext, ResolutionInputs, ResolutionSource, TierOutcome, determine};
use crate::types::{TeleworkProfile, UserId, WorkMode};
use serde::{Deserialize, Serialize};
use time::Date;

/// Confidence below which a resolution is reported as uncertain.
pub const CERTAINTY_THRESHOLD: u8 = 80;

/// Category of a detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    TeamRuleConflict,
    ConstraintViolation,
    ApprovalRequired,
    ProfileNotFound,
}

/// How serious a conflict is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A disagreement or risk between the rule sources feeding a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub severity: Severity,
    pub message: String,
    /// Identifier of the rule, override or user that caused the conflict.
    pub source: String,
    pub resolution_suggestions: Vec<String>,
}

impl Conflict {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

/// Detects conflicts for `user_id` on `date`.
///
/// Returns an empty list when no profile is available; the missing-profile
/// conflict is produced by resolution itself.
#[must_use]
pub fn detect_conflicts(
    user_id: &UserId,
    date: Date,
    inputs: &ResolutionInputs<'_>,
) -> Vec<Conflict> {
    let Some(profile) = inputs.profile else {
        return Vec::new();
    };
    let ctx: DayContext<'_> =
        DayContext::new(user_id, date, profile, inputs.overrides, inputs.team_rules);
    let outcome: TierOutcome = determine(&ctx);
    detect_in_context(&ctx, &outcome)
}

pub(crate) fn detect_in_context(ctx: &DayContext<'_>, outcome: &TierOutcome) -> Vec<Conflict> {
    let mut conflicts: Vec<Conflict> = Vec::new();
    let requests: Vec<&TeleworkOverride> = ctx.live_user_requests();

    // Every user request that disagrees with a binding team rule. The rule
    // wins resolution either way, so the user is told their request is ignored.
    if let Some(rule) = ctx.binding_rule() {
        for request in requests.iter().filter(|r| r.mode != rule.required_mode) {
            let severity: Severity = if request.is_pending() {
                Severity::Warning
            } else {
                Severity::Info
            };
            conflicts.push(Conflict {
                kind: ConflictKind::TeamRuleConflict,
                severity,
                message: format!(
                    "Request {} for {} conflicts with team rule '{}' requiring {}",
                    request.id, request.mode, rule.name, rule.required_mode
                ),
                source: rule.id.value().to_string(),
                resolution_suggestions: vec![
                    format!("Team rule '{}' takes precedence on this date", rule.name),
                    String::from("Ask the rule owner for an exemption"),
                ],
            });
        }
    }

    // Read-time hint only; the weekly count is enforced when the request is made.
    if outcome.source == ResolutionSource::Override && outcome.mode == WorkMode::Remote {
        let source: String = ctx
            .approved_override(OverrideSource::UserRequest)
            .map_or_else(String::new, |o| o.id.value().to_string());
        conflicts.push(Conflict {
            kind: ConflictKind::ConstraintViolation,
            severity: Severity::Info,
            message: String::from("Remote day granted by override"),
            source,
            resolution_suggestions: vec![format!(
                "Verify the weekly limit of {} remote days is respected",
                ctx.profile.constraints.max_remote_days_per_week
            )],
        });
    }

    for request in requests.iter().filter(|r| r.is_pending()) {
        conflicts.push(Conflict {
            kind: ConflictKind::ApprovalRequired,
            severity: Severity::Info,
            message: format!("Request for {} is awaiting approval", request.mode),
            source: request.id.value().to_string(),
            resolution_suggestions: vec![String::from(
                "Contact your manager to approve the request",
            )],
        });
    }

    conflicts
}

/// Builds the soft warnings for a resolved day.
#[must_use]
pub fn warnings_for(
    profile: &TeleworkProfile,
    date: Date,
    mode: WorkMode,
    source: ResolutionSource,
    confidence: u8,
    conflict_count: usize,
) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();

    if !profile.is_active {
        warnings.push(String::from("Profile is inactive"));
    }
    if confidence < CERTAINTY_THRESHOLD {
        warnings.push(format!("Resolution uncertain (confidence {confidence}%)"));
    }
    if mode == WorkMode::Remote && is_weekend(date) {
        warnings.push(String::from("Weekend remote work detected"));
    }
    if source == ResolutionSource::Default && profile.default_mode == WorkMode::Remote {
        warnings.push(String::from(
            "Default remote mode applied, verify it is applicable",
        ));
    }
    if conflict_count > 0 {
        warnings.push(format!("{conflict_count} conflict(s) detected"));
    }

    warnings
}
