// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Single-day work mode resolution.
//!
//! The effective mode for a (user, date) comes from the first tier that
//! produces an answer:
//!
//! 1. Approved admin-imposed override (confidence 100)
//! 2. Highest-priority binding team rule (confidence 90)
//! 3. Approved user-requested override (confidence 85)
//! 4. Weekly pattern entry other than `default` (confidence 80)
//! 5. Profile default mode (confidence 70)
//!
//! Tiers never blend. Resolutions are derived views and must be recomputed
//! whenever a profile, override or team rule changes.

use crate::calendar::is_weekend;
use crate::conflicts::{Conflict, ConflictKind, Severity, detect_in_context, warnings_for};
use crate::overrides::{ApprovalStatus, OverrideSource, TeleworkOverride};
use crate::team_rule::{TeamRule, winning_rule};
use crate::types::{OverrideId, RuleId, TeleworkProfile, UserId, WeeklyPattern, WorkMode};
use serde::{Deserialize, Serialize};
use time::Date;

/// Which tier of the hierarchy produced a resolution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Default,
    Pattern,
    Override,
    TeamRule,
    AdminImposed,
}

impl ResolutionSource {
    /// Fixed confidence score for this tier.
    #[must_use]
    pub const fn confidence(&self) -> u8 {
        match self {
            Self::AdminImposed => 100,
            Self::TeamRule => 90,
            Self::Override => 85,
            Self::Pattern => 80,
            Self::Default => 70,
        }
    }
}

/// Reference to the record that produced a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AppliedRule {
    Profile { user_id: UserId },
    Override { id: OverrideId },
    TeamRule { id: RuleId, name: String },
}

/// The computed outcome for one user on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayResolution {
    pub user_id: UserId,
    pub date: Date,
    pub resolved_mode: WorkMode,
    pub source: ResolutionSource,
    /// 0 only when the profile is missing, otherwise 70..=100.
    pub confidence: u8,
    pub applied_rules: Vec<AppliedRule>,
    pub conflicts: Vec<Conflict>,
    pub warnings: Vec<String>,
    pub is_weekend: bool,
    /// A user request for this date is still awaiting a decision.
    pub has_pending_request: bool,
}

/// Loaded records a resolution is computed from.
///
/// `overrides` and `team_rules` may cover more than the target day or user;
/// each tier filters to what binds on the date.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionInputs<'a> {
    pub profile: Option<&'a TeleworkProfile>,
    pub overrides: &'a [TeleworkOverride],
    pub team_rules: &'a [TeamRule],
}

/// Inputs narrowed to a single (user, date) with a known profile.
pub(crate) struct DayContext<'a> {
    pub(crate) user_id: &'a UserId,
    pub(crate) date: Date,
    pub(crate) profile: &'a TeleworkProfile,
    pub(crate) overrides: Vec<&'a TeleworkOverride>,
    pub(crate) team_rules: &'a [TeamRule],
}

impl<'a> DayContext<'a> {
    pub(crate) fn new(
        user_id: &'a UserId,
        date: Date,
        profile: &'a TeleworkProfile,
        overrides: &'a [TeleworkOverride],
        team_rules: &'a [TeamRule],
    ) -> Self {
        Self {
            user_id,
            date,
            profile,
            overrides: overrides
                .iter()
                .filter(|o| o.date == date && &o.user_id == user_id)
                .collect(),
            team_rules,
        }
    }

    pub(crate) fn binding_rule(&self) -> Option<&'a TeamRule> {
        winning_rule(self.team_rules, self.user_id, self.date)
    }

    /// Highest-priority approved override from `source`, lowest id on ties.
    pub(crate) fn approved_override(&self, source: OverrideSource) -> Option<&'a TeleworkOverride> {
        self.overrides
            .iter()
            .copied()
            .filter(|o| o.source == source && o.is_approved())
            .min_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)))
    }

    /// User requests that have not been rejected, highest priority first.
    pub(crate) fn live_user_requests(&self) -> Vec<&'a TeleworkOverride> {
        let mut requests: Vec<&'a TeleworkOverride> = self
            .overrides
            .iter()
            .copied()
            .filter(|o| {
                o.source == OverrideSource::UserRequest && o.status() != ApprovalStatus::Rejected
            })
            .collect();
        requests.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.id.cmp(&b.id)));
        requests
    }

    pub(crate) fn has_pending_request(&self) -> bool {
        self.overrides
            .iter()
            .any(|o| o.source == OverrideSource::UserRequest && o.is_pending())
    }
}

/// The winning tier's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TierOutcome {
    pub(crate) mode: WorkMode,
    pub(crate) source: ResolutionSource,
    pub(crate) applied: AppliedRule,
}

type Tier = fn(&DayContext<'_>) -> Option<TierOutcome>;

/// Tiers 1-4 in priority order. Tier 5 is total and handled by [`default_tier`].
const HIERARCHY: [Tier; 4] = [admin_tier, team_rule_tier, user_override_tier, pattern_tier];

fn admin_tier(ctx: &DayContext<'_>) -> Option<TierOutcome> {
    ctx.approved_override(OverrideSource::AdminImposed)
        .map(|o| TierOutcome {
            mode: o.mode,
            source: ResolutionSource::AdminImposed,
            applied: AppliedRule::Override { id: o.id.clone() },
        })
}

fn team_rule_tier(ctx: &DayContext<'_>) -> Option<TierOutcome> {
    ctx.binding_rule().map(|rule| TierOutcome {
        mode: rule.required_mode,
        source: ResolutionSource::TeamRule,
        applied: AppliedRule::TeamRule {
            id: rule.id.clone(),
            name: rule.name.clone(),
        },
    })
}

fn user_override_tier(ctx: &DayContext<'_>) -> Option<TierOutcome> {
    ctx.approved_override(OverrideSource::UserRequest)
        .map(|o| TierOutcome {
            mode: o.mode,
            source: ResolutionSource::Override,
            applied: AppliedRule::Override { id: o.id.clone() },
        })
}

fn pattern_tier(ctx: &DayContext<'_>) -> Option<TierOutcome> {
    pattern_mode(&ctx.profile.weekly_pattern, ctx.date).map(|mode| TierOutcome {
        mode,
        source: ResolutionSource::Pattern,
        applied: AppliedRule::Profile {
            user_id: ctx.profile.user_id.clone(),
        },
    })
}

fn default_tier(ctx: &DayContext<'_>) -> TierOutcome {
    TierOutcome {
        mode: ctx.profile.default_mode,
        source: ResolutionSource::Default,
        applied: AppliedRule::Profile {
            user_id: ctx.profile.user_id.clone(),
        },
    }
}

fn pattern_mode(pattern: &WeeklyPattern, date: Date) -> Option<WorkMode> {
    pattern.get(date.weekday()).mode()
}

pub(crate) fn determine(ctx: &DayContext<'_>) -> TierOutcome {
    HIERARCHY
        .iter()
        .find_map(|tier| tier(ctx))
        .unwrap_or_else(|| default_tier(ctx))
}

/// Resolves the baseline mode from a pattern and default alone (tiers 4-5).
///
/// Overrides and team rules are deliberately ignored; this answers what a
/// weekly pattern would produce, not what will actually happen.
#[must_use]
pub fn baseline_mode(
    default_mode: WorkMode,
    pattern: &WeeklyPattern,
    date: Date,
) -> (WorkMode, ResolutionSource) {
    pattern_mode(pattern, date).map_or((default_mode, ResolutionSource::Default), |mode| {
        (mode, ResolutionSource::Pattern)
    })
}

/// Resolves the effective work mode for `user_id` on `date`.
///
/// A missing profile does not fail: the result is forced to office with
/// confidence 0 and an error-severity conflict, so a multi-user view can
/// still render.
#[must_use]
pub fn resolve_day(user_id: &UserId, date: Date, inputs: &ResolutionInputs<'_>) -> DayResolution {
    let Some(profile) = inputs.profile else {
        return missing_profile_resolution(user_id, date);
    };

    let ctx: DayContext<'_> =
        DayContext::new(user_id, date, profile, inputs.overrides, inputs.team_rules);
    let outcome: TierOutcome = determine(&ctx);
    let conflicts: Vec<Conflict> = detect_in_context(&ctx, &outcome);
    let confidence: u8 = outcome.source.confidence();
    let warnings: Vec<String> = warnings_for(
        profile,
        date,
        outcome.mode,
        outcome.source,
        confidence,
        conflicts.len(),
    );

    DayResolution {
        user_id: user_id.clone(),
        date,
        resolved_mode: outcome.mode,
        source: outcome.source,
        confidence,
        applied_rules: vec![outcome.applied],
        conflicts,
        warnings,
        is_weekend: is_weekend(date),
        has_pending_request: ctx.has_pending_request(),
    }
}

fn missing_profile_resolution(user_id: &UserId, date: Date) -> DayResolution {
    DayResolution {
        user_id: user_id.clone(),
        date,
        resolved_mode: WorkMode::Office,
        source: ResolutionSource::Default,
        confidence: 0,
        applied_rules: Vec::new(),
        conflicts: vec![Conflict {
            kind: ConflictKind::ProfileNotFound,
            severity: Severity::Error,
            message: format!("Telework profile not found for user {user_id}"),
            source: user_id.value().to_string(),
            resolution_suggestions: vec![String::from(
                "Create a telework profile for this user",
            )],
        }],
        warnings: vec![String::from(
            "No profile available, office mode was forced as a safe default",
        )],
        is_weekend: is_weekend(date),
        has_pending_request: false,
    }
}
