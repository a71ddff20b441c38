// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Approval, OverrideId, OverrideSource, Recurrence, ResolutionInputs, RuleId, RuleScope,
    TeamRule, TeleworkOverride, TeleworkProfile, USER_REQUEST_PRIORITY, UserId, WorkMode,
};
use std::collections::BTreeSet;
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime, Weekday};

pub const MONDAY: Date = date!(2026 - 03 - 02);
pub const TUESDAY: Date = date!(2026 - 03 - 03);
pub const WEDNESDAY: Date = date!(2026 - 03 - 04);
pub const THURSDAY: Date = date!(2026 - 03 - 05);
pub const FRIDAY: Date = date!(2026 - 03 - 06);
pub const SATURDAY: Date = date!(2026 - 03 - 07);
pub const SUNDAY: Date = date!(2026 - 03 - 08);

pub const NOW: OffsetDateTime = datetime!(2026-02-20 09:00 UTC);

pub fn user() -> UserId {
    UserId::new("u-alice")
}

pub fn create_test_profile() -> TeleworkProfile {
    TeleworkProfile::with_defaults(user(), "Alice", "admin", NOW)
}

fn approved_by_manager() -> Approval {
    Approval::Approved {
        by: String::from("manager"),
        at: NOW,
        note: None,
    }
}

pub fn user_override(id: &str, date: Date, mode: WorkMode, approval: Approval) -> TeleworkOverride {
    TeleworkOverride {
        id: OverrideId::new(id),
        user_id: user(),
        date,
        mode,
        source: OverrideSource::UserRequest,
        priority: USER_REQUEST_PRIORITY,
        reason: None,
        approval,
        created_at: NOW,
        created_by: user().value().to_string(),
    }
}

pub fn approved_request(id: &str, date: Date, mode: WorkMode) -> TeleworkOverride {
    user_override(id, date, mode, approved_by_manager())
}

pub fn pending_request(id: &str, date: Date, mode: WorkMode) -> TeleworkOverride {
    user_override(id, date, mode, Approval::Pending)
}

pub fn admin_override(id: &str, date: Date, mode: WorkMode) -> TeleworkOverride {
    TeleworkOverride {
        source: OverrideSource::AdminImposed,
        priority: 100,
        ..user_override(id, date, mode, approved_by_manager())
    }
}

pub fn weekly_rule(id: &str, day_of_week: Weekday, mode: WorkMode, priority: i32) -> TeamRule {
    TeamRule {
        id: RuleId::new(id),
        name: format!("Team day {id}"),
        scope: RuleScope::Team(String::from("platform")),
        required_mode: mode,
        priority,
        is_active: true,
        exemptions: BTreeSet::new(),
        recurrence: Recurrence::Weekly { day_of_week },
    }
}

pub fn inputs<'a>(
    profile: &'a TeleworkProfile,
    overrides: &'a [TeleworkOverride],
    team_rules: &'a [TeamRule],
) -> ResolutionInputs<'a> {
    ResolutionInputs {
        profile: Some(profile),
        overrides,
        team_rules,
    }
}
