// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod engine_tests;
mod profile_tests;
mod seed_tests;

use std::collections::BTreeSet;

use time::macros::{date, datetime};
use time::{Date, OffsetDateTime, Weekday};
use workmode_domain::{
    Approval, NewOverride, Recurrence, RuleId, RuleScope, TeamRule, TeleworkProfile, UserId,
    WorkMode,
};

use crate::SqliteStore;

pub const MONDAY: Date = date!(2026 - 03 - 02);
pub const TUESDAY: Date = date!(2026 - 03 - 03);
pub const FRIDAY: Date = date!(2026 - 03 - 06);

pub const NOW: OffsetDateTime = datetime!(2026-02-20 09:00 UTC);

pub fn create_test_store() -> SqliteStore {
    SqliteStore::new_in_memory().expect("in-memory store")
}

pub fn alice() -> UserId {
    UserId::new("u-alice")
}

pub fn bob() -> UserId {
    UserId::new("u-bob")
}

pub fn create_test_profile(user_id: UserId) -> TeleworkProfile {
    let display_name: String = user_id.value().trim_start_matches("u-").to_string();
    TeleworkProfile::with_defaults(user_id, &display_name, "admin", NOW)
}

pub fn pending_request(user_id: UserId, date: Date, mode: WorkMode) -> NewOverride {
    NewOverride::user_request(user_id, date, mode, None, "u-alice", NOW)
}

pub fn approved_request(user_id: UserId, date: Date, mode: WorkMode) -> NewOverride {
    let mut request: NewOverride = pending_request(user_id, date, mode);
    request.approval = Approval::Approved {
        by: String::from("manager"),
        at: NOW,
        note: None,
    };
    request
}

pub fn weekly_rule(id: &str, scope: RuleScope, day_of_week: Weekday) -> TeamRule {
    TeamRule {
        id: RuleId::new(id),
        name: format!("Office day {id}"),
        scope,
        required_mode: WorkMode::Office,
        priority: 10,
        is_active: true,
        exemptions: BTreeSet::new(),
        recurrence: Recurrence::Weekly { day_of_week },
    }
}

pub fn platform() -> RuleScope {
    RuleScope::Team(String::from("platform"))
}
