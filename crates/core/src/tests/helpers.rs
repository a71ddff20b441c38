// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use time::macros::{date, datetime};
use time::{Date, OffsetDateTime, Weekday};
use workmode_domain::{
    Approval, NewOverride, OverrideId, Recurrence, RuleId, RuleScope, TeamRule, TeleworkOverride,
    TeleworkProfile, UserId, WorkMode,
};

use crate::{
    EnginePolicy, OverrideStore, ProfileStore, StoreError, TeamRuleStore, TeleworkEngine,
};

pub const MONDAY: Date = date!(2026 - 03 - 02);
pub const TUESDAY: Date = date!(2026 - 03 - 03);
pub const WEDNESDAY: Date = date!(2026 - 03 - 04);
pub const THURSDAY: Date = date!(2026 - 03 - 05);
pub const SUNDAY: Date = date!(2026 - 03 - 08);

pub const NOW: OffsetDateTime = datetime!(2026-02-20 09:00 UTC);

pub fn user() -> UserId {
    UserId::new("u-alice")
}

pub fn create_test_profile() -> TeleworkProfile {
    TeleworkProfile::with_defaults(user(), "Alice", "admin", NOW)
}

pub fn approved_request(date: Date, mode: WorkMode) -> NewOverride {
    let mut request: NewOverride =
        NewOverride::user_request(user(), date, mode, None, "u-alice", NOW);
    request.approval = Approval::Approved {
        by: String::from("manager"),
        at: NOW,
        note: None,
    };
    request
}

pub fn pending_request(date: Date, mode: WorkMode) -> NewOverride {
    NewOverride::user_request(user(), date, mode, None, "u-alice", NOW)
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

/// A store kept in plain collections, with a switch that makes every call
/// fail as if the backend were down.
#[derive(Default)]
pub struct TestStore {
    profiles: Mutex<HashMap<UserId, TeleworkProfile>>,
    overrides: Mutex<Vec<TeleworkOverride>>,
    rules: Mutex<Vec<TeamRule>>,
    next_id: AtomicU64,
    unavailable: AtomicBool,
}

impl TestStore {
    pub fn with_profile(profile: TeleworkProfile) -> Self {
        let store: Self = Self::default();
        store
            .profiles
            .lock()
            .unwrap()
            .insert(profile.user_id.clone(), profile);
        store
    }

    pub fn fail_all(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    pub fn all_overrides(&self) -> Vec<TeleworkOverride> {
        self.overrides.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(String::from("test store is down")));
        }
        Ok(())
    }
}

impl ProfileStore for TestStore {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<TeleworkProfile>, StoreError> {
        self.check()?;
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }

    async fn save_profile(&self, profile: &TeleworkProfile) -> Result<(), StoreError> {
        self.check()?;
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }
}

impl OverrideStore for TestStore {
    async fn get_override(&self, id: &OverrideId) -> Result<Option<TeleworkOverride>, StoreError> {
        self.check()?;
        Ok(self
            .overrides
            .lock()
            .unwrap()
            .iter()
            .find(|o| &o.id == id)
            .cloned())
    }

    async fn get_overrides(
        &self,
        user_id: &UserId,
        start: Date,
        end: Date,
    ) -> Result<Vec<TeleworkOverride>, StoreError> {
        self.check()?;
        Ok(self
            .overrides
            .lock()
            .unwrap()
            .iter()
            .filter(|o| &o.user_id == user_id && o.date >= start && o.date <= end)
            .cloned()
            .collect())
    }

    async fn create_override(&self, new_override: &NewOverride) -> Result<OverrideId, StoreError> {
        self.check()?;
        let id: OverrideId = OverrideId::new(&format!(
            "o-{}",
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1
        ));
        self.overrides
            .lock()
            .unwrap()
            .push(new_override.clone().with_id(id.clone()));
        Ok(id)
    }

    async fn update_override(&self, telework_override: &TeleworkOverride) -> Result<(), StoreError> {
        self.check()?;
        let mut overrides = self.overrides.lock().unwrap();
        let slot: &mut TeleworkOverride = overrides
            .iter_mut()
            .find(|o| o.id == telework_override.id)
            .ok_or_else(|| StoreError::NotFound(telework_override.id.to_string()))?;
        *slot = telework_override.clone();
        Ok(())
    }

    async fn delete_override(&self, id: &OverrideId) -> Result<bool, StoreError> {
        self.check()?;
        let mut overrides = self.overrides.lock().unwrap();
        let before: usize = overrides.len();
        overrides.retain(|o| &o.id != id);
        Ok(overrides.len() != before)
    }
}

impl TeamRuleStore for TestStore {
    async fn get_team_rules_for_user(&self, _user_id: &UserId) -> Result<Vec<TeamRule>, StoreError> {
        self.check()?;
        Ok(self.rules.lock().unwrap().clone())
    }

    async fn save_team_rule(&self, rule: &TeamRule) -> Result<(), StoreError> {
        self.check()?;
        let mut rules = self.rules.lock().unwrap();
        rules.retain(|r| r.id != rule.id);
        rules.push(rule.clone());
        Ok(())
    }
}

pub fn create_test_engine(store: TestStore) -> TeleworkEngine<TestStore> {
    TeleworkEngine::new(store, EnginePolicy::default()).with_clock(|| NOW)
}

/// An engine over a store holding the default test profile.
pub fn create_profiled_engine() -> TeleworkEngine<TestStore> {
    create_test_engine(TestStore::with_profile(create_test_profile()))
}
