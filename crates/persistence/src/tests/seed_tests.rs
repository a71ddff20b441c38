// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;

use time::Weekday;
use workmode::{OverrideStore, ProfileStore, TeamRuleStore};
use workmode_domain::{
    ProfileConstraints, Recurrence, TeamRule, TeleworkOverride, TeleworkProfile, WorkMode,
};

use super::{
    FRIDAY, MONDAY, alice, approved_request, bob, create_test_profile, create_test_store,
    pending_request, platform, weekly_rule,
};
use crate::{GroupMembership, PersistenceError, SeedDocument, SqliteStore};

fn create_test_seed() -> SeedDocument {
    SeedDocument {
        profiles: vec![create_test_profile(alice()), create_test_profile(bob())],
        overrides: vec![
            approved_request(alice(), MONDAY, WorkMode::Remote),
            pending_request(bob(), FRIDAY, WorkMode::Remote),
        ],
        team_rules: vec![weekly_rule("r-platform", platform(), Weekday::Wednesday)],
        memberships: vec![GroupMembership {
            user_id: alice(),
            scope: platform(),
        }],
    }
}

fn temp_seed_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("workmode_seed_{}_{name}.json", std::process::id()))
}

#[tokio::test]
async fn test_seed_loads_every_section() {
    let store: SqliteStore = create_test_store();

    store.load_seed(&create_test_seed()).await.unwrap();

    assert!(store.get_profile(&alice()).await.unwrap().is_some());
    assert!(store.get_profile(&bob()).await.unwrap().is_some());
    let overrides: Vec<TeleworkOverride> = store
        .get_overrides(&alice(), MONDAY, FRIDAY)
        .await
        .unwrap();
    assert_eq!(overrides.len(), 1);
    assert!(overrides[0].is_approved());
    let rules: Vec<TeamRule> = store.get_team_rules_for_user(&alice()).await.unwrap();
    assert_eq!(rules.len(), 1);
    assert!(
        store
            .get_team_rules_for_user(&bob())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_seed_file_round_trip() {
    let path: PathBuf = temp_seed_path("round_trip");
    let seed: SeedDocument = create_test_seed();
    std::fs::write(&path, serde_json::to_string_pretty(&seed).unwrap()).unwrap();

    let loaded: SeedDocument = SeedDocument::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, seed);
}

#[test]
fn test_seed_sections_are_optional() {
    let path: PathBuf = temp_seed_path("partial");
    std::fs::write(
        &path,
        r#"{"memberships":[{"user_id":"u-alice","scope":{"kind":"team","name":"platform"}}]}"#,
    )
    .unwrap();

    let loaded: SeedDocument = SeedDocument::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(loaded.profiles.is_empty());
    assert!(loaded.overrides.is_empty());
    assert_eq!(loaded.memberships[0].scope, platform());
}

#[test]
fn test_missing_seed_file_is_initialization_error() {
    let result: Result<SeedDocument, PersistenceError> =
        SeedDocument::from_file(temp_seed_path("does_not_exist"));

    assert!(matches!(
        result,
        Err(PersistenceError::InitializationError(_))
    ));
}

#[test]
fn test_malformed_seed_file_is_serialization_error() {
    let path: PathBuf = temp_seed_path("malformed");
    std::fs::write(&path, "{\"profiles\": 7}").unwrap();

    let result: Result<SeedDocument, PersistenceError> = SeedDocument::from_file(&path);
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(PersistenceError::SerializationError(_))));
}

#[tokio::test]
async fn test_seed_rejects_rule_that_never_fires() {
    let store: SqliteStore = create_test_store();
    let mut rule: TeamRule = weekly_rule("r-bad", platform(), Weekday::Monday);
    rule.recurrence = Recurrence::Monthly { day_of_month: 32 };
    let seed: SeedDocument = SeedDocument {
        team_rules: vec![rule],
        ..SeedDocument::default()
    };

    let result: Result<(), PersistenceError> = store.load_seed(&seed).await;

    assert!(matches!(
        result,
        Err(PersistenceError::InitializationError(_))
    ));
}

#[tokio::test]
async fn test_seed_rejects_out_of_range_constraints() {
    let store: SqliteStore = create_test_store();
    let mut profile: TeleworkProfile = create_test_profile(alice());
    profile.constraints = ProfileConstraints {
        max_remote_days_per_week: 9,
        ..ProfileConstraints::default()
    };
    let seed: SeedDocument = SeedDocument {
        profiles: vec![profile],
        ..SeedDocument::default()
    };

    let result: Result<(), PersistenceError> = store.load_seed(&seed).await;

    assert!(result.is_err());
    assert!(store.get_profile(&alice()).await.unwrap().is_none());
}
