// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Weekday;
use workmode::ProfileStore;
use workmode_domain::{DayPreference, TeleworkProfile, WorkMode};

use super::{NOW, alice, bob, create_test_profile, create_test_store};
use crate::SqliteStore;

#[tokio::test]
async fn test_missing_profile_is_none() {
    let store: SqliteStore = create_test_store();

    let loaded: Option<TeleworkProfile> = store.get_profile(&alice()).await.unwrap();

    assert_eq!(loaded, None);
}

#[tokio::test]
async fn test_profile_round_trip() {
    let store: SqliteStore = create_test_store();
    let mut profile: TeleworkProfile = create_test_profile(alice());
    profile.default_mode = WorkMode::Remote;
    profile
        .weekly_pattern
        .set(Weekday::Friday, DayPreference::Office);

    store.save_profile(&profile).await.unwrap();
    let loaded: Option<TeleworkProfile> = store.get_profile(&alice()).await.unwrap();

    assert_eq!(loaded, Some(profile));
}

#[tokio::test]
async fn test_save_replaces_existing_profile() {
    let store: SqliteStore = create_test_store();
    let mut profile: TeleworkProfile = create_test_profile(alice());
    store.save_profile(&profile).await.unwrap();

    profile.is_active = false;
    profile.updated_at = NOW + time::Duration::hours(1);
    profile.updated_by = String::from("hr");
    store.save_profile(&profile).await.unwrap();

    let loaded: TeleworkProfile = store.get_profile(&alice()).await.unwrap().unwrap();
    assert!(!loaded.is_active);
    assert_eq!(loaded.updated_by, "hr");
}

#[tokio::test]
async fn test_profiles_are_kept_per_user() {
    let store: SqliteStore = create_test_store();
    store
        .save_profile(&create_test_profile(alice()))
        .await
        .unwrap();

    assert!(store.get_profile(&alice()).await.unwrap().is_some());
    assert!(store.get_profile(&bob()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_stores_do_not_share_rows() {
    let first: SqliteStore = create_test_store();
    let second: SqliteStore = create_test_store();

    first
        .save_profile(&create_test_profile(alice()))
        .await
        .unwrap();

    assert!(second.get_profile(&alice()).await.unwrap().is_none());
}
