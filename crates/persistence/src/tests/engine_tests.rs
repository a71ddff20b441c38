// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The engine running over a real database.

use time::Weekday;
use workmode::{CoreError, EnginePolicy, OverrideRequest, RequestOutcome, StoreError, TeleworkEngine};
use workmode_domain::{
    ApprovalStatus, DayResolution, ProfileConstraints, ProfileUpdate, ResolutionSource,
    TeleworkOverride, WeekView, WorkMode,
};

use super::{
    MONDAY, NOW, TUESDAY, alice, create_test_store, platform, weekly_rule,
};
use crate::SqliteStore;

async fn create_test_engine() -> TeleworkEngine<SqliteStore> {
    let store: SqliteStore = create_test_store();
    store.add_group_membership(&alice(), &platform()).await.unwrap();
    let engine: TeleworkEngine<SqliteStore> =
        TeleworkEngine::new(store, EnginePolicy::default()).with_clock(|| NOW);
    engine
        .create_default_profile(&alice(), "Alice", "admin")
        .await
        .unwrap();
    engine
}

fn remote_request() -> OverrideRequest {
    OverrideRequest {
        user_id: alice(),
        date: TUESDAY,
        mode: WorkMode::Remote,
        reason: Some(String::from("Deep work")),
    }
}

#[tokio::test]
async fn test_auto_approved_request_resolves() {
    let engine: TeleworkEngine<SqliteStore> = create_test_engine().await;

    let outcome: RequestOutcome = engine
        .request_override(remote_request(), "u-alice")
        .await
        .unwrap();
    let resolution: DayResolution = engine.resolve_day(&alice(), TUESDAY).await.unwrap();

    assert_eq!(outcome.created.status(), ApprovalStatus::Approved);
    assert_eq!(resolution.resolved_mode, WorkMode::Remote);
    assert_eq!(resolution.source, ResolutionSource::Override);
}

#[tokio::test]
async fn test_member_rule_outranks_request() {
    let engine: TeleworkEngine<SqliteStore> = create_test_engine().await;
    engine
        .save_team_rule(weekly_rule("r-platform", platform(), Weekday::Tuesday))
        .await
        .unwrap();
    engine
        .request_override(remote_request(), "u-alice")
        .await
        .unwrap();

    let resolution: DayResolution = engine.resolve_day(&alice(), TUESDAY).await.unwrap();

    assert_eq!(resolution.resolved_mode, WorkMode::Office);
    assert_eq!(resolution.source, ResolutionSource::TeamRule);
}

#[tokio::test]
async fn test_second_approved_request_is_store_conflict() {
    let engine: TeleworkEngine<SqliteStore> = create_test_engine().await;
    engine
        .request_override(remote_request(), "u-alice")
        .await
        .unwrap();

    let result: Result<RequestOutcome, CoreError> =
        engine.request_override(remote_request(), "u-alice").await;

    assert!(matches!(
        result,
        Err(CoreError::Store(StoreError::Conflict(_)))
    ));
}

#[tokio::test]
async fn test_pending_then_approved_flow() {
    let engine: TeleworkEngine<SqliteStore> = create_test_engine().await;
    let update: ProfileUpdate = ProfileUpdate {
        constraints: Some(ProfileConstraints {
            requires_approval: true,
            ..ProfileConstraints::default()
        }),
        ..ProfileUpdate::default()
    };
    engine
        .update_profile(&alice(), update, "hr")
        .await
        .unwrap();

    let outcome: RequestOutcome = engine
        .request_override(remote_request(), "u-alice")
        .await
        .unwrap();
    assert!(outcome.created.is_pending());
    assert_eq!(
        engine
            .resolve_day(&alice(), TUESDAY)
            .await
            .unwrap()
            .resolved_mode,
        WorkMode::Office
    );

    let approved: TeleworkOverride = engine
        .approve_override(&outcome.created.id, "manager", None)
        .await
        .unwrap();
    assert!(approved.is_approved());
    assert_eq!(
        engine
            .resolve_day(&alice(), TUESDAY)
            .await
            .unwrap()
            .resolved_mode,
        WorkMode::Remote
    );
}

#[tokio::test]
async fn test_week_view_reads_imposed_override() {
    let engine: TeleworkEngine<SqliteStore> = create_test_engine().await;
    engine
        .impose_override(&alice(), MONDAY, WorkMode::Remote, None, "admin")
        .await
        .unwrap();

    let week: WeekView = engine.resolve_week(&alice(), TUESDAY).await.unwrap();

    assert_eq!(week.days.len(), 7);
    assert_eq!(week.days[0].resolved_mode, WorkMode::Remote);
    assert_eq!(week.days[0].source, ResolutionSource::AdminImposed);
    assert_eq!(week.weekly_stats.remote_days, 1);
}

#[tokio::test]
async fn test_delete_then_missing() {
    let engine: TeleworkEngine<SqliteStore> = create_test_engine().await;
    let outcome: RequestOutcome = engine
        .request_override(remote_request(), "u-alice")
        .await
        .unwrap();

    engine.delete_override(&outcome.created.id).await.unwrap();
    let result: Result<(), CoreError> = engine.delete_override(&outcome.created.id).await;

    assert!(matches!(result, Err(CoreError::OverrideNotFound(_))));
}
