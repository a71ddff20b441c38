// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers.
//!
//! Handlers parse path and query input, call one engine operation and
//! return its result as JSON. Dates in paths and queries are `YYYY-MM-DD`.

use axum::{
    Json,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use time::Date;
use time::macros::format_description;
use tracing::info;
use workmode::{OverrideRequest, RequestOutcome};
use workmode_domain::{
    DayResolution, OverrideId, PatternPreview, ProfileUpdate, RuleScope, TeamRule,
    TeleworkOverride, TeleworkProfile, TeleworkStats, UserId, ValidationResult, WeekView,
    WeeklyPattern, WorkMode,
};

use crate::AppState;
use crate::error::HttpError;

/// Query parameters for endpoints covering a date range.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: String,
    pub end: String,
}

/// API request for checking a prospective override.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidateOverrideApiRequest {
    pub user_id: UserId,
    pub date: Date,
    pub mode: WorkMode,
}

/// API request for a user's own override.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RequestOverrideApiRequest {
    pub user_id: UserId,
    pub date: Date,
    pub mode: WorkMode,
    #[serde(default)]
    pub reason: Option<String>,
    /// Who filed the request. Defaults to the user.
    #[serde(default)]
    pub requested_by: Option<String>,
}

/// API request for an administrative mandate.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImposeOverrideApiRequest {
    pub user_id: UserId,
    pub date: Date,
    pub mode: WorkMode,
    #[serde(default)]
    pub reason: Option<String>,
    pub imposed_by: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApproveOverrideApiRequest {
    pub approver: String,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RejectOverrideApiRequest {
    pub approver: String,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateProfileApiRequest {
    pub display_name: String,
    pub created_by: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateProfileApiRequest {
    #[serde(default)]
    pub update: ProfileUpdate,
    pub updated_by: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeactivateProfileApiRequest {
    pub updated_by: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreviewPatternApiRequest {
    pub weekly_pattern: WeeklyPattern,
    pub start: Date,
    pub end: Date,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddMembershipApiRequest {
    pub scope: RuleScope,
}

fn parse_user(value: &str) -> Result<UserId, HttpError> {
    Ok(UserId::parse(value)?)
}

fn parse_date(value: &str) -> Result<Date, HttpError> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| HttpError::bad_request(format!("Invalid date '{value}': {e}")))
}

/// Longest inclusive range, in days, a single request may cover.
const MAX_RANGE_DAYS: i64 = 731;

fn check_span(start: Date, end: Date) -> Result<(), HttpError> {
    let days: i64 = (end - start).whole_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(HttpError::bad_request(format!(
            "Range {start}..{end} covers {days} days, the limit is {MAX_RANGE_DAYS}"
        )));
    }
    Ok(())
}

fn parse_range(query: &RangeQuery) -> Result<(Date, Date), HttpError> {
    let start: Date = parse_date(&query.start)?;
    let end: Date = parse_date(&query.end)?;
    check_span(start, end)?;
    Ok((start, end))
}

// ============================================================================
// Resolution
// ============================================================================

/// Handler for GET `/users/{user_id}/days/{date}`.
pub async fn handle_resolve_day(
    AxumState(app_state): AxumState<AppState>,
    Path((user_id, date)): Path<(String, String)>,
) -> Result<Json<DayResolution>, HttpError> {
    let user_id: UserId = parse_user(&user_id)?;
    let date: Date = parse_date(&date)?;
    Ok(Json(app_state.engine.resolve_day(&user_id, date).await?))
}

/// Handler for GET `/users/{user_id}/weeks/{date}`.
///
/// Any date in the week selects it.
pub async fn handle_resolve_week(
    AxumState(app_state): AxumState<AppState>,
    Path((user_id, date)): Path<(String, String)>,
) -> Result<Json<WeekView>, HttpError> {
    let user_id: UserId = parse_user(&user_id)?;
    let date: Date = parse_date(&date)?;
    Ok(Json(app_state.engine.resolve_week(&user_id, date).await?))
}

/// Handler for GET `/users/{user_id}/period`.
pub async fn handle_resolve_period(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<DayResolution>>, HttpError> {
    let user_id: UserId = parse_user(&user_id)?;
    let (start, end) = parse_range(&query)?;
    Ok(Json(
        app_state.engine.resolve_period(&user_id, start, end).await?,
    ))
}

/// Handler for GET `/users/{user_id}/stats`.
pub async fn handle_stats(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<TeleworkStats>, HttpError> {
    let user_id: UserId = parse_user(&user_id)?;
    let (start, end) = parse_range(&query)?;
    Ok(Json(
        app_state
            .engine
            .calculate_stats(&user_id, start, end)
            .await?,
    ))
}

/// Handler for POST `/users/{user_id}/pattern_preview`.
pub async fn handle_preview_pattern(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<PreviewPatternApiRequest>,
) -> Result<Json<PatternPreview>, HttpError> {
    let user_id: UserId = parse_user(&user_id)?;
    check_span(req.start, req.end)?;
    Ok(Json(
        app_state
            .engine
            .preview_pattern_change(&user_id, &req.weekly_pattern, req.start, req.end)
            .await?,
    ))
}

// ============================================================================
// Overrides
// ============================================================================

/// Handler for POST `/overrides/validate`. Nothing is stored.
pub async fn handle_validate_override(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ValidateOverrideApiRequest>,
) -> Result<Json<ValidationResult>, HttpError> {
    Ok(Json(
        app_state
            .engine
            .validate_override_request(&req.user_id, req.date, req.mode)
            .await?,
    ))
}

/// Handler for POST `/overrides`.
pub async fn handle_request_override(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RequestOverrideApiRequest>,
) -> Result<(StatusCode, Json<RequestOutcome>), HttpError> {
    let user_id: UserId = parse_user(req.user_id.value())?;
    let requested_by: String = req
        .requested_by
        .unwrap_or_else(|| user_id.value().to_string());
    info!(user_id = %user_id, date = %req.date, mode = %req.mode, "Handling override request");

    let request: OverrideRequest = OverrideRequest {
        user_id,
        date: req.date,
        mode: req.mode,
        reason: req.reason,
    };
    let outcome: RequestOutcome = app_state
        .engine
        .request_override(request, &requested_by)
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Handler for POST `/overrides/impose`.
pub async fn handle_impose_override(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ImposeOverrideApiRequest>,
) -> Result<(StatusCode, Json<TeleworkOverride>), HttpError> {
    let user_id: UserId = parse_user(req.user_id.value())?;
    info!(user_id = %user_id, date = %req.date, imposed_by = %req.imposed_by, "Handling impose override");

    let created: TeleworkOverride = app_state
        .engine
        .impose_override(&user_id, req.date, req.mode, req.reason, &req.imposed_by)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for POST `/overrides/{override_id}/approve`.
pub async fn handle_approve_override(
    AxumState(app_state): AxumState<AppState>,
    Path(override_id): Path<String>,
    Json(req): Json<ApproveOverrideApiRequest>,
) -> Result<Json<TeleworkOverride>, HttpError> {
    let id: OverrideId = OverrideId::new(&override_id);
    Ok(Json(
        app_state
            .engine
            .approve_override(&id, &req.approver, req.note)
            .await?,
    ))
}

/// Handler for POST `/overrides/{override_id}/reject`.
pub async fn handle_reject_override(
    AxumState(app_state): AxumState<AppState>,
    Path(override_id): Path<String>,
    Json(req): Json<RejectOverrideApiRequest>,
) -> Result<Json<TeleworkOverride>, HttpError> {
    let id: OverrideId = OverrideId::new(&override_id);
    Ok(Json(
        app_state
            .engine
            .reject_override(&id, &req.approver, &req.reason)
            .await?,
    ))
}

/// Handler for DELETE `/overrides/{override_id}`.
pub async fn handle_delete_override(
    AxumState(app_state): AxumState<AppState>,
    Path(override_id): Path<String>,
) -> Result<StatusCode, HttpError> {
    let id: OverrideId = OverrideId::new(&override_id);
    app_state.engine.delete_override(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/users/{user_id}/overrides`.
pub async fn handle_list_overrides(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<TeleworkOverride>>, HttpError> {
    let user_id: UserId = parse_user(&user_id)?;
    let (start, end) = parse_range(&query)?;
    Ok(Json(
        app_state.engine.list_overrides(&user_id, start, end).await?,
    ))
}

// ============================================================================
// Profiles
// ============================================================================

/// Handler for GET `/users/{user_id}/profile`.
pub async fn handle_get_profile(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<TeleworkProfile>, HttpError> {
    let user_id: UserId = parse_user(&user_id)?;
    Ok(Json(app_state.engine.get_profile(&user_id).await?))
}

/// Handler for POST `/users/{user_id}/profile`.
pub async fn handle_create_profile(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<CreateProfileApiRequest>,
) -> Result<(StatusCode, Json<TeleworkProfile>), HttpError> {
    let user_id: UserId = parse_user(&user_id)?;
    let profile: TeleworkProfile = app_state
        .engine
        .create_default_profile(&user_id, &req.display_name, &req.created_by)
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Handler for PATCH `/users/{user_id}/profile`.
pub async fn handle_update_profile(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateProfileApiRequest>,
) -> Result<Json<TeleworkProfile>, HttpError> {
    let user_id: UserId = parse_user(&user_id)?;
    Ok(Json(
        app_state
            .engine
            .update_profile(&user_id, req.update, &req.updated_by)
            .await?,
    ))
}

/// Handler for POST `/users/{user_id}/profile/deactivate`.
pub async fn handle_deactivate_profile(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<DeactivateProfileApiRequest>,
) -> Result<Json<TeleworkProfile>, HttpError> {
    let user_id: UserId = parse_user(&user_id)?;
    Ok(Json(
        app_state
            .engine
            .deactivate_profile(&user_id, &req.updated_by)
            .await?,
    ))
}

// ============================================================================
// Team rules
// ============================================================================

/// Handler for POST `/team_rules`. Saving an existing id replaces the rule.
pub async fn handle_save_team_rule(
    AxumState(app_state): AxumState<AppState>,
    Json(rule): Json<TeamRule>,
) -> Result<(StatusCode, Json<TeamRule>), HttpError> {
    let saved: TeamRule = app_state.engine.save_team_rule(rule).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Handler for GET `/users/{user_id}/team_rules`.
pub async fn handle_team_rules_for_user(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<TeamRule>>, HttpError> {
    let user_id: UserId = parse_user(&user_id)?;
    Ok(Json(app_state.engine.team_rules_for_user(&user_id).await?))
}

/// Handler for POST `/users/{user_id}/memberships`.
pub async fn handle_add_membership(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<AddMembershipApiRequest>,
) -> Result<StatusCode, HttpError> {
    let user_id: UserId = parse_user(&user_id)?;
    app_state
        .engine
        .store()
        .add_group_membership(&user_id, &req.scope)
        .await?;

    info!(user_id = %user_id, scope = ?req.scope, "Group membership added");
    Ok(StatusCode::NO_CONTENT)
}
