// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! Override writes run inside an immediate transaction so the duplicate
//! check and the write see the same table state.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};
use workmode_domain::{
    ApprovalStatus, NewOverride, RuleScope, TeamRule, TeleworkOverride, TeleworkProfile, UserId,
};

use crate::backend::get_last_insert_rowid;
use crate::data_models::{encode_date, encode_timestamp, override_rowid, scope_columns};
use crate::diesel_schema::{group_memberships, team_rules, telework_overrides, telework_profiles};
use crate::error::PersistenceError;
use crate::queries::count_approved_overrides;

/// Inserts or replaces a profile.
///
/// # Errors
///
/// Returns an error if the profile cannot be encoded or written.
pub fn save_profile(
    conn: &mut SqliteConnection,
    profile: &TeleworkProfile,
) -> Result<(), PersistenceError> {
    let document: String = serde_json::to_string(profile)?;

    diesel::replace_into(telework_profiles::table)
        .values((
            telework_profiles::user_id.eq(profile.user_id.value()),
            telework_profiles::is_active.eq(i32::from(profile.is_active)),
            telework_profiles::profile_json.eq(&document),
            telework_profiles::updated_at.eq(encode_timestamp(profile.updated_at)?),
        ))
        .execute(conn)?;

    debug!(user_id = %profile.user_id, "Profile saved");
    Ok(())
}

fn ensure_single_approved(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    date: &str,
    source: &str,
    exclude: Option<i64>,
) -> Result<(), PersistenceError> {
    if count_approved_overrides(conn, user_id.value(), date, source, exclude)? > 0 {
        return Err(PersistenceError::DuplicateApprovedOverride {
            user_id: user_id.to_string(),
            date: date.to_string(),
            source: source.to_string(),
        });
    }
    Ok(())
}

/// Inserts an override and returns its rowid.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateApprovedOverride` if the override is
/// approved and another approved override of the same source already covers
/// the user and day, or an error if the write fails.
pub fn insert_override(
    conn: &mut SqliteConnection,
    new_override: &NewOverride,
) -> Result<i64, PersistenceError> {
    let date: String = encode_date(new_override.date)?;
    let approval_json: String = serde_json::to_string(&new_override.approval)?;
    let created_at: String = encode_timestamp(new_override.created_at)?;
    let status: ApprovalStatus = new_override.approval.status();

    conn.immediate_transaction(|conn| {
        if status == ApprovalStatus::Approved {
            ensure_single_approved(
                conn,
                &new_override.user_id,
                &date,
                new_override.source.as_str(),
                None,
            )?;
        }

        diesel::insert_into(telework_overrides::table)
            .values((
                telework_overrides::user_id.eq(new_override.user_id.value()),
                telework_overrides::override_date.eq(&date),
                telework_overrides::mode.eq(new_override.mode.as_str()),
                telework_overrides::source.eq(new_override.source.as_str()),
                telework_overrides::priority.eq(new_override.priority),
                telework_overrides::reason.eq(new_override.reason.as_deref()),
                telework_overrides::status.eq(status.as_str()),
                telework_overrides::approval_json.eq(&approval_json),
                telework_overrides::created_at.eq(&created_at),
                telework_overrides::created_by.eq(&new_override.created_by),
            ))
            .execute(conn)?;

        let override_id: i64 = get_last_insert_rowid(conn)?;
        info!(override_id, user_id = %new_override.user_id, %date, "Override stored");
        Ok(override_id)
    })
}

/// Replaces a stored override.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no row has the override's id,
/// `PersistenceError::DuplicateApprovedOverride` as for inserts, or an error
/// if the write fails.
pub fn update_override(
    conn: &mut SqliteConnection,
    telework_override: &TeleworkOverride,
) -> Result<(), PersistenceError> {
    let rowid: i64 = override_rowid(&telework_override.id)
        .ok_or_else(|| PersistenceError::NotFound(format!("Override {}", telework_override.id)))?;
    let date: String = encode_date(telework_override.date)?;
    let approval_json: String = serde_json::to_string(&telework_override.approval)?;
    let status: ApprovalStatus = telework_override.status();

    conn.immediate_transaction(|conn| {
        if status == ApprovalStatus::Approved {
            ensure_single_approved(
                conn,
                &telework_override.user_id,
                &date,
                telework_override.source.as_str(),
                Some(rowid),
            )?;
        }

        let updated: usize = diesel::update(telework_overrides::table)
            .filter(telework_overrides::override_id.eq(rowid))
            .set((
                telework_overrides::user_id.eq(telework_override.user_id.value()),
                telework_overrides::override_date.eq(&date),
                telework_overrides::mode.eq(telework_override.mode.as_str()),
                telework_overrides::source.eq(telework_override.source.as_str()),
                telework_overrides::priority.eq(telework_override.priority),
                telework_overrides::reason.eq(telework_override.reason.as_deref()),
                telework_overrides::status.eq(status.as_str()),
                telework_overrides::approval_json.eq(&approval_json),
            ))
            .execute(conn)?;

        if updated == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Override {}",
                telework_override.id
            )));
        }
        debug!(override_id = rowid, status = %status, "Override updated");
        Ok(())
    })
}

/// Deletes an override. Returns whether a row was removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_override(conn: &mut SqliteConnection, rowid: i64) -> Result<bool, PersistenceError> {
    let deleted: usize = diesel::delete(telework_overrides::table)
        .filter(telework_overrides::override_id.eq(rowid))
        .execute(conn)?;
    Ok(deleted > 0)
}

/// Inserts or replaces a team rule.
///
/// # Errors
///
/// Returns an error if the rule cannot be encoded or written.
pub fn save_team_rule(conn: &mut SqliteConnection, rule: &TeamRule) -> Result<(), PersistenceError> {
    let (scope_kind, scope_name) = scope_columns(&rule.scope);
    let document: String = serde_json::to_string(rule)?;

    diesel::replace_into(team_rules::table)
        .values((
            team_rules::rule_id.eq(rule.id.value()),
            team_rules::scope_kind.eq(scope_kind),
            team_rules::scope_name.eq(scope_name),
            team_rules::rule_json.eq(&document),
        ))
        .execute(conn)?;

    debug!(rule_id = %rule.id, scope_kind, "Team rule saved");
    Ok(())
}

/// Records that a user belongs to a team or project. Organization scope
/// needs no membership and is ignored.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn add_group_membership(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    scope: &RuleScope,
) -> Result<(), PersistenceError> {
    let (scope_kind, Some(scope_name)) = scope_columns(scope) else {
        debug!(user_id = %user_id, "Organization membership is implicit");
        return Ok(());
    };

    diesel::insert_or_ignore_into(group_memberships::table)
        .values((
            group_memberships::user_id.eq(user_id.value()),
            group_memberships::scope_kind.eq(scope_kind),
            group_memberships::scope_name.eq(scope_name),
        ))
        .execute(conn)?;
    Ok(())
}
