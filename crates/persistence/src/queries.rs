// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Date;
use tracing::debug;
use workmode_domain::{OverrideId, TeamRule, TeleworkOverride, TeleworkProfile, UserId};

use crate::data_models::{OverrideRow, encode_date, override_rowid};
use crate::diesel_schema::{group_memberships, team_rules, telework_overrides, telework_profiles};
use crate::error::PersistenceError;

/// Retrieves a user's profile.
///
/// # Errors
///
/// Returns an error if the query fails or the stored document is unreadable.
pub fn get_profile(
    conn: &mut SqliteConnection,
    user_id: &UserId,
) -> Result<Option<TeleworkProfile>, PersistenceError> {
    let document: Option<String> = telework_profiles::table
        .filter(telework_profiles::user_id.eq(user_id.value()))
        .select(telework_profiles::profile_json)
        .first::<String>(conn)
        .optional()?;

    document
        .map(|json| serde_json::from_str::<TeleworkProfile>(&json))
        .transpose()
        .map_err(Into::into)
}

/// Retrieves an override by id.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn get_override(
    conn: &mut SqliteConnection,
    id: &OverrideId,
) -> Result<Option<TeleworkOverride>, PersistenceError> {
    let Some(rowid) = override_rowid(id) else {
        return Ok(None);
    };

    telework_overrides::table
        .filter(telework_overrides::override_id.eq(rowid))
        .select(OverrideRow::as_select())
        .first(conn)
        .optional()?
        .map(OverrideRow::into_override)
        .transpose()
}

/// Retrieves a user's overrides dated within `start..=end`, in date order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn get_overrides(
    conn: &mut SqliteConnection,
    user_id: &UserId,
    start: Date,
    end: Date,
) -> Result<Vec<TeleworkOverride>, PersistenceError> {
    let rows: Vec<OverrideRow> = telework_overrides::table
        .filter(telework_overrides::user_id.eq(user_id.value()))
        .filter(telework_overrides::override_date.ge(encode_date(start)?))
        .filter(telework_overrides::override_date.le(encode_date(end)?))
        .order((
            telework_overrides::override_date.asc(),
            telework_overrides::override_id.asc(),
        ))
        .select(OverrideRow::as_select())
        .load(conn)?;

    debug!(user_id = %user_id, count = rows.len(), "Loaded overrides");
    rows.into_iter().map(OverrideRow::into_override).collect()
}

/// Counts approved overrides of `source` for a user and day, ignoring
/// `exclude` when given.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_approved_overrides(
    conn: &mut SqliteConnection,
    user_id: &str,
    date: &str,
    source: &str,
    exclude: Option<i64>,
) -> Result<usize, PersistenceError> {
    let ids: Vec<i64> = telework_overrides::table
        .filter(telework_overrides::user_id.eq(user_id))
        .filter(telework_overrides::override_date.eq(date))
        .filter(telework_overrides::source.eq(source))
        .filter(telework_overrides::status.eq("approved"))
        .select(telework_overrides::override_id)
        .load(conn)?;

    Ok(ids.into_iter().filter(|id| Some(*id) != exclude).count())
}

/// Retrieves the rules scoped to a user: every organization rule plus the
/// rules of each team or project the user belongs to, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a stored rule is unreadable.
pub fn get_team_rules_for_user(
    conn: &mut SqliteConnection,
    user_id: &UserId,
) -> Result<Vec<TeamRule>, PersistenceError> {
    let memberships: Vec<(String, String)> = group_memberships::table
        .filter(group_memberships::user_id.eq(user_id.value()))
        .select((group_memberships::scope_kind, group_memberships::scope_name))
        .load(conn)?;

    let rows: Vec<(String, Option<String>, String)> = team_rules::table
        .order(team_rules::rule_id.asc())
        .select((
            team_rules::scope_kind,
            team_rules::scope_name,
            team_rules::rule_json,
        ))
        .load(conn)?;

    rows.into_iter()
        .filter(|(kind, name, _)| {
            kind == "organization"
                || memberships
                    .iter()
                    .any(|(m_kind, m_name)| m_kind == kind && Some(m_name) == name.as_ref())
        })
        .map(|(_, _, json)| serde_json::from_str::<TeamRule>(&json).map_err(Into::into))
        .collect()
}
