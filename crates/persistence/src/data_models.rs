// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and column encodings.
//!
//! Dates are stored as `YYYY-MM-DD` text so range filters can compare them
//! as strings. Timestamps are RFC 3339. Profiles and team rules are kept
//! whole as JSON next to the columns queries filter on.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use workmode_domain::{
    Approval, OverrideId, OverrideSource, RuleScope, TeleworkOverride, UserId, WorkMode,
};

use crate::diesel_schema::telework_overrides;
use crate::error::PersistenceError;

/// Diesel Queryable struct for override rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = telework_overrides)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OverrideRow {
    pub override_id: i64,
    pub user_id: String,
    pub override_date: String,
    pub mode: String,
    pub source: String,
    pub priority: i32,
    pub reason: Option<String>,
    pub status: String,
    pub approval_json: String,
    pub created_at: String,
    pub created_by: String,
}

impl OverrideRow {
    /// Rebuilds the domain record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::SerializationError` if a column holds a
    /// value the domain does not recognise.
    pub fn into_override(self) -> Result<TeleworkOverride, PersistenceError> {
        let approval: Approval = serde_json::from_str(&self.approval_json)?;
        Ok(TeleworkOverride {
            id: OverrideId::new(&self.override_id.to_string()),
            user_id: UserId::new(&self.user_id),
            date: decode_date(&self.override_date)?,
            mode: decode_mode(&self.mode)?,
            source: decode_source(&self.source)?,
            priority: self.priority,
            reason: self.reason,
            approval,
            created_at: decode_timestamp(&self.created_at)?,
            created_by: self.created_by,
        })
    }
}

/// A user's membership in a team or project, used to scope team rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembership {
    pub user_id: UserId,
    pub scope: RuleScope,
}

/// Splits a rule scope into its `(scope_kind, scope_name)` columns.
#[must_use]
pub fn scope_columns(scope: &RuleScope) -> (&'static str, Option<&str>) {
    match scope {
        RuleScope::Organization => ("organization", None),
        RuleScope::Team(name) => ("team", Some(name.as_str())),
        RuleScope::Project(name) => ("project", Some(name.as_str())),
    }
}

/// Parses an override id back to its rowid. Ids this store never issued
/// yield `None`.
#[must_use]
pub fn override_rowid(id: &OverrideId) -> Option<i64> {
    id.value().parse::<i64>().ok()
}

/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn encode_date(date: Date) -> Result<String, PersistenceError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// # Errors
///
/// Returns an error if `value` is not a `YYYY-MM-DD` date.
pub fn decode_date(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::SerializationError(format!("Invalid date {value}: {e}")))
}

/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn encode_timestamp(timestamp: OffsetDateTime) -> Result<String, PersistenceError> {
    timestamp
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// # Errors
///
/// Returns an error if `value` is not an RFC 3339 timestamp.
pub fn decode_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::SerializationError(format!("Invalid timestamp {value}: {e}"))
    })
}

fn decode_mode(value: &str) -> Result<WorkMode, PersistenceError> {
    value
        .parse::<WorkMode>()
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

fn decode_source(value: &str) -> Result<OverrideSource, PersistenceError> {
    match value {
        "user_request" => Ok(OverrideSource::UserRequest),
        "admin_imposed" => Ok(OverrideSource::AdminImposed),
        other => Err(PersistenceError::SerializationError(format!(
            "Unknown override source: {other}"
        ))),
    }
}
