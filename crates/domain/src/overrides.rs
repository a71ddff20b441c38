// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Date-specific exceptions to a user's profile.
//!
//! An override only influences resolution once approved. Approval is a
//! one-way transition out of `Pending`; validation runs at request time
//! and is never repeated when an approver acts.

use crate::error::DomainError;
use crate::types::{OverrideId, UserId, WorkMode};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Default priority for user-requested overrides.
pub const USER_REQUEST_PRIORITY: i32 = 0;

/// Default priority for admin-imposed overrides.
pub const ADMIN_IMPOSED_PRIORITY: i32 = 100;

/// Who asked for an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideSource {
    UserRequest,
    AdminImposed,
}

impl OverrideSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UserRequest => "user_request",
            Self::AdminImposed => "admin_imposed",
        }
    }
}

impl std::fmt::Display for OverrideSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat approval status, as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval state of an override, carrying who decided and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Approval {
    Pending,
    Approved {
        by: String,
        at: OffsetDateTime,
        #[serde(default)]
        note: Option<String>,
    },
    Rejected {
        by: String,
        at: OffsetDateTime,
        reason: String,
    },
}

impl Approval {
    #[must_use]
    pub const fn status(&self) -> ApprovalStatus {
        match self {
            Self::Pending => ApprovalStatus::Pending,
            Self::Approved { .. } => ApprovalStatus::Approved,
            Self::Rejected { .. } => ApprovalStatus::Rejected,
        }
    }
}

/// A persisted exception for one user on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleworkOverride {
    pub id: OverrideId,
    pub user_id: UserId,
    pub date: Date,
    pub mode: WorkMode,
    pub source: OverrideSource,
    /// Higher wins among overrides of the same source on the same date.
    pub priority: i32,
    #[serde(default)]
    pub reason: Option<String>,
    pub approval: Approval,
    pub created_at: OffsetDateTime,
    pub created_by: String,
}

impl TeleworkOverride {
    #[must_use]
    pub const fn status(&self) -> ApprovalStatus {
        self.approval.status()
    }

    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self.approval, Approval::Approved { .. })
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.approval, Approval::Pending)
    }

    /// Moves a pending override to approved.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidApprovalTransition` unless the override
    /// is pending.
    pub fn approve(
        &mut self,
        approver: &str,
        note: Option<String>,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        self.ensure_pending(ApprovalStatus::Approved)?;
        self.approval = Approval::Approved {
            by: approver.to_string(),
            at: now,
            note,
        };
        Ok(())
    }

    /// Moves a pending override to rejected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingRejectionReason` for a blank reason, or
    /// `DomainError::InvalidApprovalTransition` unless the override is pending.
    pub fn reject(
        &mut self,
        approver: &str,
        reason: &str,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        if reason.trim().is_empty() {
            return Err(DomainError::MissingRejectionReason);
        }
        self.ensure_pending(ApprovalStatus::Rejected)?;
        self.approval = Approval::Rejected {
            by: approver.to_string(),
            at: now,
            reason: reason.trim().to_string(),
        };
        Ok(())
    }

    fn ensure_pending(&self, to: ApprovalStatus) -> Result<(), DomainError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(DomainError::InvalidApprovalTransition {
                from: self.status(),
                to,
            })
        }
    }
}

/// An override that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOverride {
    pub user_id: UserId,
    pub date: Date,
    pub mode: WorkMode,
    pub source: OverrideSource,
    pub priority: i32,
    pub reason: Option<String>,
    pub approval: Approval,
    pub created_at: OffsetDateTime,
    pub created_by: String,
}

impl NewOverride {
    /// A user request, which starts out pending.
    #[must_use]
    pub fn user_request(
        user_id: UserId,
        date: Date,
        mode: WorkMode,
        reason: Option<String>,
        created_by: &str,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            user_id,
            date,
            mode,
            source: OverrideSource::UserRequest,
            priority: USER_REQUEST_PRIORITY,
            reason,
            approval: Approval::Pending,
            created_at: now,
            created_by: created_by.to_string(),
        }
    }

    /// An administrative mandate, approved by its author on creation.
    #[must_use]
    pub fn admin_imposed(
        user_id: UserId,
        date: Date,
        mode: WorkMode,
        reason: Option<String>,
        created_by: &str,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            user_id,
            date,
            mode,
            source: OverrideSource::AdminImposed,
            priority: ADMIN_IMPOSED_PRIORITY,
            reason,
            approval: Approval::Approved {
                by: created_by.to_string(),
                at: now,
                note: None,
            },
            created_at: now,
            created_by: created_by.to_string(),
        }
    }

    /// Attaches the store-assigned identifier.
    #[must_use]
    pub fn with_id(self, id: OverrideId) -> TeleworkOverride {
        TeleworkOverride {
            id,
            user_id: self.user_id,
            date: self.date,
            mode: self.mode,
            source: self.source,
            priority: self.priority,
            reason: self.reason,
            approval: self.approval,
            created_at: self.created_at,
            created_by: self.created_by,
        }
    }
}
