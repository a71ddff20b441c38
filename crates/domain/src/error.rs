// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::overrides::ApprovalStatus;
use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A user identifier is empty or invalid.
    InvalidUserId(String),
    /// A work mode string is not recognised.
    InvalidWorkMode(String),
    /// Profile constraints are out of range.
    InvalidConstraints {
        /// Description of the violated bound.
        reason: String,
    },
    /// A date range has its end before its start.
    InvalidDateRange {
        /// The requested start date.
        start: Date,
        /// The requested end date.
        end: Date,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// An override approval transition is not permitted from its current state.
    InvalidApprovalTransition {
        /// The current approval status.
        from: ApprovalStatus,
        /// The requested approval status.
        to: ApprovalStatus,
    },
    /// Rejecting an override requires a non-empty reason.
    MissingRejectionReason,
    /// A team rule recurrence is malformed.
    InvalidRecurrence {
        /// Description of the problem.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUserId(msg) => write!(f, "Invalid user id: {msg}"),
            Self::InvalidWorkMode(value) => write!(f, "Invalid work mode: '{value}'"),
            Self::InvalidConstraints { reason } => {
                write!(f, "Invalid telework constraints: {reason}")
            }
            Self::InvalidDateRange { start, end } => {
                write!(f, "Invalid date range: end {end} is before start {start}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidApprovalTransition { from, to } => {
                write!(f, "Cannot move override from {from} to {to}")
            }
            Self::MissingRejectionReason => {
                write!(f, "A reason is required when rejecting an override")
            }
            Self::InvalidRecurrence { reason } => {
                write!(f, "Invalid recurrence: {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
