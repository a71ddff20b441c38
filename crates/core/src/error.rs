// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use workmode_domain::{DomainError, OverrideId, UserId};

/// Failures reported by a store implementation.
///
/// These are hard failures. The engine never substitutes data when a store
/// call fails; the error reaches the caller unchanged inside
/// [`CoreError::Store`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached or refused the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// A record addressed by id does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),
    /// The write would break a store-level uniqueness guarantee.
    #[error("Conflicting write: {0}")]
    Conflict(String),
    /// A stored record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("{0}")]
    Other(String),
}

/// Errors returned by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    Domain(#[from] DomainError),
    /// A store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Telework profile not found for user {0}")]
    ProfileNotFound(UserId),
    #[error("Telework profile already exists for user {0}")]
    ProfileAlreadyExists(UserId),
    #[error("Override not found: {0}")]
    OverrideNotFound(OverrideId),
}
