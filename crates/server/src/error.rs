// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mapping of engine failures onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use workmode::{CoreError, StoreError};
use workmode_domain::DomainError;
use workmode_persistence::PersistenceError;

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub message: String,
}

impl HttpError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

const fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Conflict(_) => StatusCode::CONFLICT,
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Serialization(_) | StoreError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

const fn domain_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::InvalidApprovalTransition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        let status: StatusCode = match &err {
            CoreError::ProfileNotFound(_) | CoreError::OverrideNotFound(_) => StatusCode::NOT_FOUND,
            CoreError::ProfileAlreadyExists(_) => StatusCode::CONFLICT,
            CoreError::Domain(domain) => domain_status(domain),
            CoreError::Store(store) => store_status(store),
        };

        if status.is_server_error() {
            error!(error = %err, status = status.as_u16(), "Request failed");
        } else {
            debug!(error = %err, status = status.as_u16(), "Request refused");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for HttpError {
    fn from(err: DomainError) -> Self {
        Self::from(CoreError::Domain(err))
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        Self::from(CoreError::Store(StoreError::from(err)))
    }
}
