// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::github::GatewayError;
use crate::services::ServiceError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthenticated => ApiError::unauthorized(err.to_string()),
            ServiceError::RepositoryNotFound(_)
            | ServiceError::EnvironmentNotFound(_)
            | ServiceError::VariableNotFound { .. }
            | ServiceError::SecretNotFound { .. }
            | ServiceError::NamesNotFound { .. } => ApiError::not_found(err.to_string()),
            ServiceError::EmptySource { .. } | ServiceError::InvalidInput(_) => {
                ApiError::bad_request(err.to_string())
            }
            ServiceError::Seal(seal) => {
                warn!(error = %seal, "Sealing secret failed");
                ApiError::bad_gateway(seal.to_string())
            }
            ServiceError::Gateway(gateway) => gateway.into(),
        }
    }
}

/// Client errors from GitHub pass through with their status. Anything else
/// is reported as a bad gateway.
impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err.status() {
            Some(status) if status.is_client_error() => {
                ApiError::new(status, err.message().to_string())
            }
            _ => {
                warn!(error = %err, "GitHub request failed");
                ApiError::bad_gateway(format!("GitHub request failed: {}", err.message()))
            }
        }
    }
}
