// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gateway errors.

use reqwest::StatusCode;

/// Failure of a single GitHub REST call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("GitHub request failed: {0}")]
    Transport(String),

    /// GitHub answered with a non-success status.
    #[error("GitHub returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// GitHub answered with a body we could not decode.
    #[error("GitHub response was invalid: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Whether a create failed because the name is already taken.
    ///
    /// GitHub has reported this both as 409 and as 422 for variables.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY)
        )
    }

    /// The upstream message without the status prefix.
    pub fn message(&self) -> &str {
        match self {
            GatewayError::Transport(message)
            | GatewayError::InvalidResponse(message)
            | GatewayError::Status { message, .. } => message,
        }
    }
}

/// Pull the human-readable message out of a GitHub error body.
///
/// GitHub errors look like `{"message": "...", "documentation_url": "..."}`.
/// Anything else is passed through as text, falling back to the status reason.
pub(crate) fn upstream_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string));

    match parsed {
        Some(message) if !message.trim().is_empty() => message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}
