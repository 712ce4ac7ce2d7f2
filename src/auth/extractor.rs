// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the caller's GitHub token.
//!
//! Use the `GithubToken` extractor in handlers that call GitHub:
//!
//! ```rust,ignore
//! async fn my_handler(GithubToken(credential): GithubToken) -> impl IntoResponse {
//!     // credential is the caller's personal access token
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::AuthError;
use crate::github::Credential;

/// Fallback header for clients that cannot set `Authorization`.
pub const GITHUB_TOKEN_HEADER: &str = "x-github-token";

/// The caller's GitHub token, required by every `/api` handler.
///
/// Read from `Authorization: Bearer <token>`, falling back to
/// `X-GitHub-Token: <token>`. The token is never validated here; GitHub
/// rejects bad tokens on the first call.
pub struct GithubToken(pub Credential);

impl<S> FromRequestParts<S> for GithubToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        credential_from_headers(&parts.headers).map(GithubToken)
    }
}

fn credential_from_headers(headers: &HeaderMap) -> Result<Credential, AuthError> {
    let bearer = headers.get(AUTHORIZATION).map(|value| {
        value
            .to_str()
            .ok()
            .and_then(bearer_token)
            .and_then(Credential::new)
    });

    match bearer {
        Some(Some(credential)) => return Ok(credential),
        Some(None) if !headers.contains_key(GITHUB_TOKEN_HEADER) => {
            return Err(AuthError::InvalidAuthHeader)
        }
        _ => {}
    }

    let raw = headers
        .get(GITHUB_TOKEN_HEADER)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;
    Credential::new(raw).ok_or(AuthError::InvalidAuthHeader)
}

/// Strip a case-insensitive `Bearer ` scheme.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token)
}
