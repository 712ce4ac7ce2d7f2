// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{auth::GithubToken, models::TokenValidation, services, state::AppState};

/// Check the caller's token against GitHub.
///
/// A rejected token is reported as `{"valid": false}` with status 200.
pub async fn validate(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
) -> Json<TokenValidation> {
    let gateway = state.gateway(credential);
    Json(services::validate_token(&gateway).await)
}
