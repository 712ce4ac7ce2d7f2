// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token validation.

use tracing::debug;

use crate::github::Gateway;
use crate::models::TokenValidation;

/// Check whether the client's credential is accepted by GitHub.
///
/// Any Gateway failure counts as an invalid token; this never errors.
pub async fn validate_token<G: Gateway + ?Sized>(gateway: &G) -> TokenValidation {
    match gateway.authenticated_user().await {
        Ok(user) => TokenValidation {
            valid: true,
            login: Some(user.login),
        },
        Err(err) => {
            debug!(error = %err, "GitHub token rejected");
            TokenValidation {
                valid: false,
                login: None,
            }
        }
    }
}
