// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Callers authenticate with their own GitHub personal access token. The
//! service keeps no accounts or sessions of its own.
//!
//! ## Auth Flow
//!
//! 1. Client sends `Authorization: Bearer <token>` (or `X-GitHub-Token`)
//! 2. The `GithubToken` extractor wraps it in a redacted `Credential`
//! 3. The handler builds a GitHub client for that credential alone
//!
//! Requests without a token are rejected with 401 before any GitHub call.

pub mod error;
pub mod extractor;

pub use error::AuthError;
pub use extractor::GithubToken;
