// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GitHub Environment Manager
//!
//! An HTTP service for managing the deployment environments of GitHub
//! repositories: their variables and their write-only secrets, including
//! batch copies between environments and across repositories.
//!
//! GitHub is the only store. Every request is served with the caller's own
//! token and nothing is cached between requests.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - GitHub token extraction
//! - `github` - GitHub REST Gateway
//! - `sealed` - sealed-box encryption of secret values
//! - `services` - entity services and copy orchestration

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod sealed;
pub mod services;
pub mod state;
