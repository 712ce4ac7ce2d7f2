// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # GitHub Gateway
//!
//! GitHub owns every repository, environment, variable and secret this
//! service touches. Nothing is cached locally: each read is a live call.
//!
//! The [`Gateway`] trait lists the upstream calls the services rely on.
//! [`GithubClient`] implements it over the REST API with `reqwest`; tests use
//! an in-memory implementation.
//!
//! ## Credentials
//!
//! A [`Credential`] is the caller's personal access token. A client is built
//! per request from one credential with [`client_for`] and dropped with the
//! request, so two callers never share an authenticated client.

use std::fmt;

use async_trait::async_trait;

use crate::models::{
    Environment, EnvironmentPublicKey, EnvironmentRef, GithubUser, RepoRef, Repository, Secret,
    Variable,
};
use crate::sealed::SealedSecret;

pub mod client;
pub mod error;
#[cfg(test)]
pub mod fake;

pub use client::GithubClient;
pub use error::GatewayError;

/// Largest page GitHub serves for repositories, environments and secrets.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Largest page GitHub serves for environment variables.
pub const VARIABLE_PAGE_SIZE: u32 = 30;

/// A GitHub bearer token.
///
/// Never printed: `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, rejecting blank input.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Where and how to reach the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the REST API, e.g. `https://api.github.com`.
    pub api_base_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base_url: client::DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// Build the authenticated client for one request.
///
/// `http` is the shared connection pool; it carries no credential.
pub fn client_for(
    http: &reqwest::Client,
    config: &GatewayConfig,
    credential: Credential,
) -> GithubClient {
    GithubClient::new(http.clone(), config.api_base_url.clone(), credential)
}

/// Upstream calls against the GitHub REST API.
///
/// Listing calls return a single page; callers loop until a short page.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn authenticated_user(&self) -> Result<GithubUser, GatewayError>;

    async fn list_repositories(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Repository>, GatewayError>;

    async fn get_repository(&self, repo: &RepoRef) -> Result<Repository, GatewayError>;

    async fn list_environments(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Environment>, GatewayError>;

    /// Create the environment, or leave an existing one as it is.
    async fn upsert_environment(&self, environment: &EnvironmentRef) -> Result<(), GatewayError>;

    async fn delete_environment(&self, environment: &EnvironmentRef) -> Result<(), GatewayError>;

    async fn list_variables(
        &self,
        environment: &EnvironmentRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Variable>, GatewayError>;

    /// Fails with a conflict status when the name already exists.
    async fn create_variable(
        &self,
        environment: &EnvironmentRef,
        name: &str,
        value: &str,
    ) -> Result<(), GatewayError>;

    async fn update_variable(
        &self,
        environment: &EnvironmentRef,
        name: &str,
        value: &str,
    ) -> Result<(), GatewayError>;

    async fn delete_variable(
        &self,
        environment: &EnvironmentRef,
        name: &str,
    ) -> Result<(), GatewayError>;

    async fn list_secrets(
        &self,
        environment: &EnvironmentRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Secret>, GatewayError>;

    async fn environment_public_key(
        &self,
        environment: &EnvironmentRef,
    ) -> Result<EnvironmentPublicKey, GatewayError>;

    /// Create or replace a secret. This is the only write path for secret values.
    async fn put_secret(
        &self,
        environment: &EnvironmentRef,
        name: &str,
        sealed: &SealedSecret,
    ) -> Result<(), GatewayError>;

    async fn delete_secret(&self, environment: &EnvironmentRef, name: &str)
        -> Result<(), GatewayError>;
}
