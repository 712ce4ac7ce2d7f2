// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the entity types proxied from GitHub and the request
//! and response bodies of the REST API.
//!
//! ## Coordinates
//!
//! [`RepoRef`] and [`EnvironmentRef`] identify where an operation applies.
//! They are passed by reference through the services down to the Gateway.
//!
//! ## Model Categories
//!
//! - **Entities**: repositories, environments, variables, secrets, public keys
//! - **Requests**: create/update/copy/clone/bulk-delete bodies (camelCase keys)
//! - **Reports**: copy reports and per-item bulk-delete results

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Coordinates
// =============================================================================

/// A repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Coordinates of an environment inside this repository.
    pub fn environment(&self, name: impl Into<String>) -> EnvironmentRef {
        EnvironmentRef {
            repo: self.clone(),
            environment: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// An environment identified by its repository and name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnvironmentRef {
    pub repo: RepoRef,
    pub environment: String,
}

impl EnvironmentRef {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        environment: impl Into<String>,
    ) -> Self {
        RepoRef::new(owner, repo).environment(environment)
    }
}

impl fmt::Display for EnvironmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repo, self.environment)
    }
}

// =============================================================================
// Gateway Entities
// =============================================================================

/// Owner of a repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryOwner {
    pub login: String,
}

/// A repository visible to the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub owner: RepositoryOwner,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    pub private: bool,
}

/// A deployment environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Environment {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An Actions variable scoped to an environment. Values are readable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An Actions secret scoped to an environment.
///
/// Only metadata is ever returned by GitHub; the value is write-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Secret {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public key secrets of one environment must be sealed to.
///
/// Keys rotate, so this is fetched right before it is used and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentPublicKey {
    pub key_id: String,
    /// Base64-encoded X25519 public key.
    pub key: String,
}

/// The account behind a credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GithubUser {
    pub login: String,
    pub id: u64,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEnvironmentRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneEnvironmentRequest {
    pub target_environment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteEnvironmentsRequest {
    pub environment_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVariableRequest {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVariableRequest {
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSecretRequest {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSecretRequest {
    pub value: String,
}

/// Copy variables to another environment of the same repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyVariablesRequest {
    pub target_environment: String,
    /// Names to copy; absent or empty copies everything.
    #[serde(default)]
    pub variables: Option<Vec<String>>,
}

/// Copy variables to an environment of another repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossRepoVariableCopyRequest {
    pub target_owner: String,
    pub target_repo: String,
    pub target_environment: String,
    #[serde(default)]
    pub variables: Option<Vec<String>>,
}

/// Replicate secret names to another environment of the same repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopySecretsRequest {
    pub target_environment: String,
    #[serde(default)]
    pub secrets: Option<Vec<String>>,
    /// Real values for some or all of the copied names. Anything missing
    /// here is written as a placeholder.
    #[serde(default)]
    pub values: HashMap<String, String>,
}

/// Replicate secret names to an environment of another repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossRepoSecretCopyRequest {
    pub target_owner: String,
    pub target_repo: String,
    pub target_environment: String,
    #[serde(default)]
    pub secrets: Option<Vec<String>>,
    #[serde(default)]
    pub values: HashMap<String, String>,
}

// =============================================================================
// Reports
// =============================================================================

/// What happened to one item of a copy batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CopyAction {
    Created,
    Updated,
    /// Secrets share one upsert endpoint, so create and update are not told apart.
    Written,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopiedItem {
    pub name: String,
    pub action: CopyAction,
    /// Set for secrets written with a placeholder instead of a real value.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
}

/// Outcome of a successful copy batch, in the order items were processed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<CopiedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Result of deleting one environment in a bulk request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkDeleteResult {
    pub name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkDeleteResponse {
    pub results: Vec<BulkDeleteResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}
