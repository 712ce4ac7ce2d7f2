// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Entity Services
//!
//! Thin wrappers over the [`Gateway`](crate::github::Gateway) that add
//! pagination, not-found translation with identifying context, and the
//! write-then-read-back sequencing the API returns.
//!
//! ## Modules
//!
//! - `account` - token validation
//! - `repositories` - repository listing and lookup
//! - `environments` - environment CRUD and bulk delete
//! - `variables` - environment variable CRUD
//! - `secrets` - sealed secret CRUD
//! - `copy` - batch copy of variables/secrets and environment cloning
//!
//! ## Batch failure policy
//!
//! Copy batches stop at the first failing item and return that error.
//! Bulk environment deletion never stops early and reports every item.

use std::fmt;
use std::future::Future;

use crate::github::GatewayError;
use crate::models::{EnvironmentRef, RepoRef};
use crate::sealed::SealError;

pub mod account;
pub mod copy;
pub mod environments;
pub mod repositories;
pub mod secrets;
pub mod variables;

pub use account::validate_token;
pub use copy::CopyService;
pub use environments::EnvironmentService;
pub use repositories::RepositoryService;
pub use secrets::SecretService;
pub use variables::VariableService;

/// What a copy batch moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Variables,
    Secrets,
}

impl ItemKind {
    fn title(self) -> &'static str {
        match self {
            ItemKind::Variables => "Variables",
            ItemKind::Secrets => "Secrets",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Variables => f.write_str("variables"),
            ItemKind::Secrets => f.write_str("secrets"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No credential was supplied. Nothing in the services raises this: over
    /// HTTP the [`GithubToken`](crate::auth::GithubToken) extractor is the
    /// enforcement point and answers 401 via `AuthError` before any service
    /// runs. Kept so the taxonomy maps to a status in one place.
    #[error("GitHub token is required")]
    Unauthenticated,

    #[error("Repository {0} not found")]
    RepositoryNotFound(RepoRef),

    #[error("Environment {} not found in repository {}", .0.environment, .0.repo)]
    EnvironmentNotFound(EnvironmentRef),

    #[error(
        "Variable {name} not found in environment {} of repository {}",
        .environment.environment,
        .environment.repo
    )]
    VariableNotFound {
        environment: EnvironmentRef,
        name: String,
    },

    #[error(
        "Secret {name} not found in environment {} of repository {}",
        .environment.environment,
        .environment.repo
    )]
    SecretNotFound {
        environment: EnvironmentRef,
        name: String,
    },

    #[error("No {kind} found in source environment {}", .environment.environment)]
    EmptySource {
        kind: ItemKind,
        environment: EnvironmentRef,
    },

    #[error("{} not found in source environment: {}", .kind.title(), .names.join(", "))]
    NamesNotFound { kind: ItemKind, names: Vec<String> },

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Seal(#[from] SealError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Reject blank names before any Gateway call.
pub(crate) fn require_name(what: &str, name: &str) -> ServiceResult<()> {
    if name.trim().is_empty() {
        return Err(ServiceError::InvalidInput(format!(
            "{what} name must not be empty"
        )));
    }
    Ok(())
}

pub(crate) fn require_value(what: &str, value: &str) -> ServiceResult<()> {
    if value.is_empty() {
        return Err(ServiceError::InvalidInput(format!(
            "{what} value must not be empty"
        )));
    }
    Ok(())
}

/// A copy onto its own source would overwrite secrets with placeholders.
pub(crate) fn require_distinct(
    source: &EnvironmentRef,
    target: &EnvironmentRef,
) -> ServiceResult<()> {
    if source == target {
        return Err(ServiceError::InvalidInput(format!(
            "Source and target are the same environment ({source})"
        )));
    }
    Ok(())
}

/// Translate a Gateway 404 into a contextual not-found error.
pub(crate) fn or_not_found(
    err: GatewayError,
    not_found: impl FnOnce() -> ServiceError,
) -> ServiceError {
    if err.is_not_found() {
        not_found()
    } else {
        ServiceError::Gateway(err)
    }
}

/// Fetch every page of a listing.
///
/// Stops at the first page shorter than `per_page`, including an empty one.
pub(crate) async fn collect_pages<T, F, Fut>(
    per_page: u32,
    mut fetch_page: F,
) -> Result<Vec<T>, GatewayError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, GatewayError>>,
{
    let mut items = Vec::new();
    let mut page = 1;
    loop {
        let batch = fetch_page(page).await?;
        let last = batch.len() < per_page as usize;
        items.extend(batch);
        if last {
            return Ok(items);
        }
        page += 1;
    }
}

/// Pick the items named in `names`, keeping source order.
///
/// `None` or an empty list selects everything. Returns the selection and the
/// requested names absent from `items`, in request order.
pub(crate) fn select_named<'a, T>(
    items: &'a [T],
    names: Option<&[String]>,
    name_of: impl Fn(&T) -> &str,
) -> (Vec<&'a T>, Vec<String>) {
    let names = match names {
        Some(names) if !names.is_empty() => names,
        _ => return (items.iter().collect(), Vec::new()),
    };

    let selected = items
        .iter()
        .filter(|item| {
            let name = name_of(*item);
            names.iter().any(|n| n == name)
        })
        .collect();

    let mut missing: Vec<String> = Vec::new();
    for name in names {
        if !items.iter().any(|item| name_of(item) == name) && !missing.contains(name) {
            missing.push(name.clone());
        }
    }

    (selected, missing)
}
