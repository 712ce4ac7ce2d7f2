// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deployment environments of a repository.
//!
//! GitHub has no "get one environment by name" call that this service relies
//! on; single lookups list the repository's environments and search.

use tracing::{info, warn};

use super::{collect_pages, or_not_found, require_name, ServiceError, ServiceResult};
use crate::github::{Gateway, MAX_PAGE_SIZE};
use crate::models::{BulkDeleteResult, Environment, EnvironmentRef, RepoRef};

pub struct EnvironmentService<'a, G: Gateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: Gateway + ?Sized> EnvironmentService<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Every environment of the repository, across all pages.
    pub async fn list(&self, repo: &RepoRef) -> ServiceResult<Vec<Environment>> {
        let gateway = self.gateway;
        collect_pages(MAX_PAGE_SIZE, move |page| {
            gateway.list_environments(repo, page, MAX_PAGE_SIZE)
        })
        .await
        .map_err(|e| or_not_found(e, || ServiceError::RepositoryNotFound(repo.clone())))
    }

    pub async fn get(&self, environment: &EnvironmentRef) -> ServiceResult<Environment> {
        self.list(&environment.repo)
            .await?
            .into_iter()
            .find(|e| e.name == environment.environment)
            .ok_or_else(|| ServiceError::EnvironmentNotFound(environment.clone()))
    }

    /// Create the environment (or keep the existing one) and read it back.
    pub async fn create(&self, environment: &EnvironmentRef) -> ServiceResult<Environment> {
        require_name("Environment", &environment.environment)?;

        self.gateway
            .upsert_environment(environment)
            .await
            .map_err(|e| {
                or_not_found(e, || {
                    ServiceError::RepositoryNotFound(environment.repo.clone())
                })
            })?;
        info!(
            owner = %environment.repo.owner,
            repo = %environment.repo.repo,
            environment = %environment.environment,
            "Environment created"
        );

        self.get(environment).await
    }

    pub async fn delete(&self, environment: &EnvironmentRef) -> ServiceResult<()> {
        require_name("Environment", &environment.environment)?;

        self.gateway
            .delete_environment(environment)
            .await
            .map_err(|e| or_not_found(e, || ServiceError::EnvironmentNotFound(environment.clone())))?;
        info!(
            owner = %environment.repo.owner,
            repo = %environment.repo.repo,
            environment = %environment.environment,
            "Environment deleted"
        );
        Ok(())
    }

    /// Delete several environments one after another.
    ///
    /// Only an empty request fails as a whole. Each name gets its own result,
    /// in request order, whether or not earlier deletions failed.
    pub async fn bulk_delete(
        &self,
        repo: &RepoRef,
        names: &[String],
    ) -> ServiceResult<Vec<BulkDeleteResult>> {
        if names.is_empty() {
            return Err(ServiceError::InvalidInput(
                "At least one environment name is required".to_string(),
            ));
        }

        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let outcome = self.delete(&repo.environment(name.as_str())).await;
            let result = match outcome {
                Ok(()) => BulkDeleteResult {
                    name: name.clone(),
                    success: true,
                    error: None,
                },
                Err(err) => {
                    warn!(
                        owner = %repo.owner,
                        repo = %repo.repo,
                        environment = %name,
                        error = %err,
                        "Bulk delete item failed"
                    );
                    BulkDeleteResult {
                        name: name.clone(),
                        success: false,
                        error: Some(bulk_delete_message(&err)),
                    }
                }
            };
            results.push(result);
        }

        Ok(results)
    }
}

/// Not-found keeps its descriptive message; Gateway failures report GitHub's
/// own message.
fn bulk_delete_message(err: &ServiceError) -> String {
    match err {
        ServiceError::Gateway(gateway) => gateway.message().to_string(),
        other => other.to_string(),
    }
}
