// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository lookups. Read-only.

use super::{collect_pages, or_not_found, ServiceError, ServiceResult};
use crate::github::{Gateway, MAX_PAGE_SIZE};
use crate::models::{RepoRef, Repository};

pub struct RepositoryService<'a, G: Gateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: Gateway + ?Sized> RepositoryService<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// All repositories of the authenticated user, most recently updated first.
    pub async fn list(&self) -> ServiceResult<Vec<Repository>> {
        let gateway = self.gateway;
        let repositories = collect_pages(MAX_PAGE_SIZE, move |page| {
            gateway.list_repositories(page, MAX_PAGE_SIZE)
        })
        .await?;
        Ok(repositories)
    }

    pub async fn get(&self, repo: &RepoRef) -> ServiceResult<Repository> {
        self.gateway
            .get_repository(repo)
            .await
            .map_err(|e| or_not_found(e, || ServiceError::RepositoryNotFound(repo.clone())))
    }
}
