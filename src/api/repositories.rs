// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};

use super::RepoPath;
use crate::{
    auth::GithubToken, error::ApiError, models::Repository, services::RepositoryService,
    state::AppState,
};

/// Every repository the token can see, most recently updated first.
pub async fn list_repositories(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<Repository>>, ApiError> {
    let gateway = state.gateway(credential);
    let repositories = RepositoryService::new(&gateway).list().await?;
    Ok(Json(repositories))
}

pub async fn get_repository(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<RepoPath>,
) -> Result<Json<Repository>, ApiError> {
    let gateway = state.gateway(credential);
    let repository = RepositoryService::new(&gateway)
        .get(&path.repo_ref())
        .await?;
    Ok(Json(repository))
}
