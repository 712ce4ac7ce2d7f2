// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{EnvironmentPath, RepoPath};
use crate::{
    auth::GithubToken,
    error::ApiError,
    models::{
        BulkDeleteEnvironmentsRequest, BulkDeleteResponse, CloneEnvironmentRequest,
        CreateEnvironmentRequest, Environment,
    },
    services::{CopyService, EnvironmentService},
    state::AppState,
};

pub async fn list_environments(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<RepoPath>,
) -> Result<Json<Vec<Environment>>, ApiError> {
    let gateway = state.gateway(credential);
    let environments = EnvironmentService::new(&gateway)
        .list(&path.repo_ref())
        .await?;
    Ok(Json(environments))
}

pub async fn create_environment(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<RepoPath>,
    Json(request): Json<CreateEnvironmentRequest>,
) -> Result<(StatusCode, Json<Environment>), ApiError> {
    let gateway = state.gateway(credential);
    let environment = EnvironmentService::new(&gateway)
        .create(&path.repo_ref().environment(request.name))
        .await?;
    Ok((StatusCode::CREATED, Json(environment)))
}

pub async fn get_environment(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<EnvironmentPath>,
) -> Result<Json<Environment>, ApiError> {
    let gateway = state.gateway(credential);
    let environment = EnvironmentService::new(&gateway)
        .get(&path.environment_ref())
        .await?;
    Ok(Json(environment))
}

pub async fn delete_environment(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<EnvironmentPath>,
) -> Result<StatusCode, ApiError> {
    let gateway = state.gateway(credential);
    EnvironmentService::new(&gateway)
        .delete(&path.environment_ref())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete several environments. Per-item failures are reported in the body;
/// the response is 200 unless the request itself is invalid.
pub async fn bulk_delete_environments(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<RepoPath>,
    Json(request): Json<BulkDeleteEnvironmentsRequest>,
) -> Result<Json<BulkDeleteResponse>, ApiError> {
    let gateway = state.gateway(credential);
    let results = EnvironmentService::new(&gateway)
        .bulk_delete(&path.repo_ref(), &request.environment_names)
        .await?;
    Ok(Json(BulkDeleteResponse { results }))
}

/// Create a new environment holding a copy of this one's variables.
///
/// Secrets are not cloned.
pub async fn clone_environment(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<EnvironmentPath>,
    Json(request): Json<CloneEnvironmentRequest>,
) -> Result<(StatusCode, Json<Environment>), ApiError> {
    let gateway = state.gateway(credential);
    let environment = CopyService::new(&gateway)
        .clone_environment(&path.environment_ref(), &request.target_environment)
        .await?;
    Ok((StatusCode::CREATED, Json(environment)))
}
