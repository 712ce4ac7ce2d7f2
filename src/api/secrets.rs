// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Secret handlers. Responses carry metadata only; values never leave
//! GitHub.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{EnvironmentPath, ItemPath};
use crate::{
    auth::GithubToken,
    error::ApiError,
    models::{
        CopyReport, CopySecretsRequest, CreateSecretRequest, CrossRepoSecretCopyRequest,
        EnvironmentRef, Secret, UpdateSecretRequest,
    },
    services::{CopyService, SecretService},
    state::AppState,
};

pub async fn list_secrets(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<EnvironmentPath>,
) -> Result<Json<Vec<Secret>>, ApiError> {
    let gateway = state.gateway(credential);
    let secrets = SecretService::new(&gateway)
        .list(&path.environment_ref())
        .await?;
    Ok(Json(secrets))
}

pub async fn get_secret(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
) -> Result<Json<Secret>, ApiError> {
    let gateway = state.gateway(credential);
    let secret = SecretService::new(&gateway)
        .get(&path.environment_ref(), &path.name)
        .await?;
    Ok(Json(secret))
}

pub async fn create_secret(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<EnvironmentPath>,
    Json(request): Json<CreateSecretRequest>,
) -> Result<(StatusCode, Json<Secret>), ApiError> {
    let gateway = state.gateway(credential);
    let secret = SecretService::new(&gateway)
        .create(&path.environment_ref(), &request.name, &request.value)
        .await?;
    Ok((StatusCode::CREATED, Json(secret)))
}

pub async fn update_secret(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
    Json(request): Json<UpdateSecretRequest>,
) -> Result<Json<Secret>, ApiError> {
    let gateway = state.gateway(credential);
    let secret = SecretService::new(&gateway)
        .update(&path.environment_ref(), &path.name, &request.value)
        .await?;
    Ok(Json(secret))
}

pub async fn delete_secret(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
) -> Result<StatusCode, ApiError> {
    let gateway = state.gateway(credential);
    SecretService::new(&gateway)
        .delete(&path.environment_ref(), &path.name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replicate secrets to another environment of the same repository.
///
/// Names without a supplied value get a placeholder; the report says which.
pub async fn copy_secrets(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<EnvironmentPath>,
    Json(request): Json<CopySecretsRequest>,
) -> Result<Json<CopyReport>, ApiError> {
    let gateway = state.gateway(credential);
    let source = path.environment_ref();
    let target = source.repo.environment(request.target_environment);
    let report = CopyService::new(&gateway)
        .copy_secrets(&source, &target, request.secrets.as_deref(), &request.values)
        .await?;
    Ok(Json(report))
}

pub async fn copy_secrets_to_repo(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<EnvironmentPath>,
    Json(request): Json<CrossRepoSecretCopyRequest>,
) -> Result<Json<CopyReport>, ApiError> {
    let gateway = state.gateway(credential);
    let target = EnvironmentRef::new(
        request.target_owner,
        request.target_repo,
        request.target_environment,
    );
    let report = CopyService::new(&gateway)
        .copy_secrets_to_repo(
            &path.environment_ref(),
            &target,
            request.secrets.as_deref(),
            &request.values,
        )
        .await?;
    Ok(Json(report))
}
