// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

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
        CopyReport, CopyVariablesRequest, CreateVariableRequest, CrossRepoVariableCopyRequest,
        EnvironmentRef, UpdateVariableRequest, Variable,
    },
    services::{CopyService, VariableService},
    state::AppState,
};

pub async fn list_variables(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<EnvironmentPath>,
) -> Result<Json<Vec<Variable>>, ApiError> {
    let gateway = state.gateway(credential);
    let variables = VariableService::new(&gateway)
        .list(&path.environment_ref())
        .await?;
    Ok(Json(variables))
}

pub async fn get_variable(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
) -> Result<Json<Variable>, ApiError> {
    let gateway = state.gateway(credential);
    let variable = VariableService::new(&gateway)
        .get(&path.environment_ref(), &path.name)
        .await?;
    Ok(Json(variable))
}

pub async fn create_variable(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<EnvironmentPath>,
    Json(request): Json<CreateVariableRequest>,
) -> Result<(StatusCode, Json<Variable>), ApiError> {
    let gateway = state.gateway(credential);
    let variable = VariableService::new(&gateway)
        .create(&path.environment_ref(), &request.name, &request.value)
        .await?;
    Ok((StatusCode::CREATED, Json(variable)))
}

pub async fn update_variable(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
    Json(request): Json<UpdateVariableRequest>,
) -> Result<Json<Variable>, ApiError> {
    let gateway = state.gateway(credential);
    let variable = VariableService::new(&gateway)
        .update(&path.environment_ref(), &path.name, &request.value)
        .await?;
    Ok(Json(variable))
}

pub async fn delete_variable(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<ItemPath>,
) -> Result<StatusCode, ApiError> {
    let gateway = state.gateway(credential);
    VariableService::new(&gateway)
        .delete(&path.environment_ref(), &path.name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Copy variables to another environment of the same repository.
pub async fn copy_variables(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<EnvironmentPath>,
    Json(request): Json<CopyVariablesRequest>,
) -> Result<Json<CopyReport>, ApiError> {
    let gateway = state.gateway(credential);
    let source = path.environment_ref();
    let target = source.repo.environment(request.target_environment);
    let report = CopyService::new(&gateway)
        .copy_variables(&source, &target, request.variables.as_deref())
        .await?;
    Ok(Json(report))
}

/// Copy variables to an environment of another repository.
pub async fn copy_variables_to_repo(
    GithubToken(credential): GithubToken,
    State(state): State<AppState>,
    Path(path): Path<EnvironmentPath>,
    Json(request): Json<CrossRepoVariableCopyRequest>,
) -> Result<Json<CopyReport>, ApiError> {
    let gateway = state.gateway(credential);
    let target = EnvironmentRef::new(
        request.target_owner,
        request.target_repo,
        request.target_environment,
    );
    let report = CopyService::new(&gateway)
        .copy_variables_to_repo(
            &path.environment_ref(),
            &target,
            request.variables.as_deref(),
        )
        .await?;
    Ok(Json(report))
}
