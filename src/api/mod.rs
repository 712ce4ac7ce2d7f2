// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    auth::extractor::GITHUB_TOKEN_HEADER,
    models::{EnvironmentRef, RepoRef},
    state::AppState,
};

pub mod auth;
pub mod environments;
pub mod health;
pub mod repositories;
pub mod secrets;
pub mod variables;

/// `/{owner}/{repo}` path parameters.
#[derive(Debug, Deserialize)]
pub struct RepoPath {
    pub owner: String,
    pub repo: String,
}

impl RepoPath {
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(self.owner.clone(), self.repo.clone())
    }
}

/// `/{owner}/{repo}/environments/{env}` path parameters.
#[derive(Debug, Deserialize)]
pub struct EnvironmentPath {
    pub owner: String,
    pub repo: String,
    pub env: String,
}

impl EnvironmentPath {
    pub fn environment_ref(&self) -> EnvironmentRef {
        EnvironmentRef::new(self.owner.clone(), self.repo.clone(), self.env.clone())
    }
}

/// `/{owner}/{repo}/environments/{env}/{variables|secrets}/{name}` path parameters.
#[derive(Debug, Deserialize)]
pub struct ItemPath {
    pub owner: String,
    pub repo: String,
    pub env: String,
    pub name: String,
}

impl ItemPath {
    pub fn environment_ref(&self) -> EnvironmentRef {
        EnvironmentRef::new(self.owner.clone(), self.repo.clone(), self.env.clone())
    }
}

pub fn router(state: AppState) -> Router {
    let env_routes = "/repositories/{owner}/{repo}/environments/{env}";

    let api_routes = Router::new()
        .route("/auth/validate", get(auth::validate))
        .route("/repositories", get(repositories::list_repositories))
        .route(
            "/repositories/{owner}/{repo}",
            get(repositories::get_repository),
        )
        .route(
            "/repositories/{owner}/{repo}/environments",
            get(environments::list_environments).post(environments::create_environment),
        )
        .route(
            "/repositories/{owner}/{repo}/environments/bulk-delete",
            post(environments::bulk_delete_environments),
        )
        .route(
            env_routes,
            get(environments::get_environment).delete(environments::delete_environment),
        )
        .route(
            &format!("{env_routes}/clone"),
            post(environments::clone_environment),
        )
        .route(
            &format!("{env_routes}/variables"),
            get(variables::list_variables).post(variables::create_variable),
        )
        .route(
            &format!("{env_routes}/variables/copy"),
            post(variables::copy_variables),
        )
        .route(
            &format!("{env_routes}/variables/copy-to-repo"),
            post(variables::copy_variables_to_repo),
        )
        .route(
            &format!("{env_routes}/variables/{{name}}"),
            get(variables::get_variable)
                .put(variables::update_variable)
                .delete(variables::delete_variable),
        )
        .route(
            &format!("{env_routes}/secrets"),
            get(secrets::list_secrets).post(secrets::create_secret),
        )
        .route(
            &format!("{env_routes}/secrets/copy"),
            post(secrets::copy_secrets),
        )
        .route(
            &format!("{env_routes}/secrets/copy-to-repo"),
            post(secrets::copy_secrets_to_repo),
        )
        .route(
            &format!("{env_routes}/secrets/{{name}}"),
            get(secrets::get_secret)
                .put(secrets::update_secret)
                .delete(secrets::delete_secret),
        );

    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors),
        )
}

/// Browser access for the configured origins only, with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(GITHUB_TOKEN_HEADER),
        ])
        .allow_credentials(true)
}
