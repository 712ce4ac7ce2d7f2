// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GitHub REST implementation of the [`Gateway`].

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use tracing::debug;
use url::Url;

use super::{error::upstream_message, Credential, Gateway, GatewayError};
use crate::models::{
    Environment, EnvironmentPublicKey, EnvironmentRef, GithubUser, RepoRef, Repository, Secret,
    Variable,
};
use crate::sealed::SealedSecret;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const USER_AGENT: &str = concat!("gh-env-manager/", env!("CARGO_PKG_VERSION"));
const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct EnvironmentsPage {
    #[serde(default)]
    environments: Vec<Environment>,
}

#[derive(Debug, Deserialize)]
struct VariablesPage {
    #[serde(default)]
    variables: Vec<Variable>,
}

#[derive(Debug, Deserialize)]
struct SecretsPage {
    #[serde(default)]
    secrets: Vec<Secret>,
}

/// Authenticated GitHub client for one credential.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_base_url: String,
    credential: Credential,
}

impl GithubClient {
    pub fn new(http: Client, api_base_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            http,
            api_base_url: api_base_url.into(),
            credential,
        }
    }

    /// Join percent-encoded path segments onto the API base URL.
    fn url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.api_base_url).map_err(|e| {
            GatewayError::Transport(format!("invalid GitHub API URL {}: {e}", self.api_base_url))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                GatewayError::Transport(format!(
                    "GitHub API URL {} cannot take a path",
                    self.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repo_url(&self, repo: &RepoRef, rest: &[&str]) -> Result<Url, GatewayError> {
        let mut segments = vec!["repos", repo.owner.as_str(), repo.repo.as_str()];
        segments.extend_from_slice(rest);
        self.url(&segments)
    }

    fn environment_url(
        &self,
        environment: &EnvironmentRef,
        rest: &[&str],
    ) -> Result<Url, GatewayError> {
        let mut segments = vec!["environments", environment.environment.as_str()];
        segments.extend_from_slice(rest);
        self.repo_url(&environment.repo, &segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(self.credential.expose())
            .header(ACCEPT, ACCEPT_GITHUB_JSON)
            .header(API_VERSION_HEADER, API_VERSION)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("{what}: {e}")))?;

        let status = response.status();
        debug!(%status, request = %what, "GitHub response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Status {
            status,
            message: upstream_message(status, &body),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let what = format!("GET {}", url.path());
        let response = self
            .send(self.request(Method::GET, url).query(query), &what)
            .await?;
        response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("{what}: {e}")))
    }

    /// Send a request whose response body is irrelevant.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<(), GatewayError> {
        let what = format!("{method} {}", url.path());
        let mut request = self.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        self.send(request, &what).await.map(|_| ())
    }
}

fn page_query(page: u32, per_page: u32) -> Vec<(&'static str, String)> {
    vec![("per_page", per_page.to_string()), ("page", page.to_string())]
}

#[async_trait]
impl Gateway for GithubClient {
    async fn authenticated_user(&self) -> Result<GithubUser, GatewayError> {
        self.get_json(self.url(&["user"])?, &[]).await
    }

    async fn list_repositories(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Repository>, GatewayError> {
        let mut query = page_query(page, per_page);
        query.push(("sort", "updated".to_string()));
        self.get_json(self.url(&["user", "repos"])?, &query).await
    }

    async fn get_repository(&self, repo: &RepoRef) -> Result<Repository, GatewayError> {
        self.get_json(self.repo_url(repo, &[])?, &[]).await
    }

    async fn list_environments(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Environment>, GatewayError> {
        let body: EnvironmentsPage = self
            .get_json(
                self.repo_url(repo, &["environments"])?,
                &page_query(page, per_page),
            )
            .await?;
        Ok(body.environments)
    }

    async fn upsert_environment(&self, environment: &EnvironmentRef) -> Result<(), GatewayError> {
        self.execute(
            Method::PUT,
            self.environment_url(environment, &[])?,
            Some(json!({})),
        )
        .await
    }

    async fn delete_environment(&self, environment: &EnvironmentRef) -> Result<(), GatewayError> {
        self.execute(Method::DELETE, self.environment_url(environment, &[])?, None)
            .await
    }

    async fn list_variables(
        &self,
        environment: &EnvironmentRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Variable>, GatewayError> {
        let body: VariablesPage = self
            .get_json(
                self.environment_url(environment, &["variables"])?,
                &page_query(page, per_page),
            )
            .await?;
        Ok(body.variables)
    }

    async fn create_variable(
        &self,
        environment: &EnvironmentRef,
        name: &str,
        value: &str,
    ) -> Result<(), GatewayError> {
        self.execute(
            Method::POST,
            self.environment_url(environment, &["variables"])?,
            Some(json!({ "name": name, "value": value })),
        )
        .await
    }

    async fn update_variable(
        &self,
        environment: &EnvironmentRef,
        name: &str,
        value: &str,
    ) -> Result<(), GatewayError> {
        self.execute(
            Method::PATCH,
            self.environment_url(environment, &["variables", name])?,
            Some(json!({ "name": name, "value": value })),
        )
        .await
    }

    async fn delete_variable(
        &self,
        environment: &EnvironmentRef,
        name: &str,
    ) -> Result<(), GatewayError> {
        self.execute(
            Method::DELETE,
            self.environment_url(environment, &["variables", name])?,
            None,
        )
        .await
    }

    async fn list_secrets(
        &self,
        environment: &EnvironmentRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Secret>, GatewayError> {
        let body: SecretsPage = self
            .get_json(
                self.environment_url(environment, &["secrets"])?,
                &page_query(page, per_page),
            )
            .await?;
        Ok(body.secrets)
    }

    async fn environment_public_key(
        &self,
        environment: &EnvironmentRef,
    ) -> Result<EnvironmentPublicKey, GatewayError> {
        self.get_json(
            self.environment_url(environment, &["secrets", "public-key"])?,
            &[],
        )
        .await
    }

    async fn put_secret(
        &self,
        environment: &EnvironmentRef,
        name: &str,
        sealed: &SealedSecret,
    ) -> Result<(), GatewayError> {
        self.execute(
            Method::PUT,
            self.environment_url(environment, &["secrets", name])?,
            Some(json!({
                "encrypted_value": sealed.encrypted_value,
                "key_id": sealed.key_id,
            })),
        )
        .await
    }

    async fn delete_secret(
        &self,
        environment: &EnvironmentRef,
        name: &str,
    ) -> Result<(), GatewayError> {
        self.execute(
            Method::DELETE,
            self.environment_url(environment, &["secrets", name])?,
            None,
        )
        .await
    }
}
