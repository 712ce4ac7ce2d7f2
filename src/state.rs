// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::github::{client::USER_AGENT, client_for, Credential, GithubClient};

#[derive(Clone)]
pub struct AppState {
    /// Connection pool shared by every request. Carries no credential.
    pub http: reqwest::Client,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.github_timeout)
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// GitHub client authenticated as the caller of the current request.
    pub fn gateway(&self, credential: Credential) -> GithubClient {
        client_for(&self.http, &self.config.gateway, credential)
    }
}

#[cfg(test)]
impl Default for AppState {
    fn default() -> Self {
        Self {
            http: reqwest::Client::new(),
            config: Arc::new(ServerConfig::default()),
        }
    }
}
