// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Write-only Actions secrets of an environment.
//!
//! Every write fetches the environment's public key immediately before
//! sealing. A key fetched earlier may already have been rotated.

use tracing::info;

use super::{
    collect_pages, or_not_found, require_name, require_value, ServiceError, ServiceResult,
};
use crate::github::{Gateway, MAX_PAGE_SIZE};
use crate::models::{EnvironmentRef, Secret};
use crate::sealed;

pub struct SecretService<'a, G: Gateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: Gateway + ?Sized> SecretService<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Secret metadata. Values are never returned by GitHub.
    pub async fn list(&self, environment: &EnvironmentRef) -> ServiceResult<Vec<Secret>> {
        let gateway = self.gateway;
        collect_pages(MAX_PAGE_SIZE, move |page| {
            gateway.list_secrets(environment, page, MAX_PAGE_SIZE)
        })
        .await
        .map_err(|e| or_not_found(e, || ServiceError::EnvironmentNotFound(environment.clone())))
    }

    pub async fn get(&self, environment: &EnvironmentRef, name: &str) -> ServiceResult<Secret> {
        self.list(environment)
            .await?
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ServiceError::SecretNotFound {
                environment: environment.clone(),
                name: name.to_string(),
            })
    }

    pub async fn create(
        &self,
        environment: &EnvironmentRef,
        name: &str,
        value: &str,
    ) -> ServiceResult<Secret> {
        require_name("Secret", name)?;
        require_value("Secret", value)?;

        self.write(environment, name, value).await?;
        info!(environment = %environment, secret = %name, "Secret created");

        self.get(environment, name).await
    }

    /// Replace the value of an existing secret.
    pub async fn update(
        &self,
        environment: &EnvironmentRef,
        name: &str,
        value: &str,
    ) -> ServiceResult<Secret> {
        require_name("Secret", name)?;
        require_value("Secret", value)?;
        self.get(environment, name).await?;

        self.write(environment, name, value).await?;
        info!(environment = %environment, secret = %name, "Secret updated");

        self.get(environment, name).await
    }

    pub async fn delete(&self, environment: &EnvironmentRef, name: &str) -> ServiceResult<()> {
        require_name("Secret", name)?;

        self.gateway
            .delete_secret(environment, name)
            .await
            .map_err(|e| {
                or_not_found(e, || ServiceError::SecretNotFound {
                    environment: environment.clone(),
                    name: name.to_string(),
                })
            })?;
        info!(environment = %environment, secret = %name, "Secret deleted");
        Ok(())
    }

    /// Fetch the current key, seal, and upload.
    async fn write(&self, environment: &EnvironmentRef, name: &str, value: &str) -> ServiceResult<()> {
        let public_key = self
            .gateway
            .environment_public_key(environment)
            .await
            .map_err(|e| or_not_found(e, || ServiceError::EnvironmentNotFound(environment.clone())))?;

        let sealed = sealed::seal(value, &public_key)?;

        self.gateway
            .put_secret(environment, name, &sealed)
            .await
            .map_err(|e| or_not_found(e, || ServiceError::EnvironmentNotFound(environment.clone())))
    }
}
