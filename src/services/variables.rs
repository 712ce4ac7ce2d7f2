// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Plain-text Actions variables of an environment.

use tracing::info;

use super::{
    collect_pages, or_not_found, require_name, require_value, ServiceError, ServiceResult,
};
use crate::github::{Gateway, VARIABLE_PAGE_SIZE};
use crate::models::{EnvironmentRef, Variable};

pub struct VariableService<'a, G: Gateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: Gateway + ?Sized> VariableService<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, environment: &EnvironmentRef) -> ServiceResult<Vec<Variable>> {
        let gateway = self.gateway;
        collect_pages(VARIABLE_PAGE_SIZE, move |page| {
            gateway.list_variables(environment, page, VARIABLE_PAGE_SIZE)
        })
        .await
        .map_err(|e| or_not_found(e, || ServiceError::EnvironmentNotFound(environment.clone())))
    }

    pub async fn get(&self, environment: &EnvironmentRef, name: &str) -> ServiceResult<Variable> {
        self.list(environment)
            .await?
            .into_iter()
            .find(|v| v.name == name)
            .ok_or_else(|| ServiceError::VariableNotFound {
                environment: environment.clone(),
                name: name.to_string(),
            })
    }

    pub async fn create(
        &self,
        environment: &EnvironmentRef,
        name: &str,
        value: &str,
    ) -> ServiceResult<Variable> {
        require_name("Variable", name)?;
        require_value("Variable", value)?;

        self.gateway
            .create_variable(environment, name, value)
            .await
            .map_err(|e| or_not_found(e, || ServiceError::EnvironmentNotFound(environment.clone())))?;
        info!(environment = %environment, variable = %name, "Variable created");

        self.get(environment, name).await
    }

    pub async fn update(
        &self,
        environment: &EnvironmentRef,
        name: &str,
        value: &str,
    ) -> ServiceResult<Variable> {
        require_name("Variable", name)?;
        require_value("Variable", value)?;

        self.gateway
            .update_variable(environment, name, value)
            .await
            .map_err(|e| {
                or_not_found(e, || ServiceError::VariableNotFound {
                    environment: environment.clone(),
                    name: name.to_string(),
                })
            })?;
        info!(environment = %environment, variable = %name, "Variable updated");

        self.get(environment, name).await
    }

    pub async fn delete(&self, environment: &EnvironmentRef, name: &str) -> ServiceResult<()> {
        require_name("Variable", name)?;

        self.gateway
            .delete_variable(environment, name)
            .await
            .map_err(|e| {
                or_not_found(e, || ServiceError::VariableNotFound {
                    environment: environment.clone(),
                    name: name.to_string(),
                })
            })?;
        info!(environment = %environment, variable = %name, "Variable deleted");
        Ok(())
    }
}
