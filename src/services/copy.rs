// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Copy Orchestration
//!
//! Batch copies of variables and secrets between environments, and
//! environment cloning.
//!
//! Items are written one at a time in source order. The first failing item
//! aborts the batch; items written before it stay written.
//!
//! Secret values cannot be read back from GitHub. A secret copy therefore
//! writes either a value supplied by the caller or a placeholder derived from
//! the secret's name, and says so in the report.

use std::collections::HashMap;

use tracing::{debug, info};

use super::{
    or_not_found, require_distinct, require_name, select_named, EnvironmentService, ItemKind,
    SecretService, ServiceError, ServiceResult, VariableService,
};
use crate::github::Gateway;
use crate::models::{CopiedItem, CopyAction, CopyReport, Environment, EnvironmentRef, Variable};
use crate::sealed;

/// Value written for a copied secret when the caller supplied none.
pub fn placeholder_value(name: &str) -> String {
    format!("placeholder-for-{name}")
}

fn placeholder_notice(count: usize) -> String {
    format!(
        "Secret values cannot be read from GitHub. {count} secret(s) were written with \
         placeholder values and must be updated in the target environment."
    )
}

/// How strictly a copy checks its source before writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceCheck {
    /// Empty source and unknown names are errors.
    Strict,
    /// Unknown names are skipped and an empty source copies nothing.
    Lenient,
}

pub struct CopyService<'a, G: Gateway + ?Sized> {
    gateway: &'a G,
}

impl<'a, G: Gateway + ?Sized> CopyService<'a, G> {
    pub fn new(gateway: &'a G) -> Self {
        Self { gateway }
    }

    /// Copy variables between environments of the same repository.
    ///
    /// Fails with `EmptySource` or `NamesNotFound` before any write.
    pub async fn copy_variables(
        &self,
        source: &EnvironmentRef,
        target: &EnvironmentRef,
        names: Option<&[String]>,
    ) -> ServiceResult<CopyReport> {
        self.copy_variables_checked(source, target, names, SourceCheck::Strict)
            .await
    }

    /// Copy variables into an environment of another repository.
    ///
    /// Names absent from the source are ignored and an empty source is a
    /// no-op.
    pub async fn copy_variables_to_repo(
        &self,
        source: &EnvironmentRef,
        target: &EnvironmentRef,
        names: Option<&[String]>,
    ) -> ServiceResult<CopyReport> {
        self.copy_variables_checked(source, target, names, SourceCheck::Lenient)
            .await
    }

    /// Replicate secret names between environments of the same repository.
    pub async fn copy_secrets(
        &self,
        source: &EnvironmentRef,
        target: &EnvironmentRef,
        names: Option<&[String]>,
        values: &HashMap<String, String>,
    ) -> ServiceResult<CopyReport> {
        self.copy_secrets_checked(source, target, names, values).await
    }

    /// Replicate secret names into an environment of another repository.
    pub async fn copy_secrets_to_repo(
        &self,
        source: &EnvironmentRef,
        target: &EnvironmentRef,
        names: Option<&[String]>,
        values: &HashMap<String, String>,
    ) -> ServiceResult<CopyReport> {
        self.copy_secrets_checked(source, target, names, values).await
    }

    /// Create `target` in the source's repository and copy every variable of
    /// `source` into it.
    pub async fn clone_environment(
        &self,
        source: &EnvironmentRef,
        target_name: &str,
    ) -> ServiceResult<Environment> {
        require_name("Target environment", target_name)?;
        let target = source.repo.environment(target_name);
        require_distinct(source, &target)?;
        let variables = VariableService::new(self.gateway).list(source).await?;

        let environment = EnvironmentService::new(self.gateway)
            .create(&target)
            .await?;

        let selected: Vec<&Variable> = variables.iter().collect();
        let report = self.write_variables(&target, &selected).await?;
        info!(
            from = %source,
            to = %target,
            variables = report.copied.len(),
            "Environment cloned"
        );

        Ok(environment)
    }

    async fn copy_variables_checked(
        &self,
        source: &EnvironmentRef,
        target: &EnvironmentRef,
        names: Option<&[String]>,
        check: SourceCheck,
    ) -> ServiceResult<CopyReport> {
        require_name("Target environment", &target.environment)?;
        require_distinct(source, target)?;
        let variables = VariableService::new(self.gateway).list(source).await?;
        let selected = select_source(
            ItemKind::Variables,
            source,
            &variables,
            names,
            check,
            |v| v.name.as_str(),
        )?;

        let report = self.write_variables(target, &selected).await?;
        info!(
            from = %source,
            to = %target,
            copied = report.copied.len(),
            "Variables copied"
        );
        Ok(report)
    }

    /// Create each variable, updating it instead when the target already
    /// has one with that name.
    async fn write_variables(
        &self,
        target: &EnvironmentRef,
        variables: &[&Variable],
    ) -> ServiceResult<CopyReport> {
        let mut report = CopyReport::default();

        for variable in variables {
            let created = self
                .gateway
                .create_variable(target, &variable.name, &variable.value)
                .await;

            let action = match created {
                Ok(()) => CopyAction::Created,
                Err(err) if err.is_conflict() => {
                    debug!(to = %target, variable = %variable.name, "Variable exists, updating");
                    self.gateway
                        .update_variable(target, &variable.name, &variable.value)
                        .await?;
                    CopyAction::Updated
                }
                Err(err) => {
                    return Err(or_not_found(err, || {
                        ServiceError::EnvironmentNotFound(target.clone())
                    }))
                }
            };

            debug!(to = %target, variable = %variable.name, ?action, "Variable copied");
            report.copied.push(CopiedItem {
                name: variable.name.clone(),
                action,
                placeholder: false,
            });
        }

        Ok(report)
    }

    async fn copy_secrets_checked(
        &self,
        source: &EnvironmentRef,
        target: &EnvironmentRef,
        names: Option<&[String]>,
        values: &HashMap<String, String>,
    ) -> ServiceResult<CopyReport> {
        require_name("Target environment", &target.environment)?;
        require_distinct(source, target)?;
        let secrets = SecretService::new(self.gateway).list(source).await?;
        let selected = select_source(
            ItemKind::Secrets,
            source,
            &secrets,
            names,
            SourceCheck::Strict,
            |s| s.name.as_str(),
        )?;

        let mut unused: Vec<&str> = values
            .keys()
            .map(String::as_str)
            .filter(|name| !selected.iter().any(|s| s.name == *name))
            .collect();
        if !unused.is_empty() {
            unused.sort_unstable();
            return Err(ServiceError::InvalidInput(format!(
                "Values supplied for secrets that are not being copied: {}",
                unused.join(", ")
            )));
        }

        // One key for the whole batch: the writes follow immediately.
        let public_key = self
            .gateway
            .environment_public_key(target)
            .await
            .map_err(|e| or_not_found(e, || ServiceError::EnvironmentNotFound(target.clone())))?;

        let mut report = CopyReport::default();
        let mut placeholders = 0;

        for secret in selected {
            let (value, placeholder) = match values.get(&secret.name) {
                Some(value) => (value.clone(), false),
                None => (placeholder_value(&secret.name), true),
            };

            let sealed = sealed::seal(&value, &public_key)?;
            self.gateway
                .put_secret(target, &secret.name, &sealed)
                .await
                .map_err(|e| {
                    or_not_found(e, || ServiceError::EnvironmentNotFound(target.clone()))
                })?;

            debug!(to = %target, secret = %secret.name, placeholder, "Secret copied");
            if placeholder {
                placeholders += 1;
            }
            report.copied.push(CopiedItem {
                name: secret.name.clone(),
                action: CopyAction::Written,
                placeholder,
            });
        }

        if placeholders > 0 {
            report.notice = Some(placeholder_notice(placeholders));
        }
        info!(
            from = %source,
            to = %target,
            copied = report.copied.len(),
            placeholders,
            "Secrets copied"
        );
        Ok(report)
    }
}

/// Apply the name filter and the source preconditions.
fn select_source<'i, T>(
    kind: ItemKind,
    source: &EnvironmentRef,
    items: &'i [T],
    names: Option<&[String]>,
    check: SourceCheck,
    name_of: impl Fn(&T) -> &str,
) -> ServiceResult<Vec<&'i T>> {
    if check == SourceCheck::Strict && items.is_empty() {
        return Err(ServiceError::EmptySource {
            kind,
            environment: source.clone(),
        });
    }

    let (selected, missing) = select_named(items, names, name_of);
    if check == SourceCheck::Strict && !missing.is_empty() {
        return Err(ServiceError::NamesNotFound {
            kind,
            names: missing,
        });
    }

    Ok(selected)
}
