// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory [`Gateway`] for tests.
//!
//! Mirrors the GitHub behaviour the services depend on: 404 for unknown
//! repositories/environments/items, 422 when creating an existing variable,
//! real pagination, and sealed secrets that only the environment's private
//! key can open. Every mutating call is recorded in a write log.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use crypto_box::{aead::OsRng, SecretKey};
use reqwest::StatusCode;

use super::{Gateway, GatewayError};
use crate::models::{
    Environment, EnvironmentPublicKey, EnvironmentRef, GithubUser, RepoRef, Repository,
    RepositoryOwner, Secret, Variable,
};
use crate::sealed::{self, SealedSecret};

/// A mutating call observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    UpsertEnvironment(EnvironmentRef),
    DeleteEnvironment(EnvironmentRef),
    CreateVariable(EnvironmentRef, String),
    UpdateVariable(EnvironmentRef, String),
    DeleteVariable(EnvironmentRef, String),
    PutSecret(EnvironmentRef, String),
    DeleteSecret(EnvironmentRef, String),
}

/// Calls that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    DeleteEnvironment,
    CreateVariable,
    UpdateVariable,
    PutSecret,
}

struct FakeEnvironment {
    environment: Environment,
    variables: Vec<Variable>,
    secrets: Vec<(Secret, SealedSecret)>,
    key_id: String,
    private_key: SecretKey,
}

impl FakeEnvironment {
    fn new(name: &str, key_serial: usize) -> Self {
        let now = Utc::now();
        Self {
            environment: Environment {
                name: name.to_string(),
                url: format!("https://api.github.com/environments/{name}"),
                html_url: format!("https://github.com/environments/{name}"),
                created_at: now,
                updated_at: now,
            },
            variables: Vec::new(),
            secrets: Vec::new(),
            key_id: format!("key-{key_serial}"),
            private_key: SecretKey::generate(&mut OsRng),
        }
    }

    fn public_key(&self) -> EnvironmentPublicKey {
        EnvironmentPublicKey {
            key_id: self.key_id.clone(),
            key: STANDARD.encode(self.private_key.public_key().as_bytes()),
        }
    }

    fn open(&self, sealed: &SealedSecret) -> Option<String> {
        let ciphertext = STANDARD.decode(&sealed.encrypted_value).ok()?;
        let plaintext = self.private_key.unseal(&ciphertext).ok()?;
        String::from_utf8(plaintext).ok()
    }
}

struct FakeRepository {
    repository: Repository,
    environments: Vec<FakeEnvironment>,
}

#[derive(Default)]
struct FakeState {
    user: Option<GithubUser>,
    repositories: BTreeMap<RepoRef, FakeRepository>,
    writes: Vec<Write>,
    key_fetches: usize,
    key_serial: usize,
    failures: HashMap<(Op, String), GatewayError>,
}

#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<FakeState>,
}

pub fn status_error(status: StatusCode, message: &str) -> GatewayError {
    GatewayError::Status {
        status,
        message: message.to_string(),
    }
}

fn not_found() -> GatewayError {
    status_error(StatusCode::NOT_FOUND, "Not Found")
}

fn page<T: Clone>(items: &[T], page: u32, per_page: u32) -> Vec<T> {
    let start = (page.saturating_sub(1) * per_page) as usize;
    items
        .iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect()
}

impl FakeState {
    fn repository(&mut self, repo: &RepoRef) -> Result<&mut FakeRepository, GatewayError> {
        self.repositories.get_mut(repo).ok_or_else(not_found)
    }

    fn environment(&mut self, env: &EnvironmentRef) -> Result<&mut FakeEnvironment, GatewayError> {
        self.repository(&env.repo)?
            .environments
            .iter_mut()
            .find(|e| e.environment.name == env.environment)
            .ok_or_else(not_found)
    }

    fn injected(&self, op: Op, name: &str) -> Result<(), GatewayError> {
        match self.failures.get(&(op, name.to_string())) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn with_user(self, login: &str) -> Self {
        self.lock().user = Some(GithubUser {
            login: login.to_string(),
            id: 1,
        });
        self
    }

    pub fn with_repository(self, repo: &RepoRef) -> Self {
        let mut state = self.lock();
        let id = state.repositories.len() as u64 + 1;
        state
            .repositories
            .entry(repo.clone())
            .or_insert_with(|| FakeRepository {
                repository: Repository {
                    id,
                    name: repo.repo.clone(),
                    owner: RepositoryOwner {
                        login: repo.owner.clone(),
                    },
                    full_name: repo.to_string(),
                    description: None,
                    html_url: format!("https://github.com/{repo}"),
                    private: false,
                },
                environments: Vec::new(),
            });
        drop(state);
        self
    }

    pub fn with_environment(self, env: &EnvironmentRef) -> Self {
        let this = self.with_repository(&env.repo);
        {
            let mut state = this.lock();
            state.key_serial += 1;
            let serial = state.key_serial;
            let repository = state.repository(&env.repo).unwrap();
            if !repository
                .environments
                .iter()
                .any(|e| e.environment.name == env.environment)
            {
                repository
                    .environments
                    .push(FakeEnvironment::new(&env.environment, serial));
            }
        }
        this
    }

    pub fn with_variable(self, env: &EnvironmentRef, name: &str, value: &str) -> Self {
        let this = self.with_environment(env);
        {
            let mut state = this.lock();
            let now = Utc::now();
            state.environment(env).unwrap().variables.push(Variable {
                name: name.to_string(),
                value: value.to_string(),
                created_at: now,
                updated_at: now,
            });
        }
        this
    }

    pub fn with_secret(self, env: &EnvironmentRef, name: &str, value: &str) -> Self {
        let this = self.with_environment(env);
        {
            let mut state = this.lock();
            let fake_env = state.environment(env).unwrap();
            let sealed = sealed::seal(value, &fake_env.public_key()).unwrap();
            let now = Utc::now();
            fake_env.secrets.push((
                Secret {
                    name: name.to_string(),
                    created_at: now,
                    updated_at: now,
                },
                sealed,
            ));
        }
        this
    }

    /// Make the given call fail for one item name.
    pub fn fail_on(self, op: Op, name: &str, err: GatewayError) -> Self {
        self.lock().failures.insert((op, name.to_string()), err);
        self
    }

    /// Replace the environment key, invalidating previously fetched keys.
    pub fn rotate_key(&self, env: &EnvironmentRef) {
        let mut state = self.lock();
        state.key_serial += 1;
        let serial = state.key_serial;
        let fake_env = state.environment(env).unwrap();
        fake_env.key_id = format!("key-{serial}");
        fake_env.private_key = SecretKey::generate(&mut OsRng);
    }

    pub fn writes(&self) -> Vec<Write> {
        self.lock().writes.clone()
    }

    pub fn key_fetches(&self) -> usize {
        self.lock().key_fetches
    }

    pub fn environment_names(&self, repo: &RepoRef) -> Vec<String> {
        self.lock()
            .repositories
            .get(repo)
            .map(|r| {
                r.environments
                    .iter()
                    .map(|e| e.environment.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Variables of an environment as `(name, value)` pairs, sorted by name.
    pub fn variables(&self, env: &EnvironmentRef) -> Vec<(String, String)> {
        let mut state = self.lock();
        let mut pairs: Vec<_> = state
            .environment(env)
            .map(|e| {
                e.variables
                    .iter()
                    .map(|v| (v.name.clone(), v.value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        pairs.sort();
        pairs
    }

    /// Open a stored secret with the environment's private key.
    pub fn secret_value(&self, env: &EnvironmentRef, name: &str) -> Option<String> {
        let mut state = self.lock();
        let fake_env = state.environment(env).ok()?;
        let (_, sealed) = fake_env.secrets.iter().find(|(s, _)| s.name == name)?;
        fake_env.open(sealed)
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn authenticated_user(&self) -> Result<GithubUser, GatewayError> {
        self.lock()
            .user
            .clone()
            .ok_or_else(|| status_error(StatusCode::UNAUTHORIZED, "Bad credentials"))
    }

    async fn list_repositories(
        &self,
        page_number: u32,
        per_page: u32,
    ) -> Result<Vec<Repository>, GatewayError> {
        let state = self.lock();
        let all: Vec<Repository> = state
            .repositories
            .values()
            .map(|r| r.repository.clone())
            .collect();
        Ok(page(&all, page_number, per_page))
    }

    async fn get_repository(&self, repo: &RepoRef) -> Result<Repository, GatewayError> {
        Ok(self.lock().repository(repo)?.repository.clone())
    }

    async fn list_environments(
        &self,
        repo: &RepoRef,
        page_number: u32,
        per_page: u32,
    ) -> Result<Vec<Environment>, GatewayError> {
        let mut state = self.lock();
        let all: Vec<Environment> = state
            .repository(repo)?
            .environments
            .iter()
            .map(|e| e.environment.clone())
            .collect();
        Ok(page(&all, page_number, per_page))
    }

    async fn upsert_environment(&self, env: &EnvironmentRef) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.key_serial += 1;
        let serial = state.key_serial;
        let repository = state.repository(&env.repo)?;
        if !repository
            .environments
            .iter()
            .any(|e| e.environment.name == env.environment)
        {
            repository
                .environments
                .push(FakeEnvironment::new(&env.environment, serial));
        }
        state.writes.push(Write::UpsertEnvironment(env.clone()));
        Ok(())
    }

    async fn delete_environment(&self, env: &EnvironmentRef) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.injected(Op::DeleteEnvironment, &env.environment)?;
        let repository = state.repository(&env.repo)?;
        let before = repository.environments.len();
        repository
            .environments
            .retain(|e| e.environment.name != env.environment);
        if repository.environments.len() == before {
            return Err(not_found());
        }
        state.writes.push(Write::DeleteEnvironment(env.clone()));
        Ok(())
    }

    async fn list_variables(
        &self,
        env: &EnvironmentRef,
        page_number: u32,
        per_page: u32,
    ) -> Result<Vec<Variable>, GatewayError> {
        let mut state = self.lock();
        Ok(page(&state.environment(env)?.variables, page_number, per_page))
    }

    async fn create_variable(
        &self,
        env: &EnvironmentRef,
        name: &str,
        value: &str,
    ) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.injected(Op::CreateVariable, name)?;
        let fake_env = state.environment(env)?;
        if fake_env.variables.iter().any(|v| v.name == name) {
            return Err(status_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Already exists - Variable already exists",
            ));
        }
        let now = Utc::now();
        fake_env.variables.push(Variable {
            name: name.to_string(),
            value: value.to_string(),
            created_at: now,
            updated_at: now,
        });
        state
            .writes
            .push(Write::CreateVariable(env.clone(), name.to_string()));
        Ok(())
    }

    async fn update_variable(
        &self,
        env: &EnvironmentRef,
        name: &str,
        value: &str,
    ) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.injected(Op::UpdateVariable, name)?;
        let variable = state
            .environment(env)?
            .variables
            .iter_mut()
            .find(|v| v.name == name)
            .ok_or_else(not_found)?;
        variable.value = value.to_string();
        variable.updated_at = Utc::now();
        state
            .writes
            .push(Write::UpdateVariable(env.clone(), name.to_string()));
        Ok(())
    }

    async fn delete_variable(&self, env: &EnvironmentRef, name: &str) -> Result<(), GatewayError> {
        let mut state = self.lock();
        let fake_env = state.environment(env)?;
        let before = fake_env.variables.len();
        fake_env.variables.retain(|v| v.name != name);
        if fake_env.variables.len() == before {
            return Err(not_found());
        }
        state
            .writes
            .push(Write::DeleteVariable(env.clone(), name.to_string()));
        Ok(())
    }

    async fn list_secrets(
        &self,
        env: &EnvironmentRef,
        page_number: u32,
        per_page: u32,
    ) -> Result<Vec<Secret>, GatewayError> {
        let mut state = self.lock();
        let all: Vec<Secret> = state
            .environment(env)?
            .secrets
            .iter()
            .map(|(s, _)| s.clone())
            .collect();
        Ok(page(&all, page_number, per_page))
    }

    async fn environment_public_key(
        &self,
        env: &EnvironmentRef,
    ) -> Result<EnvironmentPublicKey, GatewayError> {
        let mut state = self.lock();
        let key = state.environment(env)?.public_key();
        state.key_fetches += 1;
        Ok(key)
    }

    async fn put_secret(
        &self,
        env: &EnvironmentRef,
        name: &str,
        sealed: &SealedSecret,
    ) -> Result<(), GatewayError> {
        let mut state = self.lock();
        state.injected(Op::PutSecret, name)?;
        let fake_env = state.environment(env)?;
        if sealed.key_id != fake_env.key_id || fake_env.open(sealed).is_none() {
            return Err(status_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Bad request - key_id does not match the current public key",
            ));
        }
        let now = Utc::now();
        match fake_env.secrets.iter_mut().find(|(s, _)| s.name == name) {
            Some((secret, stored)) => {
                secret.updated_at = now;
                *stored = sealed.clone();
            }
            None => fake_env.secrets.push((
                Secret {
                    name: name.to_string(),
                    created_at: now,
                    updated_at: now,
                },
                sealed.clone(),
            )),
        }
        state
            .writes
            .push(Write::PutSecret(env.clone(), name.to_string()));
        Ok(())
    }

    async fn delete_secret(&self, env: &EnvironmentRef, name: &str) -> Result<(), GatewayError> {
        let mut state = self.lock();
        let fake_env = state.environment(env)?;
        let before = fake_env.secrets.len();
        fake_env.secrets.retain(|(s, _)| s.name != name);
        if fake_env.secrets.len() == before {
            return Err(not_found());
        }
        state
            .writes
            .push(Write::DeleteSecret(env.clone(), name.to_string()));
        Ok(())
    }
}
