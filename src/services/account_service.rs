//! Account service for reads, profile changes and authentication.
//!
//! Creation goes through `RegistrationService`; everything else an account
//! does after that lives here.

use chrono::Utc;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::identity::Role;
use crate::models::{Account, UpdateAccount};
use crate::repositories::{AccountFilter, AccountRepository};
use crate::utils::jwt::{generate_token_pair, validate_refresh_token};
use crate::utils::password::{hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Profile fields an account may change about itself
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub contact_number: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Clone)]
pub struct AccountService {
    repo: AccountRepository,
}

impl AccountService {
    pub fn new(repo: AccountRepository) -> Self {
        Self { repo }
    }

    /// Gets an account by its ID.
    ///
    /// # Returns
    /// The account if found, or `NotFound` error
    pub async fn get(&self, id: i32) -> AppResult<Account> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("account", "id", id))
    }

    /// Checks credentials and issues a token pair.
    ///
    /// # Arguments
    /// * `role` - The role the caller is logging in as
    /// * `identifier` - Username or email within that role
    /// * `password` - Plaintext password
    /// * `jwt` - Signing secret and token lifetimes
    ///
    /// # Returns
    /// A tuple of (account, access_token, refresh_token)
    pub async fn authenticate(
        &self,
        role: Role,
        identifier: &str,
        password: &str,
        jwt: &JwtConfig,
    ) -> AppResult<(Account, String, String)> {
        let unauthorized = || AppError::Unauthorized {
            message: INVALID_CREDENTIALS.to_string(),
        };

        let account = self
            .repo
            .find_by_login(role, identifier)
            .await?
            .ok_or_else(unauthorized)?;

        let stored = account.password.clone();
        let candidate = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored))
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::anyhow!("Password verification task failed: {e}"),
            })??;
        if !matches {
            tracing::debug!(role = %role, "Login rejected");
            return Err(unauthorized());
        }

        let (access_token, refresh_token) = generate_token_pair(
            &account,
            &jwt.secret,
            jwt.access_token_expiration,
            jwt.refresh_token_expiration,
        )?;
        tracing::info!(role = %role, username = %account.username, "Login succeeded");

        Ok((account, access_token, refresh_token))
    }

    /// Exchanges a refresh token for a new pair, as long as the account
    /// still exists.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        jwt: &JwtConfig,
    ) -> AppResult<(String, String)> {
        let claims = validate_refresh_token(refresh_token, &jwt.secret)?;
        let account = self
            .repo
            .find_by_id(claims.account_id()?)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: "Account no longer exists".to_string(),
            })?;

        generate_token_pair(
            &account,
            &jwt.secret,
            jwt.access_token_expiration,
            jwt.refresh_token_expiration,
        )
    }

    pub async fn update_profile(&self, id: i32, changes: ProfileChanges) -> AppResult<Account> {
        self.get(id).await?;
        self.repo
            .update(
                id,
                UpdateAccount {
                    name: changes.name,
                    contact_number: changes.contact_number,
                    avatar: changes.avatar,
                    updated_at: Some(Utc::now().naive_utc()),
                    ..Default::default()
                },
            )
            .await
    }

    /// Replaces the password and marks the one-time password as used.
    pub async fn change_password(&self, id: i32, new_password: &str) -> AppResult<Account> {
        self.get(id).await?;
        let plaintext = new_password.to_string();
        let hashed = tokio::task::spawn_blocking(move || hash_password(&plaintext))
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::anyhow!("Password hashing task failed: {e}"),
            })??;

        let account = self
            .repo
            .update(
                id,
                UpdateAccount {
                    password: Some(hashed),
                    password_updated: Some(true),
                    updated_at: Some(Utc::now().naive_utc()),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(username = %account.username, "Password changed");
        Ok(account)
    }

    /// # Returns
    /// A tuple of (accounts, total_count)
    pub async fn list(
        &self,
        role: Role,
        filter: &AccountFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Account>, i64)> {
        self.repo.list(role, filter, offset, limit).await
    }

    /// Deletes accounts of `role` by id and returns how many went away.
    pub async fn delete_many(&self, role: Role, ids: &[i32]) -> AppResult<usize> {
        if ids.is_empty() {
            return Err(AppError::BadRequest {
                message: "At least one id is required".to_string(),
            });
        }
        let deleted = self.repo.delete_many(role, ids).await?;
        tracing::info!(role = %role, requested = ids.len(), deleted, "Accounts deleted");
        Ok(deleted)
    }
}
