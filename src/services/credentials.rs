//! Credential issuing for new accounts.

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::utils::password::hash_password;

/// Turns a plaintext password into the stored credential.
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    async fn hash(&self, plaintext: &str) -> AppResult<String>;
}

/// Argon2id hashing on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Issuer;

#[async_trait]
impl CredentialIssuer for Argon2Issuer {
    async fn hash(&self, plaintext: &str) -> AppResult<String> {
        let plaintext = plaintext.to_string();
        tokio::task::spawn_blocking(move || hash_password(&plaintext))
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::anyhow!("Password hashing task failed: {e}"),
            })?
    }
}
