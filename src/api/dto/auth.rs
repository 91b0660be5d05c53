//! Authentication-related Data Transfer Objects

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::AccountResponse;
use crate::identity::Role;

/// Login request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    /// Role to log in as; usernames and emails are only unique per role
    pub role: Role,
    /// Username or email
    #[validate(length(min = 1, max = 255, message = "Identifier cannot be empty"))]
    #[schema(example = "STU202401000")]
    pub identifier: String,
    /// Plaintext password
    #[validate(length(min = 1, max = 128, message = "Password cannot be empty"))]
    #[schema(example = "@Abc12345", format = "password")]
    pub password: String,
}

/// Refresh token request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RefreshTokenRequest {
    /// Refresh token
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

/// Login response with account info and tokens
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub account: AccountResponse,
    /// Access token (short-lived)
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub access_token: String,
    /// Refresh token (long-lived)
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

/// Refresh token response with new tokens
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshTokenResponse {
    /// New access token (short-lived)
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub access_token: String,
    /// New refresh token (long-lived)
    #[schema(example = "eyJ0eXAiOiJKV1QiLCJhbGc...")]
    pub refresh_token: String,
}

/// Password change payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 6, max = 64, message = "Password must be between 6 and 64 characters"))]
    #[schema(format = "password", min_length = 6, max_length = 64)]
    pub new_password: String,
    #[validate(must_match(
        other = "new_password",
        message = "Your password and confirmation password do not match"
    ))]
    #[schema(format = "password")]
    pub confirm_password: String,
}
