use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::identity::Role;
use crate::models::Account;

/// Token type enumeration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token for API authentication (short-lived)
    Access,
    /// Refresh token for obtaining new access tokens (long-lived)
    Refresh,
}

/// JWT claims carrying the account identity and role
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub token_type: TokenType,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(account: &Account, token_type: TokenType, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: account.id.to_string(),
            username: account.username.clone(),
            email: account.email.clone(),
            role: account.role,
            token_type,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Account id from `sub`
    pub fn account_id(&self) -> AppResult<i32> {
        self.sub.parse().map_err(|_| AppError::Unauthorized {
            message: "Invalid token subject".to_string(),
        })
    }
}

/// Generates a signed HS256 token for an account
pub fn generate_token(
    account: &Account,
    token_type: TokenType,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(account, token_type, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Generates both access and refresh tokens
///
/// # Returns
/// A tuple of (access_token, refresh_token)
pub fn generate_token_pair(
    account: &Account,
    secret: &str,
    access_expiration_hours: i64,
    refresh_expiration_hours: i64,
) -> AppResult<(String, String)> {
    let access_token = generate_token(account, TokenType::Access, secret, access_expiration_hours)?;
    let refresh_token =
        generate_token(account, TokenType::Refresh, secret, refresh_expiration_hours)?;

    Ok((access_token, refresh_token))
}

/// Validates and decodes a JWT token
///
/// # Arguments
/// * `token` - The JWT token string to validate
/// * `secret` - The secret key for verifying the token
/// * `expected_type` - Optional expected token type to validate against
pub fn validate_token(
    token: &str,
    secret: &str,
    expected_type: Option<TokenType>,
) -> AppResult<Claims> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {}", e),
        },
    })?;

    if let Some(expected) = expected_type
        && claims.token_type != expected
    {
        return Err(AppError::Unauthorized {
            message: format!(
                "Invalid token type: expected {:?}, got {:?}",
                expected, claims.token_type
            ),
        });
    }

    Ok(claims)
}

pub fn validate_access_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Access))
}

pub fn validate_refresh_token(token: &str, secret: &str) -> AppResult<Claims> {
    validate_token(token, secret, Some(TokenType::Refresh))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing_0123456789";

    pub(crate) fn account(role: Role) -> Account {
        let now = Utc::now().naive_utc();
        Account {
            id: 42,
            role,
            username: "FAC202401000".to_string(),
            name: "Ravi".to_string(),
            email: "ravi@example.edu".to_string(),
            password: String::new(),
            course_id: 1,
            joining_year: 2024,
            academic_year: None,
            contact_number: None,
            avatar: None,
            profile: json!({}),
            password_updated: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_token_round_trip_keeps_role() {
        let token =
            generate_token(&account(Role::Faculty), TokenType::Access, TEST_SECRET, 1).unwrap();
        let claims = validate_access_token(&token, TEST_SECRET).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.account_id().unwrap(), 42);
        assert_eq!(claims.username, "FAC202401000");
        assert_eq!(claims.role, Role::Faculty);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_generate_token_pair() {
        let (access, refresh) =
            generate_token_pair(&account(Role::Admin), TEST_SECRET, 1, 168).unwrap();
        assert_ne!(access, refresh);
        assert!(validate_refresh_token(&refresh, TEST_SECRET).is_ok());
    }

    #[test]
    fn test_validate_wrong_token_type() {
        let access =
            generate_token(&account(Role::Admin), TokenType::Access, TEST_SECRET, 1).unwrap();

        match validate_refresh_token(&access, TEST_SECRET) {
            Err(AppError::Unauthorized { message }) => {
                assert!(message.contains("Invalid token type"))
            }
            other => panic!("Expected Unauthorized error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_token_invalid_secret() {
        let token =
            generate_token(&account(Role::Admin), TokenType::Access, TEST_SECRET, 1).unwrap();

        match validate_token(&token, "another_secret_key_that_is_long_enough", None) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("signature")),
            other => panic!("Expected Unauthorized error, got {:?}", other),
        }
    }

    #[test]
    fn test_expired_token() {
        // Negative hours create an already expired token
        let token =
            generate_token(&account(Role::Student), TokenType::Access, TEST_SECRET, -1).unwrap();

        match validate_token(&token, TEST_SECRET, None) {
            Err(AppError::Unauthorized { message }) => assert!(message.contains("expired")),
            other => panic!("Expected Unauthorized error, got {:?}", other),
        }
    }

    #[test]
    fn test_claims_serialization() {
        let claims = Claims::new(&account(Role::Student), TokenType::Refresh, 24);
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains("\"token_type\":\"refresh\""));
        assert!(json.contains("\"role\":\"student\""));
    }
}
