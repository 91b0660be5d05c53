//! JWT authentication middleware.
//!
//! Validates the Bearer access token and exposes the caller as `AuthUser`.
//! Role checks happen in handlers through `AuthUser::require_role`.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::identity::Role;
use crate::state::AppState;
use crate::utils::jwt::{Claims, validate_access_token};

/// Authenticated account, added to request extensions by `auth_middleware`
/// and extracted in handlers with `Extension<AuthUser>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub account_id: i32,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Fails with `Forbidden` unless the caller holds one of `allowed`.
    pub fn require_role(&self, allowed: &[Role]) -> AppResult<()> {
        if allowed.contains(&self.role) {
            return Ok(());
        }
        Err(AppError::Forbidden {
            message: format!("Role '{}' may not perform this action", self.role),
        })
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> AppResult<Self> {
        Ok(Self {
            account_id: claims.account_id()?,
            username: claims.username,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// JWT authentication middleware
///
/// # Headers
/// Expects: `Authorization: Bearer <token>`
///
/// # Errors
/// Returns 401 Unauthorized if the header is missing or malformed, or the
/// token is invalid, expired or a refresh token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        })?;

    let claims = validate_access_token(token, &state.jwt_config.secret)?;
    let auth_user = AuthUser::try_from(claims)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
