//! JWT authentication (`protect`) and role (`admin`) middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::UserRole;
use crate::errors::AppError;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Check if user has admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Allow the account owner or an admin.
pub fn require_self_or_admin(user: &CurrentUser, target: &str) -> Result<(), AppError> {
    let is_self = Uuid::parse_str(target).map_or(false, |id| id == user.id);
    if is_self {
        Ok(())
    } else {
        require_admin(user)
    }
}

/// JWT authentication middleware.
///
/// Extracts and validates the bearer token from the Authorization header,
/// loads the account it belongs to and injects the [`CurrentUser`] into the
/// request extensions. The role comes from storage, not from the token.
/// Any failure short-circuits with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .ok_or(AppError::Unauthorized)?;

    // Owned token: the request body is not Sync, so no borrow of it may cross the await
    let user = state.auth_service.authenticate(&token).await?;

    let current_user = CurrentUser {
        id: user.id,
        email: user.email,
        role: user.role,
    };
    tracing::debug!(user_id = %current_user.id, "Request authenticated");

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Admin gate. Must run after [`auth_middleware`]; without a
/// [`CurrentUser`] in the extensions the request is unauthenticated.
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;

    if let Err(e) = require_admin(user) {
        tracing::warn!(user_id = %user.id, "Admin route refused");
        return Err(e);
    }

    Ok(next.run(request).await)
}
