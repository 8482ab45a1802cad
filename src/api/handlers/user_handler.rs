//! User handlers mounted under `/api/users`.

use std::borrow::Cow;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, MethodRouter},
    Router,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{
    guarded, require_self_or_admin, CurrentUser, ADMIN_ONLY, AUTHENTICATED, PUBLIC,
};
use crate::api::AppState;
use crate::config::PSEUDO_PATTERN;
use crate::domain::{UpdateUser, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

static PSEUDO_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(PSEUDO_PATTERN).expect("pseudo pattern is a valid regex"));

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User email address
    #[validate(email(message = "Email invalide"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Public display name
    #[validate(
        length(min = 3, max = 30, message = "Le pseudo doit contenir entre 3 et 30 caractères"),
        regex(path = *PSEUDO_REGEX, message = "Le pseudo contient des caractères non autorisés")
    )]
    #[schema(example = "jdoe")]
    pub pseudo: String,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Email invalide"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Mot de passe requis"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Partial user update. Unknown fields (e.g. `role`) are rejected.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[validate(schema(function = "validate_has_changes"))]
pub struct UpdateUserRequest {
    #[validate(email(message = "Email invalide"))]
    #[schema(example = "new@example.com")]
    pub email: Option<String>,
    #[validate(
        length(min = 3, max = 30, message = "Le pseudo doit contenir entre 3 et 30 caractères"),
        regex(path = *PSEUDO_REGEX, message = "Le pseudo contient des caractères non autorisés")
    )]
    #[schema(example = "jdoe")]
    pub pseudo: Option<String>,
    #[validate(length(min = 8, message = "Le mot de passe doit contenir au moins 8 caractères"))]
    pub password: Option<String>,
}

fn validate_has_changes(request: &UpdateUserRequest) -> Result<(), ValidationError> {
    if request.email.is_none() && request.pseudo.is_none() && request.password.is_none() {
        let mut err = ValidationError::new("empty_update");
        err.message = Some(Cow::Borrowed("Aucun champ à mettre à jour"));
        return Err(err);
    }
    Ok(())
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            email: request.email,
            pseudo: request.pseudo,
            password: request.password,
        }
    }
}

/// Create user routes. Every route lists its guards explicitly.
pub fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/register", guarded(post(register), PUBLIC, state))
        .route("/login", guarded(post(login), PUBLIC, state))
        .route("/profile", guarded(get(get_profile), AUTHENTICATED, state))
        .route(
            "/:id",
            guarded(
                get(get_user_by_id).put(update_user).delete(delete_user),
                AUTHENTICATED,
                state,
            ),
        )
        .route("/", listing_route(state))
}

/// The admin listing. Also mounted at the trailing-slash form of the prefix,
/// which the nested `/` does not match.
pub fn listing_route(state: &AppState) -> MethodRouter<AppState> {
    guarded(get(get_all_users), ADMIN_ONLY, state)
}

/// Ids that do not parse cannot match any user.
fn parse_user_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Utilisateur créé avec succès", body = UserResponse),
        (status = 400, description = "Données invalides"),
        (status = 409, description = "Email déjà utilisé")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .auth_service
        .register(payload.email, payload.pseudo, payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Log in and get a JWT
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Connexion réussie", body = TokenResponse),
        (status = 400, description = "Données invalides"),
        (status = 401, description = "Email ou mot de passe incorrect")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profil de l'utilisateur", body = UserResponse),
        (status = 401, description = "Non authentifié")
    )
)]
pub async fn get_profile(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(current_user.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Get a user by ID (owner or admin)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Détails de l'utilisateur", body = UserResponse),
        (status = 401, description = "Non authentifié"),
        (status = 403, description = "Non autorisé"),
        (status = 404, description = "Utilisateur non trouvé")
    )
)]
pub async fn get_user_by_id(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    require_self_or_admin(&current_user, &id)?;

    let user = state.user_service.get_user(parse_user_id(&id)?).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update a user (owner or admin)
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Utilisateur mis à jour", body = UserResponse),
        (status = 400, description = "Données invalides"),
        (status = 401, description = "Non authentifié"),
        (status = 403, description = "Non autorisé"),
        (status = 404, description = "Utilisateur non trouvé"),
        (status = 409, description = "Email déjà utilisé")
    )
)]
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_self_or_admin(&current_user, &id)?;

    let user = state
        .user_service
        .update_user(parse_user_id(&id)?, payload.into())
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete a user (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Utilisateur supprimé", body = MessageResponse),
        (status = 401, description = "Non authentifié"),
        (status = 403, description = "Non autorisé"),
        (status = 404, description = "Utilisateur non trouvé")
    )
)]
pub async fn delete_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    require_self_or_admin(&current_user, &id)?;

    state.user_service.delete_user(parse_user_id(&id)?).await?;

    Ok(Json(MessageResponse::new("Utilisateur supprimé")))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Liste des utilisateurs", body = Vec<UserResponse>),
        (status = 401, description = "Non authentifié"),
        (status = 403, description = "Non autorisé")
    )
)]
pub async fn get_all_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
