//! Authentication service - registration, login and token verification.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{normalize_email, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user. A known email yields `Conflict`.
    async fn register(&self, email: String, pseudo: String, password: String) -> AppResult<User>;

    /// Check credentials and issue a JWT
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a bearer token to the account it was issued for.
    ///
    /// The account is reloaded on every call, so a deleted user yields
    /// `Unauthorized` and role changes apply without a new login.
    async fn authenticate(&self, token: &str) -> AppResult<User>;
}

/// Verified against when the email is unknown so both paths cost one Argon2 run.
static DUMMY_PASSWORD: Lazy<Password> = Lazy::new(|| {
    Password::new("dummy-password-for-timing")
        .unwrap_or_else(|_| Password::from_hash(String::new()))
});

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Concrete implementation of AuthService over a user repository.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl Authenticator {
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, email: String, pseudo: String, password: String) -> AppResult<User> {
        let email = normalize_email(&email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::email_taken());
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .users
            .create(User::new(email, pseudo, password_hash))
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let user = self.users.find_by_email(&normalize_email(&email)).await?;

        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => DUMMY_PASSWORD.clone(),
        };
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => generate_token(&user, &self.config),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.verify_token(token)?;

        self.users.find_by_id(claims.sub).await?.ok_or_else(|| {
            tracing::debug!(user_id = %claims.sub, "Token for a missing account");
            AppError::Unauthorized
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEV_JWT_SECRET;
    use crate::domain::UserRole;
    use crate::infra::MockUserRepository;
    use mockall::predicate::eq;

    fn config() -> Config {
        Config::new("postgres://localhost/test", DEV_JWT_SECRET).unwrap()
    }

    fn stored_user(email: &str, password: &str) -> User {
        let hash = Password::new(password).unwrap().into_string();
        User::new(email.to_string(), "alice".to_string(), hash)
    }

    #[tokio::test]
    async fn test_register_normalizes_email_and_hashes() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("alice@example.com"))
            .returning(|_| Ok(None));
        repo.expect_create().returning(Ok);

        let service = Authenticator::new(Arc::new(repo), config());
        let user = service
            .register(
                " Alice@Example.com ".to_string(),
                "alice".to_string(),
                "SecurePass123".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, UserRole::User);
        assert_ne!(user.password_hash, "SecurePass123");
        assert!(Password::from_hash(user.password_hash).verify("SecurePass123"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts_without_insert() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "whatever123"))));
        repo.expect_create().never();

        let service = Authenticator::new(Arc::new(repo), config());
        let result = service
            .register(
                "alice@example.com".to_string(),
                "alice".to_string(),
                "SecurePass123".to_string(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let user = stored_user("alice@example.com", "SecurePass123");
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = Authenticator::new(Arc::new(repo), config());
        let token = service
            .login("alice@example.com".to_string(), "SecurePass123".to_string())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 24 * 3600);

        let claims = service.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, "user");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user = stored_user("alice@example.com", "SecurePass123");

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = Authenticator::new(Arc::new(repo), config());
        let result = service
            .login("alice@example.com".to_string(), "WrongPass123".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let service = Authenticator::new(Arc::new(repo), config());
        let result = service
            .login("ghost@example.com".to_string(), "SecurePass123".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_uses_stored_role() {
        let mut user = stored_user("alice@example.com", "SecurePass123");
        let token = generate_token(&user, &config()).unwrap();
        user.role = UserRole::Admin;
        let user_id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| Ok(Some(user.clone())));

        let service = Authenticator::new(Arc::new(repo), config());
        let current = service.authenticate(&token.access_token).await.unwrap();

        assert_eq!(current.id, user_id);
        assert!(current.is_admin());
    }

    #[tokio::test]
    async fn test_authenticate_deleted_account() {
        let user = stored_user("alice@example.com", "SecurePass123");
        let token = generate_token(&user, &config()).unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = Authenticator::new(Arc::new(repo), config());
        let result = service.authenticate(&token.access_token).await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_bad_token_skips_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().never();

        let service = Authenticator::new(Arc::new(repo), config());
        let result = service.authenticate("garbage").await;

        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let service = Authenticator::new(Arc::new(MockUserRepository::new()), config());
        let other = Config::new("postgres://localhost/test", "another-secret-that-is-long-enough!!")
            .unwrap();
        let user = User::new("a@b.fr".into(), "alice".into(), "hash".into());
        let token = generate_token(&user, &other).unwrap();

        assert!(matches!(
            service.verify_token(&token.access_token),
            Err(AppError::Jwt(_))
        ));
    }
}
