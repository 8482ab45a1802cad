//! User service - profile lookups, updates, deletion and role management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{normalize_email, Password, UpdateUser, User, UserChanges, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// List all users, oldest first
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Update email, pseudo and/or password
    async fn update_user(&self, id: Uuid, update: UpdateUser) -> AppResult<User>;

    /// Permanently delete a user
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    /// Grant the admin role to the user owning `email`
    async fn promote(&self, email: &str) -> AppResult<User>;
}

/// Concrete implementation of UserService over a user repository.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Turn a client update into storable changes, rejecting emails owned by someone else.
    async fn prepare_changes(&self, current: &User, update: UpdateUser) -> AppResult<UserChanges> {
        let email = match update.email.map(|e| normalize_email(&e)) {
            Some(email) if email != current.email => {
                if self.users.find_by_email(&email).await?.is_some() {
                    return Err(AppError::email_taken());
                }
                Some(email)
            }
            _ => None,
        };

        let password_hash = update
            .password
            .map(|p| Password::new(&p).map(Password::into_string))
            .transpose()?;

        Ok(UserChanges {
            email,
            pseudo: update.pseudo,
            password_hash,
        })
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.users.list().await
    }

    async fn update_user(&self, id: Uuid, update: UpdateUser) -> AppResult<User> {
        let current = self.get_user(id).await?;
        let changes = self.prepare_changes(&current, update).await?;

        if changes.is_empty() {
            return Ok(current);
        }

        let user = self.users.update(id, changes).await?;
        tracing::info!(user_id = %id, "User updated");
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.users.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn promote(&self, email: &str) -> AppResult<User> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_not_found()?;

        if user.is_admin() {
            return Ok(user);
        }

        self.users.set_role(user.id, UserRole::Admin).await
    }
}
