//! Application services layer - Use cases and business logic.
//!
//! Services depend on the [`UserRepository`](crate::infra::UserRepository)
//! abstraction so handlers and tests can swap the storage backend.

mod auth_service;
mod user_service;

pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use user_service::{UserManager, UserService};
