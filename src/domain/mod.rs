//! Domain layer - Core business entities and logic
//!
//! Users, roles and the password value object. Nothing in here knows
//! about HTTP or the database.

pub mod password;
pub mod user;

pub use password::Password;
pub use user::{normalize_email, UpdateUser, User, UserChanges, UserResponse, UserRole};
