//! API middleware.

mod auth;
mod guard;

pub use auth::{
    admin_middleware, auth_middleware, require_admin, require_self_or_admin, CurrentUser,
};
pub use guard::{guarded, Guard, ADMIN_ONLY, AUTHENTICATED, PUBLIC};
