//! Per-route guard chains.
//!
//! Each route declares its guards as an ordered slice; the first guard in
//! the slice runs first. This keeps "authenticate, then authorize" visible
//! on the route itself instead of depending on where a layer was mounted.
//!
//! Guards wrap the method fallback too, so an unsupported method on a
//! guarded path answers 401/403 before 405.

use axum::{middleware, routing::MethodRouter};

use super::auth::{admin_middleware, auth_middleware};
use crate::api::AppState;

/// A check that runs before a route's handler and may short-circuit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Valid bearer token required (401 otherwise)
    Protect,
    /// Admin role required (403 otherwise); list after `Protect`
    Admin,
}

/// Public routes
pub const PUBLIC: &[Guard] = &[];

/// Authenticated routes
pub const AUTHENTICATED: &[Guard] = &[Guard::Protect];

/// Authenticated admin routes
pub const ADMIN_ONLY: &[Guard] = &[Guard::Protect, Guard::Admin];

/// Wrap `route` so that `guards` run in declaration order before it.
///
/// Layers wrap from the inside out, so the slice is applied in reverse:
/// the last guard ends up innermost, the first outermost. `layer` rather
/// than `route_layer` so the 405 fallback sits behind the guards.
pub fn guarded(
    route: MethodRouter<AppState>,
    guards: &[Guard],
    state: &AppState,
) -> MethodRouter<AppState> {
    guards.iter().rev().fold(route, |route, guard| match guard {
        Guard::Protect => {
            route.layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        }
        Guard::Admin => route.layer(middleware::from_fn(admin_middleware)),
    })
}
