//! Server-rendered pages.

use axum::{response::Html, routing::get, Router};

use crate::api::AppState;

/// Login form posting JSON credentials to `/api/users/login`.
pub const LOGIN_PAGE: &str = include_str!("../pages/login.html");

/// Create page routes
pub fn page_routes() -> Router<AppState> {
    Router::new().route("/login", get(login_page))
}

/// Login page
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}
