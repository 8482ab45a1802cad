//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::user_handler;
use crate::domain::{UserResponse, UserRole};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI document for the users API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User API",
        version = "0.1.0",
        description = "Inscription, authentification et gestion des utilisateurs",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        user_handler::register,
        user_handler::login,
        user_handler::get_profile,
        user_handler::get_user_by_id,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::get_all_users,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            TokenResponse,
            MessageResponse,
            user_handler::RegisterRequest,
            user_handler::LoginRequest,
            user_handler::UpdateUserRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Gestion des utilisateurs")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT obtenu via /api/users/login"))
                        .build(),
                ),
            );
        }
    }
}
