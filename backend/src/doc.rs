//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the sign-up endpoint, the health probes, the request
//! and error bodies, and the schema wrappers for the domain error type. It is
//! served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::session::DEFAULT_SESSION_COOKIE_NAME;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::sign_up::{SignUpErrorBody, SignUpRequestBody};

/// Describe the session cookie issued on sign-up.
struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                DEFAULT_SESSION_COOKIE_NAME,
                "Session cookie issued by POST /api/v1/signup.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieAddon),
    info(
        title = "Sign-up service API",
        description = "Account registration with session issuance, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::sign_up::sign_up,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SignUpRequestBody,
        SignUpErrorBody,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "auth", description = "Account registration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
