//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use signup::Trace;
#[cfg(debug_assertions)]
use signup::doc::ApiDoc;
use signup::domain::SignUpService;
use signup::domain::ports::SignUpCommand;
use signup::inbound::http::health::{HealthState, live, ready};
use signup::inbound::http::json_error_handler;
use signup::inbound::http::sign_up::sign_up;
use signup::inbound::http::state::HttpState;
use signup::outbound::hashing::Argon2PasswordHasher;
use signup::outbound::persistence::{DieselSessionIssuer, DieselUserRepository};

/// Assemble the sign-up service from the Diesel adapters and Argon2id.
fn build_sign_up_command(config: &ServerConfig) -> std::io::Result<Arc<dyn SignUpCommand>> {
    let hasher = Argon2PasswordHasher::new().map_err(std::io::Error::other)?;
    let users = DieselUserRepository::new(config.db_pool.clone());
    let sessions = DieselSessionIssuer::new(
        config.db_pool.clone(),
        config.cookie_settings.clone(),
        Arc::new(DefaultClock),
    );
    Ok(Arc::new(SignUpService::new(
        Arc::new(users),
        Arc::new(sessions),
        Arc::new(hasher),
    )))
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1").service(sign_up);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server and mark the service ready.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when the hasher cannot be built or the socket
/// cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(HttpState::new(build_sign_up_command(&config)?));
    let timeouts = config.timeouts;
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .client_request_timeout(timeouts.read)
    .client_disconnect_timeout(timeouts.write)
    .keep_alive(timeouts.idle)
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
