//! Server construction and middleware wiring.

mod config;

pub use config::{ServerConfig, ServerSettings};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use profiles_api::Trace;
#[cfg(debug_assertions)]
use profiles_api::doc::ApiDoc;
use profiles_api::domain::UserProfileManager;
use profiles_api::domain::ports::UserRepository;
use profiles_api::inbound::http::configure_api;
use profiles_api::inbound::http::health::{HealthState, live, ready};
use profiles_api::outbound::hashing::Argon2PasswordHasher;
use profiles_api::outbound::memory::InMemoryUserRepository;
use profiles_api::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};

/// Choose the repository adapter and build the profile service.
///
/// With a database URL the schema is migrated and profiles go to
/// PostgreSQL; otherwise they live in process memory.
///
/// # Errors
/// Propagates migration and pool failures as [`std::io::Error`].
pub async fn build_profiles(settings: &ServerSettings) -> std::io::Result<UserProfileManager> {
    let repository: Arc<dyn UserRepository> = match settings.database_url() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .map_err(std::io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
                .await
                .map_err(std::io::Error::other)?;
            Arc::new(DieselUserRepository::new(pool))
        }
        None => {
            info!("no database configured; user profiles are kept in memory");
            Arc::new(InMemoryUserRepository::new())
        }
    };
    Ok(UserProfileManager::new(
        repository,
        Arc::new(Argon2PasswordHasher::new()),
    ))
}

fn build_app(
    health_state: web::Data<HealthState>,
    profiles: web::Data<UserProfileManager>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(profiles)
        .wrap(Trace)
        .configure(configure_api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from a prepared [`ServerConfig`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        profiles,
    } = config;
    let profiles = web::Data::new(profiles);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), profiles.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "server listening");
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test as actix_test;
    use rstest::rstest;

    fn in_memory_settings() -> ServerSettings {
        ServerSettings {
            bind_addr: "127.0.0.1:0".to_owned(),
            database_url: None,
            pool_max_size: 1,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn app_serves_probes_and_api() {
        let profiles = build_profiles(&in_memory_settings())
            .await
            .expect("in-memory profiles");
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let app = actix_test::init_service(build_app(health, web::Data::new(profiles))).await;

        let probe = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        let hello = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/hello-view/").to_request(),
        )
        .await;

        assert!(probe.status().is_success());
        assert!(hello.status().is_success());
        assert!(hello.headers().contains_key("trace-id"));
    }
}
