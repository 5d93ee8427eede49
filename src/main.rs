use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use tracing::{info, instrument};
use user_accounts_api::application::user_service::UserAccountService;
use user_accounts_api::data::user_repository::InMemoryUserRepository;
use user_accounts_api::infrastructure::config::AppConfig;
use user_accounts_api::infrastructure::logging::init_logging;
use user_accounts_api::presentation::handlers::AppState;
use user_accounts_api::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use user_accounts_api::presentation::routes::configure;

fn build_cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::permissive();
    }
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

#[tokio::main]
#[instrument]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_logging(&config.log_level)?;

    info!(
        host = %config.server_host,
        port = config.server_port,
        token_ttl_secs = config.token_ttl_secs,
        "Configuration loaded"
    );

    let repository = Arc::new(InMemoryUserRepository::new());
    let user_service = UserAccountService::new(
        repository,
        config.jwt_secret.clone(),
        config.token_ttl_secs,
    );
    let state = web::Data::new(AppState {
        user_service: Arc::new(user_service),
    });

    let jwt_secret: Arc<str> = config.jwt_secret.clone().into();
    let cors_origins = config.cors_allowed_origins.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(build_cors(&cors_origins))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(configure(jwt_secret.clone()))
    });

    let bind_addr = config.bind_addr();
    let server = server.bind(&bind_addr)?;

    info!(
        address = %bind_addr,
        routes = %"GET /health, POST /users/register, POST /users/login, PUT /users, DELETE /users",
        "Starting HTTP server"
    );
    server.run().await?;
    Ok(())
}
