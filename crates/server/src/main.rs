mod auth;
mod config;
mod doc;
mod dtos;
mod error;
mod extract;
mod routes;
mod utils;

use crate::{
    auth::{ResourceServerError, envelope_auth_rejection, resource_server},
    config::{Config, ConfigError},
    doc::ApiDoc,
    routes::{api_router, health::health},
    utils::shutdown::shutdown_signal,
};
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware::map_response,
    routing::get,
};
use database::db::create_connection;
use log::{error, info};
use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, DbErr};
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error(transparent)]
    Auth(#[from] ResourceServerError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;

    let db = create_connection(&config.database_url).await?;
    Migrator::up(&db, None).await?;
    info!("Database migrations applied");

    let oauth2_resource_server = resource_server(&config).await?;

    let api = api_router().layer(
        ServiceBuilder::new()
            .layer(map_response(envelope_auth_rejection))
            .layer(oauth2_resource_server.into_layer()),
    );

    let app = mount(Router::new(), &config.base_path, api)
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&config))
                .layer(CompressionLayer::new()),
        )
        .with_state(AppState { db });

    let listener = tokio::net::TcpListener::bind(config.bind_address.as_str()).await?;
    info!("Running axum on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Nests `api` under `base_path`, or merges it at the root when the path is
/// empty
fn mount(
    router: Router<AppState>,
    base_path: &str,
    api: Router<AppState>,
) -> Router<AppState> {
    if base_path.is_empty() {
        router.merge(api)
    } else {
        router.nest(base_path, api)
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(config.cors_origins.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}
