use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidtube_api::config::Config;
use vidtube_api::db::{create_pool, run_migrations};
use vidtube_api::routes::configure_routes;
use vidtube_api::security::jwt;
use vidtube_api::services::media_store::MediaStore;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("config: {e}")))?;

    tracing::info!("Starting vidtube-api v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    jwt::initialize_keys(&config.jwt);

    let db_pool = create_pool(&config.database.url, config.database.max_connections)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, format!("database: {e}")))?;
    tracing::info!(
        "Database pool created with {} max connections",
        config.database.max_connections
    );

    let run_migrations_env = std::env::var("RUN_MIGRATIONS").unwrap_or_else(|_| "true".into());
    if run_migrations_env != "false" {
        run_migrations(&db_pool)
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("migrations: {e}")))?;
        tracing::info!("Database migrations completed");
    }

    let media_store = MediaStore::new(&config.s3)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("object store: {e}")))?;
    tracing::info!("Object store client initialized");

    let host = config.app.host.clone();
    let port = config.app.port;
    let server_config = config.clone();

    tracing::info!("Listening on {}:{}", host, port);

    HttpServer::new(move || {
        let mut cors = Cors::default();
        let mut any_origin = false;
        for origin in server_config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
                any_origin = true;
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .max_age(server_config.cors.max_age as usize);
        // Cookie auth needs credentials, and browsers reject them with "*".
        if !any_origin {
            cors = cors.supports_credentials();
        }

        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .app_data(web::Data::new(media_store.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(configure_routes)
    })
    .bind((host, port))?
    .run()
    .await
}
