// src/main.rs

use std::{net::SocketAddr, sync::Arc, time::Duration};

use scout_backend::{
    config::Config,
    routes,
    state::AppState,
    store::{DynStore, MemoryStore, PgStore},
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if let Err(e) = run(config).await {
        tracing::error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let store: DynStore = match &config.database_url {
        Some(url) => {
            let pool = connect_with_retry(url).await?;
            tracing::info!("Database connected...");

            tracing::info!("Running migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Migrations applied successfully.");

            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using the in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState { store, config };
    let app = routes::create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Storage errors at startup are reported, not retried forever.
async fn connect_with_retry(url: &str) -> Result<PgPool, sqlx::Error> {
    let mut retry_count = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    tracing::error!("Failed to connect to database after 5 retries");
                    return Err(e);
                }
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {})",
                    retry_count
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}
