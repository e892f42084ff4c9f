use fctracker::{
    config::AppConfig,
    db,
    fixture::repository::PostgresFixtureRepository,
    player::repository::PostgresPlayerRepository,
    routes::create_router,
    seed::Seeder,
    shared::AppState,
    team::repository::PostgresTeamRepository,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fctracker=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting football club tracker");
    let config = AppConfig::from_env();

    // Easy to switch between implementations:
    let app_state = match &config.database_url {
        Some(database_url) => {
            let pool = db::connect(database_url, config.request_timeout)
                .await
                .expect("Failed to connect to database");
            db::ensure_schema(&pool)
                .await
                .expect("Failed to create database schema");

            AppState::new(
                Arc::new(PostgresPlayerRepository::new(pool.clone())),
                Arc::new(PostgresTeamRepository::new(pool.clone())),
                Arc::new(PostgresFixtureRepository::new(pool)),
            )
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store");
            AppState::in_memory()
        }
    };

    if config.seed_on_start {
        match Seeder::new(app_state.clone()).seed().await {
            Ok(report) => info!(team_id = %report.team_id, "Seeded on start"),
            Err(e) => warn!(error = %e, "Seeding on start failed"),
        }
    }

    let app = create_router(app_state, &config);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap();
    info!("Server running on http://localhost:{}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
