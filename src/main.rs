use tracing_subscriber::EnvFilter;

use jobboard_api::{app, config::AppConfig, database, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting job board API in {:?} mode", config.environment);

    let pool = database::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to {}: {}", config.database.url, e));

    let port = config.server.port;
    let state = AppState { pool, config };
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Job board API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
