use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wallet_api::config::{Config, LogFormat};
use wallet_api::handlers::AppState;
use wallet_api::repository::WalletRepository;
use wallet_api::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing (structured logging) before anything can fail
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wallet_api=debug,tower_http=debug".into());
    match LogFormat::from_env() {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    tracing::info!("Starting Wallet API");

    let config = Config::from_env().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        e
    })?;

    tracing::info!("Database: {}", config.redacted_database_url());

    // Eager connect: refuse to start without a reachable database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    let state = AppState::new(WalletRepository::new(pool));
    let app = routes::app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Wallet API listening on {}", addr);
    tracing::info!("  GET    /api/v1/wallets                 - List wallets");
    tracing::info!("  GET    /api/v1/users/:id/wallets       - List a user's wallets");
    tracing::info!("  POST   /api/v1/wallets                 - Create wallet");
    tracing::info!("  PUT    /api/v1/wallets                 - Update wallet balance");
    tracing::info!("  DELETE /api/v1/users/:id/wallets       - Delete a user's wallets");
    tracing::info!("  GET    /api-docs/openapi.json          - OpenAPI document");
    tracing::info!("  GET    /health                         - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}
