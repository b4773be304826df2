use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockpit::config::Config;
use stockpit::services::{AuthService, QuoteCache, SettlementEngine, SqliteStore};
use stockpit::{api, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockpit=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting stockpit server on {}", config.bind_addr());

    if config.internal_auth.require_auth && config.internal_auth.shared_key.is_empty() {
        warn!("INTERNAL_SHARED_KEY is not set; internal endpoints will reject every call");
    }

    // Wire up services
    let store = Arc::new(SqliteStore::new(&config.database_path)?);
    let quotes = Arc::new(QuoteCache::new(config.quote_stale_ms));
    let auth = AuthService::new(store.clone(), config.session_ttl_ms());
    let settlement = Arc::new(SettlementEngine::new(store.clone(), quotes.clone()));

    let state = AppState {
        config: config.clone(),
        store,
        quotes,
        auth,
        settlement,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Stockpit server listening on {}", config.bind_addr());

    axum::serve(listener, app).await?;

    Ok(())
}
