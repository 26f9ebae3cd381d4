use double_auction::{
    create_router, establish_connection_pool, AppState, MatchingEngine, ServerConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "double_auction=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Open the store and bring the schema up to date
    let database = match establish_connection_pool(
        &config.database_url,
        config.pool_max_size,
        config.connection_timeout(),
    ) {
        Ok(database) => database,
        Err(e) => {
            tracing::error!("DB Error: {}", e);
            std::process::exit(1);
        }
    };

    let engine: AppState = Arc::new(MatchingEngine::new(database));
    let app = create_router(engine);

    let addr = config.listen_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server running at http://{}/", addr);
    tracing::info!("   POST /create-order");
    tracing::info!("   POST /match-orders");
    tracing::info!("   GET  /get-orders");
    tracing::info!("   OpenAPI: http://{}/api-docs/openapi.json", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
