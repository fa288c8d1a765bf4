use radar::config::Config;
use radar::services::{MarketDataService, QuoteCache};
use radar::sources::OpenRouterClient;
use radar::{api, AppState};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "radar=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting radar server on {}:{}", config.host, config.port);

    // Quote cache and market data service
    let cache = Arc::new(QuoteCache::new(Duration::from_secs(
        config.quote_cache_ttl_secs,
    )));
    let market = Arc::new(MarketDataService::new(cache));

    // OpenRouter client for market commentary (optional)
    let openrouter = config.openrouter_api_key.as_ref().map(|api_key| {
        info!("OpenRouter API key found, enabling market commentary");
        Arc::new(OpenRouterClient::new(
            api_key.clone(),
            config.openrouter_base_url.clone(),
            config.openrouter_referer.clone(),
            config.openrouter_model.clone(),
        ))
    });

    // Create application state
    let state = AppState {
        config: config.clone(),
        market,
        openrouter,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = api::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Radar server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
