//! Radar - market index quote, indicator, and commentary server.
//!
//! Fetches near-real-time index quotes from Yahoo Finance, computes
//! technical indicators (RSI, support/resistance, volatility,
//! volume-vs-average), aggregates them into an index overview with a
//! weighted trend read for the mini-index future, and serves the
//! results plus LLM-generated market commentary over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use config::Config;
use services::MarketDataService;
use sources::OpenRouterClient;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub market: Arc<MarketDataService>,
    /// Present only when an OpenRouter API key is configured.
    pub openrouter: Option<Arc<OpenRouterClient>>,
}
