//! Core services: quote caching, indicator math, aggregation, trend
//! classification and prompt templating.

pub mod indicators;
pub mod market;
pub mod prompt;
pub mod quote_cache;
pub mod trend;

pub use market::MarketDataService;
pub use quote_cache::QuoteCache;
