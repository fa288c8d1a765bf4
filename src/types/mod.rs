pub mod market;
pub mod quote;

pub use market::{
    AnalysisRequest, AnalysisResponse, GlobalIndexEntry, GlobalIndexQuote, IndexOverview,
    MiniIndexData, StockSnapshot, Trend,
};
pub use quote::OhlcPoint;
