use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction read for the mini-index future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Alta,
    Baixa,
    Lateral,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Alta => "alta",
            Trend::Baixa => "baixa",
            Trend::Lateral => "lateral",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-constituent snapshot with indicators and display-formatted figures.
///
/// Prices and volumes carry pt-BR formatting (comma decimals); the raw
/// numeric variation and RSI are kept alongside so aggregation never has
/// to parse display strings back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub ticker: String,
    pub name: String,
    pub sector: String,
    /// Last traded price, e.g. "R$ 34,12".
    pub price: String,
    /// Intraday variation for display, e.g. "+1.2%".
    pub variation: String,
    /// Intraday variation in percent.
    pub variation_pct: f64,
    /// Current volume vs. the 5-day average, e.g. "5,0M (+29% vs média)".
    pub volume: String,
    /// Weight of the stock in the index, in percent.
    pub index_weight: f64,
    /// Intraday support level, e.g. "R$ 33,90".
    pub support: String,
    /// Intraday resistance level, e.g. "R$ 34,55".
    pub resistance: String,
    /// Short-period RSI over the intraday series.
    pub rsi: f64,
}

impl StockSnapshot {
    /// Zeroed placeholder used when upstream data for a constituent is missing.
    pub fn unavailable(ticker: &str, name: &str, sector: &str, index_weight: f64) -> Self {
        Self {
            ticker: ticker.to_string(),
            name: name.to_string(),
            sector: sector.to_string(),
            price: "R$ 0,00".to_string(),
            variation: "+0.0%".to_string(),
            variation_pct: 0.0,
            volume: "0 (sem média)".to_string(),
            index_weight,
            support: "R$ 0,00".to_string(),
            resistance: "R$ 0,00".to_string(),
            rsi: 0.0,
        }
    }
}

/// Aggregated index overview served by GET /api/market/ibov.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexOverview {
    pub index: String,
    /// Grouped index level, e.g. "134.567,89".
    pub current_value: String,
    /// Daily variation, e.g. "+0.45%".
    pub variation: String,
    /// Intraday volatility, e.g. "0.32%".
    pub volatility: String,
    pub top_stocks: Vec<StockSnapshot>,
    /// Sector with the highest average variation ("―" when no data).
    pub leading_sector: String,
    /// Sector with the lowest average variation ("―" when no data).
    pub lagging_sector: String,
    /// Weighted-impact trend read for the mini-index future.
    pub futures_trend: Trend,
    /// Unix timestamp of assembly, in seconds.
    pub timestamp: i64,
}

/// Request body for POST /api/market/analysis.
///
/// Mirrors the figures of [`IndexOverview`]; all fields are required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub variation: String,
    pub current_value: String,
    pub volatility: String,
    pub top_stocks: Vec<StockSnapshot>,
    pub leading_sector: String,
    pub lagging_sector: String,
}

/// Response body for POST /api/market/analysis.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

/// Mini-index future data served by GET /api/market/win.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniIndexData {
    /// Above/below-VWAP direction of the last bar.
    pub trend: Trend,
    /// Volume-weighted average price, e.g. "R$ 31,42".
    pub vwap: String,
    /// Volume of the latest bar, e.g. "1,3M".
    pub volume: String,
}

/// Quote for one of the tracked global indices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalIndexQuote {
    pub name: String,
    pub ticker: String,
    /// Last close, rounded to cents.
    pub current_value: f64,
    /// Variation vs. the session open, e.g. "-0.12%".
    pub variation: String,
}

/// Entry of the global indices map. A failed ticker degrades to an
/// error entry without failing the whole response.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GlobalIndexEntry {
    Quote(GlobalIndexQuote),
    Unavailable { error: String },
}
