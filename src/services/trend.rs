//! Weighted-impact trend classification for the mini-index future.

use crate::types::{StockSnapshot, Trend};
use tracing::info;

/// Sum of per-stock variation weighted by index weight, in index points
/// of percent: Σ variation_pct × index_weight / 100.
pub fn weighted_impact(stocks: &[StockSnapshot]) -> f64 {
    stocks
        .iter()
        .map(|s| s.variation_pct * s.index_weight / 100.0)
        .sum()
}

/// Mean RSI across the snapshots. Empty input yields 0.
pub fn average_rsi(stocks: &[StockSnapshot]) -> f64 {
    if stocks.is_empty() {
        return 0.0;
    }
    stocks.iter().map(|s| s.rsi).sum::<f64>() / stocks.len() as f64
}

/// Classify the mini-index trend from constituent snapshots.
///
/// - impact > 0.5 with average RSI below 70 (not overbought): alta
/// - impact < -0.5 with average RSI above 30 (not oversold): baixa
/// - anything else: lateral
pub fn classify_trend(stocks: &[StockSnapshot]) -> Trend {
    let impact = weighted_impact(stocks);
    let rsi_mean = average_rsi(stocks);

    info!(
        "Trend inputs: weighted_impact={:.2}, average_rsi={:.2}",
        impact, rsi_mean
    );

    if impact > 0.5 && rsi_mean < 70.0 {
        Trend::Alta
    } else if impact < -0.5 && rsi_mean > 30.0 {
        Trend::Baixa
    } else {
        Trend::Lateral
    }
}
