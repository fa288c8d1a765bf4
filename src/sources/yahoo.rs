//! Yahoo Finance API client for index and stock quote history.
//!
//! Uses the unofficial Yahoo Finance v8 chart API (no API key required).

use crate::types::OhlcPoint;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct YahooResult {
    meta: YahooMeta,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct YahooMeta {
    symbol: String,
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Yahoo Finance API client.
///
/// Handles index symbols (`^BVSP`), B3 tickers (`PETR4.SA`), and
/// currency pairs (`USDBRL=X`) alike; symbols are passed through
/// verbatim and percent-encoded by the URL layer.
pub struct YahooFinanceClient {
    client: Client,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch OHLCV history for a symbol.
    ///
    /// Arguments:
    /// - symbol: ticker symbol (e.g. "^BVSP", "PETR4.SA", "EWZ")
    /// - range: time range ("1d", "5d", "1mo", ...)
    /// - interval: bar interval ("1m", "5m", "15m", "1h", "1d", ...)
    pub async fn get_history(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<Vec<OhlcPoint>, String> {
        let url = format!(
            "https://query1.finance.yahoo.com/v8/finance/chart/{}?range={}&interval={}&includePrePost=false",
            symbol, range, interval
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("API error: {}", response.status()));
        }

        let data: YahooChartResponse = response
            .json()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;

        if let Some(error) = data.chart.error {
            return Err(format!(
                "Yahoo API error: {} - {}",
                error.code, error.description
            ));
        }

        let results = data
            .chart
            .result
            .ok_or_else(|| "No results in response".to_string())?;

        let result = results
            .into_iter()
            .next()
            .ok_or_else(|| "Empty results array".to_string())?;

        let timestamps = result
            .timestamp
            .ok_or_else(|| "No timestamps in response".to_string())?;

        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| "No quote data in response".to_string())?;

        let opens = quote.open.unwrap_or_default();
        let highs = quote.high.unwrap_or_default();
        let lows = quote.low.unwrap_or_default();
        let closes = quote.close.unwrap_or_default();
        let volumes = quote.volume.unwrap_or_default();

        let mut points = Vec::new();
        for (i, &timestamp) in timestamps.iter().enumerate() {
            let open = opens.get(i).and_then(|v| *v).unwrap_or(0.0);
            let high = highs.get(i).and_then(|v| *v).unwrap_or(0.0);
            let low = lows.get(i).and_then(|v| *v).unwrap_or(0.0);
            let close = closes.get(i).and_then(|v| *v).unwrap_or(0.0);
            let volume = volumes.get(i).and_then(|v| *v).unwrap_or(0) as f64;

            // Skip invalid data points
            if close <= 0.0 {
                continue;
            }

            points.push(OhlcPoint {
                time: timestamp * 1000, // Convert to milliseconds
                open,
                high,
                low,
                close,
                volume,
            });
        }

        Ok(points)
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}
