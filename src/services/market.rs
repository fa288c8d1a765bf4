//! Market data aggregation: index overview, mini-index read, and
//! global index quotes, assembled from cached Yahoo Finance history.

use crate::error::{AppError, Result};
use crate::services::indicators::{
    format_brl, format_grouped, format_volume, intraday_variation, rsi, signed_pct,
    support_resistance, volatility, volume_status, vwap,
};
use crate::services::quote_cache::QuoteCache;
use crate::services::trend::classify_trend;
use crate::sources::YahooFinanceClient;
use crate::types::{
    GlobalIndexEntry, GlobalIndexQuote, IndexOverview, MiniIndexData, OhlcPoint, StockSnapshot,
    Trend,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The tracked equity index.
const INDEX_SYMBOL: &str = "^BVSP";

/// US-listed Brazil ETF used as the tradable proxy for the mini-index
/// future.
const MINI_INDEX_PROXY: &str = "EWZ";

/// Heaviest index constituents: (ticker, name, sector, index weight %).
const INDEX_CONSTITUENTS: [(&str, &str, &str, f64); 7] = [
    ("PETR4.SA", "Petrobras", "Energia", 8.2),
    ("VALE3.SA", "Vale", "Mineração", 7.1),
    ("ITUB4.SA", "Itaú", "Financeiro", 6.8),
    ("BBDC4.SA", "Bradesco", "Financeiro", 3.5),
    ("BBAS3.SA", "Banco do Brasil", "Financeiro", 2.9),
    ("B3SA3.SA", "B3", "Financeiro", 2.7),
    ("ABEV3.SA", "Ambev", "Consumo", 2.1),
];

/// Global tickers served by /api/market/indices: (key, symbol, name).
const GLOBAL_TICKERS: [(&str, &str, &str); 6] = [
    ("IBOVESPA", "^BVSP", "Ibovespa"),
    ("SP500", "^GSPC", "S&P 500"),
    ("DOLAR", "USDBRL=X", "Dólar Comercial"),
    ("NASDAQ", "^IXIC", "Nasdaq"),
    ("EURO", "EURBRL=X", "Euro"),
    ("NIKKEI", "^N225", "Nikkei 225"),
];

/// RSI period used on 5-minute intraday series.
const INTRADAY_RSI_PERIOD: usize = 5;

/// Fetches quote history through the TTL cache and assembles the
/// aggregated market views.
pub struct MarketDataService {
    yahoo: YahooFinanceClient,
    cache: Arc<QuoteCache>,
}

impl MarketDataService {
    pub fn new(cache: Arc<QuoteCache>) -> Self {
        Self {
            yahoo: YahooFinanceClient::new(),
            cache,
        }
    }

    /// Cache-through history fetch.
    async fn history(&self, symbol: &str, range: &str, interval: &str) -> Result<Vec<OhlcPoint>> {
        if let Some(series) = self.cache.get(symbol, range, interval) {
            debug!("Cache hit for {} {}/{}", symbol, range, interval);
            return Ok(series);
        }

        info!("Fetching {} {}/{} from upstream", symbol, range, interval);
        let series = self
            .yahoo
            .get_history(symbol, range, interval)
            .await
            .map_err(AppError::ExternalApi)?;
        self.cache.insert(symbol, range, interval, series.clone());
        Ok(series)
    }

    /// Build the indicator snapshot for one index constituent. Upstream
    /// failures degrade to a zeroed snapshot so one bad ticker never
    /// fails the whole overview.
    async fn constituent_snapshot(
        &self,
        ticker: &str,
        name: &str,
        sector: &str,
        weight: f64,
    ) -> StockSnapshot {
        let display_ticker = ticker.trim_end_matches(".SA");

        let intraday = match self.history(ticker, "1d", "5m").await {
            Ok(series) => series,
            Err(e) => {
                warn!("Failed to fetch intraday data for {}: {}", ticker, e);
                return StockSnapshot::unavailable(display_ticker, name, sector, weight);
            }
        };

        if intraday.is_empty() {
            warn!("Empty intraday series for {}", ticker);
            return StockSnapshot::unavailable(display_ticker, name, sector, weight);
        }

        let hourly = match self.history(ticker, "5d", "1h").await {
            Ok(series) => series,
            Err(e) => {
                warn!("Failed to fetch hourly history for {}: {}", ticker, e);
                Vec::new()
            }
        };

        let closes: Vec<f64> = intraday.iter().map(|p| p.close).collect();
        let (support, resistance) = support_resistance(&intraday);
        let rsi_value = rsi(&closes, INTRADAY_RSI_PERIOD);
        let variation_pct = intraday_variation(&intraday);
        let last_close = closes.last().copied().unwrap_or(0.0);

        let current_volume: f64 = intraday.iter().map(|p| p.volume).sum();
        let average_volume = if hourly.is_empty() {
            0.0
        } else {
            hourly.iter().map(|p| p.volume).sum::<f64>() / hourly.len() as f64
        };

        StockSnapshot {
            ticker: display_ticker.to_string(),
            name: name.to_string(),
            sector: sector.to_string(),
            price: format_brl(last_close),
            variation: signed_pct(variation_pct, 1),
            variation_pct,
            volume: volume_status(current_volume, average_volume),
            index_weight: weight,
            support: format_brl(support),
            resistance: format_brl(resistance),
            rsi: rsi_value,
        }
    }

    /// Assemble the full index overview: daily variation, constituent
    /// snapshots, sector leaders, intraday volatility and the
    /// mini-index trend read.
    pub async fn index_overview(&self) -> Result<IndexOverview> {
        let daily = self.history(INDEX_SYMBOL, "1d", "1d").await?;
        let (Some(first), Some(last)) = (daily.first(), daily.last()) else {
            return Err(AppError::NotFound(format!(
                "No index data for {}",
                INDEX_SYMBOL
            )));
        };

        let current_value = last.close;
        let index_variation = if first.open != 0.0 {
            (last.close - first.open) / first.open * 100.0
        } else {
            0.0
        };

        let mut top_stocks = Vec::with_capacity(INDEX_CONSTITUENTS.len());
        for (ticker, name, sector, weight) in INDEX_CONSTITUENTS {
            top_stocks
                .push(self.constituent_snapshot(ticker, name, sector, weight).await);
        }

        let (leading_sector, lagging_sector) = sector_extremes(&top_stocks);

        let intraday = match self.history(INDEX_SYMBOL, "1d", "5m").await {
            Ok(series) => series,
            Err(e) => {
                warn!("Failed to fetch intraday index data: {}", e);
                Vec::new()
            }
        };
        let intraday_closes: Vec<f64> = intraday.iter().map(|p| p.close).collect();
        let index_volatility = volatility(&intraday_closes);

        let futures_trend = classify_trend(&top_stocks);

        info!(
            "Index overview assembled: variation={:.2}%, volatility={:.2}%, trend={}",
            index_variation, index_volatility, futures_trend
        );

        Ok(IndexOverview {
            index: "IBOV".to_string(),
            current_value: format_grouped(current_value),
            variation: signed_pct(index_variation, 2),
            volatility: format!("{:.2}%", index_volatility),
            top_stocks,
            leading_sector,
            lagging_sector,
            futures_trend,
            timestamp: chrono::Utc::now().timestamp(),
        })
    }

    /// Mini-index read off the ETF proxy: VWAP, above/below-VWAP trend
    /// and last-bar volume.
    pub async fn mini_index(&self, interval: &str) -> Result<MiniIndexData> {
        let series = self.history(MINI_INDEX_PROXY, "1d", interval).await?;
        let Some(last) = series.last() else {
            return Err(AppError::NotFound(format!(
                "No data for {}",
                MINI_INDEX_PROXY
            )));
        };

        let vwap_value = vwap(&series);
        let trend = if last.close > vwap_value {
            Trend::Alta
        } else {
            Trend::Baixa
        };

        Ok(MiniIndexData {
            trend,
            vwap: format_brl(vwap_value),
            volume: format_volume(last.volume),
        })
    }

    /// Quotes for the tracked global indices. Per-ticker failures are
    /// reported inline without failing the map.
    pub async fn global_indices(&self) -> BTreeMap<String, GlobalIndexEntry> {
        let mut results = BTreeMap::new();

        for (key, symbol, name) in GLOBAL_TICKERS {
            let entry = match self.history(symbol, "1d", "1d").await {
                Ok(series) if !series.is_empty() => {
                    let first = &series[0];
                    let last = &series[series.len() - 1];
                    let variation = if first.open != 0.0 {
                        (last.close - first.open) / first.open * 100.0
                    } else {
                        0.0
                    };
                    GlobalIndexEntry::Quote(GlobalIndexQuote {
                        name: name.to_string(),
                        ticker: symbol.to_string(),
                        current_value: (last.close * 100.0).round() / 100.0,
                        variation: signed_pct(variation, 2),
                    })
                }
                Ok(_) => GlobalIndexEntry::Unavailable {
                    error: "Sem dados disponíveis".to_string(),
                },
                Err(e) => {
                    warn!("Failed to fetch {}: {}", symbol, e);
                    GlobalIndexEntry::Unavailable {
                        error: e.to_string(),
                    }
                }
            };
            results.insert(key.to_string(), entry);
        }

        results
    }
}

/// Sectors with the highest and lowest average constituent variation.
/// Returns ("―", "―") when there are no snapshots.
fn sector_extremes(stocks: &[StockSnapshot]) -> (String, String) {
    let mut by_sector: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for stock in stocks {
        by_sector
            .entry(stock.sector.as_str())
            .or_default()
            .push(stock.variation_pct);
    }

    let means: Vec<(&str, f64)> = by_sector
        .into_iter()
        .map(|(sector, variations)| {
            let mean = variations.iter().sum::<f64>() / variations.len() as f64;
            (sector, mean)
        })
        .collect();

    let leading = means
        .iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(sector, _)| sector.to_string())
        .unwrap_or_else(|| "―".to_string());
    let lagging = means
        .iter()
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(sector, _)| sector.to_string())
        .unwrap_or_else(|| "―".to_string());

    (leading, lagging)
}
