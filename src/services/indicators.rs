//! Technical indicator math and pt-BR display formatting.
//!
//! All functions are pure; degenerate inputs fall back to zero rather
//! than erroring, so a thin upstream series never poisons a response.

use crate::types::OhlcPoint;

/// Relative Strength Index over the last `period` price deltas.
///
/// Uses a simple rolling mean of gains and losses. Edge policy:
/// - fewer than `period` deltas: 0.0
/// - zero average loss: 100.0 if the average gain is positive, else 0.0
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return 0.0;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let window = &deltas[deltas.len() - period..];

    let avg_gain: f64 = window.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
    let avg_loss: f64 = window.iter().filter(|d| **d < 0.0).map(|d| -d).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { 100.0 } else { 0.0 };
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Intraday support and resistance: (lowest low, highest high).
pub fn support_resistance(candles: &[OhlcPoint]) -> (f64, f64) {
    if candles.is_empty() {
        return (0.0, 0.0);
    }

    let support = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let resistance = candles
        .iter()
        .map(|c| c.high)
        .fold(f64::NEG_INFINITY, f64::max);

    (support, resistance)
}

/// Percent change from the first open to the last close of the series.
pub fn intraday_variation(candles: &[OhlcPoint]) -> f64 {
    let (Some(first), Some(last)) = (candles.first(), candles.last()) else {
        return 0.0;
    };
    if first.open == 0.0 {
        return 0.0;
    }
    (last.close - first.open) / first.open * 100.0
}

/// Volatility as the population standard deviation of successive
/// percent returns, times 100. Fewer than two closes yields 0.
pub fn volatility(closes: &[f64]) -> f64 {
    let returns: Vec<f64> = closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    if returns.is_empty() {
        return 0.0;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    variance.sqrt() * 100.0
}

/// Volume-weighted average close. Zero total volume yields 0.
pub fn vwap(candles: &[OhlcPoint]) -> f64 {
    let total_volume: f64 = candles.iter().map(|c| c.volume).sum();
    if total_volume <= 0.0 {
        return 0.0;
    }
    candles.iter().map(|c| c.close * c.volume).sum::<f64>() / total_volume
}

/// Current volume with a signed percent comparison against the average,
/// e.g. "5,0M (+29% vs média)". Falls back to "(sem média)" when no
/// average is available.
pub fn volume_status(current: f64, average: f64) -> String {
    if average > 0.0 {
        format!(
            "{} ({:+.0}% vs média)",
            format_volume(current),
            (current - average) / average * 100.0
        )
    } else {
        format!("{} (sem média)", format_volume(current))
    }
}

/// Human-readable volume with a comma decimal: "1,5M", "150,0K",
/// or a dot-grouped integer below one thousand.
pub fn format_volume(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0).replace('.', ",")
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0).replace('.', ",")
    } else {
        group_digits(value.round() as i64)
    }
}

/// Price in reais with a comma decimal, e.g. "R$ 34,12".
pub fn format_brl(value: f64) -> String {
    format!("R$ {:.2}", value).replace('.', ",")
}

/// pt-BR grouped number with two decimals, e.g. "134.567,89".
pub fn format_grouped(value: f64) -> String {
    let negative = value < 0.0;
    let abs = value.abs();
    let mut whole = abs.trunc() as i64;
    let mut cents = ((abs - whole as f64) * 100.0).round() as i64;
    if cents >= 100 {
        whole += 1;
        cents = 0;
    }

    format!(
        "{}{},{:02}",
        if negative { "-" } else { "" },
        group_digits(whole),
        cents
    )
}

/// Signed percentage with the given number of decimals, e.g. "+0.45%".
pub fn signed_pct(value: f64, decimals: usize) -> String {
    format!("{:+.*}%", decimals, value)
}

/// Group an integer's digits with dots: 134567 -> "134.567".
fn group_digits(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
