/// A single OHLCV bar from the quote provider.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcPoint {
    /// Bar timestamp in milliseconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}
