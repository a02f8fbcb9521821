pub mod request;
pub mod response;

use serde::Serialize;

use crate::TimeStampMs;

/// Point-in-time market quantities for one symbol, taken from the asset
/// catalog once per run. Zeroed when the venue has no data for the symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub volume_24h: f64,
    pub open_interest: f64,
    pub mark_px: f64,
    pub funding: f64,
}

/// One historical funding settlement. Wire order is not guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FundingObservation {
    pub time: TimeStampMs,
    pub rate: f64,
}

/// Summary of one symbol's funding history. Windowed fields are sums, not
/// averages: funding compounds additively across settlement periods.
///
/// Serialized field names match what the report page consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FundingStats {
    /// Rate of the most recent observed settlement. May be stale relative to
    /// now if later history pages failed to fetch.
    #[serde(rename = "rate8h")]
    pub current_rate: f64,
    #[serde(rename = "sum1d")]
    pub sum_1d: f64,
    #[serde(rename = "sum3d")]
    pub sum_3d: f64,
    #[serde(rename = "sum7d")]
    pub sum_7d: f64,
    #[serde(rename = "sum30d")]
    pub sum_30d: f64,
    pub avg: f64,
    pub max: f64,
    pub min: f64,
    pub count: usize,
}

/// The unit handed to the report renderer. Every discovered symbol gets
/// exactly one record; a failed fetch degrades to empty history and no stats
/// instead of dropping the symbol.
#[derive(Debug, Clone, Default)]
pub struct SymbolRecord {
    pub snapshot: MarketSnapshot,
    /// Trimmed for charting: ascending by time, at most the most recent
    /// [`crate::pipeline::CHART_POINTS`] observations.
    pub history: Vec<FundingObservation>,
    pub stats: Option<FundingStats>,
}
