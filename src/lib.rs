pub mod catalog;
pub mod config;
pub mod history;
pub mod log;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod rest;
pub mod stats;
pub mod urls;

/// Opaque instrument identifier. Extended-market (builder dex) symbols come
/// back from the venue already namespaced, e.g. `xyz:TSLA`.
pub type Symbol = String;
pub type TimeStampMs = i64;

pub const MILLISECONDS_PER_SECOND: i64 = 1_000;
pub const MILLISECONDS_PER_HOUR: i64 = 60 * 60 * MILLISECONDS_PER_SECOND;
pub const MILLISECONDS_PER_DAY: i64 = 24 * MILLISECONDS_PER_HOUR;

pub fn now_ms() -> TimeStampMs {
    chrono::Utc::now().timestamp_millis()
}
