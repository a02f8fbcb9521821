use std::path::PathBuf;
use std::time::Duration;

/// Bounds for the per-page retry loop in the history retriever.
///
/// Rate-limit backoff grows linearly with the attempt number, so the defaults
/// wait 2s, 4s, 6s before giving the page up.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub rate_limit_backoff: Duration,
    pub transport_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_backoff: Duration::from_secs(2),
            transport_backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Zero waits, for tests exercising the retry state machine.
    pub fn immediate() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_backoff: Duration::ZERO,
            transport_backoff: Duration::ZERO,
        }
    }
}

/// Immutable run configuration, resolved once from the CLI and threaded
/// through the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Info endpoint URL, e.g. `https://api.hyperliquid.xyz/info`.
    pub endpoint: String,
    /// Also fetch the primary perp dex universe. The extended-market dex is
    /// always fetched.
    pub include_main_perp: bool,
    /// Name of the extended-market (builder) dex.
    pub dex: String,
    /// History window, counted back from now.
    pub window_days: i64,
    /// Pause between symbols to stay under the shared endpoint rate limit.
    pub pause: Duration,
    pub retry: RetryPolicy,
    /// Where the HTML report is written.
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "https://api.hyperliquid.xyz/info".to_string(),
            include_main_perp: false,
            dex: "xyz".to_string(),
            window_days: 30,
            pause: Duration::from_millis(300),
            retry: RetryPolicy::default(),
            output: PathBuf::from("funding_report.html"),
        }
    }
}
