use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use funding_tracker::config::Config;
use funding_tracker::log::{setup_logs, LogLevel};
use funding_tracker::rest::InfoClient;
use funding_tracker::urls::{HyperliquidUrls, Network};
use funding_tracker::{pipeline, report};
use tracing::info;

/// Tracks funding rates across all Hyperliquid perpetual pairs and renders a
/// searchable HTML report.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Include the primary perp dex (by default only the extended-market dex
    /// is fetched)
    #[clap(long)]
    main_perp: bool,
    /// Extended-market (builder) dex to query
    #[clap(long, default_value = "xyz")]
    dex: String,
    #[clap(long, value_enum, default_value = "mainnet")]
    network: Network,
    /// Override the info endpoint URL
    #[clap(long, env = "HL_INFO_ENDPOINT")]
    endpoint: Option<String>,
    /// History window in days, counted back from now
    #[clap(long, default_value_t = 30)]
    days: i64,
    /// Pause between symbols in milliseconds, to stay under the rate limit
    #[clap(long, default_value_t = 300)]
    pause_ms: u64,
    /// Where to write the HTML report
    #[clap(short, long, value_name = "FILE", default_value = "funding_report.html")]
    output: PathBuf,
    #[clap(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

impl Cli {
    fn into_config(self) -> Config {
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| HyperliquidUrls::new(self.network).info_endpoint);
        Config {
            endpoint,
            include_main_perp: self.main_perp,
            dex: self.dex,
            window_days: self.days,
            pause: Duration::from_millis(self.pause_ms),
            output: self.output,
            ..Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    setup_logs(cli.log_level)?;
    let config = cli.into_config();

    let client = InfoClient::new(&config.endpoint)?;
    let output = pipeline::run(&config, &client).await;

    let html = report::render(&output)?;
    std::fs::write(&config.output, html)?;
    let path = config.output.canonicalize().unwrap_or(config.output.clone());
    info!("report saved to {}", path.display());

    report::log_top_movers(&output.records);
    Ok(())
}
