use std::collections::BTreeMap;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::catalog::fetch_universe;
use crate::config::Config;
use crate::history::fetch_history;
use crate::model::{FundingObservation, SymbolRecord};
use crate::rest::InfoApi;
use crate::stats::summarize;
use crate::{now_ms, Symbol, MILLISECONDS_PER_DAY};

/// The report charts at most this many of the most recent observations.
pub const CHART_POINTS: usize = 500;

/// Everything the report renderer consumes: one record per discovered symbol
/// plus the per-namespace symbol counts.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub records: BTreeMap<Symbol, SymbolRecord>,
    pub primary_count: usize,
    pub extended_count: usize,
}

/// Runs the whole aggregation pipeline: catalog fetch, then per-symbol
/// history retrieval and summarization, strictly sequential with a fixed
/// pause between symbols. The endpoint rate limit is shared by the whole
/// process, not scoped per symbol.
///
/// Never fails: per-symbol failures degrade that symbol's record to empty
/// history and no stats, so the output always covers the full universe.
pub async fn run(config: &Config, api: &(impl InfoApi + ?Sized)) -> PipelineOutput {
    let catalog = fetch_universe(api, config).await;
    let symbols: Vec<Symbol> = catalog.all_symbols().cloned().collect();
    let total = symbols.len();

    let end_ms = now_ms();
    let start_ms = end_ms - config.window_days * MILLISECONDS_PER_DAY;
    info!(total, days = config.window_days, "fetching funding history");

    let mut records = BTreeMap::new();
    for (i, coin) in symbols.iter().enumerate() {
        let history = fetch_history(api, &config.retry, coin, start_ms, Some(end_ms)).await;
        let stats = summarize(&history, now_ms());
        let snapshot = catalog.snapshots.get(coin).copied().unwrap_or_default();

        match &stats {
            Some(stats) => info!("[{}/{}] {}: {} observations", i + 1, total, coin, stats.count),
            None => warn!("[{}/{}] {}: no data", i + 1, total, coin),
        }

        records.insert(
            coin.clone(),
            SymbolRecord {
                snapshot,
                history: trim_for_chart(history),
                stats,
            },
        );

        if i + 1 < total {
            sleep(config.pause).await;
        }
    }

    let with_stats = records.values().filter(|r| r.stats.is_some()).count();
    info!("fetched {}/{} symbols with data", with_stats, total);

    PipelineOutput {
        records,
        primary_count: catalog.primary.len(),
        extended_count: catalog.extended.len(),
    }
}

/// Chart contract: ascending by timestamp, keeping only the most recent
/// [`CHART_POINTS`] observations.
fn trim_for_chart(mut history: Vec<FundingObservation>) -> Vec<FundingObservation> {
    history.sort_by_key(|obs| obs.time);
    if history.len() > CHART_POINTS {
        history.drain(..history.len() - CHART_POINTS);
    }
    history
}
