use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::model::response::FundingTick;
use crate::model::FundingObservation;
use crate::rest::{FetchError, InfoApi};
use crate::TimeStampMs;

/// The venue caps funding history pages at 500 rows; a shorter page means the
/// series is exhausted.
pub const PAGE_LIMIT: usize = 500;
/// Hard cap on pages per symbol to bound worst-case latency.
pub const MAX_PAGES: usize = 20;

/// Result of a bounded retry: either the payload, or a deliberate give-up
/// that lets the caller keep whatever it accumulated so far.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    Success(T),
    Exhausted,
}

async fn fetch_page<A: InfoApi + ?Sized>(
    api: &A,
    policy: &RetryPolicy,
    coin: &str,
    cursor: TimeStampMs,
    end_ms: Option<TimeStampMs>,
) -> RetryOutcome<Vec<FundingTick>> {
    for attempt in 1..=policy.max_attempts {
        match api.funding_history(coin, cursor, end_ms).await {
            Ok(page) => return RetryOutcome::Success(page),
            Err(FetchError::RateLimited) => {
                debug!(coin, attempt, "rate limited, backing off");
                if attempt < policy.max_attempts {
                    sleep(policy.rate_limit_backoff * attempt).await;
                }
            }
            Err(err @ FetchError::Status { .. }) => {
                // hard page failure, not worth retrying
                warn!(coin, "funding history page failed: {err}");
                return RetryOutcome::Exhausted;
            }
            Err(err) => {
                warn!(coin, attempt, "transport failure fetching funding history: {err}");
                if attempt < policy.max_attempts {
                    sleep(policy.transport_backoff).await;
                }
            }
        }
    }
    RetryOutcome::Exhausted
}

/// Fetches the complete funding history for one symbol over `[start_ms,
/// end_ms]`, following pagination cursors and recovering from rate limits.
///
/// Best-effort by contract: rate-limit exhaustion, hard page failures and the
/// page cap all return whatever was accumulated instead of erroring. Partial
/// data is preferable to aborting the whole run.
pub async fn fetch_history<A: InfoApi + ?Sized>(
    api: &A,
    policy: &RetryPolicy,
    coin: &str,
    start_ms: TimeStampMs,
    end_ms: Option<TimeStampMs>,
) -> Vec<FundingObservation> {
    let mut all = Vec::new();
    let mut cursor = start_ms;

    for _page in 0..MAX_PAGES {
        let ticks = match fetch_page(api, policy, coin, cursor, end_ms).await {
            RetryOutcome::Success(ticks) => ticks,
            RetryOutcome::Exhausted => return all,
        };
        let page_len = ticks.len();
        let newest = ticks.iter().map(|tick| tick.time).max();
        all.extend(ticks.into_iter().map(|tick| FundingObservation {
            time: tick.time,
            rate: tick.funding_rate,
        }));
        if page_len < PAGE_LIMIT {
            return all;
        }
        match newest {
            Some(time) => cursor = time + 1,
            None => return all,
        }
    }
    debug!(coin, pages = MAX_PAGES, "funding history page cap reached");
    all
}
