use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use static_assertions::assert_impl_all;
use thiserror::Error;
use tracing::debug;

use crate::model::request::InfoRequest;
use crate::model::response::{FundingTick, MetaAndAssetCtxs};
use crate::TimeStampMs;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Failure modes of one info call. Rate limiting and transport failures are
/// recoverable by retry; any other non-success status is a hard page failure.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited (429)")]
    RateLimited,
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Upstream data provider seam. The pipeline is generic over this so tests
/// can script pages and failures without a network.
#[async_trait]
pub trait InfoApi {
    async fn meta_and_asset_ctxs(&self, dex: Option<&str>) -> FetchResult<MetaAndAssetCtxs>;

    async fn funding_history(
        &self,
        coin: &str,
        start_time: TimeStampMs,
        end_time: Option<TimeStampMs>,
    ) -> FetchResult<Vec<FundingTick>>;
}

#[derive(Debug, Clone)]
pub struct InfoClient {
    session: reqwest::Client,
    endpoint: String,
}

impl InfoClient {
    pub fn new(endpoint: impl Into<String>) -> eyre::Result<Self> {
        let session = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            session,
            endpoint: endpoint.into(),
        })
    }

    async fn post<T: DeserializeOwned>(&self, req: &InfoRequest) -> FetchResult<T> {
        let response = self.session.post(&self.endpoint).json(req).send().await?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        let text = response.text().await?;
        debug!("info {}: {} bytes", status, text.len());
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(Into::into)
    }
}

#[async_trait]
impl InfoApi for InfoClient {
    async fn meta_and_asset_ctxs(&self, dex: Option<&str>) -> FetchResult<MetaAndAssetCtxs> {
        self.post(&InfoRequest::MetaAndAssetCtxs {
            dex: dex.map(Into::into),
        })
        .await
    }

    async fn funding_history(
        &self,
        coin: &str,
        start_time: TimeStampMs,
        end_time: Option<TimeStampMs>,
    ) -> FetchResult<Vec<FundingTick>> {
        self.post(&InfoRequest::FundingHistory {
            coin: coin.to_string(),
            start_time,
            end_time,
        })
        .await
    }
}

assert_impl_all!(InfoClient: Send, Sync, Unpin);
