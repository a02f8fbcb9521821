use serde::Serialize;

use crate::TimeStampMs;

/// Request bodies for the info endpoint, dispatched on the `type` field.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum InfoRequest {
    #[serde(rename_all = "camelCase")]
    MetaAndAssetCtxs {
        #[serde(skip_serializing_if = "Option::is_none")]
        dex: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    FundingHistory {
        coin: String,
        start_time: TimeStampMs,
        #[serde(skip_serializing_if = "Option::is_none")]
        end_time: Option<TimeStampMs>,
    },
}
