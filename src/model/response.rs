use serde::Deserialize;
use serde_with::serde_as;
use serde_with::DisplayFromStr;
use serde_with::PickFirst;

use crate::TimeStampMs;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Universe {
    pub universe: Vec<Asset>,
}

/// Per-asset market context, positionally zipped with [`Universe::universe`].
/// The venue encodes numbers as strings; missing or null fields become 0.
#[serde_as]
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetCtx {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub funding: f64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub open_interest: f64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub day_ntl_vlm: f64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub mark_px: f64,
}

/// Response to `metaAndAssetCtxs`: a 2-element array of metadata and contexts.
#[derive(Deserialize, Debug)]
pub struct MetaAndAssetCtxs(pub Universe, pub Vec<AssetCtx>);

/// One row of a `fundingHistory` page. Pages are capped at 500 rows.
#[serde_as]
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FundingTick {
    pub time: TimeStampMs,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub funding_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meta_and_asset_ctxs() {
        let data = r#"
[
  {
    "universe": [
      {
        "szDecimals": 5,
        "name": "BTC",
        "maxLeverage": 50,
        "onlyIsolated": false
      },
      {
        "szDecimals": 4,
        "name": "ETH",
        "maxLeverage": 50,
        "onlyIsolated": false
      }
    ]
  },
  [
    {
      "funding": "0.0000125",
      "openInterest": "3112844.0",
      "prevDayPx": "0.0115",
      "dayNtlVlm": "103.3528",
      "premium": "0.0",
      "oraclePx": "0.010437",
      "markPx": "0.0106",
      "midPx": "0.010754",
      "impactPxs": [
        "0.010277",
        "0.011494"
      ]
    },
    {
      "funding": "-0.0000534",
      "openInterest": "55468.6",
      "prevDayPx": "8.9673",
      "dayNtlVlm": "131104.28354",
      "premium": null,
      "oraclePx": "8.868",
      "markPx": "8.8565",
      "midPx": null,
      "impactPxs": null
    }
  ]
]"#;
        let MetaAndAssetCtxs(meta, ctxs) = serde_json::from_str(data).unwrap();
        assert_eq!(meta.universe.len(), 2);
        assert_eq!(meta.universe[0].name, "BTC");
        assert_eq!(ctxs.len(), 2);
        assert_eq!(ctxs[0].funding, 0.0000125);
        assert_eq!(ctxs[1].open_interest, 55468.6);
        assert_eq!(ctxs[1].mark_px, 8.8565);
    }

    #[test]
    fn test_parse_funding_ticks_string_or_number() {
        let data = r#"
[
  { "coin": "BTC", "fundingRate": "0.0000125", "premium": "0.0", "time": 1700000000000 },
  { "coin": "BTC", "fundingRate": -0.0002, "time": 1700028800000 }
]"#;
        let ticks: Vec<FundingTick> = serde_json::from_str(data).unwrap();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].funding_rate, 0.0000125);
        assert_eq!(ticks[0].time, 1700000000000);
        assert_eq!(ticks[1].funding_rate, -0.0002);
    }
}
