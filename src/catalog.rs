use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::Config;
use crate::model::response::MetaAndAssetCtxs;
use crate::model::MarketSnapshot;
use crate::rest::InfoApi;
use crate::Symbol;

/// The discovered symbol universe plus per-symbol market snapshots. Primary
/// and extended-market symbol spaces are disjoint; extended symbols arrive
/// from the venue already prefixed with the dex name.
#[derive(Debug, Default)]
pub struct Catalog {
    pub primary: Vec<Symbol>,
    pub extended: Vec<Symbol>,
    pub snapshots: HashMap<Symbol, MarketSnapshot>,
}

impl Catalog {
    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.primary.iter().chain(self.extended.iter())
    }
}

/// Fetches one namespace of the asset catalog. Any failure is absorbed into
/// empty outputs so one bad namespace cannot abort the run.
pub async fn fetch_catalog(
    api: &(impl InfoApi + ?Sized),
    dex: Option<&str>,
) -> (Vec<Symbol>, HashMap<Symbol, MarketSnapshot>) {
    let MetaAndAssetCtxs(meta, ctxs) = match api.meta_and_asset_ctxs(dex).await {
        Ok(resp) => resp,
        Err(err) => {
            warn!(?dex, "failed to fetch asset catalog: {err}");
            return (Vec::new(), HashMap::new());
        }
    };

    let mut symbols = Vec::with_capacity(meta.universe.len());
    let mut snapshots = HashMap::with_capacity(meta.universe.len());
    // positional contract: ctxs[i] belongs to universe[i]
    for (asset, ctx) in meta.universe.iter().zip(&ctxs) {
        symbols.push(asset.name.clone());
        snapshots.insert(
            asset.name.clone(),
            MarketSnapshot {
                volume_24h: ctx.day_ntl_vlm,
                open_interest: ctx.open_interest,
                mark_px: ctx.mark_px,
                funding: ctx.funding,
            },
        );
    }
    (symbols, snapshots)
}

/// Combines the optional primary namespace with the always-fetched
/// extended-market namespace. Snapshot collisions are not expected, but merge
/// is last-write-wins.
pub async fn fetch_universe(api: &(impl InfoApi + ?Sized), config: &Config) -> Catalog {
    let (primary, mut snapshots) = if config.include_main_perp {
        let (symbols, snapshots) = fetch_catalog(api, None).await;
        info!("primary perp dex: {} assets", symbols.len());
        (symbols, snapshots)
    } else {
        info!("primary perp dex skipped (enable with --main-perp)");
        (Vec::new(), HashMap::new())
    };

    let (extended, extended_snapshots) = fetch_catalog(api, Some(&config.dex)).await;
    info!("{} dex: {} assets", config.dex, extended.len());
    snapshots.extend(extended_snapshots);

    Catalog {
        primary,
        extended,
        snapshots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::response::{Asset, AssetCtx, FundingTick, Universe};
    use crate::rest::{FetchError, FetchResult};
    use crate::TimeStampMs;
    use async_trait::async_trait;

    struct FixedCatalogApi {
        // None means the namespace call fails
        namespaces: HashMap<Option<String>, Vec<(String, f64)>>,
    }

    #[async_trait]
    impl InfoApi for FixedCatalogApi {
        async fn meta_and_asset_ctxs(&self, dex: Option<&str>) -> FetchResult<MetaAndAssetCtxs> {
            let assets = self
                .namespaces
                .get(&dex.map(str::to_string))
                .ok_or(FetchError::Transport("connection refused".to_string()))?;
            let universe = Universe {
                universe: assets
                    .iter()
                    .map(|(name, _)| Asset { name: name.clone() })
                    .collect(),
            };
            let ctxs = assets
                .iter()
                .map(|(_, mark_px)| AssetCtx {
                    mark_px: *mark_px,
                    funding: 0.0001,
                    ..AssetCtx::default()
                })
                .collect();
            Ok(MetaAndAssetCtxs(universe, ctxs))
        }

        async fn funding_history(
            &self,
            _coin: &str,
            _start_time: TimeStampMs,
            _end_time: Option<TimeStampMs>,
        ) -> FetchResult<Vec<FundingTick>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_fetch_catalog_maps_snapshots() {
        let api = FixedCatalogApi {
            namespaces: HashMap::from([(
                Some("xyz".to_string()),
                vec![("xyz:TSLA".to_string(), 250.0), ("xyz:NVDA".to_string(), 120.0)],
            )]),
        };
        let (symbols, snapshots) = fetch_catalog(&api, Some("xyz")).await;
        assert_eq!(symbols, vec!["xyz:TSLA", "xyz:NVDA"]);
        assert_eq!(snapshots["xyz:TSLA"].mark_px, 250.0);
        assert_eq!(snapshots["xyz:NVDA"].funding, 0.0001);
    }

    #[tokio::test]
    async fn test_fetch_catalog_absorbs_failure() {
        let api = FixedCatalogApi {
            namespaces: HashMap::new(),
        };
        let (symbols, snapshots) = fetch_catalog(&api, None).await;
        assert!(symbols.is_empty());
        assert!(snapshots.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_universe_survives_primary_failure() {
        // primary namespace errors, extended succeeds: run must keep going
        let api = FixedCatalogApi {
            namespaces: HashMap::from([(
                Some("xyz".to_string()),
                vec![("xyz:TSLA".to_string(), 250.0)],
            )]),
        };
        let config = Config {
            include_main_perp: true,
            ..Config::default()
        };
        let catalog = fetch_universe(&api, &config).await;
        assert!(catalog.primary.is_empty());
        assert_eq!(catalog.extended, vec!["xyz:TSLA"]);
        assert_eq!(catalog.all_symbols().count(), 1);
        assert!(catalog.snapshots.contains_key("xyz:TSLA"));
    }
}
