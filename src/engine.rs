//! Single-entry hindsight engine facade.
//!
//! Owns the loaded price series and car catalog so callers can resolve
//! closes and run matches without wiring the leaf modules themselves. All
//! queries are read-only on immutable data and safe to run in parallel.

use crate::catalog::Catalog;
use crate::error::LoadError;
use crate::history::{Close, PriceRange, PriceSeries};
use crate::matching;
use crate::types::MatchResult;
use log::info;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Default data directory; override with `GARAGE_DATA_DIR`.
const DEFAULT_DATA_DIR: &str = "data";

/// Composed result of resolving a date and matching its close as a budget.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateMatch {
    pub date_used: String,
    pub close: f64,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// Loaded series + catalog, frozen after construction.
#[derive(Clone, Debug)]
pub struct Engine {
    series: PriceSeries,
    catalog: Catalog,
}

impl Engine {
    pub fn new(series: PriceSeries, catalog: Catalog) -> Self {
        Self { series, catalog }
    }

    /// Loads `btc-history.json` and the `inventory/` tier files from `dir`.
    pub fn from_data_dir(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let series = PriceSeries::load(dir.join("btc-history.json"))?;
        let catalog = Catalog::load_dir(dir.join("inventory"))?;
        info!(
            "loaded {} history rows, {} cars from {}",
            series.len(),
            catalog.total_items(),
            dir.display()
        );
        Ok(Self::new(series, catalog))
    }

    /// Process-wide engine, loaded at most once per process from
    /// `GARAGE_DATA_DIR` (default `data/`).
    ///
    /// Concurrent first callers block on the single load attempt and share
    /// its outcome, success or failure; nobody observes a half-built engine.
    pub fn shared() -> Result<Arc<Engine>, LoadError> {
        static SHARED: OnceLock<Result<Arc<Engine>, LoadError>> = OnceLock::new();
        SHARED
            .get_or_init(|| {
                let dir = std::env::var("GARAGE_DATA_DIR")
                    .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
                Engine::from_data_dir(dir).map(Arc::new)
            })
            .clone()
    }

    /// Latest close at or before `date`.
    pub fn close_as_of(&self, date: &str) -> Option<Close> {
        self.series.close_as_of(date)
    }

    /// First and last dates of the loaded series.
    pub fn range(&self) -> Option<PriceRange> {
        self.series.range()
    }

    /// Matches a USD budget directly, without date resolution.
    pub fn match_budget(&self, budget_usd: f64, date_seed: Option<&str>) -> MatchResult {
        let result = matching::match_budget(&self.catalog, budget_usd, date_seed);
        info!(
            "match budget={} seed={:?} tier={} best={:?}",
            budget_usd,
            date_seed,
            result.tier,
            result.best_match.as_ref().map(|b| b.id.as_str())
        );
        result
    }

    /// The composed read path: resolve the close on or before `date`, then
    /// match it as a budget with `date` itself as the determinism seed.
    ///
    /// `None` when the date is malformed or predates the series.
    pub fn match_on_date(&self, date: &str) -> Option<DateMatch> {
        let close = self.series.close_as_of(date)?;
        let result = self.match_budget(close.close, Some(date));
        Some(DateMatch {
            date_used: close.date_used,
            close: close.close,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryRow;
    use crate::types::{InventoryItem, Tier};

    fn init_log() {
        let _ = env_logger::try_init();
    }

    fn item(id: &str, price_usd: f64) -> InventoryItem {
        InventoryItem {
            id: id.into(),
            name: id.to_uppercase(),
            price_usd,
            vibe: String::new(),
            image: format!("/cars/{}.jpg", id),
            copy: None,
            tags: None,
        }
    }

    fn test_engine() -> Engine {
        let series = PriceSeries::from_rows(vec![
            HistoryRow {
                date: "2015-01-01".into(),
                close: 314.25,
            },
            HistoryRow {
                date: "2015-01-04".into(),
                close: 281.08,
            },
            HistoryRow {
                date: "2021-11-09".into(),
                close: 67_549.73,
            },
        ])
        .unwrap();
        let catalog = Catalog::from_items([
            (
                Tier::Poverty,
                vec![item("rusty-tercel", 250.0), item("geo-metro", 300.0)],
            ),
            (
                Tier::NewCars,
                vec![item("camry", 32_000.0), item("rav4", 38_000.0)],
            ),
            (
                Tier::UsedLegends,
                vec![item("e39-m5", 45_000.0), item("nsx", 90_000.0)],
            ),
            (Tier::Exotics, vec![item("f40", 2_500_000.0)]),
        ]);
        Engine::new(series, catalog)
    }

    #[test]
    fn match_on_date_resolves_floor_then_matches() {
        init_log();
        let engine = test_engine();
        // 2015-01-02 floors to the 2015-01-01 close of 314.25.
        let matched = engine.match_on_date("2015-01-02").unwrap();
        assert_eq!(matched.date_used, "2015-01-01");
        assert_eq!(matched.close, 314.25);
        assert_eq!(matched.result.tier, Tier::Poverty);
        assert!(matched.result.best_match.is_some());
    }

    #[test]
    fn match_on_date_seeds_with_the_requested_date() {
        init_log();
        let engine = test_engine();
        // The requested date, not the resolved one, seeds the hash.
        let a = engine.match_on_date("2015-01-02").unwrap();
        let b = engine.match_on_date("2015-01-02").unwrap();
        assert_eq!(a, b, "same date, identical output");
        assert_eq!(
            a.result,
            engine.match_budget(314.25, Some("2015-01-02")),
            "match_on_date must equal a direct match with the same seed"
        );
    }

    #[test]
    fn match_on_date_before_series_is_none() {
        init_log();
        let engine = test_engine();
        assert!(engine.match_on_date("2014-06-01").is_none());
    }

    #[test]
    fn match_on_date_malformed_is_none() {
        init_log();
        let engine = test_engine();
        assert!(engine.match_on_date("11/09/2021").is_none());
    }

    #[test]
    fn date_match_serializes_flat_camel_case() {
        init_log();
        let matched = test_engine().match_on_date("2015-01-02").unwrap();
        let json = serde_json::to_value(&matched).unwrap();
        assert_eq!(json["dateUsed"], "2015-01-01");
        assert!(json.get("tier").is_some());
        assert!(json.get("bestMatch").is_some());
    }

    #[test]
    fn loads_bundled_data_dir() {
        init_log();
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let engine = Engine::from_data_dir(&dir).unwrap();
        assert!(engine.range().is_some());
        let matched = engine.match_on_date("2021-11-10").unwrap();
        assert!(matched.close > 0.0);
    }

    #[test]
    fn shared_engine_returns_one_outcome() {
        init_log();
        // Under `cargo test` the cwd is the manifest dir, so the default
        // data directory resolves and the first call performs the load.
        let a = Engine::shared();
        let b = Engine::shared();
        match (a, b) {
            (Ok(a), Ok(b)) => assert!(Arc::ptr_eq(&a, &b), "same engine instance"),
            (Err(_), Err(_)) => {}
            _ => panic!("both callers must see the same outcome"),
        }
    }
}
