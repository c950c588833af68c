//! # BTC Garage
//!
//! Deterministic hindsight engine: what car would one BTC have bought on a
//! given date? [`PriceSeries`] resolves the latest close at or before the
//! date; [`match_budget`] (or the [`Engine`] facade's
//! [`Engine::match_on_date`]) deterministically matches that close, taken as
//! a USD budget, to one car in a fixed six-tier catalog plus up to three
//! alternatives.
//!
//! Same inputs, same car: every pick derives from a 32-bit FNV-1a hash of
//! frozen seed strings, never from clocks or RNG.
//!
//! ## Example
//!
//! ```rust
//! use btc_garage::{match_budget, Catalog, HistoryRow, InventoryItem, PriceSeries, Tier};
//!
//! let series = PriceSeries::from_rows(vec![
//!     HistoryRow { date: "2015-01-01".into(), close: 314.25 },
//!     HistoryRow { date: "2015-01-04".into(), close: 281.08 },
//! ]).unwrap();
//! let close = series.close_as_of("2015-01-02").unwrap();
//! assert_eq!(close.date_used, "2015-01-01");
//!
//! let catalog = Catalog::from_items([(Tier::Poverty, vec![InventoryItem {
//!     id: "craigslist-civic".into(),
//!     name: "Craigslist Civic".into(),
//!     price_usd: 250.0,
//!     vibe: "runs, mostly".into(),
//!     image: "/cars/craigslist-civic.jpg".into(),
//!     copy: None,
//!     tags: None,
//! }])]);
//! let result = match_budget(&catalog, close.close, Some("2015-01-02"));
//! assert_eq!(result.tier, Tier::Poverty);
//! assert_eq!(result.best_match.unwrap().id, "craigslist-civic");
//! ```

pub mod api;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod hash;
pub mod history;
pub mod matching;
pub mod types;

pub use catalog::Catalog;
pub use engine::{DateMatch, Engine};
pub use error::LoadError;
pub use hash::fnv1a_32;
pub use history::{Close, HistoryRow, PriceRange, PriceSeries};
pub use matching::{match_budget, EXOTICS_MIN};
pub use types::{InventoryItem, MatchResult, Tier};
