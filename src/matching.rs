//! Deterministic tier routing and band selection.
//!
//! Every output is a pure function of `(budget, seed)`: tier thresholds,
//! the persona and exotic rolls, and the in-band pick all derive from
//! [`fnv1a_32`] over frozen seed strings. The seed grammar
//! (`date:floor(budget):suffix`) and the literal suffixes are part of the
//! contract; changing either changes historical picks.

use crate::catalog::Catalog;
use crate::hash::fnv1a_32;
use crate::types::{InventoryItem, MatchResult, Tier};

/// Budget at or above which exotics enter the persona routing.
pub const EXOTICS_MIN: f64 = 150_000.0;

/// Seed token used when the caller supplies no date.
const NO_DATE: &str = "no-date";

/// Deterministic split used only to bias high-budget routing:
/// roll < 60 is a normie, the rest are enthusiasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Persona {
    Normie,
    Enthusiast,
}

fn persona_for(seed: &str) -> Persona {
    if fnv1a_32(seed) % 100 < 60 {
        Persona::Normie
    } else {
        Persona::Enthusiast
    }
}

/// Index-style pick with controlled variety:
/// - consider only affordable items
/// - band = the top-priced 10% of them, clamped to 3..=8 items
/// - choose one deterministically from the band using the seed
/// - alternatives are the remaining band items, priciest first, at most 3
///
/// An empty affordable set is a normal outcome, not an error.
fn pick_from_band(
    items: &[InventoryItem],
    budget_usd: f64,
    seed: &str,
) -> (Option<InventoryItem>, Vec<InventoryItem>) {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| a.price_usd.total_cmp(&b.price_usd));
    let affordable: Vec<InventoryItem> = sorted
        .into_iter()
        .filter(|x| x.price_usd <= budget_usd)
        .collect();

    if affordable.is_empty() {
        return (None, Vec::new());
    }

    let band_size = ((affordable.len() as f64 * 0.1).round() as usize).clamp(3, 8);
    // Top of the affordable range: the pick stays aspirational within
    // budget instead of trivially cheap.
    let band = &affordable[affordable.len().saturating_sub(band_size)..];

    let idx = fnv1a_32(seed) as usize % band.len();
    let best = band[idx].clone();

    let mut alternatives: Vec<InventoryItem> = band
        .iter()
        .filter(|x| x.id != best.id)
        .cloned()
        .collect();
    alternatives.sort_by(|a, b| b.price_usd.total_cmp(&a.price_usd));
    alternatives.truncate(3);

    (Some(best), alternatives)
}

/// Deterministically matches a USD budget to one car plus up to three
/// alternatives.
///
/// `date_seed` is the query date (or `None` for the fixed fallback token);
/// together with the floored budget it drives every roll. Same inputs, same
/// output, on every call and every process.
pub fn match_budget(catalog: &Catalog, budget_usd: f64, date_seed: Option<&str>) -> MatchResult {
    let base_seed = format!(
        "{}:{}",
        date_seed.unwrap_or(NO_DATE),
        budget_usd.floor() as i64
    );

    // Fixed tiers below 30k; first match wins.
    if budget_usd < 5_000.0 {
        let (best, alternatives) = pick_from_band(
            catalog.items(Tier::Poverty),
            budget_usd,
            &format!("{}:poverty", base_seed),
        );
        return MatchResult {
            tier: Tier::Poverty,
            best_match: best,
            alternatives,
        };
    }
    if budget_usd < 10_000.0 {
        let (best, alternatives) = pick_from_band(
            catalog.items(Tier::UsedBeaters),
            budget_usd,
            &format!("{}:beater", base_seed),
        );
        return MatchResult {
            tier: Tier::UsedBeaters,
            best_match: best,
            alternatives,
        };
    }
    if budget_usd < 30_000.0 {
        let (best, alternatives) = pick_from_band(
            catalog.items(Tier::UsedIcons),
            budget_usd,
            &format!("{}:icons", base_seed),
        );
        return MatchResult {
            tier: Tier::UsedIcons,
            best_match: best,
            alternatives,
        };
    }

    // At 30k and up the persona picks the catalog, invisibly to the caller.
    // Normies lean new cars, enthusiasts lean legends; once the budget is
    // huge both get a shot at exotics via an independent second roll.
    let persona = persona_for(&format!("{}:persona", base_seed));

    let (tier, items) = if budget_usd >= EXOTICS_MIN {
        let roll = fnv1a_32(&format!("{}:exotic-roll", base_seed)) % 100;
        match persona {
            Persona::Normie if roll < 30 => (Tier::Exotics, catalog.items(Tier::Exotics)),
            Persona::Normie => (Tier::NewCars, catalog.items(Tier::NewCars)),
            Persona::Enthusiast if roll < 55 => (Tier::Exotics, catalog.items(Tier::Exotics)),
            Persona::Enthusiast => (Tier::UsedLegends, catalog.items(Tier::UsedLegends)),
        }
    } else {
        match persona {
            Persona::Normie => (Tier::NewCars, catalog.items(Tier::NewCars)),
            Persona::Enthusiast => {
                // Tier label and selection seed stay used-legends even when
                // an empty legends file means picking from icons instead.
                let legends = catalog.items(Tier::UsedLegends);
                let items = if legends.is_empty() {
                    catalog.items(Tier::UsedIcons)
                } else {
                    legends
                };
                (Tier::UsedLegends, items)
            }
        }
    };

    let (best, alternatives) =
        pick_from_band(items, budget_usd, &format!("{}:{}", base_seed, tier.as_str()));
    MatchResult {
        tier,
        best_match: best,
        alternatives,
    }
}
