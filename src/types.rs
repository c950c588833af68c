//! Core domain types: tiers, catalog items, and match results.

/// One of the six fixed price-bracket catalogs.
///
/// Variant order is threshold order; it is also the order inventory files
/// are processed in, which keeps auto-id suffixes stable across runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Poverty,
    UsedBeaters,
    UsedIcons,
    UsedLegends,
    NewCars,
    Exotics,
}

impl Tier {
    /// All tiers in threshold order.
    pub const ALL: [Tier; 6] = [
        Tier::Poverty,
        Tier::UsedBeaters,
        Tier::UsedIcons,
        Tier::UsedLegends,
        Tier::NewCars,
        Tier::Exotics,
    ];

    /// Wire name. Matches the inventory file stems and the selection-seed
    /// suffixes for persona-routed tiers.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Poverty => "poverty",
            Tier::UsedBeaters => "used-beaters",
            Tier::UsedIcons => "used-icons",
            Tier::UsedLegends => "used-legends",
            Tier::NewCars => "new-cars",
            Tier::Exotics => "exotics",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized catalog entry. Built once at load from the heterogeneous
/// raw shapes; read-only afterward.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InventoryItem {
    /// Unique within its tier; derived from `name` when the source record
    /// has no explicit id.
    pub id: String,
    pub name: String,
    pub price_usd: f64,
    pub vibe: String,
    /// Path or URL; defaults to the conventional per-id path.
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Result of one deterministic match: the routed tier, a single best match
/// (absent when nothing in the tier is affordable), and up to three
/// alternatives from the same band, priciest first.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub tier: Tier,
    pub best_match: Option<InventoryItem>,
    pub alternatives: Vec<InventoryItem>,
}
