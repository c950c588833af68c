//! Tiered car inventory: loads the six fixed tier files and normalizes
//! their heterogeneous record shapes into one canonical item type.
//!
//! Normalization happens exactly once at load; the engine only ever sees
//! [`InventoryItem`]s. Tier files are processed in threshold order so that
//! auto-generated id suffixes come out the same on every run.

use crate::error::LoadError;
use crate::types::{InventoryItem, Tier};
use log::warn;
use std::collections::HashSet;
use std::path::Path;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Id used when a name slugs down to nothing.
const FALLBACK_ID: &str = "unknown";

/// Raw inventory record: the current shape, or the legacy `make` + `model`
/// split still present in older tier files.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum RawRecord {
    Named {
        #[serde(default)]
        id: Option<String>,
        name: String,
        price_usd: f64,
        #[serde(default)]
        vibe: String,
        #[serde(default)]
        image: Option<String>,
        #[serde(default)]
        copy: Option<String>,
        #[serde(default)]
        tags: Option<Vec<String>>,
    },
    Legacy {
        #[serde(default)]
        id: Option<String>,
        make: String,
        model: String,
        price_usd: f64,
        #[serde(default)]
        vibe: String,
    },
}

/// Lowercase ASCII slug: diacritics stripped (NFD, combining marks dropped),
/// non-alphanumeric runs collapsed to a single hyphen, no leading or
/// trailing hyphen.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.nfd().filter(|c| !is_combining_mark(*c)) {
        for lc in c.to_lowercase() {
            if lc.is_ascii_alphanumeric() {
                slug.push(lc);
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Normalizes one tier's raw JSON values.
///
/// Records that fit neither shape or carry a non-finite/non-positive price
/// are skipped. Auto-generated ids that would collide within the tier get
/// `-2`, `-3`, ... in encounter order; explicit ids are kept verbatim.
fn normalize_records(values: Vec<serde_json::Value>, tier: Tier) -> Vec<InventoryItem> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut items = Vec::with_capacity(values.len());

    for value in values {
        let raw: RawRecord = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping unrecognizable {} record: {}", tier, e);
                continue;
            }
        };
        let (explicit_id, name, price_usd, vibe, image, copy, tags) = match raw {
            RawRecord::Named {
                id,
                name,
                price_usd,
                vibe,
                image,
                copy,
                tags,
            } => (id, name.trim().to_string(), price_usd, vibe, image, copy, tags),
            RawRecord::Legacy {
                id,
                make,
                model,
                price_usd,
                vibe,
            } => (
                id,
                format!("{} {}", make.trim(), model.trim()),
                price_usd,
                vibe,
                None,
                None,
                None,
            ),
        };

        if !(price_usd.is_finite() && price_usd > 0.0) {
            warn!(
                "skipping {} record {:?}: invalid price {}",
                tier, name, price_usd
            );
            continue;
        }

        let id = match explicit_id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                let base = match slugify(&name) {
                    s if s.is_empty() => FALLBACK_ID.to_string(),
                    s => s,
                };
                let mut candidate = base.clone();
                let mut n = 2;
                while seen.contains(&candidate) {
                    candidate = format!("{}-{}", base, n);
                    n += 1;
                }
                candidate
            }
        };
        if !seen.insert(id.clone()) {
            warn!("duplicate explicit id {:?} in {} inventory", id, tier);
        }

        let image = image
            .filter(|img| !img.trim().is_empty())
            .unwrap_or_else(|| format!("/cars/{}.jpg", id));

        items.push(InventoryItem {
            id,
            name,
            price_usd,
            vibe,
            image,
            copy,
            tags,
        });
    }
    items
}

/// Six fixed tier inventories, normalized once at load. Read-only afterward.
#[derive(Clone, Debug)]
pub struct Catalog {
    tiers: [Vec<InventoryItem>; 6],
}

impl Catalog {
    /// Loads the six fixed `{tier}.json` files from `dir`, in threshold
    /// order. A missing or unreadable file fails the load.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let mut tiers: [Vec<InventoryItem>; 6] = std::array::from_fn(|_| Vec::new());
        for tier in Tier::ALL {
            let path = dir.join(format!("{}.json", tier));
            let bytes = std::fs::read(&path).map_err(|e| LoadError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            let parsed: serde_json::Value = serde_json::from_slice(&bytes)
                .map_err(|e| LoadError::MalformedSource(format!("{}: {}", path.display(), e)))?;
            let serde_json::Value::Array(values) = parsed else {
                return Err(LoadError::MalformedSource(format!(
                    "{}: JSON root is not an array",
                    path.display()
                )));
            };
            tiers[tier as usize] = normalize_records(values, tier);
        }
        Ok(Self { tiers })
    }

    /// Builds a catalog from already-normalized items. Tiers not given stay
    /// empty. Mainly for tests and embedding.
    pub fn from_items(entries: impl IntoIterator<Item = (Tier, Vec<InventoryItem>)>) -> Self {
        let mut tiers: [Vec<InventoryItem>; 6] = std::array::from_fn(|_| Vec::new());
        for (tier, items) in entries {
            tiers[tier as usize] = items;
        }
        Self { tiers }
    }

    /// Items in one tier, in normalized load order.
    pub fn items(&self, tier: Tier) -> &[InventoryItem] {
        &self.tiers[tier as usize]
    }

    /// Total item count across all tiers.
    pub fn total_items(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }
}
