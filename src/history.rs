//! BTC close history: the canonical, validated, date-sorted price series.
//!
//! Loaded once from an external JSON snapshot; answers "latest close at or
//! before X" floor queries and range queries. Read-only after construction.

use crate::error::LoadError;
use log::warn;
use std::path::Path;

/// One validated row of the close history.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HistoryRow {
    pub date: String,
    pub close: f64,
}

/// First and last dates covered by a loaded series.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_date: String,
    pub max_date: String,
}

/// Result of a floor query: the row actually used to answer it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Close {
    pub date_used: String,
    pub close: f64,
}

/// True for the `YYYY-MM-DD` shape. Format check only; whether the date
/// resolves is the series' call.
pub(crate) fn is_date_format(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter().enumerate().all(|(i, c)| {
            if i == 4 || i == 7 {
                *c == b'-'
            } else {
                c.is_ascii_digit()
            }
        })
}

/// Immutable date-sorted close series.
///
/// Lexicographic order on `YYYY-MM-DD` strings equals chronological order,
/// so sorting and searching work on the date strings directly.
#[derive(Clone, Debug)]
pub struct PriceSeries {
    rows: Vec<HistoryRow>,
}

impl PriceSeries {
    /// Validates, sorts, and dedups rows into a series.
    ///
    /// Rows with a malformed date or a non-finite/non-positive close are
    /// dropped. Duplicate dates keep the last occurrence. Fails with
    /// [`LoadError::EmptyDataset`] when nothing survives.
    pub fn from_rows(rows: Vec<HistoryRow>) -> Result<Self, LoadError> {
        let mut rows: Vec<HistoryRow> = rows
            .into_iter()
            .filter(|row| {
                let ok = is_date_format(&row.date) && row.close.is_finite() && row.close > 0.0;
                if !ok {
                    warn!(
                        "skipping invalid history row date={:?} close={}",
                        row.date, row.close
                    );
                }
                ok
            })
            .collect();
        if rows.is_empty() {
            return Err(LoadError::EmptyDataset);
        }
        // Stable sort: duplicate dates stay in input order, so keeping the
        // last entry per date below means the last occurrence wins.
        rows.sort_by(|a, b| a.date.cmp(&b.date));
        let mut deduped: Vec<HistoryRow> = Vec::with_capacity(rows.len());
        for row in rows {
            match deduped.last_mut() {
                Some(last) if last.date == row.date => *last = row,
                _ => deduped.push(row),
            }
        }
        Ok(Self { rows: deduped })
    }

    /// Parses a JSON array of `{date, close}` records.
    ///
    /// Unparseable entries are skipped, not fatal; a non-array root is
    /// [`LoadError::MalformedSource`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        let parsed: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| LoadError::MalformedSource(e.to_string()))?;
        let serde_json::Value::Array(entries) = parsed else {
            return Err(LoadError::MalformedSource("JSON root is not an array".into()));
        };
        let rows = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<HistoryRow>(entry) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!("skipping unparseable history row: {}", e);
                    None
                }
            })
            .collect();
        Self::from_rows(rows)
    }

    /// Loads the series from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| LoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_slice(&bytes)
    }

    /// Latest close at or before `date`: the rightmost row whose date is
    /// `<= date`. `None` when the date is malformed or predates the series.
    pub fn close_as_of(&self, date: &str) -> Option<Close> {
        if !is_date_format(date) {
            return None;
        }
        let idx = self.rows.partition_point(|row| row.date.as_str() <= date);
        let row = &self.rows[idx.checked_sub(1)?];
        Some(Close {
            date_used: row.date.clone(),
            close: row.close,
        })
    }

    /// First and last dates of the series.
    pub fn range(&self) -> Option<PriceRange> {
        Some(PriceRange {
            min_date: self.rows.first()?.date.clone(),
            max_date: self.rows.last()?.date.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The validated rows, ascending by date.
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }
}
