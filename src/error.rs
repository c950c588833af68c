//! Load-time error taxonomy.
//!
//! Query-time failures (malformed date, nothing affordable) degrade to
//! `Option`/empty results instead; only loading can fail loudly.

/// Why a dataset failed to load. `Clone` so the shared engine can hand the
/// same outcome to every caller of a failed one-time load.
#[derive(Clone, Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading a data file failed.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// The source was not a recognizable collection of records.
    #[error("malformed source: {0}")]
    MalformedSource(String),

    /// The source parsed but no valid rows survived validation.
    #[error("no valid rows in dataset")]
    EmptyDataset,
}
