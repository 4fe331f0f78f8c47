//! Error types for nethome-core operations.

use std::path::PathBuf;

/// All errors that can occur in nethome-core operations.
///
/// Malformed neighbor-table lines are not errors; the parser skips them
/// silently because incomplete and stale entries are expected in the table.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Neighbor table unreadable: {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Event store failure: {context}")]
    Store { context: String },

    #[error("Identity configuration malformed: {path}: {details}")]
    Config { path: PathBuf, details: String },
}

/// Convenience type alias for Results using Error.
pub type Result<T> = std::result::Result<T, Error>;
