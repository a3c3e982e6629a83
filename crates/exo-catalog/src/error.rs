//! Catalog error types.

/// Errors raised while fetching, opening, or querying the catalog.
///
/// These never leave the loader thread: [`crate::CatalogLoader`] logs them and
/// delivers an empty record list instead.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("empty database location")]
    EmptySource,

    #[error("server returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    #[error("database exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload does not start with the SQLite file header.
    #[error("not a SQLite database ({len} bytes)")]
    NotSqlite { len: usize },

    #[error("invalid table name {0:?}")]
    InvalidTable(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
