//! Where the catalog database comes from.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::CatalogError;

/// Upper bound on a downloaded database.
const MAX_DOWNLOAD_BYTES: u64 = 256 * 1024 * 1024;

/// A catalog database location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Fetched with a single HTTP GET.
    Remote(String),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl CatalogSource {
    /// Parse a location string.
    ///
    /// `http://` and `https://` are remote; a `file:` prefix is stripped and
    /// anything else is treated as a path.
    pub fn parse(location: &str) -> Result<Self, CatalogError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(CatalogError::EmptySource);
        }

        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(Self::Remote(location.to_string()));
        }

        let path = location
            .strip_prefix("file://")
            .or_else(|| location.strip_prefix("file:"))
            .unwrap_or(location);
        if path.is_empty() {
            return Err(CatalogError::EmptySource);
        }
        Ok(Self::File(PathBuf::from(path)))
    }

    /// Fetch the raw database bytes.
    pub fn fetch(&self, timeout: Duration) -> Result<Vec<u8>, CatalogError> {
        match self {
            Self::Remote(url) => fetch_remote(url, timeout),
            Self::File(path) => read_file(path),
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

fn fetch_remote(url: &str, timeout: Duration) -> Result<Vec<u8>, CatalogError> {
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    let response = agent.get(url).call().map_err(|err| match err {
        ureq::Error::Status(status, _) => CatalogError::HttpStatus {
            url: url.to_string(),
            status,
        },
        ureq::Error::Transport(transport) => CatalogError::Transport {
            url: url.to_string(),
            source: Box::new(transport),
        },
    })?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_DOWNLOAD_BYTES + 1)
        .read_to_end(&mut bytes)?;
    if bytes.len() as u64 > MAX_DOWNLOAD_BYTES {
        return Err(CatalogError::TooLarge {
            limit: MAX_DOWNLOAD_BYTES,
        });
    }
    tracing::debug!(url, bytes = bytes.len(), "Downloaded catalog database");
    Ok(bytes)
}

fn read_file(path: &Path) -> Result<Vec<u8>, CatalogError> {
    let bytes = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read catalog database");
    Ok(bytes)
}
