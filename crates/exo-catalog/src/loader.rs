//! One-shot background catalog load.

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use exo_config::CatalogConfig;

use crate::database::CatalogDb;
use crate::error::CatalogError;
use crate::record::PlanetRecord;
use crate::source::CatalogSource;

/// Parameters for a single catalog load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub location: String,
    pub table: String,
    pub max_records: u32,
    pub timeout: Duration,
}

impl LoadRequest {
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            location: config.database_url.clone(),
            table: config.table.clone(),
            max_records: config.max_records,
            timeout: Duration::from_secs(u64::from(config.timeout_seconds.max(1))),
        }
    }
}

/// Fetch, open and query the catalog on the calling thread.
pub fn load_catalog(request: &LoadRequest) -> Result<Vec<PlanetRecord>, CatalogError> {
    let source = CatalogSource::parse(&request.location)?;
    let db = match &source {
        CatalogSource::File(path) => CatalogDb::open(path)?,
        CatalogSource::Remote(_) => CatalogDb::from_bytes(&source.fetch(request.timeout)?)?,
    };
    db.fetch_records(&request.table, request.max_records)
}

/// Runs [`load_catalog`] on a background thread and yields the result once.
///
/// Failures are logged on the loader thread and delivered as an empty list.
/// Dropping the loader before it finishes detaches the thread; its eventual
/// send is discarded.
pub struct CatalogLoader {
    receiver: Option<Receiver<Vec<PlanetRecord>>>,
    _handle: Option<JoinHandle<()>>,
}

impl CatalogLoader {
    /// Start loading in the background.
    pub fn spawn(request: LoadRequest) -> Result<Self, CatalogError> {
        let (sender, receiver) = bounded::<Vec<PlanetRecord>>(1);

        let handle = std::thread::Builder::new()
            .name("catalog-loader".into())
            .spawn(move || {
                let start = Instant::now();
                let records = match load_catalog(&request) {
                    Ok(records) => {
                        tracing::info!(
                            count = records.len(),
                            elapsed_ms = start.elapsed().as_millis() as u64,
                            "Loaded {} planets from {}",
                            records.len(),
                            request.location
                        );
                        records
                    }
                    Err(err) => {
                        tracing::error!("Failed to load catalog from {}: {err}", request.location);
                        Vec::new()
                    }
                };
                // The viewer may already have shut down.
                let _ = sender.send(records);
            })?;

        Ok(Self {
            receiver: Some(receiver),
            _handle: Some(handle),
        })
    }

    /// A loader that has already delivered nothing.
    pub fn finished() -> Self {
        Self {
            receiver: None,
            _handle: None,
        }
    }

    /// Non-blocking check for the result. Returns `Some` exactly once.
    pub fn poll(&mut self) -> Option<Vec<PlanetRecord>> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(records) => {
                self.receiver = None;
                Some(records)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::error!("Catalog loader exited without a result");
                self.receiver = None;
                Some(Vec::new())
            }
        }
    }

    /// Block until the result arrives or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Option<Vec<PlanetRecord>> {
        let receiver = self.receiver.as_ref()?;
        match receiver.recv_timeout(timeout) {
            Ok(records) => {
                self.receiver = None;
                Some(records)
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => None,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                self.receiver = None;
                Some(Vec::new())
            }
        }
    }

    /// True until the result has been taken.
    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::tests::write_catalog;

    fn request_for(location: String) -> LoadRequest {
        LoadRequest {
            location,
            table: "exoplanets".to_string(),
            max_records: 500,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_request_from_config() {
        let config = CatalogConfig::default();
        let request = LoadRequest::from_config(&config);
        assert_eq!(request.max_records, 500);
        assert_eq!(request.table, "exoplanets");
        assert_eq!(request.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_load_catalog_from_file_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exoplanets.db");
        write_catalog(&path, &[(Some("HD 209458 b"), Some(3.52), Some(15.6))]);

        let records = load_catalog(&request_for(format!("file:{}", path.display()))).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "HD 209458 b");
    }

    #[test]
    fn test_loader_delivers_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exoplanets.db");
        write_catalog(
            &path,
            &[(Some("a"), Some(1.0), None), (Some("b"), Some(2.0), None)],
        );

        let mut loader = CatalogLoader::spawn(request_for(path.display().to_string())).unwrap();
        assert!(loader.is_pending());
        let records = loader.wait(Duration::from_secs(10)).unwrap();
        assert_eq!(records.len(), 2);
        assert!(!loader.is_pending());
        assert!(loader.poll().is_none());
        assert!(loader.wait(Duration::from_millis(1)).is_none());
    }

    #[test]
    fn test_loader_failure_delivers_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.db");
        let mut loader = CatalogLoader::spawn(request_for(missing.display().to_string())).unwrap();
        let records = loader.wait(Duration::from_secs(10)).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_loader_dropped_before_delivery_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exoplanets.db");
        write_catalog(&path, &[(Some("a"), None, None)]);
        let loader = CatalogLoader::spawn(request_for(path.display().to_string())).unwrap();
        drop(loader);
    }

    #[test]
    fn test_finished_loader_yields_nothing() {
        let mut loader = CatalogLoader::finished();
        assert!(!loader.is_pending());
        assert!(loader.poll().is_none());
    }
}
