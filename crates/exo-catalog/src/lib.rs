//! Exoplanet catalog access.
//!
//! The catalog is a prebuilt SQLite file, fetched over HTTP(S) or read from
//! disk, copied into an in-memory connection and queried once for a bounded
//! page of rows. [`CatalogLoader`] runs that work on a background thread and
//! hands the result to the render loop exactly once.

mod database;
mod error;
mod loader;
mod record;
mod source;

pub use database::{CatalogDb, SQLITE_HEADER};
pub use error::CatalogError;
pub use loader::{CatalogLoader, LoadRequest, load_catalog};
pub use record::{COLUMNS, PlanetRecord};
pub use source::CatalogSource;
