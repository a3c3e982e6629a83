//! In-memory SQLite copy of the catalog.

use std::io::Write;
use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, DatabaseName, Row, params};

use crate::error::CatalogError;
use crate::record::{COLUMNS, PlanetRecord};

/// The 16-byte magic string every SQLite 3 database file starts with.
pub const SQLITE_HEADER: &[u8; 16] = b"SQLite format 3\0";

/// A read-only catalog held entirely in memory.
pub struct CatalogDb {
    conn: Connection,
}

impl CatalogDb {
    /// Copy the database file at `path` into a fresh in-memory connection.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let mut header = [0u8; 16];
        let len = {
            let mut file = std::fs::File::open(path)?;
            read_prefix(&mut file, &mut header)?
        };
        if len < header.len() || &header != SQLITE_HEADER {
            return Err(CatalogError::NotSqlite { len });
        }

        let mut conn = Connection::open_in_memory()?;
        conn.restore(
            DatabaseName::Main,
            path,
            None::<fn(rusqlite::backup::Progress)>,
        )?;
        Ok(Self { conn })
    }

    /// Load a database image that was fetched as bytes.
    ///
    /// SQLite only restores from files, so the image is staged in a temp file
    /// that is removed once the copy is in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CatalogError> {
        if !bytes.starts_with(SQLITE_HEADER) {
            return Err(CatalogError::NotSqlite { len: bytes.len() });
        }

        let mut staged = tempfile::NamedTempFile::new()?;
        staged.write_all(bytes)?;
        staged.flush()?;
        Self::open(staged.path())
    }

    /// Read up to `limit` planets from `table`, in storage order.
    ///
    /// Rows without a name are skipped. Numeric columns are read leniently:
    /// integers, reals and numeric text all convert, anything else is `None`.
    pub fn fetch_records(&self, table: &str, limit: u32) -> Result<Vec<PlanetRecord>, CatalogError> {
        validate_table_name(table)?;

        // Unnamed rows are filtered before LIMIT so a page still holds up to
        // `limit` usable records.
        let sql = format!(
            "SELECT {} FROM \"{}\" \
             WHERE typeof(pl_name) IN ('text', 'integer', 'real') AND trim(pl_name) <> '' \
             LIMIT ?1",
            COLUMNS.join(", "),
            table
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![i64::from(limit)], row_to_record)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in rows {
            match row? {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::warn!(skipped, table, "Skipped catalog rows without a planet name");
        }
        Ok(records)
    }
}

fn read_prefix(reader: &mut impl std::io::Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

/// Table names are interpolated into SQL, so only plain identifiers pass.
fn validate_table_name(table: &str) -> Result<(), CatalogError> {
    let mut chars = table.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CatalogError::InvalidTable(table.to_string()))
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<Option<PlanetRecord>> {
    let name = match text_at(row, 0)? {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Ok(None),
    };

    Ok(Some(PlanetRecord {
        name,
        mass_earth: real_at(row, 1)?,
        star_count: integer_at(row, 2)?,
        planet_count: integer_at(row, 3)?,
        moon_count: integer_at(row, 4)?,
        discovery_year: integer_at(row, 5)?,
        discovery_instrument: text_at(row, 6)?,
        orbital_period_days: real_at(row, 7)?,
        radius_earth_radii: real_at(row, 8)?,
        density: real_at(row, 9)?,
        eccentricity: real_at(row, 10)?,
        galactic_latitude: real_at(row, 11)?,
        galactic_longitude: real_at(row, 12)?,
        ecliptic_latitude: real_at(row, 13)?,
        ecliptic_longitude: real_at(row, 14)?,
        distance_parsecs: real_at(row, 15)?,
        last_update: text_at(row, 16)?,
    }))
}

fn real_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<f64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

fn integer_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok()),
        _ => None,
    })
}

fn text_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}
