//! The planet row type.

use serde::{Deserialize, Serialize};

/// Catalog columns read for each planet, in display order.
///
/// Names follow the NASA Exoplanet Archive `pscomppars` table.
pub const COLUMNS: [&str; 17] = [
    "pl_name",
    "pl_masse",
    "sy_snum",
    "sy_pnum",
    "sy_mnum",
    "disc_year",
    "disc_instrument",
    "pl_orbper",
    "pl_rade",
    "pl_dens",
    "pl_orbeccen",
    "glat",
    "glon",
    "elat",
    "elon",
    "sy_dist",
    "rowupdate",
];

/// One planet from the catalog.
///
/// Only `name`, `orbital_period_days` and `radius_earth_radii` feed the
/// orbit model; everything else is carried through for the detail panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetRecord {
    pub name: String,
    pub mass_earth: Option<f64>,
    pub star_count: Option<i64>,
    pub planet_count: Option<i64>,
    pub moon_count: Option<i64>,
    pub discovery_year: Option<i64>,
    pub discovery_instrument: Option<String>,
    pub orbital_period_days: Option<f64>,
    pub radius_earth_radii: Option<f64>,
    /// Bulk density in g/cm³.
    pub density: Option<f64>,
    pub eccentricity: Option<f64>,
    pub galactic_latitude: Option<f64>,
    pub galactic_longitude: Option<f64>,
    pub ecliptic_latitude: Option<f64>,
    pub ecliptic_longitude: Option<f64>,
    pub distance_parsecs: Option<f64>,
    /// Archive row update date, as stored (usually `YYYY-MM-DD`).
    pub last_update: Option<String>,
}

impl PlanetRecord {
    /// Record with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_unique() {
        let mut sorted = COLUMNS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), COLUMNS.len());
    }

    #[test]
    fn test_named_leaves_optional_fields_empty() {
        let record = PlanetRecord::named("Kepler-22 b");
        assert_eq!(record.name, "Kepler-22 b");
        assert!(record.orbital_period_days.is_none());
        assert!(record.radius_earth_radii.is_none());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let record: PlanetRecord =
            serde_json::from_str(r#"{"name":"TOI-700 d","orbital_period_days":37.42}"#).unwrap();
        assert_eq!(record.name, "TOI-700 d");
        assert_eq!(record.orbital_period_days, Some(37.42));
        assert!(record.mass_earth.is_none());
    }
}
