//! Record-to-panel field mapping.

use exo_catalog::PlanetRecord;

/// Panel labels, in the order rows are shown.
pub const FIELD_LABELS: [&str; 17] = [
    "Planet Name",
    "Planet Mass (Earth Mass)",
    "Number of Stars",
    "Number of Planets",
    "Number of Moons",
    "Discovery Year",
    "Discovery Instrument",
    "Orbital Period (days)",
    "Planet Radius [Earth Radius]",
    "Planet Density [g/cm³]",
    "Eccentricity",
    "Galactic Latitude (deg)",
    "Galactic Longitude (deg)",
    "Ecliptic Latitude (deg)",
    "Ecliptic Longitude (deg)",
    "Distance from Earth (parsecs)",
    "Date of Last Update",
];

/// One labelled value for the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelField {
    pub label: &'static str,
    pub value: String,
}

/// Display fields for `record`, skipping blank ones.
///
/// A field is blank when it is missing, an empty string, zero, or NaN.
pub fn panel_fields(record: &PlanetRecord) -> Vec<PanelField> {
    let values = [
        text(Some(&record.name)),
        real(record.mass_earth),
        integer(record.star_count),
        integer(record.planet_count),
        integer(record.moon_count),
        integer(record.discovery_year),
        text(record.discovery_instrument.as_ref()),
        real(record.orbital_period_days),
        real(record.radius_earth_radii),
        real(record.density),
        real(record.eccentricity),
        real(record.galactic_latitude),
        real(record.galactic_longitude),
        real(record.ecliptic_latitude),
        real(record.ecliptic_longitude),
        real(record.distance_parsecs),
        text(record.last_update.as_ref()),
    ];

    FIELD_LABELS
        .iter()
        .zip(values)
        .filter_map(|(&label, value)| value.map(|value| PanelField { label, value }))
        .collect()
}

/// Shortest round-tripping decimal; whole numbers print without a fraction.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn text(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

fn real(value: Option<f64>) -> Option<String> {
    value.filter(|v| *v != 0.0 && !v.is_nan()).map(format_number)
}

fn integer(value: Option<i64>) -> Option<String> {
    value.filter(|v| *v != 0).map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> PlanetRecord {
        PlanetRecord {
            name: "Kepler-452 b".to_string(),
            mass_earth: Some(3.29),
            star_count: Some(1),
            planet_count: Some(1),
            moon_count: Some(0),
            discovery_year: Some(2015),
            discovery_instrument: Some("Kepler CCD Array".to_string()),
            orbital_period_days: Some(384.843),
            radius_earth_radii: Some(1.63),
            density: None,
            eccentricity: Some(0.0),
            galactic_latitude: Some(13.4155),
            galactic_longitude: Some(77.0),
            ecliptic_latitude: Some(63.0),
            ecliptic_longitude: Some(-12.5),
            distance_parsecs: Some(551.727),
            last_update: Some("2018-09-20".to_string()),
        }
    }

    #[test]
    fn test_fields_follow_record_order() {
        let fields = panel_fields(&full_record());
        let labels: Vec<_> = fields.iter().map(|f| f.label).collect();
        assert_eq!(labels.first(), Some(&"Planet Name"));
        assert_eq!(labels.last(), Some(&"Date of Last Update"));
        let mut positions = labels
            .iter()
            .map(|l| FIELD_LABELS.iter().position(|x| x == l).unwrap());
        let mut prev = positions.next().unwrap();
        for pos in positions {
            assert!(pos > prev);
            prev = pos;
        }
    }

    #[test]
    fn test_blank_fields_omitted() {
        let fields = panel_fields(&full_record());
        let labels: Vec<_> = fields.iter().map(|f| f.label).collect();
        assert!(!labels.contains(&"Number of Moons"));
        assert!(!labels.contains(&"Eccentricity"));
        assert!(!labels.contains(&"Planet Density [g/cm³]"));
        assert_eq!(fields.len(), 14);
    }

    #[test]
    fn test_name_only_record() {
        let fields = panel_fields(&PlanetRecord::named("GJ 1214 b"));
        assert_eq!(
            fields,
            vec![PanelField {
                label: "Planet Name",
                value: "GJ 1214 b".to_string()
            }]
        );
    }

    #[test]
    fn test_values_formatted() {
        let fields = panel_fields(&full_record());
        let value_of = |label: &str| {
            fields
                .iter()
                .find(|f| f.label == label)
                .map(|f| f.value.clone())
                .unwrap()
        };
        assert_eq!(value_of("Discovery Year"), "2015");
        assert_eq!(value_of("Orbital Period (days)"), "384.843");
        assert_eq!(value_of("Galactic Longitude (deg)"), "77");
        assert_eq!(value_of("Ecliptic Longitude (deg)"), "-12.5");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-0.25), "-0.25");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }
}
