//! Period and radius mappings. Pure functions, f64 throughout.

/// Angular speed (rad per time unit) at the shortest period.
pub const MAX_ANGULAR_SPEED: f64 = 0.05;
/// Angular speed (rad per time unit) at the longest period.
pub const MIN_ANGULAR_SPEED: f64 = 0.005;

/// Period substituted when the catalog value is missing or invalid.
pub const DEFAULT_PERIOD_DAYS: f64 = 365.0;
pub const MIN_PERIOD_DAYS: f64 = 1.0;
pub const MAX_PERIOD_DAYS: f64 = 1000.0;

/// Display radius substituted when the catalog radius is missing or invalid.
pub const DEFAULT_DISPLAY_RADIUS: f64 = 0.5;

/// Period used for animation: defaulted, then clamped to `[1, 1000]` days.
pub fn effective_period(period_days: Option<f64>) -> f64 {
    let period = match period_days {
        Some(p) if p > 0.0 => p, // NaN fails the comparison
        _ => DEFAULT_PERIOD_DAYS,
    };
    period.clamp(MIN_PERIOD_DAYS, MAX_PERIOD_DAYS)
}

/// Log-scaled angular speed for a catalog orbital period.
///
/// Non-increasing in the period, `MAX_ANGULAR_SPEED` at 1 day and
/// `MIN_ANGULAR_SPEED` at 1000 days.
pub fn angular_speed(period_days: Option<f64>) -> f64 {
    let normalized = effective_period(period_days).log10() / MAX_PERIOD_DAYS.log10();
    MAX_ANGULAR_SPEED - normalized * (MAX_ANGULAR_SPEED - MIN_ANGULAR_SPEED)
}

/// Rendered sphere radius: half the catalog radius in Earth radii.
pub fn display_radius(radius_earth_radii: Option<f64>) -> f64 {
    match radius_earth_radii {
        Some(r) if r > 0.0 && r.is_finite() => r / 2.0,
        _ => DEFAULT_DISPLAY_RADIUS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_speed_at_bounds() {
        assert!((angular_speed(Some(1.0)) - 0.05).abs() < EPS);
        assert!((angular_speed(Some(1000.0)) - 0.005).abs() < EPS);
    }

    #[test]
    fn test_speed_non_increasing_over_range() {
        let mut prev = angular_speed(Some(1.0));
        let mut period = 1.0;
        while period <= 1000.0 {
            let speed = angular_speed(Some(period));
            assert!(speed <= prev + EPS, "speed rose at period {period}");
            prev = speed;
            period += 0.5;
        }
    }

    #[test]
    fn test_invalid_period_uses_one_year() {
        let year = angular_speed(Some(365.0));
        assert_eq!(angular_speed(None), year);
        assert_eq!(angular_speed(Some(0.0)), year);
        assert_eq!(angular_speed(Some(-12.0)), year);
        assert_eq!(angular_speed(Some(f64::NAN)), year);
    }

    #[test]
    fn test_period_is_clamped() {
        assert_eq!(angular_speed(Some(2000.0)), angular_speed(Some(1000.0)));
        assert_eq!(angular_speed(Some(0.5)), angular_speed(Some(1.0)));
        assert_eq!(effective_period(Some(f64::INFINITY)), MAX_PERIOD_DAYS);
    }

    #[test]
    fn test_speed_stays_in_range() {
        for p in [1e-9, 0.3, 3.0, 88.0, 365.25, 999.9, 1e9] {
            let speed = angular_speed(Some(p));
            assert!((MIN_ANGULAR_SPEED - EPS..=MAX_ANGULAR_SPEED + EPS).contains(&speed));
        }
    }

    #[test]
    fn test_display_radius() {
        assert_eq!(display_radius(Some(0.0)), 0.5);
        assert_eq!(display_radius(None), 0.5);
        assert_eq!(display_radius(Some(-1.0)), 0.5);
        assert_eq!(display_radius(Some(f64::NAN)), 0.5);
        assert_eq!(display_radius(Some(4.0)), 2.0);
        assert_eq!(display_radius(Some(1.0)), 0.5);
    }
}
