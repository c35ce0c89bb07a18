//! Moon position and phase from a truncated lunar theory.
//!
//! Only the largest periodic terms of the moon's ecliptic longitude and
//! latitude are kept, giving positions good to roughly a quarter of a degree.
//! The topocentric correction uses the mean horizontal parallax.

use chrono::{DateTime, Utc};
use std::f64::consts::PI;

use super::{julian_century, julian_date, normalize_degrees};
use crate::common::constants::MOON_PHASE_CYCLE;

const DEG: f64 = PI / 180.0;

/// Mean equatorial horizontal parallax of the moon in degrees.
const MEAN_HORIZONTAL_PARALLAX: f64 = 0.9507;

/// Fundamental lunar arguments in degrees.
struct LunarArguments {
    mean_longitude: f64,
    elongation: f64,
    sun_anomaly: f64,
    moon_anomaly: f64,
    latitude_argument: f64,
    eccentricity_factor: f64,
}

impl LunarArguments {
    fn at(t: f64) -> Self {
        Self {
            mean_longitude: normalize_degrees(218.3164477 + 481267.88123421 * t),
            elongation: normalize_degrees(297.8501921 + 445267.1114034 * t),
            sun_anomaly: normalize_degrees(357.5291092 + 35999.0502909 * t),
            moon_anomaly: normalize_degrees(134.9633964 + 477198.8675055 * t),
            latitude_argument: normalize_degrees(93.2720950 + 483202.0175233 * t),
            eccentricity_factor: 1.0 - 0.002516 * t - 0.0000074 * t * t,
        }
    }
}

/// Geocentric ecliptic position of the moon in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticPosition {
    pub longitude: f64,
    pub latitude: f64,
}

/// Moon's ecliptic longitude and latitude at Julian century `t`.
pub fn moon_ecliptic_position(t: f64) -> EclipticPosition {
    let args = LunarArguments::at(t);
    let d = args.elongation * DEG;
    let m = args.sun_anomaly * DEG;
    let mp = args.moon_anomaly * DEG;
    let f = args.latitude_argument * DEG;
    let e = args.eccentricity_factor;

    let longitude_terms = 6.288774 * mp.sin()
        + 1.274027 * (2.0 * d - mp).sin()
        + 0.658314 * (2.0 * d).sin()
        + 0.213618 * (2.0 * mp).sin()
        - 0.185116 * e * m.sin()
        - 0.114332 * (2.0 * f).sin()
        + 0.058793 * (2.0 * d - 2.0 * mp).sin()
        + 0.057066 * e * (2.0 * d - m - mp).sin()
        + 0.053322 * (2.0 * d + mp).sin()
        + 0.045758 * e * (2.0 * d - m).sin()
        - 0.040923 * e * (m - mp).sin()
        - 0.034720 * d.sin()
        - 0.030383 * e * (m + mp).sin();

    let latitude_terms = 5.128122 * f.sin()
        + 0.280602 * (mp + f).sin()
        + 0.277693 * (mp - f).sin()
        + 0.173237 * (2.0 * d - f).sin()
        + 0.055413 * (2.0 * d - mp + f).sin()
        + 0.046271 * (2.0 * d - mp - f).sin()
        + 0.032573 * (2.0 * d + f).sin()
        + 0.017198 * (2.0 * mp + f).sin();

    EclipticPosition {
        longitude: normalize_degrees(args.mean_longitude + longitude_terms),
        latitude: latitude_terms,
    }
}

/// Geometric ecliptic longitude of the sun in degrees, from its mean
/// longitude and the equation of centre. Only used to place the moon
/// relative to the sun for the phase.
fn sun_ecliptic_longitude(t: f64) -> f64 {
    let mean_longitude = 280.46646 + t * (36000.76983 + t * 0.0003032);
    let m = (357.52911 + t * (35999.05029 - t * 0.0001537)) * DEG;
    let centre = m.sin() * (1.914602 - t * (0.004817 + t * 0.000014))
        + (2.0 * m).sin() * (0.019993 - t * 0.000101)
        + (3.0 * m).sin() * 0.000289;
    normalize_degrees(mean_longitude + centre)
}

/// Greenwich mean sidereal time in degrees.
fn greenwich_sidereal_time(jd: f64, t: f64) -> f64 {
    normalize_degrees(
        280.46061837 + 360.98564736629 * (jd - 2_451_545.0) + 0.000387933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Elevation of the moon's centre in degrees, corrected for parallax but not refraction.
pub fn moon_elevation(instant: DateTime<Utc>, latitude: f64, longitude: f64) -> f64 {
    let jd = julian_date(instant);
    let t = julian_century(jd);
    let position = moon_ecliptic_position(t);

    let obliquity = (23.439291 - 0.0130042 * t) * DEG;
    let lambda = position.longitude * DEG;
    let beta = position.latitude * DEG;

    let right_ascension = (lambda.sin() * obliquity.cos() - beta.tan() * obliquity.sin())
        .atan2(lambda.cos());
    let declination = (beta.sin() * obliquity.cos()
        + beta.cos() * obliquity.sin() * lambda.sin())
    .clamp(-1.0, 1.0)
    .asin();

    let local_sidereal = greenwich_sidereal_time(jd, t) + longitude;
    let hour_angle = (local_sidereal * DEG) - right_ascension;

    let lat_r = latitude * DEG;
    let sin_alt =
        lat_r.sin() * declination.sin() + lat_r.cos() * declination.cos() * hour_angle.cos();
    let geocentric = sin_alt.clamp(-1.0, 1.0).asin() / DEG;

    geocentric - MEAN_HORIZONTAL_PARALLAX * (geocentric * DEG).cos()
}

/// Moon phase on the 28-unit cycle (0 new, 7 first quarter, 14 full, 21 last quarter).
///
/// Derived from the elongation of the moon from the sun along the ecliptic.
pub fn moon_phase(instant: DateTime<Utc>) -> f64 {
    let t = julian_century(julian_date(instant));
    let elongation =
        normalize_degrees(moon_ecliptic_position(t).longitude - sun_ecliptic_longitude(t));
    elongation / 360.0 * MOON_PHASE_CYCLE
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Distance on the phase circle, accounting for wrap-around at 28.
    fn phase_distance(a: f64, b: f64) -> f64 {
        let diff = (a - b).rem_euclid(MOON_PHASE_CYCLE);
        diff.min(MOON_PHASE_CYCLE - diff)
    }

    #[test]
    fn test_phase_at_known_lunations() {
        // New moon 2024-06-06 12:38 UTC, full moon 2024-06-22 01:08 UTC
        let new_moon = Utc.with_ymd_and_hms(2024, 6, 6, 12, 38, 0).unwrap();
        assert!(phase_distance(moon_phase(new_moon), 0.0) < 0.3);

        let full_moon = Utc.with_ymd_and_hms(2024, 6, 22, 1, 8, 0).unwrap();
        assert!(phase_distance(moon_phase(full_moon), 14.0) < 0.3);

        // First quarter 2024-06-14 05:18 UTC
        let first_quarter = Utc.with_ymd_and_hms(2024, 6, 14, 5, 18, 0).unwrap();
        assert!(phase_distance(moon_phase(first_quarter), 7.0) < 0.3);
    }

    #[test]
    fn test_phase_stays_in_cycle() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for hours in (0..24 * 60).step_by(7) {
            let phase = moon_phase(start + chrono::Duration::hours(hours));
            assert!((0.0..MOON_PHASE_CYCLE).contains(&phase));
        }
    }

    #[test]
    fn test_moon_latitude_bounded() {
        for day in 0..60 {
            let instant = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(day);
            let position = moon_ecliptic_position(julian_century(julian_date(instant)));
            assert!(position.latitude.abs() < 5.5);
        }
    }

    #[test]
    fn test_moon_rises_and_sets_within_a_day() {
        let start = Utc.with_ymd_and_hms(2024, 6, 21, 16, 0, 0).unwrap();
        let elevations: Vec<f64> = (0..=24 * 12)
            .map(|step| {
                moon_elevation(
                    start + chrono::Duration::minutes(step * 5),
                    44.0446274,
                    -71.6684211,
                )
            })
            .collect();
        let max = elevations.iter().cloned().fold(f64::MIN, f64::max);
        let min = elevations.iter().cloned().fold(f64::MAX, f64::min);
        assert!(max > 0.0 && min < 0.0, "max {max}, min {min}");
        assert!(max < 90.0 && min > -90.0);
    }
}
