//! Sun and moon ephemeris.
//!
//! The sky pipeline only ever talks to the [`Ephemeris`] trait: elevation of
//! the sun and the moon for an observer at a UTC instant, plus the moon's
//! phase. Any source that can answer those three questions can drive it.
//!
//! ## Module Structure
//!
//! - [`lunar`]: truncated lunar theory for the moon's position and phase
//!
//! [`LowPrecisionEphemeris`] takes the sun from the NREL solar position
//! algorithm in `solar_positioning` and the moon from [`lunar`]. The moon is
//! good to a fraction of a degree over the present century, which is far
//! below the width of any twilight band. Neither applies atmospheric
//! refraction.

pub mod lunar;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use solar_positioning::{spa, time::DeltaT};

/// Geographic position of the observer in degrees (east and north positive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub latitude: f64,
    pub longitude: f64,
}

/// Source of sun and moon positions.
///
/// Implementations must be thread-safe because year computations may query
/// them from a worker pool.
#[cfg_attr(test, mockall::automock)]
pub trait Ephemeris: Send + Sync {
    /// Sun elevation above the horizon in degrees.
    fn sun_elevation(&self, observer: &Observer, instant: DateTime<Utc>) -> Result<f64>;

    /// Moon elevation above the horizon in degrees.
    fn moon_elevation(&self, observer: &Observer, instant: DateTime<Utc>) -> Result<f64>;

    /// Moon phase on a 28-unit cycle: 0 new, 7 first quarter, 14 full, 21 last quarter.
    fn moon_phase(&self, instant: DateTime<Utc>) -> Result<f64>;
}

/// Built-in ephemeris backed by the SPA sun position and [`lunar`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LowPrecisionEphemeris;

impl LowPrecisionEphemeris {
    pub fn new() -> Self {
        Self
    }
}

impl Ephemeris for LowPrecisionEphemeris {
    fn sun_elevation(&self, observer: &Observer, instant: DateTime<Utc>) -> Result<f64> {
        let delta_t = DeltaT::estimate_from_date_like(instant)
            .with_context(|| format!("No delta T estimate for {instant}"))?;
        // Geometric position: elevation 0 m, no refraction correction
        let position = spa::solar_position(
            instant,
            observer.latitude,
            observer.longitude,
            0.0,
            delta_t,
            None,
        )
        .with_context(|| format!("Solar position failed for {instant}"))?;
        Ok(position.elevation_angle())
    }

    fn moon_elevation(&self, observer: &Observer, instant: DateTime<Utc>) -> Result<f64> {
        Ok(lunar::moon_elevation(
            instant,
            observer.latitude,
            observer.longitude,
        ))
    }

    fn moon_phase(&self, instant: DateTime<Utc>) -> Result<f64> {
        Ok(lunar::moon_phase(instant))
    }
}

/// Julian Date of a UTC instant.
pub(crate) fn julian_date(instant: DateTime<Utc>) -> f64 {
    let seconds = instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) * 1e-9;
    seconds / 86_400.0 + 2_440_587.5
}

/// Julian centuries since J2000.0.
pub(crate) fn julian_century(jd: f64) -> f64 {
    (jd - 2_451_545.0) / 36_525.0
}

pub(crate) fn normalize_degrees(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}
