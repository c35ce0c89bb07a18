//! Application-wide constants.
//!
//! Classification thresholds, defaults and the validation limits applied to
//! configuration values all live here so that the library, the config layer
//! and the command handlers agree on them.

// # Sun Classification Thresholds (degrees, lower bound inclusive)

pub const SUN_DAY_THRESHOLD: f64 = 0.0;
pub const SUN_CIVIL_TWILIGHT_THRESHOLD: f64 = -6.0;
pub const SUN_NAUTICAL_TWILIGHT_THRESHOLD: f64 = -12.0;
pub const SUN_ASTRONOMICAL_TWILIGHT_THRESHOLD: f64 = -18.0;

// # Moon Classification Thresholds (degrees, lower bound inclusive)

pub const MOON_UP_THRESHOLD: f64 = 0.0;
/// Below this elevation the moon no longer brightens the sky.
pub const MOON_DARKNESS_THRESHOLD: f64 = -6.0;

// # Moon Phase

/// Length of the phase cycle in phase units (0 = new, 14 = full).
pub const MOON_PHASE_CYCLE: f64 = 28.0;
/// Marker scale applied to brightness for the sample series consumed by renderers.
pub const MOON_MARKER_SIZE: f64 = 150.0;

// # Sampling Window

/// Local wall-clock hour at which the sampling window opens and closes.
pub const WINDOW_ANCHOR_HOUR: u32 = 12;

// # Default Values

pub const DEFAULT_TIMESTEP_MINUTES: u32 = 3;
pub const DEFAULT_WORKERS: usize = 0; // sequential
pub const DEFAULT_MIN_DURATION_MINUTES: u32 = 60;
pub const DEFAULT_RANGE_START_HOURS: f64 = 16.0; // 4pm
pub const DEFAULT_RANGE_END_HOURS: f64 = 26.0; // 2am next day
pub const DEFAULT_LOCATION: &str = "lincoln";

// # Validation Limits

pub const MINIMUM_TIMESTEP_MINUTES: u32 = 1;
pub const MAXIMUM_TIMESTEP_MINUTES: u32 = 60;

pub const MINIMUM_DURATION_MINUTES: u32 = 15;
pub const MAXIMUM_DURATION_MINUTES: u32 = 360;

pub const MINIMUM_RANGE_HOURS: f64 = 12.0;
pub const MAXIMUM_RANGE_HOURS: f64 = 36.0;

pub const MAXIMUM_WORKERS: usize = 256;

// # Exit Codes

pub const EXIT_FAILURE: i32 = 1;

#[cfg(test)]
pub mod test_constants {
    // Lincoln, NH
    pub const TEST_LATITUDE: f64 = 44.0446274;
    pub const TEST_LONGITUDE: f64 = -71.6684211;
    pub const TEST_TIMEZONE: &str = "US/Eastern";
    pub const TEST_TIMESTEP: u32 = 3;
}
