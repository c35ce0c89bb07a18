//! Observer locations and the built-in location catalog.
//!
//! A [`Location`] is validated once at construction: the timezone name must be
//! known to the tz database and the coordinates must be on the globe. After
//! that it is immutable and cheap to clone, so every day and year result can
//! carry its own copy.

use anyhow::Result;
use chrono_tz::Tz;
use serde::Serialize;

use crate::ephemeris::Observer;

/// A named place on Earth with its IANA timezone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    name: String,
    region: String,
    timezone: Tz,
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Create a location, rejecting unknown timezones and out-of-range coordinates.
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        timezone: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self> {
        let timezone: Tz = timezone
            .parse()
            .map_err(|e| anyhow::anyhow!("Unknown timezone '{timezone}': {e}"))?;

        if !(-90.0..=90.0).contains(&latitude) {
            anyhow::bail!("latitude must be between -90 and 90 degrees (got {latitude})");
        }
        if !(-180.0..=180.0).contains(&longitude) {
            anyhow::bail!("longitude must be between -180 and 180 degrees (got {longitude})");
        }

        Ok(Self {
            name: name.into(),
            region: region.into(),
            timezone,
            latitude,
            longitude,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Coordinates handed to the ephemeris.
    pub fn observer(&self) -> Observer {
        Observer {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:.4}°, {:.4}°, {})",
            self.name, self.latitude, self.longitude, self.timezone
        )
    }
}

/// Raw catalog entry; turned into a [`Location`] on lookup.
struct PresetEntry {
    key: &'static str,
    name: &'static str,
    region: &'static str,
    timezone: &'static str,
    latitude: f64,
    longitude: f64,
}

const PRESETS: &[PresetEntry] = &[
    PresetEntry {
        key: "lincoln",
        name: "Lincoln, NH",
        region: "USA",
        timezone: "US/Eastern",
        latitude: 44.0446274,
        longitude: -71.6684211,
    },
    PresetEntry {
        key: "honolulu",
        name: "Honolulu, HI",
        region: "USA",
        timezone: "US/Hawaii",
        latitude: 21.325752,
        longitude: -157.9658707,
    },
    PresetEntry {
        key: "jackson",
        name: "Jackson, WY",
        region: "USA",
        timezone: "US/Mountain",
        latitude: 43.7776542,
        longitude: -110.5576591,
    },
];

/// Keys of the built-in locations, in catalog order.
pub fn preset_keys() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|entry| entry.key)
}

/// All built-in locations with their keys.
pub fn presets() -> Result<Vec<(&'static str, Location)>> {
    PRESETS
        .iter()
        .map(|entry| Ok((entry.key, entry_to_location(entry)?)))
        .collect()
}

/// Look up a built-in location by key (case-insensitive).
pub fn preset(key: &str) -> Result<Location> {
    let entry = PRESETS
        .iter()
        .find(|entry| entry.key.eq_ignore_ascii_case(key))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown location '{key}'. Available locations: {}",
                preset_keys().collect::<Vec<_>>().join(", ")
            )
        })?;
    entry_to_location(entry)
}

fn entry_to_location(entry: &PresetEntry) -> Result<Location> {
    Location::new(
        entry.name,
        entry.region,
        entry.timezone,
        entry.latitude,
        entry.longitude,
    )
}
