//! Configuration system for stargazer.
//!
//! Settings are read from `stargazer.toml` in `$XDG_CONFIG_HOME/stargazer/`
//! (or the directory given with `--config`). A commented default file is
//! written the first time the default location is loaded.
//!
//! ```toml
//! #[Location]
//! location = "lincoln"       # Built-in location: "lincoln", "honolulu", "jackson"
//!
//! #[Sampling]
//! timestep_minutes = 3       # Sampling step in minutes (1-60)
//! workers = 0                # Year computation threads (0 = sequential, up to 256)
//!
//! #[Stargazing]
//! min_duration_minutes = 60  # Minimum continuous dark sky in minutes (15-360)
//! range_start_hours = 16.0   # Allowable range start, hours from local midnight (12-36)
//! range_end_hours = 26.0     # Allowable range end, hours from local midnight (12-36)
//! ```
//!
//! Instead of `location`, a custom place can be given with `name`, `region`,
//! `timezone`, `latitude` and `longitude`. Explicit coordinates take precedence
//! over the preset key.
//!
//! Command-line options override individual fields after loading.

pub mod builder;
pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::common::constants::*;
use crate::common::utils::{format_clock_range, format_duration_minutes};
use crate::location::{self, Location};
use crate::stargazing::StargazingCriterion;

pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Configuration structure for stargazer settings.
///
/// Every field is optional; missing values fall back to the defaults in
/// `common::constants`.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Built-in location key.
    pub location: Option<String>,

    // Custom location fields, used together when `latitude`/`longitude` are set
    pub name: Option<String>,
    pub region: Option<String>,
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Sampling step in minutes.
    pub timestep_minutes: Option<u32>,
    /// Thread pool size for year computation (0 = sequential).
    pub workers: Option<usize>,

    /// Minimum continuous dark-sky duration in minutes.
    pub min_duration_minutes: Option<u32>,
    /// Allowable range start, in hours from local midnight.
    pub range_start_hours: Option<f64>,
    /// Allowable range end, in hours from local midnight (may exceed 24).
    pub range_end_hours: Option<f64>,
}

impl Config {
    /// Load configuration using automatic path detection.
    pub fn load() -> Result<Self> {
        loading::load()
    }

    /// Load configuration from a specific path without creating it.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        loading::load_from_path(path)
    }

    /// Get the configuration file path.
    pub fn get_config_path() -> Result<PathBuf> {
        loading::get_config_path()
    }

    /// Whether the config describes a custom location rather than a preset.
    pub fn has_custom_location(&self) -> bool {
        self.latitude.is_some() || self.longitude.is_some()
    }

    /// Resolve the configured location.
    pub fn location(&self) -> Result<Location> {
        if self.has_custom_location() {
            let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
                anyhow::bail!("A custom location needs both latitude and longitude");
            };
            let timezone = self
                .timezone
                .as_deref()
                .context("A custom location needs a timezone (e.g. \"US/Eastern\")")?;
            return Location::new(
                self.name.as_deref().unwrap_or("Custom location"),
                self.region.as_deref().unwrap_or(""),
                timezone,
                latitude,
                longitude,
            );
        }

        location::preset(self.location.as_deref().unwrap_or(DEFAULT_LOCATION))
    }

    pub fn timestep_minutes(&self) -> u32 {
        self.timestep_minutes.unwrap_or(DEFAULT_TIMESTEP_MINUTES)
    }

    pub fn workers(&self) -> usize {
        self.workers.unwrap_or(DEFAULT_WORKERS)
    }

    pub fn min_duration_minutes(&self) -> u32 {
        self.min_duration_minutes
            .unwrap_or(DEFAULT_MIN_DURATION_MINUTES)
    }

    pub fn range_hours(&self) -> (f64, f64) {
        (
            self.range_start_hours.unwrap_or(DEFAULT_RANGE_START_HOURS),
            self.range_end_hours.unwrap_or(DEFAULT_RANGE_END_HOURS),
        )
    }

    /// Build the stargazing criterion from the configured duration and range.
    pub fn criterion(&self) -> Result<StargazingCriterion> {
        let (start, end) = self.range_hours();
        StargazingCriterion::from_minutes(self.min_duration_minutes(), start, end)
    }

    /// Log the effective configuration.
    pub fn log_config(&self) {
        log_block_start!("Configuration");

        match self.location() {
            Ok(location) => {
                log_indented!("Location: {}", location);
            }
            Err(e) => {
                log_indented!("Location: invalid ({})", e);
            }
        }

        log_indented!("Timestep: {} minutes", self.timestep_minutes());
        match self.workers() {
            0 | 1 => log_indented!("Workers: sequential"),
            n => log_indented!("Workers: {}", n),
        }

        let (start, end) = self.range_hours();
        log_indented!(
            "Stargazing: {} between {}",
            format_duration_minutes(i64::from(self.min_duration_minutes())),
            format_clock_range(start, end)
        );
    }
}
