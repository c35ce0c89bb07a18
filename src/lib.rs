//! # Stargazer Library
//!
//! Sun and moon sky-condition intervals for a location, and the stargazing
//! windows derived from them.
//!
//! This library exists to enable testing of the computation internals and to keep
//! CLI dispatch (main.rs) separate from application logic.
//!
//! ## Architecture
//!
//! - **Ephemeris**: `ephemeris` defines the elevation/phase seam and ships a
//!   built-in model (SPA sun, low-precision moon)
//! - **Location**: `location` holds validated coordinates, timezone and the preset catalog
//! - **Sky**: `sky` samples the noon-to-noon window, classifies every sample and
//!   segments the tracks into intervals; it also aggregates years and months
//! - **Stargazing**: `stargazing` decides which days offer a long enough dark window
//! - **Configuration**: `config` for TOML-based settings
//! - **Commands**: `commands` for CLI subcommands (day, year, month, locations, help)
//! - **Infrastructure**: logging and shared formatting helpers

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod common;
pub mod config;
pub mod ephemeris;
pub mod location;
pub mod sky;
pub mod stargazing;

pub use ephemeris::{Ephemeris, LowPrecisionEphemeris, Observer};
pub use location::Location;
pub use sky::{DayResult, YearResult, compute_day, compute_year, compute_year_with};
pub use stargazing::{StargazingCalendar, StargazingCriterion};
