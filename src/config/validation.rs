//! Configuration validation functionality.
//!
//! Rejects values outside the supported ranges before anything is computed.

use anyhow::Result;

use super::Config;
use crate::common::constants::*;

/// Validate every field that is present in the configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(timestep) = config.timestep_minutes
        && !(MINIMUM_TIMESTEP_MINUTES..=MAXIMUM_TIMESTEP_MINUTES).contains(&timestep)
    {
        anyhow::bail!(
            "timestep_minutes ({}) must be between {} and {} minutes",
            timestep,
            MINIMUM_TIMESTEP_MINUTES,
            MAXIMUM_TIMESTEP_MINUTES
        );
    }

    if let Some(workers) = config.workers
        && workers > MAXIMUM_WORKERS
    {
        anyhow::bail!(
            "workers ({}) must be between 0 and {}",
            workers,
            MAXIMUM_WORKERS
        );
    }

    if let Some(duration) = config.min_duration_minutes
        && !(MINIMUM_DURATION_MINUTES..=MAXIMUM_DURATION_MINUTES).contains(&duration)
    {
        anyhow::bail!(
            "min_duration_minutes ({}) must be between {} and {} minutes",
            duration,
            MINIMUM_DURATION_MINUTES,
            MAXIMUM_DURATION_MINUTES
        );
    }

    for (field, value) in [
        ("range_start_hours", config.range_start_hours),
        ("range_end_hours", config.range_end_hours),
    ] {
        if let Some(hours) = value
            && !(MINIMUM_RANGE_HOURS..=MAXIMUM_RANGE_HOURS).contains(&hours)
        {
            anyhow::bail!(
                "{} ({}) must be between {} and {} hours",
                field,
                hours,
                MINIMUM_RANGE_HOURS,
                MAXIMUM_RANGE_HOURS
            );
        }
    }

    let (start, end) = config.range_hours();
    if end <= start {
        anyhow::bail!(
            "range_end_hours ({}) must be after range_start_hours ({})",
            end,
            start
        );
    }

    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if config.has_custom_location() {
        if config.latitude.is_none() || config.longitude.is_none() {
            anyhow::bail!("A custom location needs both latitude and longitude");
        }
        if config.timezone.is_none() {
            anyhow::bail!("A custom location needs a timezone (e.g. \"US/Eastern\")");
        }
        if config.location.is_some() {
            log_warning!("Both 'location' and coordinates are set; using the coordinates");
        }
    }

    // Unknown preset keys and timezone names surface here rather than mid-run
    config.location()?;

    Ok(())
}
