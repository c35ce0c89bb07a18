//! Implementation of the `day` command.
//!
//! Computes the sun, moon and dark-sky intervals of one noon-to-noon window
//! and reports whether the night offers a stargazing window.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::args::RunOptions;
use crate::common::utils::{format_clock_range, format_duration_minutes, format_hours_minutes};
use crate::ephemeris::LowPrecisionEphemeris;
use crate::location::Location;
use crate::sky::{ConditionInterval, ConditionState, DayResult, SunState, compute_day};
use crate::stargazing::{StargazingCriterion, best_window, evaluate_day};

/// Handle the `day` command.
pub fn handle_day_command(options: &RunOptions, date: Option<NaiveDate>) -> Result<()> {
    let context = super::prepare(options)?;
    let location = &context.location;
    let date = date.unwrap_or_else(|| Utc::now().with_timezone(&location.timezone()).date_naive());

    let day = compute_day(
        &LowPrecisionEphemeris::new(),
        location,
        date,
        context.config.timestep_minutes(),
    )?;

    if options.json {
        println!(
            "{}",
            day.to_json_pretty()
                .context("Failed to serialize day result")?
        );
        return Ok(());
    }

    let criterion = context.config.criterion()?;
    display_day(&day, &criterion);

    if options.debug_enabled {
        log_reference_times(location, date)?;
    }

    log_end!();
    Ok(())
}

fn clock(timestamp: NaiveDateTime) -> String {
    timestamp.format("%m-%d %H:%M").to_string()
}

fn log_interval<S: ConditionState>(interval: &ConditionInterval<S>) {
    let duration = format_duration_minutes(interval.duration().num_minutes());
    match interval.brightness {
        Some(brightness) => log_indented!(
            "{} - {}  {:<22} {} (brightness {:.0}%)",
            clock(interval.start),
            clock(interval.end),
            interval.state.label(),
            duration,
            brightness * 100.0
        ),
        None => log_indented!(
            "{} - {}  {:<22} {}",
            clock(interval.start),
            clock(interval.end),
            interval.state.label(),
            duration
        ),
    }
}

/// Log a day result in the block layout used by all commands.
pub fn display_day(day: &DayResult, criterion: &StargazingCriterion) {
    log_block_start!("Sky conditions for {} at {}", day.date(), day.location());
    log_indented!(
        "Window: {} to {} ({} samples)",
        day.window_start(),
        day.window_end(),
        day.samples().len()
    );

    log_block_start!("Sun:");
    day.sun_intervals().iter().for_each(log_interval);
    log_indented!(
        "Night: {}",
        format_hours_minutes(day.sun_state_duration(SunState::Night))
    );

    log_block_start!("Moon:");
    day.moon_intervals().iter().for_each(log_interval);

    log_block_start!("Dark sky:");
    if day.dark_intervals().is_empty() {
        log_indented!("No dark sky in this window");
    } else {
        day.dark_intervals().iter().for_each(log_interval);
        log_indented!("Total: {}", format_hours_minutes(day.dark_duration()));
    }

    let range = format_clock_range(criterion.range_start_hours(), criterion.range_end_hours());
    if evaluate_day(day, criterion) {
        log_block_start!(
            "Good for stargazing: at least {} of dark sky between {}",
            format_hours_minutes(criterion.min_duration()),
            range
        );
    } else {
        log_block_start!(
            "Not a stargazing night: no {} stretch of dark sky between {}",
            format_hours_minutes(criterion.min_duration()),
            range
        );
    }
    if let Some((start, end)) = best_window(day, criterion) {
        log_indented!(
            "Longest window: {} - {} ({})",
            clock(start),
            clock(end),
            format_hours_minutes(end - start)
        );
    }
}

/// Log sunrise and sunset from the `sunrise` crate for comparison.
fn log_reference_times(location: &Location, date: NaiveDate) -> Result<()> {
    use sunrise::{Coordinates, SolarDay, SolarEvent};

    let coord = Coordinates::new(location.latitude(), location.longitude())
        .ok_or_else(|| anyhow::anyhow!("Invalid coordinates"))?;
    let solar_day = SolarDay::new(coord, date);
    let tz = location.timezone();
    let sunrise = solar_day.event_time(SolarEvent::Sunrise).with_timezone(&tz);
    let sunset = solar_day.event_time(SolarEvent::Sunset).with_timezone(&tz);

    log_pipe!();
    log_debug!("Reference times (sunrise crate, refraction-corrected):");
    log_indented!("Sunrise: {}", sunrise.format("%Y-%m-%d %H:%M %Z"));
    log_indented!("Sunset: {}", sunset.format("%Y-%m-%d %H:%M %Z"));
    Ok(())
}
