//! Implementation of the `year` command.
//!
//! Computes every day of a year and prints the stargazing calendar: the
//! caption describing the criterion and the qualifying dates by month.

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use std::collections::BTreeMap;

use crate::args::RunOptions;
use crate::ephemeris::LowPrecisionEphemeris;
use crate::sky::{YearOptions, YearResult, compute_year_with};
use crate::stargazing::{StargazingCalendar, evaluate_year};

/// Compute a year with the configured timestep and worker pool.
pub(crate) fn compute_configured_year(
    context: &super::CommandContext,
    year: i32,
) -> Result<YearResult> {
    compute_year_with(
        &LowPrecisionEphemeris::new(),
        &context.location,
        year,
        context.config.timestep_minutes(),
        &YearOptions::parallel(context.config.workers()),
    )
}

/// Handle the `year` command.
pub fn handle_year_command(options: &RunOptions, year: Option<i32>) -> Result<()> {
    let context = super::prepare(options)?;
    let year = year.unwrap_or_else(|| {
        Utc::now()
            .with_timezone(&context.location.timezone())
            .year()
    });

    let criterion = context.config.criterion()?;
    let result = compute_configured_year(&context, year)?;
    let calendar = evaluate_year(&result, &criterion);

    if options.json {
        println!(
            "{}",
            calendar
                .to_json()
                .context("Failed to serialize stargazing calendar")?
        );
        return Ok(());
    }

    log_block_start!("{}", calendar.summary(&context.location, &criterion));
    display_calendar(&calendar);
    log_end!();
    Ok(())
}

/// Log the qualifying dates grouped by month.
fn display_calendar(calendar: &StargazingCalendar) {
    let mut by_month: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for date in calendar.qualifying_days() {
        by_month.entry(date.month()).or_default().push(date.day());
    }

    log_block_start!(
        "{} of {} days qualify",
        calendar.count(),
        calendar.len()
    );
    for (month, days) in &by_month {
        let name = chrono::Month::try_from(*month as u8)
            .map(|m| m.name())
            .unwrap_or("?");
        let days = days
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        log_indented!("{:<10} {}", name, days);
    }
}
