//! Implementation of the `month` command.

use anyhow::{Context, Result};
use chrono::Datelike;

use crate::args::RunOptions;
use crate::common::utils::format_hours_minutes;
use crate::sky::SunState;
use crate::stargazing::evaluate_day;

/// Handle the `month` command: per-day dark hours and qualification for one month.
pub fn handle_month_command(options: &RunOptions, year: i32, month: u32) -> Result<()> {
    let context = super::prepare(options)?;
    let criterion = context.config.criterion()?;
    let result = super::year::compute_configured_year(&context, year)?;
    let view = result.month(month)?;

    if options.json {
        println!(
            "{}",
            serde_json::to_string(&view).context("Failed to serialize month view")?
        );
        return Ok(());
    }

    log_block_start!(
        "{} {} at {}",
        view.month_name,
        year,
        context.location.name()
    );
    log_indented!(
        "Window: {} to {} ({} samples)",
        view.window_start,
        view.window_end,
        view.samples.len()
    );
    log_indented!(
        "Intervals: {} sun, {} moon, {} dark",
        view.conditions.sun.len(),
        view.conditions.moon.len(),
        view.conditions.sky.len()
    );

    log_block_start!("Date        Night     Dark sky  Stargazing");
    for (date, day) in result.days().filter(|(date, _)| date.month() == month) {
        log_indented!(
            "{}  {:<9} {:<9} {}",
            date,
            format_hours_minutes(day.sun_state_duration(SunState::Night)),
            format_hours_minutes(day.dark_duration()),
            if evaluate_day(day, &criterion) {
                "yes"
            } else {
                "-"
            }
        );
    }

    log_end!();
    Ok(())
}
