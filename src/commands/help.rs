//! Help command implementation for stargazer.
//!
//! Dispatches to command-specific help or the command overview.

use anyhow::Result;

use crate::common::constants::*;
use crate::common::utils::format_clock_range;

/// Show brief usage for a command (used for error messages)
pub fn show_command_usage(command: &str) {
    match command {
        "day" | "d" => log_block_start!("Usage: stargazer day [OPTIONS] [YYYY-MM-DD]"),
        "year" | "y" => log_block_start!("Usage: stargazer year [OPTIONS] [YYYY]"),
        "month" | "m" => log_block_start!("Usage: stargazer month [OPTIONS] <YYYY-MM>"),
        "locations" | "l" => log_block_start!("Usage: stargazer locations"),
        _ => log_block_start!("Usage: stargazer [OPTIONS] <COMMAND>"),
    }
}

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("day") | Some("d") => display_day_help(),
        Some("year") | Some("y") => display_year_help(),
        Some("month") | Some("m") => display_month_help(),
        Some("locations") | Some("l") => display_locations_help(),
        Some("help") | Some("h") => display_help_help(),
        Some(unknown) => {
            log_warning!("Unknown command: {}", unknown);
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands (for the help command)
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("day, d [YYYY-MM-DD]    Sky conditions for one day");
    log_indented!("year, y [YYYY]         Stargazing calendar for a year");
    log_indented!("month, m <YYYY-MM>     Day-by-day summary for one month");
    log_indented!("locations, l           List built-in locations");
    log_indented!("help, h [COMMAND]      Show detailed help for a command");
    log_pipe!();
    log_info!("Use 'stargazer help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'stargazer --help' to see all options and general usage.");
    log_end!();
}

fn display_day_help() {
    log_version!();
    log_block_start!("day - Sky conditions for one day");
    show_command_usage("day");
    log_block_start!("Description:");
    log_indented!("Samples the sun and moon from local noon to the next local noon and");
    log_indented!("prints the twilight phases, moon phases and dark-sky intervals.");
    log_indented!("The date defaults to today in the location's timezone.");
    log_block_start!("Options:");
    log_indented!(
        "--timestep <min>   Sampling step ({}-{}, default {})",
        MINIMUM_TIMESTEP_MINUTES,
        MAXIMUM_TIMESTEP_MINUTES,
        DEFAULT_TIMESTEP_MINUTES
    );
    log_indented!("--json             Print the full day result, including the sample series");
    log_indented!("--debug            Also print reference sunrise and sunset times");
    log_block_start!("Examples:");
    log_indented!("stargazer day 2024-12-21");
    log_indented!("stargazer day --location jackson --json");
    log_end!();
}

fn display_year_help() {
    log_version!();
    log_block_start!("year - Stargazing calendar for a year");
    show_command_usage("year");
    log_block_start!("Description:");
    log_indented!("Computes every day of the year and marks the days with a continuous");
    log_indented!("dark sky (sun below -18°, moon below -6°) inside the allowable range.");
    log_block_start!("Options:");
    log_indented!(
        "--min-duration <min>  Minimum dark sky ({}-{}, default {})",
        MINIMUM_DURATION_MINUTES,
        MAXIMUM_DURATION_MINUTES,
        DEFAULT_MIN_DURATION_MINUTES
    );
    log_indented!(
        "--range <start>-<end> Hours from local midnight (default {})",
        format_clock_range(DEFAULT_RANGE_START_HOURS, DEFAULT_RANGE_END_HOURS)
    );
    log_indented!("--workers <n>         Compute days on n threads (0 = sequential)");
    log_block_start!("Examples:");
    log_indented!("stargazer year 2025 --min-duration 120 --range 18-28");
    log_indented!("stargazer year --workers 8 --json");
    log_end!();
}

fn display_month_help() {
    log_version!();
    log_block_start!("month - Day-by-day summary for one month");
    show_command_usage("month");
    log_block_start!("Description:");
    log_indented!("Prints night length, dark-sky time and the stargazing verdict for");
    log_indented!("every day of the month. With --json, prints the joined month view.");
    log_block_start!("Examples:");
    log_indented!("stargazer month 2024-08");
    log_end!();
}

fn display_locations_help() {
    log_version!();
    log_block_start!("locations - List built-in locations");
    show_command_usage("locations");
    log_block_start!("Description:");
    log_indented!("Lists the location keys accepted by --location and the 'location'");
    log_indented!("setting. Custom places are configured with name, region, timezone,");
    log_indented!("latitude and longitude in stargazer.toml.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: stargazer help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("stargazer help");
    log_indented!("stargazer help year");
    log_end!();
}
