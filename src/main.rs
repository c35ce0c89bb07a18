//! Main application entry point.
//!
//! Parses the command line and dispatches to the command handlers in
//! `stargazer::commands`. Errors from any command are logged once here with
//! their full context chain and turned into a failing exit code.

use stargazer::args::{self, CliAction, ParsedArgs};
use stargazer::commands;
use stargazer::common::constants::EXIT_FAILURE;
use stargazer::{log_end, log_error_exit, log_indented};

fn main() {
    // Parse command-line arguments
    let parsed_args = ParsedArgs::from_env();

    let result = match parsed_args.action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Help { command } => commands::help::run_help_command(command.as_deref()),
        CliAction::Locations { debug_enabled } => {
            commands::locations::handle_locations_command(debug_enabled)
        }
        CliAction::Day { options, date } => commands::day::handle_day_command(&options, date),
        CliAction::Year { options, year } => commands::year::handle_year_command(&options, year),
        CliAction::Month {
            options,
            year,
            month,
        } => commands::month::handle_month_command(&options, year, month),
    };

    if let Err(e) = result {
        // JSON mode silences the log stream; errors must still be seen
        stargazer::logger::Log::set_enabled(true);
        log_error_exit!("{}", e);
        for cause in e.chain().skip(1) {
            log_indented!("Caused by: {}", cause);
        }
        log_end!();
        std::process::exit(EXIT_FAILURE);
    }
}
