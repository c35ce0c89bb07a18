//! Command-line argument parsing and processing.
//!
//! Options may appear anywhere on the command line. The first non-option
//! argument names the command and the ones after it are its arguments.
//! Unknown options or malformed values are reported with a warning and turn
//! into [`CliAction::ShowHelpDueToError`].

use chrono::NaiveDate;

/// Options shared by the computing commands.
///
/// Every value here overrides the corresponding configuration field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOptions {
    pub debug_enabled: bool,
    pub config_dir: Option<String>,
    pub location: Option<String>,
    pub timestep_minutes: Option<u32>,
    pub workers: Option<usize>,
    pub min_duration_minutes: Option<u32>,
    pub range_hours: Option<(f64, f64)>,
    pub json: bool,
    pub log_file: Option<String>,
}

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Compute one day (today in the location's timezone when no date is given)
    Day {
        options: RunOptions,
        date: Option<NaiveDate>,
    },
    /// Compute a year and its stargazing calendar (current year when omitted)
    Year {
        options: RunOptions,
        year: Option<i32>,
    },
    /// Compute the month view of one month
    Month {
        options: RunOptions,
        year: i32,
        month: u32,
    },
    /// List the built-in locations
    Locations { debug_enabled: bool },
    /// Detailed help for one command, or the command overview
    Help { command: Option<String> },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

fn usage_error(message: &str) -> ParsedArgs {
    log_warning!("{}", message);
    ParsedArgs {
        action: CliAction::ShowHelpDueToError,
    }
}

/// Parse a `<start>-<end>` range in hours from local midnight, e.g. `16-26` or `18.5-30`.
pub fn parse_range(value: &str) -> Option<(f64, f64)> {
    let (start, end) = value.split_once('-')?;
    let start = start.trim().parse::<f64>().ok()?;
    let end = end.trim().parse::<f64>().ok()?;
    (start.is_finite() && end.is_finite()).then_some((start, end))
}

/// Parse a `YYYY-MM` month.
pub fn parse_year_month(value: &str) -> Option<(i32, u32)> {
    let (year, month) = value.split_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|_| (year, month))
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    ///
    /// # Returns
    /// ParsedArgs containing the determined action
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = RunOptions::default();
        let mut display_help = false;
        let mut display_version = false;
        let mut positional: Vec<String> = Vec::new();

        // Convert to vector for easier indexed access
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let mut i = 0;
        while i < args_vec.len() {
            let arg = args_vec[i].as_str();

            // Options that take a value consume the next argument
            let takes_value = matches!(
                arg,
                "--config"
                    | "-c"
                    | "--location"
                    | "-l"
                    | "--timestep"
                    | "-t"
                    | "--workers"
                    | "-w"
                    | "--min-duration"
                    | "-m"
                    | "--range"
                    | "-r"
                    | "--log-file"
            );
            let value = if takes_value {
                match args_vec.get(i + 1) {
                    Some(value) if !value.starts_with('-') => {
                        i += 1;
                        Some(value.as_str())
                    }
                    _ => return usage_error(&format!("Missing value for {arg}")),
                }
            } else {
                None
            };

            match (arg, value) {
                ("--help" | "-h", _) => display_help = true,
                ("--version" | "-V" | "-v", _) => display_version = true,
                ("--debug" | "-d", _) => options.debug_enabled = true,
                ("--json" | "-j", _) => options.json = true,
                ("--config" | "-c", Some(dir)) => options.config_dir = Some(dir.to_string()),
                ("--location" | "-l", Some(key)) => options.location = Some(key.to_string()),
                ("--log-file", Some(path)) => options.log_file = Some(path.to_string()),
                ("--timestep" | "-t", Some(raw)) => match raw.parse::<u32>() {
                    Ok(step) => options.timestep_minutes = Some(step),
                    Err(_) => return usage_error(&format!("Invalid timestep: {raw}")),
                },
                ("--workers" | "-w", Some(raw)) => match raw.parse::<usize>() {
                    Ok(workers) => options.workers = Some(workers),
                    Err(_) => return usage_error(&format!("Invalid worker count: {raw}")),
                },
                ("--min-duration" | "-m", Some(raw)) => match raw.parse::<u32>() {
                    Ok(minutes) => options.min_duration_minutes = Some(minutes),
                    Err(_) => return usage_error(&format!("Invalid minimum duration: {raw}")),
                },
                ("--range" | "-r", Some(raw)) => match parse_range(raw) {
                    Some(range) => options.range_hours = Some(range),
                    None => {
                        return usage_error(&format!(
                            "Invalid range: {raw}. Usage: --range <start>-<end> (e.g. 16-26)"
                        ));
                    }
                },
                _ if arg.starts_with('-') => {
                    return usage_error(&format!("Unknown option: {arg}"));
                }
                _ => positional.push(arg.to_string()),
            }
            i += 1;
        }

        // Version and help flags take precedence over commands
        if display_version {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if display_help {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let Some((command, command_args)) = positional.split_first() else {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        };

        let max_args = match command.as_str() {
            "day" | "d" | "year" | "y" | "month" | "m" | "help" | "h" => 1,
            _ => 0,
        };
        if command_args.len() > max_args {
            return usage_error(&format!(
                "Unexpected argument for {}: {}",
                command, command_args[max_args]
            ));
        }
        let command_arg = command_args.first().map(String::as_str);

        let action = match command.as_str() {
            "day" | "d" => match command_arg.map(|raw| (raw, raw.parse::<NaiveDate>())) {
                None => CliAction::Day {
                    options,
                    date: None,
                },
                Some((_, Ok(date))) => CliAction::Day {
                    options,
                    date: Some(date),
                },
                Some((raw, Err(_))) => {
                    return usage_error(&format!(
                        "Invalid date: {raw}. Usage: stargazer day [YYYY-MM-DD]"
                    ));
                }
            },
            "year" | "y" => match command_arg.map(|raw| (raw, raw.parse::<i32>())) {
                None => CliAction::Year {
                    options,
                    year: None,
                },
                Some((_, Ok(year))) => CliAction::Year {
                    options,
                    year: Some(year),
                },
                Some((raw, Err(_))) => {
                    return usage_error(&format!(
                        "Invalid year: {raw}. Usage: stargazer year [YYYY]"
                    ));
                }
            },
            "month" | "m" => match command_arg.and_then(parse_year_month) {
                Some((year, month)) => CliAction::Month {
                    options,
                    year,
                    month,
                },
                None => {
                    return usage_error("Missing or invalid month. Usage: stargazer month <YYYY-MM>");
                }
            },
            "locations" | "l" => CliAction::Locations {
                debug_enabled: options.debug_enabled,
            },
            "help" | "h" => CliAction::Help {
                command: command_arg.map(str::to_string),
            },
            unknown => return usage_error(&format!("Unknown command: {unknown}")),
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    crate::logger::write_output(&format!("┗ {}\n", env!("CARGO_PKG_DESCRIPTION")));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("stargazer [OPTIONS] <COMMAND>");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>        Use custom configuration directory");
    log_indented!("-l, --location <key>      Use a built-in location (see 'stargazer locations')");
    log_indented!("-t, --timestep <min>      Sampling step in minutes");
    log_indented!("-w, --workers <n>         Threads for year computation (0 = sequential)");
    log_indented!("-m, --min-duration <min>  Minimum continuous dark sky in minutes");
    log_indented!("-r, --range <start>-<end> Allowable hours from local midnight (e.g. 16-26)");
    log_indented!("-j, --json                Print results as JSON");
    log_indented!("    --log-file <path>     Write log output to a file instead of the terminal");
    log_indented!("-d, --debug               Enable detailed debug output");
    log_indented!("-h, --help                Print help information");
    log_indented!("-V, --version             Print version information");
    log_block_start!("Commands:");
    log_indented!("day, d [YYYY-MM-DD]       Sky conditions for one day");
    log_indented!("year, y [YYYY]            Stargazing calendar for a year");
    log_indented!("month, m <YYYY-MM>        Day-by-day summary for one month");
    log_indented!("locations, l              List built-in locations");
    log_indented!("help, h [COMMAND]         Show detailed help for a command");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        crate::logger::Log::set_enabled(false);
        ParsedArgs::parse(args.iter().copied()).action
    }

    #[test]
    fn test_parse_no_args_shows_help() {
        assert_eq!(parse(&["stargazer"]), CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_help_and_version_flags() {
        assert_eq!(parse(&["stargazer", "--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["stargazer", "-h"]), CliAction::ShowHelp);
        assert_eq!(parse(&["stargazer", "--version"]), CliAction::ShowVersion);
        assert_eq!(parse(&["stargazer", "-V"]), CliAction::ShowVersion);
        assert_eq!(parse(&["stargazer", "-v"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_version_takes_precedence() {
        assert_eq!(
            parse(&["stargazer", "day", "--version", "--help", "--debug"]),
            CliAction::ShowVersion
        );
        assert_eq!(parse(&["stargazer", "year", "-h"]), CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_day_without_date() {
        assert_eq!(
            parse(&["stargazer", "day"]),
            CliAction::Day {
                options: RunOptions::default(),
                date: None
            }
        );
    }

    #[test]
    fn test_parse_day_with_date_and_options() {
        let action = parse(&[
            "stargazer",
            "-d",
            "day",
            "2024-06-21",
            "--location",
            "honolulu",
            "--timestep",
            "5",
            "--json",
        ]);
        assert_eq!(
            action,
            CliAction::Day {
                options: RunOptions {
                    debug_enabled: true,
                    location: Some("honolulu".to_string()),
                    timestep_minutes: Some(5),
                    json: true,
                    ..RunOptions::default()
                },
                date: NaiveDate::from_ymd_opt(2024, 6, 21),
            }
        );
    }

    #[test]
    fn test_parse_day_invalid_date() {
        assert_eq!(
            parse(&["stargazer", "day", "2024-02-30"]),
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn test_parse_year_with_stargazing_options() {
        let action = parse(&[
            "stargazer",
            "year",
            "2025",
            "-w",
            "8",
            "--min-duration",
            "90",
            "--range",
            "18.5-30",
            "--config",
            "/tmp/stargazer",
        ]);
        assert_eq!(
            action,
            CliAction::Year {
                options: RunOptions {
                    config_dir: Some("/tmp/stargazer".to_string()),
                    workers: Some(8),
                    min_duration_minutes: Some(90),
                    range_hours: Some((18.5, 30.0)),
                    ..RunOptions::default()
                },
                year: Some(2025),
            }
        );
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(
            parse(&["stargazer", "month", "2024-02"]),
            CliAction::Month {
                options: RunOptions::default(),
                year: 2024,
                month: 2
            }
        );
        assert_eq!(
            parse(&["stargazer", "month", "2024-13"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(parse(&["stargazer", "month"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_locations_and_help_commands() {
        assert_eq!(
            parse(&["stargazer", "locations", "--debug"]),
            CliAction::Locations {
                debug_enabled: true
            }
        );
        assert_eq!(
            parse(&["stargazer", "help", "year"]),
            CliAction::Help {
                command: Some("year".to_string())
            }
        );
        assert_eq!(
            parse(&["stargazer", "help"]),
            CliAction::Help { command: None }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse(&["stargazer", "--unknown"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["stargazer", "observe"]), CliAction::ShowHelpDueToError);
        assert_eq!(
            parse(&["stargazer", "day", "--timestep"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            parse(&["stargazer", "day", "--timestep", "three"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            parse(&["stargazer", "year", "2024", "2025"]),
            CliAction::ShowHelpDueToError
        );
        assert_eq!(
            parse(&["stargazer", "locations", "extra"]),
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("16-26"), Some((16.0, 26.0)));
        assert_eq!(parse_range("18.5-30.25"), Some((18.5, 30.25)));
        assert_eq!(parse_range("16"), None);
        assert_eq!(parse_range("a-b"), None);
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(parse_year_month("2024-12"), Some((2024, 12)));
        assert_eq!(parse_year_month("2024-00"), None);
        assert_eq!(parse_year_month("202412"), None);
    }
}
