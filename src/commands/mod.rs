//! Command-line command handlers for stargazer.
//!
//! Each command is implemented in its own submodule. The shared setup lives
//! here: logging mode, configuration loading and applying command-line
//! overrides on top of the loaded configuration.

pub mod day;
pub mod help;
pub mod locations;
pub mod month;
pub mod year;

use anyhow::{Context, Result};

use crate::args::RunOptions;
use crate::config::{self, Config};
use crate::logger::{Log, LoggerGuard};

/// Everything a computing command needs after setup.
pub struct CommandContext {
    pub config: Config,
    pub location: crate::location::Location,
    /// Keeps file logging alive for the duration of the command.
    _log_guard: Option<LoggerGuard>,
}

/// Set up logging, load the configuration and apply command-line overrides.
///
/// JSON output owns stdout, so the log stream is silenced unless it goes to a file.
pub fn prepare(options: &RunOptions) -> Result<CommandContext> {
    let log_guard = match &options.log_file {
        Some(path) => Some(Log::start_file_logging(path.clone())?),
        None => None,
    };
    if options.json && log_guard.is_none() {
        Log::set_enabled(false);
    }

    log_version!();
    if options.debug_enabled {
        log_pipe!();
        log_debug!("Debug mode enabled - showing detailed computation output");
    }

    config::set_config_dir(options.config_dir.clone())?;
    let mut config = Config::load()?;
    apply_overrides(&mut config, options).context("Invalid command-line option")?;

    let location = config.location()?;
    if options.debug_enabled {
        config.log_config();
    }

    Ok(CommandContext {
        config,
        location,
        _log_guard: log_guard,
    })
}

/// Apply command-line values over the loaded configuration and re-validate.
pub fn apply_overrides(config: &mut Config, options: &RunOptions) -> Result<()> {
    if let Some(key) = &options.location {
        // A location given on the command line replaces any custom location
        config.location = Some(key.clone());
        config.name = None;
        config.region = None;
        config.timezone = None;
        config.latitude = None;
        config.longitude = None;
    }
    if let Some(step) = options.timestep_minutes {
        config.timestep_minutes = Some(step);
    }
    if let Some(workers) = options.workers {
        config.workers = Some(workers);
    }
    if let Some(minutes) = options.min_duration_minutes {
        config.min_duration_minutes = Some(minutes);
    }
    if let Some((start, end)) = options.range_hours {
        config.range_start_hours = Some(start);
        config.range_end_hours = Some(end);
    }

    config::validation::validate_config(config)
}
