//! Default configuration file generation.
//!
//! Settings are written one per line with their comments aligned in a single
//! column, grouped under `#[Section]` headers.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::common::constants::*;
use crate::location::preset_keys;

/// Create a default configuration file at `path`, creating parent directories.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, default_config_content()).context("Failed to write default config file")?;
    Ok(())
}

/// Contents of a freshly generated configuration file.
pub fn default_config_content() -> String {
    let locations = preset_keys()
        .map(|key| format!("\"{key}\""))
        .collect::<Vec<_>>()
        .join(", ");

    ConfigBuilder::new()
        .add_section("Location")
        .add_setting(
            "location",
            &format!("\"{DEFAULT_LOCATION}\""),
            &format!("Built-in location: {locations}"),
        )
        .add_section("Sampling")
        .add_setting(
            "timestep_minutes",
            &DEFAULT_TIMESTEP_MINUTES.to_string(),
            &format!(
                "Sampling step in minutes ({MINIMUM_TIMESTEP_MINUTES}-{MAXIMUM_TIMESTEP_MINUTES})"
            ),
        )
        .add_setting(
            "workers",
            &DEFAULT_WORKERS.to_string(),
            &format!("Year computation threads (0 = sequential, up to {MAXIMUM_WORKERS})"),
        )
        .add_section("Stargazing")
        .add_setting(
            "min_duration_minutes",
            &DEFAULT_MIN_DURATION_MINUTES.to_string(),
            &format!(
                "Minimum continuous dark sky in minutes ({MINIMUM_DURATION_MINUTES}-{MAXIMUM_DURATION_MINUTES})"
            ),
        )
        .add_setting(
            "range_start_hours",
            &format!("{DEFAULT_RANGE_START_HOURS:.1}"),
            &format!(
                "Allowable range start, hours from local midnight ({MINIMUM_RANGE_HOURS}-{MAXIMUM_RANGE_HOURS})"
            ),
        )
        .add_setting(
            "range_end_hours",
            &format!("{DEFAULT_RANGE_END_HOURS:.1}"),
            &format!(
                "Allowable range end, hours from local midnight ({MINIMUM_RANGE_HOURS}-{MAXIMUM_RANGE_HOURS})"
            ),
        )
        .build()
}

/// Builder for configuration files with aligned comments.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        // One space between the widest setting and its comment
        let column = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut lines = Vec::new();
        for entry in self.entries {
            match entry {
                ConfigEntry::Section(header) => {
                    if !lines.is_empty() {
                        lines.push(String::new());
                    }
                    lines.push(header);
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(column - line.len());
                    lines.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        let mut content = lines.join("\n");
        content.push('\n');
        content
    }
}
