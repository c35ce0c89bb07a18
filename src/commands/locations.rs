//! Implementation of the `locations` command.

use anyhow::Result;

use crate::location::presets;

/// List the built-in locations.
pub fn handle_locations_command(debug_enabled: bool) -> Result<()> {
    log_version!();
    log_block_start!("Built-in locations:");
    for (key, location) in presets()? {
        log_indented!(
            "{:<10} {}, {} ({:.4}°, {:.4}°)",
            key,
            location.name(),
            location.region(),
            location.latitude(),
            location.longitude()
        );
        if debug_enabled {
            log_indented!("{:<10} Timezone: {}", "", location.timezone());
        }
    }
    log_pipe!();
    log_info!("Use 'stargazer --location <key> <COMMAND>' or set location in stargazer.toml");
    log_end!();
    Ok(())
}
