//! Config host used by the command-line tool.

use cartconf_config::{ConfigHost, Settings};

/// Records lifecycle notifications so commands can report what happened.
#[derive(Debug, Default, Clone)]
pub struct CliHost {
    /// Number of `on_config_changed` notifications received.
    pub changes: usize,
    /// Number of `on_reset_to_defaults` notifications received.
    pub resets: usize,
}

impl ConfigHost for CliHost {
    fn on_reset_to_defaults(&mut self) {
        self.resets += 1;
        log::info!("Host reset requested after config initialization");
    }

    fn on_config_changed(&mut self, settings: &Settings) {
        self.changes += 1;
        log::debug!(
            "Config changed (#{}): ui_scale={} gif={}x{} no_sound={}",
            self.changes,
            settings.ui_scale,
            settings.gif_length,
            settings.gif_scale,
            settings.no_sound
        );
    }
}
