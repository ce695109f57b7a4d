//! Config cartridge lifecycle.
//!
//! [`ConfigManager`] owns the settings and the cartridge they were extracted
//! from. It coordinates three collaborators supplied at construction:
//! a [`ScriptEngine`] to evaluate config scripts, a [`RootFs`] for storage and
//! a [`ConfigHost`] that is told when configuration changes.
//!
//! State moves `Uninitialized -> DefaultLoaded -> Active`. Every operation
//! runs synchronously on the calling thread; callers that share a manager
//! across threads must serialize access themselves.

use cartconf_cart::Cartridge;
use cartconf_scripting::ScriptEngine;

use crate::defaults;
use crate::error::ConfigError;
use crate::extract::{ExtractOptions, ExtractOutcome, extract};
use crate::fs::{RootFs, SaveOutcome};
use crate::settings::Settings;

/// File name of the persisted config cartridge under the storage root.
pub const CONFIG_FILE_NAME: &str = "config.tic";

/// Notifications sent to the program hosting the config.
pub trait ConfigHost {
    /// Called once at the end of [`ConfigManager::initialize`] so the host can
    /// restart itself with the loaded configuration.
    fn on_reset_to_defaults(&mut self) {}

    /// Called after every update, successful or not.
    fn on_config_changed(&mut self, settings: &Settings);
}

/// Lifecycle state of a [`ConfigManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    DefaultLoaded,
    Active,
}

pub struct ConfigManager<E, F, H> {
    engine: E,
    fs: F,
    host: H,
    options: ExtractOptions,
    cart: Cartridge,
    settings: Settings,
    state: LifecycleState,
}

impl<E, F, H> std::fmt::Debug for ConfigManager<E, F, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManager")
            .field("state", &self.state)
            .field("options", &self.options)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<E, F, H> ConfigManager<E, F, H>
where
    E: ScriptEngine,
    F: RootFs,
    H: ConfigHost,
{
    /// Create an uninitialized manager with an empty owning cartridge.
    pub fn new(engine: E, fs: F, host: H) -> Self {
        Self {
            engine,
            fs,
            host,
            options: ExtractOptions::default(),
            cart: Cartridge::default(),
            settings: Settings::default(),
            state: LifecycleState::Uninitialized,
        }
    }

    /// Override which groups extraction reads.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Establish defaults, then load the user config from storage.
    ///
    /// If no config file exists (or it cannot be read) the defaults are
    /// written out as the initial config, without replacing anything already
    /// there. Finally the host is asked to reset so it picks up the result.
    pub fn initialize(&mut self) {
        log::debug!("Initializing config");
        self.set_default();

        match self.fs.load_root(CONFIG_FILE_NAME) {
            Ok(Some(bytes)) => {
                log::info!("Loading config from {CONFIG_FILE_NAME}");
                self.update(&bytes);
            }
            Ok(None) => self.write_initial_config(),
            Err(e) => {
                log::warn!("Failed to read {CONFIG_FILE_NAME}, using defaults: {e}");
                self.write_initial_config();
            }
        }

        self.state = LifecycleState::Active;
        self.host.on_reset_to_defaults();
    }

    fn write_initial_config(&mut self) {
        log::info!("No config found, writing defaults to {CONFIG_FILE_NAME}");
        if let Err(e) = self.save(false) {
            log::error!("Failed to save default config: {e}");
        }
    }

    /// Reset settings to their fallbacks and apply the baseline cartridge.
    pub fn set_default(&mut self) {
        self.settings = Settings::default();

        match defaults::baseline_cartridge_bytes() {
            Ok(bytes) => self.update(&bytes),
            Err(e) => {
                log::error!("Failed to unpack baseline config: {e}");
                self.host.on_config_changed(&self.settings);
            }
        }

        self.state = LifecycleState::DefaultLoaded;
    }

    /// Replace the owning cartridge with `bytes` and re-extract settings.
    ///
    /// Undecodable bytes or a failing script leave the previous cartridge and
    /// settings in place. The host is notified either way.
    pub fn update(&mut self, bytes: &[u8]) {
        match Cartridge::load(bytes) {
            Ok(cart) => {
                self.cart = cart;
                self.extract_current();
            }
            Err(e) => log::warn!("Ignoring undecodable config cartridge: {e}"),
        }

        self.state = LifecycleState::Active;
        self.host.on_config_changed(&self.settings);
    }

    fn extract_current(&mut self) -> ExtractOutcome {
        extract(
            &self.engine,
            &self.cart.code,
            &mut self.settings,
            self.options,
        )
    }

    /// Serialize the owning cartridge and write it to storage.
    pub fn save(&mut self, overwrite: bool) -> Result<SaveOutcome, ConfigError> {
        let bytes = self.cart.try_save()?;
        let outcome = self.fs.save_root(CONFIG_FILE_NAME, &bytes, overwrite)?;
        log::debug!("Config save ({overwrite}): {outcome:?}");
        Ok(outcome)
    }

    /// Adopt the host's running cartridge as the config and persist it.
    pub fn persist_current_host_cartridge(
        &mut self,
        running: &Cartridge,
    ) -> Result<SaveOutcome, ConfigError> {
        self.cart = running.clone();
        self.extract_current();
        let result = self.save(true);

        self.state = LifecycleState::Active;
        self.host.on_config_changed(&self.settings);
        result
    }

    /// Discard user customization: restore defaults and overwrite storage.
    pub fn reset(&mut self) -> Result<SaveOutcome, ConfigError> {
        log::info!("Resetting config to defaults");
        self.set_default();
        let result = self.save(true);
        self.state = LifecycleState::Active;
        result
    }

    /// Re-read the config file and apply it over the baseline.
    ///
    /// Unlike [`update`](Self::update) the stored cartridge does not merge
    /// onto the current settings, so fields removed from the file fall back
    /// to their defaults exactly as on a fresh [`initialize`](Self::initialize).
    /// An empty file is taken to be mid-write and left alone. Undecodable
    /// bytes keep the current cartridge and settings. The host is notified
    /// whenever the file was applied or rejected.
    ///
    /// Returns `Ok(false)` when no config file exists or it is empty.
    pub fn reload_from_storage(&mut self) -> Result<bool, ConfigError> {
        let Some(bytes) = self.fs.load_root(CONFIG_FILE_NAME)? else {
            return Ok(false);
        };
        if bytes.is_empty() {
            log::debug!("Skipping reload of empty {CONFIG_FILE_NAME}");
            return Ok(false);
        }

        match Cartridge::load(&bytes) {
            Ok(cart) => {
                self.restore_baseline();
                self.cart = cart;
                self.extract_current();
            }
            Err(e) => log::warn!("Ignoring undecodable config cartridge: {e}"),
        }

        self.state = LifecycleState::Active;
        self.host.on_config_changed(&self.settings);
        Ok(true)
    }

    /// Fallbacks plus the baseline cartridge, without notifying or saving.
    fn restore_baseline(&mut self) {
        self.settings = Settings::default();
        match defaults::baseline_cartridge_bytes().map(|bytes| Cartridge::load(&bytes)) {
            Ok(Ok(cart)) => {
                self.cart = cart;
                self.extract_current();
            }
            Ok(Err(e)) => log::error!("Failed to decode baseline config: {e}"),
            Err(e) => log::error!("Failed to unpack baseline config: {e}"),
        }
    }

    /// Release the cartridge and settings, handing the collaborators back.
    pub fn teardown(self) -> (E, F, H) {
        log::debug!("Config teardown");
        (self.engine, self.fs, self.host)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Cartridge the current settings were extracted from.
    pub fn cartridge(&self) -> &Cartridge {
        &self.cart
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }
}
