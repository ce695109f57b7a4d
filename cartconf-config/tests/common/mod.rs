//! Shared integration test helpers for cartconf-config.
//!
//! Include with `mod common;` at the top of a test file.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use cartconf_cart::Cartridge;
use cartconf_config::{
    CONFIG_FILE_NAME, ConfigError, ConfigHost, ConfigManager, RootFs, SaveOutcome, Settings,
};
use cartconf_scripting::LuaEngine;

/// Host that records every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub changes: usize,
    pub resets: usize,
    pub last: Option<Settings>,
}

impl ConfigHost for RecordingHost {
    fn on_reset_to_defaults(&mut self) {
        self.resets += 1;
    }

    fn on_config_changed(&mut self, settings: &Settings) {
        self.changes += 1;
        self.last = Some(settings.clone());
    }
}

/// In-memory storage with switchable read/write failures.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: RefCell<HashMap<String, Vec<u8>>>,
    pub fail_reads: Cell<bool>,
    pub fail_writes: Cell<bool>,
    pub writes: Cell<usize>,
}

impl MemoryFs {
    pub fn with_config(bytes: Vec<u8>) -> Self {
        let fs = Self::default();
        fs.files
            .borrow_mut()
            .insert(CONFIG_FILE_NAME.to_string(), bytes);
        fs
    }

    pub fn with_config_script(source: &str) -> Self {
        Self::with_config(cartridge_bytes(source))
    }

    pub fn config(&self) -> Option<Vec<u8>> {
        self.files.borrow().get(CONFIG_FILE_NAME).cloned()
    }
}

fn io_failure(name: &str) -> ConfigError {
    ConfigError::Io {
        path: name.into(),
        source: std::io::Error::other("injected failure"),
    }
}

impl RootFs for MemoryFs {
    fn load_root(&self, name: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        if self.fail_reads.get() {
            return Err(io_failure(name));
        }
        Ok(self.files.borrow().get(name).cloned())
    }

    fn save_root(
        &self,
        name: &str,
        bytes: &[u8],
        overwrite: bool,
    ) -> Result<SaveOutcome, ConfigError> {
        if self.fail_writes.get() {
            return Err(io_failure(name));
        }
        let mut files = self.files.borrow_mut();
        if !overwrite && files.contains_key(name) {
            return Ok(SaveOutcome::Skipped);
        }
        files.insert(name.to_string(), bytes.to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(SaveOutcome::Written)
    }
}

pub type TestManager = ConfigManager<LuaEngine, MemoryFs, RecordingHost>;

pub fn manager(fs: MemoryFs) -> TestManager {
    ConfigManager::new(LuaEngine::new(), fs, RecordingHost::default())
}

pub fn initialized(fs: MemoryFs) -> TestManager {
    let mut manager = manager(fs);
    manager.initialize();
    manager
}

pub fn cartridge_bytes(source: &str) -> Vec<u8> {
    Cartridge::with_code(source)
        .try_save()
        .expect("Failed to encode test cartridge")
}

/// Settings right after `set_default`, with no user config applied.
pub fn baseline_settings() -> Settings {
    let mut manager = manager(MemoryFs::default());
    manager.set_default();
    manager.settings().clone()
}
