//! Configuration system for cartconf.
//!
//! Configuration lives in a cartridge whose script, once executed, leaves
//! behind globals and nested tables describing the settings. This crate:
//!
//! - embeds a compressed baseline cartridge ([`defaults`])
//! - reads typed values out of script state without ever failing ([`reader`])
//! - overlays a script's values onto [`Settings`] field by field ([`extract`])
//! - owns the load/update/save/reset lifecycle ([`ConfigManager`])
//! - optionally watches the config file for external edits ([`watcher`])

pub mod defaults;
pub mod error;
pub mod extract;
pub mod fs;
pub mod manager;
pub mod reader;
pub mod settings;
#[cfg(feature = "watcher")]
pub mod watcher;

pub use error::ConfigError;
pub use extract::{ExtractOptions, ExtractOutcome, extract, patch_for_webgl};
pub use fs::{DirFs, ROOT_ENV_VAR, RootFs, SaveOutcome};
pub use manager::{CONFIG_FILE_NAME, ConfigHost, ConfigManager, LifecycleState};
pub use reader::{FieldReader, FieldType, lookup, read_field};
pub use settings::{
    CODE_COLORS, CodeTheme, CrtShader, CursorTheme, GamepadTheme, Settings, Theme, TouchTheme,
};
#[cfg(feature = "watcher")]
pub use watcher::{ConfigReloadEvent, ConfigWatcher};
