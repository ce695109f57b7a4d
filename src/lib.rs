//! cartconf: script-driven configuration for cartridge-based consoles.
//!
//! The heavy lifting lives in the workspace crates:
//! - `cartconf-cart`: cartridge container and zlib helpers
//! - `cartconf-scripting`: sandboxed script engine capability
//! - `cartconf-config`: settings model, extraction and lifecycle
//!
//! This crate adds the command-line host around them.

/// Application version from the root crate's Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod debug;
pub mod host;

pub use cartconf_cart as cart;
pub use cartconf_config as config;
pub use cartconf_scripting as scripting;
