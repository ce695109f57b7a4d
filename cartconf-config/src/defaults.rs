//! Compiled-in defaults.
//!
//! Two layers exist. The free functions below are the per-field fallbacks used
//! by `Settings::default()`, i.e. what a field holds before any script ran.
//! The baseline cartridge is the compressed `assets/config.lua`, packed by the
//! build script and applied on top of those fallbacks by `set_default`.

use cartconf_cart::{CART_CAPACITY, CartError, inflate};

static BASELINE_CARTRIDGE: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/config.tic.z"));

/// The compressed baseline cartridge exactly as embedded.
pub fn baseline_cartridge_compressed() -> &'static [u8] {
    BASELINE_CARTRIDGE
}

/// Decompress the baseline cartridge into its serialized form.
pub fn baseline_cartridge_bytes() -> Result<Vec<u8>, CartError> {
    inflate(BASELINE_CARTRIDGE, CART_CAPACITY)
}

pub fn ui_scale() -> i32 {
    4
}

/// Cursor icon index meaning "use the built-in shape".
pub fn cursor_icon() -> i32 {
    -1
}

pub fn gif_length() -> i32 {
    0
}

pub fn gif_scale() -> i32 {
    0
}

pub fn code_color() -> u8 {
    0
}

pub fn touch_alpha() -> u8 {
    0
}

pub fn bool_false() -> bool {
    false
}
