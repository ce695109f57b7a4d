use std::path::PathBuf;

use cartconf_cart::{Cartridge, deflate};

fn main() {
    // Pack the baseline config script into a compressed cartridge embedded by src/defaults.rs.
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR"));
    let script_path = manifest_dir.join("assets").join("config.lua");
    println!("cargo:rerun-if-changed={}", script_path.display());

    let source = std::fs::read_to_string(&script_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", script_path.display()));

    let bytes = Cartridge::with_code(source)
        .try_save()
        .expect("Baseline config does not fit in a cartridge");
    let packed = deflate(&bytes).expect("Failed to compress baseline cartridge");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    std::fs::write(out_dir.join("config.tic.z"), packed).expect("Failed to write config.tic.z");
}
