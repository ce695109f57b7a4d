//! Cartridge container for cartconf.
//!
//! A cartridge is a chunked binary blob holding script source plus auxiliary
//! resources (sprites, maps, sound). The config system only reads the code;
//! every other chunk is carried through load/save untouched.
//!
//! - [`Cartridge`] with [`Cartridge::load`] / [`Cartridge::try_save`]
//! - [`inflate`] / [`deflate`] for the compressed baseline cartridge

pub mod cartridge;
pub mod compress;
pub mod error;

pub use cartridge::{
    CART_CAPACITY, CHUNK_CODE, CHUNK_HEADER_SIZE, CODE_BANK_SIZE, CODE_BANKS, Cartridge, Chunk,
};
pub use compress::{deflate, inflate};
pub use error::CartError;
