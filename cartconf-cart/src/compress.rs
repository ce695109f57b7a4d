//! zlib helpers for the compressed baseline cartridge.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::error::CartError;

/// Decompress a zlib stream, refusing to produce more than `capacity` bytes.
pub fn inflate(compressed: &[u8], capacity: usize) -> Result<Vec<u8>, CartError> {
    let mut out = Vec::new();
    ZlibDecoder::new(compressed)
        .take(capacity as u64 + 1)
        .read_to_end(&mut out)?;

    if out.len() > capacity {
        return Err(CartError::TooLarge { capacity });
    }
    Ok(out)
}

/// Compress bytes with zlib at the best compression level.
pub fn deflate(bytes: &[u8]) -> Result<Vec<u8>, CartError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}
