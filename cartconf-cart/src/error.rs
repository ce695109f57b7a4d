use thiserror::Error;

/// Errors produced while decoding, encoding or decompressing cartridges.
#[derive(Debug, Error)]
pub enum CartError {
    /// The byte slice ended in the middle of a chunk header or payload.
    #[error("truncated cartridge at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The script source does not fit in the available code banks.
    #[error("code is {size} bytes, at most {max} bytes fit in a cartridge")]
    CodeTooLarge { size: usize, max: usize },

    /// A single auxiliary chunk payload exceeds the 16-bit size field.
    #[error("chunk of kind {kind} is {size} bytes, at most {max} allowed")]
    ChunkTooLarge { kind: u8, size: usize, max: usize },

    /// An auxiliary chunk header that cannot be encoded or would decode as code.
    #[error("invalid auxiliary chunk header: kind {kind}, bank {bank}")]
    InvalidChunk { kind: u8, bank: u8 },

    /// Serialized or decompressed data exceeds the cartridge capacity.
    #[error("cartridge data exceeds capacity of {capacity} bytes")]
    TooLarge { capacity: usize },

    /// zlib stream error.
    #[error("compression error: {0}")]
    Compression(#[from] std::io::Error),
}
