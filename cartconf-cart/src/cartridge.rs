//! Chunked cartridge codec.
//!
//! Layout:
//! ```text
//! [kind:5 bits | bank:3 bits][size:u16 LE][reserved:1][data:size] ...
//! ```
//! Chunks follow each other until the end of the buffer. Code is stored in
//! [`CHUNK_CODE`] chunks, split across up to [`CODE_BANKS`] banks.

use crate::error::CartError;

/// Size of a chunk header in bytes.
pub const CHUNK_HEADER_SIZE: usize = 4;

/// Chunk kind holding script source.
pub const CHUNK_CODE: u8 = 5;

/// Largest payload a single chunk can describe.
pub const CODE_BANK_SIZE: usize = u16::MAX as usize;

/// Number of code banks addressable by the 3-bit bank field.
pub const CODE_BANKS: usize = 8;

/// Upper bound on a serialized cartridge.
pub const CART_CAPACITY: usize = 0x80000;

const KIND_MASK: u8 = 0x1F;
const BANK_SHIFT: u8 = 5;

/// An auxiliary chunk carried through load/save verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub kind: u8,
    pub bank: u8,
    pub data: Vec<u8>,
}

/// A decoded cartridge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cartridge {
    /// Script source text.
    pub code: String,
    /// Non-code chunks in their original order.
    pub chunks: Vec<Chunk>,
}

impl Cartridge {
    /// Create a cartridge holding only script source.
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            chunks: Vec::new(),
        }
    }

    /// Decode a cartridge from its serialized form.
    ///
    /// An empty slice decodes to an empty cartridge. Invalid UTF-8 in the code
    /// is replaced rather than rejected, and trailing NUL padding is dropped.
    ///
    /// # Errors
    /// Returns [`CartError::Truncated`] if a chunk header or payload runs past
    /// the end of `bytes`.
    pub fn load(bytes: &[u8]) -> Result<Self, CartError> {
        let mut banks: [Vec<u8>; CODE_BANKS] = Default::default();
        let mut chunks = Vec::new();
        let mut offset = 0;

        while offset < bytes.len() {
            let available = bytes.len() - offset;
            let header = bytes
                .get(offset..offset + CHUNK_HEADER_SIZE)
                .ok_or(CartError::Truncated {
                    offset,
                    needed: CHUNK_HEADER_SIZE,
                    available,
                })?;

            let kind = header[0] & KIND_MASK;
            let bank = header[0] >> BANK_SHIFT;
            let size = u16::from_le_bytes([header[1], header[2]]) as usize;
            offset += CHUNK_HEADER_SIZE;

            let data = bytes
                .get(offset..offset + size)
                .ok_or(CartError::Truncated {
                    offset,
                    needed: size,
                    available: bytes.len() - offset,
                })?;
            offset += size;

            if kind == CHUNK_CODE {
                banks[bank as usize] = data.to_vec();
            } else {
                chunks.push(Chunk {
                    kind,
                    bank,
                    data: data.to_vec(),
                });
            }
        }

        let mut code_bytes: Vec<u8> = banks.concat();
        while code_bytes.last() == Some(&0) {
            code_bytes.pop();
        }

        log::trace!(
            "Loaded cartridge: {} code bytes, {} auxiliary chunks",
            code_bytes.len(),
            chunks.len()
        );

        Ok(Self {
            code: String::from_utf8_lossy(&code_bytes).into_owned(),
            chunks,
        })
    }

    /// Encode the cartridge.
    ///
    /// Code chunks come first, followed by the auxiliary chunks in order.
    ///
    /// # Errors
    /// Fails if the code needs more than [`CODE_BANKS`] banks, an auxiliary
    /// chunk is larger than [`CODE_BANK_SIZE`] or has a header that does not
    /// fit the 5-bit kind and 3-bit bank fields (or uses [`CHUNK_CODE`]), or
    /// the result exceeds [`CART_CAPACITY`].
    pub fn try_save(&self) -> Result<Vec<u8>, CartError> {
        let code = self.code.as_bytes();
        let max_code = CODE_BANK_SIZE * CODE_BANKS;
        if code.len() > max_code {
            return Err(CartError::CodeTooLarge {
                size: code.len(),
                max: max_code,
            });
        }

        let mut out = Vec::with_capacity(code.len() + CHUNK_HEADER_SIZE * (CODE_BANKS + 1));

        for (bank, part) in code.chunks(CODE_BANK_SIZE).enumerate() {
            write_chunk(&mut out, CHUNK_CODE, bank as u8, part);
        }

        for chunk in &self.chunks {
            let header_fits = chunk.kind <= KIND_MASK && (chunk.bank as usize) < CODE_BANKS;
            if !header_fits || chunk.kind == CHUNK_CODE {
                return Err(CartError::InvalidChunk {
                    kind: chunk.kind,
                    bank: chunk.bank,
                });
            }
            if chunk.data.len() > CODE_BANK_SIZE {
                return Err(CartError::ChunkTooLarge {
                    kind: chunk.kind,
                    size: chunk.data.len(),
                    max: CODE_BANK_SIZE,
                });
            }
            write_chunk(&mut out, chunk.kind, chunk.bank, &chunk.data);
        }

        if out.len() > CART_CAPACITY {
            return Err(CartError::TooLarge {
                capacity: CART_CAPACITY,
            });
        }

        Ok(out)
    }
}

fn write_chunk(out: &mut Vec<u8>, kind: u8, bank: u8, data: &[u8]) {
    out.push((kind & KIND_MASK) | (bank << BANK_SHIFT));
    out.extend_from_slice(&(data.len() as u16).to_le_bytes());
    out.push(0x00); // reserved
    out.extend_from_slice(data);
}
