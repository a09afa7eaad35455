//! # LZW text compression over a ternary search trie
//!
//! This crate provides an [`Encoder`] and a [`Decoder`] for LZW coded text. The input
//! alphabet is the 128 ASCII code points, each seeded into the dictionary at its own
//! value. Every code in the stream has the same width, chosen through [`Config`], and is
//! written most significant bit first.
//!
//! The stream ends with an end code which is defined as:
//!
//!  * `EOF_CODE == 128`
//!
//! Dictionary entries are assigned from `EOF_CODE + 1` upwards until `1 << code_size`
//! codes exist. After that the dictionary is frozen and coding continues with the
//! existing entries.
//!
//! Examplary use of the encoder:
//!
//! ```
//! use tstlzw::{Config, encode::Encoder, decode::Decoder};
//! let data = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let config = Config::new(12).unwrap();
//! let compressed = Encoder::new(config).encode(data).unwrap();
//! let decompressed = Decoder::new(config).decode(&compressed).unwrap();
//! assert_eq!(decompressed, data);
//! ```
#![forbid(unsafe_code)]

/// The end of stream marker. Never stands for data.
pub const EOF_CODE: Code = 128;
/// Number of single character codes seeded into every dictionary.
pub const ALPHABET_SIZE: usize = 128;
/// The smallest supported code width.
pub const MIN_CODESIZE: u8 = 8;
/// The largest supported code width.
pub const MAX_CODESIZE: u8 = 24;
/// The code width used when none is configured.
pub const DEFAULT_CODESIZE: u8 = 18;

/// Alias for a LZW code point
pub type Code = u32;

/// The code width and everything derived from it.
///
/// Encoder and decoder must agree on the configuration, nothing about it is stored in the
/// stream itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    code_size: u8,
}

impl Config {
    /// Create a configuration for codes of `code_size` bits.
    ///
    /// The width must lie within `MIN_CODESIZE..=MAX_CODESIZE`.
    pub fn new(code_size: u8) -> Result<Self, LzwError> {
        if code_size < MIN_CODESIZE || code_size > MAX_CODESIZE {
            return Err(LzwError::InvalidCodeSize(code_size));
        }

        Ok(Config { code_size })
    }

    /// The number of bits in each code.
    pub fn code_size(&self) -> u8 {
        self.code_size
    }

    /// The size of the code space, including singletons and the end code.
    pub fn max_codes(&self) -> usize {
        1 << self.code_size
    }

    /// The first code handed out to a dictionary entry.
    pub fn first_code(&self) -> Code {
        EOF_CODE + 1
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            code_size: DEFAULT_CODESIZE,
        }
    }
}

mod bits;
mod error;
pub mod decode;
pub mod encode;
pub mod table;
pub mod tst;

pub use crate::decode::Decoder;
pub use crate::encode::Encoder;
pub use crate::error::LzwError;
