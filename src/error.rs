use crate::{Code, MAX_CODESIZE, MIN_CODESIZE};
use std::io;
use thiserror::Error;

/// The error kind after which coding can not continue.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LzwError {
    #[error("code size {0} is outside of {}..={}", MIN_CODESIZE, MAX_CODESIZE)]
    InvalidCodeSize(u8),
    /// The input contained a character that has no seeded code.
    #[error("byte {byte:#04x} at offset {offset} is not a 7-bit character")]
    InvalidByte { byte: u8, offset: usize },
    /// The stream referenced a code the decoder can not know about.
    #[error("code {code} is not in the table, next free code is {next}")]
    InvalidCode { code: Code, next: Code },
    #[error("code stream ended without an end code")]
    MissingEnd,
}

impl From<LzwError> for io::Error {
    fn from(err: LzwError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}
