//! The code table used by the decoder.
//!
//! Each entry is stored as a link to the entry it extends plus the one byte it appends.
//! Strings are reconstructed back to front by following those links.
use crate::{Code, ALPHABET_SIZE, EOF_CODE};

/// Append-only table from code to string.
#[derive(Clone, Debug)]
pub struct CodeTable {
    inner: Vec<Link>,
    /// String length per code, zero for the unused end code.
    depths: Vec<u32>,
    max_codes: usize,
}

#[derive(Clone, Copy, Debug)]
struct Link {
    /// The code this entry extends. Singletons link to themselves.
    prev: Code,
    byte: u8,
    /// First byte of the string, kept to avoid walking the chain.
    first: u8,
}

// Never empty, the seeded singletons and the end code are always present.
#[allow(clippy::len_without_is_empty)]
impl CodeTable {
    /// A table seeded with all single characters that holds at most `max_codes` entries.
    pub fn new(max_codes: usize) -> Self {
        let mut table = CodeTable {
            inner: Vec::with_capacity(max_codes),
            depths: Vec::with_capacity(max_codes),
            max_codes,
        };
        table.reset();
        table
    }

    /// Drop all derived entries.
    pub fn reset(&mut self) {
        self.inner.clear();
        self.depths.clear();
        for ch in 0..ALPHABET_SIZE as u8 {
            self.inner.push(Link::base(ch));
            self.depths.push(1);
        }
        debug_assert_eq!(self.inner.len(), EOF_CODE as usize);
        self.inner.push(Link::base(0));
        self.depths.push(0);
    }

    /// The number of assigned codes, which is also the next code to be assigned.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_full(&self) -> bool {
        self.inner.len() >= self.max_codes
    }

    /// Whether `code` currently stands for a string.
    pub fn contains(&self, code: Code) -> bool {
        self.depths.get(code as usize).map_or(false, |&depth| depth > 0)
    }

    /// The length of the string for `code`.
    pub fn depth(&self, code: Code) -> Option<usize> {
        if self.contains(code) {
            Some(self.depths[code as usize] as usize)
        } else {
            None
        }
    }

    pub fn first_byte(&self, code: Code) -> Option<u8> {
        if self.contains(code) {
            Some(self.inner[code as usize].first)
        } else {
            None
        }
    }

    /// Assign the next code to the string of `prev` followed by `byte`.
    ///
    /// Returns `None` without changes if the table is full or `prev` is not assigned.
    pub fn push(&mut self, prev: Code, byte: u8) -> Option<Code> {
        if self.is_full() {
            return None;
        }

        let depth = *self.depths.get(prev as usize).filter(|&&depth| depth > 0)?;
        let first = self.inner[prev as usize].first;
        let code = self.inner.len() as Code;
        self.inner.push(Link { prev, byte, first });
        self.depths.push(depth + 1);
        Some(code)
    }

    /// Append the string for `code` to `out`, returning its length.
    pub fn reconstruct(&self, code: Code, out: &mut Vec<u8>) -> Option<usize> {
        let depth = self.depth(code)?;
        let start = out.len();
        out.resize(start + depth, 0);

        let mut code_iter = code;
        for ch in out[start..].iter_mut().rev() {
            let entry = &self.inner[code_iter as usize];
            *ch = entry.byte;
            code_iter = entry.prev;
        }

        Some(depth)
    }

    /// The string for `code` as an owned buffer.
    pub fn string(&self, code: Code) -> Option<Vec<u8>> {
        let mut out = Vec::new();
        self.reconstruct(code, &mut out)?;
        Some(out)
    }
}

impl Link {
    fn base(byte: u8) -> Self {
        Link {
            prev: Code::from(byte),
            byte,
            first: byte,
        }
    }
}
