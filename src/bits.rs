//! Fixed width code packing, most significant bit first.
use crate::Code;

/// Packs codes into bytes.
pub(crate) struct MsbWriter {
    /// The width of every code.
    code_size: u8,
    /// The buffer bits, aligned to the most significant end.
    buffer: u64,
    /// The number of valid buffer bits.
    bits_in_buffer: u8,
}

/// Unpacks codes from bytes.
pub(crate) struct MsbReader<'d> {
    inp: &'d [u8],
    code_size: u8,
    /// The buffer bits, aligned to the most significant end.
    buffer: u64,
    /// The number of valid buffer bits.
    bits: u8,
}

impl MsbWriter {
    pub(crate) fn new(code_size: u8) -> Self {
        MsbWriter {
            code_size,
            buffer: 0,
            bits_in_buffer: 0,
        }
    }

    /// Append one code, moving all complete bytes into `out`.
    pub(crate) fn write_code(&mut self, code: Code, out: &mut Vec<u8>) {
        debug_assert!(u64::from(code) < 1 << self.code_size);
        let shift = 64 - self.bits_in_buffer - self.code_size;
        self.buffer |= u64::from(code) << shift;
        self.bits_in_buffer += self.code_size;
        self.flush_out(out);
    }

    /// Pad the final byte with zeros and move it into `out`.
    pub(crate) fn finish(&mut self, out: &mut Vec<u8>) {
        let to_byte = self.bits_in_buffer.wrapping_neg() & 0x7;
        self.bits_in_buffer += to_byte;
        self.flush_out(out);
    }

    fn flush_out(&mut self, out: &mut Vec<u8>) {
        while self.bits_in_buffer >= 8 {
            out.push((self.buffer >> 56) as u8);
            self.buffer <<= 8;
            self.bits_in_buffer -= 8;
        }
    }
}

impl<'d> MsbReader<'d> {
    pub(crate) fn new(inp: &'d [u8], code_size: u8) -> Self {
        MsbReader {
            inp,
            code_size,
            buffer: 0,
            bits: 0,
        }
    }

    /// Whether less than a full code remains.
    pub(crate) fn is_empty(&self) -> bool {
        usize::from(self.bits) + 8 * self.inp.len() < usize::from(self.code_size)
    }

    /// The number of whole bytes not yet touched by a code.
    pub(crate) fn remaining_bytes(&self) -> usize {
        self.inp.len() + usize::from(self.bits / 8)
    }

    pub(crate) fn read_code(&mut self) -> Option<Code> {
        if self.bits < self.code_size {
            self.refill_bits();
        }

        if self.bits < self.code_size {
            return None;
        }

        let code = self.buffer >> (64 - self.code_size);
        self.buffer <<= self.code_size;
        self.bits -= self.code_size;
        Some(code as Code)
    }

    fn refill_bits(&mut self) {
        let wish_count = usize::from((64 - self.bits) / 8);
        let count = wish_count.min(self.inp.len());
        let mut buffer = [0u8; 8];
        buffer[..count].copy_from_slice(&self.inp[..count]);
        self.inp = &self.inp[count..];
        self.buffer |= u64::from_be_bytes(buffer) >> self.bits;
        self.bits += 8 * count as u8;
    }
}

impl Iterator for MsbReader<'_> {
    type Item = Code;

    fn next(&mut self) -> Option<Code> {
        self.read_code()
    }
}

#[cfg(test)]
mod tests {
    use super::{MsbReader, MsbWriter};

    #[test]
    fn nine_bit_layout() {
        let mut out = vec![];
        let mut writer = MsbWriter::new(9);
        writer.write_code(0b1_0000_0001, &mut out);
        writer.write_code(128, &mut out);
        writer.finish(&mut out);
        // 100000001 010000000 000000
        assert_eq!(out, [0b1000_0000, 0b1010_0000, 0b0000_0000]);
    }

    #[test]
    fn reads_back_and_ignores_padding() {
        let codes = [0x7f, 0x1ffff, 0, 128, 0x2a2a2];
        let mut out = vec![];
        let mut writer = MsbWriter::new(18);
        for &code in &codes {
            writer.write_code(code, &mut out);
        }
        writer.finish(&mut out);
        assert_eq!(out.len(), (18 * codes.len() + 7) / 8);

        let mut reader = MsbReader::new(&out, 18);
        for &code in &codes {
            assert!(!reader.is_empty());
            assert_eq!(reader.read_code(), Some(code));
        }
        assert!(reader.is_empty());
        assert_eq!(reader.read_code(), None);
    }

    #[test]
    fn wide_codes_cross_refills() {
        let mut out = vec![];
        let mut writer = MsbWriter::new(24);
        for code in 0..100 {
            writer.write_code(code * 0x1_0101, &mut out);
        }
        writer.finish(&mut out);

        let reader = MsbReader::new(&out, 24);
        let codes: Vec<_> = reader.collect();
        let expected: Vec<_> = (0..100).map(|code| code * 0x1_0101).collect();
        assert_eq!(codes, expected);
    }
}
