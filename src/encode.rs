//! A module for all encoding needs.
use crate::bits::MsbWriter;
use crate::decode::AllResult;
use crate::tst::{Match, Tst};
use crate::{Code, Config, LzwError, EOF_CODE};

use log::debug;
use std::io::{self, BufRead, Write};

#[cfg(feature = "async")]
use futures::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// The state for encoding data with an LZW algorithm.
///
/// The encoder repeatedly takes the longest prefix of the remaining input that the
/// dictionary knows, emits its code and adds that prefix extended by the byte following
/// it. The dictionary is rebuilt for every input.
pub struct Encoder {
    config: Config,
    /// The current encoding symbol tree.
    tree: Tst,
}

/// A encoding stream sink.
///
/// See [`Encoder::into_stream`] on how to create this type and more information.
///
/// [`Encoder::into_stream`]: struct.Encoder.html#method.into_stream
pub struct IntoStream<'d, W> {
    encoder: &'d mut Encoder,
    writer: W,
}

/// An async encoding sink.
///
/// See [`Encoder::into_async`] on how to create this type and more information.
///
/// [`Encoder::into_async`]: struct.Encoder.html#method.into_async
#[cfg(feature = "async")]
pub struct IntoAsync<'d, W> {
    encoder: &'d mut Encoder,
    writer: W,
}

impl Encoder {
    /// Create a new encoder for codes of the configured width.
    pub fn new(config: Config) -> Self {
        Encoder {
            config,
            tree: Tst::new(),
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Encode all of `inp` into a packed stream, including the end code.
    pub fn encode(&mut self, inp: &[u8]) -> Result<Vec<u8>, LzwError> {
        let mut out = Vec::with_capacity(inp.len() / 2 + 8);
        self.encode_into(inp, &mut out)?;
        Ok(out)
    }

    /// Encode all of `inp`, appending the packed stream to `out`.
    ///
    /// On error `out` may hold the codes produced before the offending byte.
    pub fn encode_into(&mut self, inp: &[u8], out: &mut Vec<u8>) -> Result<(), LzwError> {
        let mut writer = MsbWriter::new(self.config.code_size());
        self.encode_with(inp, |code| writer.write_code(code, out))?;
        writer.finish(out);
        Ok(())
    }

    /// Encode all of `inp` into unpacked codes, the last of which is the end code.
    pub fn encode_codes(&mut self, inp: &[u8]) -> Result<Vec<Code>, LzwError> {
        let mut codes = vec![];
        self.encode_with(inp, |code| codes.push(code))?;
        Ok(codes)
    }

    /// Construct a encoder into a writer.
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            encoder: self,
            writer,
        }
    }

    /// Construct a encoder into an async writer.
    #[cfg(feature = "async")]
    pub fn into_async<W: AsyncWrite>(&mut self, writer: W) -> IntoAsync<'_, W> {
        IntoAsync {
            encoder: self,
            writer,
        }
    }

    fn encode_with(&mut self, inp: &[u8], mut emit: impl FnMut(Code)) -> Result<(), LzwError> {
        self.tree.clear();
        self.tree.seed();

        let max_codes = self.config.max_codes();
        let mut next_code = self.config.first_code();
        let mut code_count = 0;
        let mut i = 0;

        while i < inp.len() {
            // Every character of the alphabet is seeded, so only foreign bytes miss.
            let Match { len, code } = self
                .tree
                .longest_match(inp, i)
                .ok_or(LzwError::InvalidByte {
                    byte: inp[i],
                    offset: i,
                })?;
            let end = i + len;

            if end < inp.len() && (next_code as usize) < max_codes {
                self.tree.insert(&inp[i..=end], next_code);
                next_code += 1;
                if next_code as usize == max_codes {
                    debug!("dictionary saturated at input offset {}", end);
                }
            }

            emit(code);
            code_count += 1;
            i = end;
        }

        emit(EOF_CODE);
        debug!("encoded {} bytes into {} codes", inp.len(), code_count);
        Ok(())
    }
}

impl<W: Write> IntoStream<'_, W> {
    /// Encode all data from a reader and an end marker.
    ///
    /// The reader is drained before encoding starts.
    pub fn encode_all(self, mut read: impl BufRead) -> AllResult {
        let IntoStream {
            encoder,
            mut writer,
        } = self;

        let mut bytes_read = 0;
        let mut bytes_written = 0;

        let mut once = || -> io::Result<()> {
            let mut inp = vec![];
            bytes_read = read.read_to_end(&mut inp)?;
            let out = encoder.encode(&inp)?;
            writer.write_all(&out)?;
            writer.flush()?;
            bytes_written = out.len();
            Ok(())
        };

        let status = once();
        AllResult {
            bytes_read,
            bytes_written,
            status,
        }
    }
}

#[cfg(feature = "async")]
impl<W: AsyncWrite + core::marker::Unpin> IntoAsync<'_, W> {
    /// Encode all data from an async reader and an end marker.
    ///
    /// The reader is drained before encoding starts.
    pub async fn encode_all(self, mut read: impl AsyncRead + core::marker::Unpin) -> AllResult {
        let IntoAsync {
            encoder,
            mut writer,
        } = self;

        let mut bytes_read = 0;
        let mut bytes_written = 0;

        let status = async {
            let mut inp = vec![];
            bytes_read = read.read_to_end(&mut inp).await?;
            let out = encoder.encode(&inp)?;
            writer.write_all(&out).await?;
            writer.flush().await?;
            bytes_written = out.len();
            Ok::<_, io::Error>(())
        }
        .await;

        AllResult {
            bytes_read,
            bytes_written,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Encoder;
    use crate::{Config, LzwError, EOF_CODE};

    fn encoder(size: u8) -> Encoder {
        Encoder::new(Config::new(size).unwrap())
    }

    /// Word salad from a fixed seed, long enough to exhaust small code spaces.
    fn text(len: usize) -> Vec<u8> {
        const WORDS: &[&[u8]] = &[
            b"the", b"quick", b"brown", b"fox", b"jumps", b"over", b"lazy", b"dog", b"\n",
            b"Lorem", b"ipsum", b"dolor", b"sit", b"amet,", b"42", b"TOBEORNOT",
        ];
        let mut state = 0x2545_f491_u32;
        let mut out = Vec::with_capacity(len + 16);
        while out.len() < len {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            out.extend_from_slice(WORDS[state as usize % WORDS.len()]);
            out.push(b' ');
        }
        out.truncate(len);
        out
    }

    #[test]
    fn empty_input_is_end_code() {
        let mut encoder = encoder(12);
        assert_eq!(encoder.encode_codes(b"").unwrap(), [EOF_CODE]);
        // 12 bits of 128, padded to two bytes.
        assert_eq!(encoder.encode(b"").unwrap(), [0x08, 0x00]);
    }

    #[test]
    fn abababa_reuses_fresh_code() {
        let mut encoder = encoder(12);
        let codes = encoder.encode_codes(b"ABABABA").unwrap();
        assert_eq!(codes, [65, 66, 129, 131, EOF_CODE]);
    }

    #[test]
    fn repeated_character_shrinks() {
        let mut encoder = encoder(9);
        let codes = encoder.encode_codes(b"aaaaaaaa").unwrap();
        assert_eq!(codes, [97, 129, 130, 129, EOF_CODE]);
        assert!(codes.len() - 1 < 8);
    }

    #[test]
    fn dictionary_freezes_at_code_space() {
        let config = Config::new(9).unwrap();
        let mut encoder = Encoder::new(config);
        let codes = encoder.encode_codes(&text(20_000)).unwrap();

        assert!(codes.iter().all(|&code| (code as usize) < config.max_codes()));
        // All singletons plus every code from 129 up to 511. The end code is never a key.
        assert_eq!(encoder.tree.len(), 128 + (512 - 129));
        assert_eq!(encoder.tree.lookup(&[0x80]), None);
    }

    #[test]
    fn built_dictionary_keys() {
        let data = b"TOBEORNOTTOBEORTOBEORNOT";
        let mut encoder = encoder(12);
        let codes = encoder.encode_codes(data).unwrap();

        let mut derived: Vec<_> = encoder
            .tree
            .keys()
            .filter(|(key, _)| key.len() > 1)
            .collect();
        // One entry per emitted code except the last, none after the end code.
        assert_eq!(derived.len(), codes.len() - 2);

        for (key, code) in &derived {
            assert!(
                data.windows(key.len()).any(|window| window == &key[..]),
                "{:?} is not part of the input",
                String::from_utf8_lossy(key)
            );
            assert_eq!(encoder.tree.lookup(key), Some(*code));
        }

        derived.sort_by_key(|&(_, code)| code);
        let assigned: Vec<_> = derived.iter().map(|&(_, code)| code).collect();
        let expected: Vec<_> = (129..129 + assigned.len() as u32).collect();
        assert_eq!(assigned, expected);
        assert_eq!(derived[0].0, b"TO");
    }

    #[test]
    fn invalid_input_rejected() {
        let mut encoder = encoder(12);
        let result = encoder.encode_codes(&[b'a', b'b', 0xc3, b'c']);
        assert_eq!(result, Err(LzwError::InvalidByte { byte: 0xc3, offset: 2 }));
    }

    #[test]
    fn encoder_is_reusable() {
        let mut encoder = encoder(16);
        let data = text(5_000);
        let first = encoder.encode(&data).unwrap();
        let _ = encoder.encode(b"something else entirely").unwrap();
        assert_eq!(encoder.encode(&data).unwrap(), first);
    }
}
