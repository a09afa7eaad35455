//! A module for all decoding needs.
use crate::bits::MsbReader;
use crate::table::CodeTable;
use crate::{Code, Config, LzwError, EOF_CODE};

use log::{debug, trace, warn};
use std::io::{self, BufRead, Write};

#[cfg(feature = "async")]
use futures::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// The state for decoding data with an LZW algorithm.
///
/// The decoder rebuilds the dictionary of the encoder from the codes alone. Every code
/// after the first one adds the previous string extended by the first byte of the current
/// string, until the table holds `config.max_codes()` entries.
pub struct Decoder {
    config: Config,
    table: CodeTable,
}

/// A decoding stream sink.
///
/// See [`Decoder::into_stream`] on how to create this type and more information.
///
/// [`Decoder::into_stream`]: struct.Decoder.html#method.into_stream
pub struct IntoStream<'d, W> {
    decoder: &'d mut Decoder,
    writer: W,
}

/// An async decoding sink.
///
/// See [`Decoder::into_async`] on how to create this type and more information.
///
/// [`Decoder::into_async`]: struct.Decoder.html#method.into_async
#[cfg(feature = "async")]
pub struct IntoAsync<'d, W> {
    decoder: &'d mut Decoder,
    writer: W,
}

/// The result of coding everything from a reader into a writer.
#[must_use = "Contains a status with potential error information"]
pub struct AllResult {
    /// The total number of bytes consumed from the reader.
    pub bytes_read: usize,
    /// The total number of bytes written into the writer.
    pub bytes_written: usize,
    /// The possible error that occurred.
    ///
    /// Note that coding errors are reported as `ErrorKind::InvalidData`.
    pub status: io::Result<()>,
}

impl Decoder {
    /// Create a new decoder for codes of the configured width.
    pub fn new(config: Config) -> Self {
        Decoder {
            config,
            table: CodeTable::new(config.max_codes()),
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    /// Decode a complete packed stream.
    pub fn decode(&mut self, inp: &[u8]) -> Result<Vec<u8>, LzwError> {
        let mut out = Vec::with_capacity(2 * inp.len());
        self.decode_into(inp, &mut out)?;
        Ok(out)
    }

    /// Decode a complete packed stream, appending the text to `out`.
    ///
    /// Bytes following the end code are ignored.
    pub fn decode_into(&mut self, inp: &[u8], out: &mut Vec<u8>) -> Result<(), LzwError> {
        let mut reader = MsbReader::new(inp, self.config.code_size());
        self.decode_codes_into(&mut reader, out)?;

        if !reader.is_empty() {
            warn!(
                "ignoring {} bytes after the end code",
                reader.remaining_bytes()
            );
        }
        Ok(())
    }

    /// Decode a sequence of unpacked codes that ends with the end code.
    pub fn decode_codes(
        &mut self,
        codes: impl IntoIterator<Item = Code>,
    ) -> Result<Vec<u8>, LzwError> {
        let mut out = vec![];
        self.decode_codes_into(codes, &mut out)?;
        Ok(out)
    }

    /// Construct a decoder into a writer.
    pub fn into_stream<W: Write>(&mut self, writer: W) -> IntoStream<'_, W> {
        IntoStream {
            decoder: self,
            writer,
        }
    }

    /// Construct a decoder into an async writer.
    #[cfg(feature = "async")]
    pub fn into_async<W: AsyncWrite>(&mut self, writer: W) -> IntoAsync<'_, W> {
        IntoAsync {
            decoder: self,
            writer,
        }
    }

    fn decode_codes_into(
        &mut self,
        codes: impl IntoIterator<Item = Code>,
        out: &mut Vec<u8>,
    ) -> Result<(), LzwError> {
        let start = out.len();
        let table = &mut self.table;
        table.reset();

        let mut codes = codes.into_iter();
        let mut current = codes.next().ok_or(LzwError::MissingEnd)?;
        if current == EOF_CODE {
            debug!("decoded an empty stream");
            return Ok(());
        }

        table
            .reconstruct(current, out)
            .ok_or_else(|| invalid_code(current, table.len()))?;

        let mut code_count = 1;
        let mut saturated = false;
        loop {
            let next = codes.next().ok_or(LzwError::MissingEnd)?;
            if next == EOF_CODE {
                break;
            }
            code_count += 1;

            // Each code read creates one new entry based on the preceding code.
            let cha = match table.first_byte(next) {
                Some(cha) => cha,
                // The encoder assigned this code in the very step that emitted it. The
                // entry can only be the current string followed by its own first byte.
                None if next as usize == table.len() && !table.is_full() => {
                    trace!("code {} refers to the entry being derived", next);
                    table
                        .first_byte(current)
                        .ok_or_else(|| invalid_code(current, table.len()))?
                }
                None => return Err(invalid_code(next, table.len())),
            };

            if table.push(current, cha).is_none() && !saturated {
                debug!("code table saturated at {} entries", table.len());
                saturated = true;
            }

            table
                .reconstruct(next, out)
                .ok_or_else(|| invalid_code(next, table.len()))?;
            current = next;
        }

        debug!(
            "decoded {} codes into {} bytes",
            code_count,
            out.len() - start
        );
        Ok(())
    }
}

fn invalid_code(code: Code, next: usize) -> LzwError {
    LzwError::InvalidCode {
        code,
        next: next as Code,
    }
}

impl<W: Write> IntoStream<'_, W> {
    /// Decode all data from a reader.
    ///
    /// The reader is drained before decoding starts, the stream must contain an end code.
    pub fn decode_all(self, mut read: impl BufRead) -> AllResult {
        let IntoStream {
            decoder,
            mut writer,
        } = self;

        let mut bytes_read = 0;
        let mut bytes_written = 0;

        let mut once = || -> io::Result<()> {
            let mut inp = vec![];
            bytes_read = read.read_to_end(&mut inp)?;
            let out = decoder.decode(&inp)?;
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
    /// Decode all data from an async reader.
    ///
    /// The reader is drained before decoding starts, the stream must contain an end code.
    pub async fn decode_all(self, mut read: impl AsyncRead + core::marker::Unpin) -> AllResult {
        let IntoAsync {
            decoder,
            mut writer,
        } = self;

        let mut bytes_read = 0;
        let mut bytes_written = 0;

        let status = async {
            let mut inp = vec![];
            bytes_read = read.read_to_end(&mut inp).await?;
            let out = decoder.decode(&inp)?;
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
    use super::Decoder;
    use crate::bits::MsbWriter;
    use crate::{Code, Config, LzwError, EOF_CODE};

    fn decoder(size: u8) -> Decoder {
        Decoder::new(Config::new(size).unwrap())
    }

    fn pack(codes: &[Code], size: u8) -> Vec<u8> {
        let mut out = vec![];
        let mut writer = MsbWriter::new(size);
        for &code in codes {
            writer.write_code(code, &mut out);
        }
        writer.finish(&mut out);
        out
    }

    #[test]
    fn leading_end_code_is_empty() {
        let mut decoder = decoder(12);
        assert_eq!(decoder.decode_codes(vec![EOF_CODE]).unwrap(), b"");
        assert_eq!(decoder.decode(&pack(&[EOF_CODE], 12)).unwrap(), b"");
    }

    #[test]
    fn derives_unseen_code() {
        let mut decoder = decoder(12);
        let codes = [65, 66, 129, 131, EOF_CODE];
        assert_eq!(decoder.decode_codes(codes.iter().copied()).unwrap(), b"ABABABA");
    }

    #[test]
    fn repeated_run() {
        let mut decoder = decoder(9);
        let codes = [97, 129, 130, 129, EOF_CODE];
        assert_eq!(decoder.decode(&pack(&codes, 9)).unwrap(), b"aaaaaaaa");
    }

    #[test]
    fn code_ahead_of_table_rejected() {
        let mut decoder = decoder(12);
        let result = decoder.decode_codes(vec![65, 66, 131, EOF_CODE]);
        assert_eq!(result, Err(LzwError::InvalidCode { code: 131, next: 130 }));
    }

    #[test]
    fn derived_first_code_rejected() {
        let mut decoder = decoder(12);
        let result = decoder.decode_codes(vec![129, EOF_CODE]);
        assert_eq!(result, Err(LzwError::InvalidCode { code: 129, next: 129 }));
    }

    #[test]
    fn missing_end_code() {
        let mut decoder = decoder(12);
        assert_eq!(decoder.decode_codes(vec![65, 66]), Err(LzwError::MissingEnd));
        assert_eq!(decoder.decode(&[]), Err(LzwError::MissingEnd));
        // A single byte can not hold a 12 bit code.
        assert_eq!(decoder.decode(&[0x41]), Err(LzwError::MissingEnd));
    }

    #[test]
    fn trailing_bytes_ignored() {
        let mut decoder = decoder(8);
        let mut data = pack(&[104, 105, EOF_CODE], 8);
        data.extend_from_slice(b"garbage");
        assert_eq!(decoder.decode(&data).unwrap(), b"hi");
    }

    #[test]
    fn decoder_is_reusable() {
        let mut decoder = decoder(12);
        let first = decoder.decode_codes(vec![65, 66, 129, 131, EOF_CODE]).unwrap();
        let second = decoder.decode_codes(vec![65, 66, 129, 131, EOF_CODE]).unwrap();
        assert_eq!(first, second);
    }
}
