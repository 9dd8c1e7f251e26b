//! Decoding bytes into text, and encoding text back into bytes.
//!
//! Decoding is strict: any byte sequence that is invalid in the encoding
//! fails with [`Error::MalformedInput`] rather than being replaced.
use encoding_rs::{DecoderResult, EncoderResult, Encoding, UTF_16BE, UTF_16LE, UTF_8};
use log::trace;

use crate::config::ParseConfig;
use crate::encoding::{ByteOrder, Codec, EncodingName};
use crate::error::Error;

enum State {
    EncodingRs(encoding_rs::Decoder),
    // generic UTF-16: the byte order is known once two bytes are in
    Utf16Undecided(Vec<u8>),
    Utf32 {
        order: Option<ByteOrder>,
        pending: Vec<u8>,
        started: bool,
    },
    Latin1,
    Ascii,
}

/// An incremental decoder.
///
/// Bytes can be fed in chunks split at any position; a multi-byte sequence
/// cut in two by a chunk boundary is buffered until the rest arrives. A
/// leading byte-order mark of the encoding is dropped.
///
/// ```rust
/// use xmlsniff::{EncodingName, StreamDecoder};
///
/// let mut decoder = StreamDecoder::new(&EncodingName::UTF_8)?;
/// let mut text = String::new();
/// // "é" is C3 A9, split over two chunks
/// decoder.decode_chunk(b"<a>\xC3", false, &mut text)?;
/// decoder.decode_chunk(b"\xA9</a>", true, &mut text)?;
/// assert_eq!(text, "<a>é</a>");
/// # Ok::<(), xmlsniff::Error>(())
/// ```
pub struct StreamDecoder {
    encoding: EncodingName,
    state: State,
    // bytes consumed so far, for error offsets
    offset: usize,
}

impl StreamDecoder {
    /// Create a decoder for an encoding.
    ///
    /// Fails with [`Error::UnsupportedEncoding`] if there is no codec for it.
    pub fn new(encoding: &EncodingName) -> Result<Self, Error> {
        let state = match encoding.codec()? {
            Codec::Utf8 => State::EncodingRs(UTF_8.new_decoder_with_bom_removal()),
            Codec::Utf16(Some(order)) => {
                State::EncodingRs(utf16_encoding(order).new_decoder_with_bom_removal())
            }
            Codec::Utf16(None) => State::Utf16Undecided(Vec::new()),
            Codec::Utf32(order) => State::Utf32 {
                order,
                pending: Vec::new(),
                started: false,
            },
            Codec::Latin1 => State::Latin1,
            Codec::Ascii => State::Ascii,
            Codec::Legacy(encoding) => State::EncodingRs(encoding.new_decoder_with_bom_removal()),
        };
        Ok(StreamDecoder {
            encoding: encoding.clone(),
            state,
            offset: 0,
        })
    }

    /// The encoding this decoder decodes.
    pub fn encoding(&self) -> &EncodingName {
        &self.encoding
    }

    /// Decode a chunk, appending the text to `out`.
    ///
    /// `last` must be set for the final chunk, so that a truncated sequence
    /// at the end of the input is reported. On error, `out` may hold part of
    /// the chunk's text.
    pub fn decode_chunk(&mut self, bytes: &[u8], last: bool, out: &mut String) -> Result<(), Error> {
        trace!(
            "decoding {} bytes as {} at offset {}",
            bytes.len(),
            self.encoding,
            self.offset
        );
        match &mut self.state {
            State::EncodingRs(decoder) => decode_encoding_rs(
                decoder,
                &self.encoding,
                &mut self.offset,
                bytes,
                last,
                out,
            ),
            State::Utf16Undecided(pending) => {
                pending.extend_from_slice(bytes);
                if pending.len() < 2 && !last {
                    return Ok(());
                }
                let pending = std::mem::take(pending);
                let order = if pending.starts_with(&[0xFF, 0xFE]) {
                    ByteOrder::Little
                } else {
                    ByteOrder::Big
                };
                let mut decoder = utf16_encoding(order).new_decoder_with_bom_removal();
                let result = decode_encoding_rs(
                    &mut decoder,
                    &self.encoding,
                    &mut self.offset,
                    &pending,
                    last,
                    out,
                );
                self.state = State::EncodingRs(decoder);
                result
            }
            State::Utf32 {
                order,
                pending,
                started,
            } => {
                let mut data = std::mem::take(pending);
                data.extend_from_slice(bytes);
                let mut units = data.chunks_exact(4);
                for unit in units.by_ref() {
                    let unit: [u8; 4] = [unit[0], unit[1], unit[2], unit[3]];
                    if !*started {
                        *started = true;
                        if order.is_none() {
                            if unit == [0xFF, 0xFE, 0x00, 0x00] {
                                *order = Some(ByteOrder::Little);
                                self.offset += 4;
                                continue;
                            }
                            *order = Some(ByteOrder::Big);
                        }
                        if utf32_value(unit, *order) == 0xFEFF {
                            self.offset += 4;
                            continue;
                        }
                    }
                    let c = char::from_u32(utf32_value(unit, *order))
                        .ok_or_else(|| malformed(&self.encoding, self.offset))?;
                    out.push(c);
                    self.offset += 4;
                }
                let rest = units.remainder();
                if last && !rest.is_empty() {
                    return Err(malformed(&self.encoding, self.offset));
                }
                *pending = rest.to_vec();
                Ok(())
            }
            State::Latin1 => {
                out.push_str(&encoding_rs::mem::decode_latin1(bytes));
                self.offset += bytes.len();
                Ok(())
            }
            State::Ascii => {
                if let Some(position) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(malformed(&self.encoding, self.offset + position));
                }
                out.extend(bytes.iter().map(|b| *b as char));
                self.offset += bytes.len();
                Ok(())
            }
        }
    }
}

fn utf16_encoding(order: ByteOrder) -> &'static Encoding {
    match order {
        ByteOrder::Little => UTF_16LE,
        ByteOrder::Big => UTF_16BE,
    }
}

fn utf32_value(unit: [u8; 4], order: Option<ByteOrder>) -> u32 {
    match order {
        Some(ByteOrder::Little) => u32::from_le_bytes(unit),
        _ => u32::from_be_bytes(unit),
    }
}

fn malformed(encoding: &EncodingName, offset: usize) -> Error {
    Error::MalformedInput {
        encoding: encoding.clone(),
        offset,
    }
}

fn decode_encoding_rs(
    decoder: &mut encoding_rs::Decoder,
    encoding: &EncodingName,
    offset: &mut usize,
    mut src: &[u8],
    last: bool,
    out: &mut String,
) -> Result<(), Error> {
    loop {
        let needed = decoder
            .max_utf8_buffer_length_without_replacement(src.len())
            .unwrap_or(src.len());
        out.reserve(needed);
        let (result, read) = decoder.decode_to_string_without_replacement(src, out, last);
        *offset += read;
        src = &src[read..];
        match result {
            DecoderResult::InputEmpty => return Ok(()),
            DecoderResult::OutputFull => {}
            DecoderResult::Malformed(bad, consumed) => {
                let start = offset.saturating_sub(bad as usize + consumed as usize);
                return Err(malformed(encoding, start));
            }
        }
    }
}

/// Decode bytes in an encoding into text.
///
/// A leading byte-order mark of the encoding is dropped. Fails with
/// [`Error::MalformedInput`] if the bytes are invalid in the encoding.
///
/// ```rust
/// use xmlsniff::{decode, EncodingName};
///
/// let text = decode(b"\xFF\xFEh\x00i\x00", &EncodingName::UTF_16LE)?;
/// assert_eq!(text, "hi");
/// assert!(decode(b"<a>\xC0</a>", &EncodingName::UTF_8).is_err());
/// # Ok::<(), xmlsniff::Error>(())
/// ```
pub fn decode(bytes: &[u8], encoding: &EncodingName) -> Result<String, Error> {
    decode_with_config(bytes, encoding, &ParseConfig::default())
}

/// Like [`decode`], feeding the bytes in [`ParseConfig::chunk_size`] pieces.
pub fn decode_with_config(
    bytes: &[u8],
    encoding: &EncodingName,
    config: &ParseConfig,
) -> Result<String, Error> {
    let mut decoder = StreamDecoder::new(encoding)?;
    let mut out = String::with_capacity(bytes.len());
    let mut chunks = bytes.chunks(config.chunk_size.max(1)).peekable();
    if chunks.peek().is_none() {
        decoder.decode_chunk(&[], true, &mut out)?;
    }
    while let Some(chunk) = chunks.next() {
        let last = chunks.peek().is_none();
        decoder.decode_chunk(chunk, last, &mut out)?;
    }
    Ok(out)
}

/// Encode text into bytes in an encoding.
///
/// No byte-order mark is written; generic UTF-16 and UTF-32 are written
/// big-endian. Fails with [`Error::Unencodable`] for the first character the
/// encoding can't represent.
///
/// ```rust
/// use xmlsniff::{encode, EncodingName};
///
/// assert_eq!(encode("é", &EncodingName::ISO_8859_1)?, vec![0xE9]);
/// assert!(encode("é", &EncodingName::US_ASCII).is_err());
/// # Ok::<(), xmlsniff::Error>(())
/// ```
pub fn encode(text: &str, encoding: &EncodingName) -> Result<Vec<u8>, Error> {
    let unencodable = |character: char| Error::Unencodable {
        encoding: encoding.clone(),
        character,
    };
    match encoding.codec()? {
        Codec::Utf8 => Ok(text.as_bytes().to_vec()),
        Codec::Utf16(order) => Ok(text
            .encode_utf16()
            .flat_map(|unit| match order {
                Some(ByteOrder::Little) => unit.to_le_bytes(),
                _ => unit.to_be_bytes(),
            })
            .collect()),
        Codec::Utf32(order) => Ok(text
            .chars()
            .flat_map(|c| match order {
                Some(ByteOrder::Little) => u32::from(c).to_le_bytes(),
                _ => u32::from(c).to_be_bytes(),
            })
            .collect()),
        Codec::Latin1 => text
            .chars()
            .map(|c| u8::try_from(c).map_err(|_| unencodable(c)))
            .collect(),
        Codec::Ascii => text
            .chars()
            .map(|c| {
                if c.is_ascii() {
                    Ok(c as u8)
                } else {
                    Err(unencodable(c))
                }
            })
            .collect(),
        Codec::Legacy(legacy) => {
            let mut encoder = legacy.new_encoder();
            let mut out = Vec::with_capacity(text.len());
            let mut src = text;
            loop {
                let needed = encoder
                    .max_buffer_length_from_utf8_without_replacement(src.len())
                    .unwrap_or(src.len());
                out.reserve(needed);
                let (result, read) =
                    encoder.encode_from_utf8_to_vec_without_replacement(src, &mut out, true);
                src = &src[read..];
                match result {
                    EncoderResult::InputEmpty => return Ok(out),
                    EncoderResult::OutputFull => {}
                    EncoderResult::Unmappable(c) => return Err(unencodable(c)),
                }
            }
        }
    }
}
