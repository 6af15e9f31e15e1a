//! Whole-input compression and decompression.
//!
//! `compress` = count → build tree → write header → build code map →
//! encode → flush. `decompress` = read header → decode. The whole input is
//! held in memory while compressing; decompression streams.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::bitio::{BitReader, BitWriter};
use crate::codebook::CodeMap;
use crate::decoder::Decoder;
use crate::encoder::encode;
use crate::error::{HuffmanError, Result};
use crate::framing::{ChecksumWriter, FrameHeader, HEADER_SIZE};
use crate::frequency::FrequencyTable;
use crate::metrics::{Metrics, Operation};
use crate::tree::PrefixTree;

/// On-disk layout of a compressed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Length- and checksum-prefixed bitstream; decodes unambiguously.
    #[default]
    Framed,
    /// Tree header and payload only. The decoder reads until end-of-stream,
    /// so padding in the last byte may decode as extra symbols.
    Bare,
}

impl Format {
    /// Bytes in front of the bitstream.
    pub fn prefix_len(&self) -> usize {
        match self {
            Format::Framed => HEADER_SIZE,
            Format::Bare => 0,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Framed => f.write_str("framed"),
            Format::Bare => f.write_str("bare"),
        }
    }
}

/// Compress `data` into `writer`.
///
/// Nothing is written if `data` is empty.
///
/// # Errors
/// - `HuffmanError::EmptyInput` for empty `data`
/// - `Error::Io` if the writer fails
pub fn compress_to<W: Write>(data: &[u8], mut writer: W, format: Format) -> Result<Metrics> {
    let mut metrics = Metrics::new(Operation::Compress, format);
    metrics.raw_bytes = data.len() as u64;

    let table = FrequencyTable::from_bytes(data);
    log::trace!("frequencies: {table:?}");
    let tree = PrefixTree::from_frequencies(&table)?;
    let codes = CodeMap::from_tree(&tree);
    metrics.distinct_symbols = codes.len();

    if format == Format::Framed {
        FrameHeader::for_data(data).write_to(&mut writer)?;
    }

    let mut bits = BitWriter::new(&mut writer);
    metrics.header_bits = tree.write_header(&mut bits)?;
    metrics.payload_bits = encode(data, &codes, &mut bits)?;
    log::trace!("padding final byte with {} zero bits", (8 - bits.pending_bits()) % 8);
    bits.finish()?;

    metrics.compressed_bytes = format.prefix_len() as u64 + metrics.stream_bits().div_ceil(8);
    metrics.complete();
    log::debug!(
        "compressed {} bytes to {} ({} header bits, {} payload bits)",
        metrics.raw_bytes,
        metrics.compressed_bytes,
        metrics.header_bits,
        metrics.payload_bits
    );
    Ok(metrics)
}

/// Decompress a stream produced by [`compress_to`] with the same `format`.
///
/// # Errors
/// - `FormatError` variants for a damaged or truncated stream
/// - `Error::Crc` if the framed checksum doesn't match the output
/// - `Error::Io` if the reader or writer fails
pub fn decompress_from<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    format: Format,
) -> Result<Metrics> {
    let mut metrics = Metrics::new(Operation::Decompress, format);

    let frame = match format {
        Format::Framed => Some(FrameHeader::read_from(&mut reader)?),
        Format::Bare => None,
    };

    let mut bits = BitReader::new(reader);
    let tree = PrefixTree::read_header(&mut bits)?;
    metrics.header_bits = bits.bits_read();
    metrics.distinct_symbols = tree.leaf_count();

    match frame {
        Some(frame) => {
            let mut sink = ChecksumWriter::new(&mut writer);
            metrics.raw_bytes =
                Decoder::new(&tree, &mut bits).decode_exact(frame.raw_len, &mut sink)?;
            frame.verify(sink.checksum())?;
        }
        None => {
            metrics.raw_bytes = Decoder::new(&tree, &mut bits).decode_to_end(&mut writer)?;
        }
    }
    writer.flush()?;

    metrics.payload_bits = bits.bits_read() - metrics.header_bits;
    metrics.compressed_bytes = format.prefix_len() as u64 + bits.bits_read().div_ceil(8);

    let trailing = io::copy(&mut bits.into_inner(), &mut io::sink())?;
    if trailing > 0 {
        log::warn!("ignoring {trailing} bytes after the end of the payload");
        metrics.compressed_bytes += trailing;
    }

    metrics.complete();
    log::debug!(
        "decompressed {} bytes from {}",
        metrics.raw_bytes,
        metrics.compressed_bytes
    );
    Ok(metrics)
}

/// Compress a buffer in memory.
pub fn compress_bytes(data: &[u8], format: Format) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    compress_to(data, &mut out, format)?;
    Ok(out)
}

/// Decompress a buffer in memory.
pub fn decompress_bytes(bytes: &[u8], format: Format) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress_from(bytes, &mut out, format)?;
    Ok(out)
}

/// Compress the file at `input` into a new file at `output`.
///
/// An empty input is rejected before `output` is created.
pub fn compress_file(input: &Path, output: &Path, format: Format) -> Result<Metrics> {
    let data = fs::read(input)?;
    if data.is_empty() {
        return Err(HuffmanError::EmptyInput.into());
    }

    let writer = BufWriter::new(File::create(output)?);
    compress_to(&data, writer, format)
}

/// Decompress the file at `input` into a new file at `output`.
pub fn decompress_file(input: &Path, output: &Path, format: Format) -> Result<Metrics> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    decompress_from(reader, writer, format)
}

/// Compress `input` into `output` in the framed format.
pub fn compress(input: &Path, output: &Path) -> Result<Metrics> {
    compress_file(input, output, Format::Framed)
}

/// Decompress framed `input` into `output`.
pub fn decompress(input: &Path, output: &Path) -> Result<Metrics> {
    decompress_file(input, output, Format::Framed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, FormatError};

    #[test]
    fn test_abbccc_framed() {
        let mut out = Vec::new();
        let metrics = compress_to(b"abbccc", &mut out, Format::Framed).unwrap();

        assert_eq!(metrics.header_bits, 29);
        assert_eq!(metrics.payload_bits, 9);
        assert!(metrics.stream_bits() < 48);
        assert_eq!(metrics.compressed_bytes, out.len() as u64);
        assert_eq!(out.len(), HEADER_SIZE + 5);

        assert_eq!(decompress_bytes(&out, Format::Framed).unwrap(), b"abbccc");
    }

    #[test]
    fn test_abbccc_bare_shows_padding_caveat() {
        let out = compress_bytes(b"abbccc", Format::Bare).unwrap();
        assert_eq!(out.len(), 5);

        // 38 bits leave 2 zero padding bits, each a complete code for 'c'.
        assert_eq!(decompress_bytes(&out, Format::Bare).unwrap(), b"abbccccc");
    }

    #[test]
    fn test_bare_exact_fit() {
        // 2 leaves: 19 header bits + 5 payload bits = 24 bits, no padding.
        let data = b"xyyyy";
        let out = compress_bytes(data, Format::Bare).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(decompress_bytes(&out, Format::Bare).unwrap(), data);
    }

    #[test]
    fn test_single_symbol_framed() {
        let data = vec![0x41; 1000];
        let out = compress_bytes(&data, Format::Framed).unwrap();
        // 9 header bits + 1000 payload bits.
        assert_eq!(out.len(), HEADER_SIZE + 127);
        assert_eq!(decompress_bytes(&out, Format::Framed).unwrap(), data);
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        let mut out = Vec::new();
        let result = compress_to(b"", &mut out, Format::Framed);
        assert!(matches!(
            result,
            Err(Error::Huffman(HuffmanError::EmptyInput))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_corrupt_payload_fails_crc_or_format() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let mut out = compress_bytes(data, Format::Framed).unwrap();
        let last = out.len() - 1;
        out[last] ^= 0x80;

        let result = decompress_bytes(&out, Format::Framed);
        assert!(matches!(
            result,
            Err(Error::Crc { .. }) | Err(Error::Format(FormatError::TruncatedPayload { .. }))
        ));
    }

    #[test]
    fn test_truncated_file() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let out = compress_bytes(data, Format::Framed).unwrap();

        let result = decompress_bytes(&out[..HEADER_SIZE + 4], Format::Framed);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::TruncatedHeader { .. }))
        ));

        let result = decompress_bytes(&out[..out.len() - 2], Format::Framed);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::TruncatedPayload { .. }))
        ));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let data = b"hello hello hello";
        let mut out = compress_bytes(data, Format::Framed).unwrap();
        out.extend_from_slice(&[0xAA, 0xBB]);

        let mut decoded = Vec::new();
        let metrics = decompress_from(out.as_slice(), &mut decoded, Format::Framed).unwrap();
        assert_eq!(decoded, data);
        assert_eq!(metrics.compressed_bytes, out.len() as u64);
    }

    #[test]
    fn test_format_display() {
        assert_eq!(Format::default(), Format::Framed);
        assert_eq!(Format::Framed.to_string(), "framed");
        assert_eq!(Format::Bare.to_string(), "bare");
    }
}
