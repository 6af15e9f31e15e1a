//! Read-only inspection of compressed files.
//!
//! Parses the frame prefix and tree header without decoding the payload.

use std::fmt;
use std::io::{self, Read};

use crate::bitio::BitReader;
use crate::codebook::CodeMap;
use crate::codec::Format;
use crate::error::Result;
use crate::framing::FrameHeader;
use crate::tree::PrefixTree;

/// What a compressed file declares about itself.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub format: Format,
    /// Frame prefix (framed files only)
    pub frame: Option<FrameHeader>,
    pub header_bits: u64,
    pub leaf_count: usize,
    pub depth: usize,
    pub codes: CodeMap,
    /// Bytes after the tree header, including the byte it ends in
    pub payload_bytes: u64,
}

/// Inspect a compressed stream.
pub fn inspect<R: Read>(mut reader: R, format: Format) -> Result<Inspection> {
    let frame = match format {
        Format::Framed => Some(FrameHeader::read_from(&mut reader)?),
        Format::Bare => None,
    };

    let mut bits = BitReader::new(reader);
    let tree = PrefixTree::read_header(&mut bits)?;
    let header_bits = bits.bits_read();
    let partial = u64::from(bits.buffered_bits() > 0);
    let rest = io::copy(&mut bits.into_inner(), &mut io::sink())?;

    Ok(Inspection {
        format,
        frame,
        header_bits,
        leaf_count: tree.leaf_count(),
        depth: tree.depth(),
        codes: CodeMap::from_tree(&tree),
        payload_bytes: rest + partial,
    })
}

/// Inspect an in-memory compressed buffer.
pub fn inspect_bytes(bytes: &[u8], format: Format) -> Result<Inspection> {
    inspect(bytes, format)
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Format: {}", self.format)?;
        if let Some(frame) = &self.frame {
            writeln!(f, "Original length: {} bytes", frame.raw_len)?;
            writeln!(f, "CRC32: {:#010x}", frame.crc32)?;
        }
        writeln!(f, "Tree header: {} bits", self.header_bits)?;
        writeln!(f, "Symbols: {}", self.leaf_count)?;
        writeln!(f, "Tree depth: {}", self.depth)?;
        writeln!(f, "Payload: {} bytes", self.payload_bytes)?;
        writeln!(f, "Codes:")?;
        for (byte, code) in self.codes.iter() {
            let shown = if byte.is_ascii_graphic() { byte as char } else { '.' };
            writeln!(f, "  {byte:#04x} {shown} {code}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compress_bytes;

    #[test]
    fn test_inspect_framed() {
        let out = compress_bytes(b"abbccc", Format::Framed).unwrap();
        let inspection = inspect_bytes(&out, Format::Framed).unwrap();

        let frame = inspection.frame.unwrap();
        assert_eq!(frame.raw_len, 6);
        assert_eq!(inspection.header_bits, 29);
        assert_eq!(inspection.leaf_count, 3);
        assert_eq!(inspection.depth, 2);
        assert_eq!(inspection.payload_bytes, 2);
        assert_eq!(inspection.codes.get(b'c').unwrap().to_string(), "0");
    }

    #[test]
    fn test_inspect_bare() {
        let out = compress_bytes(&[0x41; 1000], Format::Bare).unwrap();
        let inspection = inspect_bytes(&out, Format::Bare).unwrap();
        assert!(inspection.frame.is_none());
        assert_eq!(inspection.header_bits, 9);
        assert_eq!(inspection.leaf_count, 1);

        let text = inspection.to_string();
        assert!(text.contains("Format: bare"));
        assert!(text.contains("0x41 A 0"));
    }
}
