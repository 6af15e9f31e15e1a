//! Container framing for compressed files.
//!
//! The bare bitstream (tree header followed by payload) carries no length, so
//! the decoder cannot tell the zero padding of the last byte from real codes.
//! The framed container puts a fixed prefix in front of it that records the
//! original length and a checksum.
//!
//! # Frame Format
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x48 0x55 0x46 0x5A ("HUFZ")
//! +------------------+
//! | version (1)      |  currently 1
//! +------------------+
//! | raw_len (8)      |  u64 little-endian, original length
//! +------------------+
//! | crc32 (4)        |  u32 little-endian, CRC32 of the original bytes
//! +------------------+
//! | bitstream        |  tree header + payload, MSB-first, zero padded
//! | (variable)       |
//! +------------------+
//! ```

use std::io::{self, ErrorKind, Read, Write};

use crate::error::{Error, FormatError, Result};

/// Magic number for framed files: "HUFZ"
pub const MAGIC: [u8; 4] = [0x48, 0x55, 0x46, 0x5A];

/// Container version written by this build
pub const VERSION: u8 = 1;

/// Size of the frame prefix in bytes
pub const HEADER_SIZE: usize = 17;

/// Parsed frame prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Original uncompressed data length
    pub raw_len: u64,

    /// CRC32 checksum of the original data
    pub crc32: u32,
}

impl FrameHeader {
    /// Describe `data` for framing.
    pub fn for_data(data: &[u8]) -> Self {
        Self {
            raw_len: data.len() as u64,
            crc32: crc32fast::hash(data),
        }
    }

    /// Serialize the prefix.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&MAGIC);
        bytes[4] = VERSION;
        bytes[5..13].copy_from_slice(&self.raw_len.to_le_bytes());
        bytes[13..17].copy_from_slice(&self.crc32.to_le_bytes());
        bytes
    }

    /// Parse a prefix from the start of `bytes`.
    ///
    /// # Errors
    /// - `FormatError::FrameTooShort` if fewer than `HEADER_SIZE` bytes
    /// - `FormatError::InvalidMagic` if the magic number doesn't match
    /// - `FormatError::UnsupportedVersion` for any version but `VERSION`
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let Some(header) = bytes.get(..HEADER_SIZE) else {
            return Err(FormatError::FrameTooShort {
                required: HEADER_SIZE,
            }
            .into());
        };

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[0..4]);
        if magic != MAGIC {
            return Err(FormatError::InvalidMagic {
                expected: MAGIC,
                actual: magic,
            }
            .into());
        }

        if header[4] != VERSION {
            return Err(FormatError::UnsupportedVersion(header[4]).into());
        }

        let mut raw_len = [0u8; 8];
        raw_len.copy_from_slice(&header[5..13]);
        let mut crc32 = [0u8; 4];
        crc32.copy_from_slice(&header[13..17]);

        Ok(Self {
            raw_len: u64::from_le_bytes(raw_len),
            crc32: u32::from_le_bytes(crc32),
        })
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Read and parse the prefix from a stream.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        reader.read_exact(&mut bytes).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => Error::from(FormatError::FrameTooShort {
                required: HEADER_SIZE,
            }),
            _ => Error::from(e),
        })?;
        Self::parse(&bytes)
    }

    /// Check decoded output against the recorded checksum.
    pub fn verify(&self, actual: u32) -> Result<()> {
        if actual != self.crc32 {
            return Err(Error::Crc {
                expected: self.crc32,
                actual,
            });
        }
        Ok(())
    }
}

/// Pass-through writer that checksums everything written.
pub(crate) struct ChecksumWriter<W: Write> {
    inner: W,
    hasher: crc32fast::Hasher,
}

impl<W: Write> ChecksumWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: crc32fast::Hasher::new(),
        }
    }

    pub(crate) fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

impl<W: Write> Write for ChecksumWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_parse_round_trip() {
        let header = FrameHeader::for_data(b"hello world! this is a test.");
        assert_eq!(header.raw_len, 28);

        let bytes = header.to_bytes();
        assert_eq!(&bytes[0..4], b"HUFZ");
        assert_eq!(bytes[4], VERSION);
        assert_eq!(FrameHeader::parse(&bytes).unwrap(), header);
    }

    #[test]
    fn test_known_checksum() {
        // Standard CRC-32 check value.
        assert_eq!(FrameHeader::for_data(b"123456789").crc32, 0xCBF43926);
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = FrameHeader::for_data(b"x").to_bytes();
        bytes[0] = 0xFF;

        let result = FrameHeader::parse(&bytes);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::InvalidMagic { .. }))
        ));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = FrameHeader::for_data(b"x").to_bytes();
        bytes[4] = 9;

        let result = FrameHeader::parse(&bytes);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::UnsupportedVersion(9)))
        ));
    }

    #[test]
    fn test_frame_too_short() {
        let bytes = [0x48, 0x55, 0x46];
        assert!(matches!(
            FrameHeader::parse(&bytes),
            Err(Error::Format(FormatError::FrameTooShort { required: HEADER_SIZE }))
        ));
        assert!(matches!(
            FrameHeader::read_from(&mut &bytes[..]),
            Err(Error::Format(FormatError::FrameTooShort { .. }))
        ));
    }

    #[test]
    fn test_write_read_stream() {
        let header = FrameHeader::for_data(&[7u8; 300]);
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes.extend_from_slice(b"payload");

        let mut reader = bytes.as_slice();
        assert_eq!(FrameHeader::read_from(&mut reader).unwrap(), header);
        assert_eq!(reader, b"payload");
    }

    #[test]
    fn test_verify() {
        let header = FrameHeader::for_data(b"test data");
        assert!(header.verify(crc32fast::hash(b"test data")).is_ok());
        assert!(matches!(
            header.verify(crc32fast::hash(b"test dat4")),
            Err(Error::Crc { .. })
        ));
    }

    #[test]
    fn test_checksum_writer() {
        let mut out = Vec::new();
        let mut writer = ChecksumWriter::new(&mut out);
        writer.write_all(b"1234").unwrap();
        writer.write_all(b"56789").unwrap();
        assert_eq!(writer.checksum(), 0xCBF43926);
        assert_eq!(out, b"123456789");
    }
}
