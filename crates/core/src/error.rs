//! Error types for the huffzip codec.
//!
//! All operations return structured errors rather than panicking. Failures
//! from the underlying byte channel stay distinguishable from a damaged or
//! truncated compressed file.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading bits past the end of a byte source
/// - Huffman: the input cannot be coded (e.g. it is empty)
/// - Format: the compressed file is structurally invalid
/// - CRC: the decoded data does not match the stored checksum
/// - I/O: file system or stream operations
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of stream)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman codec error (e.g., empty input, missing code)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Compressed data is corrupt or truncated
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// CRC validation failed, indicating data corruption
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// File or stream I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// The byte source ended in the middle of a multi-bit read
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits requested)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Huffman codec errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuffmanError {
    /// No symbols with non-zero frequency (cannot build a tree)
    #[error("nothing to compress: input is empty")]
    EmptyInput,

    /// A byte has no code in the code map
    #[error("byte {byte:#04x} has no code in the code map")]
    MissingCode { byte: u8 },
}

/// Compressed file format errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Invalid magic number in the container header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Container version this build cannot read
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u8),

    /// File is too short to contain the container header
    #[error("frame too short: need at least {required} bytes")]
    FrameTooShort { required: usize },

    /// Bit source ended before the tree header was complete
    #[error("truncated tree header after {bits_read} bits")]
    TruncatedHeader { bits_read: u64 },

    /// Tree header nests deeper than any valid tree
    #[error("tree header nests deeper than {max} levels")]
    TreeTooDeep { max: usize },

    /// Two leaves of the tree header carry the same byte value
    #[error("byte {0:#04x} appears on more than one leaf")]
    DuplicateSymbol(u8),

    /// Bit source ended in the middle of a code or before all symbols were read
    #[error("truncated payload after {decoded} symbols")]
    TruncatedPayload { decoded: u64 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
