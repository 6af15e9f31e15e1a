//! huffzip-core: lossless file compression with Huffman prefix codes
//!
//! This library provides the codec behind the `huffzip` tool:
//! - Counts byte frequencies over the whole input
//! - Builds an optimal prefix tree with a deterministic tie-break
//! - Writes the tree and the encoded payload as one MSB-first bitstream
//! - Rebuilds the tree from that header and decodes the payload
//!
//! # Architecture
//!
//! - `bitio`: bit-level adapters over `Read`/`Write`
//! - `frequency`: byte frequency table
//! - `tree`: tree builder and header serializer/deserializer
//! - `codebook`: byte → code map
//! - `encoder` / `decoder`: payload coding
//! - `framing`: length- and checksum-prefixed container
//! - `codec`: compress/decompress pipelines over streams, buffers and files
//! - `inspect`: header inspection without decoding
//! - `metrics`: sizes and timing of a run
//!
//! # Example
//! ```
//! use huffzip_core::{compress_bytes, decompress_bytes, Format};
//!
//! let packed = compress_bytes(b"abbccc", Format::Framed).unwrap();
//! assert_eq!(decompress_bytes(&packed, Format::Framed).unwrap(), b"abbccc");
//! ```

pub mod bitio;
pub mod codebook;
pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod framing;
pub mod frequency;
pub mod inspect;
pub mod metrics;
pub mod tree;

// Re-export commonly used types
pub use codec::{
    compress, compress_bytes, compress_file, compress_to, decompress, decompress_bytes,
    decompress_file, decompress_from, Format,
};
pub use error::{Error, Result};
pub use inspect::{inspect, inspect_bytes, Inspection};
pub use metrics::{Metrics, Operation};
