//! Payload decoding: tree walk from bits back to bytes.
//!
//! Each symbol starts at the root; a `0` bit descends left, a `1` bit right,
//! and reaching a leaf emits its byte. A single-leaf tree emits its byte for
//! every bit read, mirroring the one-bit code the encoder assigns it.

use std::io::{Read, Write};

use crate::bitio::BitReader;
use crate::error::{Error, FormatError, Result};
use crate::tree::{Node, PrefixTree};

/// Output is handed to the sink in blocks of this size.
const OUTPUT_BLOCK: usize = 8 * 1024;

/// Streaming symbol decoder over a bit source.
pub struct Decoder<'a, R: Read> {
    tree: &'a PrefixTree,
    reader: &'a mut BitReader<R>,
    decoded: u64,
}

impl<'a, R: Read> Decoder<'a, R> {
    pub fn new(tree: &'a PrefixTree, reader: &'a mut BitReader<R>) -> Self {
        Self {
            tree,
            reader,
            decoded: 0,
        }
    }

    /// Number of symbols decoded so far.
    pub fn decoded(&self) -> u64 {
        self.decoded
    }

    /// Decode one symbol.
    ///
    /// Returns `Ok(None)` if the source is exhausted before the first bit of
    /// a symbol.
    ///
    /// # Errors
    /// `FormatError::TruncatedPayload` if the source ends inside a code.
    pub fn next_symbol(&mut self) -> Result<Option<u8>> {
        let mut node = self.tree.root();

        if let Node::Leaf { byte, .. } = node {
            return match self.reader.read_bit()? {
                Some(_) => {
                    self.decoded += 1;
                    Ok(Some(*byte))
                }
                None => Ok(None),
            };
        }

        let mut at_root = true;
        loop {
            match node {
                Node::Leaf { byte, .. } => {
                    self.decoded += 1;
                    return Ok(Some(*byte));
                }
                Node::Internal { left, right, .. } => {
                    node = match self.reader.read_bit()? {
                        Some(true) => right,
                        Some(false) => left,
                        None if at_root => return Ok(None),
                        None => {
                            return Err(FormatError::TruncatedPayload {
                                decoded: self.decoded,
                            }
                            .into())
                        }
                    };
                    at_root = false;
                }
            }
        }
    }

    /// Decode exactly `count` symbols into `out`.
    ///
    /// # Errors
    /// `FormatError::TruncatedPayload` if the source runs out first.
    pub fn decode_exact<W: Write>(&mut self, count: u64, out: &mut W) -> Result<u64> {
        let mut block = Vec::with_capacity(OUTPUT_BLOCK);
        for _ in 0..count {
            let byte = self.next_symbol()?.ok_or(FormatError::TruncatedPayload {
                decoded: self.decoded,
            })?;
            push(&mut block, byte, out)?;
        }
        out.write_all(&block)?;
        Ok(count)
    }

    /// Decode until the source is exhausted.
    ///
    /// A code left incomplete at the end is taken to be padding and dropped.
    /// Padding bits that happen to spell a complete code cannot be told
    /// apart from data and are decoded like any other symbol.
    pub fn decode_to_end<W: Write>(&mut self, out: &mut W) -> Result<u64> {
        let start = self.decoded;
        let mut block = Vec::with_capacity(OUTPUT_BLOCK);
        loop {
            match self.next_symbol() {
                Ok(Some(byte)) => push(&mut block, byte, out)?,
                Ok(None) => break,
                Err(Error::Format(FormatError::TruncatedPayload { decoded })) => {
                    log::debug!("discarding incomplete trailing code after {decoded} symbols");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        out.write_all(&block)?;
        Ok(self.decoded - start)
    }
}

fn push<W: Write>(block: &mut Vec<u8>, byte: u8, out: &mut W) -> Result<()> {
    block.push(byte);
    if block.len() == OUTPUT_BLOCK {
        out.write_all(block)?;
        block.clear();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::BitWriter;
    use crate::codebook::CodeMap;
    use crate::encoder::encode;

    fn encode_payload(tree: &PrefixTree, data: &[u8]) -> Vec<u8> {
        let codes = CodeMap::from_tree(tree);
        let mut bytes = Vec::new();
        let mut writer = BitWriter::new(&mut bytes);
        encode(data, &codes, &mut writer).unwrap();
        writer.finish().unwrap();
        bytes
    }

    #[test]
    fn test_decode_exact() {
        let data = b"abracadabra";
        let tree = PrefixTree::from_bytes(data).unwrap();
        let payload = encode_payload(&tree, data);

        let mut reader = BitReader::new(payload.as_slice());
        let mut decoder = Decoder::new(&tree, &mut reader);
        let mut out = Vec::new();
        assert_eq!(decoder.decode_exact(data.len() as u64, &mut out).unwrap(), 11);
        assert_eq!(out, data);
    }

    #[test]
    fn test_decode_exact_single_symbol() {
        let data = vec![0x41; 1000];
        let tree = PrefixTree::from_bytes(&data).unwrap();
        let payload = encode_payload(&tree, &data);
        assert_eq!(payload.len(), 125);

        let mut reader = BitReader::new(payload.as_slice());
        let mut out = Vec::new();
        Decoder::new(&tree, &mut reader)
            .decode_exact(1000, &mut out)
            .unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_decode_exact_runs_out() {
        let data = b"abbccc";
        let tree = PrefixTree::from_bytes(data).unwrap();
        let payload = encode_payload(&tree, data);

        // 9 payload bits fit in 2 bytes, which hold at most 16 symbols.
        let mut reader = BitReader::new(payload.as_slice());
        let mut out = Vec::new();
        let result = Decoder::new(&tree, &mut reader).decode_exact(100, &mut out);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::TruncatedPayload { .. }))
        ));
    }

    #[test]
    fn test_decode_to_end_reads_padding() {
        // Codes: c=0 a=10 b=11; the 7 padding zeros decode as 'c'.
        let data = b"abbccc";
        let tree = PrefixTree::from_bytes(data).unwrap();
        let payload = encode_payload(&tree, data);

        let mut reader = BitReader::new(payload.as_slice());
        let mut out = Vec::new();
        Decoder::new(&tree, &mut reader)
            .decode_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"abbcccccccccc");
    }

    #[test]
    fn test_decode_to_end_drops_incomplete_code() {
        let data = b"abbccc";
        let tree = PrefixTree::from_bytes(data).unwrap();

        // 10 11 0 0 0 1: the lone trailing 1 is not a full code.
        let payload = [0b1011_0001];
        let mut reader = BitReader::new(&payload[..]);
        let mut out = Vec::new();
        let mut decoder = Decoder::new(&tree, &mut reader);
        assert_eq!(decoder.decode_to_end(&mut out).unwrap(), 5);
        assert_eq!(decoder.decoded(), 5);
        assert_eq!(out, b"abccc");
    }

    #[test]
    fn test_next_symbol_mid_code() {
        let tree = PrefixTree::from_bytes(b"abbccc").unwrap();
        let payload = [0b0000_0001];
        let mut reader = BitReader::new(&payload[..]);
        let mut decoder = Decoder::new(&tree, &mut reader);
        for _ in 0..7 {
            assert_eq!(decoder.next_symbol().unwrap(), Some(b'c'));
        }
        assert!(matches!(
            decoder.next_symbol(),
            Err(Error::Format(FormatError::TruncatedPayload { decoded: 7 }))
        ));
    }

    #[test]
    fn test_empty_source() {
        let tree = PrefixTree::from_bytes(b"xy").unwrap();
        let mut reader = BitReader::new(&[0u8; 0][..]);
        let mut decoder = Decoder::new(&tree, &mut reader);
        assert_eq!(decoder.next_symbol().unwrap(), None);
        assert_eq!(decoder.decoded(), 0);
    }
}
