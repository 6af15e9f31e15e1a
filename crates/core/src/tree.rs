//! Prefix (Huffman) tree construction and header serialization.
//!
//! # Construction
//!
//! Leaves are seeded into a min-priority queue ordered by `(weight,
//! sequence)`. Leaves take sequence numbers in ascending byte order and each
//! merged node takes the next free number, so equal weights leave the queue
//! in insertion order and the same input always yields the same tree.
//!
//! # Header Format
//!
//! ```text
//! leaf:     1 <byte: 8 bits>
//! internal: 0 <left subtree> <right subtree>
//! ```
//!
//! Tokens are written pre-order, MSB-first, with no alignment. A tree with N
//! leaves takes `10 * N - 1` bits.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::io::{Read, Write};

use crate::bitio::{BitReader, BitWriter};
use crate::error::{BitIoError, Error, FormatError, HuffmanError, Result};
use crate::frequency::FrequencyTable;

/// Deepest leaf any tree over a 256-symbol alphabet can have.
pub const MAX_DEPTH: usize = 255;

/// A node of the prefix tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        byte: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn same_shape(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Leaf { byte: a, .. }, Node::Leaf { byte: b, .. }) => a == b,
            (
                Node::Internal {
                    left: l1,
                    right: r1,
                    ..
                },
                Node::Internal {
                    left: l2,
                    right: r2,
                    ..
                },
            ) => l1.same_shape(l2) && r1.same_shape(r2),
            _ => false,
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        match self {
            Node::Leaf { byte, .. } => {
                writer.write_bit(true)?;
                writer.write_byte(*byte)
            }
            Node::Internal { left, right, .. } => {
                writer.write_bit(false)?;
                left.write(writer)?;
                right.write(writer)
            }
        }
    }
}

/// Priority queue entry; `BinaryHeap` is a max-heap so the ordering is reversed.
struct QueueEntry {
    weight: u64,
    sequence: u64,
    node: Node,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.sequence == other.sequence
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// A single-rooted binary prefix tree.
///
/// With one distinct symbol the root itself is a leaf.
#[derive(Debug, Clone)]
pub struct PrefixTree {
    root: Node,
}

impl PrefixTree {
    /// Build the tree for a frequency table.
    ///
    /// # Errors
    /// `HuffmanError::EmptyInput` if no byte has a non-zero count.
    pub fn from_frequencies(table: &FrequencyTable) -> Result<Self> {
        let mut heap = BinaryHeap::with_capacity(table.distinct());
        let mut sequence = 0u64;
        for (byte, weight) in table.iter() {
            heap.push(QueueEntry {
                weight,
                sequence,
                node: Node::Leaf { byte, weight },
            });
            sequence += 1;
        }

        let root = loop {
            let first = heap.pop().ok_or(HuffmanError::EmptyInput)?;
            let Some(second) = heap.pop() else {
                break first.node;
            };

            let node = Node::merge(first.node, second.node);
            heap.push(QueueEntry {
                weight: node.weight(),
                sequence,
                node,
            });
            sequence += 1;
        };

        let tree = Self { root };
        log::debug!(
            "built prefix tree: {} leaves, depth {}",
            tree.leaf_count(),
            tree.depth()
        );
        Ok(tree)
    }

    /// Count `data` and build its tree.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::from_bytes(data))
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn internal_count(&self) -> usize {
        self.leaf_count() - 1
    }

    /// Length of the longest root-to-leaf path (0 for a single leaf).
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Same structure and leaf values; weights are ignored.
    pub fn is_isomorphic(&self, other: &PrefixTree) -> bool {
        self.root.same_shape(&other.root)
    }

    /// Serialize the tree pre-order and return the number of bits written.
    pub fn write_header<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<u64> {
        let start = writer.bits_written();
        self.root.write(writer)?;
        Ok(writer.bits_written() - start)
    }

    /// Rebuild a tree from its serialized header.
    ///
    /// Weights of the rebuilt nodes are zero.
    ///
    /// # Errors
    /// - `FormatError::TruncatedHeader` if the source ends inside the header
    /// - `FormatError::TreeTooDeep` if nesting exceeds [`MAX_DEPTH`]
    /// - `FormatError::DuplicateSymbol` if a byte value appears twice
    pub fn read_header<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let mut seen = [false; 256];
        let root = read_node(reader, 0, &mut seen)?;
        Ok(Self { root })
    }
}

fn read_node<R: Read>(
    reader: &mut BitReader<R>,
    depth: usize,
    seen: &mut [bool; 256],
) -> Result<Node> {
    if depth > MAX_DEPTH {
        return Err(FormatError::TreeTooDeep { max: MAX_DEPTH }.into());
    }

    match reader.read_bit()? {
        None => Err(truncated(reader)),
        Some(true) => {
            let byte = match reader.read_byte() {
                Ok(byte) => byte,
                Err(Error::BitIo(BitIoError::UnexpectedEof)) => return Err(truncated(reader)),
                Err(e) => return Err(e),
            };
            if std::mem::replace(&mut seen[byte as usize], true) {
                return Err(FormatError::DuplicateSymbol(byte).into());
            }
            Ok(Node::Leaf { byte, weight: 0 })
        }
        Some(false) => {
            let left = read_node(reader, depth + 1, seen)?;
            let right = read_node(reader, depth + 1, seen)?;
            Ok(Node::Internal {
                weight: 0,
                left: Box::new(left),
                right: Box::new(right),
            })
        }
    }
}

fn truncated<R: Read>(reader: &BitReader<R>) -> Error {
    FormatError::TruncatedHeader {
        bits_read: reader.bits_read(),
    }
    .into()
}
