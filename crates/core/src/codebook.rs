//! Code map: byte value to its root-to-leaf bit path.
//!
//! Left edges are `0`, right edges are `1`. The tree shape makes the codes
//! prefix-free; nothing here re-checks it. A single-leaf tree has an empty
//! path, so its only symbol gets the one-bit code `0` instead.

use std::collections::BTreeMap;
use std::fmt;

use crate::frequency::FrequencyTable;
use crate::tree::{Node, PrefixTree};

/// A variable-length bit string, first bit first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Whether `self` is a prefix of (or equal to) `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl From<&[bool]> for Code {
    fn from(bits: &[bool]) -> Self {
        Self { bits: bits.to_vec() }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Mapping from byte value to its code.
#[derive(Debug, Clone, Default)]
pub struct CodeMap {
    codes: BTreeMap<u8, Code>,
}

impl CodeMap {
    /// Walk the tree pre-order and record each leaf's path.
    pub fn from_tree(tree: &PrefixTree) -> Self {
        let mut codes = BTreeMap::new();
        match tree.root() {
            Node::Leaf { byte, .. } => {
                codes.insert(*byte, Code { bits: vec![false] });
            }
            root => {
                let mut path = Vec::with_capacity(tree.depth());
                collect(root, &mut path, &mut codes);
            }
        }

        let map = Self { codes };
        log::trace!("code map: {map}");
        map
    }

    pub fn get(&self, byte: u8) -> Option<&Code> {
        self.codes.get(&byte)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `(byte, code)` pairs in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&byte, code)| (byte, code))
    }

    /// Payload size in bits for data with the given frequencies.
    ///
    /// Bytes without a code contribute nothing.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> u64 {
        table
            .iter()
            .filter_map(|(byte, count)| self.get(byte).map(|code| code.len() as u64 * count))
            .sum()
    }
}

impl fmt::Display for CodeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (byte, code) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{byte:02x}={code}")?;
            first = false;
        }
        Ok(())
    }
}

fn collect(node: &Node, path: &mut Vec<bool>, codes: &mut BTreeMap<u8, Code>) {
    match node {
        Node::Leaf { byte, .. } => {
            codes.insert(*byte, Code::from(path.as_slice()));
        }
        Node::Internal { left, right, .. } => {
            path.push(false);
            collect(left, path, codes);
            path.pop();

            path.push(true);
            collect(right, path, codes);
            path.pop();
        }
    }
}
