//! Huffman compression and decompression
//!
//! Payload layout: a 256-entry table of u32 big-endian symbol frequencies,
//! a u32 big-endian count of coded bits, then the codes packed MSB-first and
//! zero-padded to a whole byte.
//!
//! The decoder rebuilds the tree from the frequency table, so tree
//! construction must be deterministic: leaves enter the queue in symbol
//! order, merged parents after them, and equal frequencies leave the queue
//! in the order they entered.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::Cursor;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::error::{GridError, Result};

const TABLE_LEN: usize = 256 * 4;
/// Frequency table plus the bit count.
pub const PAYLOAD_HEADER_LEN: usize = TABLE_LEN + 4;

#[derive(Debug, Clone, Copy)]
enum NodeKind {
    Leaf(u8),
    Internal { left: usize, right: usize },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    freq: u64,
    kind: NodeKind,
}

/// Merge tree held in an arena; children refer to arena indices.
struct Tree {
    nodes: Vec<Node>,
    root: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct Code {
    bits: u64,
    len: u32,
}

fn build_tree(freq: &[u32; 256]) -> Option<Tree> {
    let mut nodes = Vec::with_capacity(511);
    // Arena index doubles as the insertion sequence for tie-breaks.
    let mut heap = BinaryHeap::new();
    for (symbol, &f) in freq.iter().enumerate() {
        if f > 0 {
            heap.push(Reverse((f as u64, nodes.len())));
            nodes.push(Node {
                freq: f as u64,
                kind: NodeKind::Leaf(symbol as u8),
            });
        }
    }

    while heap.len() > 1 {
        let (Some(Reverse((_, left))), Some(Reverse((_, right)))) = (heap.pop(), heap.pop()) else {
            break;
        };
        let freq = nodes[left].freq + nodes[right].freq;
        heap.push(Reverse((freq, nodes.len())));
        nodes.push(Node {
            freq,
            kind: NodeKind::Internal { left, right },
        });
    }

    heap.pop().map(|Reverse((_, root))| Tree { nodes, root })
}

/// Walk the tree: left appends 0, right appends 1. A lone leaf gets `0`.
fn build_codes(tree: &Tree) -> [Code; 256] {
    let mut codes = [Code::default(); 256];
    let mut stack = vec![(tree.root, Code::default())];
    while let Some((index, code)) = stack.pop() {
        match tree.nodes[index].kind {
            NodeKind::Leaf(symbol) => {
                codes[symbol as usize] = if code.len == 0 {
                    Code { bits: 0, len: 1 }
                } else {
                    code
                };
            }
            NodeKind::Internal { left, right } => {
                let bits = code.bits << 1;
                let len = code.len + 1;
                stack.push((left, Code { bits, len }));
                stack.push((right, Code { bits: bits | 1, len }));
            }
        }
    }
    codes
}

/// Compress data using Huffman coding
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() > u32::MAX as usize {
        return Err(GridError::InputTooLarge(data.len()));
    }

    let mut freq = [0u32; 256];
    for &b in data {
        freq[b as usize] += 1;
    }

    let codes = build_tree(&freq)
        .map(|tree| build_codes(&tree))
        .unwrap_or([Code::default(); 256]);

    let bit_count: u64 = freq
        .iter()
        .zip(&codes)
        .map(|(&f, code)| f as u64 * code.len as u64)
        .sum();
    let bit_count =
        u32::try_from(bit_count).map_err(|_| GridError::InputTooLarge(data.len()))?;

    let mut output = Vec::with_capacity(PAYLOAD_HEADER_LEN + (bit_count as usize).div_ceil(8));
    for f in freq {
        output.extend_from_slice(&f.to_be_bytes());
    }
    output.extend_from_slice(&bit_count.to_be_bytes());

    let mut writer = BitWriter::endian(&mut output, BigEndian);
    for &b in data {
        let code = codes[b as usize];
        writer.write(code.len, code.bits)?;
    }
    writer.byte_align()?;
    drop(writer);

    Ok(output)
}

/// Decompress Huffman-encoded data
///
/// Decoding stops after the recorded number of bits or at the end of the
/// payload, whichever comes first.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < PAYLOAD_HEADER_LEN {
        return Err(GridError::Truncated {
            needed: PAYLOAD_HEADER_LEN,
            actual: data.len(),
        });
    }

    let mut freq = [0u32; 256];
    for (slot, chunk) in freq.iter_mut().zip(data[..TABLE_LEN].chunks_exact(4)) {
        *slot = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    let bit_count = u32::from_be_bytes([
        data[TABLE_LEN],
        data[TABLE_LEN + 1],
        data[TABLE_LEN + 2],
        data[TABLE_LEN + 3],
    ]) as usize;

    let Some(tree) = build_tree(&freq) else {
        return Ok(Vec::new());
    };

    let body = &data[PAYLOAD_HEADER_LEN..];
    let mut output = Vec::with_capacity(bit_count.min(body.len() * 8));
    let mut reader = BitReader::endian(Cursor::new(body), BigEndian);
    let mut node = tree.root;

    for _ in 0..bit_count {
        let Ok(bit) = reader.read_bit() else {
            tracing::debug!(decoded = output.len(), "huffman payload ended early");
            break;
        };
        let next = match tree.nodes[node].kind {
            // Only reachable when the root is a lone leaf.
            NodeKind::Leaf(_) => node,
            NodeKind::Internal { left, right } => {
                if bit {
                    right
                } else {
                    left
                }
            }
        };
        if let NodeKind::Leaf(symbol) = tree.nodes[next].kind {
            output.push(symbol);
            node = tree.root;
        } else {
            node = next;
        }
    }

    Ok(output)
}
