//! Run-length coding over the logical bit stream of a grid
//!
//! Each run is a `[value][length]` pair, `value` being 0 or 1 and `length`
//! at most 255 bits. Longer runs are split.

use crate::bitgrid::{packed_len, read_bit, write_bit};

/// Longest run a single pair can describe.
pub const MAX_RUN: usize = 255;

/// Encode the first `bit_len` bits of the packed buffer `data`.
pub fn compress(data: &[u8], bit_len: usize) -> Vec<u8> {
    let mut output = Vec::new();
    let mut i = 0;
    while i < bit_len {
        let bit = read_bit(data, i);
        let mut run = 1;
        while i + run < bit_len && read_bit(data, i + run) == bit && run < MAX_RUN {
            run += 1;
        }
        output.push(bit as u8);
        output.push(run as u8);
        i += run;
    }
    output
}

/// Replay run pairs into a packed buffer of `bit_len` bits.
///
/// Stops once `bit_len` bits are written or the pairs run out; anything not
/// covered stays zero. A dangling odd byte is ignored.
pub fn decompress(data: &[u8], bit_len: usize) -> Vec<u8> {
    let mut output = vec![0u8; packed_len(bit_len)];
    let mut cursor = 0;
    for pair in data.chunks_exact(2) {
        if cursor >= bit_len {
            break;
        }
        let value = pair[0] != 0;
        let run = (pair[1] as usize).min(bit_len - cursor);
        if value {
            for index in cursor..cursor + run {
                write_bit(&mut output, index, true);
            }
        }
        cursor += run;
    }
    output
}
