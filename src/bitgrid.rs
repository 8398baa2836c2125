//! Bit-packed boolean grid storage
//!
//! Cell `(x, y)` lives at bit `y * width + x`, packed LSB-first into bytes.

use std::ops::{BitAnd, BitOr, Not};

/// Number of bytes needed to hold `bits` packed bits.
pub(crate) fn packed_len(bits: usize) -> usize {
    bits.div_ceil(8)
}

#[inline]
pub(crate) fn read_bit(data: &[u8], index: usize) -> bool {
    data.get(index / 8)
        .map_or(false, |byte| (byte >> (index % 8)) & 1 == 1)
}

#[inline]
pub(crate) fn write_bit(data: &mut [u8], index: usize, value: bool) {
    if let Some(byte) = data.get_mut(index / 8) {
        let mask = 1u8 << (index % 8);
        if value {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }
}

/// Dense 2-D boolean field stored at one bit per cell.
///
/// Coordinates outside the grid read as `false` and ignore writes. Equality is
/// logical: padding bits in the last byte are not compared.
#[derive(Debug, Clone, Default)]
pub struct BitGrid {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitGrid {
    /// Create an empty 0x0 grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid of the given size with every cell false.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; packed_len(width * height)],
        }
    }

    /// Wrap an already packed buffer. The caller guarantees the length.
    pub(crate) fn from_packed(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), packed_len(width * height));
        Self { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells.
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    /// Length of the packed buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Packed cell bits, LSB-first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.index(x, y)
            .map_or(false, |index| read_bit(&self.data, index))
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if let Some(index) = self.index(x, y) {
            write_bit(&mut self.data, index, value);
        }
    }

    pub fn toggle(&mut self, x: usize, y: usize) {
        if let Some(index) = self.index(x, y) {
            self.data[index / 8] ^= 1 << (index % 8);
        }
    }

    /// Reset every cell to false.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Count of true cells; padding bits are never counted.
    pub fn count_true(&self) -> usize {
        let bits = self.size();
        let full = bits / 8;
        let mut count: usize = self.data[..full]
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum();
        let rem = bits % 8;
        if rem > 0 {
            let mask = (1u8 << rem) - 1;
            count += (self.data[full] & mask).count_ones() as usize;
        }
        count
    }

    /// Fraction of true cells, 0.0 for an empty grid.
    pub fn density(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        self.count_true() as f32 / self.size() as f32
    }

    /// Change the dimensions, keeping the overlapping top-left rectangle.
    ///
    /// A zero width or height leaves the grid untouched. Cells outside the
    /// overlap come back false.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == 0 || height == 0 {
            tracing::debug!(width, height, "ignoring resize to empty dimensions");
            return;
        }

        let mut resized = BitGrid::with_size(width, height);
        for y in 0..self.height.min(height) {
            for x in 0..self.width.min(width) {
                resized.set(x, y, self.get(x, y));
            }
        }
        *self = resized;
    }

    /// Iterate over the coordinates of all true cells in row-major order.
    pub fn iter_set(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        (0..self.size())
            .filter(move |&i| read_bit(&self.data, i))
            .map(move |i| (i % width, i / width))
    }

    fn combine(&self, other: &BitGrid, op: impl Fn(u8, u8) -> u8) -> BitGrid {
        if self.width != other.width || self.height != other.height {
            return BitGrid::new();
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| op(a, b))
            .collect();
        BitGrid::from_packed(self.width, self.height, data)
    }
}

impl PartialEq for BitGrid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && (0..self.size()).all(|i| read_bit(&self.data, i) == read_bit(&other.data, i))
    }
}

impl Eq for BitGrid {}

impl BitAnd for &BitGrid {
    type Output = BitGrid;

    fn bitand(self, rhs: &BitGrid) -> BitGrid {
        self.combine(rhs, |a, b| a & b)
    }
}

impl BitAnd for BitGrid {
    type Output = BitGrid;

    fn bitand(self, rhs: BitGrid) -> BitGrid {
        &self & &rhs
    }
}

impl BitOr for &BitGrid {
    type Output = BitGrid;

    fn bitor(self, rhs: &BitGrid) -> BitGrid {
        self.combine(rhs, |a, b| a | b)
    }
}

impl BitOr for BitGrid {
    type Output = BitGrid;

    fn bitor(self, rhs: BitGrid) -> BitGrid {
        &self | &rhs
    }
}

impl Not for &BitGrid {
    type Output = BitGrid;

    /// Flips whole bytes, so padding bits in the last byte are set as well.
    fn not(self) -> BitGrid {
        let data = self.data.iter().map(|b| !b).collect();
        BitGrid::from_packed(self.width, self.height, data)
    }
}

impl Not for BitGrid {
    type Output = BitGrid;

    fn not(self) -> BitGrid {
        !&self
    }
}
