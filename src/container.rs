//! Raw (uncompressed) serialization and the boolean-matrix bridge
//!
//! Raw form: `[width: u32 LE][height: u32 LE][packed bits]`.

use crate::bitgrid::{packed_len, BitGrid};
use crate::error::{GridError, Result};

/// Size of the width/height header in bytes.
pub const HEADER_LEN: usize = 8;

pub(crate) fn write_dims(out: &mut Vec<u8>, width: usize, height: usize) {
    out.extend_from_slice(&(width as u32).to_le_bytes());
    out.extend_from_slice(&(height as u32).to_le_bytes());
}

/// Read `(width, height)` from the first eight bytes of `data`.
pub(crate) fn read_dims(data: &[u8]) -> Result<(usize, usize)> {
    if data.len() < HEADER_LEN {
        return Err(GridError::Truncated {
            needed: HEADER_LEN,
            actual: data.len(),
        });
    }
    let width = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let height = u32::from_le_bytes([data[4], data[5], data[6], data[7]]) as usize;
    Ok((width, height))
}

impl BitGrid {
    /// Serialize to the raw form: header followed by the packed bits.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.byte_size());
        write_dims(&mut out, self.width(), self.height());
        out.extend_from_slice(self.as_bytes());
        out
    }

    /// Replace the contents with `width x height` cells packed in `data`.
    ///
    /// Bytes past the packed length are ignored. On a short buffer the grid
    /// is left as it was.
    pub fn from_bytes(&mut self, data: &[u8], width: usize, height: usize) -> Result<()> {
        let expected = packed_len(width * height);
        if data.len() < expected {
            return Err(GridError::BufferTooShort {
                expected,
                actual: data.len(),
            });
        }
        *self = BitGrid::from_packed(width, height, data[..expected].to_vec());
        Ok(())
    }

    /// Parse a complete raw buffer as produced by [`BitGrid::to_bytes`].
    pub fn parse_raw(data: &[u8]) -> Result<BitGrid> {
        let (width, height) = read_dims(data)?;
        let mut grid = BitGrid::new();
        grid.from_bytes(&data[HEADER_LEN..], width, height)?;
        Ok(grid)
    }

    /// Build a grid from rows of booleans. Short rows are padded with false.
    pub fn from_matrix(rows: &[Vec<bool>]) -> BitGrid {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = BitGrid::with_size(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                grid.set(x, y, value);
            }
        }
        grid
    }

    pub fn to_matrix(&self) -> Vec<Vec<bool>> {
        (0..self.height())
            .map(|y| (0..self.width()).map(|x| self.get(x, y)).collect())
            .collect()
    }
}
