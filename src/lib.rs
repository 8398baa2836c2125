//! bitgrid-compress: bit-packed binary grids with pluggable compression.
//!
//! A [`BitGrid`] stores a dense boolean field (typically an edge mask) at one
//! bit per cell. Grids serialize to a self-describing envelope:
//!
//! ```text
//! [method: u8][width: u32 LE][height: u32 LE][payload...]
//! ```
//!
//! with one of four payload encodings:
//! - `None`: the packed bits as-is
//! - `Rle`: run-length pairs over the logical bit stream
//! - `Dictionary`: LZ-style back-references over the raw form
//! - `Entropy`: Huffman coding over the raw form
//!
//! The raw form is the output of [`BitGrid::to_bytes`]; the dictionary and
//! entropy payloads embed it whole, dimension header included.

pub mod bitgrid;
pub mod config;
pub mod container;
pub mod dictionary;
pub mod error;
pub mod huffman;
#[cfg(feature = "image")]
pub mod image_bridge;
pub mod persist;
pub mod rle;

pub use crate::bitgrid::BitGrid;
pub use crate::config::CompressionConfig;
pub use crate::error::{GridError, Result};

use crate::bitgrid::packed_len;
use crate::container::{read_dims, write_dims, HEADER_LEN};
use crate::dictionary::DictionaryParams;

/// Envelope header length: method tag plus dimensions.
pub const ENVELOPE_HEADER_LEN: usize = 1 + HEADER_LEN;

/// Compression method selection, stored as the envelope's first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CompressionMethod {
    None = 0,
    Rle = 1,
    Dictionary = 2,
    Entropy = 3,
}

impl CompressionMethod {
    pub const ALL: [CompressionMethod; 4] = [
        CompressionMethod::None,
        CompressionMethod::Rle,
        CompressionMethod::Dictionary,
        CompressionMethod::Entropy,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CompressionMethod {
    type Error = GridError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(CompressionMethod::None),
            1 => Ok(CompressionMethod::Rle),
            2 => Ok(CompressionMethod::Dictionary),
            3 => Ok(CompressionMethod::Entropy),
            other => Err(GridError::UnknownMethod(other)),
        }
    }
}

/// Size statistics for an envelope relative to a grid
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressionInfo {
    /// Packed size of the grid in bytes.
    pub original_size: usize,
    pub compressed_size: usize,
    /// `compressed_size / original_size`, 0 for an empty grid.
    pub ratio: f32,
    pub method: CompressionMethod,
}

/// Decoded envelope header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeHeader {
    pub method: CompressionMethod,
    pub width: usize,
    pub height: usize,
}

/// The envelope engine: runs codecs and frames their output
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CompressionConfig,
}

impl Compressor {
    /// Create a new compressor with the given configuration
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    fn dictionary_params(&self) -> DictionaryParams {
        DictionaryParams {
            window: self.config.dict_window,
            min_match: self.config.dict_min_match,
            escape_marker: self.config.dict_escape_marker,
        }
    }

    /// Compress a grid into an envelope using the specified method
    pub fn compress(&self, grid: &BitGrid, method: CompressionMethod) -> Result<Vec<u8>> {
        let payload = match method {
            CompressionMethod::None => grid.as_bytes().to_vec(),
            CompressionMethod::Rle => rle::compress(grid.as_bytes(), grid.size()),
            CompressionMethod::Dictionary => {
                dictionary::compress(&grid.to_bytes(), &self.dictionary_params())
            }
            CompressionMethod::Entropy => huffman::compress(&grid.to_bytes())?,
        };

        let mut output = Vec::with_capacity(ENVELOPE_HEADER_LEN + payload.len());
        output.push(method.tag());
        write_dims(&mut output, grid.width(), grid.height());
        output.extend_from_slice(&payload);

        tracing::debug!(
            ?method,
            width = grid.width(),
            height = grid.height(),
            original = grid.byte_size(),
            compressed = output.len(),
            "compressed grid"
        );
        Ok(output)
    }

    /// Read the method tag and dimensions without decoding the payload
    pub fn peek_header(&self, envelope: &[u8]) -> Result<EnvelopeHeader> {
        let (&tag, rest) = envelope.split_first().ok_or(GridError::EmptyEnvelope)?;
        let method = CompressionMethod::try_from(tag)?;
        let (width, height) = read_dims(rest).map_err(|_| GridError::Truncated {
            needed: ENVELOPE_HEADER_LEN,
            actual: envelope.len(),
        })?;
        match width.checked_mul(height) {
            Some(cells) if cells <= self.config.max_cells => Ok(EnvelopeHeader {
                method,
                width,
                height,
            }),
            _ => Err(GridError::DimensionsTooLarge { width, height }),
        }
    }

    /// Decode an envelope into a new grid
    pub fn decompress(&self, envelope: &[u8]) -> Result<BitGrid> {
        let header = self.peek_header(envelope)?;
        let payload = &envelope[ENVELOPE_HEADER_LEN..];
        let (width, height) = (header.width, header.height);
        let bits = width * height;

        let grid = match header.method {
            CompressionMethod::None => {
                let mut grid = BitGrid::new();
                grid.from_bytes(payload, width, height)?;
                grid
            }
            CompressionMethod::Rle => {
                BitGrid::from_packed(width, height, rle::decompress(payload, bits))
            }
            CompressionMethod::Dictionary => {
                let raw = dictionary::decompress(payload);
                grid_from_raw(&raw, width, height)
            }
            CompressionMethod::Entropy => {
                let raw = huffman::decompress(payload)?;
                grid_from_raw(&raw, width, height)
            }
        };

        tracing::debug!(
            method = ?header.method,
            width,
            height,
            compressed = envelope.len(),
            "decompressed grid"
        );
        Ok(grid)
    }

    /// Decode an envelope into `grid`, leaving it untouched on failure
    pub fn decompress_into(&self, envelope: &[u8], grid: &mut BitGrid) -> Result<()> {
        *grid = self.decompress(envelope)?;
        Ok(())
    }

    /// Compare an envelope's size against the packed size of `grid`
    pub fn compression_info(&self, grid: &BitGrid, envelope: &[u8]) -> CompressionInfo {
        let original_size = grid.byte_size();
        let compressed_size = envelope.len();
        let ratio = if original_size > 0 {
            compressed_size as f32 / original_size as f32
        } else {
            0.0
        };
        let method = envelope
            .first()
            .and_then(|&tag| CompressionMethod::try_from(tag).ok())
            .unwrap_or(CompressionMethod::None);

        CompressionInfo {
            original_size,
            compressed_size,
            ratio,
            method,
        }
    }
}

/// Rebuild a grid from a decoded raw buffer, trusting the envelope's
/// dimensions. A short body is zero-filled.
fn grid_from_raw(raw: &[u8], width: usize, height: usize) -> BitGrid {
    match read_dims(raw) {
        Ok(embedded) if embedded != (width, height) => {
            tracing::warn!(
                ?embedded,
                envelope = ?(width, height),
                "embedded raw header disagrees with envelope"
            );
        }
        Err(_) => tracing::debug!(len = raw.len(), "decoded raw form lacks its header"),
        _ => {}
    }

    let expected = packed_len(width * height);
    let body = raw.get(HEADER_LEN..).unwrap_or_default();
    let mut data = vec![0u8; expected];
    let n = body.len().min(expected);
    data[..n].copy_from_slice(&body[..n]);
    BitGrid::from_packed(width, height, data)
}

impl BitGrid {
    /// Compress with the default [`Compressor`].
    pub fn compress(&self, method: CompressionMethod) -> Result<Vec<u8>> {
        Compressor::default().compress(self, method)
    }

    /// Replace this grid with the contents of an envelope. On failure the
    /// grid is unchanged.
    pub fn decompress(&mut self, envelope: &[u8]) -> Result<()> {
        Compressor::default().decompress_into(envelope, self)
    }

    pub fn compression_info(&self, envelope: &[u8]) -> CompressionInfo {
        Compressor::default().compression_info(self, envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> BitGrid {
        let mut grid = BitGrid::with_size(13, 7);
        for i in 0..7 {
            grid.set(i, i, true);
            grid.set(12 - i, i, true);
        }
        grid.set(6, 0, true);
        grid
    }

    #[test]
    fn test_envelope_header() {
        let grid = sample_grid();
        for method in CompressionMethod::ALL {
            let envelope = grid.compress(method).unwrap();
            assert_eq!(envelope[0], method.tag());
            assert_eq!(&envelope[1..5], &13u32.to_le_bytes());
            assert_eq!(&envelope[5..9], &7u32.to_le_bytes());
        }
    }

    #[test]
    fn test_none_is_tagged_raw_form() {
        let grid = sample_grid();
        let envelope = grid.compress(CompressionMethod::None).unwrap();
        assert_eq!(envelope[1..], grid.to_bytes()[..]);
    }

    #[test]
    fn test_roundtrip_all_methods() {
        let grid = sample_grid();
        let compressor = Compressor::default();
        for method in CompressionMethod::ALL {
            let envelope = compressor.compress(&grid, method).unwrap();
            let decoded = compressor.decompress(&envelope).unwrap();
            assert_eq!(decoded, grid, "roundtrip failed for {:?}", method);
        }
    }

    #[test]
    fn test_rle_tag_and_fresh_grid() {
        let grid = sample_grid();
        let envelope = grid.compress(CompressionMethod::Rle).unwrap();
        assert_eq!(envelope[0], 1);
        let mut fresh = BitGrid::new();
        fresh.decompress(&envelope).unwrap();
        assert_eq!(fresh, grid);
    }

    #[test]
    fn test_empty_envelope_fails() {
        let mut grid = sample_grid();
        assert!(matches!(grid.decompress(&[]), Err(GridError::EmptyEnvelope)));
        assert_eq!(grid, sample_grid());
    }

    #[test]
    fn test_unknown_tag_fails() {
        let mut grid = sample_grid();
        let err = grid.decompress(&[9, 1, 0, 0, 0, 1, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, GridError::UnknownMethod(9)));
        assert_eq!(grid, sample_grid());
    }

    #[test]
    fn test_truncated_header_fails() {
        let err = Compressor::default().decompress(&[1, 4, 0, 0]).unwrap_err();
        assert!(matches!(err, GridError::Truncated { needed: 9, actual: 4 }));
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let mut envelope = vec![CompressionMethod::Rle.tag()];
        envelope.extend_from_slice(&u32::MAX.to_le_bytes());
        envelope.extend_from_slice(&u32::MAX.to_le_bytes());
        let err = Compressor::default().decompress(&envelope).unwrap_err();
        assert!(matches!(err, GridError::DimensionsTooLarge { .. }));
    }

    #[test]
    fn test_none_short_body_fails() {
        let mut envelope = vec![0];
        envelope.extend_from_slice(&16u32.to_le_bytes());
        envelope.extend_from_slice(&16u32.to_le_bytes());
        envelope.extend_from_slice(&[0xAA; 5]);
        let err = Compressor::default().decompress(&envelope).unwrap_err();
        assert!(matches!(err, GridError::BufferTooShort { expected: 32, actual: 5 }));
    }

    #[test]
    fn test_truncated_rle_payload_zero_fills() {
        let grid = !&BitGrid::with_size(40, 40);
        let mut envelope = grid.compress(CompressionMethod::Rle).unwrap();
        envelope.truncate(ENVELOPE_HEADER_LEN + 2);
        let decoded = Compressor::default().decompress(&envelope).unwrap();
        assert_eq!(decoded.count_true(), 255);
        assert_eq!(decoded.size(), 1600);
    }

    #[test]
    fn test_legacy_dictionary_dialect_without_markers() {
        let config = CompressionConfig {
            dict_escape_marker: false,
            ..CompressionConfig::default()
        };
        let legacy = Compressor::new(config);
        // Diagonal cells only; no packed byte or header byte is 0xFF.
        let mut grid = BitGrid::with_size(16, 16);
        for i in 0..16 {
            grid.set(i, i, true);
        }
        let envelope = legacy.compress(&grid, CompressionMethod::Dictionary).unwrap();
        assert_eq!(envelope, grid.compress(CompressionMethod::Dictionary).unwrap());
        assert_eq!(legacy.decompress(&envelope).unwrap(), grid);
    }

    #[test]
    fn test_compression_info() {
        let grid = BitGrid::with_size(64, 64);
        let envelope = grid.compress(CompressionMethod::Rle).unwrap();
        let info = grid.compression_info(&envelope);
        assert_eq!(info.original_size, 512);
        assert_eq!(info.compressed_size, envelope.len());
        assert_eq!(info.method, CompressionMethod::Rle);
        assert!(info.ratio < 0.1);

        let empty = BitGrid::new().compression_info(&[]);
        assert_eq!(empty.ratio, 0.0);
        assert_eq!(empty.method, CompressionMethod::None);
    }

    #[test]
    fn test_method_tags() {
        for method in CompressionMethod::ALL {
            assert_eq!(CompressionMethod::try_from(method.tag()).unwrap(), method);
        }
        assert!(CompressionMethod::try_from(4).is_err());
    }
}
