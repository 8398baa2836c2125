//! Conversion between images and grids
//!
//! Edge masks arrive as 8-bit grayscale or color frames; any pixel brighter
//! than the cutoff becomes a set cell.

use image::{DynamicImage, GrayImage, Luma};

use crate::bitgrid::BitGrid;
use crate::Compressor;

/// Luma cutoff used by [`BitGrid::from_image`].
pub const DEFAULT_THRESHOLD: u8 = 127;

impl BitGrid {
    /// Threshold an image at [`DEFAULT_THRESHOLD`] after grayscale conversion.
    pub fn from_image(image: &DynamicImage) -> BitGrid {
        Self::from_luma_threshold(&image.to_luma8(), DEFAULT_THRESHOLD)
    }

    /// Set every cell whose luma is strictly greater than `threshold`.
    pub fn from_luma_threshold(image: &GrayImage, threshold: u8) -> BitGrid {
        let (width, height) = image.dimensions();
        let mut grid = BitGrid::with_size(width as usize, height as usize);
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel.0[0] > threshold {
                grid.set(x as usize, y as usize, true);
            }
        }
        grid
    }

    /// Render as a single-channel image: set cells are 255, the rest 0.
    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            if self.get(x as usize, y as usize) {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }
}

impl Compressor {
    /// Threshold an image at the configured cutoff.
    pub fn grid_from_image(&self, image: &DynamicImage) -> BitGrid {
        BitGrid::from_luma_threshold(&image.to_luma8(), self.config().threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_threshold_is_strict() {
        let mut image = GrayImage::new(3, 1);
        image.put_pixel(0, 0, Luma([127]));
        image.put_pixel(1, 0, Luma([128]));
        image.put_pixel(2, 0, Luma([255]));
        let grid = BitGrid::from_image(&DynamicImage::ImageLuma8(image));
        assert_eq!(grid.to_matrix(), vec![vec![false, true, true]]);
    }

    #[test]
    fn test_color_input_is_grayscaled() {
        let mut image = RgbImage::new(2, 2);
        image.put_pixel(1, 1, Rgb([255, 255, 255]));
        image.put_pixel(0, 1, Rgb([10, 10, 10]));
        let grid = BitGrid::from_image(&DynamicImage::ImageRgb8(image));
        assert_eq!((grid.width(), grid.height()), (2, 2));
        assert_eq!(grid.iter_set().collect::<Vec<_>>(), vec![(1, 1)]);
    }

    #[test]
    fn test_custom_threshold() {
        let image = GrayImage::from_pixel(2, 1, Luma([60]));
        assert_eq!(BitGrid::from_luma_threshold(&image, 50).count_true(), 2);
        assert_eq!(BitGrid::from_luma_threshold(&image, 60).count_true(), 0);
    }

    #[test]
    fn test_configured_threshold() {
        let config = crate::CompressionConfig {
            threshold: 10,
            ..crate::CompressionConfig::default()
        };
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(3, 3, Luma([40])));
        assert_eq!(Compressor::new(config).grid_from_image(&image).count_true(), 9);
        assert_eq!(Compressor::default().grid_from_image(&image).count_true(), 0);
    }

    #[test]
    fn test_render_mask() {
        let mut grid = BitGrid::with_size(2, 2);
        grid.set(0, 1, true);
        let image = grid.to_image();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 1).0[0], 255);
        assert_eq!(image.get_pixel(1, 1).0[0], 0);
        assert_eq!(BitGrid::from_image(&DynamicImage::ImageLuma8(image)), grid);
    }

    #[test]
    fn test_empty_image() {
        let grid = BitGrid::from_image(&DynamicImage::ImageLuma8(GrayImage::new(0, 0)));
        assert!(grid.is_empty());
        assert_eq!(grid.byte_size(), 0);
    }
}
