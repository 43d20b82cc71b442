//! Feature extraction: turn a decoded image into a fixed-length descriptor.
//!
//! Every extractor is a pure function over its inputs. Extraction never
//! fails on image content, however degenerate (1x1, monochrome, flat) -
//! the only rejected inputs are non-positive bin/patch/region parameters.

use crate::{Descriptor, Error, Result};
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Default patch size for the center-patch baseline descriptor.
pub const DEFAULT_PATCH_SIZE: u32 = 7;
/// Default bins per channel for the RGB color histogram.
pub const DEFAULT_RGB_BINS: u32 = 8;
/// Default bins per axis for the rg chromaticity histogram.
pub const DEFAULT_RG_BINS: u32 = 16;
/// Default bin count for the Sobel magnitude histogram.
pub const DEFAULT_TEXTURE_BINS: u32 = 16;
/// Default region count for the multi-region histogram.
pub const DEFAULT_REGION_COUNT: u32 = 2;
/// Region count used by the sunset-oriented composite descriptor.
pub const SUNSET_REGION_COUNT: u32 = 3;

fn ensure_positive(value: u32, name: &str) -> Result<()> {
    if value == 0 {
        return Err(Error::InvalidConfig(format!("{name} must be positive")));
    }
    Ok(())
}

/// Map a value in [0, 1] to an equal-width bin index in [0, bins - 1].
///
/// The clamp guards the boundary value 1.0, which would otherwise map to
/// `bins`.
fn bin_index(value: f32, bins: u32) -> usize {
    let index = (value * bins as f32) as i64;
    index.clamp(0, i64::from(bins) - 1) as usize
}

/// Raw RGB values of the `patch_size` x `patch_size` block centered on the
/// image midpoint.
///
/// Images smaller than the patch in either dimension are first resized to
/// `patch_size` x `patch_size` (bilinear). Values are unnormalized channel
/// intensities in row-major, R-G-B order; length is
/// `patch_size^2 * 3` unless boundary clipping trims the block.
pub fn center_patch(image: &RgbImage, patch_size: u32) -> Result<Descriptor> {
    ensure_positive(patch_size, "patch_size")?;

    let resized;
    let source = if image.width() < patch_size || image.height() < patch_size {
        resized = imageops::resize(image, patch_size, patch_size, FilterType::Triangle);
        &resized
    } else {
        image
    };

    let half = patch_size / 2;
    let start_x = (source.width() / 2).saturating_sub(half);
    let start_y = (source.height() / 2).saturating_sub(half);
    let end_x = source.width().min(start_x + patch_size);
    let end_y = source.height().min(start_y + patch_size);

    let mut feature = Vec::with_capacity((patch_size * patch_size * 3) as usize);
    for y in start_y..end_y {
        for x in start_x..end_x {
            let [r, g, b] = source.get_pixel(x, y).0;
            feature.push(f32::from(r));
            feature.push(f32::from(g));
            feature.push(f32::from(b));
        }
    }
    Ok(Descriptor::new(feature))
}

fn accumulate_rgb_counts(
    image: &RgbImage,
    bins_per_channel: u32,
    row_start: u32,
    row_end: u32,
    counts: &mut [f32],
) {
    let bins = bins_per_channel as usize;
    for y in row_start..row_end {
        for x in 0..image.width() {
            let [r, g, b] = image.get_pixel(x, y).0;
            let r_bin = bin_index(f32::from(r) / 255.0, bins_per_channel);
            let g_bin = bin_index(f32::from(g) / 255.0, bins_per_channel);
            let b_bin = bin_index(f32::from(b) / 255.0, bins_per_channel);
            counts[(r_bin * bins * bins) + (g_bin * bins) + b_bin] += 1.0;
        }
    }
}

/// Normalized 3-D color histogram over the whole image.
///
/// Each channel is quantized into `bins_per_channel` equal-width bins and
/// the three bin indices are flattened row-major over the R, G, B axes.
/// Length is `bins_per_channel^3`; elements sum to 1.0 for any image with
/// at least one pixel.
pub fn rgb_histogram(image: &RgbImage, bins_per_channel: u32) -> Result<Descriptor> {
    ensure_positive(bins_per_channel, "bins_per_channel")?;

    let bins = bins_per_channel as usize;
    let mut counts = vec![0.0_f32; bins * bins * bins];
    accumulate_rgb_counts(image, bins_per_channel, 0, image.height(), &mut counts);
    Ok(Descriptor::new(counts).normalized())
}

/// Normalized 2-D chromaticity histogram over r/(r+g+b) and g/(r+g+b).
///
/// A pixel whose channel sum is zero contributes to bin (0, 0). Length is
/// `bins_per_channel^2`.
pub fn rg_chromaticity_histogram(image: &RgbImage, bins_per_channel: u32) -> Result<Descriptor> {
    ensure_positive(bins_per_channel, "bins_per_channel")?;

    let bins = bins_per_channel as usize;
    let mut counts = vec![0.0_f32; bins * bins];
    for y in 0..image.height() {
        for x in 0..image.width() {
            let [r, g, b] = image.get_pixel(x, y).0;
            let sum = f32::from(r) + f32::from(g) + f32::from(b);
            let (r_norm, g_norm) = if sum > 0.0 {
                (f32::from(r) / sum, f32::from(g) / sum)
            } else {
                (0.0, 0.0)
            };
            let r_bin = bin_index(r_norm, bins_per_channel);
            let g_bin = bin_index(g_norm, bins_per_channel);
            counts[(r_bin * bins) + g_bin] += 1.0;
        }
    }
    Ok(Descriptor::new(counts).normalized())
}

/// Concatenation of per-band RGB histograms over `region_count` horizontal
/// bands.
///
/// Bands are `height / region_count` rows tall; the final band absorbs any
/// remainder so every row is covered exactly once. Each band's histogram is
/// normalized independently before concatenation. `region_count == 1`
/// degenerates to [`rgb_histogram`]. Length is
/// `region_count * bins_per_channel^3`.
pub fn multi_region_rgb_histogram(
    image: &RgbImage,
    bins_per_channel: u32,
    region_count: u32,
) -> Result<Descriptor> {
    ensure_positive(bins_per_channel, "bins_per_channel")?;
    ensure_positive(region_count, "region_count")?;

    if region_count == 1 {
        return rgb_histogram(image, bins_per_channel);
    }

    let bins = bins_per_channel as usize;
    let block_len = bins * bins * bins;
    let rows_per_region = image.height() / region_count;

    let mut feature = Vec::with_capacity(block_len * region_count as usize);
    for region in 0..region_count {
        let row_start = region * rows_per_region;
        let row_end = if region == region_count - 1 {
            image.height()
        } else {
            (region + 1) * rows_per_region
        };
        let mut counts = vec![0.0_f32; block_len];
        accumulate_rgb_counts(image, bins_per_channel, row_start, row_end, &mut counts);
        feature.extend_from_slice(Descriptor::new(counts).normalized().as_slice());
    }
    Ok(Descriptor::new(feature))
}

/// Normalized histogram of Sobel gradient magnitudes.
///
/// The image is reduced to grayscale, 3x3 Sobel filters are applied in both
/// axes (edge samples replicated at the border), and per-pixel magnitudes
/// are normalized by the image-wide maximum before binning. A flat image
/// (maximum magnitude 0) yields an all-zero vector of length `bins`.
pub fn sobel_magnitude_histogram(image: &RgbImage, bins: u32) -> Result<Descriptor> {
    ensure_positive(bins, "bins")?;

    let gray = imageops::grayscale(image);
    let (width, height) = gray.dimensions();
    let sample = |x: i64, y: i64| -> f32 {
        let cx = x.clamp(0, i64::from(width).max(1) - 1) as u32;
        let cy = y.clamp(0, i64::from(height).max(1) - 1) as u32;
        f32::from(gray.get_pixel(cx, cy).0[0])
    };

    let mut magnitudes = Vec::with_capacity((width * height) as usize);
    let mut max_magnitude = 0.0_f32;
    for y in 0..height {
        for x in 0..width {
            let (xi, yi) = (i64::from(x), i64::from(y));
            let gx = (sample(xi + 1, yi - 1) - sample(xi - 1, yi - 1))
                + 2.0 * (sample(xi + 1, yi) - sample(xi - 1, yi))
                + (sample(xi + 1, yi + 1) - sample(xi - 1, yi + 1));
            let gy = (sample(xi - 1, yi + 1) - sample(xi - 1, yi - 1))
                + 2.0 * (sample(xi, yi + 1) - sample(xi, yi - 1))
                + (sample(xi + 1, yi + 1) - sample(xi + 1, yi - 1));
            let magnitude = (gx * gx + gy * gy).sqrt();
            max_magnitude = max_magnitude.max(magnitude);
            magnitudes.push(magnitude);
        }
    }

    if max_magnitude <= 0.0 {
        return Ok(Descriptor::zeros(bins as usize));
    }

    let mut counts = vec![0.0_f32; bins as usize];
    for magnitude in magnitudes {
        counts[bin_index(magnitude / max_magnitude, bins)] += 1.0;
    }
    Ok(Descriptor::new(counts).normalized())
}

/// Composite descriptor tuned for sunset-style queries: the multi-region
/// histogram with a sky-heavy band count, weighted asymmetrically by the
/// multi-block distance downstream.
pub fn sunset_histogram(
    image: &RgbImage,
    bins_per_channel: u32,
    region_count: u32,
) -> Result<Descriptor> {
    multi_region_rgb_histogram(image, bins_per_channel, region_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(rgb))
    }

    #[test]
    fn test_rgb_histogram_solid_red() {
        let image = solid(2, 2, [255, 0, 0]);
        let histogram = rgb_histogram(&image, 8).unwrap();
        assert_eq!(histogram.len(), 512);
        // All four pixels land in (r=7, g=0, b=0).
        assert!((histogram.as_slice()[7 * 64] - 1.0).abs() < 1e-6);
        assert!((histogram.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rgb_histogram_mixed_pixels_sum_to_one() {
        let mut image = solid(2, 2, [10, 200, 40]);
        image.put_pixel(0, 0, Rgb([255, 255, 255]));
        image.put_pixel(1, 1, Rgb([0, 0, 0]));
        let histogram = rgb_histogram(&image, 4).unwrap();
        assert_eq!(histogram.len(), 64);
        assert!((histogram.sum() - 1.0).abs() < 1e-6);
        // Black pixel maps to the first bin, white to the last.
        assert!(histogram.as_slice()[0] > 0.0);
        assert!(histogram.as_slice()[63] > 0.0);
    }

    #[test]
    fn test_rg_chromaticity_histogram_black_image() {
        let image = solid(2, 2, [0, 0, 0]);
        let histogram = rg_chromaticity_histogram(&image, 16).unwrap();
        assert_eq!(histogram.len(), 256);
        // Zero channel sum normalizes to (0, 0).
        assert!((histogram.as_slice()[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rg_chromaticity_histogram_pure_green() {
        let image = solid(3, 3, [0, 255, 0]);
        let histogram = rg_chromaticity_histogram(&image, 4).unwrap();
        // r_norm = 0, g_norm = 1.0 clamps into the last g bin.
        assert!((histogram.as_slice()[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_multi_region_single_region_matches_plain_histogram() {
        let mut image = solid(4, 4, [30, 60, 90]);
        image.put_pixel(2, 3, Rgb([200, 10, 10]));
        let plain = rgb_histogram(&image, 8).unwrap();
        let multi = multi_region_rgb_histogram(&image, 8, 1).unwrap();
        assert_eq!(plain, multi);
    }

    #[test]
    fn test_multi_region_length_and_band_normalization() {
        let image = solid(4, 5, [120, 120, 120]);
        let feature = multi_region_rgb_histogram(&image, 4, 3).unwrap();
        assert_eq!(feature.len(), 3 * 64);
        // Each band is normalized independently, so the whole sums to 3.
        assert!((feature.sum() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_multi_region_more_regions_than_rows() {
        // Bands beyond the row count are empty; their zero histograms pass
        // through normalization unchanged.
        let image = solid(2, 2, [255, 255, 255]);
        let feature = multi_region_rgb_histogram(&image, 2, 4).unwrap();
        assert_eq!(feature.len(), 4 * 8);
        assert!((feature.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_center_patch_exact_block() {
        let image = solid(10, 10, [1, 2, 3]);
        let patch = center_patch(&image, 4).unwrap();
        assert_eq!(patch.len(), 4 * 4 * 3);
        assert_eq!(&patch.as_slice()[..3], &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_center_patch_upscales_small_image() {
        let image = solid(2, 2, [50, 50, 50]);
        let patch = center_patch(&image, 7).unwrap();
        assert_eq!(patch.len(), 7 * 7 * 3);
        assert!(patch.as_slice().iter().all(|v| (*v - 50.0).abs() < 1e-3));
    }

    #[test]
    fn test_sobel_histogram_flat_image_is_all_zero() {
        let image = solid(6, 6, [77, 77, 77]);
        let histogram = sobel_magnitude_histogram(&image, 16).unwrap();
        assert_eq!(histogram.len(), 16);
        assert_eq!(histogram.sum(), 0.0);
    }

    #[test]
    fn test_sobel_histogram_edge_image() {
        let mut image = solid(8, 8, [0, 0, 0]);
        for y in 0..8 {
            for x in 4..8 {
                image.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let histogram = sobel_magnitude_histogram(&image, 16).unwrap();
        assert_eq!(histogram.len(), 16);
        assert!((histogram.sum() - 1.0).abs() < 1e-6);
        // Most pixels are flat, so the zero-magnitude bin dominates.
        assert!(histogram.as_slice()[0] > 0.5);
    }

    #[test]
    fn test_sunset_histogram_aliases_multi_region() {
        let image = solid(6, 6, [200, 120, 40]);
        let sunset = sunset_histogram(&image, 8, 3).unwrap();
        let multi = multi_region_rgb_histogram(&image, 8, 3).unwrap();
        assert_eq!(sunset, multi);
    }

    #[test]
    fn test_one_by_one_image_is_well_defined() {
        let image = solid(1, 1, [255, 0, 128]);
        assert_eq!(rgb_histogram(&image, 8).unwrap().len(), 512);
        assert_eq!(rg_chromaticity_histogram(&image, 16).unwrap().len(), 256);
        assert_eq!(sobel_magnitude_histogram(&image, 16).unwrap().len(), 16);
        assert_eq!(center_patch(&image, 7).unwrap().len(), 147);
    }

    #[test]
    fn test_zero_parameters_are_rejected() {
        let image = solid(2, 2, [0, 0, 0]);
        assert!(rgb_histogram(&image, 0).is_err());
        assert!(rg_chromaticity_histogram(&image, 0).is_err());
        assert!(multi_region_rgb_histogram(&image, 8, 0).is_err());
        assert!(multi_region_rgb_histogram(&image, 0, 2).is_err());
        assert!(sobel_magnitude_histogram(&image, 0).is_err());
        assert!(center_patch(&image, 0).is_err());
    }
}
