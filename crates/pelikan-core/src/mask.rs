//! Alpha masks for the rounded-square and circle outlines.
//!
//! Coverage comes from the signed distance of each pixel centre to the
//! outline, so edges get one pixel of anti-aliasing instead of a hard step.

use crate::error::RenderError;
use crate::params::Shape;
use image::{GrayImage, Luma, RgbaImage};

/// Build a `side x side` coverage mask for `shape`.
///
/// `radius` only matters for [`Shape::Rounded`] and is clamped to half the
/// side, at which point the rounded square becomes a circle.
pub fn shape_mask(side: u32, shape: Shape, radius: u32) -> GrayImage {
    let half = side as f32 / 2.0;
    let radius = match shape {
        Shape::Rounded => (radius as f32).min(half),
        Shape::Circle => half,
    };

    GrayImage::from_fn(side, side, |x, y| {
        let distance = rounded_square_distance(x as f32 + 0.5, y as f32 + 0.5, half, radius);
        let coverage = (0.5 - distance).clamp(0.0, 1.0);
        Luma([(coverage * 255.0).round() as u8])
    })
}

/// Signed distance from (px, py) to a square of half-size `half` centred at
/// (half, half) whose corners are rounded by `radius`. Negative inside.
fn rounded_square_distance(px: f32, py: f32, half: f32, radius: f32) -> f32 {
    let qx = (px - half).abs() - (half - radius);
    let qy = (py - half).abs() - (half - radius);
    let outside = qx.max(0.0).hypot(qy.max(0.0));
    let inside = qx.max(qy).min(0.0);
    outside + inside - radius
}

/// Scale each pixel's alpha by the mask coverage at the same position.
/// The image is left untouched when the sizes differ.
pub fn apply_mask(image: &mut RgbaImage, mask: &GrayImage) -> Result<(), RenderError> {
    if image.dimensions() != mask.dimensions() {
        return Err(RenderError::MaskMismatch {
            image: image.dimensions(),
            mask: mask.dimensions(),
        });
    }
    for (pixel, coverage) in image.pixels_mut().zip(mask.pixels()) {
        let alpha = u16::from(pixel[3]) * u16::from(coverage[0]);
        pixel[3] = ((alpha + 127) / 255) as u8;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn zero_radius_covers_everything() {
        let mask = shape_mask(32, Shape::Rounded, 0);
        assert!(mask.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn rounded_clears_corners_only() {
        let mask = shape_mask(100, Shape::Rounded, 20);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
        assert_eq!(mask.get_pixel(99, 0)[0], 0);
        assert_eq!(mask.get_pixel(0, 99)[0], 0);
        assert_eq!(mask.get_pixel(99, 99)[0], 0);
        // straight edges stay solid
        assert_eq!(mask.get_pixel(50, 0)[0], 255);
        assert_eq!(mask.get_pixel(0, 50)[0], 255);
        assert_eq!(mask.get_pixel(50, 50)[0], 255);
    }

    #[test]
    fn circle_ignores_radius() {
        assert_eq!(
            shape_mask(64, Shape::Circle, 0),
            shape_mask(64, Shape::Circle, 200)
        );
    }

    #[test]
    fn oversized_radius_becomes_circle() {
        assert_eq!(
            shape_mask(64, Shape::Rounded, 256),
            shape_mask(64, Shape::Circle, 0)
        );
    }

    #[test]
    fn circle_edge_is_antialiased() {
        let mask = shape_mask(64, Shape::Circle, 0);
        assert_eq!(mask.get_pixel(32, 32)[0], 255);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
        let partial = mask.pixels().filter(|p| p[0] > 0 && p[0] < 255).count();
        assert!(partial > 0);
    }

    #[test]
    fn mask_is_symmetric() {
        let mask = shape_mask(41, Shape::Rounded, 12);
        for y in 0..41 {
            for x in 0..41 {
                assert_eq!(mask.get_pixel(x, y), mask.get_pixel(40 - x, y));
                assert_eq!(mask.get_pixel(x, y), mask.get_pixel(x, 40 - y));
            }
        }
    }

    #[test]
    fn apply_mask_scales_alpha() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 255]));
        let mut mask = GrayImage::new(2, 1);
        mask.put_pixel(0, 0, Luma([0]));
        mask.put_pixel(1, 0, Luma([128]));

        apply_mask(&mut image, &mask).unwrap();

        assert_eq!(image.get_pixel(0, 0)[3], 0);
        assert_eq!(image.get_pixel(1, 0)[3], 128);
        // colour is untouched
        assert_eq!(image.get_pixel(1, 0)[0], 10);
    }

    #[test]
    fn mismatched_mask_is_rejected() {
        let mut image = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        let mask = shape_mask(8, Shape::Circle, 0);

        let err = apply_mask(&mut image, &mask).unwrap_err();

        assert!(matches!(
            err,
            RenderError::MaskMismatch { image: (4, 4), mask: (8, 8) }
        ));
        assert!(image.pixels().all(|p| p[3] == 255));
    }
}
