//! Background blur blending and global quality boost.
//!
//! The blend step softens everything outside the mask while leaving the
//! center untouched: `out = m * original + (1 - m) * blurred` with the mask
//! value `m` normalized to `[0, 1]`. The quality boost (contrast plus an
//! unsharp mask) then runs over the whole frame, not gated by the mask.

use image::{imageops, GrayImage, RgbImage};

use crate::settings::Settings;

/// Blend an image with a gaussian-blurred copy of itself, weighted per
/// pixel by `mask` (255 = keep original, 0 = fully blurred).
///
/// A `sigma` of 0 returns the image unchanged.
///
/// # Panics
///
/// Panics if the mask dimensions differ from the image dimensions.
#[must_use]
pub fn blend_blur(image: &RgbImage, mask: &GrayImage, sigma: f32) -> RgbImage {
    assert_eq!(
        image.dimensions(),
        mask.dimensions(),
        "mask must match image dimensions"
    );
    if sigma <= 0.0 {
        return image.clone();
    }

    let blurred = imageops::blur(image, sigma);
    let mut out = image.clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        let m = f32::from(mask.get_pixel(x, y)[0]) / 255.0;
        if m >= 1.0 {
            continue;
        }
        let soft = blurred.get_pixel(x, y);
        for ch in 0..3 {
            let orig = f32::from(px[ch]);
            let blend = m * orig + (1.0 - m) * f32::from(soft[ch]);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                px[ch] = blend.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}

/// Apply the global quality boost: contrast scaling about the midpoint
/// followed by an unsharp mask.
///
/// The unsharp mask amplifies the difference between the image and a
/// gaussian-blurred copy: `out = orig + percent/100 * (orig - blurred)`,
/// applied per channel only where the difference exceeds the threshold.
#[must_use]
pub fn quality_boost(image: &RgbImage, settings: &Settings) -> RgbImage {
    let contrasted = adjust_contrast(image, settings.contrast);
    if settings.unsharp_radius <= 0.0 || settings.unsharp_percent == 0 {
        return contrasted;
    }

    let soft = imageops::blur(&contrasted, settings.unsharp_radius);
    #[allow(clippy::cast_precision_loss)]
    let amount = settings.unsharp_percent as f32 / 100.0;
    let threshold = f32::from(settings.unsharp_threshold);

    let mut out = contrasted;
    for (x, y, px) in out.enumerate_pixels_mut() {
        let blurred = soft.get_pixel(x, y);
        for ch in 0..3 {
            let orig = f32::from(px[ch]);
            let diff = orig - f32::from(blurred[ch]);
            if diff.abs() <= threshold {
                continue;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                px[ch] = (orig + amount * diff).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}

/// Scale pixel values away from the 128 midpoint by `factor`.
fn adjust_contrast(image: &RgbImage, factor: f32) -> RgbImage {
    if (factor - 1.0).abs() < f32::EPSILON {
        return image.clone();
    }
    let mut out = image.clone();
    for px in out.pixels_mut() {
        for ch in 0..3 {
            let v = f32::from(px[ch]);
            let scaled = (v - 128.0) * factor + 128.0;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                px[ch] = scaled.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[allow(clippy::cast_possible_truncation)]
    fn gradient_image(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn full_weight_preserves_original_pixels() {
        let img = gradient_image(64, 64);
        let mask = GrayImage::from_pixel(64, 64, Luma([255]));
        let out = blend_blur(&img, &mask, 8.0);
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn zero_weight_matches_fully_blurred_copy() {
        let img = gradient_image(64, 64);
        let mask = GrayImage::from_pixel(64, 64, Luma([0]));
        let out = blend_blur(&img, &mask, 8.0);
        let blurred = imageops::blur(&img, 8.0);
        for (a, b) in out.pixels().zip(blurred.pixels()) {
            for ch in 0..3 {
                let diff = (i32::from(a[ch]) - i32::from(b[ch])).abs();
                assert!(diff <= 1, "channel diff {diff} exceeds rounding tolerance");
            }
        }
    }

    #[test]
    fn zero_sigma_is_identity() {
        let img = gradient_image(32, 32);
        let mask = GrayImage::from_pixel(32, 32, Luma([0]));
        let out = blend_blur(&img, &mask, 0.0);
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn contrast_pushes_values_away_from_midpoint() {
        let img = RgbImage::from_pixel(4, 4, Rgb([200, 60, 128]));
        let out = adjust_contrast(&img, 1.5);
        let px = out.get_pixel(0, 0);
        assert!(px[0] > 200);
        assert!(px[1] < 60);
        assert_eq!(px[2], 128);
    }

    #[test]
    fn unit_contrast_is_identity() {
        let img = gradient_image(16, 16);
        let out = adjust_contrast(&img, 1.0);
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn unsharp_leaves_flat_regions_untouched() {
        let img = RgbImage::from_pixel(32, 32, Rgb([90, 90, 90]));
        let s = Settings {
            contrast: 1.0,
            ..Settings::default()
        };
        let out = quality_boost(&img, &s);
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn unsharp_amplifies_edges() {
        // Left half dark, right half bright: sharpening widens the gap at
        // the boundary.
        let img = RgbImage::from_fn(40, 40, |x, _| {
            if x < 20 {
                Rgb([60, 60, 60])
            } else {
                Rgb([190, 190, 190])
            }
        });
        let s = Settings {
            contrast: 1.0,
            ..Settings::default()
        };
        let out = quality_boost(&img, &s);
        assert!(out.get_pixel(19, 20)[0] < 60);
        assert!(out.get_pixel(20, 20)[0] > 190);
    }
}
