//! Geometric mask generation for the sharp center region.
//!
//! Masks are single-channel rasters used as per-pixel blend weights:
//! 255 = keep the original (sharp) pixel, 0 = fully background-edited.
//! Generation is purely geometric and deterministic; there is no content
//! awareness.

use image::{imageops, GrayImage, Luma};

use crate::settings::Settings;

/// Build a crisp rounded-rectangle coverage mask of the given size.
///
/// Pixels inside the rounded rectangle are 255, corner cutouts are 0.
/// A `radius` of 0 yields a plain filled rectangle.
#[must_use]
pub fn rounded_rect_mask(width: u32, height: u32, radius: u32) -> GrayImage {
    let mut mask = GrayImage::from_pixel(width, height, Luma([255]));
    if radius == 0 {
        return mask;
    }
    let r = radius.min(width / 2).min(height / 2);
    #[allow(clippy::cast_precision_loss)]
    let rf = r as f32;

    // Circle centers for the four corner arcs.
    let centers = [
        (rf, rf),
        (width as f32 - rf, rf),
        (rf, height as f32 - rf),
        (width as f32 - rf, height as f32 - rf),
    ];

    for (x, y, px) in mask.enumerate_pixels_mut() {
        #[allow(clippy::cast_precision_loss)]
        let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
        let in_left = fx < rf;
        let in_right = fx > width as f32 - rf;
        let in_top = fy < rf;
        let in_bottom = fy > height as f32 - rf;
        if !(in_left || in_right) || !(in_top || in_bottom) {
            continue;
        }
        // Pixel lies in a corner square: keep only if inside the arc.
        let inside = centers.iter().any(|&(cx, cy)| {
            let (dx, dy) = (fx - cx, fy - cy);
            dx * dx + dy * dy <= rf * rf
        });
        if !inside {
            *px = Luma([0]);
        }
    }
    mask
}

/// Generate the feathered center mask for an image of the given dimensions.
///
/// The sharp region is a centered rounded rectangle sized by
/// `center_scale` per axis, with corner radius capped at a quarter of the
/// region size; the edge is feathered by a gaussian blur of `feather` so
/// the 255 to 0 transition leaves no hard seam in the composite.
///
/// Deterministic: identical dimensions and settings always produce an
/// identical mask.
#[must_use]
pub fn center_mask(width: u32, height: u32, settings: &Settings) -> GrayImage {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rw = ((width as f32 * settings.center_scale) as u32).max(1);
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rh = ((height as f32 * settings.center_scale) as u32).max(1);
    let left = (width - rw.min(width)) / 2;
    let top = (height - rh.min(height)) / 2;
    let radius = settings.center_roundness.min(rw / 4).min(rh / 4);

    let rect = rounded_rect_mask(rw, rh, radius);
    let mut canvas = GrayImage::new(width, height);
    imageops::replace(&mut canvas, &rect, i64::from(left), i64::from(top));

    if settings.feather == 0 {
        return canvas;
    }
    #[allow(clippy::cast_precision_loss)]
    let sigma = settings.feather as f32;
    imageops::blur(&canvas, sigma)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_rect_fills_without_radius() {
        let m = rounded_rect_mask(10, 6, 0);
        assert!(m.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn rounded_rect_cuts_corners() {
        let m = rounded_rect_mask(40, 40, 10);
        assert_eq!(m.get_pixel(0, 0)[0], 0);
        assert_eq!(m.get_pixel(39, 0)[0], 0);
        assert_eq!(m.get_pixel(0, 39)[0], 0);
        assert_eq!(m.get_pixel(39, 39)[0], 0);
        // Edges between corners and the interior stay filled.
        assert_eq!(m.get_pixel(20, 0)[0], 255);
        assert_eq!(m.get_pixel(0, 20)[0], 255);
        assert_eq!(m.get_pixel(20, 20)[0], 255);
    }

    #[test]
    fn center_mask_matches_image_dimensions() {
        let m = center_mask(320, 200, &Settings::default());
        assert_eq!(m.dimensions(), (320, 200));
    }

    #[test]
    fn center_mask_is_bright_at_center_and_dark_at_corners() {
        let s = Settings {
            center_scale: 0.5,
            ..Settings::default()
        };
        let m = center_mask(400, 300, &s);
        assert!(m.get_pixel(200, 150)[0] > 250);
        assert!(m.get_pixel(0, 0)[0] < 5);
        assert!(m.get_pixel(399, 299)[0] < 5);
    }

    #[test]
    fn center_mask_is_deterministic() {
        let s = Settings::default();
        let a = center_mask(257, 131, &s);
        let b = center_mask(257, 131, &s);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn unfeathered_mask_is_binary() {
        let s = Settings {
            feather: 0,
            ..Settings::default()
        };
        let m = center_mask(100, 80, &s);
        assert!(m.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn center_mask_survives_tiny_images() {
        let m = center_mask(3, 2, &Settings::default());
        assert_eq!(m.dimensions(), (3, 2));
    }
}
