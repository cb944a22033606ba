//! Logo plate rendering and compositing.
//!
//! The plate is a rounded rectangle anchored bottom-right that backs the
//! logo to keep it legible against varying backgrounds. Styles: `frosted`
//! (blur and darken the underlying pixels), `dark` and `light` (solid
//! fills). The logo keeps its own alpha channel and is composited on top,
//! inset by the plate padding.

use image::{imageops, Rgba, RgbaImage};

use crate::mask::rounded_rect_mask;
use crate::settings::{PlateStyle, Settings};

/// Scale the logo to fit the target width derived from the image width.
///
/// The target is `image_width * logo_scale`, floored at 48 px; the logo is
/// never upscaled. The alpha channel is multiplied by `logo_opacity`.
#[must_use]
pub fn scale_logo(logo: &RgbaImage, image_width: u32, settings: &Settings) -> RgbaImage {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let target = ((image_width as f32 * settings.logo_scale) as u32).max(48);
    let (lw, lh) = logo.dimensions();

    let mut scaled = if lw > target || lh > target {
        #[allow(clippy::cast_precision_loss)]
        let ratio = (target as f32 / lw as f32).min(target as f32 / lh as f32);
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nw = ((lw as f32 * ratio).round() as u32).max(1);
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nh = ((lh as f32 * ratio).round() as u32).max(1);
        imageops::resize(logo, nw, nh, imageops::FilterType::Lanczos3)
    } else {
        logo.clone()
    };

    if settings.logo_opacity < 1.0 {
        for px in scaled.pixels_mut() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                px[3] = (f32::from(px[3]) * settings.logo_opacity).round() as u8;
            }
        }
    }
    scaled
}

/// Render the plate for the region at `(x, y)` with the given size.
///
/// All styles are clipped to rounded corners and finished with a 2 px
/// white border at `plate_border_alpha`.
#[must_use]
pub fn render_plate(
    base: &RgbaImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    settings: &Settings,
) -> RgbaImage {
    let mut plate = match settings.plate_style {
        PlateStyle::Dark => {
            RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, settings.plate_alpha]))
        }
        PlateStyle::Light => {
            RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, settings.plate_alpha]))
        }
        PlateStyle::Frosted => {
            let region = imageops::crop_imm(base, x, y, width, height).to_image();
            let mut frosted = if settings.plate_blur_radius > 0.0 {
                imageops::blur(&region, settings.plate_blur_radius)
            } else {
                region
            };
            // Darken by compositing a black tint of plate_tint_alpha.
            let tint = f32::from(settings.plate_tint_alpha) / 255.0;
            for px in frosted.pixels_mut() {
                for ch in 0..3 {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    {
                        px[ch] = (f32::from(px[ch]) * (1.0 - tint)).round() as u8;
                    }
                }
                px[3] = 255;
            }
            frosted
        }
    };

    let radius = settings
        .plate_corner_radius
        .min(width / 2)
        .min(height / 2);
    let coverage = rounded_rect_mask(width, height, radius);
    for (px, cov) in plate.pixels_mut().zip(coverage.pixels()) {
        px[3] = px[3].min(cov[0]);
    }

    draw_border(&mut plate, radius, settings.plate_border_alpha);
    plate
}

/// Draw a 2 px rounded border along the plate edge.
fn draw_border(plate: &mut RgbaImage, radius: u32, alpha: u8) {
    const BORDER: u32 = 2;
    let (w, h) = plate.dimensions();
    if w <= 2 * BORDER || h <= 2 * BORDER {
        return;
    }
    let outer = rounded_rect_mask(w, h, radius);
    let inner = rounded_rect_mask(
        w - 2 * BORDER,
        h - 2 * BORDER,
        radius.saturating_sub(BORDER),
    );
    for (x, y, px) in plate.enumerate_pixels_mut() {
        if outer.get_pixel(x, y)[0] == 0 {
            continue;
        }
        let in_inner = x >= BORDER
            && y >= BORDER
            && x < w - BORDER
            && y < h - BORDER
            && inner.get_pixel(x - BORDER, y - BORDER)[0] == 255;
        if !in_inner {
            *px = Rgba([255, 255, 255, alpha]);
        }
    }
}

/// Composite the plate and logo onto the bottom-right corner of `base`.
///
/// The plate rectangle is the logo size plus `plate_padding` on each side,
/// inset from the image edge by `logo_padding`. When the plate does not
/// fit inside the image the overlay is skipped; returns whether anything
/// was drawn.
pub fn overlay_logo(base: &mut RgbaImage, logo: &RgbaImage, settings: &Settings) -> bool {
    let (bw, bh) = base.dimensions();
    let (lw, lh) = logo.dimensions();
    let plate_w = lw + 2 * settings.plate_padding;
    let plate_h = lh + 2 * settings.plate_padding;
    if plate_w > bw || plate_h > bh {
        return false;
    }

    let x = bw.saturating_sub(plate_w + settings.logo_padding).min(bw - plate_w);
    let y = bh.saturating_sub(plate_h + settings.logo_padding).min(bh - plate_h);

    let plate = render_plate(base, x, y, plate_w, plate_h, settings);
    imageops::overlay(base, &plate, i64::from(x), i64::from(y));
    imageops::overlay(
        base,
        logo,
        i64::from(x + settings.plate_padding),
        i64::from(y + settings.plate_padding),
    );
    true
}
