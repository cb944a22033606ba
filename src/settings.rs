//! Processing configuration with documented defaults.

use std::str::FromStr;

use crate::error::{Error, Result};

/// Rendering style for the plate behind the logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlateStyle {
    /// Blur the underlying image region and darken it by the tint alpha.
    #[default]
    Frosted,
    /// Solid dark fill at the plate alpha.
    Dark,
    /// Solid light fill at the plate alpha.
    Light,
}

impl FromStr for PlateStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "frosted" => Ok(Self::Frosted),
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!(
                "unknown plate style '{other}' (expected frosted, dark, or light)"
            )),
        }
    }
}

/// Tunable parameters applied uniformly to every image in a run.
///
/// [`Settings::default()`] carries the documented defaults; override
/// individual fields per run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Gaussian sigma for the background blur.
    pub blur_radius: f32,
    /// Sharp-center size as a fraction of each image dimension.
    pub center_scale: f32,
    /// Corner radius of the center mask, in pixels.
    pub center_roundness: u32,
    /// Feather radius for the mask edge, in pixels.
    pub feather: u32,
    /// Global contrast factor (1.0 = unchanged).
    pub contrast: f32,
    /// Gaussian sigma for the unsharp mask.
    pub unsharp_radius: f32,
    /// Unsharp mask strength, as a percentage of the edge difference.
    pub unsharp_percent: u32,
    /// Minimum edge difference for the unsharp mask to act on a channel.
    pub unsharp_threshold: u8,
    /// Logo target width as a fraction of the image width.
    pub logo_scale: f32,
    /// Logo opacity multiplier in `[0, 1]`.
    pub logo_opacity: f32,
    /// Margin between the plate and the image edge, in pixels.
    pub logo_padding: u32,
    /// Plate rendering style.
    pub plate_style: PlateStyle,
    /// Padding between the plate edge and the logo, in pixels.
    pub plate_padding: u32,
    /// Fill opacity for the `dark` and `light` plate styles.
    pub plate_alpha: u8,
    /// Gaussian sigma for the `frosted` plate blur.
    pub plate_blur_radius: f32,
    /// Darkening tint for the `frosted` plate (0-255, higher = darker).
    pub plate_tint_alpha: u8,
    /// Corner radius of the plate, in pixels.
    pub plate_corner_radius: u32,
    /// Opacity of the white plate border.
    pub plate_border_alpha: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blur_radius: 18.0,
            center_scale: 0.72,
            center_roundness: 28,
            feather: 18,
            contrast: 1.06,
            unsharp_radius: 1.4,
            unsharp_percent: 140,
            unsharp_threshold: 2,
            logo_scale: 0.13,
            logo_opacity: 0.88,
            logo_padding: 24,
            plate_style: PlateStyle::Frosted,
            plate_padding: 14,
            plate_alpha: 215,
            plate_blur_radius: 10.0,
            plate_tint_alpha: 110,
            plate_corner_radius: 18,
            plate_border_alpha: 210,
        }
    }
}

impl Settings {
    /// Validate that all values are within acceptable ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if !self.blur_radius.is_finite() || self.blur_radius < 0.0 {
            return Err(Error::Config("blur_radius must be >= 0".into()));
        }
        if !(self.center_scale > 0.0 && self.center_scale <= 1.0) {
            return Err(Error::Config("center_scale must be in (0, 1]".into()));
        }
        if !self.contrast.is_finite() || self.contrast <= 0.0 {
            return Err(Error::Config("contrast must be > 0".into()));
        }
        if !self.unsharp_radius.is_finite() || self.unsharp_radius < 0.0 {
            return Err(Error::Config("unsharp_radius must be >= 0".into()));
        }
        if !(self.logo_scale > 0.0 && self.logo_scale <= 1.0) {
            return Err(Error::Config("logo_scale must be in (0, 1]".into()));
        }
        if !(0.0..=1.0).contains(&self.logo_opacity) {
            return Err(Error::Config("logo_opacity must be in [0, 1]".into()));
        }
        if !self.plate_blur_radius.is_finite() || self.plate_blur_radius < 0.0 {
            return Err(Error::Config("plate_blur_radius must be >= 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_pass_validation() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_center_scale() {
        let s = Settings {
            center_scale: 0.0,
            ..Settings::default()
        };
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("center_scale"));

        let s = Settings {
            center_scale: 1.5,
            ..Settings::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_blur() {
        let s = Settings {
            blur_radius: -1.0,
            ..Settings::default()
        };
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("blur_radius"));
    }

    #[test]
    fn validate_rejects_out_of_range_opacity() {
        let s = Settings {
            logo_opacity: 1.2,
            ..Settings::default()
        };
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("logo_opacity"));
    }

    #[test]
    fn plate_style_parses_case_insensitively() {
        assert_eq!("frosted".parse::<PlateStyle>().unwrap(), PlateStyle::Frosted);
        assert_eq!("Dark".parse::<PlateStyle>().unwrap(), PlateStyle::Dark);
        assert_eq!("LIGHT".parse::<PlateStyle>().unwrap(), PlateStyle::Light);
        assert!("neon".parse::<PlateStyle>().is_err());
    }
}
