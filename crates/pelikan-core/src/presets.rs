//! Named starting points for the render parameters.

use crate::params::{RenderParams, Shape};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Whatever the controls currently say
    #[default]
    Custom,
    /// Big Sur style app icon: an 80% tile on a 1024px canvas
    MacOs,
    /// Rounded square filling the whole canvas
    FullBleed,
    Circle,
    /// Small, nearly square tile for web favicons
    Favicon,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Custom,
        Preset::MacOs,
        Preset::FullBleed,
        Preset::Circle,
        Preset::Favicon,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Custom => "Custom",
            Preset::MacOs => "macOS app icon",
            Preset::FullBleed => "Full bleed",
            Preset::Circle => "Circle",
            Preset::Favicon => "Favicon",
        }
    }

    /// Overwrite the geometry and shape of `params`. The background colour
    /// belongs to the user and is left alone; only `MacOs` turns the solid
    /// fill off, since that icon style sits on a transparent canvas.
    pub fn apply(self, params: &mut RenderParams) {
        let (canvas_px, scale_percent, radius_px, shape) = match self {
            Preset::Custom => return,
            Preset::MacOs => (1024, 80, 185, Shape::Rounded),
            Preset::FullBleed => (1024, 100, 229, Shape::Rounded),
            Preset::Circle => (1024, 90, params.radius_px, Shape::Circle),
            Preset::Favicon => (256, 100, 48, Shape::Rounded),
        };
        params.canvas_px = canvas_px;
        params.scale_percent = scale_percent;
        params.radius_px = radius_px;
        params.shape = shape;
        if self == Preset::MacOs {
            params.solid_background = false;
        }
    }

    /// The preset whose geometry matches `params`, or `Custom`.
    pub fn detect(params: &RenderParams) -> Preset {
        Preset::ALL
            .into_iter()
            .skip(1)
            .find(|preset| {
                let mut candidate = *params;
                preset.apply(&mut candidate);
                candidate == *params
            })
            .unwrap_or(Preset::Custom)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Rgb;

    #[test]
    fn every_preset_produces_valid_params() {
        for preset in Preset::ALL {
            let mut params = RenderParams::default();
            preset.apply(&mut params);
            assert!(params.validate().is_ok(), "{} is out of range", preset);
        }
    }

    #[test]
    fn custom_changes_nothing() {
        let mut params = RenderParams::default();
        Preset::Custom.apply(&mut params);
        assert_eq!(params, RenderParams::default());
    }

    #[test]
    fn macos_clears_fill_but_keeps_colour() {
        let mut params = RenderParams {
            solid_background: true,
            background: Rgb::new(200, 10, 10),
            ..Default::default()
        };
        Preset::MacOs.apply(&mut params);
        assert_eq!(params.canvas_px, 1024);
        assert_eq!(params.inner_px(), 819);
        assert_eq!(params.background_rgba(), None);
        assert_eq!(params.background, Rgb::new(200, 10, 10));
    }

    #[test]
    fn other_presets_keep_background_toggle() {
        let mut params = RenderParams {
            solid_background: true,
            background: Rgb::new(200, 10, 10),
            ..Default::default()
        };
        Preset::FullBleed.apply(&mut params);
        assert_eq!(params.background_rgba(), Some([200, 10, 10, 255]));
    }

    #[test]
    fn detect_compares_fill_for_macos() {
        let mut params = RenderParams::default();
        Preset::MacOs.apply(&mut params);
        params.solid_background = true;
        assert_eq!(Preset::detect(&params), Preset::Custom);
    }

    #[test]
    fn detect_recognises_applied_presets() {
        for preset in Preset::ALL.into_iter().skip(1) {
            let mut params = RenderParams::default();
            preset.apply(&mut params);
            assert_eq!(Preset::detect(&params), preset);
        }
        assert_eq!(Preset::detect(&RenderParams::default()), Preset::Custom);
    }
}
