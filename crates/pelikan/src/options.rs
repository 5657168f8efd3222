//! Command-line flags shared by the rendering subcommands.

use clap::{Args, ValueEnum};
use pelikan_core::{IcnsBackend, Preset, RenderParams, Rgb, Shape};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    Rounded,
    Circle,
}

impl From<ShapeArg> for Shape {
    fn from(value: ShapeArg) -> Self {
        match value {
            ShapeArg::Rounded => Shape::Rounded,
            ShapeArg::Circle => Shape::Circle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    Macos,
    FullBleed,
    Circle,
    Favicon,
}

impl From<PresetArg> for Preset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::Macos => Preset::MacOs,
            PresetArg::FullBleed => Preset::FullBleed,
            PresetArg::Circle => Preset::Circle,
            PresetArg::Favicon => Preset::Favicon,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// iconutil on macOS, built-in packer elsewhere
    #[default]
    Auto,
    /// macOS iconutil (needs the Xcode Command Line Tools)
    Iconutil,
    /// Built-in packer, works on every platform
    Native,
}

impl From<BackendArg> for IcnsBackend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Auto => IcnsBackend::Auto,
            BackendArg::Iconutil => IcnsBackend::Iconutil,
            BackendArg::Native => IcnsBackend::Native,
        }
    }
}

/// Render parameters. A preset is applied first, explicit flags win over it.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Start from a named preset
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Canvas size in pixels (128-1024) [default: 512]
    #[arg(long, value_name = "PX")]
    pub canvas: Option<u32>,

    /// Inner image size as a percentage of the canvas (50-100) [default: 86]
    #[arg(long, value_name = "PERCENT")]
    pub scale: Option<u32>,

    /// Corner radius in pixels (0-256) [default: 100]
    #[arg(long, value_name = "PX")]
    pub radius: Option<u32>,

    /// Mask shape [default: rounded]
    #[arg(long, value_enum)]
    pub shape: Option<ShapeArg>,

    /// Solid background colour, e.g. "#111111". Transparent when omitted
    #[arg(long, value_name = "HEX")]
    pub background: Option<Rgb>,
}

impl ParamArgs {
    pub fn to_params(&self) -> RenderParams {
        let mut params = RenderParams::default();
        if let Some(preset) = self.preset {
            Preset::from(preset).apply(&mut params);
        }
        if let Some(canvas) = self.canvas {
            params.canvas_px = canvas;
        }
        if let Some(scale) = self.scale {
            params.scale_percent = scale;
        }
        if let Some(radius) = self.radius {
            params.radius_px = radius;
        }
        if let Some(shape) = self.shape {
            params.shape = shape.into();
        }
        if let Some(background) = self.background {
            params.solid_background = true;
            params.background = background;
        }
        params
    }
}
