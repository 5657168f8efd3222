//! # pelikan-core
//!
//! The image side of Icon Pelikan: turns one square picture into a
//! macOS-style icon and exports it as PNG, `.iconset` or `.icns`.
//!
//! ```no_run
//! use pelikan_core::{create_icon, export_iconset, load_source, to_icns, IcnsBackend, RenderParams};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = load_source(Path::new("logo.png"))?;
//! let icon = create_icon(&source, &RenderParams::default())?;
//! let iconset = export_iconset(&icon, Path::new("out/AppIcon.iconset"))?;
//! let icns = to_icns(&iconset, IcnsBackend::Auto)?;
//! # let _ = icns;
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod compose;
mod error;
pub mod iconset;
pub mod mask;
pub mod pack;
pub mod params;
pub mod presets;
pub mod settings;

pub use compose::{create_icon, load_source, save_png};
pub use error::{ExportError, RenderError};
pub use iconset::{export_iconset, iconset_dir_for, ICONSET_ENTRIES};
pub use pack::{to_icns, write_icns, IcnsBackend};
pub use params::{RenderParams, Rgb, Shape};
pub use presets::Preset;
pub use settings::Settings;
