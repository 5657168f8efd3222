//! Converting an iconset into a single `.icns` file.
//!
//! On macOS the system `iconutil` does the packing. Everywhere else (or on
//! request) the icon family is assembled in-process with the `icns` crate.

use crate::error::ExportError;
use crate::iconset::{resize_square, IconsetEntry, ICONSET_ENTRIES};
use icns::{IconFamily, IconType, PixelFormat};
use image::RgbaImage;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use tracing::{debug, info};

/// How the `.icns` file gets packed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IcnsBackend {
    /// `iconutil` on macOS, the built-in packer elsewhere
    #[default]
    Auto,
    /// Always shell out to `iconutil`
    Iconutil,
    /// Always use the built-in packer
    Native,
}

impl IcnsBackend {
    /// Resolve `Auto` for the platform we are running on.
    pub fn resolve(self) -> IcnsBackend {
        match self {
            IcnsBackend::Auto if cfg!(target_os = "macos") => IcnsBackend::Iconutil,
            IcnsBackend::Auto => IcnsBackend::Native,
            other => other,
        }
    }
}

impl fmt::Display for IcnsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IcnsBackend::Auto => write!(f, "auto"),
            IcnsBackend::Iconutil => write!(f, "iconutil"),
            IcnsBackend::Native => write!(f, "native"),
        }
    }
}

impl FromStr for IcnsBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(IcnsBackend::Auto),
            "iconutil" => Ok(IcnsBackend::Iconutil),
            "native" => Ok(IcnsBackend::Native),
            other => Err(format!("unknown icns backend '{}'", other)),
        }
    }
}

/// `foo.iconset` -> `foo.icns`, next to the iconset.
pub fn icns_path_for(iconset: &Path) -> PathBuf {
    iconset.with_extension("icns")
}

/// Pack `iconset` into a sibling `.icns` file and return its path.
pub fn to_icns(iconset: &Path, backend: IcnsBackend) -> Result<PathBuf, ExportError> {
    if !iconset.is_dir() {
        return Err(ExportError::IconsetNotFound(iconset.to_path_buf()));
    }
    let icns_path = icns_path_for(iconset);
    let backend = backend.resolve();
    debug!(iconset = %iconset.display(), %backend, "converting iconset");

    match backend {
        IcnsBackend::Iconutil => run_iconutil(iconset, &icns_path)?,
        _ => pack_iconset(iconset, &icns_path)?,
    }

    if !icns_path.is_file() {
        return Err(ExportError::IcnsNotCreated(icns_path));
    }
    info!(path = %icns_path.display(), "icns generated");
    Ok(icns_path)
}

fn run_iconutil(iconset: &Path, icns_path: &Path) -> Result<(), ExportError> {
    let output = Command::new("iconutil")
        .arg("-c")
        .arg("icns")
        .arg(iconset)
        .arg("-o")
        .arg(icns_path)
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ExportError::IconutilNotFound,
            _ => ExportError::Io {
                path: PathBuf::from("iconutil"),
                source: e,
            },
        })?;

    if !output.status.success() {
        return Err(ExportError::IconutilFailed {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

/// Build the icon family from the PNGs of an existing iconset.
fn pack_iconset(iconset: &Path, icns_path: &Path) -> Result<(), ExportError> {
    let mut family = IconFamily::new();
    for entry in ICONSET_ENTRIES {
        let png_path = iconset.join(entry.file_name());
        if !png_path.is_file() {
            return Err(ExportError::MissingEntry(png_path));
        }
        let image = image::open(&png_path)
            .map_err(|source| ExportError::Image {
                path: png_path.clone(),
                source,
            })?
            .to_rgba8();
        // a hand-edited iconset may hold off-size files
        let image = resize_square(&image, entry.pixels());
        add_entry(&mut family, &entry, &image, icns_path)?;
    }
    write_family(&family, icns_path)
}

/// Render an `.icns` straight from one image, without an iconset on disk.
pub fn write_icns(image: &RgbaImage, icns_path: &Path) -> Result<(), ExportError> {
    let mut family = IconFamily::new();
    for entry in ICONSET_ENTRIES {
        let resized = resize_square(image, entry.pixels());
        add_entry(&mut family, &entry, &resized, icns_path)?;
    }
    write_family(&family, icns_path)
}

fn add_entry(
    family: &mut IconFamily,
    entry: &IconsetEntry,
    image: &RgbaImage,
    icns_path: &Path,
) -> Result<(), ExportError> {
    let mut icon = icns::Image::new(PixelFormat::RGBA, image.width(), image.height());
    icon.data_mut().copy_from_slice(image.as_raw());
    family
        .add_icon_with_type(&icon, icon_type_for(entry))
        .map_err(|source| ExportError::IcnsEncode {
            path: icns_path.to_path_buf(),
            source,
        })
}

fn write_family(family: &IconFamily, icns_path: &Path) -> Result<(), ExportError> {
    let file = File::create(icns_path).map_err(|source| ExportError::Io {
        path: icns_path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    family
        .write(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|source| ExportError::IcnsEncode {
            path: icns_path.to_path_buf(),
            source,
        })
}

fn icon_type_for(entry: &IconsetEntry) -> IconType {
    match (entry.points, entry.density) {
        (16, 1) => IconType::RGBA32_16x16,
        (16, _) => IconType::RGBA32_16x16_2x,
        (32, 1) => IconType::RGBA32_32x32,
        (32, _) => IconType::RGBA32_32x32_2x,
        (128, 1) => IconType::RGBA32_128x128,
        (128, _) => IconType::RGBA32_128x128_2x,
        (256, 1) => IconType::RGBA32_256x256,
        (256, _) => IconType::RGBA32_256x256_2x,
        (512, 1) => IconType::RGBA32_512x512,
        _ => IconType::RGBA32_512x512_2x,
    }
}
