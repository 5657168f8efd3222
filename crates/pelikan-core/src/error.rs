use image::ImageError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors from loading a source image and rendering an icon.
#[derive(Debug)]
pub enum RenderError {
    /// A render parameter is outside its allowed range
    InvalidParam {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    /// The source image has no pixels
    EmptySource,
    /// A mask was applied to an image of a different size
    MaskMismatch { image: (u32, u32), mask: (u32, u32) },
    /// The source file could not be read or decoded
    Decode { path: PathBuf, source: ImageError },
    /// The rendered icon could not be encoded
    Encode { path: PathBuf, source: ImageError },
    /// Filesystem error while writing the rendered icon
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidParam {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "{} must be between {} and {}, got {}",
                field, min, max, value
            ),
            RenderError::EmptySource => write!(f, "source image is empty"),
            RenderError::MaskMismatch { image, mask } => write!(
                f,
                "mask is {}x{} but the image is {}x{}",
                mask.0, mask.1, image.0, image.1
            ),
            RenderError::Decode { path, source } => {
                write!(f, "couldn't open {}: {}", path.display(), source)
            }
            RenderError::Encode { path, source } => {
                write!(f, "couldn't encode {}: {}", path.display(), source)
            }
            RenderError::Io { path, source } => {
                write!(f, "couldn't write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Decode { source, .. } => Some(source),
            RenderError::Encode { source, .. } => Some(source),
            RenderError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors from iconset and .icns export.
#[derive(Debug)]
pub enum ExportError {
    /// Filesystem error at the given path
    Io { path: PathBuf, source: io::Error },
    /// A PNG in the iconset could not be encoded or decoded
    Image { path: PathBuf, source: ImageError },
    /// The iconset directory does not exist
    IconsetNotFound(PathBuf),
    /// The iconset is missing one of the files Apple expects
    MissingEntry(PathBuf),
    /// `iconutil` is not installed or not on PATH
    IconutilNotFound,
    /// `iconutil` ran but reported failure
    IconutilFailed { code: Option<i32>, stderr: String },
    /// The converter finished but no .icns file appeared
    IcnsNotCreated(PathBuf),
    /// The icon family could not be packed
    IcnsEncode { path: PathBuf, source: io::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            ExportError::Image { path, source } => write!(f, "{}: {}", path.display(), source),
            ExportError::IconsetNotFound(path) => {
                write!(f, "iconset directory not found: {}", path.display())
            }
            ExportError::MissingEntry(path) => {
                write!(f, "iconset is missing {}", path.display())
            }
            ExportError::IconutilNotFound => write!(
                f,
                "iconutil not found. Make sure you're on macOS and the Xcode Command Line Tools are installed"
            ),
            ExportError::IconutilFailed { code, stderr } => match code {
                Some(code) => write!(f, "iconutil failed (exit code {}): {}", code, stderr.trim()),
                None => write!(f, "iconutil terminated by signal: {}", stderr.trim()),
            },
            ExportError::IcnsNotCreated(path) => {
                write!(f, "expected .icns file was not created at {}", path.display())
            }
            ExportError::IcnsEncode { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io { source, .. } => Some(source),
            ExportError::Image { source, .. } => Some(source),
            ExportError::IcnsEncode { source, .. } => Some(source),
            _ => None,
        }
    }
}
