//! Turning a source image into an icon: resize, mask, centre on a canvas.

use crate::error::RenderError;
use crate::mask::{apply_mask, shape_mask};
use crate::params::RenderParams;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Load any supported image file as RGBA.
pub fn load_source(path: &Path) -> Result<RgbaImage, RenderError> {
    let image = image::open(path).map_err(|source| RenderError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image.to_rgba8();
    if image.width() == 0 || image.height() == 0 {
        return Err(RenderError::EmptySource);
    }
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "loaded source image"
    );
    Ok(image)
}

/// Render `source` into a square icon according to `params`.
pub fn create_icon(source: &RgbaImage, params: &RenderParams) -> Result<RgbaImage, RenderError> {
    params.validate()?;
    if source.width() == 0 || source.height() == 0 {
        return Err(RenderError::EmptySource);
    }
    if source.width() != source.height() {
        warn!(
            width = source.width(),
            height = source.height(),
            "source image is not square, it will be stretched"
        );
    }

    let canvas_px = params.canvas_px;
    let mut canvas = match params.background_rgba() {
        Some(fill) => RgbaImage::from_pixel(canvas_px, canvas_px, Rgba(fill)),
        None => RgbaImage::new(canvas_px, canvas_px),
    };

    let inner_px = params.inner_px();
    let mut inner = imageops::resize(source, inner_px, inner_px, FilterType::Lanczos3);
    let mask = shape_mask(inner_px, params.shape, params.radius_px);
    apply_mask(&mut inner, &mask)?;

    let offset = i64::from(params.inner_offset());
    imageops::overlay(&mut canvas, &inner, offset, offset);
    Ok(canvas)
}

/// Write `image` as a PNG, creating missing parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| RenderError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| RenderError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), "wrote png");
    Ok(())
}
