//! Apple `.iconset` directories.

use crate::error::ExportError;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extension of an iconset directory
pub const ICONSET_EXTENSION: &str = "iconset";

/// One PNG inside an iconset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconsetEntry {
    /// Size in points, as it appears in the file name
    pub points: u32,
    /// 1 for standard, 2 for retina
    pub density: u32,
}

impl IconsetEntry {
    const fn new(points: u32, density: u32) -> Self {
        IconsetEntry { points, density }
    }

    pub fn pixels(&self) -> u32 {
        self.points * self.density
    }

    pub fn file_name(&self) -> String {
        if self.density == 1 {
            format!("icon_{0}x{0}.png", self.points)
        } else {
            format!("icon_{0}x{0}@{1}x.png", self.points, self.density)
        }
    }
}

/// The files `iconutil` expects, smallest first.
pub const ICONSET_ENTRIES: [IconsetEntry; 10] = [
    IconsetEntry::new(16, 1),
    IconsetEntry::new(16, 2),
    IconsetEntry::new(32, 1),
    IconsetEntry::new(32, 2),
    IconsetEntry::new(128, 1),
    IconsetEntry::new(128, 2),
    IconsetEntry::new(256, 1),
    IconsetEntry::new(256, 2),
    IconsetEntry::new(512, 1),
    IconsetEntry::new(512, 2),
];

/// `folder/<name>.iconset`
pub fn iconset_dir_for(folder: &Path, name: &str) -> PathBuf {
    folder.join(format!("{}.{}", name, ICONSET_EXTENSION))
}

/// Write every iconset entry, resized from `image`, into `dest`.
///
/// `dest` is the iconset directory itself and is created if missing.
/// Returns `dest`.
pub fn export_iconset(image: &RgbaImage, dest: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dest).map_err(|source| ExportError::Io {
        path: dest.to_path_buf(),
        source,
    })?;

    for entry in ICONSET_ENTRIES {
        let path = dest.join(entry.file_name());
        let resized = resize_square(image, entry.pixels());
        resized
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| ExportError::Image {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), pixels = entry.pixels(), "wrote iconset entry");
    }

    info!(dest = %dest.display(), files = ICONSET_ENTRIES.len(), "iconset exported");
    Ok(dest.to_path_buf())
}

/// Lanczos resize to `side x side`, skipping the work when nothing changes.
pub(crate) fn resize_square(image: &RgbaImage, side: u32) -> RgbaImage {
    if image.dimensions() == (side, side) {
        image.clone()
    } else {
        imageops::resize(image, side, side, FilterType::Lanczos3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn entry_names_follow_apple_convention() {
        let names: Vec<String> = ICONSET_ENTRIES.iter().map(|e| e.file_name()).collect();
        assert_eq!(names[0], "icon_16x16.png");
        assert_eq!(names[1], "icon_16x16@2x.png");
        assert_eq!(names[9], "icon_512x512@2x.png");
        assert_eq!(ICONSET_ENTRIES[9].pixels(), 1024);
    }

    #[test]
    fn iconset_dir_is_inside_the_folder() {
        let dir = iconset_dir_for(Path::new("/tmp/out"), "AppIcon");
        assert_eq!(dir, PathBuf::from("/tmp/out/AppIcon.iconset"));
    }

    #[test]
    fn export_writes_every_size() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("deep").join("icon.iconset");
        let image = RgbaImage::from_pixel(512, 512, Rgba([0, 128, 255, 255]));

        let out = export_iconset(&image, &dest).unwrap();
        assert_eq!(out, dest);

        for entry in ICONSET_ENTRIES {
            let path = dest.join(entry.file_name());
            let (width, height) = image::image_dimensions(&path).unwrap();
            assert_eq!((width, height), (entry.pixels(), entry.pixels()), "{}", path.display());
        }
        assert_eq!(fs::read_dir(&dest).unwrap().count(), ICONSET_ENTRIES.len());
    }

    #[test]
    fn export_overwrites_existing_iconset() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("icon.iconset");
        let first = RgbaImage::from_pixel(64, 64, Rgba([255, 0, 0, 255]));
        let second = RgbaImage::from_pixel(64, 64, Rgba([0, 255, 0, 255]));

        export_iconset(&first, &dest).unwrap();
        export_iconset(&second, &dest).unwrap();

        let small = image::open(dest.join("icon_16x16.png")).unwrap().to_rgba8();
        assert!(small.get_pixel(8, 8)[1] > 250);
    }

    #[test]
    fn export_fails_when_dest_is_a_file() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("icon.iconset");
        fs::write(&dest, b"").unwrap();

        let image = RgbaImage::new(32, 32);
        let err = export_iconset(&image, &dest).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
