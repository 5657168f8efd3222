//! Export an `.iconset` directory and optionally the matching `.icns`.

use pelikan_core::{
    create_icon, export_iconset, iconset_dir_for, load_source, to_icns, ExportError, IcnsBackend,
    RenderError, RenderParams,
};
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors from the iconset command.
#[derive(Debug)]
pub enum IconsetError {
    /// Loading or rendering the source failed.
    Render(RenderError),
    /// Writing the iconset or packing the .icns failed.
    Export(ExportError),
}

impl fmt::Display for IconsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconsetError::Render(e) => write!(f, "{}", e),
            IconsetError::Export(e) => write!(f, "export failed: {}", e),
        }
    }
}

impl std::error::Error for IconsetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IconsetError::Render(e) => Some(e),
            IconsetError::Export(e) => Some(e),
        }
    }
}

impl From<RenderError> for IconsetError {
    fn from(e: RenderError) -> Self {
        IconsetError::Render(e)
    }
}

impl From<ExportError> for IconsetError {
    fn from(e: ExportError) -> Self {
        IconsetError::Export(e)
    }
}

/// Paths written by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconsetOutput {
    pub iconset: PathBuf,
    pub icns: Option<PathBuf>,
}

/// Render `input` and write `<folder>/<name>.iconset`.
///
/// When `icns` is set the iconset is also packed into `<folder>/<name>.icns`
/// with the given backend.
pub fn run(
    input: &Path,
    folder: &Path,
    name: &str,
    params: &RenderParams,
    icns: Option<IcnsBackend>,
) -> Result<IconsetOutput, IconsetError> {
    let source = load_source(input)?;
    let icon = create_icon(&source, params)?;

    let iconset = export_iconset(&icon, &iconset_dir_for(folder, name))?;
    let icns = match icns {
        Some(backend) => Some(to_icns(&iconset, backend)?),
        None => None,
    };

    Ok(IconsetOutput { iconset, icns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use pelikan_core::ICONSET_ENTRIES;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(dir: &Path) -> PathBuf {
        let path = dir.join("logo.png");
        RgbaImage::from_pixel(300, 300, Rgba([250, 200, 0, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn writes_iconset_inside_folder() {
        let temp = TempDir::new().unwrap();
        let input = write_source(temp.path());
        let folder = temp.path().join("export");

        let output = run(&input, &folder, "AppIcon", &RenderParams::default(), None).unwrap();

        assert_eq!(output.iconset, folder.join("AppIcon.iconset"));
        assert_eq!(output.icns, None);
        assert_eq!(
            fs::read_dir(&output.iconset).unwrap().count(),
            ICONSET_ENTRIES.len()
        );
    }

    #[test]
    fn packs_icns_with_native_backend() {
        let temp = TempDir::new().unwrap();
        let input = write_source(temp.path());

        let output = run(
            &input,
            temp.path(),
            "icon",
            &RenderParams::default(),
            Some(IcnsBackend::Native),
        )
        .unwrap();

        assert_eq!(output.icns, Some(temp.path().join("icon.icns")));
        assert!(temp.path().join("icon.icns").is_file());
    }

    #[test]
    fn invalid_params_stop_before_writing() {
        let temp = TempDir::new().unwrap();
        let input = write_source(temp.path());
        let params = RenderParams {
            radius_px: 400,
            ..Default::default()
        };

        let err = run(&input, temp.path(), "icon", &params, None).unwrap_err();
        assert!(matches!(err, IconsetError::Render(RenderError::InvalidParam { .. })));
        assert!(!temp.path().join("icon.iconset").exists());
    }
}
