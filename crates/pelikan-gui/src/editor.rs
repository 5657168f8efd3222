use image::RgbaImage;
use pelikan_core::{
    create_icon, export_iconset, iconset_dir_for, load_source, save_png, to_icns, ExportError,
    IcnsBackend, RenderError, RenderParams,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Base name used when the source file has no usable stem
const FALLBACK_ICON_NAME: &str = "icon";

/// The loaded source, the current parameters and the preview built from them.
///
/// Everything here runs synchronously; the preview is rebuilt only when the
/// source or the parameters actually change.
pub struct Editor {
    source: Option<RgbaImage>,
    source_path: Option<PathBuf>,
    params: RenderParams,
    preview: Option<RgbaImage>,
    /// Bumped on every rebuild so the UI knows to re-upload its texture
    revision: u64,
}

impl Editor {
    pub fn new(params: RenderParams) -> Self {
        Editor {
            source: None,
            source_path: None,
            params,
            preview: None,
            revision: 0,
        }
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    pub fn preview(&self) -> Option<&RgbaImage> {
        self.preview.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the source image. On failure the previous source stays.
    pub fn load(&mut self, path: &Path) -> Result<(), RenderError> {
        let source = load_source(path)?;
        self.source = Some(source);
        self.source_path = Some(path.to_path_buf());
        self.rebuild()
    }

    /// Apply new parameters. Returns whether anything changed.
    pub fn set_params(&mut self, params: RenderParams) -> Result<bool, RenderError> {
        if params == self.params {
            return Ok(false);
        }
        self.params = params;
        self.rebuild()?;
        Ok(true)
    }

    fn rebuild(&mut self) -> Result<(), RenderError> {
        let Some(source) = &self.source else {
            return Ok(());
        };
        self.preview = Some(create_icon(source, &self.params)?);
        self.revision += 1;
        debug!(revision = self.revision, "preview rebuilt");
        Ok(())
    }

    /// Name for exported files, taken from the source file.
    pub fn icon_name(&self) -> String {
        self.source_path
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or(FALLBACK_ICON_NAME)
            .to_string()
    }

    /// Write the preview as PNG. `Ok(false)` when there is nothing to save.
    pub fn save_png(&self, path: &Path) -> Result<bool, RenderError> {
        let Some(preview) = &self.preview else {
            return Ok(false);
        };
        save_png(preview, path)?;
        Ok(true)
    }

    /// Export `<folder>/<name>.iconset` and pack it into `<folder>/<name>.icns`.
    /// `Ok(None)` when there is nothing to export.
    pub fn save_icns(
        &self,
        folder: &Path,
        backend: IcnsBackend,
    ) -> Result<Option<PathBuf>, ExportError> {
        let Some(preview) = &self.preview else {
            return Ok(None);
        };
        let iconset = export_iconset(preview, &iconset_dir_for(folder, &self.icon_name()))?;
        to_icns(&iconset, backend).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pelikan_core::Shape;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::from_pixel(64, 64, Rgba([10, 20, 200, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn starts_without_preview() {
        let editor = Editor::new(RenderParams::default());
        assert!(editor.preview().is_none());
        assert_eq!(editor.revision(), 0);
        assert_eq!(editor.icon_name(), "icon");
    }

    #[test]
    fn params_without_source_do_not_render() {
        let mut editor = Editor::new(RenderParams::default());
        let changed = editor
            .set_params(RenderParams {
                shape: Shape::Circle,
                ..Default::default()
            })
            .unwrap();
        assert!(changed);
        assert!(editor.preview().is_none());
        assert_eq!(editor.params().shape, Shape::Circle);
    }

    #[test]
    fn load_builds_preview_at_canvas_size() {
        let temp = TempDir::new().unwrap();
        let path = write_source(temp.path(), "logo.png");

        let mut editor = Editor::new(RenderParams::default());
        editor.load(&path).unwrap();

        assert_eq!(editor.preview().unwrap().dimensions(), (512, 512));
        assert_eq!(editor.revision(), 1);
        assert_eq!(editor.icon_name(), "logo");
    }

    #[test]
    fn unchanged_params_skip_rebuild() {
        let temp = TempDir::new().unwrap();
        let mut editor = Editor::new(RenderParams::default());
        editor.load(&write_source(temp.path(), "logo.png")).unwrap();

        assert!(!editor.set_params(RenderParams::default()).unwrap());
        assert_eq!(editor.revision(), 1);

        let bigger = RenderParams {
            canvas_px: 256,
            ..Default::default()
        };
        assert!(editor.set_params(bigger).unwrap());
        assert_eq!(editor.revision(), 2);
        assert_eq!(editor.preview().unwrap().width(), 256);
    }

    #[test]
    fn failed_load_keeps_previous_source() {
        let temp = TempDir::new().unwrap();
        let good = write_source(temp.path(), "logo.png");
        let bad = temp.path().join("broken.png");
        fs::write(&bad, b"nope").unwrap();

        let mut editor = Editor::new(RenderParams::default());
        editor.load(&good).unwrap();
        assert!(editor.load(&bad).is_err());

        assert_eq!(editor.icon_name(), "logo");
        assert!(editor.preview().is_some());
    }

    #[test]
    fn saving_without_preview_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let editor = Editor::new(RenderParams::default());

        assert!(!editor.save_png(&temp.path().join("icon.png")).unwrap());
        assert_eq!(editor.save_icns(temp.path(), IcnsBackend::Native).unwrap(), None);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn exports_png_and_icns() {
        let temp = TempDir::new().unwrap();
        let mut editor = Editor::new(RenderParams::default());
        editor.load(&write_source(temp.path(), "logo.png")).unwrap();

        let png = temp.path().join("out.png");
        assert!(editor.save_png(&png).unwrap());
        assert_eq!(image::image_dimensions(&png).unwrap(), (512, 512));

        let out = temp.path().join("export");
        let icns = editor.save_icns(&out, IcnsBackend::Native).unwrap().unwrap();
        assert_eq!(icns, out.join("logo.icns"));
        assert!(out.join("logo.iconset").is_dir());
        assert!(icns.is_file());
    }
}
