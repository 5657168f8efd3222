//! macOS .app bundle creation.
//!
//! Lays out a double-clickable application bundle around an already built
//! executable, with an icon and Info.plist.

use crate::compose::load_source;
use crate::error::{ExportError, RenderError};
use crate::pack::write_icns;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_APP_NAME: &str = "Icon Pelikan";
pub const DEFAULT_IDENTIFIER: &str = "com.pelikanco.iconpelikan";
/// Icon file name inside Contents/Resources, referenced from Info.plist
pub const BUNDLE_ICON_NAME: &str = "AppIcon";
/// Where extra resources land inside Contents/Resources
pub const ASSETS_DIR: &str = "assets";

/// Info.plist template for macOS .app bundles.
const INFO_PLIST_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleExecutable</key>
    <string>{executable}</string>
    <key>CFBundleIdentifier</key>
    <string>{identifier}</string>
    <key>CFBundleName</key>
    <string>{name}</string>
    <key>CFBundleDisplayName</key>
    <string>{name}</string>
    <key>CFBundleVersion</key>
    <string>{version}</string>
    <key>CFBundleShortVersionString</key>
    <string>{version}</string>
    <key>CFBundlePackageType</key>
    <string>APPL</string>
    <key>CFBundleIconFile</key>
    <string>{icon}</string>
    <key>LSMinimumSystemVersion</key>
    <string>10.13</string>
    <key>NSHighResolutionCapable</key>
    <true/>
</dict>
</plist>
"#;

/// Errors from bundle creation.
#[derive(Debug)]
pub enum BundleError {
    /// The executable to wrap does not exist.
    ExecutableNotFound(PathBuf),
    /// The app name can't be used as a single path component.
    InvalidName(String),
    /// Failed to remove a previous bundle at the output path.
    Cleanup(io::Error),
    /// Failed to create directory structure.
    DirectoryCreation(io::Error),
    /// Failed to write file.
    FileWrite(io::Error),
    /// Failed to read the icon image.
    IconRead(RenderError),
    /// Failed to turn the icon into .icns.
    IconProcessing(ExportError),
}

impl std::fmt::Display for BundleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BundleError::ExecutableNotFound(path) => {
                write!(f, "Executable not found: {}", path.display())
            }
            BundleError::InvalidName(name) => write!(
                f,
                "Invalid app name {:?}: it must not be empty or contain path separators or \"..\"",
                name
            ),
            BundleError::Cleanup(e) => write!(f, "Failed to remove previous bundle: {}", e),
            BundleError::DirectoryCreation(e) => write!(f, "Failed to create directory: {}", e),
            BundleError::FileWrite(e) => write!(f, "Failed to write file: {}", e),
            BundleError::IconRead(e) => write!(f, "Failed to read icon: {}", e),
            BundleError::IconProcessing(e) => write!(f, "Icon processing failed: {}", e),
        }
    }
}

impl std::error::Error for BundleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BundleError::Cleanup(e) => Some(e),
            BundleError::DirectoryCreation(e) => Some(e),
            BundleError::FileWrite(e) => Some(e),
            BundleError::IconRead(e) => Some(e),
            BundleError::IconProcessing(e) => Some(e),
            _ => None,
        }
    }
}

/// What goes into a bundle.
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// The built executable to wrap
    pub executable: PathBuf,
    /// `.icns` file, or any image to render into one
    pub icon: Option<PathBuf>,
    /// Directory the `<name>.app` is created in
    pub output_dir: PathBuf,
    pub name: String,
    pub identifier: String,
    pub version: String,
    /// Directory copied to Contents/Resources/assets
    pub resources: Option<PathBuf>,
}

impl BundleOptions {
    pub fn new(executable: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        BundleOptions {
            executable: executable.into(),
            icon: None,
            output_dir: output_dir.into(),
            name: DEFAULT_APP_NAME.to_string(),
            identifier: DEFAULT_IDENTIFIER.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            resources: None,
        }
    }

    /// `<output_dir>/<name>.app`
    pub fn bundle_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.app", self.name))
    }
}

/// Result of a successful bundle build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// The name becomes both `<name>.app` and the executable inside it, so it
/// has to stay a single file name.
fn is_valid_app_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

/// Create a macOS .app bundle, replacing any previous one at the same path.
pub fn create_app_bundle(options: &BundleOptions) -> Result<BundleReport, BundleError> {
    if !options.executable.is_file() {
        return Err(BundleError::ExecutableNotFound(options.executable.clone()));
    }
    if !is_valid_app_name(&options.name) {
        return Err(BundleError::InvalidName(options.name.clone()));
    }

    let bundle_path = options.bundle_path();
    if bundle_path.exists() {
        debug!(path = %bundle_path.display(), "removing previous bundle");
        fs::remove_dir_all(&bundle_path).map_err(BundleError::Cleanup)?;
    }

    // Name.app/
    //   Contents/
    //     MacOS/Name
    //     Resources/AppIcon.icns
    //     Resources/assets/...
    //     Info.plist
    let contents_dir = bundle_path.join("Contents");
    let macos_dir = contents_dir.join("MacOS");
    let resources_dir = contents_dir.join("Resources");

    fs::create_dir_all(&macos_dir).map_err(BundleError::DirectoryCreation)?;
    fs::create_dir_all(&resources_dir).map_err(BundleError::DirectoryCreation)?;

    let executable_path = macos_dir.join(&options.name);
    fs::copy(&options.executable, &executable_path).map_err(BundleError::FileWrite)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&executable_path)
            .map_err(BundleError::FileWrite)?
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&executable_path, perms).map_err(BundleError::FileWrite)?;
    }

    if let Some(icon) = &options.icon {
        let icns_path = resources_dir.join(format!("{}.icns", BUNDLE_ICON_NAME));
        install_icon(icon, &icns_path)?;
    }

    if let Some(resources) = &options.resources {
        copy_dir_recursive(resources, &resources_dir.join(ASSETS_DIR))?;
    }

    fs::write(contents_dir.join("Info.plist"), info_plist(options)).map_err(BundleError::FileWrite)?;

    let size_bytes = dir_size(&bundle_path).map_err(BundleError::FileWrite)?;
    info!(path = %bundle_path.display(), size_bytes, "app bundle created");
    Ok(BundleReport {
        path: bundle_path,
        size_bytes,
    })
}

/// Copy an .icns as is, render anything else into one.
fn install_icon(icon: &Path, icns_path: &Path) -> Result<(), BundleError> {
    let is_icns = icon
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("icns"));
    if is_icns {
        fs::copy(icon, icns_path).map_err(BundleError::FileWrite)?;
        return Ok(());
    }
    let image = load_source(icon).map_err(BundleError::IconRead)?;
    write_icns(&image, icns_path).map_err(BundleError::IconProcessing)
}

/// Fill in the Info.plist template.
pub fn info_plist(options: &BundleOptions) -> String {
    INFO_PLIST_TEMPLATE
        .replace("{executable}", &escape_xml(&options.name))
        .replace("{identifier}", &escape_xml(&options.identifier))
        .replace("{name}", &escape_xml(&options.name))
        .replace("{version}", &escape_xml(&options.version))
        .replace("{icon}", BUNDLE_ICON_NAME)
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Recursively copy a directory.
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<(), BundleError> {
    if !src.is_dir() {
        return Err(BundleError::DirectoryCreation(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Source is not a directory: {}", src.display()),
        )));
    }

    fs::create_dir_all(dst).map_err(BundleError::DirectoryCreation)?;

    for entry in fs::read_dir(src).map_err(BundleError::DirectoryCreation)? {
        let entry = entry.map_err(BundleError::DirectoryCreation)?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path).map_err(BundleError::FileWrite)?;
        }
    }

    Ok(())
}

/// Total size of all files below `path`, like `du` without block rounding.
fn dir_size(path: &Path) -> io::Result<u64> {
    let mut total = 0;
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        total += if metadata.is_dir() {
            dir_size(&entry.path())?
        } else {
            metadata.len()
        };
    }
    Ok(total)
}

/// Human readable byte count, e.g. `1.4 MiB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn fake_executable(dir: &Path) -> PathBuf {
        let path = dir.join("pelikan-gui");
        fs::write(&path, b"#!/bin/sh\necho hi\n").unwrap();
        path
    }

    #[test]
    fn creates_bundle_layout() {
        let temp = TempDir::new().unwrap();
        let exe = fake_executable(temp.path());
        let icon = temp.path().join("icon.png");
        RgbaImage::from_pixel(64, 64, Rgba([1, 2, 3, 255])).save(&icon).unwrap();

        let mut options = BundleOptions::new(&exe, temp.path().join("dist"));
        options.icon = Some(icon);
        options.version = "1.2.3".to_string();

        let report = create_app_bundle(&options).unwrap();
        let contents = temp.path().join("dist/Icon Pelikan.app/Contents");

        assert_eq!(report.path, temp.path().join("dist/Icon Pelikan.app"));
        assert!(contents.join("MacOS/Icon Pelikan").is_file());
        assert!(contents.join("Resources/AppIcon.icns").is_file());
        let plist = fs::read_to_string(contents.join("Info.plist")).unwrap();
        assert!(plist.contains("<string>com.pelikanco.iconpelikan</string>"));
        assert!(plist.contains("<string>1.2.3</string>"));
        assert!(plist.contains("<string>AppIcon</string>"));
        assert!(report.size_bytes > 0);
    }

    #[cfg(unix)]
    #[test]
    fn executable_is_marked_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let exe = fake_executable(temp.path());
        let report = create_app_bundle(&BundleOptions::new(&exe, temp.path())).unwrap();

        let mode = fs::metadata(report.path.join("Contents/MacOS/Icon Pelikan"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn replaces_previous_bundle() {
        let temp = TempDir::new().unwrap();
        let exe = fake_executable(temp.path());
        let options = BundleOptions::new(&exe, temp.path());

        let stale = options.bundle_path().join("Contents/stale.txt");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, b"old").unwrap();

        create_app_bundle(&options).unwrap();
        assert!(!stale.exists());
    }

    #[test]
    fn copies_icns_and_resources_verbatim() {
        let temp = TempDir::new().unwrap();
        let exe = fake_executable(temp.path());
        let icns = temp.path().join("custom.icns");
        fs::write(&icns, b"icns-bytes").unwrap();
        let assets = temp.path().join("assets");
        fs::create_dir_all(assets.join("nested")).unwrap();
        fs::write(assets.join("nested/noise.png"), b"png").unwrap();

        let mut options = BundleOptions::new(&exe, temp.path().join("out"));
        options.icon = Some(icns);
        options.resources = Some(assets);
        let report = create_app_bundle(&options).unwrap();

        let resources = report.path.join("Contents/Resources");
        assert_eq!(fs::read(resources.join("AppIcon.icns")).unwrap(), b"icns-bytes");
        assert!(resources.join("assets/nested/noise.png").is_file());
    }

    #[test]
    fn missing_executable_is_an_error() {
        let temp = TempDir::new().unwrap();
        let options = BundleOptions::new(temp.path().join("nope"), temp.path());
        assert!(matches!(
            create_app_bundle(&options),
            Err(BundleError::ExecutableNotFound(_))
        ));
    }

    #[test]
    fn names_escaping_the_output_dir_are_rejected() {
        let temp = TempDir::new().unwrap();
        let exe = temp.path().join("app-bin");
        fs::write(&exe, b"binary").unwrap();
        let out = temp.path().join("out");
        let sibling = temp.path().join("victim.app");
        fs::create_dir_all(&sibling).unwrap();

        for name in ["../victim", "nested/app", "..", ""] {
            let mut options = BundleOptions::new(&exe, &out);
            options.name = name.to_string();
            assert!(
                matches!(create_app_bundle(&options), Err(BundleError::InvalidName(_))),
                "{:?} should be rejected",
                name
            );
        }
        assert!(sibling.is_dir());
    }

    #[test]
    fn plist_values_are_escaped() {
        let mut options = BundleOptions::new("/bin/app", "/tmp");
        options.name = "Tom & Jerry".to_string();
        let plist = info_plist(&options);
        assert!(plist.contains("<string>Tom &amp; Jerry</string>"));
        assert!(!plist.contains("Tom & Jerry"));
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MiB");
    }
}
