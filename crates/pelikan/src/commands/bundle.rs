//! Wrap a built executable into a macOS .app bundle.

use pelikan_core::bundle::{create_app_bundle, BundleError, BundleReport, BundleOptions};

pub fn run(options: &BundleOptions) -> Result<BundleReport, BundleError> {
    println!("Building {}...", options.bundle_path().display());
    create_app_bundle(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn builds_named_bundle() {
        let temp = TempDir::new().unwrap();
        let exe = temp.path().join("pelikan-gui");
        fs::write(&exe, b"binary").unwrap();

        let mut options = BundleOptions::new(&exe, temp.path().join("dist"));
        options.name = "Pelikan Dev".to_string();
        options.identifier = "com.example.pelikan".to_string();

        let report = run(&options).unwrap();
        assert_eq!(report.path, temp.path().join("dist/Pelikan Dev.app"));
        let plist = fs::read_to_string(report.path.join("Contents/Info.plist")).unwrap();
        assert!(plist.contains("com.example.pelikan"));
    }
}
