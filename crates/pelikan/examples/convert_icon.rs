//! Turn any image into a macOS-style AppIcon.icns without touching iconutil.
//!
//! ```bash
//! cargo run -p pelikan --example convert_icon -- logo.png AppIcon.icns
//! ```

use pelikan_core::{create_icon, load_source, write_icns, Preset, RenderParams};
use std::path::{Path, PathBuf};
use std::process;

fn convert(input: &Path, output: &Path) -> Result<(), String> {
    let mut params = RenderParams::default();
    Preset::MacOs.apply(&mut params);

    let source = load_source(input).map_err(|e| e.to_string())?;
    let icon = create_icon(&source, &params).map_err(|e| e.to_string())?;
    write_icns(&icon, output).map_err(|e| e.to_string())
}

fn main() {
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        eprintln!("usage: convert_icon <image> <output.icns>");
        process::exit(2);
    };

    match convert(&input, &output) {
        Ok(()) => println!("Created {}", output.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn converts_image_to_icns() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("logo.png");
        RgbaImage::from_pixel(64, 64, Rgba([0, 128, 255, 255]))
            .save(&input)
            .unwrap();
        let output = temp.path().join("AppIcon.icns");

        convert(&input, &output).unwrap();
        assert!(output.is_file());
    }

    #[test]
    fn unreadable_input_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = convert(&temp.path().join("missing.png"), &temp.path().join("x.icns")).unwrap_err();
        assert!(err.contains("missing.png"));
        assert!(!temp.path().join("x.icns").exists());
    }
}
