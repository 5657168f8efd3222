use pelikan_core::{create_icon, load_source, save_png, RenderError, RenderParams};
use std::path::Path;
use tracing::info;

/// Render `input` into a single icon PNG at `output`.
pub fn run(input: &Path, output: &Path, params: &RenderParams) -> Result<(), RenderError> {
    let source = load_source(input)?;
    let icon = create_icon(&source, params)?;
    save_png(&icon, output)?;
    info!(output = %output.display(), size = params.canvas_px, "icon rendered");
    Ok(())
}
