//! Scripted design sessions against the preview surface.
//!
//! Reads an edit script, replays it through the editor, and writes the
//! resulting design as a PNG. Handy for exercising the whole pipeline
//! without a windowing host.

use anyhow::Context as _;
use clap::Parser;

mod decode;
mod raster;
mod script;

#[derive(Parser)]
#[command(about = "Replay an edit script and export the design")]
struct Args {
    /// Edit script, one command per line. `#` starts a comment.
    script: std::path::PathBuf,
    /// Where to write the exported PNG.
    #[arg(short, long, default_value = "design.png")]
    out: std::path::PathBuf,
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 300)]
    width: u32,
    /// Viewport height in pixels.
    #[arg(long, default_value_t = 300)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let surface = raster::PreviewSurface::new(args.width, args.height)?;
    let mut editor = marque_core::editor::Editor::new(surface)?;

    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("reading {}", args.script.display()))?;
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = line
            .parse()
            .with_context(|| format!("line {}: {line:?}", line_no + 1))?;
        script::apply(&mut editor, command)
            .with_context(|| format!("line {}: {line:?}", line_no + 1))?;
    }

    let raster = editor.export_raster()?;
    let png = marque_core::export::to_png(&raster)?;
    std::fs::write(&args.out, png).with_context(|| format!("writing {}", args.out.display()))?;
    log::info!(
        "wrote {} ({} objects, {} undoable steps)",
        args.out.display(),
        editor.scene().len(),
        editor.history().undo_depth(),
    );
    Ok(())
}
