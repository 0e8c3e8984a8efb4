//! Edit-script parsing and execution.
//!
//! One command per line, `#` starts a comment. The grammar mirrors the
//! editor's operations one-to-one, e.g.:
//!
//! ```text
//! print-area front
//! text
//! select 1
//! align center
//! rotate 15
//! image logo.png
//! freehand
//! stroke 10,10 40,25 60,30
//! undo
//! ```

use std::str::FromStr;

use anyhow::Context as _;
use marque_core::{
    editor::{Edge, Editor, PrintArea},
    geom::{Point, Size},
    render::RenderSurface,
    state::scene::Stroke,
    state::VisualObject,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PrintArea(PrintArea),
    Rect { width: f32, height: f32 },
    Text,
    Image { path: std::path::PathBuf },
    Select { index: usize },
    Deselect,
    Delete,
    Align(Edge),
    Resize { width: f32, height: f32 },
    Rotate { degrees: f32 },
    Freehand,
    Stroke { points: Vec<(f32, f32)> },
    Erase,
    Undo,
    Redo,
}

impl FromStr for Command {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn number<'a>(parts: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<f32> {
            Ok(parts.next().context("missing numeric argument")?.parse()?)
        }

        let mut parts = s.split_whitespace();
        let head = parts.next().context("empty command")?;
        let command = match head {
            "print-area" => {
                let area = parts.next().context("missing print area")?;
                Self::PrintArea(area.parse::<PrintArea>()?)
            }
            "rect" => Self::Rect {
                width: number(&mut parts)?,
                height: number(&mut parts)?,
            },
            "text" => Self::Text,
            "image" => Self::Image {
                path: parts.next().context("missing image path")?.into(),
            },
            "select" => Self::Select {
                index: parts.next().context("missing stacking index")?.parse()?,
            },
            "deselect" => Self::Deselect,
            "delete" => Self::Delete,
            "align" => {
                let edge = parts.next().context("missing edge")?;
                Self::Align(edge.parse::<Edge>()?)
            }
            "resize" => Self::Resize {
                width: number(&mut parts)?,
                height: number(&mut parts)?,
            },
            "rotate" => Self::Rotate {
                degrees: number(&mut parts)?,
            },
            "freehand" => Self::Freehand,
            "stroke" => {
                let mut points = Vec::new();
                for pair in parts.by_ref() {
                    let (x, y) = pair
                        .split_once(',')
                        .context("stroke points are x,y pairs")?;
                    points.push((x.parse()?, y.parse()?));
                }
                anyhow::ensure!(!points.is_empty(), "stroke needs at least one point");
                Self::Stroke { points }
            }
            "erase" => Self::Erase,
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            other => anyhow::bail!("unknown command {other:?}"),
        };
        if let Some(trailing) = parts.next() {
            anyhow::bail!("unexpected trailing argument {trailing:?}");
        }
        Ok(command)
    }
}

pub fn apply<S: RenderSurface>(editor: &mut Editor<S>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::PrintArea(area) => {
            editor.set_print_area(area)?;
        }
        Command::Rect { width, height } => {
            editor.add_rect(Size::new(width, height)?)?;
        }
        Command::Text => {
            editor.add_text()?;
        }
        Command::Image { path } => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            // Blocks until the worker finishes; the insertion itself is one
            // atomic editor call.
            let decoded = crate::decode::decode_in_background(bytes).recv()??;
            editor.add_image(decoded)?;
        }
        Command::Select { index } => {
            let id = editor.scene().iter().nth(index).map(VisualObject::id);
            anyhow::ensure!(id.is_some(), "no object at stacking index {index}");
            editor.select(id);
        }
        Command::Deselect => editor.select(None),
        Command::Delete => editor.delete_selected()?,
        Command::Align(edge) => editor.align_selected(edge)?,
        Command::Resize { width, height } => {
            editor.resize_selected(Size::new(width, height)?)?;
        }
        Command::Rotate { degrees } => editor.rotate_selected(degrees)?,
        Command::Freehand => {
            editor.toggle_freehand();
        }
        Command::Stroke { points } => {
            let points = points
                .into_iter()
                .map(|(x, y)| Point::new(x, y))
                .collect::<Result<Vec<_>, _>>()?;
            editor.finish_stroke(points, Stroke::default())?;
        }
        Command::Erase => {
            editor.erase_freehand()?;
        }
        Command::Undo => {
            editor.undo()?;
        }
        Command::Redo => {
            editor.redo()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{apply, Command};
    use marque_core::{
        editor::{Edge, Editor, PrintArea},
        geom::Size,
        render::NullSurface,
    };

    #[test]
    fn parses_commands() {
        assert_eq!(
            "print-area front".parse::<Command>().unwrap(),
            Command::PrintArea(PrintArea::Front)
        );
        assert_eq!(
            "align middle".parse::<Command>().unwrap(),
            Command::Align(Edge::Middle)
        );
        assert_eq!(
            "stroke 1,2 3.5,4".parse::<Command>().unwrap(),
            Command::Stroke {
                points: vec![(1.0, 2.0), (3.5, 4.0)]
            }
        );
        assert!("rotate".parse::<Command>().is_err());
        assert!("rect 10 20 30".parse::<Command>().is_err());
        assert!("sparkle".parse::<Command>().is_err());
    }

    #[test]
    fn applies_a_session() {
        let mut editor = Editor::new(NullSurface::new(Size::wrap(300.0, 300.0))).unwrap();
        for line in [
            "rect 50 40",
            "select 0",
            "align center",
            "rotate 15",
            "deselect",
            "undo",
            "undo",
        ] {
            apply(&mut editor, line.parse().unwrap()).unwrap();
        }
        // Undid the rotation and the centering; the rect itself remains.
        assert_eq!(editor.scene().len(), 1);
        assert_eq!(
            editor.scene().iter().next().unwrap().left.get(),
            marque_core::editor::DEFAULT_PLACEMENT.x.get()
        );
    }

    #[test]
    fn select_out_of_range_errors() {
        let mut editor = Editor::new(NullSurface::new(Size::wrap(300.0, 300.0))).unwrap();
        assert!(apply(&mut editor, Command::Select { index: 3 }).is_err());
    }
}
