//! # Editor
//!
//! The controller orchestrating user operations against the scene. Every
//! mutating operation follows the same protocol: mutate the scene, encode a
//! snapshot, commit it to history, redraw. Operations that target "the
//! selected object" while nothing is selected are silent no-ops - permissive
//! UI semantics, no spurious commits, no errors.
//!
//! The editor owns the scene, the history stack, and the render surface
//! exclusively. All operations run to completion on the calling thread; the
//! only asynchronous boundary (image decoding) re-enters through
//! [`Editor::add_image`] as a single atomic step.

use crate::{
    color::Rgba,
    export,
    geom::{GeomError, Point, Size},
    history::History,
    render::{DecodedImage, RasterImage, RenderSurface},
    snapshot::{self, SnapshotError},
    state::scene::{ObjectPatch, Stroke},
    state::{ObjectId, Scene, VisualObject},
    util::{FiniteF32, NotFinite},
};

/// Inset from the viewport edge used by the edge-aligning operations.
pub const EDGE_MARGIN: f32 = 10.0;
/// Newly added objects land here, like dropped files in the original UI.
pub const DEFAULT_PLACEMENT: Point = Point::wrap(100.0, 100.0);
/// Uploaded pictures are scaled to this width, preserving aspect.
pub const IMAGE_TARGET_WIDTH: f32 = 150.0;

const DEFAULT_TEXT: &str = "Your Text";
const DEFAULT_FONT_SIZE: f32 = 24.0;
const DEFAULT_FONT_FAMILY: &str = "Arial";
const DEFAULT_TEXT_BOUNDS: Size = Size::wrap(150.0, 30.0);
const PRINT_AREA_PLACEMENT: Point = Point::wrap(100.0, 50.0);

#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Geometry(#[from] GeomError),
    #[error(transparent)]
    Render(#[from] crate::render::RenderError),
    #[error(transparent)]
    Export(#[from] export::ExportError),
}
impl From<NotFinite> for EditorError {
    fn from(err: NotFinite) -> Self {
        Self::Geometry(err.into())
    }
}

/// The active pointer tool.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, strum::AsRefStr, strum::EnumIter, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Tool {
    Select,
    Freehand,
}

/// Which viewport edge (or axis center) to align the selection against.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, strum::AsRefStr, strum::EnumIter, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Edge {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// Garment print-area presets. Choosing one replaces the whole design with
/// the base rectangle for that area.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, strum::AsRefStr, strum::EnumIter, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum PrintArea {
    Front,
    Back,
    Sleeve,
    Neck,
    Waist,
}

impl PrintArea {
    #[must_use]
    pub fn size(self) -> Size {
        match self {
            Self::Front => Size::wrap(200.0, 250.0),
            Self::Back => Size::wrap(220.0, 260.0),
            Self::Sleeve => Size::wrap(100.0, 150.0),
            Self::Neck => Size::wrap(180.0, 100.0),
            Self::Waist => Size::wrap(250.0, 80.0),
        }
    }
}

/// The scene editor: scene graph, undo/redo history, and the render surface,
/// owned together so no concurrent mutation path exists.
pub struct Editor<Surface: RenderSurface> {
    scene: Scene,
    history: History,
    surface: Surface,
    tool: Tool,
}

impl<Surface: RenderSurface> Editor<Surface> {
    /// Start a session with an empty scene. The initial state is committed up
    /// front so undo never underflows.
    pub fn new(mut surface: Surface) -> Result<Self, EditorError> {
        let scene = Scene::default();
        let initial = snapshot::encode(&scene)?;
        surface.render(&scene);
        Ok(Self {
            scene,
            history: History::new(initial),
            surface,
            tool: Tool::Select,
        })
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Encode + commit + redraw; the tail of every mutating operation.
    fn commit_and_render(&mut self) -> Result<(), EditorError> {
        let snapshot = snapshot::encode(&self.scene)?;
        self.history.commit(snapshot);
        self.surface.render(&self.scene);
        Ok(())
    }

    /// Add a plain rectangle with default placement.
    pub fn add_rect(&mut self, size: Size) -> Result<ObjectId, EditorError> {
        let mut rect = VisualObject::rect(size);
        rect.left = DEFAULT_PLACEMENT.x;
        rect.top = DEFAULT_PLACEMENT.y;
        let id = self.scene.add(rect);
        self.commit_and_render()?;
        Ok(id)
    }

    /// Replace the design with the base rectangle of a print area. One
    /// discrete action, one commit - the previous design stays one undo away.
    pub fn set_print_area(&mut self, area: PrintArea) -> Result<ObjectId, EditorError> {
        self.scene.clear();
        let mut base = VisualObject::rect(area.size());
        base.left = PRINT_AREA_PLACEMENT.x;
        base.top = PRINT_AREA_PLACEMENT.y;
        base.fill = Rgba::LIGHT_GRAY;
        base.selectable = false;
        let id = self.scene.add(base);
        self.commit_and_render()?;
        log::debug!("print area set to {}", area.as_ref());
        Ok(id)
    }

    /// Add a default textbox ("Your Text", 24px Arial, black).
    pub fn add_text(&mut self) -> Result<ObjectId, EditorError> {
        let mut text = VisualObject::textbox(
            DEFAULT_TEXT,
            FiniteF32::new(DEFAULT_FONT_SIZE)?,
            DEFAULT_FONT_FAMILY,
            DEFAULT_TEXT_BOUNDS,
        );
        text.left = DEFAULT_PLACEMENT.x;
        text.top = DEFAULT_PLACEMENT.y;
        let id = self.scene.add(text);
        self.commit_and_render()?;
        Ok(id)
    }

    /// Insert a decoded picture, scaled to [`IMAGE_TARGET_WIDTH`] preserving
    /// aspect. This is the completion step of an asynchronous decode: whenever
    /// the host finishes decoding, calling this applies insert + commit +
    /// redraw atomically. A decode that completes late still applies
    /// (last-write-wins; there is no cancellation).
    pub fn add_image(&mut self, image: DecodedImage) -> Result<ObjectId, EditorError> {
        let aspect = if image.width == 0 {
            1.0
        } else {
            image.height as f32 / image.width as f32
        };
        let size = Size::new(IMAGE_TARGET_WIDTH, IMAGE_TARGET_WIDTH * aspect)?;
        let mut obj = VisualObject::image(image.source, image.width, image.height, size);
        obj.left = DEFAULT_PLACEMENT.x;
        obj.top = DEFAULT_PLACEMENT.y;
        let id = self.scene.add(obj);
        self.commit_and_render()?;
        Ok(id)
    }

    /// Change the selection. Session state only: no commit, no snapshot. A
    /// stale reference is dropped with a warning rather than surfaced.
    pub fn select(&mut self, id: Option<ObjectId>) {
        if let Err(err) = self.scene.select(id) {
            log::warn!("selection dropped: {err}");
        }
    }

    /// Delete the selected object. No selection, no effect, no commit.
    pub fn delete_selected(&mut self) -> Result<(), EditorError> {
        let Some(id) = self.scene.selected_id() else {
            return Ok(());
        };
        self.scene.remove(id);
        self.commit_and_render()
    }

    /// Apply a patch to the selection, committing on success. A stale
    /// selection is recovered locally as a no-op.
    fn patch_selected(&mut self, patch: ObjectPatch) -> Result<(), EditorError> {
        let Some(id) = self.scene.selected_id() else {
            return Ok(());
        };
        match self.scene.patch(id, patch) {
            Ok(()) => self.commit_and_render(),
            Err(err) => {
                log::warn!("edit of selected object dropped: {err}");
                Ok(())
            }
        }
    }

    /// Align the selection against a viewport edge (with [`EDGE_MARGIN`]
    /// inset) or center it on an axis.
    pub fn align_selected(&mut self, edge: Edge) -> Result<(), EditorError> {
        let Some(obj) = self.scene.selected() else {
            return Ok(());
        };
        let size = obj.size();
        let viewport = self.surface.viewport();
        let mut patch = ObjectPatch::default();
        match edge {
            Edge::Left => patch.left = Some(FiniteF32::new(EDGE_MARGIN)?),
            Edge::Center => {
                patch.left = Some(FiniteF32::new((viewport.width() - size.width()) / 2.0)?);
            }
            Edge::Right => {
                patch.left = Some(FiniteF32::new(
                    viewport.width() - size.width() - EDGE_MARGIN,
                )?);
            }
            Edge::Top => patch.top = Some(FiniteF32::new(EDGE_MARGIN)?),
            Edge::Middle => {
                patch.top = Some(FiniteF32::new((viewport.height() - size.height()) / 2.0)?);
            }
            Edge::Bottom => {
                patch.top = Some(FiniteF32::new(
                    viewport.height() - size.height() - EDGE_MARGIN,
                )?);
            }
        }
        self.patch_selected(patch)
    }

    /// Resize the selection to an exact target. Aspect preservation is the
    /// caller's choice, not enforced here.
    pub fn resize_selected(&mut self, target: Size) -> Result<(), EditorError> {
        self.patch_selected(ObjectPatch {
            size: Some(target),
            ..ObjectPatch::default()
        })
    }

    /// Rotate the selection by a delta in degrees, wrapped modulo 360.
    pub fn rotate_selected(&mut self, delta_degrees: f32) -> Result<(), EditorError> {
        let Some(obj) = self.scene.selected() else {
            return Ok(());
        };
        let angle = obj.angle.turned(delta_degrees)?;
        self.patch_selected(ObjectPatch {
            angle: Some(angle),
            ..ObjectPatch::default()
        })
    }

    /// Flip between selection and freehand drawing. Tool mode is controller
    /// state, not design state - switching never commits.
    pub fn toggle_freehand(&mut self) -> Tool {
        self.tool = match self.tool {
            Tool::Select => Tool::Freehand,
            Tool::Freehand => Tool::Select,
        };
        log::debug!("tool is now {}", self.tool.as_ref());
        self.tool
    }

    /// Complete a freehand stroke: one committed path object per discrete
    /// stroke. Ignored outside freehand mode, and empty strokes leave no
    /// trace.
    pub fn finish_stroke(
        &mut self,
        points: impl IntoIterator<Item = Point>,
        brush: Stroke,
    ) -> Result<Option<ObjectId>, EditorError> {
        if self.tool != Tool::Freehand {
            log::warn!("stroke finished while not in freehand mode; ignored");
            return Ok(None);
        }
        let path = VisualObject::path(points, brush)?;
        if path.size() == Size::default() {
            // A click without movement draws nothing.
            return Ok(None);
        }
        let id = self.scene.add(path);
        self.commit_and_render()?;
        Ok(Some(id))
    }

    /// Remove every freehand path, leaving other objects. Commits only when
    /// something was actually erased.
    pub fn erase_freehand(&mut self) -> Result<usize, EditorError> {
        let removed = self.scene.remove_paths();
        if removed > 0 {
            self.commit_and_render()?;
        }
        Ok(removed)
    }

    /// Step back one committed state. Returns whether anything changed; at
    /// the boundary nothing does.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let Some(snapshot) = self.history.peek_undo() else {
            log::trace!("undo at history boundary");
            return Ok(false);
        };
        // Decode before stepping so a malformed snapshot leaves both the
        // scene and the history untouched.
        let scene = snapshot::decode(snapshot)?;
        let stepped = self.history.undo().is_some();
        debug_assert!(stepped);
        self.scene = scene;
        self.surface.render(&self.scene);
        Ok(true)
    }
    /// Step forward again. Mirror image of [`Self::undo`].
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let Some(snapshot) = self.history.peek_redo() else {
            log::trace!("redo at history boundary");
            return Ok(false);
        };
        let scene = snapshot::decode(snapshot)?;
        let stepped = self.history.redo().is_some();
        debug_assert!(stepped);
        self.scene = scene;
        self.surface.render(&self.scene);
        Ok(true)
    }

    /// Rasterize the current design. A pure read: no commit, no history.
    pub fn export_raster(&mut self) -> Result<RasterImage, EditorError> {
        Ok(self.surface.rasterize(&self.scene)?)
    }
    /// Export as a `data:image/png;base64,...` URL, the downloadable form.
    pub fn export_data_url(&mut self) -> Result<String, EditorError> {
        let raster = self.export_raster()?;
        Ok(export::to_data_url(&raster)?)
    }
}
