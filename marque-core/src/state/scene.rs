//! # Scene
//!
//! The ordered object graph composing the current design. The `Vec` order *is*
//! the stacking order, bottom-most first, so stacking indices are unique by
//! construction. The scene owns no history - callers snapshot it through
//! [`crate::snapshot`] after each edit.

use smallvec::SmallVec;

use crate::{
    color::Rgba,
    geom::{Degrees, Point, Size},
    util::{FiniteF32, NotFinite},
};

pub type ObjectId = crate::TypedId<VisualObject>;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    #[error("object is no longer part of the scene")]
    UnknownObject,
    #[error(transparent)]
    Geometry(#[from] NotFinite),
}

/// Outline paint. Doubles as the brush of freehand paths.
#[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct Stroke {
    pub color: Rgba,
    pub width: FiniteF32,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            width: FiniteF32::wrap(1.0),
        }
    }
}

/// Encoded image bytes (PNG, JPEG, ...), shared and immutable.
///
/// Kept verbatim inside the object so snapshots stay fully self-contained;
/// serializes as base64 text. Decoding back to pixels is the render side's
/// business, not the scene's.
#[derive(Clone)]
pub struct ImageSource(std::sync::Arc<[u8]>);

impl ImageSource {
    #[must_use]
    pub fn new(bytes: impl Into<std::sync::Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}
impl PartialEq for ImageSource {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for ImageSource {}
impl std::hash::Hash for ImageSource {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ImageSource({} bytes)", self.0.len())
    }
}
impl serde::Serialize for ImageSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use base64::Engine;
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(&self.0))
    }
}
impl<'de> serde::Deserialize<'de> for ImageSource {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use base64::Engine;
        let text = String::deserialize(deserializer)?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&text)
            .map_err(serde::de::Error::custom)?;
        Ok(Self(bytes.into()))
    }
}

/// Per-kind payload of a [`VisualObject`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ObjectKind {
    Rect {
        size: Size,
    },
    Textbox {
        text: String,
        font_size: FiniteF32,
        font_family: String,
        size: Size,
    },
    Image {
        source: ImageSource,
        /// Intrinsic pixel dimensions of the decoded source.
        natural_width: u32,
        natural_height: u32,
        /// Display size on the canvas, independent of the intrinsic one.
        size: Size,
    },
    /// A freehand polyline. Points are relative to the object's `left`/`top`;
    /// the paint comes from the object's `stroke`.
    Path {
        points: SmallVec<[Point; 8]>,
    },
}

/// One element of the design: geometry and style shared by every kind, plus
/// the kind-specific payload.
///
/// Identity (`id`) is session-transient and excluded from both serialization
/// and equality - two objects are equal when their attributes are.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct VisualObject {
    #[serde(skip)]
    id: ObjectId,
    pub kind: ObjectKind,
    pub left: FiniteF32,
    pub top: FiniteF32,
    pub angle: Degrees,
    pub fill: Rgba,
    pub stroke: Option<Stroke>,
    pub selectable: bool,
}

impl PartialEq for VisualObject {
    fn eq(&self, other: &Self) -> bool {
        // Attribute equality - identity deliberately excluded.
        self.kind == other.kind
            && self.left == other.left
            && self.top == other.top
            && self.angle == other.angle
            && self.fill == other.fill
            && self.stroke == other.stroke
            && self.selectable == other.selectable
    }
}

impl VisualObject {
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[must_use]
    pub fn rect(size: Size) -> Self {
        Self {
            id: ObjectId::default(),
            kind: ObjectKind::Rect { size },
            left: FiniteF32::ZERO,
            top: FiniteF32::ZERO,
            angle: Degrees::ZERO,
            fill: Rgba::LIGHT_GRAY,
            stroke: None,
            selectable: true,
        }
    }
    #[must_use]
    pub fn textbox(
        text: impl Into<String>,
        font_size: FiniteF32,
        font_family: impl Into<String>,
        size: Size,
    ) -> Self {
        Self {
            id: ObjectId::default(),
            kind: ObjectKind::Textbox {
                text: text.into(),
                font_size,
                font_family: font_family.into(),
                size,
            },
            left: FiniteF32::ZERO,
            top: FiniteF32::ZERO,
            angle: Degrees::ZERO,
            fill: Rgba::BLACK,
            stroke: None,
            selectable: true,
        }
    }
    #[must_use]
    pub fn image(source: ImageSource, natural_width: u32, natural_height: u32, size: Size) -> Self {
        Self {
            id: ObjectId::default(),
            kind: ObjectKind::Image {
                source,
                natural_width,
                natural_height,
                size,
            },
            left: FiniteF32::ZERO,
            top: FiniteF32::ZERO,
            angle: Degrees::ZERO,
            fill: Rgba::TRANSPARENT,
            stroke: None,
            selectable: true,
        }
    }
    /// Build a freehand path from absolute canvas points. The object's origin
    /// becomes the top-left of the point extent, points are stored relative.
    pub fn path(
        points: impl IntoIterator<Item = Point>,
        brush: Stroke,
    ) -> Result<Self, NotFinite> {
        let absolute: SmallVec<[Point; 8]> = points.into_iter().collect();
        let min_x = absolute
            .iter()
            .map(|point| point.x)
            .min()
            .unwrap_or(FiniteF32::ZERO);
        let min_y = absolute
            .iter()
            .map(|point| point.y)
            .min()
            .unwrap_or(FiniteF32::ZERO);
        let points = absolute
            .iter()
            .map(|point| Point::new(point.x.get() - min_x.get(), point.y.get() - min_y.get()))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            id: ObjectId::default(),
            kind: ObjectKind::Path { points },
            left: min_x,
            top: min_y,
            angle: Degrees::ZERO,
            fill: Rgba::TRANSPARENT,
            stroke: Some(brush),
            selectable: true,
        })
    }

    /// Effective display size. For paths this is the extent of the points.
    #[must_use]
    pub fn size(&self) -> Size {
        match &self.kind {
            ObjectKind::Rect { size }
            | ObjectKind::Textbox { size, .. }
            | ObjectKind::Image { size, .. } => *size,
            ObjectKind::Path { points } => {
                let max_x = points.iter().map(|p| p.x.get()).fold(0.0f32, f32::max);
                let max_y = points.iter().map(|p| p.y.get()).fold(0.0f32, f32::max);
                // Points are normalized to a 0,0 origin, so the maxima are the extent.
                Size::new(max_x, max_y).unwrap_or_default()
            }
        }
    }
    /// Set the display size. Paths are scaled point-wise to fit the target
    /// extent; axes with zero extent keep their coordinates.
    pub fn set_size(&mut self, target: Size) -> Result<(), NotFinite> {
        match &mut self.kind {
            ObjectKind::Rect { size }
            | ObjectKind::Textbox { size, .. }
            | ObjectKind::Image { size, .. } => {
                *size = target;
                Ok(())
            }
            ObjectKind::Path { points } => {
                let current = {
                    let max_x = points.iter().map(|p| p.x.get()).fold(0.0f32, f32::max);
                    let max_y = points.iter().map(|p| p.y.get()).fold(0.0f32, f32::max);
                    (max_x, max_y)
                };
                let scale_x = if current.0 > 0.0 {
                    target.width() / current.0
                } else {
                    1.0
                };
                let scale_y = if current.1 > 0.0 {
                    target.height() / current.1
                } else {
                    1.0
                };
                for point in points.iter_mut() {
                    *point = Point::new(point.x.get() * scale_x, point.y.get() * scale_y)?;
                }
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn is_path(&self) -> bool {
        matches!(self.kind, ObjectKind::Path { .. })
    }
}

/// A partial update applied through [`Scene::patch`]. `None` fields are left
/// untouched. `stroke` is doubly optional: `Some(None)` clears the outline.
#[derive(Clone, Debug, Default)]
pub struct ObjectPatch {
    pub left: Option<FiniteF32>,
    pub top: Option<FiniteF32>,
    pub size: Option<Size>,
    pub angle: Option<Degrees>,
    pub fill: Option<Rgba>,
    pub stroke: Option<Option<Stroke>>,
    pub selectable: Option<bool>,
}

/// The ordered, mutable collection of visual objects plus background style
/// and the (session-only) selection.
///
/// The selection is a weak back-reference: lookup only, cleared whenever the
/// referenced object leaves the scene, never serialized.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    background: Rgba,
    objects: Vec<VisualObject>,
    #[serde(skip)]
    selection: Option<ObjectId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            objects: Vec::new(),
            selection: None,
        }
    }
}

impl PartialEq for Scene {
    fn eq(&self, other: &Self) -> bool {
        // Selection is session state, not design state.
        self.background == other.background && self.objects == other.objects
    }
}

impl Scene {
    /// Append an object on top of the stack, returning its ID.
    pub fn add(&mut self, obj: VisualObject) -> ObjectId {
        let id = obj.id();
        self.objects.push(obj);
        id
    }
    /// Remove by identity. A missing object is a silent no-op; a removed
    /// selection is cleared. Returns whether anything was removed.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let before = self.objects.len();
        self.objects.retain(|obj| obj.id() != id);
        let removed = self.objects.len() != before;
        if removed && self.selection == Some(id) {
            self.selection = None;
        }
        removed
    }
    /// Remove every freehand path, leaving other kinds. Returns the count.
    pub fn remove_paths(&mut self) -> usize {
        let before = self.objects.len();
        self.objects.retain(|obj| !obj.is_path());
        if let Some(selected) = self.selection {
            if self.get(selected).is_none() {
                self.selection = None;
            }
        }
        before - self.objects.len()
    }
    /// Select an object (or clear with `None`). Unlike removal, selecting a
    /// missing object is an error - the caller handed us a stale reference.
    pub fn select(&mut self, id: Option<ObjectId>) -> Result<(), SceneError> {
        if let Some(id) = id {
            if self.get(id).is_none() {
                return Err(SceneError::UnknownObject);
            }
        }
        self.selection = id;
        Ok(())
    }
    /// Apply a partial update to the referenced object.
    pub fn patch(&mut self, id: ObjectId, patch: ObjectPatch) -> Result<(), SceneError> {
        let obj = self
            .objects
            .iter_mut()
            .find(|obj| obj.id() == id)
            .ok_or(SceneError::UnknownObject)?;
        // Resize is the one fallible edit; apply it first so a failed patch
        // changes nothing at all.
        if let Some(size) = patch.size {
            obj.set_size(size)?;
        }
        if let Some(left) = patch.left {
            obj.left = left;
        }
        if let Some(top) = patch.top {
            obj.top = top;
        }
        if let Some(angle) = patch.angle {
            obj.angle = angle;
        }
        if let Some(fill) = patch.fill {
            obj.fill = fill;
        }
        if let Some(stroke) = patch.stroke {
            obj.stroke = stroke;
        }
        if let Some(selectable) = patch.selectable {
            obj.selectable = selectable;
        }
        Ok(())
    }
    /// Remove all objects and clear the selection.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.selection = None;
    }

    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&VisualObject> {
        self.objects.iter().find(|obj| obj.id() == id)
    }
    /// Position of the object in the stacking order, bottom-most is 0.
    #[must_use]
    pub fn stacking_index(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|obj| obj.id() == id)
    }
    pub fn iter(&self) -> impl Iterator<Item = &VisualObject> + '_ {
        self.objects.iter()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
    #[must_use]
    pub fn selected_id(&self) -> Option<ObjectId> {
        self.selection
    }
    #[must_use]
    pub fn selected(&self) -> Option<&VisualObject> {
        self.get(self.selection?)
    }
    #[must_use]
    pub fn background(&self) -> Rgba {
        self.background
    }
    pub fn set_background(&mut self, background: Rgba) {
        self.background = background;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn rect(width: f32, height: f32) -> VisualObject {
        VisualObject::rect(Size::new(width, height).unwrap())
    }

    #[test]
    fn stacking_order_is_insertion_order() {
        let mut scene = Scene::default();
        let a = scene.add(rect(10.0, 10.0));
        let b = scene.add(rect(20.0, 20.0));
        let c = scene.add(rect(30.0, 30.0));
        assert_eq!(scene.stacking_index(a), Some(0));
        assert_eq!(scene.stacking_index(b), Some(1));
        assert_eq!(scene.stacking_index(c), Some(2));

        scene.remove(b);
        // Total order over the remaining objects, no gaps.
        assert_eq!(scene.stacking_index(a), Some(0));
        assert_eq!(scene.stacking_index(c), Some(1));
    }
    #[test]
    fn removing_selected_clears_selection() {
        let mut scene = Scene::default();
        let id = scene.add(rect(10.0, 10.0));
        scene.select(Some(id)).unwrap();
        assert!(scene.selected().is_some());
        scene.remove(id);
        assert_eq!(scene.selected_id(), None);
    }
    #[test]
    fn remove_absent_is_noop() {
        let mut scene = Scene::default();
        let id = scene.add(rect(10.0, 10.0));
        scene.remove(id);
        assert!(!scene.remove(id));
        assert!(scene.is_empty());
    }
    #[test]
    fn select_stale_reference_errors() {
        let mut scene = Scene::default();
        let id = scene.add(rect(10.0, 10.0));
        scene.remove(id);
        assert_eq!(scene.select(Some(id)), Err(SceneError::UnknownObject));
        // Clearing is always fine.
        assert_eq!(scene.select(None), Ok(()));
    }
    #[test]
    fn patch_stale_reference_errors() {
        let mut scene = Scene::default();
        let id = scene.add(rect(10.0, 10.0));
        scene.remove(id);
        assert_eq!(
            scene.patch(id, ObjectPatch::default()),
            Err(SceneError::UnknownObject)
        );
    }
    #[test]
    fn path_normalizes_origin() {
        let brush = Stroke::default();
        let path = VisualObject::path(
            [Point::wrap(40.0, 60.0), Point::wrap(90.0, 160.0)],
            brush,
        )
        .unwrap();
        assert_eq!(path.left.get(), 40.0);
        assert_eq!(path.top.get(), 60.0);
        let size = path.size();
        assert_eq!((size.width(), size.height()), (50.0, 100.0));
    }
    #[test]
    fn path_resizes_pointwise() {
        let mut path = VisualObject::path(
            [Point::wrap(0.0, 0.0), Point::wrap(100.0, 50.0)],
            Stroke::default(),
        )
        .unwrap();
        path.set_size(Size::new(50.0, 100.0).unwrap()).unwrap();
        let size = path.size();
        assert_eq!((size.width(), size.height()), (50.0, 100.0));
    }
    #[test]
    fn remove_paths_leaves_other_kinds() {
        let mut scene = Scene::default();
        scene.add(rect(10.0, 10.0));
        scene
            .add(VisualObject::path([Point::wrap(0.0, 0.0)], Stroke::default()).unwrap());
        scene
            .add(VisualObject::path([Point::wrap(5.0, 5.0)], Stroke::default()).unwrap());
        assert_eq!(scene.remove_paths(), 2);
        assert_eq!(scene.len(), 1);
        assert!(!scene.iter().next().unwrap().is_path());
    }
}
