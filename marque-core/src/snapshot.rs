//! # Snapshots
//!
//! Stateless codec between a [`Scene`] and its immutable serialized capture.
//! The wire form is JSON, but it is an implementation detail: callers treat a
//! [`Snapshot`] as an opaque token whose only contract is the round-trip law -
//! `decode(encode(scene))` is attribute-equal to `scene`.
//!
//! Selection and object identity are session state and deliberately absent;
//! a decoded scene has fresh IDs and nothing selected.

use crate::state::Scene;

/// An immutable serialized capture of a scene at one instant.
///
/// Cheap to clone; once committed it is owned by the history stack and never
/// mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot(std::sync::Arc<str>);

impl Snapshot {
    /// The raw payload. Only useful for persistence or diagnostics - the
    /// format is not a public contract.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Snapshot({} bytes)", self.0.len())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("malformed snapshot payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Capture the scene. Deterministic: encoding the same logical state twice
/// yields snapshots that decode to indistinguishable scenes.
pub fn encode(scene: &Scene) -> Result<Snapshot, SnapshotError> {
    let payload = serde_json::to_string(scene)?;
    Ok(Snapshot(payload.into()))
}

/// Reconstruct a scene, attribute-for-attribute equal to the encoded one.
/// Leaves nothing mutated on failure.
pub fn decode(snapshot: &Snapshot) -> Result<Scene, SnapshotError> {
    Ok(serde_json::from_str(snapshot.as_str())?)
}

#[cfg(test)]
mod test {
    use super::{decode, encode, Snapshot};
    use crate::{
        color::Rgba,
        geom::{Degrees, Point, Size},
        state::scene::{ImageSource, Stroke, VisualObject},
        state::Scene,
        util::FiniteF32,
    };

    fn populated_scene() -> Scene {
        let mut scene = Scene::default();
        scene.set_background(Rgba::LIGHT_GRAY);

        let mut rect = VisualObject::rect(Size::wrap(200.0, 250.0));
        rect.left = FiniteF32::wrap(100.0);
        rect.top = FiniteF32::wrap(50.0);
        rect.angle = Degrees::new(45.0).unwrap();
        rect.selectable = false;
        scene.add(rect);

        let mut text = VisualObject::textbox(
            "Your Text",
            FiniteF32::wrap(24.0),
            "Arial",
            Size::wrap(150.0, 30.0),
        );
        text.stroke = Some(Stroke::default());
        scene.add(text);

        scene.add(VisualObject::image(
            ImageSource::new(&b"\x89PNG\r\n\x1a\nnot really"[..]),
            640,
            480,
            Size::wrap(150.0, 112.5),
        ));
        scene.add(
            VisualObject::path(
                [Point::wrap(10.0, 10.0), Point::wrap(30.0, 25.0)],
                Stroke::default(),
            )
            .unwrap(),
        );
        scene
    }

    #[test]
    fn round_trip() {
        let scene = populated_scene();
        let decoded = decode(&encode(&scene).unwrap()).unwrap();
        // Attribute equality; identity and selection never round-trip.
        assert_eq!(decoded, scene);
    }
    #[test]
    fn selection_is_not_captured() {
        let mut scene = populated_scene();
        let id = scene.iter().next().map(VisualObject::id).unwrap();
        // Selectability is irrelevant to programmatic selection.
        scene.select(Some(id)).unwrap();

        let decoded = decode(&encode(&scene).unwrap()).unwrap();
        assert_eq!(decoded.selected_id(), None);
        assert_eq!(decoded, scene);
    }
    #[test]
    fn deterministic() {
        let scene = populated_scene();
        let a = encode(&scene).unwrap();
        let b = encode(&scene).unwrap();
        assert_eq!(a, b);
        assert_eq!(decode(&a).unwrap(), decode(&b).unwrap());
    }
    #[test]
    fn decoded_ids_are_fresh() {
        let scene = populated_scene();
        let snapshot = encode(&scene).unwrap();
        let first = decode(&snapshot).unwrap();
        let second = decode(&snapshot).unwrap();
        for (a, b) in first.iter().zip(second.iter()) {
            assert_ne!(a.id(), b.id());
        }
    }
    #[test]
    fn malformed_payload_errors() {
        let bad = Snapshot("{\"background\":\"no\"}".into());
        assert!(super::decode(&bad).is_err());
        let garbage = Snapshot("not json at all".into());
        assert!(super::decode(&garbage).is_err());
    }
}
