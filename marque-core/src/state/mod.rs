//! # State
//!
//! The mutable design state: the scene graph of visual objects. History and
//! rendering live elsewhere - these types only know how to be edited.

pub mod scene;

pub use scene::{ObjectId, Scene, SceneError, VisualObject};
