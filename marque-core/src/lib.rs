pub mod color;
pub mod editor;
pub mod export;
pub mod geom;
pub mod history;
pub mod id;
pub mod render;
pub mod snapshot;
pub mod state;
pub mod util;

pub use id::TypedId;
