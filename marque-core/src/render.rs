//! Contracts between the editor and its rendering/decoding collaborators.
//!
//! The core never rasterizes anything itself - it hands the scene to a
//! [`RenderSurface`] after every mutation or restore and trusts it to draw
//! objects in stacking order. Image decoding is likewise external: hosts turn
//! raw bytes into a [`DecodedImage`] however (and whenever) they like, then
//! complete the insertion through the editor in one step.

use crate::{
    geom::Size,
    state::scene::ImageSource,
    state::Scene,
};

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("surface has no backing store for a {width}x{height} viewport")]
    BadViewport { width: u32, height: u32 },
    #[error("raster target exhausted: {0}")]
    Target(String),
}

/// Failure to turn raw bytes into a [`DecodedImage`]. Surfaced to the user as
/// the failure of that single operation; nothing else is touched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("image payload is malformed")]
    Malformed,
    #[error("unsupported image format")]
    Unsupported,
    #[error("decoded image has a zero dimension")]
    Empty,
}

/// A tightly packed RGBA8 raster, straight alpha, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}
impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RasterImage({}x{})", self.width, self.height)
    }
}

/// The result of decoding an uploaded picture: the encoded source (kept for
/// snapshots), its intrinsic dimensions, and the RGBA8 pixels.
#[derive(Clone)]
pub struct DecodedImage {
    pub source: ImageSource,
    pub width: u32,
    pub height: u32,
    pub pixels: std::sync::Arc<[u8]>,
}
impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DecodedImage({}x{})", self.width, self.height)
    }
}

/// Where the scene becomes visible.
///
/// `render` must be idempotent and side-effect-free with respect to the scene;
/// the editor calls it after every mutation and on every restore, and an extra
/// call must be harmless.
pub trait RenderSurface {
    /// Logical dimensions of the drawable area. Alignment is computed
    /// against this.
    fn viewport(&self) -> Size;
    /// Draw all objects in stacking order.
    fn render(&mut self, scene: &Scene);
    /// Produce a raster of the scene (a pure read of the scene).
    fn rasterize(&mut self, scene: &Scene) -> Result<RasterImage, RenderError>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn viewport(&self) -> Size {
        (**self).viewport()
    }
    fn render(&mut self, scene: &Scene) {
        (**self).render(scene);
    }
    fn rasterize(&mut self, scene: &Scene) -> Result<RasterImage, RenderError> {
        (**self).rasterize(scene)
    }
}

/// A surface that draws nowhere. Used headless and in tests; `rasterize`
/// yields a background-filled buffer.
pub struct NullSurface {
    viewport: Size,
    /// Render calls observed. Tests use this to assert redraw behavior.
    pub renders: usize,
}

impl NullSurface {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            renders: 0,
        }
    }
}

impl RenderSurface for NullSurface {
    fn viewport(&self) -> Size {
        self.viewport
    }
    fn render(&mut self, _scene: &Scene) {
        self.renders += 1;
    }
    fn rasterize(&mut self, scene: &Scene) -> Result<RasterImage, RenderError> {
        let width = self.viewport.width().round() as u32;
        let height = self.viewport.height().round() as u32;
        if width == 0 || height == 0 {
            return Err(RenderError::BadViewport { width, height });
        }
        let texel = scene.background().to_rgba8();
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            pixels.extend_from_slice(&texel);
        }
        Ok(RasterImage {
            width,
            height,
            pixels,
        })
    }
}
