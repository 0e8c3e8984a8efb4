//! Geometry primitives for scene objects.
//!
//! Coordinates are logical pixels. `0,0` is the top-left of the design area,
//! +X right, +Y down. Angles are degrees clockwise, normalized to `[0, 360)`.

use crate::util::{FiniteF32, NotFinite};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeomError {
    #[error(transparent)]
    NotFinite(#[from] NotFinite),
    #[error("size dimensions must be non-negative")]
    NegativeSize,
}

#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Default, serde::Serialize, serde::Deserialize,
)]
pub struct Point {
    pub x: FiniteF32,
    pub y: FiniteF32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Result<Self, NotFinite> {
        Ok(Self {
            x: FiniteF32::new(x)?,
            y: FiniteF32::new(y)?,
        })
    }
    /// Wrap compile-time constants; panics at construction on non-finite input.
    #[must_use]
    pub const fn wrap(x: f32, y: f32) -> Self {
        Self {
            x: FiniteF32::wrap(x),
            y: FiniteF32::wrap(y),
        }
    }
}

/// A non-negative, finite width/height pair.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "[f32; 2]", into = "[f32; 2]")]
pub struct Size {
    width: FiniteF32,
    height: FiniteF32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Result<Self, GeomError> {
        if width < 0.0 || height < 0.0 {
            return Err(GeomError::NegativeSize);
        }
        Ok(Self {
            width: FiniteF32::new(width)?,
            height: FiniteF32::new(height)?,
        })
    }
    /// Wrap compile-time constants; panics at construction when malformed.
    #[must_use]
    pub const fn wrap(width: f32, height: f32) -> Self {
        assert!(width >= 0.0 && height >= 0.0);
        Self {
            width: FiniteF32::wrap(width),
            height: FiniteF32::wrap(height),
        }
    }
    #[must_use]
    pub fn width(&self) -> f32 {
        self.width.get()
    }
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height.get()
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::wrap(0.0, 0.0)
    }
}

impl TryFrom<[f32; 2]> for Size {
    type Error = GeomError;
    fn try_from([width, height]: [f32; 2]) -> Result<Self, Self::Error> {
        Self::new(width, height)
    }
}
impl From<Size> for [f32; 2] {
    fn from(value: Size) -> Self {
        [value.width(), value.height()]
    }
}

/// An angle in degrees, normalized to `[0, 360)`.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "f32", into = "f32")]
pub struct Degrees(FiniteF32);

impl Degrees {
    pub const ZERO: Self = Self(FiniteF32::ZERO);

    /// Accepts any finite angle and wraps it into `[0, 360)`.
    pub fn new(degrees: f32) -> Result<Self, NotFinite> {
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid may round up to exactly 360.0 for tiny negative inputs.
        let wrapped = if wrapped >= 360.0 { 0.0 } else { wrapped };
        Ok(Self(FiniteF32::new(wrapped)?))
    }
    #[must_use]
    pub fn get(self) -> f32 {
        self.0.get()
    }
    /// The angle after turning a further `delta` degrees (negative turns
    /// counter-clockwise), wrapped modulo 360.
    pub fn turned(self, delta: f32) -> Result<Self, NotFinite> {
        Self::new(self.get() + delta)
    }
}

impl TryFrom<f32> for Degrees {
    type Error = NotFinite;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<Degrees> for f32 {
    fn from(value: Degrees) -> Self {
        value.get()
    }
}
