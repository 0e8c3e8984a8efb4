//! Straight (non-premultiplied) sRGB color, channels in `[0, 1]`.
//!
//! The scene never blends colors itself, so a simple channel array is enough;
//! rendering backends convert to whatever representation they need.

use crate::util::{FiniteF32, NotFinite};

#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "[f32; 4]", into = "[f32; 4]")]
pub struct Rgba([FiniteF32; 4]);

impl Rgba {
    pub const TRANSPARENT: Self = Self::wrap([0.0, 0.0, 0.0, 0.0]);
    pub const BLACK: Self = Self::wrap([0.0, 0.0, 0.0, 1.0]);
    pub const WHITE: Self = Self::wrap([1.0, 1.0, 1.0, 1.0]);
    /// CSS `lightgray`, the base fill of print-area rectangles.
    pub const LIGHT_GRAY: Self = Self::wrap([0.827, 0.827, 0.827, 1.0]);

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Result<Self, NotFinite> {
        Ok(Self([
            FiniteF32::new(r)?,
            FiniteF32::new(g)?,
            FiniteF32::new(b)?,
            FiniteF32::new(a)?,
        ]))
    }
    /// Wrap compile-time constant channels. Panics at construction on non-finite input.
    #[must_use]
    pub const fn wrap([r, g, b, a]: [f32; 4]) -> Self {
        Self([
            FiniteF32::wrap(r),
            FiniteF32::wrap(g),
            FiniteF32::wrap(b),
            FiniteF32::wrap(a),
        ])
    }
    #[must_use]
    pub fn as_array(&self) -> [f32; 4] {
        self.0.map(FiniteF32::get)
    }
    /// Quantize to 8-bit channels, clamping out-of-range values.
    #[must_use]
    pub fn to_rgba8(&self) -> [u8; 4] {
        self.as_array()
            .map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl TryFrom<[f32; 4]> for Rgba {
    type Error = NotFinite;
    fn try_from([r, g, b, a]: [f32; 4]) -> Result<Self, Self::Error> {
        Self::new(r, g, b, a)
    }
}
impl From<Rgba> for [f32; 4] {
    fn from(value: Rgba) -> Self {
        value.as_array()
    }
}

#[cfg(test)]
mod test {
    use super::Rgba;

    #[test]
    fn quantizes_clamped() {
        let hot = Rgba::new(2.0, -1.0, 0.5, 1.0).unwrap();
        assert_eq!(hot.to_rgba8(), [255, 0, 128, 255]);
    }
    #[test]
    fn rejects_nan_channel() {
        assert!(Rgba::new(0.0, f32::NAN, 0.0, 1.0).is_err());
    }
}
