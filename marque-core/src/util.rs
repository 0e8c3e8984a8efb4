//! Utility types, used throughout the crate.

/// A float which is finite (not NaN, not infinite).
///
/// Every geometric and color channel in the scene is stored as one of these,
/// which makes scene state `Eq`-comparable and keeps snapshots deterministic.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f32", into = "f32")]
#[repr(transparent)]
pub struct FiniteF32(f32);

impl FiniteF32 {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    pub fn new(val: f32) -> Result<Self, NotFinite> {
        if val.is_finite() {
            Ok(Self(val))
        } else {
            Err(NotFinite)
        }
    }
    /// Wrap a compile-time constant, panicking at construction if it isn't finite.
    /// For literals only - use [`Self::new`] for runtime values.
    #[must_use]
    pub const fn wrap(val: f32) -> Self {
        assert!(val.is_finite());
        Self(val)
    }
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for FiniteF32 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f32> for FiniteF32 {
    type Error = NotFinite;
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
impl From<FiniteF32> for f32 {
    fn from(value: FiniteF32) -> Self {
        value.get()
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("not finite")]
pub struct NotFinite;

// The finiteness invariant rules out NaN, so PartialEq may act as Eq.
impl Eq for FiniteF32 {}
#[allow(clippy::derive_ord_xor_partial_ord)]
impl Ord for FiniteF32 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Never None - no NaN means every pair of values is comparable.
        self.partial_cmp(other)
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}
impl std::hash::Hash for FiniteF32 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u32(self.0.to_bits());
    }
}

impl std::fmt::Display for FiniteF32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod test {
    use super::FiniteF32;

    #[test]
    fn rejects_non_finite() {
        assert!(FiniteF32::new(f32::NAN).is_err());
        assert!(FiniteF32::new(f32::INFINITY).is_err());
        assert!(FiniteF32::new(f32::NEG_INFINITY).is_err());
        assert!(FiniteF32::new(125.0).is_ok());
    }
    #[test]
    fn total_order() {
        let mut values = [
            FiniteF32::new(3.0).unwrap(),
            FiniteF32::new(-1.5).unwrap(),
            FiniteF32::ZERO,
        ];
        values.sort();
        assert_eq!(values.map(FiniteF32::get), [-1.5, 0.0, 3.0]);
    }
    #[test]
    fn serde_rejects_nan() {
        assert!(serde_json::from_str::<FiniteF32>("1.25").is_ok());
        // JSON has no NaN literal, but a malicious payload could still try.
        assert!(serde_json::from_str::<FiniteF32>("null").is_err());
    }
}
