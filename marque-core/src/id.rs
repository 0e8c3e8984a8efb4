//! # IDs
//!
//! Scene objects are referred to by `TypedId<T>`, a process-unique ID namespaced
//! by the type `T`. IDs are session-transient: they are never serialized, and a
//! scene restored from a snapshot gets fresh ones.
//!
//! To acquire an ID, use the `Default` impl.

use std::sync::atomic::{AtomicU64, Ordering};

// One shared counter for every namespace. IDs of different types may therefore
// never collide numerically either, which costs nothing and eases debugging.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// ID guaranteed unique within this execution of the program.
pub struct TypedId<T> {
    id: std::num::NonZeroU64,
    // fn() -> T keeps the namespace marker Send + Sync + Copy regardless of T.
    _namespace: std::marker::PhantomData<fn() -> T>,
}

impl<T> TypedId<T> {
    /// The raw numeric value of this ID.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.id.get()
    }
}

impl<T> Default for TypedId<T> {
    fn default() -> Self {
        let raw = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let Some(id) = std::num::NonZeroU64::new(raw) else {
            // Only reachable after u64::MAX allocations - the counter wrapped and
            // uniqueness can no longer be upheld. Nothing sensible to recover.
            log::error!("ID counter wrapped! Aborting!");
            std::process::abort();
        };
        Self {
            id,
            _namespace: std::marker::PhantomData,
        }
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for TypedId<T> {}
impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        // Namespaces already match at compile time.
        self.id == other.id
    }
}
impl<T> Eq for TypedId<T> {}
impl<T> std::hash::Hash for TypedId<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> std::fmt::Display for TypedId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // rsplit always yields at least one element, even for an empty string.
        write!(
            f,
            "{}#{}",
            std::any::type_name::<T>().rsplit("::").next().unwrap(),
            self.id
        )
    }
}
impl<T> std::fmt::Debug for TypedId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as std::fmt::Display>::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::TypedId;

    #[test]
    fn unique() {
        struct Namespace;
        type TestId = TypedId<Namespace>;

        let mut ids: Vec<_> = (0..1024).map(|_| TestId::default()).collect();
        ids.sort_unstable_by_key(|id| id.raw());
        let before = ids.len();
        ids.dedup();
        assert_eq!(before, ids.len(), "had duplicate ids");
    }
    #[test]
    fn distinct_namespaces_compile() {
        struct A;
        struct B;
        let a = TypedId::<A>::default();
        let b = TypedId::<B>::default();
        // Cross-namespace comparison shouldn't even be possible; raw values
        // are all we can compare.
        assert_ne!(a.raw(), b.raw());
    }
}
