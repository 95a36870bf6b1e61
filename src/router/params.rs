use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of path parameters before heap allocation.
/// Most routes carry ≤4 wildcards (e.g. `/users/:id/posts/:post_id`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the lookup hot path.
///
/// Keys are `Arc<str>` cloned from the tree (known at startup), values are
/// per-request data taken from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Path parameters captured during a lookup, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: ParamVec,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocate room for `capacity` parameters.
    ///
    /// The router sizes this from the largest wildcard count it has seen, so a
    /// lookup never reallocates.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Get a parameter by name
    ///
    /// Uses "last write wins" semantics when a name repeats at different
    /// depths (e.g. `/org/:id/user/:id` returns the user id).
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    pub(crate) fn push(&mut self, key: Arc<str>, value: String) {
        self.inner.push((key, value));
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.inner.truncate(len);
    }

    #[must_use]
    pub fn into_inner(self) -> ParamVec {
        self.inner
    }
}
