//! Thread-safe unordered multiset
//!
//! Every collection in the model is a [`ConcurrentBag`]. Insert, take-one and
//! drain-all each hold the lock for a single acquisition, so two concurrent
//! takers can never both receive the same item and a drain always sees a
//! consistent snapshot.

use parking_lot::Mutex;

/// Mutex-guarded multiset with atomic take-one-if-present
#[derive(Debug)]
pub struct ConcurrentBag<T> {
    inner: Mutex<Vec<T>>,
}

impl<T> ConcurrentBag<T> {
    /// Create an empty bag
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    /// Create a bag holding `count` items produced by `creator`
    pub fn populated(count: usize, creator: impl FnMut() -> T) -> Self {
        Self {
            inner: Mutex::new(std::iter::repeat_with(creator).take(count).collect()),
        }
    }

    /// Add an item
    #[inline]
    pub fn insert(&self, item: T) {
        self.inner.lock().push(item);
    }

    /// Atomically remove one arbitrary item, if any
    #[inline]
    pub fn try_take(&self) -> Option<T> {
        self.inner.lock().pop()
    }

    /// Atomically remove every item currently held
    #[inline]
    pub fn drain_all(&self) -> Vec<T> {
        std::mem::take(&mut *self.inner.lock())
    }

    /// Number of items held
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the bag is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Whether any item satisfies `predicate`
    pub fn any(&self, predicate: impl FnMut(&T) -> bool) -> bool {
        self.inner.lock().iter().any(predicate)
    }
}

impl<T: Clone> ConcurrentBag<T> {
    /// Copy of the current contents
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().clone()
    }
}

impl<T> Default for ConcurrentBag<T> {
    fn default() -> Self {
        Self::new()
    }
}
