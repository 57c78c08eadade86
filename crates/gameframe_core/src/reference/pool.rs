//! # Reference Pool
//!
//! Per-type recycling of short-lived objects with live accounting.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::any::AsAny;
use crate::error::{FrameworkError, FrameworkResult};

use super::collection::ReferenceCollection;
use super::{Reference, ReferencePoolInfo};

type SharedCollection = Arc<Mutex<ReferenceCollection>>;

/// A recycling pool for [`Reference`] objects, keyed by concrete type.
///
/// Each concrete type gets its own collection, guarded by its own mutex, so
/// work on one type never contends with another. A statistics snapshot takes
/// the same mutex and always observes a consistent set of counters.
///
/// # Ownership
///
/// An instance is owned by exactly one holder: the pool (unused), the caller
/// (acquired) or an event queue (in flight). `release` takes the box by value,
/// and in strict mode rejects any box the pool did not hand out.
///
/// # Example
///
/// ```rust
/// use gameframe_core::{Reference, ReferencePool};
///
/// #[derive(Default)]
/// struct Hit { damage: u32 }
///
/// impl Reference for Hit {
///     fn clear(&mut self) { self.damage = 0; }
/// }
///
/// let pool = ReferencePool::new(true);
/// pool.add::<Hit>(3);
///
/// let mut hit = pool.acquire::<Hit>();
/// hit.damage = 12;
/// pool.release(hit).unwrap();
///
/// assert_eq!(pool.info::<Hit>().unused_count(), 3);
/// ```
pub struct ReferencePool {
    /// Collections by concrete type.
    collections: RwLock<HashMap<TypeId, SharedCollection>>,
    /// Whether release verifies the exact instance is live.
    strict_check: bool,
}

impl ReferencePool {
    /// Creates an empty pool.
    ///
    /// # Arguments
    ///
    /// * `strict_check` - Track live instances by identity, not only by count
    #[must_use]
    pub fn new(strict_check: bool) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            strict_check,
        }
    }

    /// Returns whether strict release checking is enabled.
    #[inline]
    #[must_use]
    pub const fn strict_check(&self) -> bool {
        self.strict_check
    }

    /// Returns the number of per-type collections.
    #[must_use]
    pub fn count(&self) -> usize {
        self.collections.read().len()
    }

    /// Takes an unused instance of `T`, constructing one if none is available.
    ///
    /// The instance was cleared when it was released, so it starts empty.
    #[must_use]
    pub fn acquire<T: Reference + Default>(&self) -> Box<T> {
        self.collection::<T>().lock().acquire::<T>()
    }

    /// Clears an instance and returns it to its type's unused stack.
    ///
    /// # Errors
    ///
    /// Returns [`FrameworkError::InvalidState`](crate::FrameworkError::InvalidState)
    /// if the instance is not tracked as live. Counters are left unchanged,
    /// and a type the pool has never handed out gets no collection.
    pub fn release<T: Reference>(&self, reference: Box<T>) -> FrameworkResult<()> {
        self.release_boxed(reference)
    }

    /// Releases an instance whose concrete type is only known at runtime.
    ///
    /// Routes the box to the collection of its concrete type, which lets a
    /// `Box<dyn EventArgs>` go back to the right place.
    ///
    /// # Errors
    ///
    /// Same as [`release`](Self::release).
    pub fn release_boxed<R: ?Sized + Reference>(&self, reference: Box<R>) -> FrameworkResult<()> {
        let type_id = AsAny::as_any(&*reference).type_id();
        let Some(collection) = self.existing(type_id) else {
            let type_name = AsAny::type_name(&*reference);
            tracing::warn!(type_name, "release of a type this pool never handed out");
            return Err(FrameworkError::InvalidState(format!(
                "'{type_name}' has no live instance to release"
            )));
        };
        let result = collection.lock().release(reference);
        result
    }

    /// Pre-warms the pool with `count` new instances of `T`.
    pub fn add<T: Reference + Default>(&self, count: usize) {
        self.collection::<T>().lock().add::<T>(count);
        tracing::debug!(type_name = std::any::type_name::<T>(), count, "pre-warmed reference pool");
    }

    /// Destroys `count` unused instances of `T`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameworkError::InvalidState`](crate::FrameworkError::InvalidState)
    /// if fewer than `count` instances are unused.
    pub fn remove<T: Reference>(&self, count: usize) -> FrameworkResult<()> {
        match self.existing(TypeId::of::<T>()) {
            Some(collection) => {
                collection.lock().remove(count)?;
            }
            None if count == 0 => return Ok(()),
            None => {
                return Err(FrameworkError::InvalidState(format!(
                    "cannot remove {count} instances of '{}', only 0 unused",
                    std::any::type_name::<T>()
                )))
            }
        }
        tracing::debug!(type_name = std::any::type_name::<T>(), count, "evicted unused references");
        Ok(())
    }

    /// Destroys every unused instance of `T`.
    pub fn remove_all<T: Reference>(&self) {
        if let Some(collection) = self.existing(TypeId::of::<T>()) {
            collection.lock().remove_all();
        }
    }

    /// Destroys every unused instance of every type.
    ///
    /// Live counts are untouched; callers release everything first.
    pub fn clear_all(&self) {
        for collection in self.collections.read().values() {
            collection.lock().remove_all();
        }
        tracing::debug!("cleared all reference collections");
    }

    /// Returns a statistics snapshot for `T`.
    ///
    /// A type the pool has never seen reports all zeroes.
    #[must_use]
    pub fn info<T: Reference>(&self) -> ReferencePoolInfo {
        self.existing(TypeId::of::<T>()).map_or_else(
            || ReferencePoolInfo::empty(std::any::type_name::<T>()),
            |collection| collection.lock().info(),
        )
    }

    /// Returns a snapshot of every collection, sorted by type name.
    #[must_use]
    pub fn all_infos(&self) -> Vec<ReferencePoolInfo> {
        let mut infos: Vec<ReferencePoolInfo> = self
            .collections
            .read()
            .values()
            .map(|collection| collection.lock().info())
            .collect();
        infos.sort_by(|a, b| a.type_name().cmp(b.type_name()));
        infos
    }

    fn collection<T: Reference>(&self) -> SharedCollection {
        self.collection_by_id(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    fn existing(&self, type_id: TypeId) -> Option<SharedCollection> {
        self.collections.read().get(&type_id).map(Arc::clone)
    }

    fn collection_by_id(&self, type_id: TypeId, type_name: &'static str) -> SharedCollection {
        if let Some(collection) = self.existing(type_id) {
            return collection;
        }

        let mut collections = self.collections.write();
        Arc::clone(collections.entry(type_id).or_insert_with(|| {
            Arc::new(Mutex::new(ReferenceCollection::new(type_name, self.strict_check)))
        }))
    }
}

impl Default for ReferencePool {
    fn default() -> Self {
        Self::new(true)
    }
}

impl std::fmt::Debug for ReferencePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferencePool")
            .field("strict_check", &self.strict_check)
            .field("collections", &self.count())
            .finish()
    }
}
