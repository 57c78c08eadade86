//! # Reference Collection
//!
//! Unused stack plus live accounting for a single concrete type.

use std::any::Any;
use std::collections::HashMap;

use crate::any::AsAny;
use crate::error::{FrameworkError, FrameworkResult};

use super::{Reference, ReferencePoolInfo};

/// Address of a boxed instance, used as its live identity.
#[inline]
fn address_of<R: ?Sized>(reference: &R) -> usize {
    (reference as *const R).cast::<()>() as usize
}

/// Per-type store of unused instances and lifetime counters.
///
/// Invariant: `add_count - remove_count == unused.len() + using_count`.
///
/// # Thread Safety
///
/// This collection is NOT thread-safe. The pool wraps each one in a mutex.
pub(crate) struct ReferenceCollection {
    /// Name of the pooled type.
    type_name: &'static str,
    /// Unused instances, LIFO. Every entry has been cleared.
    unused: Vec<Box<dyn Any + Send>>,
    /// Live instance addresses and how many live instances share each one.
    ///
    /// Only maintained in strict mode. Zero-sized types share an address.
    live: HashMap<usize, usize>,
    /// Whether release must prove the instance is live.
    strict_check: bool,
    /// Instances acquired and not yet released.
    using_count: usize,
    /// Lifetime acquisitions.
    acquire_count: u64,
    /// Lifetime releases.
    release_count: u64,
    /// Lifetime instances created.
    add_count: u64,
    /// Lifetime instances destroyed.
    remove_count: u64,
}

impl ReferenceCollection {
    /// Creates an empty collection.
    pub(crate) fn new(type_name: &'static str, strict_check: bool) -> Self {
        Self {
            type_name,
            unused: Vec::new(),
            live: HashMap::new(),
            strict_check,
            using_count: 0,
            acquire_count: 0,
            release_count: 0,
            add_count: 0,
            remove_count: 0,
        }
    }

    /// Pops an unused instance, or constructs one if the stack is empty.
    ///
    /// This is **O(1)** when an unused instance is available.
    pub(crate) fn acquire<T: Reference + Default>(&mut self) -> Box<T> {
        let reference = loop {
            match self.unused.pop().map(|reference| reference.downcast::<T>()) {
                Some(Ok(reference)) => break reference,
                // Keyed by TypeId, so a mismatch means a foreign instance; drop it.
                Some(Err(_)) => self.remove_count += 1,
                None => {
                    self.add_count += 1;
                    break Box::new(T::default());
                }
            }
        };

        self.acquire_count += 1;
        self.using_count += 1;
        if self.strict_check {
            *self.live.entry(address_of(&*reference)).or_insert(0) += 1;
        }
        reference
    }

    /// Clears an instance and pushes it back onto the unused stack.
    ///
    /// Counters are left untouched when the instance is rejected.
    pub(crate) fn release<R: ?Sized + Reference>(
        &mut self,
        mut reference: Box<R>,
    ) -> FrameworkResult<()> {
        if self.using_count == 0 {
            tracing::warn!(type_name = self.type_name, "release with no live instances");
            return Err(FrameworkError::InvalidState(format!(
                "'{}' has no live instance to release",
                self.type_name
            )));
        }

        if self.strict_check && !self.untrack(address_of(&*reference)) {
            tracing::warn!(type_name = self.type_name, "release of an instance that is not live");
            return Err(FrameworkError::InvalidState(format!(
                "instance of '{}' was not acquired from this pool or was already released",
                self.type_name
            )));
        }

        reference.clear();
        self.using_count -= 1;
        self.release_count += 1;
        self.unused.push(AsAny::into_any(reference));
        Ok(())
    }

    /// Pushes `count` freshly constructed, cleared instances.
    pub(crate) fn add<T: Reference + Default>(&mut self, count: usize) {
        self.unused.reserve(count);
        for _ in 0..count {
            let mut reference = Box::new(T::default());
            reference.clear();
            self.unused.push(reference);
        }
        self.add_count += count as u64;
    }

    /// Destroys `count` unused instances.
    pub(crate) fn remove(&mut self, count: usize) -> FrameworkResult<()> {
        if count > self.unused.len() {
            return Err(FrameworkError::InvalidState(format!(
                "cannot remove {count} instances of '{}', only {} unused",
                self.type_name,
                self.unused.len()
            )));
        }

        let keep = self.unused.len() - count;
        self.unused.truncate(keep);
        self.remove_count += count as u64;
        Ok(())
    }

    /// Destroys every unused instance. Live instances are unaffected.
    pub(crate) fn remove_all(&mut self) {
        self.remove_count += self.unused.len() as u64;
        self.unused.clear();
    }

    /// Takes a consistent snapshot of the counters.
    pub(crate) fn info(&self) -> ReferencePoolInfo {
        ReferencePoolInfo::new(
            self.type_name,
            self.unused.len(),
            self.using_count,
            self.acquire_count,
            self.release_count,
            self.add_count,
            self.remove_count,
        )
    }

    /// Forgets one live instance at `address`. Returns false if none is live there.
    fn untrack(&mut self, address: usize) -> bool {
        match self.live.get_mut(&address) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.live.remove(&address);
                true
            }
            None => false,
        }
    }
}
