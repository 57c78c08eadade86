//! Point-in-time statistics for one per-type collection.

use std::fmt;

/// Immutable snapshot of a reference collection's counters.
///
/// Taken under the collection's lock, so all six counters belong to the same
/// moment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferencePoolInfo {
    type_name: &'static str,
    unused_count: usize,
    using_count: usize,
    acquire_count: u64,
    release_count: u64,
    add_count: u64,
    remove_count: u64,
}

impl ReferencePoolInfo {
    /// Creates a snapshot from raw counter values.
    #[must_use]
    pub const fn new(
        type_name: &'static str,
        unused_count: usize,
        using_count: usize,
        acquire_count: u64,
        release_count: u64,
        add_count: u64,
        remove_count: u64,
    ) -> Self {
        Self {
            type_name,
            unused_count,
            using_count,
            acquire_count,
            release_count,
            add_count,
            remove_count,
        }
    }

    /// Snapshot of a type the pool has never seen.
    #[must_use]
    pub const fn empty(type_name: &'static str) -> Self {
        Self::new(type_name, 0, 0, 0, 0, 0, 0)
    }

    /// Name of the pooled type.
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Instances waiting in the pool.
    #[inline]
    #[must_use]
    pub const fn unused_count(&self) -> usize {
        self.unused_count
    }

    /// Instances acquired and not yet released.
    #[inline]
    #[must_use]
    pub const fn using_count(&self) -> usize {
        self.using_count
    }

    /// Lifetime number of acquisitions.
    #[inline]
    #[must_use]
    pub const fn acquire_count(&self) -> u64 {
        self.acquire_count
    }

    /// Lifetime number of releases.
    #[inline]
    #[must_use]
    pub const fn release_count(&self) -> u64 {
        self.release_count
    }

    /// Lifetime number of instances created.
    #[inline]
    #[must_use]
    pub const fn add_count(&self) -> u64 {
        self.add_count
    }

    /// Lifetime number of instances destroyed.
    #[inline]
    #[must_use]
    pub const fn remove_count(&self) -> u64 {
        self.remove_count
    }
}

impl fmt::Display for ReferencePoolInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: unused={} using={} acquired={} released={} added={} removed={}",
            self.type_name,
            self.unused_count,
            self.using_count,
            self.acquire_count,
            self.release_count,
            self.add_count,
            self.remove_count,
        )
    }
}
