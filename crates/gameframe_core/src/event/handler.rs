//! Subscriber callbacks.

use std::fmt;
use std::sync::Arc;

use super::EventSender;

/// A shared event callback.
///
/// Identity is the identity of the shared allocation: clones of one handler
/// are the same handler, two handlers built from equal closures are not.
///
/// A closure that uses its payload needs the payload type spelled out, since
/// the pool type is not known yet when the closure is checked:
///
/// ```rust
/// use gameframe_core::{EventArgs, EventHandler};
///
/// let handler: EventHandler<dyn EventArgs> = EventHandler::new(|_, args: &dyn EventArgs| {
///     let _ = args.id();
/// });
/// # drop(handler);
/// ```
pub struct EventHandler<E: ?Sized>(Arc<dyn Fn(&EventSender, &E) + Send + Sync>);

impl<E: ?Sized> EventHandler<E> {
    /// Wraps a callback.
    #[must_use]
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&EventSender, &E) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// Returns true if both are the same handler.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.0).cast::<()>() == Arc::as_ptr(&other.0).cast::<()>()
    }

    #[inline]
    pub(crate) fn call(&self, sender: &EventSender, args: &E) {
        (self.0)(sender, args);
    }
}

impl<E: ?Sized> Clone for EventHandler<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E: ?Sized> fmt::Debug for EventHandler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}
