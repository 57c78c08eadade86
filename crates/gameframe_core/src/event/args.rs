//! Event payloads and senders.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::reference::Reference;

/// Small integer identifying an event's logical kind.
pub type EventId = i32;

/// A pooled event payload.
///
/// The kind id selects the subscriber list; [`Reference::clear`] runs when the
/// payload goes back to the pool after dispatch.
pub trait EventArgs: Reference {
    /// The event kind id.
    fn id(&self) -> EventId;
}

impl dyn EventArgs {
    /// Borrows the payload as its concrete type, if it is one.
    #[must_use]
    pub fn downcast_ref<T: EventArgs>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// The source of an event. Informational only, never used for routing.
#[derive(Clone, Default)]
pub struct EventSender(Option<Arc<dyn Any + Send + Sync>>);

impl EventSender {
    /// An anonymous sender.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Wraps a sender value.
    #[must_use]
    pub fn new<S: Any + Send + Sync>(sender: S) -> Self {
        Self(Some(Arc::new(sender)))
    }

    /// Wraps an already shared sender.
    #[must_use]
    pub fn from_arc(sender: Arc<dyn Any + Send + Sync>) -> Self {
        Self(Some(sender))
    }

    /// Returns true if no sender was given.
    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Borrows the sender as `S`, if it is one.
    #[must_use]
    pub fn downcast_ref<S: Any>(&self) -> Option<&S> {
        self.0.as_deref().and_then(|sender| sender.downcast_ref::<S>())
    }
}

impl fmt::Debug for EventSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(_) => f.write_str("EventSender(..)"),
            None => f.write_str("EventSender(None)"),
        }
    }
}
