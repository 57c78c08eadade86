//! # Event Manager
//!
//! The event pool as a framework module.
//!
//! The registry ticks it once per frame, which drains every queued event on
//! the driving thread. Producer threads take a [`pool`](EventManager::pool)
//! handle and fire from wherever they run.

use std::sync::Arc;

use gameframe_core::{
    EventArgs, EventHandler, EventId, EventPool, EventPoolMode, EventSender, FrameworkModule,
    FrameworkResult, ReferencePool,
};

/// Module that owns the framework's event pool.
pub struct EventManager {
    events: Arc<EventPool<dyn EventArgs>>,
    priority: i32,
}

impl EventManager {
    /// Priority when none is configured. Ticks before most modules.
    pub const DEFAULT_PRIORITY: i32 = 100;

    /// Default dispatch policy: unhandled events are dropped, ids may have
    /// several handlers, the same handler may not subscribe twice.
    pub const DEFAULT_MODE: EventPoolMode =
        EventPoolMode::ALLOW_NO_HANDLER.union(EventPoolMode::ALLOW_MULTI_HANDLER);

    /// Creates an event manager.
    ///
    /// # Arguments
    ///
    /// * `mode` - Dispatch policy
    /// * `priority` - Module priority
    /// * `references` - Pool that receives payloads after dispatch
    #[must_use]
    pub fn new(mode: EventPoolMode, priority: i32, references: Arc<ReferencePool>) -> Self {
        Self {
            events: Arc::new(EventPool::new(mode, references)),
            priority,
        }
    }

    /// Shared handle to the underlying pool, for producer threads.
    ///
    /// The handle is closed when this module shuts down; anything fired on it
    /// afterwards is released, not queued. Take a new handle after a rebuild.
    #[must_use]
    pub fn pool(&self) -> Arc<EventPool<dyn EventArgs>> {
        Arc::clone(&self.events)
    }

    /// Number of pending events.
    #[must_use]
    pub fn count(&self) -> usize {
        self.events.count()
    }

    /// Returns true if `handler` is subscribed to `id`.
    #[must_use]
    pub fn check(&self, id: EventId, handler: &EventHandler<dyn EventArgs>) -> bool {
        self.events.check(id, handler)
    }

    /// Subscribes `handler` to `id`.
    ///
    /// # Errors
    ///
    /// See [`EventPool::subscribe`].
    pub fn subscribe(&self, id: EventId, handler: EventHandler<dyn EventArgs>) -> FrameworkResult<()> {
        self.events.subscribe(id, handler)
    }

    /// Unsubscribes `handler` from `id`. No-op if absent.
    pub fn unsubscribe(&self, id: EventId, handler: &EventHandler<dyn EventArgs>) {
        self.events.unsubscribe(id, handler);
    }

    /// Queues an event for the next frame. Thread-safe.
    pub fn fire(&self, sender: EventSender, args: Box<dyn EventArgs>) {
        self.events.fire(sender, args);
    }

    /// Dispatches an event now, on the driving thread.
    ///
    /// # Errors
    ///
    /// See [`EventPool::fire_now`].
    pub fn fire_now(&self, sender: EventSender, args: Box<dyn EventArgs>) -> FrameworkResult<()> {
        self.events.fire_now(sender, args)
    }
}

impl FrameworkModule for EventManager {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn tick(&mut self, elapse_seconds: f32, real_elapse_seconds: f32) -> FrameworkResult<()> {
        self.events.tick(elapse_seconds, real_elapse_seconds)
    }

    fn shutdown(&mut self) {
        self.events.shutdown();
    }
}
