//! # Event Pool
//!
//! Subscriber table, thread-safe queue and ordered single-thread drain.
//!
//! ## Node Lifecycle
//!
//! ```text
//! fire ──► Enqueued ──tick──► Dispatching ──► Released
//! ```
//!
//! A node is never re-enqueued and never partially dispatched.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{FrameworkError, FrameworkResult};
use crate::reference::ReferencePool;

use super::{EventArgs, EventHandler, EventId, EventPoolMode, EventSender};

/// One pending event.
struct EventNode<E: ?Sized> {
    sender: EventSender,
    args: Box<E>,
}

/// Pending events plus the shutdown latch, guarded together.
struct EventQueue<E: ?Sized> {
    nodes: VecDeque<EventNode<E>>,
    /// Set by shutdown. A closed queue never accepts another node.
    closed: bool,
}

impl<E: ?Sized> Default for EventQueue<E> {
    fn default() -> Self {
        Self {
            nodes: VecDeque::new(),
            closed: false,
        }
    }
}

/// Subscribers of one event id. Replaced, never mutated, so a drain can
/// hold a snapshot without copying it.
type HandlerList<E> = Arc<[EventHandler<E>]>;

/// Event dispatcher for one payload family.
///
/// `E` is usually a trait object such as `dyn EventArgs`, so one pool carries
/// many concrete payload types; each goes back to its own collection in the
/// [`ReferencePool`] after dispatch.
///
/// # Thread Safety
///
/// - [`fire`](Self::fire) is safe from any thread.
/// - [`tick`](Self::tick), [`fire_now`](Self::fire_now) and
///   [`shutdown`](Self::shutdown) belong to the driving thread. Handlers only
///   ever run there.
///
/// No lock is held while a handler runs, so a handler may `fire`, `subscribe`
/// or `unsubscribe` freely.
///
/// # Shutdown
///
/// After [`shutdown`](Self::shutdown) the pool is closed for good. Producers
/// still holding a handle can call [`fire`](Self::fire), but the payload goes
/// straight back to the [`ReferencePool`] instead of being queued.
///
/// # Ordering
///
/// Events are dispatched in the order their enqueue completed. Two racing
/// `fire` calls are ordered by the queue lock, not by call time.
pub struct EventPool<E: ?Sized + EventArgs> {
    /// Subscribers by event id, in subscription order. Never holds an empty list.
    handlers: Mutex<HashMap<EventId, HandlerList<E>>>,
    /// Pending events, FIFO.
    events: Mutex<EventQueue<E>>,
    /// Dispatch policy, fixed at construction.
    mode: EventPoolMode,
    /// Where payloads go after dispatch.
    references: Arc<ReferencePool>,
}

impl<E: ?Sized + EventArgs> EventPool<E> {
    /// Creates an event pool.
    ///
    /// # Arguments
    ///
    /// * `mode` - Dispatch policy
    /// * `references` - Pool that receives payloads after dispatch
    #[must_use]
    pub fn new(mode: EventPoolMode, references: Arc<ReferencePool>) -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
            events: Mutex::new(EventQueue::default()),
            mode,
            references,
        }
    }

    /// Returns the dispatch policy.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> EventPoolMode {
        self.mode
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn count(&self) -> usize {
        self.events.lock().nodes.len()
    }

    /// Returns true once [`shutdown`](Self::shutdown) has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.events.lock().closed
    }

    /// Returns the number of handlers subscribed to `id`.
    #[must_use]
    pub fn handler_count(&self, id: EventId) -> usize {
        self.handlers.lock().get(&id).map_or(0, |list| list.len())
    }

    /// Returns true if `handler` is subscribed to `id`.
    #[must_use]
    pub fn check(&self, id: EventId, handler: &EventHandler<E>) -> bool {
        self.handlers
            .lock()
            .get(&id)
            .is_some_and(|list| list.iter().any(|h| h.ptr_eq(handler)))
    }

    /// Subscribes `handler` to events of kind `id`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameworkError::DuplicateHandler`] if `id` already has a
    /// handler and multi-handler mode is off, or if this exact handler is
    /// already subscribed and duplicate mode is off.
    pub fn subscribe(&self, id: EventId, handler: EventHandler<E>) -> FrameworkResult<()> {
        let mut handlers = self.handlers.lock();
        let list: &[EventHandler<E>] = match handlers.get(&id) {
            Some(list) => &list[..],
            None => &[],
        };

        if !list.is_empty() && !self.mode.contains(EventPoolMode::ALLOW_MULTI_HANDLER) {
            return Err(FrameworkError::DuplicateHandler {
                id,
                reason: "multiple handlers",
            });
        }

        if !self.mode.contains(EventPoolMode::ALLOW_DUPLICATE_HANDLER)
            && list.iter().any(|h| h.ptr_eq(&handler))
        {
            return Err(FrameworkError::DuplicateHandler {
                id,
                reason: "duplicate handlers",
            });
        }

        let mut updated = Vec::with_capacity(list.len() + 1);
        updated.extend_from_slice(list);
        updated.push(handler);
        handlers.insert(id, updated.into());
        Ok(())
    }

    /// Removes the most recent subscription of `handler` to `id`.
    ///
    /// Does nothing if it is not subscribed.
    pub fn unsubscribe(&self, id: EventId, handler: &EventHandler<E>) {
        let mut handlers = self.handlers.lock();
        let Some(list) = handlers.get(&id) else {
            return;
        };
        let Some(index) = list.iter().rposition(|h| h.ptr_eq(handler)) else {
            return;
        };

        if list.len() == 1 {
            handlers.remove(&id);
        } else {
            let mut updated = list.to_vec();
            updated.remove(index);
            handlers.insert(id, updated.into());
        }
    }

    /// Queues an event for the next [`tick`](Self::tick).
    ///
    /// Thread-safe. Never dispatches on the calling thread. On a closed pool
    /// the payload is released immediately and nothing is queued.
    pub fn fire(&self, sender: EventSender, args: Box<E>) {
        let rejected = {
            let mut queue = self.events.lock();
            if queue.closed {
                Some(args)
            } else {
                queue.nodes.push_back(EventNode { sender, args });
                None
            }
        };

        if let Some(args) = rejected {
            let id = args.id();
            tracing::warn!(id, "event fired after shutdown, payload released");
            if let Err(error) = self.references.release_boxed(args) {
                tracing::warn!(%error, "failed to release rejected event");
            }
        }
    }

    /// Dispatches an event immediately on the calling thread.
    ///
    /// Must only be called from the driving thread.
    ///
    /// # Errors
    ///
    /// Same as a single node of [`tick`](Self::tick).
    pub fn fire_now(&self, sender: EventSender, args: Box<E>) -> FrameworkResult<()> {
        self.handle_event(&sender, args)
    }

    /// Drains every queued event in FIFO order.
    ///
    /// Each node is dispatched and released independently; a failing node
    /// does not stop the drain. Events fired while draining wait for the next
    /// tick.
    ///
    /// # Arguments
    ///
    /// * `_elapse_seconds` - Logical time since the last tick
    /// * `_real_elapse_seconds` - Wall time since the last tick
    ///
    /// # Errors
    ///
    /// Returns the first failure of the drain, typically
    /// [`FrameworkError::UnhandledEvent`], after every node has been released.
    pub fn tick(&self, _elapse_seconds: f32, _real_elapse_seconds: f32) -> FrameworkResult<()> {
        // The guard must be gone before any handler runs.
        let events = std::mem::take(&mut self.events.lock().nodes);

        let mut first_error = None;
        for node in events {
            if let Err(error) = self.handle_event(&node.sender, node.args) {
                first_error.get_or_insert(error);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Closes the pool, discards every pending event without dispatch and
    /// drops all handlers.
    ///
    /// Discarded payloads still go back to the reference pool, and so does
    /// anything fired afterwards.
    pub fn shutdown(&self) {
        let events = {
            let mut queue = self.events.lock();
            queue.closed = true;
            std::mem::take(&mut queue.nodes)
        };
        let discarded = events.len();

        for node in events {
            if let Err(error) = self.references.release_boxed(node.args) {
                tracing::warn!(%error, "failed to release discarded event");
            }
        }

        self.handlers.lock().clear();
        tracing::debug!(discarded, "event pool shut down");
    }

    fn handle_event(&self, sender: &EventSender, args: Box<E>) -> FrameworkResult<()> {
        let id = args.id();
        let handlers = self.handlers.lock().get(&id).map(Arc::clone);

        if let Some(list) = &handlers {
            for handler in list.iter() {
                handler.call(sender, &args);
            }
        }

        self.references.release_boxed(args)?;

        if handlers.is_none() && !self.mode.contains(EventPoolMode::ALLOW_NO_HANDLER) {
            tracing::warn!(id, "event has no handler");
            return Err(FrameworkError::UnhandledEvent { id });
        }
        Ok(())
    }
}

impl<E: ?Sized + EventArgs> std::fmt::Debug for EventPool<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPool")
            .field("mode", &self.mode)
            .field("pending", &self.count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Reference;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const HIT: EventId = 1;
    const HEAL: EventId = 2;

    #[derive(Default)]
    struct HitArgs {
        damage: u32,
    }

    impl Reference for HitArgs {
        fn clear(&mut self) {
            self.damage = 0;
        }
    }

    impl EventArgs for HitArgs {
        fn id(&self) -> EventId {
            HIT
        }
    }

    #[derive(Default)]
    struct HealArgs;

    impl Reference for HealArgs {
        fn clear(&mut self) {}
    }

    impl EventArgs for HealArgs {
        fn id(&self) -> EventId {
            HEAL
        }
    }

    fn pool(mode: EventPoolMode) -> (Arc<ReferencePool>, EventPool<dyn EventArgs>) {
        let references = Arc::new(ReferencePool::new(true));
        let events = EventPool::new(mode, Arc::clone(&references));
        (references, events)
    }

    fn hit(references: &ReferencePool, damage: u32) -> Box<dyn EventArgs> {
        let mut args = references.acquire::<HitArgs>();
        args.damage = damage;
        args
    }

    #[test]
    fn test_single_handler_mode_rejects_second() {
        let (_, events) = pool(EventPoolMode::empty());

        events.subscribe(HIT, EventHandler::new(|_, _| {})).unwrap();
        let result = events.subscribe(HIT, EventHandler::new(|_, _| {}));
        assert!(matches!(result, Err(FrameworkError::DuplicateHandler { id: HIT, .. })));
    }

    #[test]
    fn test_duplicate_handler_rejected_unless_allowed() {
        let (_, events) = pool(EventPoolMode::ALLOW_MULTI_HANDLER);
        let handler: EventHandler<dyn EventArgs> = EventHandler::new(|_, _| {});

        events.subscribe(HIT, handler.clone()).unwrap();
        assert!(events.subscribe(HIT, handler.clone()).is_err());

        let (_, events) = pool(
            EventPoolMode::ALLOW_MULTI_HANDLER | EventPoolMode::ALLOW_DUPLICATE_HANDLER,
        );
        events.subscribe(HIT, handler.clone()).unwrap();
        events.subscribe(HIT, handler).unwrap();
        assert_eq!(events.handler_count(HIT), 2);
    }

    #[test]
    fn test_unsubscribe_absent_is_noop() {
        let (_, events) = pool(EventPoolMode::empty());
        let handler: EventHandler<dyn EventArgs> = EventHandler::new(|_, _| {});

        events.unsubscribe(HIT, &handler);
        events.subscribe(HIT, handler.clone()).unwrap();
        assert!(events.check(HIT, &handler));

        events.unsubscribe(HIT, &handler);
        assert!(!events.check(HIT, &handler));
        assert_eq!(events.handler_count(HIT), 0);
    }

    #[test]
    fn test_tick_dispatches_then_releases() {
        let (references, events) = pool(EventPoolMode::empty());
        let seen = Arc::new(AtomicUsize::new(0));

        let sink = Arc::clone(&seen);
        events
            .subscribe(
                HIT,
                EventHandler::new(move |_, args: &dyn EventArgs| {
                    let hit = args.downcast_ref::<HitArgs>().unwrap();
                    sink.fetch_add(hit.damage as usize, Ordering::SeqCst);
                }),
            )
            .unwrap();

        events.fire(EventSender::none(), hit(&references, 5));
        assert_eq!(seen.load(Ordering::SeqCst), 0); // Not on the calling thread
        assert_eq!(events.count(), 1);

        events.tick(0.016, 0.016).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 5);
        assert_eq!(events.count(), 0);

        let info = references.info::<HitArgs>();
        assert_eq!(info.using_count(), 0);
        assert_eq!(info.release_count(), 1);
    }

    #[test]
    fn test_unhandled_event_released_and_drain_continues() {
        let (references, events) = pool(EventPoolMode::empty());
        let heals = Arc::new(AtomicUsize::new(0));

        let sink = Arc::clone(&heals);
        events
            .subscribe(HEAL, EventHandler::new(move |_, _| {
                sink.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        events.fire(EventSender::none(), hit(&references, 1));
        events.fire(EventSender::none(), references.acquire::<HealArgs>());

        let result = events.tick(0.0, 0.0);
        assert_eq!(result, Err(FrameworkError::UnhandledEvent { id: HIT }));
        assert_eq!(heals.load(Ordering::SeqCst), 1);
        assert_eq!(references.info::<HitArgs>().using_count(), 0);
        assert_eq!(references.info::<HealArgs>().using_count(), 0);
    }

    #[test]
    fn test_allow_no_handler_drops_silently() {
        let (references, events) = pool(EventPoolMode::ALLOW_NO_HANDLER);

        events.fire_now(EventSender::none(), hit(&references, 1)).unwrap();
        assert_eq!(references.info::<HitArgs>().unused_count(), 1);
    }

    #[test]
    fn test_handler_may_fire_during_drain() {
        let (references, events) = pool(EventPoolMode::ALLOW_NO_HANDLER);
        let events = Arc::new(events);

        let inner = Arc::clone(&events);
        let pool_ref = Arc::clone(&references);
        events
            .subscribe(HIT, EventHandler::new(move |_, _| {
                inner.fire(EventSender::none(), pool_ref.acquire::<HealArgs>());
            }))
            .unwrap();

        events.fire(EventSender::none(), hit(&references, 1));
        events.tick(0.0, 0.0).unwrap();

        // Fired from a handler, so it waits for the next drain.
        assert_eq!(events.count(), 1);
        events.tick(0.0, 0.0).unwrap();
        assert_eq!(events.count(), 0);
        assert_eq!(references.info::<HealArgs>().release_count(), 1);
    }

    #[test]
    fn test_shutdown_discards_without_dispatch() {
        let (references, events) = pool(EventPoolMode::empty());
        let calls = Arc::new(AtomicUsize::new(0));

        let sink = Arc::clone(&calls);
        events
            .subscribe(HIT, EventHandler::new(move |_, _| {
                sink.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        events.fire(EventSender::none(), hit(&references, 1));
        events.fire(EventSender::none(), hit(&references, 2));
        events.shutdown();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(events.count(), 0);
        assert_eq!(events.handler_count(HIT), 0);
        assert_eq!(references.info::<HitArgs>().unused_count(), 2);
    }

    #[test]
    fn test_fire_after_shutdown_releases_payload() {
        let (references, events) = pool(EventPoolMode::ALLOW_NO_HANDLER);
        events.shutdown();
        assert!(events.is_closed());

        let calls = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&calls);
        events
            .subscribe(HIT, EventHandler::new(move |_, _| {
                sink.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        events.fire(EventSender::none(), hit(&references, 3));
        assert_eq!(events.count(), 0);

        events.tick(0.0, 0.0).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let info = references.info::<HitArgs>();
        assert_eq!(info.using_count(), 0);
        assert_eq!(info.unused_count(), 1);
    }

    #[test]
    fn test_drain_uses_handler_snapshot() {
        let (references, events) = pool(EventPoolMode::ALLOW_MULTI_HANDLER);
        let events = Arc::new(events);
        let late_calls = Arc::new(AtomicUsize::new(0));

        let sink = Arc::clone(&late_calls);
        let late: EventHandler<dyn EventArgs> = EventHandler::new(move |_, _| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        let inner = Arc::clone(&events);
        let target = late.clone();
        events
            .subscribe(HIT, EventHandler::new(move |_, _| inner.unsubscribe(HIT, &target)))
            .unwrap();
        events.subscribe(HIT, late).unwrap();
        assert_eq!(events.handler_count(HIT), 2);

        // Unsubscribed mid-dispatch: still runs for the event in flight only.
        events.fire(EventSender::none(), hit(&references, 1));
        events.fire(EventSender::none(), hit(&references, 1));
        events.tick(0.0, 0.0).unwrap();

        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
        assert_eq!(events.handler_count(HIT), 1);
        assert_eq!(references.info::<HitArgs>().using_count(), 0);
    }

    #[test]
    fn test_sender_is_passed_through() {
        let (references, events) = pool(EventPoolMode::empty());
        let seen = Arc::new(AtomicUsize::new(0));

        let sink = Arc::clone(&seen);
        events
            .subscribe(HIT, EventHandler::new(move |sender, _| {
                if let Some(tag) = sender.downcast_ref::<usize>() {
                    sink.store(*tag, Ordering::SeqCst);
                }
            }))
            .unwrap();

        events.fire(EventSender::new(42_usize), hit(&references, 1));
        events.tick(0.0, 0.0).unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }
}
