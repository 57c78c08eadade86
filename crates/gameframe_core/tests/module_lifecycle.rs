//! Integration tests for the module registry driving an event pool.
//!
//! Run with: cargo test --package gameframe_core --test module_lifecycle

use std::sync::{Arc, Mutex};

use gameframe_core::{
    EventArgs, EventHandler, EventId, EventPool, EventPoolMode, EventSender, FrameworkError,
    FrameworkModule, FrameworkResult, ModuleRegistry, Reference, ReferencePool,
};

const PING: EventId = 1;

#[derive(Default)]
struct PingArgs;

impl Reference for PingArgs {
    fn clear(&mut self) {}
}

impl EventArgs for PingArgs {
    fn id(&self) -> EventId {
        PING
    }
}

/// Drains its event pool every tick.
struct Dispatch {
    events: Arc<EventPool<dyn EventArgs>>,
}

impl FrameworkModule for Dispatch {
    fn priority(&self) -> i32 {
        100
    }

    fn tick(&mut self, elapse_seconds: f32, real_elapse_seconds: f32) -> FrameworkResult<()> {
        self.events.tick(elapse_seconds, real_elapse_seconds)
    }

    fn shutdown(&mut self) {
        self.events.shutdown();
    }
}

/// Records the reference pool's live count each tick and at shutdown.
struct Census {
    references: Arc<ReferencePool>,
    journal: Arc<Mutex<Vec<String>>>,
}

impl FrameworkModule for Census {
    fn tick(&mut self, _: f32, _: f32) -> FrameworkResult<()> {
        let live = self.references.info::<PingArgs>().using_count();
        self.journal.lock().unwrap().push(format!("tick live={live}"));
        Ok(())
    }

    fn shutdown(&mut self) {
        let live = self.references.info::<PingArgs>().using_count();
        self.journal.lock().unwrap().push(format!("shutdown live={live}"));
    }
}

struct Host {
    registry: ModuleRegistry,
    references: Arc<ReferencePool>,
    events: Arc<EventPool<dyn EventArgs>>,
    journal: Arc<Mutex<Vec<String>>>,
}

fn host(mode: EventPoolMode) -> Host {
    let references = Arc::new(ReferencePool::new(true));
    let events = Arc::new(EventPool::new(mode, Arc::clone(&references)));
    let journal = Arc::new(Mutex::new(Vec::new()));

    let mut registry = ModuleRegistry::new();
    let shared = Arc::clone(&events);
    registry
        .register(move || Some(Dispatch { events: Arc::clone(&shared) }))
        .unwrap();
    let (pool, log) = (Arc::clone(&references), Arc::clone(&journal));
    registry
        .register(move || {
            Some(Census {
                references: Arc::clone(&pool),
                journal: Arc::clone(&log),
            })
        })
        .unwrap();

    Host {
        registry,
        references,
        events,
        journal,
    }
}

#[test]
fn test_higher_priority_drains_before_lower_observes() {
    let mut host = host(EventPoolMode::ALLOW_NO_HANDLER);
    host.registry.get_module::<Census>().unwrap();
    host.registry.get_module::<Dispatch>().unwrap();

    host.events
        .fire(EventSender::none(), host.references.acquire::<PingArgs>());
    host.registry.tick(0.016, 0.016).unwrap();

    assert_eq!(host.registry.module_names().len(), 2);
    assert_eq!(*host.journal.lock().unwrap(), ["tick live=0"]);
}

#[test]
fn test_pending_events_released_before_census_shutdown() {
    let mut host = host(EventPoolMode::ALLOW_NO_HANDLER);
    host.registry.get_module::<Dispatch>().unwrap();
    host.registry.get_module::<Census>().unwrap();

    host.events
        .fire(EventSender::none(), host.references.acquire::<PingArgs>());
    host.registry.shutdown_all();

    // Census (priority 0) shuts down first and still sees the in-flight ping;
    // Dispatch then returns it to the pool.
    assert_eq!(*host.journal.lock().unwrap(), ["shutdown live=1"]);
    assert_eq!(host.references.info::<PingArgs>().using_count(), 0);
    assert!(host.registry.is_empty());
}

#[test]
fn test_unhandled_event_surfaces_from_registry_tick() {
    let mut host = host(EventPoolMode::empty());
    host.registry.get_module::<Dispatch>().unwrap();
    host.registry.get_module::<Census>().unwrap();

    let pings = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&pings);
    let handler: EventHandler<dyn EventArgs> =
        EventHandler::new(move |_, _| *counter.lock().unwrap() += 1);
    host.events.subscribe(PING, handler.clone()).unwrap();

    host.events
        .fire(EventSender::none(), host.references.acquire::<PingArgs>());
    host.registry.tick(0.0, 0.0).unwrap();
    assert_eq!(*pings.lock().unwrap(), 1);

    host.events.unsubscribe(PING, &handler);
    host.events
        .fire(EventSender::none(), host.references.acquire::<PingArgs>());
    let result = host.registry.tick(0.0, 0.0);

    assert_eq!(result, Err(FrameworkError::UnhandledEvent { id: PING }));
    // The lower priority module still ticked after the failure.
    assert_eq!(host.journal.lock().unwrap().len(), 2);
}
