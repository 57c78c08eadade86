//! # GAMEFRAME Demo Host
//!
//! A headless host loop:
//!
//! ```text
//! producers (N threads) ──acquire──► ReferencePool
//!          │
//!          └──fire──► EventManager queue ──tick (main thread)──► handlers ──► release
//! ```
//!
//! Run with: `cargo run --bin gameframe_demo -- [config.toml]`
//! Log level via `RUST_LOG` (default `info`).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use gameframe::{
    EventArgs, EventHandler, EventId, EventManager, EventSender, Framework, FrameworkConfig,
    Reference,
};
use tracing_subscriber::EnvFilter;

const DAMAGE: EventId = 1;
const PICKUP: EventId = 2;

/// Damage dealt to an entity.
#[derive(Default)]
struct DamageArgs {
    entity: u32,
    amount: u32,
}

impl Reference for DamageArgs {
    fn clear(&mut self) {
        self.entity = 0;
        self.amount = 0;
    }
}

impl EventArgs for DamageArgs {
    fn id(&self) -> EventId {
        DAMAGE
    }
}

/// An item picked up by an entity.
#[derive(Default)]
struct PickupArgs {
    item: u32,
}

impl Reference for PickupArgs {
    fn clear(&mut self) {
        self.item = 0;
    }
}

impl EventArgs for PickupArgs {
    fn id(&self) -> EventId {
        PICKUP
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => FrameworkConfig::from_file(path)?,
        None => FrameworkConfig::default(),
    };
    tracing::info!(?config, "starting gameframe demo");

    let mut framework = Framework::new(&config)?;
    let references = Arc::clone(framework.references());
    references.add::<DamageArgs>(config.demo.events_per_producer);

    let total_damage = Arc::new(AtomicU64::new(0));
    let pickups = Arc::new(AtomicU64::new(0));

    let events = framework.get_module::<EventManager>()?;
    {
        let total_damage = Arc::clone(&total_damage);
        events.subscribe(
            DAMAGE,
            EventHandler::new(move |_, args: &dyn EventArgs| {
                if let Some(damage) = args.downcast_ref::<DamageArgs>() {
                    tracing::trace!(entity = damage.entity, amount = damage.amount, "damage");
                    total_damage.fetch_add(u64::from(damage.amount), Ordering::Relaxed);
                }
            }),
        )?;
    }
    {
        let pickups = Arc::clone(&pickups);
        events.subscribe(
            PICKUP,
            EventHandler::new(move |sender, args: &dyn EventArgs| {
                if let Some(pickup) = args.downcast_ref::<PickupArgs>() {
                    let producer = sender.downcast_ref::<usize>().copied().unwrap_or_default();
                    tracing::trace!(producer, item = pickup.item, "pickup");
                    pickups.fetch_add(1, Ordering::Relaxed);
                }
            }),
        )?;
    }
    let pool = events.pool();

    for frame in 0..config.demo.frames {
        let frame_start = Instant::now();

        let producers: Vec<_> = (0..config.demo.producers)
            .map(|producer| {
                let pool = Arc::clone(&pool);
                let references = Arc::clone(&references);
                let count = config.demo.events_per_producer;
                thread::spawn(move || {
                    for i in 0..count {
                        let sender = EventSender::new(producer);
                        if i % 4 == 0 {
                            let mut pickup = references.acquire::<PickupArgs>();
                            pickup.item = u32::try_from(i).unwrap_or(u32::MAX);
                            pool.fire(sender, pickup);
                        } else {
                            let mut damage = references.acquire::<DamageArgs>();
                            damage.entity = u32::try_from(producer).unwrap_or(u32::MAX);
                            damage.amount = 1;
                            pool.fire(sender, damage);
                        }
                    }
                })
            })
            .collect();

        for producer in producers {
            if producer.join().is_err() {
                tracing::error!(frame, "producer thread panicked");
            }
        }

        let pending = pool.count();
        let real_seconds = frame_start.elapsed().as_secs_f32();
        framework.tick(config.demo.frame_seconds, real_seconds)?;
        tracing::info!(frame, dispatched = pending, "frame complete");
    }

    for info in references.all_infos() {
        tracing::info!(%info, "reference pool");
    }
    tracing::info!(
        total_damage = total_damage.load(Ordering::Relaxed),
        pickups = pickups.load(Ordering::Relaxed),
        "totals"
    );

    framework.shutdown_all();
    Ok(())
}
