//! # GAMEFRAME Core
//!
//! Runtime substrate for a host application:
//! - Recycle short-lived payload objects instead of re-allocating them
//! - Deliver events to subscribers without the sender knowing who listens
//! - Drive long-lived modules on a fixed polling cadence
//!
//! ## Threading Rules
//!
//! 1. **One driving thread** - ticks the registry and runs every handler
//! 2. **Any thread may fire** - enqueue is the only cross-thread operation
//! 3. **Snapshots anywhere** - pool statistics are always consistent
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use gameframe_core::{
//!     EventArgs, EventHandler, EventId, EventPool, EventPoolMode, EventSender, Reference,
//!     ReferencePool,
//! };
//!
//! #[derive(Default)]
//! struct Spawned { entity: u32 }
//!
//! impl Reference for Spawned {
//!     fn clear(&mut self) { self.entity = 0; }
//! }
//!
//! impl EventArgs for Spawned {
//!     fn id(&self) -> EventId { 7 }
//! }
//!
//! let references = Arc::new(ReferencePool::new(true));
//! let events: EventPool<dyn EventArgs> =
//!     EventPool::new(EventPoolMode::empty(), Arc::clone(&references));
//!
//! events.subscribe(7, EventHandler::new(|_, args: &dyn EventArgs| {
//!     assert_eq!(args.downcast_ref::<Spawned>().map(|s| s.entity), Some(3));
//! })).unwrap();
//!
//! let mut spawned = references.acquire::<Spawned>();
//! spawned.entity = 3;
//! events.fire(EventSender::none(), spawned);
//! events.tick(0.016, 0.016).unwrap();
//!
//! assert_eq!(references.info::<Spawned>().unused_count(), 1);
//! ```

#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod any;
pub mod error;
pub mod event;
pub mod module;
pub mod reference;

pub use any::AsAny;
pub use error::{FrameworkError, FrameworkResult};
pub use event::{EventArgs, EventHandler, EventId, EventPool, EventPoolMode, EventSender};
pub use module::{FrameworkModule, ModuleRegistry};
pub use reference::{Reference, ReferencePool, ReferencePoolInfo};
