//! # GAMEFRAME
//!
//! Host-facing layer over [`gameframe_core`]:
//! - [`Framework`]: owns the reference pool and the module registry
//! - [`EventManager`]: the event pool, ticked as a module
//! - [`FrameworkConfig`]: TOML configuration, loaded once at startup
//!
//! ## Example
//!
//! ```rust
//! use gameframe::{EventManager, Framework, FrameworkConfig};
//! use gameframe::{EventArgs, EventHandler, EventId, EventSender, Reference};
//!
//! #[derive(Default)]
//! struct LevelLoaded { level: u32 }
//!
//! impl Reference for LevelLoaded {
//!     fn clear(&mut self) { self.level = 0; }
//! }
//!
//! impl EventArgs for LevelLoaded {
//!     fn id(&self) -> EventId { 1 }
//! }
//!
//! let mut framework = Framework::new(&FrameworkConfig::default())?;
//! let references = framework.references().clone();
//!
//! let events = framework.get_module::<EventManager>()?;
//! events.subscribe(1, EventHandler::new(|_, _| {}))?;
//!
//! let mut loaded = references.acquire::<LevelLoaded>();
//! loaded.level = 2;
//! events.fire(EventSender::none(), loaded);
//!
//! framework.tick(0.016, 0.016)?;
//! framework.shutdown_all();
//! # Ok::<(), gameframe::FrameworkError>(())
//! ```

#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod event_manager;
pub mod framework;

pub use gameframe_core::{
    EventArgs, EventHandler, EventId, EventPool, EventPoolMode, EventSender, FrameworkError,
    FrameworkModule, FrameworkResult, Reference, ReferencePool, ReferencePoolInfo,
};

pub use config::{DemoConfig, EventConfig, FrameworkConfig, ReferenceConfig};
pub use event_manager::EventManager;
pub use framework::Framework;
