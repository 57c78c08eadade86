//! # Event Pool
//!
//! Asynchronous notifications without the sender knowing who listens.
//!
//! ## Data Flow
//!
//! ```text
//! producer thread ──fire──► [queue] ──tick (driving thread)──► handlers
//!                                                               │
//!                                       reference pool ◄─release┘
//! ```

mod args;
mod handler;
mod mode;
mod pool;

pub use args::{EventArgs, EventId, EventSender};
pub use handler::EventHandler;
pub use mode::EventPoolMode;
pub use pool::EventPool;
