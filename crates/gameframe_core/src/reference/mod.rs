//! # Reference Pool
//!
//! Recycling of short-lived payload objects instead of re-allocating them.
//!
//! ## Lifecycle
//!
//! ```text
//!   add ──► [unused] ──acquire──► caller ──fire──► event queue
//!              ▲                    │                   │
//!              └───── release (clear) ◄─────────────────┘
//! ```
//!
//! Instances are cleared on release, never on acquire.

mod collection;
mod info;
mod pool;
mod traits;

pub use info::ReferencePoolInfo;
pub use pool::ReferencePool;
pub use traits::Reference;
