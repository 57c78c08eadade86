//! # Framework Error Types
//!
//! All errors that can occur in the reference pool, event pool and module registry.

use thiserror::Error;

use crate::event::EventId;

/// Errors that can occur in the framework core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameworkError {
    /// An argument was rejected before any state changed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Subscribing would break the multi-handler or duplicate-handler policy.
    #[error("event {id} does not allow {reason}")]
    DuplicateHandler {
        /// The event kind id.
        id: EventId,
        /// Which policy was violated.
        reason: &'static str,
    },

    /// A drained event had no subscriber and the pool does not allow that.
    ///
    /// The payload has already been released when this is reported.
    #[error("event {id} has no handler")]
    UnhandledEvent {
        /// The event kind id.
        id: EventId,
    },

    /// A pool operation was asked to do something its accounting forbids.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// No factory is registered for the requested module.
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// The module factory produced no usable instance.
    #[error("module creation failed: {0}")]
    ModuleCreationFailed(String),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for framework operations.
pub type FrameworkResult<T> = Result<T, FrameworkError>;
