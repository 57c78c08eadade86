//! # Framework Context
//!
//! The one object the host holds. It owns the reference pool and the module
//! registry and is ticked once per frame.
//!
//! ```text
//! host frame ──► Framework::tick ──► ModuleRegistry::tick ──► EventManager (100)
//!                                                         └─► other modules
//! host exit  ──► Framework::shutdown_all ──► modules (reverse) ──► ReferencePool::clear_all
//! ```

use std::sync::Arc;

use gameframe_core::{FrameworkModule, FrameworkResult, ModuleRegistry, ReferencePool};

use crate::config::FrameworkConfig;
use crate::event_manager::EventManager;

/// Host-facing entry point: module access, per-frame tick, teardown.
///
/// Replaces a process-wide registry with an explicit value. Construct one at
/// startup and pass it to whatever needs module access.
pub struct Framework {
    /// Shared by every module that hands out or takes back payloads.
    references: Arc<ReferencePool>,
    /// Priority-ordered modules.
    modules: ModuleRegistry,
}

impl Framework {
    /// Framework version.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// Creates a framework with the built-in modules registered.
    ///
    /// Nothing is instantiated until first requested.
    ///
    /// # Errors
    ///
    /// Fails only if a built-in module is registered twice.
    pub fn new(config: &FrameworkConfig) -> FrameworkResult<Self> {
        let references = Arc::new(ReferencePool::new(config.reference.strict_check));
        let mut modules = ModuleRegistry::new();

        let mode = config.event.mode();
        let priority = config.event.priority;
        let pool = Arc::clone(&references);
        modules.register(move || Some(EventManager::new(mode, priority, Arc::clone(&pool))))?;

        tracing::info!(version = Self::VERSION, ?mode, priority, "framework created");
        Ok(Self {
            references,
            modules,
        })
    }

    /// The shared reference pool.
    #[inline]
    #[must_use]
    pub fn references(&self) -> &Arc<ReferencePool> {
        &self.references
    }

    /// Registers a factory for a host-defined module.
    ///
    /// # Errors
    ///
    /// See [`ModuleRegistry::register`].
    pub fn register_module<M, F>(&mut self, factory: F) -> FrameworkResult<()>
    where
        M: FrameworkModule,
        F: Fn() -> Option<M> + 'static,
    {
        self.modules.register(factory)
    }

    /// Returns module `M`, creating it on first use.
    ///
    /// # Errors
    ///
    /// See [`ModuleRegistry::get_module`].
    pub fn get_module<M: FrameworkModule>(&mut self) -> FrameworkResult<&mut M> {
        self.modules.get_module::<M>()
    }

    /// Returns true if `M` is live.
    #[must_use]
    pub fn has_module<M: FrameworkModule>(&self) -> bool {
        self.modules.has_module::<M>()
    }

    /// Names of the live modules in tick order.
    #[must_use]
    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.module_names()
    }

    /// Polls every module. Call once per frame from the driving thread.
    ///
    /// # Errors
    ///
    /// Returns the first module failure of this frame.
    pub fn tick(&mut self, elapse_seconds: f32, real_elapse_seconds: f32) -> FrameworkResult<()> {
        self.modules.tick(elapse_seconds, real_elapse_seconds)
    }

    /// Shuts every module down in reverse tick order and empties the pool.
    ///
    /// Idempotent. Modules are rebuilt on the next `get_module`. Pool handles
    /// taken from a module before this call are closed by it.
    pub fn shutdown_all(&mut self) {
        if !self.modules.is_empty() {
            self.modules.shutdown_all();
            tracing::info!("framework modules shut down");
        }

        self.references.clear_all();
    }
}

impl std::fmt::Debug for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framework")
            .field("references", &self.references)
            .field("modules", &self.modules)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gameframe_core::FrameworkError;

    #[test]
    fn test_event_manager_is_lazy() {
        let mut framework = Framework::new(&FrameworkConfig::default()).unwrap();
        assert!(!framework.has_module::<EventManager>());

        framework.get_module::<EventManager>().unwrap();
        assert!(framework.has_module::<EventManager>());
        assert_eq!(framework.module_names().len(), 1);
    }

    #[test]
    fn test_unknown_module_is_error() {
        struct Orphan;

        impl FrameworkModule for Orphan {
            fn tick(&mut self, _: f32, _: f32) -> FrameworkResult<()> {
                Ok(())
            }

            fn shutdown(&mut self) {}
        }

        let mut framework = Framework::new(&FrameworkConfig::default()).unwrap();
        assert!(matches!(
            framework.get_module::<Orphan>(),
            Err(FrameworkError::ModuleNotFound(_))
        ));
    }

    #[test]
    fn test_shutdown_all_twice() {
        let mut framework = Framework::new(&FrameworkConfig::default()).unwrap();
        framework.get_module::<EventManager>().unwrap();

        framework.shutdown_all();
        framework.shutdown_all();
        assert!(framework.module_names().is_empty());
        assert!(!Framework::VERSION.is_empty());
    }
}
