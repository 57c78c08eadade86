//! # Module Registry
//!
//! Priority-ordered, lazily created, long-lived subsystems.
//!
//! ```text
//! tick:      priority 100 ──► priority 10 ──► priority 0
//! shutdown:  priority 0   ──► priority 10 ──► priority 100
//! ```

use std::any::TypeId;
use std::collections::HashMap;

use crate::any::AsAny;
use crate::error::{FrameworkError, FrameworkResult};

use super::FrameworkModule;

/// Builds a module on first use. `None` means construction failed.
type ModuleFactory = Box<dyn Fn() -> Option<Box<dyn FrameworkModule>>>;

/// A live module and the priority it had when it was created.
struct ModuleEntry {
    module: Box<dyn FrameworkModule>,
    priority: i32,
}

impl ModuleEntry {
    fn is<M: FrameworkModule>(&self) -> bool {
        AsAny::as_any(&*self.module).type_id() == TypeId::of::<M>()
    }
}

/// Priority-ordered collection of framework modules.
///
/// Modules are resolved through a factory table filled at startup, created on
/// first [`get_module`](Self::get_module) and kept sorted by descending
/// priority. Each module type exists at most once.
///
/// # Example
///
/// ```rust
/// use gameframe_core::{FrameworkModule, FrameworkResult, ModuleRegistry};
///
/// #[derive(Default)]
/// struct Clock { elapsed: f32 }
///
/// impl FrameworkModule for Clock {
///     fn tick(&mut self, elapse_seconds: f32, _real: f32) -> FrameworkResult<()> {
///         self.elapsed += elapse_seconds;
///         Ok(())
///     }
///     fn shutdown(&mut self) {}
/// }
///
/// let mut registry = ModuleRegistry::new();
/// registry.register(|| Some(Clock::default())).unwrap();
///
/// registry.get_module::<Clock>().unwrap();
/// registry.tick(0.5, 0.5).unwrap();
/// assert_eq!(registry.get_module::<Clock>().unwrap().elapsed, 0.5);
/// ```
#[derive(Default)]
pub struct ModuleRegistry {
    /// Factories by module type.
    factories: HashMap<TypeId, (&'static str, ModuleFactory)>,
    /// Live modules, sorted by descending priority.
    modules: Vec<ModuleEntry>,
}

impl ModuleRegistry {
    /// Creates an empty registry with no factories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the factory that builds `M`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameworkError::InvalidArgument`] if `M` already has a factory.
    pub fn register<M, F>(&mut self, factory: F) -> FrameworkResult<()>
    where
        M: FrameworkModule,
        F: Fn() -> Option<M> + 'static,
    {
        let name = std::any::type_name::<M>();
        if self.factories.contains_key(&TypeId::of::<M>()) {
            return Err(FrameworkError::InvalidArgument(format!(
                "module '{name}' is already registered"
            )));
        }

        let factory: ModuleFactory =
            Box::new(move || factory().map(|module| Box::new(module) as Box<dyn FrameworkModule>));
        self.factories.insert(TypeId::of::<M>(), (name, factory));
        Ok(())
    }

    /// Returns true if a factory for `M` is registered.
    #[must_use]
    pub fn is_registered<M: FrameworkModule>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<M>())
    }

    /// Returns true if `M` has been created and not shut down.
    #[must_use]
    pub fn has_module<M: FrameworkModule>(&self) -> bool {
        self.modules.iter().any(ModuleEntry::is::<M>)
    }

    /// Returns the number of live modules.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if no module is live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Names of the live modules in tick order.
    #[must_use]
    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules
            .iter()
            .map(|entry| entry.module.name())
            .collect()
    }

    /// Returns the module `M`, creating it on first use.
    ///
    /// # Errors
    ///
    /// - [`FrameworkError::ModuleNotFound`] if no factory is registered for `M`
    /// - [`FrameworkError::ModuleCreationFailed`] if the factory returns `None`
    pub fn get_module<M: FrameworkModule>(&mut self) -> FrameworkResult<&mut M> {
        let index = match self.modules.iter().position(ModuleEntry::is::<M>) {
            Some(index) => index,
            None => self.create_module::<M>()?,
        };

        AsAny::as_any_mut(&mut *self.modules[index].module)
            .downcast_mut::<M>()
            .ok_or_else(|| FrameworkError::ModuleCreationFailed(std::any::type_name::<M>().to_owned()))
    }

    /// Ticks every module, highest priority first.
    ///
    /// Every module is ticked even if an earlier one fails.
    ///
    /// # Errors
    ///
    /// Returns the first module failure of this tick.
    pub fn tick(&mut self, elapse_seconds: f32, real_elapse_seconds: f32) -> FrameworkResult<()> {
        let mut first_error = None;
        for entry in &mut self.modules {
            if let Err(error) = entry.module.tick(elapse_seconds, real_elapse_seconds) {
                tracing::warn!(module = entry.module.name(), %error, "module tick failed");
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Shuts every module down, lowest priority first, then empties the registry.
    ///
    /// Factories are kept, so modules can be created again afterwards.
    /// Calling this on an empty registry does nothing.
    pub fn shutdown_all(&mut self) {
        for entry in self.modules.iter_mut().rev() {
            tracing::debug!(module = entry.module.name(), priority = entry.priority, "shutting down module");
            entry.module.shutdown();
        }
        self.modules.clear();
    }

    fn create_module<M: FrameworkModule>(&mut self) -> FrameworkResult<usize> {
        let name = std::any::type_name::<M>();
        let (_, factory) = self
            .factories
            .get(&TypeId::of::<M>())
            .ok_or_else(|| FrameworkError::ModuleNotFound(name.to_owned()))?;

        let module = factory().ok_or_else(|| FrameworkError::ModuleCreationFailed(name.to_owned()))?;
        let priority = module.priority();

        // Before the first strictly lower priority: ties keep insertion order.
        let index = self
            .modules
            .iter()
            .position(|entry| priority > entry.priority)
            .unwrap_or(self.modules.len());
        self.modules.insert(index, ModuleEntry { module, priority });

        tracing::debug!(module = name, priority, index, "module created");
        Ok(index)
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("registered", &self.factories.values().map(|(name, _)| *name).collect::<Vec<_>>())
            .field("modules", &self.module_names())
            .finish()
    }
}
