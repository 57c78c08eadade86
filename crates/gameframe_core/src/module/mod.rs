//! # Framework Modules
//!
//! Long-lived subsystems driven once per frame by the host.

mod registry;

pub use registry::ModuleRegistry;

use crate::any::AsAny;
use crate::error::FrameworkResult;

/// A long-lived subsystem owned by the [`ModuleRegistry`].
///
/// Higher priority modules tick earlier and shut down later.
pub trait FrameworkModule: AsAny {
    /// Tick and shutdown priority. Read once, when the module is created.
    fn priority(&self) -> i32 {
        0
    }

    /// Per-frame polling.
    ///
    /// # Arguments
    ///
    /// * `elapse_seconds` - Logical time since the last tick
    /// * `real_elapse_seconds` - Wall time since the last tick
    ///
    /// # Errors
    ///
    /// Module specific; the registry reports it after ticking the rest.
    fn tick(&mut self, elapse_seconds: f32, real_elapse_seconds: f32) -> FrameworkResult<()>;

    /// Releases everything the module holds.
    fn shutdown(&mut self);

    /// Name used in logs.
    fn name(&self) -> &'static str {
        AsAny::type_name(self)
    }
}
