//! The capability every pooled object implements.

use crate::any::AsAny;

/// An object that can be recycled by the [`ReferencePool`](super::ReferencePool).
///
/// The pool keys instances by concrete type and calls [`clear`](Self::clear)
/// when an instance is released, before it becomes available again. An
/// acquired instance therefore always starts from its cleared state.
///
/// # Example
///
/// ```rust
/// use gameframe_core::Reference;
///
/// #[derive(Default)]
/// struct DamagePayload {
///     target: u32,
///     amount: u32,
/// }
///
/// impl Reference for DamagePayload {
///     fn clear(&mut self) {
///         self.target = 0;
///         self.amount = 0;
///     }
/// }
/// ```
pub trait Reference: AsAny {
    /// Erases all payload state so the instance can be handed out again.
    fn clear(&mut self);
}
