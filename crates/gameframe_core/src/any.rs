//! Type-erased views used by the reference pool and the module registry.

use std::any::Any;

/// Erased access to a concrete `'static` type.
///
/// Implemented for every sized `Any + Send` type, so trait objects whose trait
/// has `AsAny` as a supertrait can be downcast and keyed by their concrete type.
///
/// Call these through a dereferenced trait object (`(*boxed).as_any()`), never
/// on the `Box` itself, or the `Box` type is what gets erased.
pub trait AsAny: Any + Send {
    /// Borrows the value as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Borrows the value as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Converts the boxed value into a boxed `dyn Any`.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;

    /// Name of the concrete type.
    fn type_name(&self) -> &'static str;
}

impl<T: Any + Send> AsAny for T {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
