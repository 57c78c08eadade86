//! Dispatch policy of an event pool.

bitflags::bitflags! {
    /// Policy flags fixed when an [`EventPool`](super::EventPool) is built.
    ///
    /// The empty set is the strictest mode: one handler per id, no duplicates,
    /// and an event nobody handles is an error.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventPoolMode: u8 {
        /// A drained event with no subscriber is dropped silently.
        const ALLOW_NO_HANDLER = 1 << 0;
        /// More than one handler may subscribe to the same id.
        const ALLOW_MULTI_HANDLER = 1 << 1;
        /// The same handler may subscribe to the same id twice.
        const ALLOW_DUPLICATE_HANDLER = 1 << 2;
    }
}
