//! Core building blocks - listener registry and trailing debouncer
//!
//! Independent of the widget protocol; `widget` and `session` are built on them.

pub mod debounce;
pub mod event_bus;

// Re-exports for convenience
pub use debounce::TrailingDebouncer;
pub use event_bus::{EventBus, ListenerId, Registration};
