//! ZOOMIST - server-side handle for a client zoom/pan image widget
//!
//! Re-exports all modules for use by binary targets.

// Core building blocks (listener registry, debouncer)
pub mod core;

// Widget protocol
pub mod error;
pub mod session;
pub mod transport;
pub mod widget;

// App modules
pub mod cli;
pub mod config;
pub mod replay;

// Re-export commonly used types
pub use crate::core::event_bus::{ListenerId, Registration};
pub use error::{Result, ZoomistError};
pub use session::Session;
pub use transport::{ChannelTransport, ClientMessage, ClientNotification, Transport};
pub use widget::{
    Command, ContainerSnapshot, Direction, EventDetail, EventKind, Fill, InteractionEvent, RequestId,
    SliderOptions, WidgetId, Zoomist, ZoomerOptions,
};
