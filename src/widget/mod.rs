//! Server-side handle of one client zoom/pan widget and its protocol types.
//!
//! - [`Zoomist`] - the handle: properties, commands, reads, listeners
//! - [`options`] - slider / zoomer option bundles
//! - [`tokens`] - enums carried as string tokens
//! - [`events`] - interaction event catalog
//! - [`fetch`] - request-correlated client reads
//! - [`props`] - cached property values and their defaults
//! - [`commands`] - fire-and-forget client calls

pub mod commands;
pub mod events;
pub mod fetch;
pub mod options;
pub mod props;
pub mod tokens;
mod zoomist;

pub use commands::Command;
pub use events::{EventDetail, EventKind, InteractionEvent};
pub use fetch::{ContainerSnapshot, RequestId};
pub use options::{OptionBundle, SliderOptions, ZoomerOptions};
pub use tokens::{Direction, Fill};
pub use zoomist::{CONTAINER_DATA_EXPRESSION, Zoomist};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of one widget instance, shared by everything that crosses the
/// boundary on its behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(Uuid);

impl WidgetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for WidgetId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
