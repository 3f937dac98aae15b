//! Inbound side of the boundary: routes client notifications to handles.
//!
//! A [`Session`] owns every attached [`Zoomist`] (one per widget id) and is
//! where client events cross into the server. Continuous kinds (wheel, drag,
//! resize) are coalesced here, per widget and kind, before any listener sees
//! them; every other kind is delivered as soon as it arrives, after whatever
//! the same widget still has coalescing, so a trailing drag never lands after
//! its drag-end.
//!
//! There is no timer thread. The host calls [`Session::tick`] from its loop
//! (or sleeps until [`Session::next_due`]) to release coalesced events.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::core::TrailingDebouncer;
use crate::error::{Result, ZoomistError};
use crate::transport::{ClientNotification, Transport};
use crate::widget::{EventDetail, EventKind, InteractionEvent, WidgetId, Zoomist};

type DebounceKey = (WidgetId, EventKind);

pub struct Session {
    transport: Arc<dyn Transport>,
    widgets: HashMap<WidgetId, Zoomist>,
    debouncer: TrailingDebouncer<DebounceKey, InteractionEvent>,
    container_data_expression: String,
}

impl Session {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_config(transport, &Config::default())
    }

    pub fn with_config(transport: Arc<dyn Transport>, config: &Config) -> Self {
        Self {
            transport,
            widgets: HashMap::new(),
            debouncer: TrailingDebouncer::new(config.debounce_window()),
            container_data_expression: config.container_data_expression.clone(),
        }
    }

    // ========== Widgets ==========

    /// Create the handle for a new widget showing `src`.
    pub fn attach(&mut self, src: impl Into<String>) -> Result<WidgetId> {
        let id = WidgetId::new();
        let widget = Zoomist::with_id(
            id,
            src,
            Arc::clone(&self.transport),
            &self.container_data_expression,
        )?;
        log::info!("Session: attached widget {} ({})", id, widget.src());
        self.widgets.insert(id, widget);
        Ok(id)
    }

    /// Drop the handle: its listeners, pending reads and any coalesced events
    /// still waiting go with it.
    pub fn detach(&mut self, id: WidgetId) -> Option<Zoomist> {
        let widget = self.widgets.remove(&id)?;
        let dropped = self.debouncer.cancel_where(|(w, _)| *w == id);
        log::info!(
            "Session: detached widget {} ({} pending read(s), {} coalesced event(s) dropped)",
            id,
            widget.pending_reads(),
            dropped
        );
        Some(widget)
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Zoomist> {
        self.widgets.get(&id)
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut Zoomist> {
        self.widgets.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    // ========== Inbound ==========

    /// Route `notification`, stamping it with the current time.
    pub fn receive(&mut self, notification: ClientNotification) -> Result<()> {
        self.receive_at(notification, Instant::now())
    }

    /// Route `notification` as if it arrived at `now`.
    pub fn receive_at(&mut self, notification: ClientNotification, now: Instant) -> Result<()> {
        let id = notification.widget();
        let Some(widget) = self.widgets.get_mut(&id) else {
            log::warn!("Session: notification for unknown widget {}", id);
            return Err(ZoomistError::UnknownWidget(id));
        };

        match notification {
            ClientNotification::Event {
                name,
                detail,
                from_client,
                ..
            } => {
                let kind = EventKind::from_dom_name(&name)?;
                let event = InteractionEvent {
                    detail: EventDetail::decode(kind, &detail)?,
                    from_client,
                };
                if kind.is_debounced() {
                    self.debouncer.offer((id, kind), event, now);
                } else {
                    // Coalesced events of this widget happened first
                    for (_, pending) in self.debouncer.take_where(|(w, _)| *w == id) {
                        widget.deliver(pending);
                    }
                    widget.deliver(event);
                }
            }
            ClientNotification::ReadResult { request, value, .. } => {
                widget.resolve_read(request, &value)?;
            }
            ClientNotification::PropertySync { name, value, .. } => {
                widget.apply_client_property(&name, value);
            }
        }
        Ok(())
    }

    /// Release coalesced events that have been quiet for a full window.
    pub fn tick(&mut self) -> usize {
        self.tick_at(Instant::now())
    }

    /// Same as [`Session::tick`] at an explicit instant.
    /// Returns the number of events released.
    pub fn tick_at(&mut self, now: Instant) -> usize {
        let due = self.debouncer.take_due(now);
        let released = due.len();
        for ((id, _), event) in due {
            if let Some(widget) = self.widgets.get(&id) {
                widget.deliver(event);
            }
        }
        released
    }

    /// When the next coalesced event becomes due, if any is waiting.
    pub fn next_due(&self) -> Option<Instant> {
        self.debouncer.next_due()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("widgets", &self.widgets.len())
            .field("coalescing", &self.debouncer.pending_len())
            .finish()
    }
}
