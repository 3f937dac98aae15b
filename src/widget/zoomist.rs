//! The widget handle.
//!
//! One [`Zoomist`] per client widget instance. It pushes properties and
//! commands through its [`Transport`], keeps the last pushed or reported value
//! of every property for non-blocking getters, parks container reads until the
//! client answers, and fans interaction events out to per-kind listeners.

use serde_json::Value;
use std::sync::Arc;

use super::commands::Command;
use super::events::{EventDetail, EventKind, InteractionEvent};
use super::fetch::{ContainerSnapshot, PendingReads, RequestId};
use super::options::{SliderOptions, ZoomerOptions};
use super::props::{self, PropValue, Properties, Property};
use super::tokens::Fill;
use super::WidgetId;
use crate::core::{EventBus, Registration};
use crate::error::{Result, ZoomistError};
use crate::transport::Transport;

/// Read evaluated on the client to obtain the container geometry.
pub const CONTAINER_DATA_EXPRESSION: &str = "return this.containerData";

/// Server-side handle of one zoom/pan widget.
pub struct Zoomist {
    id: WidgetId,
    transport: Arc<dyn Transport>,
    props: Properties,
    listeners: EventBus<EventKind, InteractionEvent>,
    reads: PendingReads,
    container_data_expression: String,
}

impl Zoomist {
    /// Create a handle for a new widget showing `src` and push the source.
    pub fn new(src: impl Into<String>, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::with_id(WidgetId::new(), src, transport, CONTAINER_DATA_EXPRESSION)
    }

    pub(crate) fn with_id(
        id: WidgetId,
        src: impl Into<String>,
        transport: Arc<dyn Transport>,
        container_data_expression: &str,
    ) -> Result<Self> {
        let mut widget = Self {
            id,
            transport,
            props: Properties::new(),
            listeners: EventBus::new(),
            reads: PendingReads::new(),
            container_data_expression: container_data_expression.to_string(),
        };
        widget.set_src(src)?;
        Ok(widget)
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Read-only view of every cached property
    pub fn properties(&self) -> &Properties {
        &self.props
    }

    // ========== Properties ==========

    /// Push, then cache. A failed push leaves the cached value untouched.
    fn push(&mut self, name: &'static str, value: PropValue) -> Result<()> {
        self.transport.set_property(self.id, name, value.to_json())?;
        log::debug!("Zoomist {}: {} = {:?}", self.id, name, value);
        self.props.set(name, value);
        Ok(())
    }

    fn push_flag(&mut self, prop: Property<bool>, value: bool) -> Result<()> {
        self.push(prop.name, PropValue::Bool(value))
    }

    fn push_ratio(&mut self, prop: Property<f64>, value: f64) -> Result<()> {
        if !(value.is_finite() && value >= 0.0) {
            return Err(ZoomistError::invalid(
                prop.name,
                format!("expected a non-negative number, got {value}"),
            ));
        }
        self.push(prop.name, PropValue::Number(value))
    }

    /// Set the image source url.
    pub fn set_src(&mut self, src: impl Into<String>) -> Result<()> {
        let src = src.into();
        if src.is_empty() {
            return Err(ZoomistError::invalid(props::SRC, "image source must not be empty"));
        }
        self.push(props::SRC, PropValue::Str(src))
    }

    pub fn src(&self) -> &str {
        self.props.get_str(props::SRC).unwrap_or_default()
    }

    /// Show or hide the slider. Showing it this way uses the client's default
    /// slider options and drops any options set before.
    pub fn set_slider(&mut self, visible: bool) -> Result<()> {
        self.push_flag(props::SLIDER, visible)
    }

    /// Show the slider with explicit options. Unset fields are left to the
    /// client's defaults.
    pub fn set_slider_options(&mut self, options: SliderOptions) -> Result<()> {
        if let Some(max_ratio) = options.max_ratio {
            if !(max_ratio.is_finite() && max_ratio >= 0.0) {
                return Err(ZoomistError::invalid(
                    "slider.maxRatio",
                    format!("expected a non-negative number, got {max_ratio}"),
                ));
            }
        }
        self.push(props::SLIDER.name, PropValue::Json(options.to_bundle().into_value()))
    }

    /// Whether the slider is shown (true for either overload of the setter).
    pub fn is_slider(&self) -> bool {
        match self.props.get(props::SLIDER.name) {
            Some(PropValue::Json(_)) => true,
            _ => self.props.bool_or_default(&props::SLIDER),
        }
    }

    /// Options last set with [`Zoomist::set_slider_options`] (or reported by
    /// the client); None when the slider was toggled with a plain flag.
    pub fn slider_options(&self) -> Result<Option<SliderOptions>> {
        self.props
            .get_json(props::SLIDER.name)
            .map(SliderOptions::from_value)
            .transpose()
    }

    /// Show or hide the zoom in/out controls with the client's default options.
    pub fn set_zoomer(&mut self, visible: bool) -> Result<()> {
        self.push_flag(props::ZOOMER, visible)
    }

    /// Show the zoom in/out controls with explicit options.
    pub fn set_zoomer_options(&mut self, options: ZoomerOptions) -> Result<()> {
        self.push(props::ZOOMER.name, PropValue::Json(options.to_bundle().into_value()))
    }

    pub fn is_zoomer(&self) -> bool {
        match self.props.get(props::ZOOMER.name) {
            Some(PropValue::Json(_)) => true,
            _ => self.props.bool_or_default(&props::ZOOMER),
        }
    }

    pub fn zoomer_options(&self) -> Result<Option<ZoomerOptions>> {
        self.props
            .get_json(props::ZOOMER.name)
            .map(ZoomerOptions::from_value)
            .transpose()
    }

    /// Set how the image fills the container. `None` is rejected and the
    /// previous mode is kept.
    pub fn set_fill(&mut self, fill: Option<Fill>) -> Result<()> {
        let fill = fill.ok_or_else(|| ZoomistError::invalid(props::FILL.name, "fill mode must be set"))?;
        self.push(props::FILL.name, PropValue::Str(fill.token().to_string()))
    }

    /// Current fill mode. A token the client reported that this side does not
    /// know is an error, not a silent default.
    pub fn fill(&self) -> Result<Fill> {
        match self.props.get(props::FILL.name) {
            Some(PropValue::Str(token)) => Fill::from_token(token),
            Some(other) => Err(ZoomistError::UnrecognizedToken {
                kind: "fill",
                token: other.to_json().to_string(),
            }),
            None => Ok(props::FILL.default),
        }
    }

    pub fn set_draggable(&mut self, draggable: bool) -> Result<()> {
        self.push_flag(props::DRAGGABLE, draggable)
    }

    pub fn is_draggable(&self) -> bool {
        self.props.bool_or_default(&props::DRAGGABLE)
    }

    /// Zoom with the mouse wheel.
    pub fn set_wheelable(&mut self, wheelable: bool) -> Result<()> {
        self.push_flag(props::WHEELABLE, wheelable)
    }

    pub fn is_wheelable(&self) -> bool {
        self.props.bool_or_default(&props::WHEELABLE)
    }

    /// Zoom by pinching (touch devices only).
    pub fn set_pinchable(&mut self, pinchable: bool) -> Result<()> {
        self.push_flag(props::PINCHABLE, pinchable)
    }

    pub fn is_pinchable(&self) -> bool {
        self.props.bool_or_default(&props::PINCHABLE)
    }

    /// Allow dragging the image out of the container bounds.
    pub fn set_bounds(&mut self, bounds: bool) -> Result<()> {
        self.push_flag(props::BOUNDS, bounds)
    }

    pub fn is_bounds(&self) -> bool {
        self.props.bool_or_default(&props::BOUNDS)
    }

    /// Ratio applied per zoom step.
    pub fn set_zoom_ratio(&mut self, ratio: f64) -> Result<()> {
        self.push_ratio(props::ZOOM_RATIO, ratio)
    }

    pub fn zoom_ratio(&self) -> f64 {
        self.props.f64_or_default(&props::ZOOM_RATIO)
    }

    pub fn set_max_ratio(&mut self, ratio: f64) -> Result<()> {
        self.push_ratio(props::MAX_RATIO, ratio)
    }

    pub fn max_ratio(&self) -> f64 {
        self.props.f64_or_default(&props::MAX_RATIO)
    }

    /// Container height as a CSS length (`"400px"`, `"auto"`, ...).
    pub fn set_height(&mut self, height: impl Into<String>) -> Result<()> {
        self.push(props::HEIGHT, PropValue::Str(height.into()))
    }

    pub fn height(&self) -> Option<&str> {
        self.props.get_str(props::HEIGHT)
    }

    /// Record a property value reported by the client. `null` clears it, so
    /// the getter falls back to its default.
    pub fn apply_client_property(&mut self, name: &str, value: Value) {
        match PropValue::from_json(value) {
            Some(value) => {
                log::debug!("Zoomist {}: client reported {} = {:?}", self.id, name, value);
                self.props.set(name, value);
            }
            None => {
                log::debug!("Zoomist {}: client cleared {}", self.id, name);
                self.props.remove(name);
            }
        }
    }

    // ========== Commands ==========

    /// Dispatch `command`. Returns once it is handed to the transport; there
    /// is no acknowledgement from the client.
    pub fn invoke(&self, command: Command) -> Result<()> {
        if !command.has_finite_args() {
            return Err(ZoomistError::invalid(
                command.function(),
                format!("arguments must be finite: {command:?}"),
            ));
        }
        self.transport.call_function(self.id, command.function(), command.args())?;
        log::debug!("Zoomist {}: {:?}", self.id, command);
        Ok(())
    }

    /// Zoom by a relative ratio (negative zooms out).
    pub fn zoom(&self, ratio: f64) -> Result<()> {
        self.invoke(Command::Zoom { ratio })
    }

    /// Move the image by a relative offset.
    pub fn move_by(&self, dx: f64, dy: f64) -> Result<()> {
        self.invoke(Command::Move { dx, dy })
    }

    /// Move the image to an absolute position.
    pub fn move_to(&self, x: f64, y: f64) -> Result<()> {
        self.invoke(Command::MoveTo { x, y })
    }

    pub fn slide_to(&self, value: f64) -> Result<()> {
        self.invoke(Command::SlideTo { value })
    }

    /// Back to the initial configuration and position.
    pub fn reset(&self) -> Result<()> {
        self.invoke(Command::Reset)
    }

    // ========== Reads ==========

    /// Ask the client for its container geometry.
    ///
    /// `callback` runs exactly once, from [`Zoomist::resolve_read`], when the
    /// matching answer arrives. If the client never answers it never runs;
    /// callers needing a bound impose their own timeout.
    pub fn fetch_container_data<F>(&self, callback: F) -> Result<RequestId>
    where
        F: FnOnce(ContainerSnapshot) + Send + 'static,
    {
        let request = self.reads.register(Box::new(move |value: &Value| -> Result<()> {
            callback(ContainerSnapshot::from_value(value)?);
            Ok(())
        }));

        if let Err(e) = self
            .transport
            .execute_read(self.id, request, &self.container_data_expression)
        {
            self.reads.cancel(request);
            return Err(e);
        }
        log::debug!("Zoomist {}: container data requested ({})", self.id, request);
        Ok(request)
    }

    /// Deliver the client's answer to read `request`.
    ///
    /// Ok(false) when nothing waits on `request`. A malformed answer is an
    /// error and consumes the read without running its callback.
    pub fn resolve_read(&self, request: RequestId, value: &Value) -> Result<bool> {
        let resolved = self.reads.resolve(request, value)?;
        if !resolved {
            log::warn!("Zoomist {}: answer for unknown read {}", self.id, request);
        }
        Ok(resolved)
    }

    pub fn pending_reads(&self) -> usize {
        self.reads.len()
    }

    // ========== Events ==========

    /// Subscribe to one event kind. Listeners run in subscription order.
    pub fn add_listener<F>(&self, kind: EventKind, listener: F) -> Registration
    where
        F: Fn(&InteractionEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(kind, listener)
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.subscriber_count(kind)
    }

    /// Fire a server-side event (`from_client == false`).
    pub fn fire(&self, detail: EventDetail) -> usize {
        self.deliver(InteractionEvent::synthetic(detail))
    }

    /// Hand an event that crossed the boundary to the current listeners.
    pub fn deliver(&self, event: InteractionEvent) -> usize {
        let delivered = self.listeners.emit(event.kind(), &event);
        log::trace!("Zoomist {}: {} -> {} listener(s)", self.id, event.kind(), delivered);
        delivered
    }
}

impl std::fmt::Debug for Zoomist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zoomist")
            .field("id", &self.id)
            .field("src", &self.src())
            .field("properties", &self.props.len())
            .field("pending_reads", &self.reads.len())
            .finish()
    }
}
