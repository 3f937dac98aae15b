//! Interaction event catalog.
//!
//! The client raises DOM events named `zoomist-<kind>` with an optional
//! `detail` object. [`EventKind`] is the tag (what listeners subscribe to),
//! [`EventDetail`] the tag plus its payload, and [`InteractionEvent`] what a
//! listener finally receives.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ZoomistError};

/// Event tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Ready,
    Zoom,
    Wheel,
    DragStart,
    Drag,
    DragEnd,
    SlideStart,
    Slide,
    SlideEnd,
    PinchStart,
    Pinch,
    PinchEnd,
    Resize,
    Reset,
    Update,
    Destroy,
}

impl EventKind {
    pub const ALL: [EventKind; 16] = [
        EventKind::Ready,
        EventKind::Zoom,
        EventKind::Wheel,
        EventKind::DragStart,
        EventKind::Drag,
        EventKind::DragEnd,
        EventKind::SlideStart,
        EventKind::Slide,
        EventKind::SlideEnd,
        EventKind::PinchStart,
        EventKind::Pinch,
        EventKind::PinchEnd,
        EventKind::Resize,
        EventKind::Reset,
        EventKind::Update,
        EventKind::Destroy,
    ];

    /// DOM event name dispatched by the client element
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::Ready => "zoomist-ready",
            EventKind::Zoom => "zoomist-zoom",
            EventKind::Wheel => "zoomist-wheel",
            EventKind::DragStart => "zoomist-drag-start",
            EventKind::Drag => "zoomist-drag",
            EventKind::DragEnd => "zoomist-drag-end",
            EventKind::SlideStart => "zoomist-slide-start",
            EventKind::Slide => "zoomist-slide",
            EventKind::SlideEnd => "zoomist-slide-end",
            EventKind::PinchStart => "zoomist-pinch-start",
            EventKind::Pinch => "zoomist-pinch",
            EventKind::PinchEnd => "zoomist-pinch-end",
            EventKind::Resize => "zoomist-resize",
            EventKind::Reset => "zoomist-reset",
            EventKind::Update => "zoomist-update",
            EventKind::Destroy => "zoomist-destroy",
        }
    }

    pub fn from_dom_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.dom_name() == name)
            .ok_or_else(|| ZoomistError::UnrecognizedToken {
                kind: "event",
                token: name.to_string(),
            })
    }

    /// Wheel, drag and resize fire continuously and are coalesced
    /// (trailing edge) before they reach listeners.
    pub fn is_debounced(self) -> bool {
        matches!(self, EventKind::Wheel | EventKind::Drag | EventKind::Resize)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dom_name())
    }
}

/// Event tag plus payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum EventDetail {
    Ready,
    Zoom { ratio: f64 },
    Wheel,
    DragStart { offset_x: f64, offset_y: f64 },
    Drag { offset_x: f64, offset_y: f64 },
    DragEnd { offset_x: f64, offset_y: f64 },
    SlideStart { value: f64 },
    Slide { value: f64 },
    SlideEnd { value: f64 },
    PinchStart,
    Pinch,
    PinchEnd,
    Resize,
    Reset,
    Update,
    Destroy,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Offset {
    offset_x: f64,
    offset_y: f64,
}

#[derive(Deserialize)]
struct Ratio {
    ratio: f64,
}

#[derive(Deserialize)]
struct Slider {
    value: f64,
}

impl EventDetail {
    pub fn kind(&self) -> EventKind {
        match self {
            EventDetail::Ready => EventKind::Ready,
            EventDetail::Zoom { .. } => EventKind::Zoom,
            EventDetail::Wheel => EventKind::Wheel,
            EventDetail::DragStart { .. } => EventKind::DragStart,
            EventDetail::Drag { .. } => EventKind::Drag,
            EventDetail::DragEnd { .. } => EventKind::DragEnd,
            EventDetail::SlideStart { .. } => EventKind::SlideStart,
            EventDetail::Slide { .. } => EventKind::Slide,
            EventDetail::SlideEnd { .. } => EventKind::SlideEnd,
            EventDetail::PinchStart => EventKind::PinchStart,
            EventDetail::Pinch => EventKind::Pinch,
            EventDetail::PinchEnd => EventKind::PinchEnd,
            EventDetail::Resize => EventKind::Resize,
            EventDetail::Reset => EventKind::Reset,
            EventDetail::Update => EventKind::Update,
            EventDetail::Destroy => EventKind::Destroy,
        }
    }

    /// Build the payload of `kind` from the DOM event's `detail` object.
    /// Kinds without payload ignore `detail` entirely.
    pub fn decode(kind: EventKind, detail: &Value) -> Result<Self> {
        fn parse<'a, T: Deserialize<'a>>(kind: EventKind, detail: &'a Value) -> Result<T> {
            T::deserialize(detail).map_err(|e| ZoomistError::malformed(kind.dom_name(), e))
        }

        Ok(match kind {
            EventKind::Ready => EventDetail::Ready,
            EventKind::Zoom => EventDetail::Zoom {
                ratio: parse::<Ratio>(kind, detail)?.ratio,
            },
            EventKind::Wheel => EventDetail::Wheel,
            EventKind::DragStart | EventKind::Drag | EventKind::DragEnd => {
                let Offset { offset_x, offset_y } = parse(kind, detail)?;
                match kind {
                    EventKind::DragStart => EventDetail::DragStart { offset_x, offset_y },
                    EventKind::Drag => EventDetail::Drag { offset_x, offset_y },
                    _ => EventDetail::DragEnd { offset_x, offset_y },
                }
            }
            EventKind::SlideStart | EventKind::Slide | EventKind::SlideEnd => {
                let Slider { value } = parse(kind, detail)?;
                match kind {
                    EventKind::SlideStart => EventDetail::SlideStart { value },
                    EventKind::Slide => EventDetail::Slide { value },
                    _ => EventDetail::SlideEnd { value },
                }
            }
            EventKind::PinchStart => EventDetail::PinchStart,
            EventKind::Pinch => EventDetail::Pinch,
            EventKind::PinchEnd => EventDetail::PinchEnd,
            EventKind::Resize => EventDetail::Resize,
            EventKind::Reset => EventDetail::Reset,
            EventKind::Update => EventDetail::Update,
            EventKind::Destroy => EventDetail::Destroy,
        })
    }
}

/// What a listener receives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionEvent {
    #[serde(flatten)]
    pub detail: EventDetail,
    /// true when raised by user interaction on the client,
    /// false for events fired programmatically on the server
    pub from_client: bool,
}

impl InteractionEvent {
    pub fn from_client(detail: EventDetail) -> Self {
        Self {
            detail,
            from_client: true,
        }
    }

    pub fn synthetic(detail: EventDetail) -> Self {
        Self {
            detail,
            from_client: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.detail.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dom_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_dom_name(kind.dom_name()).unwrap(), kind);
        }
        assert!(matches!(
            EventKind::from_dom_name("zoomist-spin"),
            Err(ZoomistError::UnrecognizedToken { kind: "event", .. })
        ));
    }

    #[test]
    fn test_debounced_kinds() {
        let debounced: Vec<_> = EventKind::ALL.into_iter().filter(|k| k.is_debounced()).collect();
        assert_eq!(debounced, vec![EventKind::Wheel, EventKind::Drag, EventKind::Resize]);
    }

    #[test]
    fn test_decode_payloads() {
        let drag = EventDetail::decode(EventKind::Drag, &json!({"offsetX": 12.5, "offsetY": -3})).unwrap();
        assert_eq!(drag, EventDetail::Drag { offset_x: 12.5, offset_y: -3.0 });

        let slide = EventDetail::decode(EventKind::SlideEnd, &json!({"value": 40})).unwrap();
        assert_eq!(slide, EventDetail::SlideEnd { value: 40.0 });

        let zoom = EventDetail::decode(EventKind::Zoom, &json!({"ratio": 1.5})).unwrap();
        assert_eq!(zoom.kind(), EventKind::Zoom);

        // No payload: detail ignored, even when absent
        assert_eq!(EventDetail::decode(EventKind::Wheel, &Value::Null).unwrap(), EventDetail::Wheel);
    }

    #[test]
    fn test_decode_missing_field() {
        let err = EventDetail::decode(EventKind::DragStart, &json!({"offsetX": 1})).unwrap_err();
        assert!(matches!(err, ZoomistError::MalformedPayload { .. }));
        assert!(EventDetail::decode(EventKind::Slide, &Value::Null).is_err());
    }

    #[test]
    fn test_serialize() {
        let e = InteractionEvent::from_client(EventDetail::DragEnd { offset_x: 1.0, offset_y: 2.0 });
        assert_eq!(
            serde_json::to_value(e).unwrap(),
            json!({"type": "drag-end", "offsetX": 1.0, "offsetY": 2.0, "fromClient": true})
        );
        let e = InteractionEvent::synthetic(EventDetail::Ready);
        assert_eq!(serde_json::to_value(e).unwrap(), json!({"type": "ready", "fromClient": false}));
    }
}
