//! Boundary between widget handles and the client.
//!
//! # Purpose
//!
//! Handles never talk to the client directly. Outbound traffic goes through a
//! [`Transport`] as [`ClientMessage`]s; inbound traffic arrives at the
//! [`Session`](crate::session::Session) as [`ClientNotification`]s.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐   ClientMessage (setProperty/callFunction/executeRead)   ┌──────────┐
//! │  Zoomist handle   │  ──────────────────────────────────────────────────────▶ │  Client  │
//! │                   │                                                          │  widget  │
//! │  Session::receive │  ◀────────────────────────────────────────────────────── │          │
//! └───────────────────┘   ClientNotification (event/readResult/propertySync)     └──────────┘
//! ```
//!
//! The bit-level encoding belongs to whatever hosts the widget; both message
//! types are plain serde enums so a host can carry them as JSON.

mod channel;

pub use channel::ChannelTransport;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::widget::{RequestId, WidgetId};

/// Server → client operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Set a scalar or structured property on the widget element
    SetProperty {
        widget: WidgetId,
        name: String,
        value: Value,
    },
    /// Invoke a function on the widget element, no return value
    CallFunction {
        widget: WidgetId,
        function: String,
        args: Vec<Value>,
    },
    /// Evaluate `expression` against the widget element and answer with a
    /// `readResult` carrying the same request id
    ExecuteRead {
        widget: WidgetId,
        request: RequestId,
        expression: String,
    },
}

impl ClientMessage {
    pub fn widget(&self) -> WidgetId {
        match self {
            ClientMessage::SetProperty { widget, .. }
            | ClientMessage::CallFunction { widget, .. }
            | ClientMessage::ExecuteRead { widget, .. } => *widget,
        }
    }

    pub fn op_name(&self) -> &'static str {
        match self {
            ClientMessage::SetProperty { .. } => "setProperty",
            ClientMessage::CallFunction { .. } => "callFunction",
            ClientMessage::ExecuteRead { .. } => "executeRead",
        }
    }
}

fn from_client_default() -> bool {
    true
}

/// Client → server notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientNotification {
    /// DOM event raised by the widget element (`zoomist-drag`, ...)
    Event {
        widget: WidgetId,
        name: String,
        #[serde(default)]
        detail: Value,
        #[serde(default = "from_client_default")]
        from_client: bool,
    },
    /// Answer to an `executeRead`
    ReadResult {
        widget: WidgetId,
        request: RequestId,
        value: Value,
    },
    /// Property changed on the client side
    PropertySync {
        widget: WidgetId,
        name: String,
        value: Value,
    },
}

impl ClientNotification {
    pub fn widget(&self) -> WidgetId {
        match self {
            ClientNotification::Event { widget, .. }
            | ClientNotification::ReadResult { widget, .. }
            | ClientNotification::PropertySync { widget, .. } => *widget,
        }
    }
}

/// Outbound half of the boundary.
///
/// Implementations deliver in call order and must not retry: a failed send is
/// reported as [`ZoomistError::TransportUnavailable`](crate::ZoomistError::TransportUnavailable)
/// and the caller decides what to do. Replaying a relative move or zoom would
/// apply it twice.
pub trait Transport: Send + Sync {
    fn send(&self, message: ClientMessage) -> Result<()>;

    fn set_property(&self, widget: WidgetId, name: &str, value: Value) -> Result<()> {
        self.send(ClientMessage::SetProperty {
            widget,
            name: name.to_string(),
            value,
        })
    }

    fn call_function(&self, widget: WidgetId, function: &str, args: Vec<Value>) -> Result<()> {
        self.send(ClientMessage::CallFunction {
            widget,
            function: function.to_string(),
            args,
        })
    }

    fn execute_read(&self, widget: WidgetId, request: RequestId, expression: &str) -> Result<()> {
        self.send(ClientMessage::ExecuteRead {
            widget,
            request,
            expression: expression.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_json_shape() {
        let widget = WidgetId::new();
        let msg = ClientMessage::ExecuteRead {
            widget,
            request: RequestId(7),
            expression: "return this.containerData".into(),
        };
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["op"], json!("executeRead"));
        assert_eq!(v["request"], json!(7));
        assert_eq!(v["widget"], json!(widget.to_string()));
        assert_eq!(msg.op_name(), "executeRead");
    }

    #[test]
    fn test_notification_defaults() {
        let widget = WidgetId::new();
        let n: ClientNotification = serde_json::from_value(json!({
            "kind": "event",
            "widget": widget.to_string(),
            "name": "zoomist-wheel",
        }))
        .unwrap();
        assert_eq!(
            n,
            ClientNotification::Event {
                widget,
                name: "zoomist-wheel".into(),
                detail: Value::Null,
                from_client: true,
            }
        );

        let n: ClientNotification = serde_json::from_value(json!({
            "kind": "readResult",
            "widget": widget.to_string(),
            "request": 3,
            "value": {"width": 1},
        }))
        .unwrap();
        assert_eq!(n.widget(), widget);
    }
}
