//! Transport over a crossbeam channel.
//!
//! The host owns the receiving end and forwards messages to the client in
//! whatever encoding it uses. Once the receiver is dropped every send fails
//! with `TransportUnavailable`.

use crossbeam_channel::{Receiver, Sender, unbounded};

use super::{ClientMessage, Transport};
use crate::error::{Result, ZoomistError};

#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: Sender<ClientMessage>,
}

impl ChannelTransport {
    /// Unbounded channel; returns the transport and the host-side receiver.
    pub fn new() -> (Self, Receiver<ClientMessage>) {
        let (tx, rx) = unbounded();
        (Self { sender: tx }, rx)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, message: ClientMessage) -> Result<()> {
        let op = message.op_name();
        let widget = message.widget();
        self.sender.send(message).map_err(|_| {
            log::warn!("ChannelTransport: client gone, {} for {} not delivered", op, widget);
            ZoomistError::TransportUnavailable(format!("client channel closed ({op} for widget {widget})"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WidgetId;
    use serde_json::json;

    #[test]
    fn test_in_order_delivery() {
        let (transport, rx) = ChannelTransport::new();
        let widget = WidgetId::new();

        transport.call_function(widget, "zoom", vec![json!(0.5)]).unwrap();
        transport.call_function(widget, "reset", vec![]).unwrap();

        let names: Vec<_> = rx
            .try_iter()
            .map(|m| match m {
                ClientMessage::CallFunction { function, .. } => function,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(names, vec!["zoom", "reset"]);
    }

    #[test]
    fn test_dropped_receiver() {
        let (transport, rx) = ChannelTransport::new();
        drop(rx);

        let err = transport.set_property(WidgetId::new(), "src", json!("a.jpg")).unwrap_err();
        assert!(matches!(err, ZoomistError::TransportUnavailable(_)));
    }
}
