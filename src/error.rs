//! Error type shared by the widget handle, the transport and the session.

use thiserror::Error;

use crate::widget::WidgetId;

/// Errors surfaced synchronously to the code driving a widget.
#[derive(Debug, Error)]
pub enum ZoomistError {
    /// A setter received a value it cannot push (unset enum, negative ratio, ...).
    /// Nothing was written or transmitted.
    #[error("invalid argument for `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A stored or reported token does not match any known variant.
    #[error("unrecognized {kind} token: {token:?}")]
    UnrecognizedToken { kind: &'static str, token: String },

    /// The client connection is gone. Never retried here.
    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),

    /// The client sent JSON that does not match the declared payload schema.
    #[error("malformed {context} payload: {source}")]
    MalformedPayload {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Notification addressed to a widget that is not attached to the session.
    #[error("unknown widget {0}")]
    UnknownWidget(WidgetId),
}

impl ZoomistError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedPayload {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZoomistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = ZoomistError::invalid("fill", "fill mode must be set");
        assert_eq!(e.to_string(), "invalid argument for `fill`: fill mode must be set");

        let e = ZoomistError::UnrecognizedToken {
            kind: "fill",
            token: "stretch".into(),
        };
        assert_eq!(e.to_string(), "unrecognized fill token: \"stretch\"");
    }
}
