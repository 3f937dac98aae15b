//! One-way directives invoked on the client widget.

use serde_json::Value;

/// Imperative call on the client. Fire-and-forget: nothing comes back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Zoom by a signed relative ratio
    Zoom { ratio: f64 },
    /// Move by a relative offset
    Move { dx: f64, dy: f64 },
    /// Move to an absolute position
    MoveTo { x: f64, y: f64 },
    /// Drive the slider to a value
    SlideTo { value: f64 },
    /// Back to the initial configuration and position
    Reset,
}

impl Command {
    /// Name of the client-side function
    pub fn function(&self) -> &'static str {
        match self {
            Command::Zoom { .. } => "zoom",
            Command::Move { .. } => "move",
            Command::MoveTo { .. } => "moveTo",
            Command::SlideTo { .. } => "slideTo",
            Command::Reset => "reset",
        }
    }

    /// Positional arguments, in client order
    pub fn args(&self) -> Vec<Value> {
        match *self {
            Command::Zoom { ratio } => vec![Value::from(ratio)],
            Command::Move { dx, dy } => vec![Value::from(dx), Value::from(dy)],
            Command::MoveTo { x, y } => vec![Value::from(x), Value::from(y)],
            Command::SlideTo { value } => vec![Value::from(value)],
            Command::Reset => Vec::new(),
        }
    }

    /// Non-finite arguments have no JSON form and would reach the client as null.
    pub(crate) fn has_finite_args(&self) -> bool {
        match *self {
            Command::Zoom { ratio } => ratio.is_finite(),
            Command::Move { dx, dy } => dx.is_finite() && dy.is_finite(),
            Command::MoveTo { x, y } => x.is_finite() && y.is_finite(),
            Command::SlideTo { value } => value.is_finite(),
            Command::Reset => true,
        }
    }
}
