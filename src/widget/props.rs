//! Cached client properties.
//!
//! Holds the last value pushed to, or reported by, the client for each named
//! property. Getters never go to the client; when nothing is cached they fall
//! back to the default attached to the property's [`Property`] descriptor.

use serde_json::Value;
use std::collections::HashMap;

use super::tokens::Fill;

/// Cached property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Bool(bool),
    Str(String),
    Number(f64),
    /// Structured document (option bundles)
    Json(Value),
}

impl PropValue {
    pub fn to_json(&self) -> Value {
        match self {
            PropValue::Bool(v) => Value::Bool(*v),
            PropValue::Str(v) => Value::String(v.clone()),
            PropValue::Number(v) => Value::from(*v),
            PropValue::Json(v) => v.clone(),
        }
    }

    /// Map a client-reported JSON value. `null` means "unset" and maps to None.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(v) => Some(PropValue::Bool(v)),
            Value::String(v) => Some(PropValue::Str(v)),
            Value::Number(n) => n.as_f64().map(PropValue::Number),
            other => Some(PropValue::Json(other)),
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Number(v)
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Str(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(v.to_string())
    }
}

impl From<Value> for PropValue {
    fn from(v: Value) -> Self {
        PropValue::Json(v)
    }
}

/// Property name plus the value a getter reports before anything was set.
#[derive(Debug, Clone, Copy)]
pub struct Property<T> {
    pub name: &'static str,
    pub default: T,
}

impl<T> Property<T> {
    pub const fn new(name: &'static str, default: T) -> Self {
        Self { name, default }
    }
}

pub const SRC: &str = "src";
pub const HEIGHT: &str = "height";
/// `true`/`false` or a slider options bundle (which implies visible)
pub const SLIDER: Property<bool> = Property::new("slider", false);
/// `true`/`false` or a zoomer options bundle (which implies visible)
pub const ZOOMER: Property<bool> = Property::new("zoomer", false);
pub const FILL: Property<Fill> = Property::new("fill", Fill::None);
pub const DRAGGABLE: Property<bool> = Property::new("draggable", false);
pub const WHEELABLE: Property<bool> = Property::new("wheelable", false);
pub const PINCHABLE: Property<bool> = Property::new("pinchable", false);
/// Whether the image may be dragged out of bounds
pub const BOUNDS: Property<bool> = Property::new("bounds", false);
pub const ZOOM_RATIO: Property<f64> = Property::new("zoomRatio", 0.1);
pub const MAX_RATIO: Property<f64> = Property::new("maxRatio", 1.0);

/// Property container: name → last known value.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    map: HashMap<String, PropValue>,
}

impl Properties {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: PropValue) {
        self.map.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.map.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        self.map.remove(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.map.get(name) {
            Some(PropValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.map.get(name) {
            Some(PropValue::Number(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.map.get(name) {
            Some(PropValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_json(&self, name: &str) -> Option<&Value> {
        match self.map.get(name) {
            Some(PropValue::Json(v)) => Some(v),
            _ => None,
        }
    }

    /// Bool value or the descriptor's default
    pub fn bool_or_default(&self, prop: &Property<bool>) -> bool {
        self.get_bool(prop.name).unwrap_or(prop.default)
    }

    /// Number value or the descriptor's default
    pub fn f64_or_default(&self, prop: &Property<f64>) -> f64 {
        self.get_f64(prop.name).unwrap_or(prop.default)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_before_set() {
        let props = Properties::new();
        assert_eq!(props.f64_or_default(&ZOOM_RATIO), 0.1);
        assert_eq!(props.f64_or_default(&MAX_RATIO), 1.0);
        for p in [SLIDER, ZOOMER, DRAGGABLE, WHEELABLE, PINCHABLE, BOUNDS] {
            assert!(!props.bool_or_default(&p), "{} should default to false", p.name);
        }
    }

    #[test]
    fn test_typed_getters() {
        let mut props = Properties::new();
        props.set("zoomRatio", 0.25.into());
        props.set("draggable", true.into());
        props.set("height", "400px".into());

        assert_eq!(props.f64_or_default(&ZOOM_RATIO), 0.25);
        assert!(props.bool_or_default(&DRAGGABLE));
        assert_eq!(props.get_str(HEIGHT), Some("400px"));
        // Wrong type reads as absent
        assert_eq!(props.get_bool("height"), None);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(PropValue::from_json(json!(null)), None);
        assert_eq!(PropValue::from_json(json!(2)), Some(PropValue::Number(2.0)));
        assert_eq!(PropValue::from_json(json!("x")), Some(PropValue::Str("x".into())));
        assert_eq!(
            PropValue::from_json(json!({"el": "#s"})),
            Some(PropValue::Json(json!({"el": "#s"})))
        );
        assert_eq!(PropValue::Number(1.5).to_json(), json!(1.5));
    }
}
