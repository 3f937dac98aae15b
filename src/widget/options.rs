//! Structured option bundles pushed as a single property.
//!
//! A bundle only carries the keys whose source value is present. The client
//! treats a missing key as "use your default", which is not the same thing as
//! an explicit `null`, `false` or `""`, so absent values are never written.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::tokens::Direction;
use crate::error::{Result, ZoomistError};

/// Write-once JSON object built right before a property push.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionBundle {
    map: Map<String, Value>,
}

impl OptionBundle {
    pub fn new() -> Self {
        Self { map: Map::new() }
    }

    /// Add `key` only when `value` is present.
    ///
    /// Values that have no JSON form (NaN / infinite floats) are treated as
    /// absent too.
    pub fn put<T: Into<Value>>(mut self, key: &str, value: Option<T>) -> Self {
        if let Some(v) = value.map(Into::into) {
            if !v.is_null() {
                self.map.insert(key.to_string(), v);
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.map)
    }
}

/// Slider sub-configuration: `{el?, direction?, maxRatio?}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliderOptions {
    /// CSS selector of the slider element
    pub el: Option<String>,
    pub direction: Option<Direction>,
    pub max_ratio: Option<f64>,
}

impl SliderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn el(mut self, selector: impl Into<String>) -> Self {
        self.el = Some(selector.into());
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn max_ratio(mut self, max_ratio: f64) -> Self {
        self.max_ratio = Some(max_ratio);
        self
    }

    pub fn to_bundle(&self) -> OptionBundle {
        OptionBundle::new()
            .put("el", self.el.clone())
            .put("direction", self.direction.map(Direction::token))
            .put("maxRatio", self.max_ratio)
    }

    /// Decode a bundle reported back by the client.
    pub fn from_value(value: &Value) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            el: Option<String>,
            direction: Option<String>,
            max_ratio: Option<f64>,
        }

        let raw = Raw::deserialize(value).map_err(|e| ZoomistError::malformed("slider options", e))?;
        Ok(Self {
            el: raw.el,
            direction: raw.direction.as_deref().map(Direction::from_token).transpose()?,
            max_ratio: raw.max_ratio,
        })
    }
}

/// Zoomer sub-configuration: `{inEl?, outEl?, disableOnBounds}`
///
/// `disableOnBounds` is a plain flag and is always sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoomerOptions {
    /// CSS selector of the zoom-in control
    pub in_el: Option<String>,
    /// CSS selector of the zoom-out control
    pub out_el: Option<String>,
    /// Disable the controls once the image can't grow or shrink further
    pub disable_on_bounds: bool,
}

impl ZoomerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_el(mut self, selector: impl Into<String>) -> Self {
        self.in_el = Some(selector.into());
        self
    }

    pub fn out_el(mut self, selector: impl Into<String>) -> Self {
        self.out_el = Some(selector.into());
        self
    }

    pub fn disable_on_bounds(mut self, disable: bool) -> Self {
        self.disable_on_bounds = disable;
        self
    }

    pub fn to_bundle(&self) -> OptionBundle {
        OptionBundle::new()
            .put("inEl", self.in_el.clone())
            .put("outEl", self.out_el.clone())
            .put("disableOnBounds", Some(self.disable_on_bounds))
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            in_el: Option<String>,
            out_el: Option<String>,
            #[serde(default)]
            disable_on_bounds: bool,
        }

        let raw = Raw::deserialize(value).map_err(|e| ZoomistError::malformed("zoomer options", e))?;
        Ok(Self {
            in_el: raw.in_el,
            out_el: raw.out_el,
            disable_on_bounds: raw.disable_on_bounds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_skips_absent() {
        let bundle = OptionBundle::new()
            .put("a", Some(1))
            .put::<String>("b", None)
            .put("c", Some(f64::NAN));
        assert_eq!(bundle.into_value(), json!({"a": 1}));
    }

    #[test]
    fn test_slider_without_selector() {
        let slider = SliderOptions::new().direction(Direction::Vertical).max_ratio(10.0);
        let bundle = slider.to_bundle();
        assert!(!bundle.contains("el"));
        assert_eq!(bundle.into_value(), json!({"direction": "vertical", "maxRatio": 10.0}));
    }

    #[test]
    fn test_empty_slider_is_empty_object() {
        let bundle = SliderOptions::new().to_bundle();
        assert!(bundle.is_empty());
        assert_eq!(bundle.into_value(), json!({}));
    }

    #[test]
    fn test_full_slider() {
        let slider = SliderOptions::new()
            .el("#my-slider")
            .direction(Direction::Horizontal)
            .max_ratio(4.0);
        assert_eq!(
            slider.to_bundle().into_value(),
            json!({"el": "#my-slider", "direction": "horizontal", "maxRatio": 4.0})
        );
    }

    #[test]
    fn test_zoomer_keys() {
        let bundle = ZoomerOptions::new().in_el("#in").to_bundle();
        assert_eq!(bundle.len(), 2);
        assert!(!bundle.contains("outEl"));
        assert_eq!(bundle.get("disableOnBounds"), Some(&json!(false)));
    }

    #[test]
    fn test_decode_reported_slider() {
        let slider = SliderOptions::from_value(&json!({"direction": "vertical", "maxRatio": 3.0})).unwrap();
        assert_eq!(slider, SliderOptions::new().direction(Direction::Vertical).max_ratio(3.0));

        let err = SliderOptions::from_value(&json!({"direction": "diagonal"})).unwrap_err();
        assert!(matches!(err, ZoomistError::UnrecognizedToken { kind: "direction", .. }));

        let err = SliderOptions::from_value(&json!({"maxRatio": "big"})).unwrap_err();
        assert!(matches!(err, ZoomistError::MalformedPayload { .. }));
    }
}
