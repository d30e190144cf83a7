//! Light data model as reported by the Hue bridge.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// Represents a single light or plug known to the Hue bridge.
///
/// The bridge never includes the identifier inside the light document
/// itself; [`crate::Bridge::light`] stamps the requested id onto the
/// decoded value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Light {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub light_type: String,
    #[serde(rename = "modelid", default)]
    pub model_id: String,
    #[serde(rename = "manufacturername", default)]
    pub manufacturer: String,
    #[serde(rename = "swversion", default)]
    pub software_version: String,
    #[serde(default)]
    pub state: LightState,
}

impl Light {
    /// Classify this light by its reported device type string.
    ///
    /// # Examples
    ///
    /// ```
    /// use huelink::{Light, LightKind};
    ///
    /// let light = Light {
    ///     light_type: "Dimmable light".to_string(),
    ///     ..Light::default()
    /// };
    /// assert_eq!(light.kind(), LightKind::Dimmable);
    /// ```
    pub fn kind(&self) -> LightKind {
        LightKind::from_str(&self.light_type)
            .unwrap_or_else(|_| LightKind::Unsupported(self.light_type.clone()))
    }
}

/// Complete state snapshot of a light.
///
/// Reads always return the full snapshot. Writes go through
/// [`StateUpdate`] instead, since the bridge treats an update message as
/// a set of field overrides rather than a full replace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LightState {
    pub on: bool,
    #[serde(rename = "bri")]
    pub brightness: u8,
    pub hue: u16,
    #[serde(rename = "sat")]
    pub saturation: u8,
    pub xy: Vec<f64>,
    #[serde(rename = "ct")]
    pub color_temperature: u16,
    pub alert: String,
    pub effect: String,
    #[serde(rename = "colormode")]
    pub color_mode: String,
    pub reachable: bool,
}

/// Entry of the id-to-name map returned by the lights listing endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct LightName {
    pub name: String,
}

/// The fixed vocabulary of device types this crate understands.
///
/// Anything the bridge reports outside this vocabulary lands in
/// [`LightKind::Unsupported`] and is skipped during accessory creation.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum LightKind {
    #[strum(serialize = "On/Off plug-in unit")]
    OnOffPlug,
    #[strum(serialize = "Dimmable light")]
    Dimmable,
    #[strum(serialize = "Color temperature light")]
    ColorTemperature,
    #[strum(serialize = "Extended color light")]
    ExtendedColor,
    #[strum(default)]
    Unsupported(String),
}

/// A partial state update for a light.
///
/// Only the fields explicitly set end up in the wire payload; everything
/// left untouched is omitted and therefore unchanged on the device.
///
/// # Examples
///
/// ```
/// use huelink::StateUpdate;
///
/// let mut update = StateUpdate::new();
/// assert!(update.is_empty());
///
/// update.power(true);
/// update.brightness(200);
/// assert_eq!(
///     serde_json::to_string(&update).unwrap(),
///     r#"{"on":true,"bri":200}"#
/// );
/// ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Clone)]
pub struct StateUpdate {
    pub(crate) on: Option<bool>,
    #[serde(rename = "bri")]
    pub(crate) brightness: Option<u8>,
    pub(crate) hue: Option<u16>,
    #[serde(rename = "sat")]
    pub(crate) saturation: Option<u8>,
    #[serde(rename = "ct")]
    pub(crate) color_temperature: Option<u16>,
}

impl StateUpdate {
    /// Create a new empty update.
    ///
    /// At least one field must be set before sending it to the bridge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether no field has been set yet.
    pub fn is_empty(&self) -> bool {
        self.on.is_none()
            && self.brightness.is_none()
            && self.hue.is_none()
            && self.saturation.is_none()
            && self.color_temperature.is_none()
    }

    /// Set the power state.
    pub fn power(&mut self, on: bool) {
        self.on = Some(on);
    }

    /// Set the brightness in the device range (0-254).
    pub fn brightness(&mut self, brightness: u8) {
        self.brightness = Some(brightness);
    }

    /// Set the hue in the device range (0-65535).
    pub fn hue(&mut self, hue: u16) {
        self.hue = Some(hue);
    }

    /// Set the saturation in the device range (0-254).
    pub fn saturation(&mut self, saturation: u8) {
        self.saturation = Some(saturation);
    }

    /// Set the color temperature in mired.
    pub fn color_temperature(&mut self, mired: u16) {
        self.color_temperature = Some(mired);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parses_supported_vocabulary() {
        let cases = [
            ("On/Off plug-in unit", LightKind::OnOffPlug),
            ("Dimmable light", LightKind::Dimmable),
            ("Color temperature light", LightKind::ColorTemperature),
            ("Extended color light", LightKind::ExtendedColor),
        ];

        for (type_string, expected) in cases {
            let light = Light {
                light_type: type_string.to_string(),
                ..Light::default()
            };
            assert_eq!(light.kind(), expected, "{type_string}");
        }
    }

    #[test]
    fn test_kind_keeps_unknown_type_string() {
        let light = Light {
            light_type: "Color light".to_string(),
            ..Light::default()
        };
        assert_eq!(
            light.kind(),
            LightKind::Unsupported("Color light".to_string())
        );
    }

    #[test]
    fn test_decode_full_light_document() {
        let body = r#"{
            "state": {
                "on": true,
                "bri": 202,
                "hue": 13122,
                "sat": 211,
                "xy": [0.5119, 0.4147],
                "ct": 467,
                "alert": "none",
                "effect": "none",
                "colormode": "ct",
                "reachable": true
            },
            "type": "Extended color light",
            "name": "TV Left",
            "modelid": "LCT001",
            "swversion": "65003148"
        }"#;

        let light: Light = serde_json::from_str(body).unwrap();
        assert_eq!(light.name, "TV Left");
        assert_eq!(light.kind(), LightKind::ExtendedColor);
        assert_eq!(light.model_id, "LCT001");
        assert_eq!(light.software_version, "65003148");
        assert!(light.state.on);
        assert_eq!(light.state.brightness, 202);
        assert_eq!(light.state.hue, 13122);
        assert_eq!(light.state.saturation, 211);
        assert_eq!(light.state.color_temperature, 467);
        assert_eq!(light.state.color_mode, "ct");
        assert!(light.state.reachable);
    }

    #[test]
    fn test_decode_plug_document_without_color_fields() {
        let body = r#"{
            "state": {"on": false, "alert": "none", "reachable": true},
            "type": "On/Off plug-in unit",
            "name": "Desk Plug",
            "modelid": "SP 120",
            "swversion": "1.0.3"
        }"#;

        let light: Light = serde_json::from_str(body).unwrap();
        assert_eq!(light.kind(), LightKind::OnOffPlug);
        assert!(!light.state.on);
        assert_eq!(light.state.brightness, 0);
        assert_eq!(light.state.color_temperature, 0);
    }

    #[test]
    fn test_state_update_serializes_only_set_fields() {
        let mut update = StateUpdate::new();
        update.power(true);
        update.color_temperature(320);

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, serde_json::json!({"on": true, "ct": 320}));
    }

    #[test]
    fn test_empty_state_update_serializes_to_empty_object() {
        let update = StateUpdate::new();
        assert!(update.is_empty());
        assert_eq!(serde_json::to_string(&update).unwrap(), "{}");
    }

    #[test]
    fn test_power_off_is_not_omitted() {
        let mut update = StateUpdate::new();
        update.power(false);
        assert!(!update.is_empty());
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"on":false}"#);
    }
}
