//! Translation of discovered lights into accessories.

use std::sync::Arc;

use futures::FutureExt;
use log::{debug, info, warn};

use crate::bridge::Bridge;
use crate::convert::{
    brightness_to_accessory, brightness_to_device, clamp_hue, clamp_mired_for_read,
    clamp_mired_for_update, clamp_saturation,
};
use crate::lights::{Light, LightKind, StateUpdate};
use crate::native::NativeModelMatcher;

use super::{Accessory, AccessoryInfo, Characteristic, log_update_outcome, read_or_default};

/// Capability profile of a supported light type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub brightness: bool,
    pub color_temperature: bool,
    pub color: bool,
}

/// Map a light type to its capability profile.
///
/// Returns `None` for types outside the supported vocabulary; those
/// lights produce no accessory.
pub fn capabilities(kind: &LightKind) -> Option<Capabilities> {
    match kind {
        LightKind::OnOffPlug => Some(Capabilities {
            brightness: false,
            color_temperature: false,
            color: false,
        }),
        LightKind::Dimmable => Some(Capabilities {
            brightness: true,
            color_temperature: false,
            color: false,
        }),
        LightKind::ColorTemperature => Some(Capabilities {
            brightness: true,
            color_temperature: true,
            color: false,
        }),
        LightKind::ExtendedColor => Some(Capabilities {
            brightness: true,
            color_temperature: true,
            color: true,
        }),
        LightKind::Unsupported(_) => None,
    }
}

/// Build one accessory per translatable light.
///
/// Native Hue fixtures and unsupported types are skipped without
/// aborting the rest of the inventory. Accessory identities are the
/// numeric light id plus one, since the controller occupies identity 1.
pub fn build_accessories(
    bridge: &Arc<Bridge>,
    lights: &[Light],
    matcher: &NativeModelMatcher,
) -> Vec<Accessory> {
    let mut accessories = Vec::new();

    for light in lights {
        if matcher.is_native(&light.model_id) {
            debug!(
                "light {} ({}) is a native fixture, skipping",
                light.id, light.model_id
            );
            continue;
        }

        let Some(capabilities) = capabilities(&light.kind()) else {
            info!(
                "light type '{}' is not supported yet, skipping light {} ({})",
                light.light_type, light.id, light.name
            );
            continue;
        };

        let Ok(numeric_id) = light.id.parse::<u64>() else {
            warn!(
                "light id {:?} is not numeric, cannot derive an accessory identity for {}",
                light.id, light.name
            );
            continue;
        };

        debug!("creating accessory for light {} ({})", light.id, light.name);
        accessories.push(build_accessory(bridge, light, numeric_id + 1, capabilities));
    }

    accessories
}

fn build_accessory(
    bridge: &Arc<Bridge>,
    light: &Light,
    id: u64,
    capabilities: Capabilities,
) -> Accessory {
    Accessory {
        info: AccessoryInfo {
            id,
            name: light.name.clone(),
            model: light.model_id.clone(),
            manufacturer: light.manufacturer.clone(),
            firmware_version: light.software_version.clone(),
        },
        power: power_characteristic(bridge, light),
        brightness: capabilities
            .brightness
            .then(|| brightness_characteristic(bridge, light)),
        color_temperature: capabilities
            .color_temperature
            .then(|| color_temperature_characteristic(bridge, light)),
        hue: capabilities.color.then(|| hue_characteristic(bridge, light)),
        saturation: capabilities
            .color
            .then(|| saturation_characteristic(bridge, light)),
    }
}

fn power_characteristic(bridge: &Arc<Bridge>, light: &Light) -> Characteristic<bool> {
    let pull = {
        let bridge = Arc::clone(bridge);
        let id = light.id.clone();
        move || {
            let bridge = Arc::clone(&bridge);
            let id = id.clone();
            async move {
                let current = bridge.light(&id).await.map(|light| light.state.on);
                read_or_default(current, &id, "power")
            }
            .boxed()
        }
    };

    let push = {
        let bridge = Arc::clone(bridge);
        let id = light.id.clone();
        let name = light.name.clone();
        move |on: bool| {
            let bridge = Arc::clone(&bridge);
            let id = id.clone();
            let name = name.clone();
            async move {
                debug!("light {id} ({name}): set power to {on}");
                let mut update = StateUpdate::new();
                update.power(on);
                let result = bridge.update_state(&id, &update).await;
                log_update_outcome(result, &id, &name, "power", on);
            }
            .boxed()
        }
    };

    Characteristic::new(pull, push)
}

fn brightness_characteristic(bridge: &Arc<Bridge>, light: &Light) -> Characteristic<u8> {
    let pull = {
        let bridge = Arc::clone(bridge);
        let id = light.id.clone();
        move || {
            let bridge = Arc::clone(&bridge);
            let id = id.clone();
            async move {
                let current = bridge
                    .light(&id)
                    .await
                    .map(|light| brightness_to_accessory(light.state.brightness));
                read_or_default(current, &id, "brightness")
            }
            .boxed()
        }
    };

    let push = {
        let bridge = Arc::clone(bridge);
        let id = light.id.clone();
        let name = light.name.clone();
        move |percent: u8| {
            let bridge = Arc::clone(&bridge);
            let id = id.clone();
            let name = name.clone();
            async move {
                let device = brightness_to_device(percent);
                debug!("light {id} ({name}): set brightness to {device}");
                // Writing a brightness implies the light should be on.
                let mut update = StateUpdate::new();
                update.power(true);
                update.brightness(device);
                let result = bridge.update_state(&id, &update).await;
                log_update_outcome(result, &id, &name, "brightness", device);
            }
            .boxed()
        }
    };

    Characteristic::new(pull, push)
}

fn color_temperature_characteristic(bridge: &Arc<Bridge>, light: &Light) -> Characteristic<u16> {
    let pull = {
        let bridge = Arc::clone(bridge);
        let id = light.id.clone();
        move || {
            let bridge = Arc::clone(&bridge);
            let id = id.clone();
            async move {
                let current = bridge
                    .light(&id)
                    .await
                    .map(|light| clamp_mired_for_read(light.state.color_temperature));
                read_or_default(current, &id, "color temperature")
            }
            .boxed()
        }
    };

    let push = {
        let bridge = Arc::clone(bridge);
        let id = light.id.clone();
        let name = light.name.clone();
        move |mired: u16| {
            let bridge = Arc::clone(&bridge);
            let id = id.clone();
            let name = name.clone();
            async move {
                let mired = clamp_mired_for_update(mired);
                debug!("light {id} ({name}): set color temperature to {mired}");
                let mut update = StateUpdate::new();
                update.power(true);
                update.color_temperature(mired);
                let result = bridge.update_state(&id, &update).await;
                log_update_outcome(result, &id, &name, "color temperature", mired);
            }
            .boxed()
        }
    };

    Characteristic::new(pull, push)
}

fn hue_characteristic(bridge: &Arc<Bridge>, light: &Light) -> Characteristic<f32> {
    let pull = {
        let bridge = Arc::clone(bridge);
        let id = light.id.clone();
        move || {
            let bridge = Arc::clone(&bridge);
            let id = id.clone();
            async move {
                let current = bridge
                    .light(&id)
                    .await
                    .map(|light| clamp_hue(light.state.hue as f32));
                read_or_default(current, &id, "hue")
            }
            .boxed()
        }
    };

    let push = {
        let bridge = Arc::clone(bridge);
        let id = light.id.clone();
        let name = light.name.clone();
        move |degrees: f32| {
            let bridge = Arc::clone(&bridge);
            let id = id.clone();
            let name = name.clone();
            async move {
                let degrees = clamp_hue(degrees);
                debug!("light {id} ({name}): set hue to {degrees}");
                let mut update = StateUpdate::new();
                update.power(true);
                update.hue(degrees as u16);
                let result = bridge.update_state(&id, &update).await;
                log_update_outcome(result, &id, &name, "hue", degrees);
            }
            .boxed()
        }
    };

    Characteristic::new(pull, push)
}

fn saturation_characteristic(bridge: &Arc<Bridge>, light: &Light) -> Characteristic<f32> {
    let pull = {
        let bridge = Arc::clone(bridge);
        let id = light.id.clone();
        move || {
            let bridge = Arc::clone(&bridge);
            let id = id.clone();
            async move {
                let current = bridge
                    .light(&id)
                    .await
                    .map(|light| clamp_saturation(light.state.saturation as f32));
                read_or_default(current, &id, "saturation")
            }
            .boxed()
        }
    };

    let push = {
        let bridge = Arc::clone(bridge);
        let id = light.id.clone();
        let name = light.name.clone();
        move |percent: f32| {
            let bridge = Arc::clone(&bridge);
            let id = id.clone();
            let name = name.clone();
            async move {
                let percent = clamp_saturation(percent);
                debug!("light {id} ({name}): set saturation to {percent}");
                let mut update = StateUpdate::new();
                update.power(true);
                update.saturation(percent as u8);
                let result = bridge.update_state(&id, &update).await;
                log_update_outcome(result, &id, &name, "saturation", percent);
            }
            .boxed()
        }
    };

    Characteristic::new(pull, push)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light(id: &str, name: &str, light_type: &str, model_id: &str) -> Light {
        Light {
            id: id.to_string(),
            name: name.to_string(),
            light_type: light_type.to_string(),
            model_id: model_id.to_string(),
            manufacturer: "Acme".to_string(),
            software_version: "1.0.0".to_string(),
            ..Light::default()
        }
    }

    fn offline_bridge() -> Arc<Bridge> {
        Arc::new(Bridge::with_credential("127.0.0.1:9", "testcred").unwrap())
    }

    #[test]
    fn test_capabilities_per_kind() {
        assert_eq!(
            capabilities(&LightKind::OnOffPlug).unwrap(),
            Capabilities {
                brightness: false,
                color_temperature: false,
                color: false
            }
        );
        assert_eq!(
            capabilities(&LightKind::Dimmable).unwrap(),
            Capabilities {
                brightness: true,
                color_temperature: false,
                color: false
            }
        );
        assert_eq!(
            capabilities(&LightKind::ColorTemperature).unwrap(),
            Capabilities {
                brightness: true,
                color_temperature: true,
                color: false
            }
        );
        assert_eq!(
            capabilities(&LightKind::ExtendedColor).unwrap(),
            Capabilities {
                brightness: true,
                color_temperature: true,
                color: true
            }
        );
        assert_eq!(
            capabilities(&LightKind::Unsupported("Color light".to_string())),
            None
        );
    }

    #[test]
    fn test_extended_color_light_gets_full_characteristic_set() {
        let bridge = offline_bridge();
        let lights = vec![light("1", "TV Left", "Extended color light", "Third001")];

        let accessories = build_accessories(&bridge, &lights, &NativeModelMatcher::new());

        assert_eq!(accessories.len(), 1);
        let accessory = &accessories[0];
        assert_eq!(accessory.info.id, 2);
        assert_eq!(accessory.info.name, "TV Left");
        assert_eq!(accessory.info.model, "Third001");
        assert_eq!(accessory.info.manufacturer, "Acme");
        assert_eq!(accessory.info.firmware_version, "1.0.0");
        assert!(accessory.brightness.is_some());
        assert!(accessory.color_temperature.is_some());
        assert!(accessory.hue.is_some());
        assert!(accessory.saturation.is_some());
    }

    #[test]
    fn test_plug_gets_power_only() {
        let bridge = offline_bridge();
        let lights = vec![light("3", "Desk Plug", "On/Off plug-in unit", "SP 120")];

        let accessories = build_accessories(&bridge, &lights, &NativeModelMatcher::new());

        assert_eq!(accessories.len(), 1);
        let accessory = &accessories[0];
        assert_eq!(accessory.info.id, 4);
        assert!(accessory.brightness.is_none());
        assert!(accessory.color_temperature.is_none());
        assert!(accessory.hue.is_none());
        assert!(accessory.saturation.is_none());
    }

    #[test]
    fn test_native_fixture_is_excluded() {
        let bridge = offline_bridge();
        let lights = vec![light("1", "Hallway", "Extended color light", "LCT001")];

        let accessories = build_accessories(&bridge, &lights, &NativeModelMatcher::new());

        assert!(accessories.is_empty());
    }

    #[test]
    fn test_unsupported_type_does_not_abort_remaining_lights() {
        let bridge = offline_bridge();
        let lights = vec![
            light("1", "Strip", "Color light", "Strip01"),
            light("2", "Desk", "Dimmable light", "Dim01"),
        ];

        let accessories = build_accessories(&bridge, &lights, &NativeModelMatcher::new());

        assert_eq!(accessories.len(), 1);
        assert_eq!(accessories[0].info.name, "Desk");
        assert_eq!(accessories[0].info.id, 3);
    }

    #[test]
    fn test_non_numeric_light_id_is_skipped() {
        let bridge = offline_bridge();
        let lights = vec![
            light("lamp-a", "Odd", "Dimmable light", "Dim01"),
            light("5", "Fine", "Dimmable light", "Dim01"),
        ];

        let accessories = build_accessories(&bridge, &lights, &NativeModelMatcher::new());

        assert_eq!(accessories.len(), 1);
        assert_eq!(accessories[0].info.id, 6);
    }

    #[tokio::test]
    async fn test_power_pull_reads_live_state() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/testcred/lights/1")
            .with_status(200)
            .with_body(
                r#"{"state": {"on": true}, "type": "Dimmable light", "name": "Desk", "modelid": "Dim01", "swversion": "1"}"#,
            )
            .create_async()
            .await;

        let bridge = Arc::new(Bridge::with_credential(&server.host_with_port(), "testcred").unwrap());
        let lights = vec![light("1", "Desk", "Dimmable light", "Dim01")];
        let accessories = build_accessories(&bridge, &lights, &NativeModelMatcher::new());

        assert!(accessories[0].power.pull().await);
    }

    #[tokio::test]
    async fn test_brightness_pull_converts_to_accessory_range() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/testcred/lights/1")
            .with_status(200)
            .with_body(
                r#"{"state": {"on": true, "bri": 254}, "type": "Dimmable light", "name": "Desk", "modelid": "Dim01", "swversion": "1"}"#,
            )
            .create_async()
            .await;

        let bridge = Arc::new(Bridge::with_credential(&server.host_with_port(), "testcred").unwrap());
        let lights = vec![light("1", "Desk", "Dimmable light", "Dim01")];
        let accessories = build_accessories(&bridge, &lights, &NativeModelMatcher::new());

        let brightness = accessories[0].brightness.as_ref().unwrap();
        assert_eq!(brightness.pull().await, 100);
    }

    #[tokio::test]
    async fn test_pull_returns_default_when_bridge_is_unreachable() {
        let bridge = offline_bridge();
        let lights = vec![light("1", "Desk", "Extended color light", "Third001")];
        let accessories = build_accessories(&bridge, &lights, &NativeModelMatcher::new());

        let accessory = &accessories[0];
        assert!(!accessory.power.pull().await);
        assert_eq!(accessory.brightness.as_ref().unwrap().pull().await, 0);
        assert_eq!(accessory.hue.as_ref().unwrap().pull().await, 0.0);
    }

    #[tokio::test]
    async fn test_brightness_push_sends_converted_partial_update() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/testcred/lights/1/state")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({"on": true, "bri": 254}),
            ))
            .with_status(200)
            .with_body(r#"[{"success": {"/lights/1/state/bri": 254}}]"#)
            .create_async()
            .await;

        let bridge = Arc::new(Bridge::with_credential(&server.host_with_port(), "testcred").unwrap());
        let lights = vec![light("1", "Desk", "Dimmable light", "Dim01")];
        let accessories = build_accessories(&bridge, &lights, &NativeModelMatcher::new());

        accessories[0].brightness.as_ref().unwrap().push(100).await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_color_temperature_push_clamps_before_sending() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/testcred/lights/1/state")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({"on": true, "ct": 400}),
            ))
            .with_status(200)
            .with_body(r#"[{"success": {"/lights/1/state/ct": 400}}]"#)
            .create_async()
            .await;

        let bridge = Arc::new(Bridge::with_credential(&server.host_with_port(), "testcred").unwrap());
        let lights = vec![light("1", "Desk", "Color temperature light", "Cct01")];
        let accessories = build_accessories(&bridge, &lights, &NativeModelMatcher::new());

        accessories[0]
            .color_temperature
            .as_ref()
            .unwrap()
            .push(600)
            .await;
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_push_swallows_remote_rejection() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PUT", "/api/testcred/lights/1/state")
            .with_status(200)
            .with_body(
                r#"[{"error": {"type": 201, "address": "", "description": "device is off"}}]"#,
            )
            .create_async()
            .await;

        let bridge = Arc::new(Bridge::with_credential(&server.host_with_port(), "testcred").unwrap());
        let lights = vec![light("1", "Desk", "Dimmable light", "Dim01")];
        let accessories = build_accessories(&bridge, &lights, &NativeModelMatcher::new());

        // Must not panic or surface the error to the caller.
        accessories[0].power.push(true).await;
    }
}
