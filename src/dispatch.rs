//! Recognition and execution of the emulated REST API.
//!
//! The assistants only ever emit a handful of request shapes, so
//! recognition is a deliberately minimal substring scanner rather than a
//! URL router or JSON parser. Parsing is kept pure and separate from
//! execution so it can be tested without any network layer.

use log::debug;
use serde_json::{Map, Value};

use crate::config::HardwareAddr;
use crate::descriptor;
use crate::device::Device;
use crate::registry::{DeviceId, DeviceRegistry};
use crate::types::{HueSaturation, Mireds, brightness};

const API_MARKER: &str = "api";
const CREATE_USER_MARKER: &str = "devicetype";
const STATE_MARKER: &str = "state";
const LIGHTS_MARKER: &str = "lights";
const OFF_MARKER: &str = "false";
const BRIGHTNESS_MARKER: &str = "bri";
const HUE_MARKER: &str = "hue";
const SATURATION_MARKER: &str = "sat";
const CT_MARKER: &str = "ct";

/// Canned reply to a credential-provisioning request. The emulation never
/// issues or checks real credentials; clients get this static username
/// and are happy.
const CREATE_USER_REPLY: &str =
    "[{\"success\":{\"username\": \"2WLEDHardQrI3WHYTHoMcXHgEspsM8ZZRpSKtBQr\"}}]";

/// Generic acknowledgement for every state-change request, sent before
/// the requested action is even looked at. Clients only check for
/// "success".
const STATE_ACK: &str = "[{\"success\":{\"/lights/1/state/on\":true}}]";

/// A recognized API request shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCommand {
    /// Client asks for an API username.
    CreateUser,
    /// Client wants to change a device's state.
    SetState { id: DeviceId, action: StateAction },
    /// Client wants every device's descriptor.
    ListDevices,
    /// Client wants one device's descriptor.
    GetDevice { id: DeviceId },
    /// Anything else on the API path; answered with an empty object.
    Catchall,
}

/// The one state mutation a `SetState` request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateAction {
    Off,
    /// Brightness on the wire 0-254 scale.
    Brightness(u8),
    Color { hue: u16, sat: u8 },
    ColorTemperature(u16),
    On,
}

/// Recognize a request by path and body.
///
/// Returns `None` when the path has no API marker at all; the request is
/// not ours and the host should fall through to its 404 handling.
/// Everything recognized degrades gracefully: malformed numbers parse as
/// 0 and unknown shapes become [`ApiCommand::Catchall`], never an error.
///
/// Exactly one [`StateAction`] is chosen per state call, in fixed
/// precedence: off, brightness, hue, color temperature, and finally a
/// bare "on" when no recognized field is present.
///
/// # Examples
///
/// ```
/// use hue_bridge_rs::dispatch::{parse_api_call, ApiCommand, StateAction};
///
/// assert_eq!(parse_api_call("/index.html", ""), None);
/// assert_eq!(
///     parse_api_call("/api/abc/lights/2/state", "{\"bri\":100}"),
///     Some(ApiCommand::SetState { id: 2, action: StateAction::Brightness(100) }),
/// );
/// assert_eq!(
///     parse_api_call("/api/abc/lights", ""),
///     Some(ApiCommand::ListDevices),
/// );
/// ```
pub fn parse_api_call(path: &str, body: &str) -> Option<ApiCommand> {
    if !path.contains(API_MARKER) {
        return None;
    }

    if body.contains(CREATE_USER_MARKER) {
        return Some(ApiCommand::CreateUser);
    }

    if path.contains(STATE_MARKER) {
        let id = number_after(path, LIGHTS_MARKER);
        let action = if body.contains(OFF_MARKER) {
            StateAction::Off
        } else if body.contains(BRIGHTNESS_MARKER) {
            StateAction::Brightness(number_after(body, BRIGHTNESS_MARKER).min(255) as u8)
        } else if body.contains(HUE_MARKER) {
            StateAction::Color {
                hue: number_after(body, HUE_MARKER).min(65535) as u16,
                sat: number_after(body, SATURATION_MARKER).min(255) as u8,
            }
        } else if body.contains(CT_MARKER) {
            StateAction::ColorTemperature(number_after(body, CT_MARKER).min(65535) as u16)
        } else {
            StateAction::On
        };
        return Some(ApiCommand::SetState { id, action });
    }

    if path.contains(LIGHTS_MARKER) {
        let id = number_after(path, LIGHTS_MARKER);
        return Some(if id == 0 {
            ApiCommand::ListDevices
        } else {
            ApiCommand::GetDevice { id }
        });
    }

    Some(ApiCommand::Catchall)
}

/// The number immediately following `marker`, skipping the separator
/// characters the wire formats put between marker and digits. 0 on any
/// parse failure.
fn number_after(text: &str, marker: &str) -> u32 {
    let Some(pos) = text.find(marker) else {
        return 0;
    };
    let rest = text[pos + marker.len()..]
        .trim_start_matches(|c: char| c == '"' || c == ':' || c == '/' || c == ' ');
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().unwrap_or(0)
}

/// A reply body the host's HTTP layer must send with status 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    pub content_type: &'static str,
    pub body: String,
}

impl ApiReply {
    fn json<B: Into<String>>(body: B) -> Self {
        ApiReply {
            content_type: "application/json",
            body: body.into(),
        }
    }
}

/// Recognize a request, apply its state change, and build the reply.
///
/// Only `SetState` mutates; its device callback fires exactly once after
/// the mutation. An unresolvable device id mutates nothing but is still
/// acknowledged, so a confused assistant never stalls on an error reply.
pub fn handle_api_call(
    registry: &mut DeviceRegistry,
    mac: &HardwareAddr,
    path: &str,
    body: &str,
) -> Option<ApiReply> {
    let command = parse_api_call(path, body)?;
    debug!("api call {path:?} recognized as {command:?}");

    let reply = match command {
        ApiCommand::CreateUser => ApiReply::json(CREATE_USER_REPLY),
        ApiCommand::SetState { id, action } => {
            if let Some(device) = registry.get_mut(id) {
                apply_state_action(device, action);
            }
            ApiReply::json(STATE_ACK)
        }
        ApiCommand::ListDevices => {
            let mut map = Map::new();
            for (id, device) in registry.iter() {
                map.insert(
                    id.to_string(),
                    descriptor::device_descriptor(device, id, mac),
                );
            }
            ApiReply::json(Value::Object(map).to_string())
        }
        ApiCommand::GetDevice { id } => match registry.get(id) {
            Some(device) => {
                ApiReply::json(descriptor::device_descriptor(device, id, mac).to_string())
            }
            None => ApiReply::json("{}"),
        },
        ApiCommand::Catchall => ApiReply::json("{}"),
    };
    Some(reply)
}

fn apply_state_action(device: &mut Device, action: StateAction) {
    match action {
        StateAction::Off => device.turn_off(),
        StateAction::Brightness(wire) => device.set_brightness(brightness::from_wire(wire)),
        StateAction::Color { hue, sat } => device.set_color(HueSaturation::new(hue, sat)),
        StateAction::ColorTemperature(ct) => device.set_color_temperature(Mireds::new(ct)),
        StateAction::On => device.turn_on(),
    }
    device.invoke_callback();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorMode;

    fn mac() -> HardwareAddr {
        "de:ad:be:ef:12:34".parse().unwrap()
    }

    fn registry_with(names: &[&str]) -> DeviceRegistry {
        let mut registry = DeviceRegistry::new(8);
        for name in names {
            registry
                .add(Device::brightness(name.to_string(), |_| {}))
                .unwrap();
        }
        registry
    }

    #[test]
    fn non_api_paths_are_declined() {
        assert_eq!(parse_api_call("/description.xml", ""), None);
        assert_eq!(parse_api_call("/", "{\"bri\":10}"), None);
    }

    #[test]
    fn create_user_takes_priority() {
        assert_eq!(
            parse_api_call("/api/lights/1/state", "{\"devicetype\":\"test#client\"}"),
            Some(ApiCommand::CreateUser)
        );
    }

    #[test]
    fn state_action_precedence() {
        let path = "/api/u/lights/1/state";
        assert_eq!(
            parse_api_call(path, "{\"on\":false}").unwrap(),
            ApiCommand::SetState { id: 1, action: StateAction::Off }
        );
        // "false" wins even when brightness is also present.
        assert_eq!(
            parse_api_call(path, "{\"on\":false,\"bri\":10}").unwrap(),
            ApiCommand::SetState { id: 1, action: StateAction::Off }
        );
        assert_eq!(
            parse_api_call(path, "{\"bri\":200}").unwrap(),
            ApiCommand::SetState { id: 1, action: StateAction::Brightness(200) }
        );
        assert_eq!(
            parse_api_call(path, "{\"hue\":40000,\"sat\":120,\"on\":true}").unwrap(),
            ApiCommand::SetState { id: 1, action: StateAction::Color { hue: 40000, sat: 120 } }
        );
        // Saturation defaults to 0 when absent.
        assert_eq!(
            parse_api_call(path, "{\"hue\":40000}").unwrap(),
            ApiCommand::SetState { id: 1, action: StateAction::Color { hue: 40000, sat: 0 } }
        );
        assert_eq!(
            parse_api_call(path, "{\"ct\":366,\"on\":true}").unwrap(),
            ApiCommand::SetState { id: 1, action: StateAction::ColorTemperature(366) }
        );
        assert_eq!(
            parse_api_call(path, "{\"on\":true}").unwrap(),
            ApiCommand::SetState { id: 1, action: StateAction::On }
        );
    }

    #[test]
    fn device_id_comes_from_the_path() {
        assert_eq!(
            parse_api_call("/api/user/lights/17/state", "{\"on\":true}").unwrap(),
            ApiCommand::SetState { id: 17, action: StateAction::On }
        );
        // Unparsable id degrades to 0.
        assert_eq!(
            parse_api_call("/api/user/lights/abc/state", "{\"on\":true}").unwrap(),
            ApiCommand::SetState { id: 0, action: StateAction::On }
        );
    }

    #[test]
    fn malformed_numbers_parse_as_zero() {
        assert_eq!(
            parse_api_call("/api/u/lights/1/state", "{\"bri\":oops}").unwrap(),
            ApiCommand::SetState { id: 1, action: StateAction::Brightness(0) }
        );
    }

    #[test]
    fn lights_collection_routes() {
        assert_eq!(parse_api_call("/api/u/lights", "").unwrap(), ApiCommand::ListDevices);
        assert_eq!(
            parse_api_call("/api/u/lights/2", "").unwrap(),
            ApiCommand::GetDevice { id: 2 }
        );
        assert_eq!(parse_api_call("/api/u", "").unwrap(), ApiCommand::Catchall);
    }

    #[test]
    fn create_user_reply_is_the_canned_literal() {
        let mut registry = registry_with(&[]);
        let reply = handle_api_call(&mut registry, &mac(), "/api", "{\"devicetype\":\"x\"}").unwrap();
        assert_eq!(
            reply.body,
            "[{\"success\":{\"username\": \"2WLEDHardQrI3WHYTHoMcXHgEspsM8ZZRpSKtBQr\"}}]"
        );
        assert_eq!(reply.content_type, "application/json");
    }

    #[test]
    fn list_devices_keys_by_string_id() {
        let mut registry = registry_with(&["desk", "shelf"]);
        let reply = handle_api_call(&mut registry, &mac(), "/api/u/lights", "").unwrap();
        let value: Value = serde_json::from_str(&reply.body).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["1"]["name"], "desk");
        assert_eq!(object["2"]["name"], "shelf");
    }

    #[test]
    fn brightness_passes_through_the_wire_shift() {
        let mut registry = registry_with(&["desk"]);
        handle_api_call(&mut registry, &mac(), "/api/u/lights/1/state", "{\"bri\":100}").unwrap();
        assert_eq!(registry.get(1).unwrap().brightness(), 101);

        let reply = handle_api_call(&mut registry, &mac(), "/api/u/lights/1", "").unwrap();
        let value: Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(value["state"]["bri"], 100);
        assert_eq!(value["state"]["on"], true);
    }

    #[test]
    fn turn_on_is_idempotent() {
        let mut registry = registry_with(&["desk"]);
        handle_api_call(&mut registry, &mac(), "/api/u/lights/1/state", "{\"bri\":80}").unwrap();
        handle_api_call(&mut registry, &mac(), "/api/u/lights/1/state", "{\"on\":true}").unwrap();
        let first = registry.get(1).unwrap().brightness();
        handle_api_call(&mut registry, &mac(), "/api/u/lights/1/state", "{\"on\":true}").unwrap();
        assert_eq!(registry.get(1).unwrap().brightness(), first);
    }

    #[test]
    fn off_then_on_restores_brightness() {
        let mut registry = registry_with(&["desk"]);
        handle_api_call(&mut registry, &mac(), "/api/u/lights/1/state", "{\"bri\":80}").unwrap();
        handle_api_call(&mut registry, &mac(), "/api/u/lights/1/state", "{\"on\":false}").unwrap();
        assert!(!registry.get(1).unwrap().is_on());
        handle_api_call(&mut registry, &mac(), "/api/u/lights/1/state", "{\"on\":true}").unwrap();
        assert_eq!(registry.get(1).unwrap().brightness(), 81);
    }

    #[test]
    fn color_state_changes_select_modes() {
        let mut registry = DeviceRegistry::new(2);
        registry.add(Device::color("strip", |_, _| {})).unwrap();

        handle_api_call(
            &mut registry,
            &mac(),
            "/api/u/lights/1/state",
            "{\"hue\":40000,\"sat\":120,\"on\":true}",
        )
        .unwrap();
        let device = registry.get(1).unwrap();
        assert_eq!(device.color_mode(), ColorMode::HueSaturation);
        assert_eq!(device.hue(), 40000);
        assert_eq!(device.saturation(), 120);

        handle_api_call(
            &mut registry,
            &mac(),
            "/api/u/lights/1/state",
            "{\"ct\":366,\"on\":true}",
        )
        .unwrap();
        assert_eq!(registry.get(1).unwrap().color_mode(), ColorMode::ColorTemperature);
    }

    #[test]
    fn unresolvable_id_still_acknowledges() {
        let mut registry = registry_with(&["desk"]);
        let before = registry.get(1).unwrap().brightness();
        let reply =
            handle_api_call(&mut registry, &mac(), "/api/u/lights/9/state", "{\"on\":true}")
                .unwrap();
        assert_eq!(reply.body, "[{\"success\":{\"/lights/1/state/on\":true}}]");
        assert_eq!(registry.get(1).unwrap().brightness(), before);
    }

    #[test]
    fn unknown_device_and_catchall_reply_empty_object() {
        let mut registry = registry_with(&["desk"]);
        let reply = handle_api_call(&mut registry, &mac(), "/api/u/lights/9", "").unwrap();
        assert_eq!(reply.body, "{}");
        let reply = handle_api_call(&mut registry, &mac(), "/api/u/groups", "").unwrap();
        assert_eq!(reply.body, "{}");
    }

    #[test]
    fn callback_fires_once_per_mutation() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicU32, Ordering};

        let calls = Arc::new(AtomicU32::new(0));
        let calls_cb = Arc::clone(&calls);
        let mut registry = DeviceRegistry::new(1);
        registry
            .add(Device::brightness("desk", move |_| {
                calls_cb.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        handle_api_call(&mut registry, &mac(), "/api/u/lights/1/state", "{\"bri\":10}").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Read-only calls never fire callbacks.
        handle_api_call(&mut registry, &mac(), "/api/u/lights", "").unwrap();
        handle_api_call(&mut registry, &mac(), "/api/u/lights/1", "").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
