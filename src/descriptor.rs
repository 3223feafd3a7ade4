//! The documents the bridge serves: per-device JSON descriptors, the UPnP
//! description XML, and a plain-text status page.

use std::net::Ipv4Addr;

use serde_json::{Value, json};

use crate::bridge::BridgeId;
use crate::config::HardwareAddr;
use crate::device::{Capability, Device};
use crate::registry::{DeviceId, DeviceRegistry};
use crate::types::brightness;

/// Build the JSON descriptor for one device.
///
/// The type, manufacturer, version and model strings are the fixed values
/// the emulated ecosystem expects for a known bridge model; the unique id
/// combines the host hardware address with the device's 1-based slot.
/// `bri` reports the last nonzero brightness shifted back onto the wire
/// 0-254 scale.
pub fn device_descriptor(device: &Device, id: DeviceId, mac: &HardwareAddr) -> Value {
    let state = match device.capability() {
        Capability::ColorCapable => json!({
            "on": device.is_on(),
            "bri": brightness::to_wire(device.last_brightness()),
            "xy": [0.0, 0.0],
            "colormode": device.color_mode().as_ref(),
            "effect": "none",
            "ct": device.color_temperature().mireds(),
            "hue": device.hue(),
            "sat": device.saturation(),
            "alert": "none",
            "reachable": true,
        }),
        Capability::BrightnessOnly => json!({
            "on": device.is_on(),
            "bri": brightness::to_wire(device.last_brightness()),
            "alert": "none",
            "reachable": true,
        }),
    };

    json!({
        "type": match device.capability() {
            Capability::ColorCapable => "Extended color light",
            Capability::BrightnessOnly => "Dimmable light",
        },
        "manufacturername": "OpenSource",
        "swversion": "0.1",
        "name": device.name(),
        "uniqueid": format!("{mac}-{id}"),
        "modelid": "LST001",
        "state": state,
    })
}

/// Render the UPnP description document fetched after discovery.
///
/// Everything except the IP address and the instance identifier is a
/// literal constant; the ecosystem's clients accept the device only as
/// this exact bridge model, spacing included.
pub fn description_xml(ip: Ipv4Addr, bridge: &BridgeId) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" ?>",
            "<root xmlns=\"urn:schemas-upnp-org:device-1-0\">",
            "<specVersion><major>1</major><minor>0</minor></specVersion>",
            "<URLBase>http://{0}:80/</URLBase>",
            "<device>",
            "<deviceType>urn:schemas-upnp-org:device:Basic:1</deviceType>",
            "<friendlyName>Philips hue ({0})</friendlyName>",
            "<manufacturer>Royal Philips Electronics</manufacturer>",
            "<manufacturerURL>http://www.philips.com</manufacturerURL>",
            "<modelDescription>Philips hue Personal Wireless Lighting</modelDescription>",
            "<modelName>Philips hue bridge 2012</modelName>",
            "<modelNumber>929000226503</modelNumber>",
            "<modelURL>http://www.meethue.com</modelURL>",
            "<serialNumber>{1}</serialNumber>",
            "<UDN>uuid:{2}</UDN>",
            "<presentationURL>index.html</presentationURL>",
            "<iconList>",
            "  <icon>",
            "    <mimetype>image/png</mimetype>",
            "    <height>48</height>",
            "    <width>48</width>",
            "    <depth>24</depth>",
            "    <url>hue_logo_0.png</url>",
            "  </icon>",
            "  <icon>",
            "    <mimetype>image/png</mimetype>",
            "    <height>120</height>",
            "    <width>120</width>",
            "    <depth>24</depth>",
            "    <url>hue_logo_3.png</url>",
            "  </icon>",
            "</iconList>",
            "</device>",
            "</root>"
        ),
        ip,
        bridge.serial(),
        bridge.uuid(),
    )
}

/// Plain-text overview for the host's informational status route.
pub fn status_page(registry: &DeviceRegistry) -> String {
    let mut page = String::from("Hue bridge emulation is up.\r\n\r\n");
    for (id, device) in registry.iter() {
        page.push_str(&format!(
            "Value of device {id} ({}): {}\r\n",
            device.name(),
            device.brightness()
        ));
    }
    page.push_str(&format!("\r\nhue-bridge-rs v{}\r\n", env!("CARGO_PKG_VERSION")));
    page
}
