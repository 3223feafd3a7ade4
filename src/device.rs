//! A single emulated light and its state.

use std::fmt;

use crate::types::{Color, ColorMode, HueSaturation, Mireds, brightness};

/// State-change callback attached to a [`Device`].
///
/// The variant fixes the device's capability: a `Brightness` callback
/// makes a dimmable-only device, a `Color` callback makes a color-capable
/// one. Callbacks run synchronously after every state mutation the
/// dispatcher applies, and must not block.
pub enum DeviceCallback {
    /// Receives the new brightness (0 = off).
    Brightness(Box<dyn FnMut(u8) + Send>),
    /// Receives the new brightness and the resolved RGB color.
    Color(Box<dyn FnMut(u8, Color) + Send>),
}

impl fmt::Debug for DeviceCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceCallback::Brightness(_) => f.write_str("DeviceCallback::Brightness"),
            DeviceCallback::Color(_) => f.write_str("DeviceCallback::Color"),
        }
    }
}

/// What a device can do, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    BrightnessOnly,
    ColorCapable,
}

/// A single controllable light exposed through the bridge.
///
/// Brightness is 0-255 with 0 meaning off. The last nonzero brightness is
/// remembered so a bare "turn on" restores the previous level; before any
/// nonzero brightness has been seen it reads as full brightness.
///
/// # Examples
///
/// ```
/// use hue_bridge_rs::Device;
///
/// let mut device = Device::brightness("Kitchen", |bri| {
///     // drive the actual hardware here
///     let _ = bri;
/// });
///
/// device.set_brightness(40);
/// device.turn_off();
/// device.turn_on();
/// assert_eq!(device.brightness(), 40);
/// ```
#[derive(Debug)]
pub struct Device {
    name: String,
    callback: DeviceCallback,
    value: u8,
    last_value: u8,
    hs: HueSaturation,
    ct: u16,
}

impl Device {
    /// Color temperature reported before any temperature write.
    pub const DEFAULT_CT: u16 = 500;

    /// Create a device with an explicit callback variant.
    pub fn new<N: Into<String>>(name: N, callback: DeviceCallback) -> Self {
        Device {
            name: name.into(),
            callback,
            value: 0,
            last_value: 0,
            hs: HueSaturation::default(),
            ct: 0,
        }
    }

    /// Create a brightness-only device.
    pub fn brightness<N, F>(name: N, callback: F) -> Self
    where
        N: Into<String>,
        F: FnMut(u8) + Send + 'static,
    {
        Self::new(name, DeviceCallback::Brightness(Box::new(callback)))
    }

    /// Create a color-capable device.
    pub fn color<N, F>(name: N, callback: F) -> Self
    where
        N: Into<String>,
        F: FnMut(u8, Color) + Send + 'static,
    {
        Self::new(name, DeviceCallback::Color(Box::new(callback)))
    }

    /// Set the initial brightness (also seeds the remembered level).
    pub fn with_initial_brightness(mut self, value: u8) -> Self {
        self.value = value;
        self.last_value = value;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the device. The assistant only picks the new name up on
    /// re-discovery.
    pub fn set_name<N: Into<String>>(&mut self, name: N) {
        self.name = name.into();
    }

    pub fn capability(&self) -> Capability {
        match self.callback {
            DeviceCallback::Brightness(_) => Capability::BrightnessOnly,
            DeviceCallback::Color(_) => Capability::ColorCapable,
        }
    }

    /// Current brightness, 0 meaning off.
    pub fn brightness(&self) -> u8 {
        self.value
    }

    pub fn is_on(&self) -> bool {
        self.value != 0
    }

    /// The most recent nonzero brightness (1-255).
    ///
    /// Before any nonzero brightness has ever been observed this reads as
    /// 255, never 0, so the very first "turn on" goes to full brightness.
    pub fn last_brightness(&self) -> u8 {
        if self.last_value == 0 { 255 } else { self.last_value }
    }

    /// Set the brightness, updating the remembered nonzero level.
    ///
    /// The remembered level tracks the last observed nonzero brightness
    /// across this and the previous state: a nonzero current value is
    /// saved before being overwritten, and a nonzero new value is saved
    /// as well. Turning off therefore preserves the level that was lit.
    pub fn set_brightness(&mut self, value: u8) {
        if self.value != 0 {
            self.last_value = self.value;
        }
        if value != 0 {
            self.last_value = value;
        }
        self.value = value;
    }

    /// Set the brightness from a 0-100 percentage.
    pub fn set_brightness_percent(&mut self, percent: u8) {
        self.set_brightness(brightness::from_percent(percent));
    }

    /// Restore the last nonzero brightness.
    pub fn turn_on(&mut self) {
        self.set_brightness(self.last_brightness());
    }

    pub fn turn_off(&mut self) {
        self.set_brightness(0);
    }

    /// Switch to hue/saturation color mode.
    ///
    /// Clears the color-temperature discriminant; the two modes are
    /// mutually exclusive and the last write wins.
    pub fn set_color(&mut self, hs: HueSaturation) {
        self.hs = hs;
        self.ct = 0;
    }

    /// Switch to color-temperature mode. Hue/saturation become stale
    /// until the next hue/saturation write.
    pub fn set_color_temperature(&mut self, ct: Mireds) {
        self.ct = ct.mireds();
    }

    pub fn hue(&self) -> u16 {
        self.hs.hue()
    }

    pub fn saturation(&self) -> u8 {
        self.hs.saturation()
    }

    /// The color temperature in mireds, defaulting to
    /// [`DEFAULT_CT`](Self::DEFAULT_CT) before any temperature write.
    pub fn color_temperature(&self) -> Mireds {
        if self.ct == 0 {
            Mireds::new(Self::DEFAULT_CT)
        } else {
            Mireds::new(self.ct)
        }
    }

    /// Which color mode the last write selected.
    pub fn color_mode(&self) -> ColorMode {
        if self.ct != 0 {
            ColorMode::ColorTemperature
        } else {
            ColorMode::HueSaturation
        }
    }

    /// Resolve the current state to an RGB color for display purposes,
    /// through whichever mode is active.
    pub fn color(&self) -> Color {
        match self.color_mode() {
            ColorMode::ColorTemperature => Mireds::new(self.ct).to_color(),
            ColorMode::HueSaturation => self.hs.to_color(),
        }
    }

    /// Invoke the state-change callback with the current state.
    ///
    /// Called by the dispatcher exactly once after each mutation; hosts
    /// may also call it to push the initial state out.
    pub fn invoke_callback(&mut self) {
        let value = self.value;
        let color = self.color();
        match &mut self.callback {
            DeviceCallback::Brightness(cb) => cb(value),
            DeviceCallback::Color(cb) => cb(value, color),
        }
    }
}
