//! Value types for device state and color handling.

pub mod brightness;
mod color;
mod color_mode;
mod hue_saturation;
mod mireds;

pub use color::Color;
pub use color_mode::ColorMode;
pub use hue_saturation::HueSaturation;
pub use mireds::Mireds;
