//! Active color mode of a color-capable device.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Which of the two mutually exclusive color modes a device is in.
///
/// The string forms are the `colormode` tokens of the emulated API.
///
/// # Examples
///
/// ```
/// use hue_bridge_rs::ColorMode;
///
/// assert_eq!(ColorMode::HueSaturation.as_ref(), "hs");
/// assert_eq!(ColorMode::ColorTemperature.to_string(), "ct");
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
pub enum ColorMode {
    #[strum(serialize = "hs")]
    HueSaturation,
    #[strum(serialize = "ct")]
    ColorTemperature,
}
