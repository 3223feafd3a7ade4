//! Color temperature in mireds.

use serde::{Deserialize, Serialize};

use super::Color;

/// Color temperature in mireds (reciprocal megakelvin), as used by the
/// emulated bridge API. Typical requests range from 153 (cool daylight,
/// ~6500K) to 500 (warm candlelight, ~2000K).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mireds {
    pub(crate) mireds: u16,
}

impl Mireds {
    /// Create a new Mireds value.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Mireds;
    ///
    /// assert_eq!(Mireds::new(366).mireds(), 366);
    /// ```
    pub fn new(mireds: u16) -> Self {
        Mireds { mireds }
    }

    /// Get the mireds value.
    pub fn mireds(&self) -> u16 {
        self.mireds
    }

    /// Convert to an RGB approximation of black-body light at this
    /// temperature.
    ///
    /// The mapping is a fixed table of 8 warm-to-cool bands measured on a
    /// gamma-corrected WS2812B strip. The table is a frozen compatibility
    /// constant, not a formula.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::Mireds;
    ///
    /// let warm = Mireds::new(500).to_color();
    /// assert_eq!((warm.red(), warm.green(), warm.blue()), (255, 199, 92));
    ///
    /// let cool = Mireds::new(153).to_color();
    /// assert_eq!((cool.red(), cool.green(), cool.blue()), (237, 255, 239));
    /// ```
    pub fn to_color(&self) -> Color {
        let (r, g, b) = match self.mireds {
            ct if ct > 475 => (255, 199, 92),
            ct if ct > 425 => (255, 213, 118),
            ct if ct > 375 => (255, 216, 118),
            ct if ct > 325 => (255, 234, 140),
            ct if ct > 275 => (255, 243, 160),
            ct if ct > 225 => (250, 255, 188),
            ct if ct > 175 => (247, 255, 215),
            _ => (237, 255, 239),
        };
        Color::rgb(r, g, b)
    }
}

impl From<&Mireds> for Color {
    fn from(ct: &Mireds) -> Self {
        ct.to_color()
    }
}
