//! Hue and Saturation color representation.

use serde::{Deserialize, Serialize};

use super::Color;

/// Hue and Saturation color representation.
///
/// The scales are the ones used on the emulated bridge's wire protocol:
/// - Hue: the color angle, 0-65535 mapping onto the full color wheel
/// - Saturation: the intensity of the color, 0-255
///
/// Both ranges cover their integer types completely, so any pair of values
/// is valid.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct HueSaturation {
    hue: u16,
    saturation: u8,
}

impl HueSaturation {
    /// Create a new HueSaturation with the given values.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::HueSaturation;
    ///
    /// let red = HueSaturation::new(0, 255);
    /// assert_eq!(red.hue(), 0);
    /// assert_eq!(red.saturation(), 255);
    /// ```
    pub fn new(hue: u16, saturation: u8) -> Self {
        HueSaturation { hue, saturation }
    }

    /// Get the hue value.
    pub fn hue(&self) -> u16 {
        self.hue
    }

    /// Get the saturation value.
    pub fn saturation(&self) -> u8 {
        self.saturation
    }

    /// Convert to RGB Color.
    ///
    /// Uses HSV to RGB conversion with Value fixed at 255 (max brightness).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::HueSaturation;
    ///
    /// let color = HueSaturation::new(0, 255).to_color();
    /// assert_eq!(color.red(), 255);
    /// assert_eq!(color.green(), 0);
    /// assert_eq!(color.blue(), 0);
    ///
    /// // Zero saturation is white regardless of hue.
    /// let white = HueSaturation::new(40000, 0).to_color();
    /// assert_eq!((white.red(), white.green(), white.blue()), (255, 255, 255));
    /// ```
    pub fn to_color(&self) -> Color {
        let h = f32::from(self.hue) / 65535.0;
        let s = f32::from(self.saturation) / 255.0;

        let i = (h * 6.0).floor();
        let f = h * 6.0 - i;
        let p = 255.0 * (1.0 - s);
        let q = 255.0 * (1.0 - f * s);
        let t = 255.0 * (1.0 - (1.0 - f) * s);

        let (r, g, b) = match (i as u32) % 6 {
            0 => (255.0, t, p),
            1 => (q, 255.0, p),
            2 => (p, 255.0, t),
            3 => (p, q, 255.0),
            4 => (t, p, 255.0),
            _ => (255.0, p, q),
        };

        Color::rgb(r as u8, g as u8, b as u8)
    }
}

impl From<&HueSaturation> for Color {
    fn from(hs: &HueSaturation) -> Self {
        hs.to_color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_red() {
        assert_eq!(HueSaturation::new(0, 255).to_color(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn green_sector() {
        // One third of the wheel lands in the green sector.
        let color = HueSaturation::new(65535 / 3, 255).to_color();
        assert!(color.red() <= 1);
        assert_eq!(color.green(), 255);
        assert!(color.blue() <= 1);
    }

    #[test]
    fn desaturated_is_white() {
        for hue in [0u16, 12000, 30000, 65535] {
            assert_eq!(
                HueSaturation::new(hue, 0).to_color(),
                Color::rgb(255, 255, 255)
            );
        }
    }
}
