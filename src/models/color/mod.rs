use serde::{Deserialize, Serialize};
use std::fmt;

/// Opacity applied to every dimmed (past) day marker.
pub const DIMMED_OPACITY: f32 = 0.3;

/// 8-bit RGBA colour, written in configuration files as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const BLACK: RgbaColor = RgbaColor::new(0, 0, 0, 255);
    pub const WHITE: RgbaColor = RgbaColor::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn from_hex_str(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 && hex.len() != 8 {
            return None;
        }
        if !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        let a = if hex.len() == 8 {
            u8::from_str_radix(&hex[6..8], 16).ok()?
        } else {
            255
        };

        Some(RgbaColor::new(r, g, b, a))
    }

    /// Alpha channel as a fraction in `[0, 1]`.
    pub fn opacity(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Same hue with the alpha channel dropped.
    pub const fn opaque(&self) -> Self {
        Self::new(self.r, self.g, self.b, 255)
    }

    /// Linear interpolation towards `target`; the alpha of `self` is interpolated too.
    pub fn mix(&self, target: RgbaColor, factor: f32) -> RgbaColor {
        let weight = if factor.is_finite() {
            factor.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mix = |start: u8, end: u8| -> u8 {
            let start_f = start as f32;
            let end_f = end as f32;
            (start_f + (end_f - start_f) * weight).round().clamp(0.0, 255.0) as u8
        };
        RgbaColor::new(
            mix(self.r, target.r),
            mix(self.g, target.g),
            mix(self.b, target.b),
            mix(self.a, target.a),
        )
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for RgbaColor {
    fn default() -> Self {
        RgbaColor::BLACK
    }
}

impl fmt::Display for RgbaColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for RgbaColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RgbaColor::from_hex_str(&value).ok_or_else(|| format!("invalid hex colour '{}'", value))
    }
}

impl From<RgbaColor> for String {
    fn from(color: RgbaColor) -> Self {
        color.to_hex()
    }
}

/// A colour plus the opacity it should be painted with.
///
/// Opacity is kept apart from the colour's own alpha so that dimming can force
/// an exact value while the hue stays untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub color: RgbaColor,
    pub opacity: f32,
}

impl Appearance {
    /// Paint `color` as configured, its alpha becoming the opacity.
    pub fn of(color: RgbaColor) -> Self {
        Self {
            color: color.opaque(),
            opacity: color.opacity(),
        }
    }

    pub fn dimmed(color: RgbaColor) -> Self {
        Self {
            color: color.opaque(),
            opacity: DIMMED_OPACITY,
        }
    }

    /// Resolved colour with the opacity folded back into the alpha channel.
    pub fn to_rgba(&self) -> RgbaColor {
        let alpha = (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        RgbaColor::new(self.color.r, self.color.g, self.color.b, alpha)
    }
}
