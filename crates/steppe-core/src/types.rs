use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SteppeError;

/// 8-bit RGBA colour. Layout matches one pixel of an RGBA8 byte buffer.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from a packed 0xRRGGBB value.
    pub const fn from_u32(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Packed 0xRRGGBB value (alpha dropped).
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Parse a `#rrggbb` CSS colour.
    pub fn from_hex(text: &str) -> Result<Self, SteppeError> {
        let invalid = || SteppeError::InvalidColor(text.to_string());
        let digits = text.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
        Ok(Self::from_u32(value))
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// Camera as reported to callers: angle in whole real degrees about the
/// y-axis, position in world units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub angle: i32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Partial camera update. Unset fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraUpdate {
    #[serde(default)]
    pub angle: Option<f64>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,
}

impl CameraUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angle(mut self, degrees: f64) -> Self {
        self.angle = Some(degrees);
        self
    }

    pub fn x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }
}

/// Render quality: the column stride between cast rays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Every fourth column ("fastest").
    Low,
    /// Every second column ("don't care").
    #[default]
    Medium,
    /// Every column ("nicest").
    High,
}

impl Quality {
    /// Columns between cast rays; each ray's colour covers this many columns.
    pub const fn stride(self) -> usize {
        match self {
            Quality::Low => 4,
            Quality::Medium => 2,
            Quality::High => 1,
        }
    }
}

impl FromStr for Quality {
    type Err = SteppeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            other => Err(SteppeError::UnknownQuality(other.to_string())),
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        })
    }
}

/// Toggleable renderer capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Fog,
    ReflectionMap,
    Smooth,
}

impl FromStr for Capability {
    type Err = SteppeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fog" => Ok(Capability::Fog),
            "reflection-map" => Ok(Capability::ReflectionMap),
            "smooth" => Ok(Capability::Smooth),
            other => Err(SteppeError::UnknownCapability(other.to_string())),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::Fog => "fog",
            Capability::ReflectionMap => "reflection-map",
            Capability::Smooth => "smooth",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_size() {
        assert_eq!(std::mem::size_of::<Color>(), 4);
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#7f7f7f"), Ok(Color::rgb(127, 127, 127)));
        assert_eq!(Color::from_hex("#FF0080"), Ok(Color::rgb(255, 0, 128)));
        assert_eq!(Color::rgb(1, 2, 255).to_hex(), "#0102ff");
    }

    #[test]
    fn test_color_from_hex_rejects_malformed() {
        for bad in ["7f7f7f", "#7f7f7", "#7f7f7f7f", "#gg0000", "", "#"] {
            assert!(Color::from_hex(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_color_packing() {
        let c = Color::from_u32(0x123456);
        assert_eq!((c.r, c.g, c.b, c.a), (0x12, 0x34, 0x56, 0xff));
        assert_eq!(c.to_u32(), 0x123456);
    }

    #[test]
    fn test_quality_parse_and_stride() {
        assert_eq!("low".parse::<Quality>().map(Quality::stride), Ok(4));
        assert_eq!("medium".parse::<Quality>().map(Quality::stride), Ok(2));
        assert_eq!("high".parse::<Quality>().map(Quality::stride), Ok(1));
        assert_eq!(
            "ultra".parse::<Quality>(),
            Err(SteppeError::UnknownQuality("ultra".into()))
        );
        assert_eq!(Quality::default(), Quality::Medium);
    }

    #[test]
    fn test_capability_parse() {
        assert_eq!("fog".parse::<Capability>(), Ok(Capability::Fog));
        assert_eq!(
            "reflection-map".parse::<Capability>(),
            Ok(Capability::ReflectionMap)
        );
        assert_eq!("smooth".parse::<Capability>(), Ok(Capability::Smooth));
        assert!("bloom".parse::<Capability>().is_err());
        assert_eq!(Capability::ReflectionMap.to_string(), "reflection-map");
    }

    #[test]
    fn test_camera_update_builder() {
        let update = CameraUpdate::new().angle(90.0).y(250.0);
        assert_eq!(update.angle, Some(90.0));
        assert_eq!(update.x, None);
        assert_eq!(update.y, Some(250.0));
        assert_eq!(update.z, None);
    }
}
