use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FOG_COLOR, DEFAULT_WATER_HEIGHT};
use crate::types::{CameraUpdate, Color, Quality};

/// A complete renderer configuration loaded from RON data.
///
/// Every field has a default, so a settings file only needs to name what it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Column stride between cast rays.
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub fog: FogSettings,
    #[serde(default)]
    pub reflection_map: ReflectionSettings,
    /// Post-pass 3x3 smoothing.
    #[serde(default)]
    pub smooth: bool,
    /// Initial camera; unset fields keep the renderer's current value.
    #[serde(default)]
    pub camera: CameraUpdate,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            fog: FogSettings::default(),
            reflection_map: ReflectionSettings::default(),
            smooth: false,
            camera: CameraUpdate::default(),
        }
    }
}

/// Distance fog applied to terrain and the lower sky.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FogSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Written as `"#rrggbb"`.
    #[serde(default = "default_fog_color")]
    pub color: Color,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            color: default_fog_color(),
        }
    }
}

/// Sky-reflecting water below a global water line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReflectionSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Kept as a wide integer so out-of-range values reach validation
    /// instead of failing deserialization.
    #[serde(default = "default_water_height")]
    pub water_height: i32,
}

impl Default for ReflectionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            water_height: default_water_height(),
        }
    }
}

fn default_fog_color() -> Color {
    Color::from_u32(DEFAULT_FOG_COLOR)
}

fn default_water_height() -> i32 {
    DEFAULT_WATER_HEIGHT as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = RenderSettings::default();
        assert_eq!(settings.quality, Quality::Medium);
        assert!(!settings.fog.enabled);
        assert_eq!(settings.fog.color, Color::rgb(127, 127, 127));
        assert!(!settings.reflection_map.enabled);
        assert_eq!(settings.reflection_map.water_height, 64);
        assert!(!settings.smooth);
        assert_eq!(settings.camera, CameraUpdate::default());
    }
}
