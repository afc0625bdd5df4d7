/// Option structs for scene calls, and the serde-loadable build settings.
///
/// Every struct has a `Default` matching what a caller gets when passing no
/// options at all: white opaque colors, zero rotation, unit scale.

use serde::{Deserialize, Serialize};

use crate::geometry::Rgba;
use crate::palette::{LightType, Shape};
use crate::transform::EulerAngles;

/// Appearance of a placed box
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxOptions {
    pub color: Rgba,
    /// Texture name; unknown or empty names leave the box untextured
    pub texture: String,
}

impl BoxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, r: f64, g: f64, b: f64) -> Self {
        self.color = Rgba::new(r, g, b, self.color.a);
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.color.a = alpha;
        self
    }

    pub fn rgba(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    pub fn texture(mut self, name: impl Into<String>) -> Self {
        self.texture = name.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightOptions {
    pub color: Rgba,
    /// Default 1000
    pub intensity: f64,
    /// Default 1
    pub interval: f64,
    pub light_type: LightType,
}

impl Default for LightOptions {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            intensity: 1000.0,
            interval: 1.0,
            light_type: LightType::Point,
        }
    }
}

/// Position, rotation and scale of a model instance
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOptions {
    pub position: [f64; 3],
    pub rotation: EulerAngles,
    pub scale: f64,
    /// Name used by later `move_model` calls; empty when not addressable
    pub entity_name: String,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: EulerAngles::zero(),
            scale: 1.0,
            entity_name: String::new(),
        }
    }
}

impl ModelOptions {
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: [x, y, z],
            ..Self::default()
        }
    }

    pub fn rotated(mut self, pitch: f64, yaw: f64, roll: f64) -> Self {
        self.rotation = EulerAngles::new(pitch, yaw, roll);
        self
    }

    pub fn scaled(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn named(mut self, entity_name: impl Into<String>) -> Self {
        self.entity_name = entity_name.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationOptions {
    pub rotation: EulerAngles,
    /// Default 1
    pub scale: f64,
    /// Default 10
    pub interval: f64,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            rotation: EulerAngles::zero(),
            scale: 1.0,
            interval: 10.0,
        }
    }
}

fn default_size() -> f64 {
    1.0
}

fn default_roughness() -> f64 {
    0.5
}

fn default_interval() -> f64 {
    0.01
}

/// Scene-wide build settings.
///
/// Can be loaded from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSettings {
    #[serde(default = "default_size")]
    pub size: f64,
    #[serde(default)]
    pub shape: Shape,
    #[serde(default)]
    pub is_metallic: bool,
    #[serde(default = "default_roughness")]
    pub roughness: f64,
    /// Seconds between box placements in the renderer
    #[serde(default = "default_interval")]
    pub interval: f64,
    /// Two-decimal coordinates instead of the integer grid
    #[serde(default)]
    pub allow_float: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            size: default_size(),
            shape: Shape::default(),
            is_metallic: false,
            roughness: default_roughness(),
            interval: default_interval(),
            allow_float: false,
        }
    }
}

impl BuildSettings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
