// config.rs - Scene tunables, loadable from JSON
use std::path::Path;

use anyhow::Context;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::Easing;
use crate::choreography::RevealPolicy;
use crate::math::Color3;
use crate::xr::XrSessionMode;

/// Everything the room scene can be tuned with. Defaults reproduce the
/// reference room; any field may be omitted from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub clear_color: Color3,
    pub gravity: Vec3,
    pub camera: CameraConfig,
    /// Radians added to the box yaw every frame
    pub spin_per_frame: f32,
    pub hover: HoverConfig,
    pub drift: DriftConfig,
    pub reveal: RevealConfig,
    pub xr: XrConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: Color3::WHITE,
            gravity: Vec3::new(0.0, -0.15, 0.0),
            camera: CameraConfig::default(),
            spin_per_frame: 0.01,
            hover: HoverConfig::default(),
            drift: DriftConfig::default(),
            reveal: RevealConfig::default(),
            xr: XrConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Failed to parse scene config {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub start: Vec3,
    pub target: Vec3,
    /// Vertical field of view, radians
    pub fov: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start: Vec3::new(0.0, 1.6, -10.0),
            target: Vec3::ZERO,
            fov: crate::camera::DEFAULT_FOV,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// Uniform scale while the pointer is over the box
    pub scale: f32,
    pub duration_ms: f32,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            scale: 1.1,
            duration_ms: 150.0,
        }
    }
}

/// Vertical wall drift: `from_value` at `start_frame` to `to_value` at `end_frame`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub from_value: f32,
    pub to_value: f32,
    pub start_frame: f32,
    pub end_frame: f32,
    pub frame_rate: f32,
    pub looping: bool,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            from_value: -2.0,
            to_value: 2.0,
            start_frame: 0.0,
            end_frame: 30.0,
            frame_rate: 10.0,
            looping: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub policy: RevealPolicy,
    pub camera_destination: Vec3,
    pub camera_duration_ms: f32,
    /// Alpha the side and back walls fade to
    pub wall_alpha: f32,
    /// Easing shared by every reveal step
    pub easing: Easing,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            policy: RevealPolicy::Rerun,
            camera_destination: Vec3::new(0.0, 1.6, 8.0),
            camera_duration_ms: 2000.0,
            wall_alpha: 0.2,
            easing: Easing::Linear,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XrConfig {
    pub session_mode: XrSessionMode,
}
