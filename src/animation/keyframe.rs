use serde::{Deserialize, Serialize};

use super::AnimationError;
use crate::scene::{Property, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: f32,
    pub value: f32,
}

impl Keyframe {
    pub const fn new(frame: f32, value: f32) -> Self {
        Self { frame, value }
    }
}

/// What a looping playback does after the last keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Jump back to the first keyframe
    #[default]
    Cycle,
    /// Hold the last value
    Constant,
}

/// Float property driven by keyframes. One definition can be played on any
/// number of targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeAnimation {
    pub name: String,
    pub property: Property,
    pub frame_rate: f32,
    pub loop_mode: LoopMode,
    keys: Vec<Keyframe>,
}

impl KeyframeAnimation {
    pub fn new(
        name: impl Into<String>,
        property: Property,
        frame_rate: f32,
        loop_mode: LoopMode,
    ) -> Result<Self, AnimationError> {
        let name = name.into();
        let kind = property.value_kind();
        if kind != ValueKind::Float {
            return Err(AnimationError::NotFloat { property, kind });
        }
        if !(frame_rate > 0.0) {
            return Err(AnimationError::FrameRate { name, frame_rate });
        }
        Ok(Self {
            name,
            property,
            frame_rate,
            loop_mode,
            keys: Vec::new(),
        })
    }

    /// Replace the keyframes. Frames must be strictly increasing.
    pub fn set_keys(&mut self, keys: Vec<Keyframe>) -> Result<(), AnimationError> {
        if keys.is_empty() {
            return Err(AnimationError::NoKeyframes(self.name.clone()));
        }
        if let Some(index) = keys.windows(2).position(|w| !(w[1].frame > w[0].frame)) {
            return Err(AnimationError::NonMonotonic {
                name: self.name.clone(),
                index: index + 1,
                frame: keys[index + 1].frame,
                previous: keys[index].frame,
            });
        }
        self.keys = keys;
        Ok(())
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn last_frame(&self) -> f32 {
        self.keys.last().map_or(0.0, |k| k.frame)
    }

    /// Linearly interpolated value, clamped to the first/last keyframe
    pub fn value_at(&self, frame: f32) -> Option<f32> {
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        if frame <= first.frame {
            return Some(first.value);
        }
        if frame >= last.frame {
            return Some(last.value);
        }
        let next = self.keys.partition_point(|k| k.frame <= frame);
        let (a, b) = (self.keys[next - 1], self.keys[next]);
        let t = (frame - a.frame) / (b.frame - a.frame);
        Some(a.value + (b.value - a.value) * t)
    }
}
