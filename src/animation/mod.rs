mod animator;
mod interpolation;
mod keyframe;

pub use animator::{Animatable, Animator};
pub use interpolation::{Easing, Interpolation};
pub use keyframe::{Keyframe, KeyframeAnimation, LoopMode};

use thiserror::Error;

use crate::scene::{Property, ValueKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("animation `{0}` has no keyframes")]
    NoKeyframes(String),
    #[error("animation `{name}`: keyframe {index} at frame {frame} does not come after frame {previous}")]
    NonMonotonic {
        name: String,
        index: usize,
        frame: f32,
        previous: f32,
    },
    #[error("keyframe animations drive float properties, `{property}` is {kind}")]
    NotFloat { property: Property, kind: ValueKind },
    #[error("animation `{name}` needs a positive frame rate, got {frame_rate}")]
    FrameRate { name: String, frame_rate: f32 },
}
