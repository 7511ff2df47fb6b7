use serde::{Deserialize, Serialize};

use crate::scene::{Property, PropertyValue, Target};

/// Easing applied to interpolation progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Apply easing to a 0-1 parameter
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// One-shot transition of a property from its value at start time to `to`.
///
/// Times are milliseconds. The start value is captured when the delay runs
/// out, not when the interpolation is scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolation {
    pub target: Target,
    pub property: Property,
    pub to: PropertyValue,
    pub duration_ms: f32,
    pub delay_ms: f32,
    pub easing: Easing,
    /// Stop keyframe animations on the same target/property when scheduled
    pub stop_other_animations: bool,
    from: Option<PropertyValue>,
    elapsed_ms: f32,
}

impl Interpolation {
    pub fn new(target: Target, property: Property, to: impl Into<PropertyValue>, duration_ms: f32) -> Self {
        Self {
            target,
            property,
            to: to.into(),
            duration_ms,
            delay_ms: 0.0,
            easing: Easing::Linear,
            stop_other_animations: false,
            from: None,
            elapsed_ms: 0.0,
        }
    }

    pub fn with_delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn stopping_other_animations(mut self) -> Self {
        self.stop_other_animations = true;
        self
    }

    /// Fresh copy ready to be scheduled
    pub fn restarted(&self) -> Self {
        Self {
            from: None,
            elapsed_ms: 0.0,
            ..self.clone()
        }
    }

    pub fn start_value(&self) -> Option<PropertyValue> {
        self.from
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn is_started(&self) -> bool {
        self.elapsed_ms >= self.delay_ms
    }

    /// Linear progress in [0, 1]. Zero-length transitions finish on their first step.
    pub fn progress(&self) -> f32 {
        if !self.is_started() {
            return 0.0;
        }
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((self.elapsed_ms - self.delay_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.is_started() && self.progress() >= 1.0
    }

    pub(crate) fn advance(&mut self, delta_ms: f32) {
        self.elapsed_ms += delta_ms;
    }

    pub(crate) fn capture_from(&mut self, value: PropertyValue) {
        if self.from.is_none() {
            self.from = Some(value);
        }
    }

    /// Current value; exactly `to` once finished
    pub fn sample(&self) -> Option<PropertyValue> {
        let from = self.from?;
        if self.is_finished() {
            return Some(self.to);
        }
        from.lerp(self.to, self.easing.apply(self.progress()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ObjectId;
    use glam::Vec3;

    fn scale_up() -> Interpolation {
        Interpolation::new(Target::Object(ObjectId(0)), Property::Scaling, Vec3::splat(1.1), 150.0)
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
        assert_eq!(Easing::EaseIn.apply(0.5), 0.25);
        assert_eq!(Easing::EaseOut.apply(0.5), 0.75);
    }

    #[test]
    fn test_progress_and_sample() {
        let mut interp = scale_up();
        interp.capture_from(Vec3::ONE.into());
        interp.advance(75.0);
        assert_eq!(interp.progress(), 0.5);
        let v = interp.sample().unwrap().as_vec3().unwrap();
        assert!((v - Vec3::splat(1.05)).length() < 1e-5);

        interp.advance(100.0);
        assert!(interp.is_finished());
        assert_eq!(interp.sample(), Some(PropertyValue::Vec3(Vec3::splat(1.1))));
    }

    #[test]
    fn test_delay_holds_progress() {
        let mut interp = scale_up().with_delay(100.0);
        interp.advance(50.0);
        assert!(!interp.is_started());
        assert_eq!(interp.progress(), 0.0);
        interp.advance(125.0);
        assert_eq!(interp.progress(), 0.5);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut interp =
            Interpolation::new(Target::Camera, Property::Position, Vec3::new(0.0, 1.6, 8.0), 0.0);
        interp.capture_from(Vec3::ZERO.into());
        interp.advance(0.0);
        assert!(interp.is_finished());
        assert_eq!(interp.sample(), Some(PropertyValue::Vec3(Vec3::new(0.0, 1.6, 8.0))));
    }

    #[test]
    fn test_sample_needs_start_value() {
        let interp = scale_up();
        assert_eq!(interp.sample(), None);
    }

    #[test]
    fn test_capture_keeps_first_value() {
        let mut interp = scale_up();
        interp.capture_from(Vec3::ONE.into());
        interp.capture_from(Vec3::ZERO.into());
        assert_eq!(interp.start_value(), Some(PropertyValue::Vec3(Vec3::ONE)));
    }

    #[test]
    fn test_restarted_clears_progress() {
        let mut interp = scale_up();
        interp.capture_from(Vec3::ONE.into());
        interp.advance(200.0);
        let fresh = interp.restarted();
        assert_eq!(fresh.start_value(), None);
        assert_eq!(fresh.elapsed_ms(), 0.0);
        assert_eq!(fresh.to, interp.to);
    }
}
