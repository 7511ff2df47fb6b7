use std::rc::Rc;

use super::{Interpolation, KeyframeAnimation, LoopMode};
use crate::scene::{Property, PropertyValue, Scene, Target};

/// Playback of a shared keyframe animation on one target
#[derive(Debug, Clone)]
pub struct Animatable {
    pub target: Target,
    pub speed_ratio: f32,
    animation: Rc<KeyframeAnimation>,
    from_frame: f32,
    to_frame: f32,
    looping: bool,
    /// Seconds since start
    elapsed: f64,
    stopped: bool,
}

impl Animatable {
    pub fn animation(&self) -> &KeyframeAnimation {
        &self.animation
    }

    pub fn shares_definition_with(&self, other: &Animatable) -> bool {
        Rc::ptr_eq(&self.animation, &other.animation)
    }

    pub fn frame_range(&self) -> (f32, f32) {
        (self.from_frame, self.to_frame)
    }

    fn loops(&self) -> bool {
        self.looping && self.animation.loop_mode == LoopMode::Cycle
    }

    fn frames_advanced(&self) -> f64 {
        self.elapsed * f64::from(self.animation.frame_rate * self.speed_ratio)
    }

    /// Frame being shown. Cycling playback wraps to `from_frame`, it never reverses.
    pub fn current_frame(&self) -> f32 {
        let range = f64::from(self.to_frame - self.from_frame);
        if range <= 0.0 {
            return self.from_frame;
        }
        let advanced = self.frames_advanced();
        let offset = if self.loops() {
            advanced.rem_euclid(range)
        } else {
            advanced.min(range)
        };
        self.from_frame + offset as f32
    }

    pub fn value(&self) -> Option<f32> {
        self.animation.value_at(self.current_frame())
    }

    pub fn is_finished(&self) -> bool {
        self.stopped
            || (!self.loops() && self.frames_advanced() >= f64::from(self.to_frame - self.from_frame))
    }
}

/// Per-frame driver for keyframe playback and one-shot interpolations
#[derive(Debug, Default)]
pub struct Animator {
    animatables: Vec<Animatable>,
    interpolations: Vec<Interpolation>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing `animation` on `target` between two frames
    pub fn begin_animation(
        &mut self,
        target: Target,
        animation: Rc<KeyframeAnimation>,
        from_frame: f32,
        to_frame: f32,
        looping: bool,
    ) {
        log::debug!(
            "begin animation `{}` on {} frames {}..{} (loop: {})",
            animation.name,
            target,
            from_frame,
            to_frame,
            looping
        );
        self.animatables.push(Animatable {
            target,
            speed_ratio: 1.0,
            animation,
            from_frame,
            to_frame,
            looping,
            elapsed: 0.0,
            stopped: false,
        });
    }

    /// Stop keyframe playback on `target` that writes `property`. Returns how many stopped.
    pub fn stop_animations(&mut self, target: Target, property: Property) -> usize {
        let before = self.animatables.len();
        self.animatables
            .retain(|a| !(a.target == target && a.animation.property.overlaps(property)));
        before - self.animatables.len()
    }

    /// Schedule an interpolation. An in-flight one on the same target and
    /// property is replaced; returns true when that happened.
    pub fn interpolate(&mut self, interpolation: Interpolation) -> bool {
        if interpolation.stop_other_animations {
            let stopped = self.stop_animations(interpolation.target, interpolation.property);
            if stopped > 0 {
                log::debug!(
                    "stopped {} animation(s) on {} for `{}`",
                    stopped,
                    interpolation.target,
                    interpolation.property
                );
            }
        }

        let existing = self
            .interpolations
            .iter_mut()
            .find(|i| i.target == interpolation.target && i.property == interpolation.property);
        match existing {
            Some(slot) => {
                *slot = interpolation;
                true
            }
            None => {
                self.interpolations.push(interpolation);
                false
            }
        }
    }

    pub fn animatables(&self) -> &[Animatable] {
        &self.animatables
    }

    pub fn interpolations(&self) -> &[Interpolation] {
        &self.interpolations
    }

    pub fn is_idle(&self) -> bool {
        self.animatables.is_empty() && self.interpolations.is_empty()
    }

    /// Advance by `delta` seconds. Keyframes are applied before interpolations,
    /// so an interpolation wins when both write the same property in a frame.
    pub fn advance(&mut self, scene: &mut Scene, delta: f64) {
        self.animatables.retain_mut(|anim| {
            anim.elapsed += delta;
            if let Some(value) = anim.value() {
                let property = anim.animation.property;
                if let Err(e) = scene.set(anim.target, property, PropertyValue::Float(value)) {
                    log::warn!("animation `{}` dropped: {}", anim.animation.name, e);
                    anim.stopped = true;
                }
            }
            !anim.is_finished()
        });

        let delta_ms = (delta * 1000.0) as f32;
        self.interpolations.retain_mut(|interp| {
            interp.advance(delta_ms);
            if !interp.is_started() {
                return true;
            }
            if interp.start_value().is_none() {
                match scene.get(interp.target, interp.property) {
                    Ok(value) => interp.capture_from(value),
                    Err(e) => {
                        log::warn!("interpolation of `{}` dropped: {}", interp.property, e);
                        return false;
                    }
                }
            }
            let Some(value) = interp.sample() else {
                log::warn!(
                    "interpolation of `{}` on {} dropped: value kinds differ",
                    interp.property,
                    interp.target
                );
                return false;
            };
            if let Err(e) = scene.set(interp.target, interp.property, value) {
                log::warn!("interpolation of `{}` dropped: {}", interp.property, e);
                return false;
            }
            !interp.is_finished()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Keyframe;
    use crate::camera::UniversalCamera;
    use crate::scene::{wall, ObjectId};
    use glam::Vec3;

    fn drift() -> Rc<KeyframeAnimation> {
        let mut anim =
            KeyframeAnimation::new("xSlide", Property::PositionY, 10.0, LoopMode::Cycle).unwrap();
        anim.set_keys(vec![Keyframe::new(0.0, -2.0), Keyframe::new(30.0, 2.0)])
            .unwrap();
        Rc::new(anim)
    }

    fn scene_with_wall() -> (Scene, Target) {
        let mut scene = Scene::new(UniversalCamera::new("cam", Vec3::ZERO));
        let id = scene.add_object(wall("wall", Vec3::new(12.0, 4.0, 1.0), Vec3::new(0.0, 2.0, 0.5), None));
        (scene, Target::Object(id))
    }

    fn y_of(scene: &Scene, target: Target) -> f32 {
        scene.get(target, Property::PositionY).unwrap().as_float().unwrap()
    }

    #[test]
    fn test_cycle_restarts_without_reversing() {
        let (mut scene, target) = scene_with_wall();
        let mut animator = Animator::new();
        animator.begin_animation(target, drift(), 0.0, 30.0, true);

        animator.advance(&mut scene, 1.5);
        assert!((y_of(&scene, target) - 0.0).abs() < 1e-4);

        // 3.75s: 37.5 frames wraps to 7.5, still climbing from -2
        animator.advance(&mut scene, 2.25);
        assert!((y_of(&scene, target) - -1.0).abs() < 1e-4);
        assert_eq!(animator.animatables().len(), 1);
    }

    #[test]
    fn test_non_looping_holds_last_value_and_finishes() {
        let (mut scene, target) = scene_with_wall();
        let mut animator = Animator::new();
        animator.begin_animation(target, drift(), 0.0, 30.0, false);

        animator.advance(&mut scene, 5.0);
        assert_eq!(y_of(&scene, target), 2.0);
        assert!(animator.is_idle());
    }

    #[test]
    fn test_interpolation_reaches_target_and_holds() {
        let (mut scene, target) = scene_with_wall();
        let mut animator = Animator::new();
        animator.interpolate(Interpolation::new(target, Property::Alpha, 0.0_f32, 150.0));

        animator.advance(&mut scene, 0.075);
        let alpha = scene.get(target, Property::Alpha).unwrap().as_float().unwrap();
        assert!((alpha - 0.5).abs() < 1e-4);

        animator.advance(&mut scene, 0.1);
        assert_eq!(scene.get(target, Property::Alpha).unwrap(), PropertyValue::Float(0.0));
        assert!(animator.interpolations().is_empty());

        animator.advance(&mut scene, 1.0);
        assert_eq!(scene.get(target, Property::Alpha).unwrap(), PropertyValue::Float(0.0));
    }

    #[test]
    fn test_same_property_replaces_in_flight() {
        let (mut scene, target) = scene_with_wall();
        let mut animator = Animator::new();
        assert!(!animator.interpolate(Interpolation::new(target, Property::Scaling, Vec3::splat(1.1), 150.0)));
        animator.advance(&mut scene, 0.05);
        assert!(animator.interpolate(Interpolation::new(target, Property::Scaling, Vec3::ONE, 150.0)));
        assert_eq!(animator.interpolations().len(), 1);

        animator.advance(&mut scene, 0.2);
        assert_eq!(scene.get(target, Property::Scaling).unwrap(), PropertyValue::Vec3(Vec3::ONE));
    }

    #[test]
    fn test_stop_other_animations() {
        let (mut scene, target) = scene_with_wall();
        let mut animator = Animator::new();
        animator.begin_animation(target, drift(), 0.0, 30.0, true);
        animator.interpolate(
            Interpolation::new(target, Property::Position, Vec3::new(0.0, -5.0, 0.5), 1100.0)
                .stopping_other_animations(),
        );
        assert!(animator.animatables().is_empty());

        animator.advance(&mut scene, 1.2);
        assert_eq!(
            scene.get(target, Property::Position).unwrap(),
            PropertyValue::Vec3(Vec3::new(0.0, -5.0, 0.5))
        );
    }

    #[test]
    fn test_delayed_interpolation_captures_late_value() {
        let (mut scene, target) = scene_with_wall();
        let mut animator = Animator::new();
        animator.interpolate(Interpolation::new(target, Property::Alpha, 0.0_f32, 100.0).with_delay(100.0));
        scene.set(target, Property::Alpha, PropertyValue::Float(0.8)).unwrap();

        animator.advance(&mut scene, 0.1);
        assert_eq!(animator.interpolations()[0].start_value(), Some(PropertyValue::Float(0.8)));
    }

    #[test]
    fn test_bad_target_is_dropped() {
        let (mut scene, _) = scene_with_wall();
        let mut animator = Animator::new();
        animator.interpolate(Interpolation::new(Target::Object(ObjectId(7)), Property::Alpha, 0.0_f32, 100.0));
        animator.advance(&mut scene, 0.016);
        assert!(animator.is_idle());
    }

    #[test]
    fn test_shared_definition() {
        let (mut scene, target) = scene_with_wall();
        let other = Target::Object(scene.add_object(wall("w2", Vec3::ONE, Vec3::ZERO, None)));
        let anim = drift();
        let mut animator = Animator::new();
        animator.begin_animation(target, anim.clone(), 0.0, 30.0, true);
        animator.begin_animation(other, anim, 0.0, 30.0, true);

        let [a, b] = animator.animatables() else { panic!("expected two animatables") };
        assert!(a.shares_definition_with(b));

        animator.advance(&mut scene, 0.7);
        assert_eq!(y_of(&scene, target), y_of(&scene, other));
    }
}
