use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::{Action, ActionError, ActionRegistry, Scope, Trigger};
use crate::animation::{AnimationError, Animator, Interpolation};
use crate::choreography::{reveal_sequence, RevealSequencer, RevealState};
use crate::config::SceneConfig;
use crate::frame::FrameInfo;
use crate::input::InputEvent;
use crate::room::{build_room, wall_drift, RoomHandles};
use crate::scene::{ObjectId, Property, Scene, SceneError};
use crate::xr::{XrSessionMode, XrSessionRequest};

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("scene setup failed: {0}")]
    Scene(#[from] SceneError),
    #[error("animation setup failed: {0}")]
    Animation(#[from] AnimationError),
    #[error("action setup failed: {0}")]
    Action(#[from] ActionError),
}

/// Owns the room scene and everything that moves it
pub struct RoomController {
    scene: Scene,
    animator: Animator,
    actions: ActionRegistry,
    sequencer: RevealSequencer,
    room: RoomHandles,
    session_mode: XrSessionMode,
    hovered: Option<ObjectId>,
    /// Object under the pointer when the left button went down
    pressed: Option<ObjectId>,
    frames: u64,
    elapsed: f64,
}

impl RoomController {
    pub fn new(config: &SceneConfig) -> Result<Self, SetupError> {
        let (scene, room) = build_room(config)?;

        let mut animator = Animator::new();
        let drift = Rc::new(wall_drift(&config.drift)?);
        for wall in room.walls {
            animator.begin_animation(
                wall.into(),
                drift.clone(),
                config.drift.start_frame,
                config.drift.end_frame,
                config.drift.looping,
            );
        }

        let mut actions = ActionRegistry::new();
        let puzzle_box = room.puzzle_box;
        actions.register(
            &scene,
            Scope::Scene,
            Trigger::EveryFrame,
            Action::increment(puzzle_box, Property::RotationY, config.spin_per_frame),
        )?;
        actions.register(
            &scene,
            Scope::Object(puzzle_box),
            Trigger::PointerOver,
            Action::Interpolate(Interpolation::new(
                puzzle_box.into(),
                Property::Scaling,
                Vec3::splat(config.hover.scale),
                config.hover.duration_ms,
            )),
        )?;
        actions.register(
            &scene,
            Scope::Object(puzzle_box),
            Trigger::PointerOut,
            Action::Interpolate(Interpolation::new(
                puzzle_box.into(),
                Property::Scaling,
                Vec3::ONE,
                config.hover.duration_ms,
            )),
        )?;

        let sequence = reveal_sequence(&room, &config.reveal);
        sequence.validate(&scene)?;
        let sequencer = RevealSequencer::new(sequence, config.reveal.policy);

        log::info!(
            "Room controller ready: {} actions, {} animations, reveal policy {:?}",
            actions.len(),
            animator.animatables().len(),
            sequencer.policy()
        );

        Ok(Self {
            scene,
            animator,
            actions,
            sequencer,
            room,
            session_mode: config.xr.session_mode,
            hovered: None,
            pressed: None,
            frames: 0,
            elapsed: 0.0,
        })
    }

    /// Per-frame update: navigation, every-frame actions, keyframes, interpolations
    pub fn tick(&mut self, frame: &FrameInfo) {
        self.scene.camera.update();
        self.actions
            .dispatch(Scope::Scene, Trigger::EveryFrame, &mut self.scene, &mut self.animator);
        self.animator.advance(&mut self.scene, frame.delta);
        self.frames += 1;
        self.elapsed += frame.delta;
    }

    /// Select an object. Returns true when the reveal sequence was scheduled.
    pub fn select(&mut self, id: ObjectId) -> bool {
        self.actions
            .dispatch(Scope::Object(id), Trigger::Pick, &mut self.scene, &mut self.animator);
        if id != self.room.puzzle_box {
            return false;
        }
        match self.sequencer.on_select() {
            Some(sequence) => {
                sequence.execute(&mut self.scene, &mut self.animator);
                true
            }
            None => false,
        }
    }

    /// Move the hover to `target`, dispatching out/over only on change
    pub fn hover(&mut self, target: Option<ObjectId>) {
        if target == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered {
            self.actions
                .dispatch(Scope::Object(previous), Trigger::PointerOut, &mut self.scene, &mut self.animator);
        }
        if let Some(next) = target {
            self.actions
                .dispatch(Scope::Object(next), Trigger::PointerOver, &mut self.scene, &mut self.animator);
        }
        log::debug!("Hover {:?} -> {:?}", self.hovered, target);
        self.hovered = target;
    }

    /// Nearest object with bindings under a screen point
    pub fn pick_at(&self, ndc_x: f32, ndc_y: f32) -> Option<ObjectId> {
        let ray = self.scene.camera.ray_through(ndc_x, ndc_y);
        let actions = &self.actions;
        self.scene
            .pick(&ray, |id, _| actions.has_bindings(Scope::Object(id)))
            .map(|(id, _)| id)
    }

    pub fn pointer_at(&mut self, ndc_x: f32, ndc_y: f32) {
        let hit = self.pick_at(ndc_x, ndc_y);
        self.hover(hit);
    }

    pub fn pointer_left(&mut self) {
        self.hover(None);
    }

    pub fn pointer_down(&mut self, ndc_x: f32, ndc_y: f32) {
        self.pressed = self.pick_at(ndc_x, ndc_y);
    }

    /// Select the object under the point if the press started on it too
    pub fn pointer_up(&mut self, ndc_x: f32, ndc_y: f32) -> Option<ObjectId> {
        let pressed = self.pressed.take()?;
        let hit = self.pick_at(ndc_x, ndc_y)?;
        if hit != pressed {
            log::debug!("Pick dropped: pressed {} but released over {}", pressed, hit);
            return None;
        }
        self.select(hit);
        Some(hit)
    }

    /// Press and release at the same point
    pub fn click_at(&mut self, ndc_x: f32, ndc_y: f32) -> Option<ObjectId> {
        self.pointer_down(ndc_x, ndc_y);
        self.pointer_up(ndc_x, ndc_y)
    }

    /// Screen position of an object's center, None when it is behind the camera
    pub fn screen_position(&self, id: ObjectId) -> Option<(f32, f32)> {
        let object = self.scene.object(id)?;
        self.scene.camera.project(object.position)
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Button { button, pressed } => self.scene.camera.process_button(button, pressed),
            InputEvent::PointerMoved { ndc_x, ndc_y } => self.pointer_at(ndc_x, ndc_y),
            InputEvent::PointerDown { ndc_x, ndc_y } => self.pointer_down(ndc_x, ndc_y),
            InputEvent::PointerUp { ndc_x, ndc_y } => {
                self.pointer_up(ndc_x, ndc_y);
            }
            InputEvent::PointerLeft => self.pointer_left(),
        }
    }

    /// Viewport changed size. Only the camera aspect follows.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.camera.set_viewport(width, height);
    }

    pub fn xr_request(&self) -> XrSessionRequest {
        XrSessionRequest {
            floor_meshes: self.room.floor_meshes().to_vec(),
            session_mode: self.session_mode,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn room(&self) -> &RoomHandles {
        &self.room
    }

    pub fn sequencer(&self) -> &RevealSequencer {
        &self.sequencer
    }

    pub fn reveal_state(&self) -> RevealState {
        self.sequencer.state()
    }

    pub fn hovered(&self) -> Option<ObjectId> {
        self.hovered
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Seconds simulated so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            frame: self.frames,
            elapsed: self.elapsed,
            reveal: self.reveal_state(),
            camera: self.scene.camera.position,
            hovered: self
                .hovered
                .and_then(|id| self.scene.object(id))
                .map(|o| o.name.clone()),
            objects: self
                .scene
                .objects()
                .map(|(_, o)| ObjectSnapshot {
                    name: o.name.clone(),
                    position: o.position,
                    rotation_y: o.rotation.y as f32,
                    scaling: o.scaling,
                    visible: o.is_visible,
                    alpha: o.alpha,
                })
                .collect(),
        }
    }
}

/// Serializable view of the choreographed state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub frame: u64,
    pub elapsed: f64,
    pub reveal: RevealState,
    pub camera: Vec3,
    pub hovered: Option<String>,
    pub objects: Vec<ObjectSnapshot>,
}

impl SceneSnapshot {
    pub fn object(&self, name: &str) -> Option<&ObjectSnapshot> {
        self.objects.iter().find(|o| o.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSnapshot {
    pub name: String,
    pub position: Vec3,
    pub rotation_y: f32,
    pub scaling: Vec3,
    pub visible: bool,
    pub alpha: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Button;

    fn controller() -> RoomController {
        RoomController::new(&SceneConfig::default()).unwrap()
    }

    fn frame(number: u64) -> FrameInfo {
        FrameInfo::new(number, 0.0, 1.0 / 60.0)
    }

    #[test]
    fn test_initial_wiring() {
        let c = controller();
        assert_eq!(c.actions().len(), 3);
        assert_eq!(c.animator().animatables().len(), 4);
        assert_eq!(c.reveal_state(), RevealState::Unrevealed);
        assert_eq!(c.hovered(), None);
    }

    #[test]
    fn test_spin_every_frame() {
        let mut c = controller();
        for n in 0..10 {
            c.tick(&frame(n));
        }
        let yaw = c.scene().object(c.room().puzzle_box).unwrap().rotation.y;
        assert!((yaw - 0.1).abs() < 1e-5);
        assert_eq!(c.frames(), 10);
    }

    #[test]
    fn test_center_of_screen_picks_box() {
        let c = controller();
        assert_eq!(c.pick_at(0.0, 0.0), Some(c.room().puzzle_box));
        // Off to the side only walls and floor, none of which have bindings
        assert_eq!(c.pick_at(0.9, -0.9), None);
    }

    #[test]
    fn test_hover_transitions_once() {
        let mut c = controller();
        c.pointer_at(0.0, 0.0);
        c.pointer_at(0.0, 0.0);
        assert_eq!(c.animator().interpolations().len(), 1);
        assert_eq!(c.hovered(), Some(c.room().puzzle_box));

        c.pointer_left();
        assert_eq!(c.hovered(), None);
        assert_eq!(c.animator().interpolations().len(), 1);
        assert_eq!(c.animator().interpolations()[0].to, Vec3::ONE.into());
    }

    #[test]
    fn test_select_other_object_does_not_reveal() {
        let mut c = controller();
        let wall = c.room().walls[1];
        assert!(!c.select(wall));
        assert_eq!(c.reveal_state(), RevealState::Unrevealed);
    }

    #[test]
    fn test_click_reveals() {
        let mut c = controller();
        assert_eq!(c.click_at(0.0, 0.0), Some(c.room().puzzle_box));
        assert_eq!(c.reveal_state(), RevealState::Revealed);
        assert_eq!(c.animator().interpolations().len(), 11);
        // wall1 drift stopped by the lowering step
        assert_eq!(c.animator().animatables().len(), 3);
    }

    #[test]
    fn test_drag_onto_box_does_not_select() {
        let mut c = controller();
        c.pointer_down(-0.95, 0.95);
        assert_eq!(c.pointer_up(0.0, 0.0), None);
        assert_eq!(c.reveal_state(), RevealState::Unrevealed);

        c.pointer_down(0.0, 0.0);
        assert_eq!(c.pointer_up(0.9, -0.9), None);
        assert_eq!(c.reveal_state(), RevealState::Unrevealed);

        // A release without a press never selects
        assert_eq!(c.pointer_up(0.0, 0.0), None);
        assert!(c.animator().interpolations().is_empty());
    }

    #[test]
    fn test_press_and_release_on_box_selects() {
        let mut c = controller();
        c.handle_input(InputEvent::PointerDown { ndc_x: 0.0, ndc_y: 0.0 });
        assert_eq!(c.reveal_state(), RevealState::Unrevealed);
        c.handle_input(InputEvent::PointerUp { ndc_x: 0.01, ndc_y: 0.0 });
        assert_eq!(c.reveal_state(), RevealState::Revealed);
    }

    #[test]
    fn test_box_screen_position() {
        let mut c = controller();
        let box_id = c.room().puzzle_box;
        let (x, y) = c.screen_position(box_id).unwrap();
        assert_eq!(c.pick_at(x, y), Some(box_id));

        c.click_at(x, y);
        for n in 0..130 {
            c.tick(&frame(n));
        }
        assert_eq!(c.screen_position(box_id), None);
    }

    #[test]
    fn test_long_session_keeps_time_and_spin() {
        let mut c = controller();
        for n in 0..36_030 {
            c.tick(&frame(n));
        }
        assert!((c.elapsed() - 600.5).abs() < 1e-6, "elapsed {}", c.elapsed());

        let yaw = c.scene().object(c.room().puzzle_box).unwrap().rotation.y;
        let expected = (36_030.0 * 0.01_f64).rem_euclid(std::f64::consts::TAU);
        assert!((yaw - expected).abs() < 1e-4, "yaw {} expected {}", yaw, expected);

        // 6005 drift frames: 5 frames into the 201st cycle
        let wall = c.scene().object(c.room().walls[1]).unwrap();
        let drift = -2.0 + 4.0 * 5.0 / 30.0;
        assert!((wall.position.y - drift).abs() < 1e-3, "wall at {}", wall.position.y);
    }

    #[test]
    fn test_keyboard_moves_camera() {
        let mut c = controller();
        let start = c.scene().camera.position;
        c.handle_input(InputEvent::Button {
            button: Button::KeyW,
            pressed: true,
        });
        c.tick(&frame(0));
        assert!(c.scene().camera.position.z > start.z);
    }

    #[test]
    fn test_resize_only_changes_aspect() {
        let mut c = controller();
        let before = c.snapshot();
        c.resize(1600, 800);
        assert_eq!(c.scene().camera.aspect, 2.0);
        assert_eq!(c.snapshot(), before);
    }

    #[test]
    fn test_xr_request_uses_floor_meshes() {
        let c = controller();
        let request = c.xr_request();
        assert_eq!(request.floor_meshes, c.room().floor_meshes().to_vec());
        assert_eq!(request.session_mode, XrSessionMode::ImmersiveVr);
    }

    #[test]
    fn test_snapshot_json() {
        let c = controller();
        let json = serde_json::to_value(c.snapshot()).unwrap();
        assert_eq!(json["reveal"], "Unrevealed");
        assert_eq!(json["objects"].as_array().unwrap().len(), 10);
        assert_eq!(c.snapshot().object("wall1").unwrap().alpha, 0.1);
    }
}
