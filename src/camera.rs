use glam::Vec3;

use crate::input::Button;
use crate::math::Ray;

pub const CAMERA_SPEED: f32 = 0.1;
pub const CAMERA_ROTATION_SPEED: f32 = 0.05;
/// Vertical field of view in radians
pub const DEFAULT_FOV: f32 = 0.8;

#[derive(Debug, Default, Clone, Copy)]
pub struct MovementState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
}

impl MovementState {
    const fn to_direction(&self, positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    const fn velocity(&self) -> (f32, f32, f32) {
        (
            self.to_direction(self.forward, self.backward),
            self.to_direction(self.right, self.left),
            self.to_direction(self.up, self.down),
        )
    }

    const fn rotation_velocity(&self) -> f32 {
        self.to_direction(self.rotate_right, self.rotate_left)
    }

    pub const fn is_idle(&self) -> bool {
        !(self.forward
            || self.backward
            || self.left
            || self.right
            || self.up
            || self.down
            || self.rotate_left
            || self.rotate_right)
    }
}

/// First-person camera. Orientation is yaw/pitch, so moving the camera keeps
/// the direction it looks in.
#[derive(Debug, Clone)]
pub struct UniversalCamera {
    pub name: String,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub ellipsoid: Vec3,
    pub check_collisions: bool,
    pub apply_gravity: bool,
    /// Whether user input drives the camera
    pub attached: bool,
    pub movement: MovementState,
}

impl UniversalCamera {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov: DEFAULT_FOV,
            aspect: 1.0,
            ellipsoid: Vec3::ONE,
            check_collisions: false,
            apply_gravity: false,
            attached: false,
            movement: MovementState::default(),
        }
    }

    /// Point the camera at `target`. No-op when the target is the camera position.
    pub fn set_target(&mut self, target: Vec3) {
        let dir = target - self.position;
        let len = dir.length();
        if len <= f32::EPSILON {
            return;
        }
        self.yaw = dir.x.atan2(dir.z);
        self.pitch = (dir.y / len).clamp(-1.0, 1.0).asin();
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Left-handed: +X is right of a +Z forward
    pub fn right(&self) -> Vec3 {
        Vec3::Y.cross(self.forward()).normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.forward().cross(self.right()).normalize()
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Ray through normalized device coordinates (x right, y up, both in [-1, 1])
    pub fn ray_through(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let half_height = (self.fov * 0.5).tan();
        let half_width = half_height * self.aspect;
        let direction = self.forward()
            + self.right() * ndc_x * half_width
            + self.up() * ndc_y * half_height;
        Ray::new(self.position, direction)
    }

    /// NDC of a world point, the inverse of [`ray_through`](Self::ray_through).
    /// None when the point is not in front of the camera.
    pub fn project(&self, point: Vec3) -> Option<(f32, f32)> {
        let offset = point - self.position;
        let depth = offset.dot(self.forward());
        if depth <= f32::EPSILON {
            return None;
        }
        let half_height = (self.fov * 0.5).tan();
        let half_width = half_height * self.aspect;
        Some((
            offset.dot(self.right()) / (depth * half_width),
            offset.dot(self.up()) / (depth * half_height),
        ))
    }

    pub fn update(&mut self) {
        if !self.attached {
            return;
        }

        let (fwd, right_dir, up_dir) = self.movement.velocity();

        let displacement = self.forward() * fwd * CAMERA_SPEED
            + self.right() * right_dir * CAMERA_SPEED
            + Vec3::Y * up_dir * CAMERA_SPEED;

        self.position += displacement;
        self.yaw += self.movement.rotation_velocity() * CAMERA_ROTATION_SPEED;
    }

    pub fn process_button(&mut self, button: Button, is_pressed: bool) {
        match button {
            Button::KeyW => self.movement.forward = is_pressed,
            Button::KeyS => self.movement.backward = is_pressed,
            Button::KeyA => self.movement.left = is_pressed,
            Button::KeyD => self.movement.right = is_pressed,
            Button::Space => self.movement.up = is_pressed,
            Button::Shift => self.movement.down = is_pressed,
            Button::KeyQ => self.movement.rotate_left = is_pressed,
            Button::KeyE => self.movement.rotate_right = is_pressed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_set_target_looks_at_point() {
        let mut camera = UniversalCamera::new("cam", Vec3::new(0.0, 1.6, -10.0));
        camera.set_target(Vec3::ZERO);
        let expected = (Vec3::ZERO - camera.position).normalize();
        assert!(approx(camera.forward(), expected));
    }

    #[test]
    fn test_set_target_on_self_is_noop() {
        let mut camera = UniversalCamera::new("cam", Vec3::ONE);
        camera.yaw = 0.3;
        camera.set_target(Vec3::ONE);
        assert_eq!(camera.yaw, 0.3);
    }

    #[test]
    fn test_basis_is_left_handed() {
        let camera = UniversalCamera::new("cam", Vec3::ZERO);
        assert!(approx(camera.forward(), Vec3::Z));
        assert!(approx(camera.right(), Vec3::X));
        assert!(approx(camera.up(), Vec3::Y));
    }

    #[test]
    fn test_center_ray_follows_forward() {
        let mut camera = UniversalCamera::new("cam", Vec3::new(0.0, 1.6, -10.0));
        camera.set_target(Vec3::ZERO);
        let ray = camera.ray_through(0.0, 0.0);
        assert_eq!(ray.origin, camera.position);
        assert!(approx(ray.direction, camera.forward()));
    }

    #[test]
    fn test_edge_ray_spans_fov() {
        let camera = UniversalCamera::new("cam", Vec3::ZERO);
        let ray = camera.ray_through(0.0, 1.0);
        let angle = ray.direction.angle_between(Vec3::Z);
        assert!((angle - DEFAULT_FOV * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_project_inverts_ray() {
        let mut camera = UniversalCamera::new("cam", Vec3::new(0.0, 1.6, -10.0));
        camera.set_target(Vec3::ZERO);
        camera.set_viewport(800, 600);
        let ray = camera.ray_through(0.3, -0.2);
        let (x, y) = camera.project(ray.origin + ray.direction * 5.0).unwrap();
        assert!((x - 0.3).abs() < 1e-4 && (y - -0.2).abs() < 1e-4);
        assert_eq!(camera.project(camera.position - camera.forward()), None);
    }

    #[test]
    fn test_viewport_aspect() {
        let mut camera = UniversalCamera::new("cam", Vec3::ZERO);
        camera.set_viewport(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.set_viewport(0, 400);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_detached_camera_ignores_movement() {
        let mut camera = UniversalCamera::new("cam", Vec3::ZERO);
        camera.process_button(Button::KeyW, true);
        camera.update();
        assert_eq!(camera.position, Vec3::ZERO);

        camera.attached = true;
        camera.update();
        assert!(approx(camera.position, Vec3::Z * CAMERA_SPEED));
    }

    #[test]
    fn test_rotation_keys() {
        let mut camera = UniversalCamera::new("cam", Vec3::ZERO);
        camera.attached = true;
        camera.process_button(Button::KeyE, true);
        camera.update();
        assert!((camera.yaw - CAMERA_ROTATION_SPEED).abs() < 1e-6);
        camera.process_button(Button::KeyE, false);
        assert!(camera.movement.is_idle());
    }
}
