use std::fmt;

use glam::{DVec3, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::MaterialId;
use crate::math::AABB;

/// Index of an object inside its [`Scene`](super::Scene)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Texture atlas laid out as `columns x rows`, one cell per box face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceAtlas {
    pub columns: u32,
    pub rows: u32,
    pub wrap: bool,
}

impl FaceAtlas {
    /// UV rectangle (u0, v0, u1, v1) for each of the six faces
    pub fn face_uvs(&self) -> [Vec4; 6] {
        let columns = self.columns.max(1) as f32;
        let rows = self.rows.max(1) as f32;
        std::array::from_fn(|i| Vec4::new(i as f32 / columns, 0.0, (i + 1) as f32 / columns, 1.0 / rows))
    }
}

/// Primitive geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Flat XZ plane, `width` along X and `height` along Z
    Ground { width: f32, height: f32 },
    Box {
        width: f32,
        height: f32,
        depth: f32,
        faces: Option<FaceAtlas>,
    },
}

impl Shape {
    pub fn extents(&self) -> Vec3 {
        match *self {
            Shape::Ground { width, height } => Vec3::new(width, 0.0, height),
            Shape::Box { width, height, depth, .. } => Vec3::new(width, height, depth),
        }
    }
}

/// Mesh in the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub shape: Shape,
    pub position: Vec3,
    /// Euler angles in radians, double precision so a continuous spin does not drift
    pub rotation: DVec3,
    pub scaling: Vec3,
    pub material: Option<MaterialId>,
    pub check_collisions: bool,
    pub is_visible: bool,
    pub is_pickable: bool,
    pub alpha: f32,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            position: Vec3::ZERO,
            rotation: DVec3::ZERO,
            scaling: Vec3::ONE,
            material: None,
            check_collisions: false,
            is_visible: true,
            is_pickable: true,
            alpha: 1.0,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_material(mut self, material: Option<MaterialId>) -> Self {
        self.material = material;
        self
    }

    pub fn with_collisions(mut self, check_collisions: bool) -> Self {
        self.check_collisions = check_collisions;
        self
    }

    /// World bounds, accounting for scaling and yaw
    pub fn bounds(&self) -> AABB {
        let half = self.shape.extents() * self.scaling * 0.5;
        let (sin, cos) = (self.rotation.y as f32).sin_cos();
        let rotated = Vec3::new(
            (cos * half.x).abs() + (sin * half.z).abs(),
            half.y,
            (sin * half.x).abs() + (cos * half.z).abs(),
        );
        AABB::from_center(self.position, rotated)
    }
}
