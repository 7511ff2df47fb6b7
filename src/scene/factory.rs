use glam::Vec3;

use super::{FaceAtlas, MaterialId, SceneObject, Shape};

// ============================================================================
// Primitive builders. Extents are passed through unchecked; a degenerate size
// produces degenerate geometry.
// ============================================================================

/// Flat ground plane with collisions enabled
pub fn ground(
    name: &str,
    width: f32,
    height: f32,
    position: Vec3,
    material: Option<MaterialId>,
) -> SceneObject {
    SceneObject::new(name, Shape::Ground { width, height })
        .with_position(position)
        .with_material(material)
        .with_collisions(true)
}

/// Solid box with collisions enabled. Used for walls and thick floor slabs.
pub fn solid_box(name: &str, extents: Vec3, position: Vec3, material: Option<MaterialId>) -> SceneObject {
    SceneObject::new(
        name,
        Shape::Box {
            width: extents.x,
            height: extents.y,
            depth: extents.z,
            faces: None,
        },
    )
    .with_position(position)
    .with_material(material)
    .with_collisions(true)
}

/// Wall segment with collisions enabled
pub fn wall(name: &str, extents: Vec3, position: Vec3, material: Option<MaterialId>) -> SceneObject {
    solid_box(name, extents, position, material)
}

/// Cube textured from a horizontal strip atlas, one column per face
pub fn atlas_cube(name: &str, size: f32, columns: u32, rows: u32) -> SceneObject {
    SceneObject::new(
        name,
        Shape::Box {
            width: size,
            height: size,
            depth: size,
            faces: Some(FaceAtlas { columns, rows, wrap: true }),
        },
    )
}

/// Huge inward-facing cube around the origin. Not pickable, no collisions.
pub fn skybox(name: &str, size: f32, material: Option<MaterialId>) -> SceneObject {
    let mut sky = SceneObject::new(
        name,
        Shape::Box {
            width: size,
            height: size,
            depth: size,
            faces: None,
        },
    )
    .with_material(material);
    sky.is_pickable = false;
    sky
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_has_collisions() {
        let g = ground("ground1", 12.0, 12.0, Vec3::new(0.0, 0.0, -6.0), None);
        assert!(g.check_collisions);
        assert_eq!(g.shape, Shape::Ground { width: 12.0, height: 12.0 });
        assert_eq!(g.position, Vec3::new(0.0, 0.0, -6.0));
    }

    #[test]
    fn test_wall_extents_and_material() {
        let w = wall(
            "wall2",
            Vec3::new(1.0, 4.0, 12.0),
            Vec3::new(-6.5, 2.0, -6.0),
            Some(MaterialId(3)),
        );
        assert_eq!(w.shape.extents(), Vec3::new(1.0, 4.0, 12.0));
        assert_eq!(w.material, Some(MaterialId(3)));
        assert!(w.check_collisions);
    }

    #[test]
    fn test_degenerate_extents_pass_through() {
        let w = wall("flat", Vec3::new(0.0, -4.0, 1.0), Vec3::ZERO, None);
        assert_eq!(w.shape.extents(), Vec3::new(0.0, -4.0, 1.0));
    }

    #[test]
    fn test_skybox_not_pickable() {
        let sky = skybox("skybox", 1000.0, None);
        assert!(!sky.is_pickable);
        assert!(!sky.check_collisions);
        assert_eq!(sky.shape.extents(), Vec3::splat(1000.0));
    }

    #[test]
    fn test_atlas_cube() {
        let cube = atlas_cube("box", 0.5, 6, 1);
        match cube.shape {
            Shape::Box { faces: Some(atlas), width, .. } => {
                assert_eq!(atlas.columns, 6);
                assert!(atlas.wrap);
                assert_eq!(width, 0.5);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }
}
