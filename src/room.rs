use glam::Vec3;

use crate::animation::{AnimationError, Keyframe, KeyframeAnimation, LoopMode};
use crate::camera::UniversalCamera;
use crate::config::{DriftConfig, SceneConfig};
use crate::scene::{
    atlas_cube, ground, skybox, solid_box, wall, CoordinatesMode, HemisphericLight, Material,
    MaterialId, ObjectId, Property, Scene, SceneError, Texture,
};

// === Room layout ===

const FLOOR_TEXTURE: &str = "floor.png";
const BOX_TEXTURE: &str = "cube-faces.png";
const SKYBOX_TEXTURE: &str = "textures/skybox";
const WALL_ALPHA: f32 = 0.1;
const SKYBOX_SIZE: f32 = 1000.0;
const BOX_SIZE: f32 = 0.5;
const BOX_FACE_COLUMNS: u32 = 6;
const BOX_POSITION: Vec3 = Vec3::new(0.0, 0.5, -4.0);

/// Ids of everything the controller choreographs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomHandles {
    /// ground1..ground4
    pub grounds: [ObjectId; 4],
    /// wall1..wall4
    pub walls: [ObjectId; 4],
    pub puzzle_box: ObjectId,
    pub skybox: ObjectId,
    pub floor_material: MaterialId,
    pub wall_material: MaterialId,
    pub box_material: MaterialId,
    pub skybox_material: MaterialId,
}

impl RoomHandles {
    /// Meshes the XR session may use as floor (ground1..ground3)
    pub fn floor_meshes(&self) -> [ObjectId; 3] {
        [self.grounds[0], self.grounds[1], self.grounds[2]]
    }
}

/// Build the room scene: environment, camera, light, materials and geometry
pub fn build_room(config: &SceneConfig) -> Result<(Scene, RoomHandles), SceneError> {
    let mut camera = UniversalCamera::new("camera", config.camera.start);
    camera.set_target(config.camera.target);
    camera.fov = config.camera.fov;
    camera.ellipsoid = Vec3::ONE;
    camera.check_collisions = true;
    camera.apply_gravity = true;
    camera.attached = true;

    let mut scene = Scene::new(camera);
    scene.clear_color = config.clear_color;
    scene.collisions_enabled = true;
    scene.gravity = config.gravity;
    scene.lights.push(HemisphericLight::new("light", Vec3::new(1.0, 1.0, 0.0)));

    let floor_material = scene.add_material(Material::textured("floorMat", FLOOR_TEXTURE));
    let wall_material = scene.add_material(Material::textured("wallMat", FLOOR_TEXTURE).with_alpha(WALL_ALPHA));
    let mut box_mat = Material::new("boxMat").unlit();
    box_mat.emissive_texture = Some(Texture::image(BOX_TEXTURE));
    let box_material = scene.add_material(box_mat);
    let mut sky_mat = Material::new("skyBox").unlit();
    sky_mat.back_face_culling = false;
    sky_mat.reflection_texture = Some(Texture::cube(SKYBOX_TEXTURE).with_coordinates_mode(CoordinatesMode::Skybox));
    let skybox_material = scene.add_material(sky_mat);

    let grounds = [
        scene.add_object(ground("ground1", 12.0, 12.0, Vec3::new(0.0, 0.0, -6.0), None)),
        scene.add_object(ground("ground2", 12.0, 12.0, Vec3::new(0.0, 0.0, -6.0), None)),
        scene.add_object(ground("ground3", 6.0, 8.0, Vec3::new(0.0, -2.0, 4.0), None)),
        scene.add_object(solid_box(
            "ground4",
            Vec3::new(12.0, 0.1, 12.0),
            Vec3::new(0.0, -0.05, 14.0),
            None,
        )),
    ];
    for id in grounds {
        scene.bind_material(id, floor_material)?;
    }
    for hidden in [grounds[1], grounds[2]] {
        if let Some(obj) = scene.object_mut(hidden) {
            obj.is_visible = false;
        }
    }

    let walls = [
        scene.add_object(wall("wall1", Vec3::new(12.0, 4.0, 1.0), Vec3::new(0.0, 2.0, 0.5), None)),
        scene.add_object(wall("wall2", Vec3::new(1.0, 4.0, 12.0), Vec3::new(-6.5, 2.0, -6.0), None)),
        scene.add_object(wall("wall3", Vec3::new(1.0, 4.0, 12.0), Vec3::new(6.5, 2.0, -6.0), None)),
        scene.add_object(wall("wall4", Vec3::new(12.0, 4.0, 1.0), Vec3::new(0.0, 2.0, -12.5), None)),
    ];
    for id in walls {
        scene.bind_material(id, wall_material)?;
    }

    let puzzle_box = scene.add_object(atlas_cube("box", BOX_SIZE, BOX_FACE_COLUMNS, 1).with_position(BOX_POSITION));
    scene.bind_material(puzzle_box, box_material)?;

    let skybox = scene.add_object(skybox("skyBox", SKYBOX_SIZE, None));
    scene.bind_material(skybox, skybox_material)?;

    log::info!(
        "Room scene created: {} objects, {} materials",
        scene.len(),
        scene.materials().len()
    );

    Ok((
        scene,
        RoomHandles {
            grounds,
            walls,
            puzzle_box,
            skybox,
            floor_material,
            wall_material,
            box_material,
            skybox_material,
        },
    ))
}

/// The shared vertical wall drift animation
pub fn wall_drift(config: &DriftConfig) -> Result<KeyframeAnimation, AnimationError> {
    let mut anim = KeyframeAnimation::new("xSlide", Property::PositionY, config.frame_rate, LoopMode::Cycle)?;
    anim.set_keys(vec![
        Keyframe::new(config.start_frame, config.from_value),
        Keyframe::new(config.end_frame, config.to_value),
    ])?;
    Ok(anim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color3;
    use crate::scene::TextureKind;

    fn room() -> (Scene, RoomHandles) {
        build_room(&SceneConfig::default()).unwrap()
    }

    #[test]
    fn test_layout_names_and_positions() {
        let (scene, handles) = room();
        assert_eq!(scene.len(), 10);

        let expect = [
            ("ground1", Vec3::new(0.0, 0.0, -6.0), true),
            ("ground2", Vec3::new(0.0, 0.0, -6.0), false),
            ("ground3", Vec3::new(0.0, -2.0, 4.0), false),
            ("ground4", Vec3::new(0.0, -0.05, 14.0), true),
            ("wall1", Vec3::new(0.0, 2.0, 0.5), true),
            ("wall4", Vec3::new(0.0, 2.0, -12.5), true),
            ("box", Vec3::new(0.0, 0.5, -4.0), true),
        ];
        for (name, position, visible) in expect {
            let id = scene.find(name).unwrap();
            let obj = scene.object(id).unwrap();
            assert_eq!(obj.position, position, "{}", name);
            assert_eq!(obj.is_visible, visible, "{}", name);
        }
        assert_eq!(scene.find("box"), Some(handles.puzzle_box));
    }

    #[test]
    fn test_shared_materials() {
        let (scene, handles) = room();
        assert_eq!(scene.objects_using(handles.floor_material), handles.grounds.to_vec());
        assert_eq!(scene.objects_using(handles.wall_material), handles.walls.to_vec());
        for id in handles.walls {
            assert_eq!(scene.object(id).unwrap().alpha, WALL_ALPHA);
        }
    }

    #[test]
    fn test_skybox_material() {
        let (scene, handles) = room();
        let sky = scene.material(handles.skybox_material).unwrap();
        assert!(!sky.back_face_culling);
        assert_eq!(sky.diffuse_color, Color3::BLACK);
        assert_eq!(sky.specular_color, Color3::BLACK);
        let reflection = sky.reflection_texture.as_ref().unwrap();
        assert_eq!(reflection.kind, TextureKind::Cube);
        assert_eq!(reflection.coordinates_mode, CoordinatesMode::Skybox);
        assert!(!scene.object(handles.skybox).unwrap().is_pickable);
    }

    #[test]
    fn test_environment() {
        let (scene, _) = room();
        assert_eq!(scene.clear_color, Color3::WHITE);
        assert!(scene.collisions_enabled);
        assert_eq!(scene.gravity, Vec3::new(0.0, -0.15, 0.0));
        assert_eq!(scene.lights[0].name, "light");
        assert!(scene.camera.attached);
        assert!(scene.camera.check_collisions && scene.camera.apply_gravity);
    }

    #[test]
    fn test_floor_meshes() {
        let (_, handles) = room();
        assert_eq!(handles.floor_meshes(), [handles.grounds[0], handles.grounds[1], handles.grounds[2]]);
    }

    #[test]
    fn test_wall_drift_definition() {
        let drift = wall_drift(&DriftConfig::default()).unwrap();
        assert_eq!(drift.property, Property::PositionY);
        assert_eq!(drift.value_at(0.0), Some(-2.0));
        assert_eq!(drift.value_at(30.0), Some(2.0));
        assert_eq!(drift.last_frame() / drift.frame_rate, 3.0);
    }
}
