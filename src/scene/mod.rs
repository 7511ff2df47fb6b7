mod factory;
mod material;
mod object;
mod property;

pub use factory::{atlas_cube, ground, skybox, solid_box, wall};
pub use material::{CoordinatesMode, Material, MaterialId, Texture, TextureKind};
pub use object::{FaceAtlas, ObjectId, SceneObject, Shape};
pub use property::{Property, PropertyValue, Target, ValueKind};

use std::f64::consts::TAU;

use glam::Vec3;
use thiserror::Error;

use crate::camera::UniversalCamera;
use crate::math::{Color3, Ray};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),
    #[error("unknown {0}")]
    UnknownMaterial(MaterialId),
    #[error("unknown property path `{0}`")]
    UnknownProperty(String),
    #[error("{target} does not expose `{property}`")]
    UnsupportedProperty { target: Target, property: Property },
    #[error("`{property}` holds a {expected} value, got {found}")]
    TypeMismatch {
        property: Property,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// Hemispheric ambient light
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphericLight {
    pub name: String,
    pub direction: Vec3,
}

impl HemisphericLight {
    pub fn new(name: impl Into<String>, direction: Vec3) -> Self {
        Self {
            name: name.into(),
            direction,
        }
    }
}

/// Scene graph: objects, shared materials, camera and light
#[derive(Debug, Clone)]
pub struct Scene {
    pub clear_color: Color3,
    pub collisions_enabled: bool,
    pub gravity: Vec3,
    pub camera: UniversalCamera,
    pub lights: Vec<HemisphericLight>,
    objects: Vec<SceneObject>,
    materials: Vec<Material>,
}

impl Scene {
    pub fn new(camera: UniversalCamera) -> Self {
        Self {
            clear_color: Color3::WHITE,
            collisions_enabled: false,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            camera,
            lights: Vec::new(),
            objects: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SceneObject)> {
        self.objects.iter().enumerate().map(|(i, o)| (ObjectId(i), o))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// First object with this name
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects().find(|(_, o)| o.name == name).map(|(id, _)| id)
    }

    /// Attach a shared material. The object's alpha starts from the material's.
    pub fn bind_material(&mut self, object: ObjectId, material: MaterialId) -> Result<(), SceneError> {
        let alpha = self
            .material(material)
            .ok_or(SceneError::UnknownMaterial(material))?
            .alpha;
        let obj = self.object_mut(object).ok_or(SceneError::UnknownObject(object))?;
        obj.material = Some(material);
        obj.alpha = alpha;
        Ok(())
    }

    /// Every object referencing `material`
    pub fn objects_using(&self, material: MaterialId) -> Vec<ObjectId> {
        self.objects()
            .filter(|(_, o)| o.material == Some(material))
            .map(|(id, _)| id)
            .collect()
    }

    /// Check that `target` exists and exposes `property`
    pub fn supports(&self, target: Target, property: Property) -> Result<(), SceneError> {
        match target {
            Target::Object(id) => {
                self.object(id).ok_or(SceneError::UnknownObject(id))?;
                Ok(())
            }
            Target::Camera => match property {
                Property::Position | Property::PositionY => Ok(()),
                _ => Err(SceneError::UnsupportedProperty { target, property }),
            },
        }
    }

    pub fn get(&self, target: Target, property: Property) -> Result<PropertyValue, SceneError> {
        self.supports(target, property)?;
        let value: PropertyValue = match target {
            Target::Camera => match property {
                Property::Position => self.camera.position.into(),
                _ => self.camera.position.y.into(),
            },
            Target::Object(id) => {
                let obj = self.object(id).ok_or(SceneError::UnknownObject(id))?;
                match property {
                    Property::Position => obj.position.into(),
                    Property::PositionY => obj.position.y.into(),
                    Property::RotationY => (obj.rotation.y as f32).into(),
                    Property::Scaling => obj.scaling.into(),
                    Property::Visibility => obj.is_visible.into(),
                    Property::Alpha => obj.alpha.into(),
                }
            }
        };
        Ok(value)
    }

    /// Write a property. Yaw is kept in `[0, 2π)`.
    pub fn set(&mut self, target: Target, property: Property, value: PropertyValue) -> Result<(), SceneError> {
        self.supports(target, property)?;
        let mismatch = || SceneError::TypeMismatch {
            property,
            expected: property.value_kind(),
            found: value.kind(),
        };

        match target {
            Target::Camera => match property {
                Property::Position => self.camera.position = value.as_vec3().ok_or_else(mismatch)?,
                _ => self.camera.position.y = value.as_float().ok_or_else(mismatch)?,
            },
            Target::Object(id) => {
                let obj = self.objects.get_mut(id.0).ok_or(SceneError::UnknownObject(id))?;
                match property {
                    Property::Position => obj.position = value.as_vec3().ok_or_else(mismatch)?,
                    Property::PositionY => obj.position.y = value.as_float().ok_or_else(mismatch)?,
                    Property::RotationY => {
                        obj.rotation.y = f64::from(value.as_float().ok_or_else(mismatch)?).rem_euclid(TAU)
                    }
                    Property::Scaling => obj.scaling = value.as_vec3().ok_or_else(mismatch)?,
                    Property::Visibility => obj.is_visible = value.as_bool().ok_or_else(mismatch)?,
                    Property::Alpha => obj.alpha = value.as_float().ok_or_else(mismatch)?,
                }
            }
        }
        Ok(())
    }

    /// Add `amount` to a property. Yaw is summed in double precision.
    pub fn increment(&mut self, target: Target, property: Property, amount: PropertyValue) -> Result<(), SceneError> {
        let mismatch = || SceneError::TypeMismatch {
            property,
            expected: property.value_kind(),
            found: amount.kind(),
        };

        if let (Target::Object(id), Property::RotationY) = (target, property) {
            let turn = amount.as_float().ok_or_else(mismatch)?;
            let obj = self.object_mut(id).ok_or(SceneError::UnknownObject(id))?;
            obj.rotation.y = (obj.rotation.y + f64::from(turn)).rem_euclid(TAU);
            return Ok(());
        }

        let next = self.get(target, property)?.offset(amount).ok_or_else(mismatch)?;
        self.set(target, property, next)
    }

    /// Nearest visible, pickable object hit by `ray` that passes `filter`
    pub fn pick<F>(&self, ray: &Ray, filter: F) -> Option<(ObjectId, f32)>
    where
        F: Fn(ObjectId, &SceneObject) -> bool,
    {
        self.objects()
            .filter(|(id, o)| o.is_visible && o.is_pickable && filter(*id, o))
            .filter_map(|(id, o)| ray.intersect_aabb(&o.bounds()).map(|t| (id, t)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
