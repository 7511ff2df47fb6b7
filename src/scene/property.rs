use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{ObjectId, SceneError};

/// Something whose properties actions and animations can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Object(ObjectId),
    Camera,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Object(id) => write!(f, "object {}", id),
            Target::Camera => write!(f, "camera"),
        }
    }
}

impl From<ObjectId> for Target {
    fn from(id: ObjectId) -> Self {
        Target::Object(id)
    }
}

/// Animatable property paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    #[serde(rename = "position")]
    Position,
    #[serde(rename = "position.y")]
    PositionY,
    #[serde(rename = "rotation.y")]
    RotationY,
    #[serde(rename = "scaling")]
    Scaling,
    #[serde(rename = "isVisible")]
    Visibility,
    #[serde(rename = "alpha")]
    Alpha,
}

impl Property {
    pub const ALL: [Property; 6] = [
        Property::Position,
        Property::PositionY,
        Property::RotationY,
        Property::Scaling,
        Property::Visibility,
        Property::Alpha,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Property::Position => "position",
            Property::PositionY => "position.y",
            Property::RotationY => "rotation.y",
            Property::Scaling => "scaling",
            Property::Visibility => "isVisible",
            Property::Alpha => "alpha",
        }
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            Property::Position | Property::Scaling => ValueKind::Vec3,
            Property::PositionY | Property::RotationY | Property::Alpha => ValueKind::Float,
            Property::Visibility => ValueKind::Bool,
        }
    }

    /// True when writing one property can clobber the other
    pub fn overlaps(&self, other: Property) -> bool {
        use Property::*;
        matches!(
            (self, other),
            (Position, PositionY) | (PositionY, Position)
        ) || *self == other
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Property {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::ALL
            .into_iter()
            .find(|p| p.path() == s)
            .ok_or_else(|| SceneError::UnknownProperty(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Vec3,
    Bool,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Float => write!(f, "float"),
            ValueKind::Vec3 => write!(f, "vector3"),
            ValueKind::Bool => write!(f, "boolean"),
        }
    }
}

/// Value carried by a property
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Float(f32),
    Vec3(Vec3),
    Bool(bool),
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Float(_) => ValueKind::Float,
            PropertyValue::Vec3(_) => ValueKind::Vec3,
            PropertyValue::Bool(_) => ValueKind::Bool,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            PropertyValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Linear blend toward `to` at `t` in [0, 1]. `None` when kinds differ.
    ///
    /// Booleans blend as 0/1 and read true whenever the blended number is
    /// non-zero: `false -> true` flips on the first step past 0, `true -> false`
    /// only at `t == 1`.
    pub fn lerp(self, to: PropertyValue, t: f32) -> Option<PropertyValue> {
        match (self, to) {
            (PropertyValue::Float(a), PropertyValue::Float(b)) => {
                Some(PropertyValue::Float(a + (b - a) * t))
            }
            (PropertyValue::Vec3(a), PropertyValue::Vec3(b)) => Some(PropertyValue::Vec3(a.lerp(b, t))),
            (PropertyValue::Bool(a), PropertyValue::Bool(b)) => {
                let (a, b) = (a as u8 as f32, b as u8 as f32);
                Some(PropertyValue::Bool(a + (b - a) * t != 0.0))
            }
            _ => None,
        }
    }

    /// Component-wise sum. Booleans cannot be incremented.
    pub fn offset(self, amount: PropertyValue) -> Option<PropertyValue> {
        match (self, amount) {
            (PropertyValue::Float(a), PropertyValue::Float(b)) => Some(PropertyValue::Float(a + b)),
            (PropertyValue::Vec3(a), PropertyValue::Vec3(b)) => Some(PropertyValue::Vec3(a + b)),
            _ => None,
        }
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<Vec3> for PropertyValue {
    fn from(v: Vec3) -> Self {
        PropertyValue::Vec3(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}
