mod registry;

pub use registry::ActionRegistry;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{Animator, Interpolation};
use crate::scene::{ObjectId, Property, PropertyValue, Scene, SceneError, Target};

/// Event that fires a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    EveryFrame,
    PointerOver,
    PointerOut,
    Pick,
}

/// Owner of a binding: the whole scene or one object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Scene,
    Object(ObjectId),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("`{0}` cannot be incremented")]
    NotIncrementable(Property),
    #[error("combined action is empty")]
    EmptyCombine,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Add `amount` to a property
    Increment {
        target: Target,
        property: Property,
        amount: PropertyValue,
    },
    /// Schedule a fresh copy of this interpolation
    Interpolate(Interpolation),
    /// Run every child, in order, within one dispatch
    Combine(Vec<Action>),
}

impl Action {
    pub fn increment(target: impl Into<Target>, property: Property, amount: impl Into<PropertyValue>) -> Self {
        Action::Increment {
            target: target.into(),
            property,
            amount: amount.into(),
        }
    }

    /// Check that every target exists and every value fits its property
    pub fn validate(&self, scene: &Scene) -> Result<(), ActionError> {
        match self {
            Action::Increment {
                target,
                property,
                amount,
            } => {
                scene.supports(*target, *property)?;
                check_kind(*property, *amount)?;
                if amount.offset(*amount).is_none() {
                    return Err(ActionError::NotIncrementable(*property));
                }
                Ok(())
            }
            Action::Interpolate(interp) => {
                scene.supports(interp.target, interp.property)?;
                check_kind(interp.property, interp.to)
            }
            Action::Combine(children) => {
                if children.is_empty() {
                    return Err(ActionError::EmptyCombine);
                }
                children.iter().try_for_each(|child| child.validate(scene))
            }
        }
    }

    /// Apply the action. Failed writes are logged and skipped.
    pub fn execute(&self, scene: &mut Scene, animator: &mut Animator) {
        match self {
            Action::Increment {
                target,
                property,
                amount,
            } => {
                if let Err(e) = scene.increment(*target, *property, *amount) {
                    log::warn!("increment skipped: {}", e);
                }
            }
            Action::Interpolate(interp) => {
                animator.interpolate(interp.restarted());
            }
            Action::Combine(children) => {
                for child in children {
                    child.execute(scene, animator);
                }
            }
        }
    }

    /// Interpolations scheduled by one execution
    pub fn interpolation_count(&self) -> usize {
        match self {
            Action::Increment { .. } => 0,
            Action::Interpolate(_) => 1,
            Action::Combine(children) => children.iter().map(Action::interpolation_count).sum(),
        }
    }
}

fn check_kind(property: Property, value: PropertyValue) -> Result<(), ActionError> {
    if value.kind() != property.value_kind() {
        return Err(SceneError::TypeMismatch {
            property,
            expected: property.value_kind(),
            found: value.kind(),
        }
        .into());
    }
    Ok(())
}
