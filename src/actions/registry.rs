use std::collections::HashMap;

use super::{Action, ActionError, Scope, Trigger};
use crate::animation::Animator;
use crate::scene::{Scene, SceneError};

/// Ordered actions bound per (scope, trigger)
#[derive(Debug, Default)]
pub struct ActionRegistry {
    bindings: HashMap<(Scope, Trigger), Vec<Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `action` against `scene` and append it to the binding
    pub fn register(
        &mut self,
        scene: &Scene,
        scope: Scope,
        trigger: Trigger,
        action: Action,
    ) -> Result<(), ActionError> {
        if let Scope::Object(id) = scope {
            scene.object(id).ok_or(SceneError::UnknownObject(id))?;
        }
        action.validate(scene)?;
        self.bindings.entry((scope, trigger)).or_default().push(action);
        Ok(())
    }

    pub fn actions(&self, scope: Scope, trigger: Trigger) -> &[Action] {
        self.bindings
            .get(&(scope, trigger))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether anything is bound on `scope`, for any trigger
    pub fn has_bindings(&self, scope: Scope) -> bool {
        self.bindings.keys().any(|(s, _)| *s == scope)
    }

    /// Total registered actions
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the bound actions in registration order. Returns how many ran.
    pub fn dispatch(&self, scope: Scope, trigger: Trigger, scene: &mut Scene, animator: &mut Animator) -> usize {
        let actions = self.actions(scope, trigger);
        for action in actions {
            action.execute(scene, animator);
        }
        actions.len()
    }
}
