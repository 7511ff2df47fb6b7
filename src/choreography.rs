use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::animation::Interpolation;
use crate::config::RevealConfig;
use crate::room::RoomHandles;
use crate::scene::{Property, Target};

/// Interpolations scheduled by one reveal
pub const REVEAL_STEP_COUNT: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RevealState {
    #[default]
    Unrevealed,
    Revealed,
}

impl fmt::Display for RevealState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevealState::Unrevealed => write!(f, "unrevealed"),
            RevealState::Revealed => write!(f, "revealed"),
        }
    }
}

/// What a select does once the room is already revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RevealPolicy {
    /// Schedule every step again from the current values
    #[default]
    Rerun,
    /// Ignore further selects
    Once,
}

/// Eleven concurrent interpolations that open the room toward the back.
/// Step 6 stops wall1's drift so the wall stays lowered.
pub fn reveal_sequence(room: &RoomHandles, config: &RevealConfig) -> Action {
    let [_, ground2, ground3, ground4] = room.grounds.map(Target::Object);
    let [wall1, wall2, wall3, wall4] = room.walls.map(Target::Object);

    let steps = vec![
        Interpolation::new(ground2, Property::Visibility, true, 150.0),
        Interpolation::new(ground3, Property::Visibility, true, 150.0),
        Interpolation::new(ground4, Property::Visibility, false, 150.0),
        Interpolation::new(ground2, Property::Position, Vec3::new(0.0, 0.0, 14.0), 1.0),
        Interpolation::new(ground3, Property::Position, Vec3::new(0.0, 0.0, 4.0), 550.0),
        Interpolation::new(wall1, Property::Position, Vec3::new(0.0, -5.0, 0.5), 1100.0)
            .stopping_other_animations(),
        Interpolation::new(wall1, Property::Alpha, 0.0_f32, 150.0),
        Interpolation::new(wall2, Property::Alpha, config.wall_alpha, 150.0),
        Interpolation::new(wall3, Property::Alpha, config.wall_alpha, 150.0),
        Interpolation::new(wall4, Property::Alpha, config.wall_alpha, 150.0),
        Interpolation::new(
            Target::Camera,
            Property::Position,
            config.camera_destination,
            config.camera_duration_ms,
        ),
    ];

    Action::Combine(
        steps
            .into_iter()
            .map(|step| Action::Interpolate(step.with_easing(config.easing)))
            .collect(),
    )
}

/// Two-state machine fired by selecting the puzzle box
#[derive(Debug, Clone)]
pub struct RevealSequencer {
    state: RevealState,
    policy: RevealPolicy,
    sequence: Action,
    selections: u32,
    runs: u32,
}

impl RevealSequencer {
    pub fn new(sequence: Action, policy: RevealPolicy) -> Self {
        Self {
            state: RevealState::Unrevealed,
            policy,
            sequence,
            selections: 0,
            runs: 0,
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn policy(&self) -> RevealPolicy {
        self.policy
    }

    pub fn sequence(&self) -> &Action {
        &self.sequence
    }

    /// Selects received so far
    pub fn selections(&self) -> u32 {
        self.selections
    }

    /// Times the sequence was handed out
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Register a select. Returns the sequence to execute, if any.
    pub fn on_select(&mut self) -> Option<&Action> {
        self.selections += 1;
        match (self.state, self.policy) {
            (RevealState::Revealed, RevealPolicy::Once) => {
                log::debug!("Select ignored, room already revealed");
                None
            }
            (state, _) => {
                if state == RevealState::Unrevealed {
                    log::info!("Revealing room");
                } else {
                    log::info!("Re-running reveal ({} so far)", self.runs);
                }
                self.state = RevealState::Revealed;
                self.runs += 1;
                Some(&self.sequence)
            }
        }
    }
}
