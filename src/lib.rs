pub mod actions;
pub mod animation;
pub mod camera;
pub mod choreography;
pub mod cli;
pub mod config;
pub mod controller;
pub mod frame;
pub mod host;
pub mod input;
pub mod math;
pub mod room;
pub mod scene;
pub mod xr;

pub use choreography::{RevealPolicy, RevealState, REVEAL_STEP_COUNT};
pub use config::SceneConfig;
pub use controller::{RoomController, SceneSnapshot, SetupError};
