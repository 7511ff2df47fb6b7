// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::choreography::RevealPolicy;
use crate::config::SceneConfig;
use crate::host::HeadlessPlan;
use crate::xr::{SimulatedXr, UnavailableXr, XrError, XrRuntime};

#[derive(Parser, Debug, Clone)]
#[command(name = "puzzle-room")]
#[command(about = "Puzzle room scene with a scripted reveal", long_about = None)]
pub struct Cli {
    /// Run headless on a simulated frame clock instead of opening a window
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 300)]
    pub frames: u64,

    /// Simulated frame rate in headless mode
    #[arg(long, default_value_t = 60.0)]
    pub fps: f64,

    /// Headless: select the puzzle box at this frame
    #[arg(long = "select-at")]
    pub select_at: Option<u64>,

    /// Headless: move the pointer onto the box at this frame
    #[arg(long = "hover-at")]
    pub hover_at: Option<u64>,

    /// Headless: move the pointer off the box at this frame
    #[arg(long = "unhover-at")]
    pub unhover_at: Option<u64>,

    /// JSON file overriding scene tunables
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// XR runtime to bootstrap against
    #[arg(long, value_enum, default_value_t = XrMode::Unavailable)]
    pub xr: XrMode,

    /// Behavior of selects after the room is revealed (overrides the config file)
    #[arg(long = "reveal-policy", value_enum)]
    pub reveal_policy: Option<RevealPolicy>,

    /// Print the final scene snapshot as JSON
    #[arg(long = "dump-json", default_value = "false")]
    pub dump_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum XrMode {
    /// Do not attempt an XR session
    Off,
    /// Host without XR support
    Unavailable,
    /// Scripted runtime that enters XR
    Simulated,
    /// Scripted runtime that rejects the session
    Failing,
}

impl XrMode {
    pub fn runtime(&self) -> Option<Box<dyn XrRuntime>> {
        match self {
            XrMode::Off => None,
            XrMode::Unavailable => Some(Box::new(UnavailableXr)),
            XrMode::Simulated => Some(Box::new(SimulatedXr::default())),
            XrMode::Failing => Some(Box::new(SimulatedXr::failing(XrError::PermissionDenied))),
        }
    }
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied
    pub fn scene_config(&self) -> anyhow::Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        if let Some(policy) = self.reveal_policy {
            config.reveal.policy = policy;
        }
        Ok(config)
    }

    pub fn headless_plan(&self) -> HeadlessPlan {
        HeadlessPlan {
            frames: self.frames,
            fps: self.fps,
            select_at: self.select_at,
            hover_at: self.hover_at,
            unhover_at: self.unhover_at,
        }
    }
}
