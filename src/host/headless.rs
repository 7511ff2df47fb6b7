use futures::executor::LocalPool;
use serde::Serialize;

use crate::choreography::RevealState;
use crate::controller::{RoomController, SceneSnapshot};
use crate::frame::FixedFrames;
use crate::xr::{XrBootstrap, XrOutcome, XrRuntime};

/// Scripted interaction for a headless run
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessPlan {
    pub frames: u64,
    pub fps: f64,
    /// Frame at which the puzzle box is selected
    pub select_at: Option<u64>,
    /// Frame at which the pointer moves onto the box
    pub hover_at: Option<u64>,
    /// Frame at which the pointer leaves
    pub unhover_at: Option<u64>,
}

impl Default for HeadlessPlan {
    fn default() -> Self {
        Self {
            frames: 300,
            fps: 60.0,
            select_at: None,
            hover_at: None,
            unhover_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlessReport {
    pub frames: u64,
    pub elapsed: f64,
    pub reveal: RevealState,
    pub selections: u32,
    pub reveal_runs: u32,
    /// None when no XR runtime was given
    #[serde(skip)]
    pub xr: Option<XrOutcome>,
    pub snapshot: SceneSnapshot,
}

impl HeadlessReport {
    pub fn print_summary(&self) {
        println!("Simulated {} frames ({:.2}s)", self.frames, self.elapsed);
        println!("  Reveal: {} ({} selects, {} runs)", self.reveal, self.selections, self.reveal_runs);
        println!("  Camera: {:?}", self.snapshot.camera);
        match &self.xr {
            Some(outcome) => println!("  XR: {:?}", outcome),
            None => println!("  XR: off"),
        }
        for object in &self.snapshot.objects {
            println!(
                "  {:<8} pos {:?} visible {} alpha {:.2}",
                object.name, object.position, object.visible, object.alpha
            );
        }
    }
}

/// Drive the controller from a fixed-rate clock. Pointer actions happen
/// before the tick of their frame, aimed at the box's current screen center
/// and picked like real pointer input. A box behind the camera is missed.
pub fn run_headless(
    controller: &mut RoomController,
    plan: &HeadlessPlan,
    runtime: Option<Box<dyn XrRuntime>>,
) -> HeadlessReport {
    let mut pool = LocalPool::new();
    let xr = runtime.and_then(|runtime| {
        XrBootstrap::spawn(&pool.spawner(), runtime, controller.xr_request())
            .map_err(|e| log::warn!("Failed to start XR bootstrap: {}", e))
            .ok()
    });

    log::info!("Headless run: {} frames at {} fps", plan.frames, plan.fps);
    for frame in FixedFrames::new(plan.fps, plan.frames) {
        let n = Some(frame.number);
        if plan.hover_at == n {
            match box_on_screen(controller) {
                Some((x, y)) => controller.pointer_at(x, y),
                None => log::warn!("Frame {}: box is off screen, hover missed", frame.number),
            }
        }
        if plan.unhover_at == n {
            controller.pointer_left();
        }
        if plan.select_at == n {
            let picked = box_on_screen(controller).and_then(|(x, y)| controller.click_at(x, y));
            if picked.is_none() {
                log::warn!("Frame {}: click missed the box", frame.number);
            }
        }
        controller.tick(&frame);
        pool.run_until_stalled();
    }

    let xr = xr.map(|bootstrap| {
        bootstrap.outcome().unwrap_or_else(|| {
            bootstrap.abort();
            pool.run_until_stalled();
            bootstrap.outcome().unwrap_or(XrOutcome::Aborted)
        })
    });

    HeadlessReport {
        frames: controller.frames(),
        elapsed: controller.elapsed(),
        reveal: controller.reveal_state(),
        selections: controller.sequencer().selections(),
        reveal_runs: controller.sequencer().runs(),
        xr,
        snapshot: controller.snapshot(),
    }
}

fn box_on_screen(controller: &RoomController) -> Option<(f32, f32)> {
    controller.screen_position(controller.room().puzzle_box)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::xr::{SimulatedXr, UnavailableXr};

    #[test]
    fn test_idle_run() {
        let mut controller = RoomController::new(&SceneConfig::default()).unwrap();
        let plan = HeadlessPlan {
            frames: 30,
            ..HeadlessPlan::default()
        };
        let report = run_headless(&mut controller, &plan, None);
        assert_eq!(report.frames, 30);
        assert_eq!(report.reveal, RevealState::Unrevealed);
        assert_eq!(report.xr, None);
    }

    #[test]
    fn test_scripted_pointer_goes_through_picking() {
        let mut controller = RoomController::new(&SceneConfig::default()).unwrap();
        let plan = HeadlessPlan {
            frames: 200,
            hover_at: Some(2),
            select_at: Some(20),
            ..HeadlessPlan::default()
        };
        let report = run_headless(&mut controller, &plan, None);
        assert_eq!(report.snapshot.hovered.as_deref(), Some("box"));
        assert_eq!((report.reveal, report.reveal_runs), (RevealState::Revealed, 1));

        // After the reveal the box is behind the camera, so a second click misses
        let plan = HeadlessPlan {
            frames: 10,
            select_at: Some(0),
            ..HeadlessPlan::default()
        };
        let report = run_headless(&mut controller, &plan, None);
        assert_eq!(report.selections, 1);
    }

    #[test]
    fn test_xr_outcome_does_not_change_scene() {
        let plan = HeadlessPlan {
            frames: 60,
            select_at: Some(5),
            ..HeadlessPlan::default()
        };

        let mut without = RoomController::new(&SceneConfig::default()).unwrap();
        let baseline = run_headless(&mut without, &plan, Some(Box::new(UnavailableXr)));
        assert_eq!(baseline.xr, Some(XrOutcome::Unavailable));

        let mut with = RoomController::new(&SceneConfig::default()).unwrap();
        let report = run_headless(&mut with, &plan, Some(Box::new(SimulatedXr::default())));
        assert!(matches!(report.xr, Some(XrOutcome::Completed { .. })));
        assert_eq!(report.snapshot, baseline.snapshot);
    }
}
