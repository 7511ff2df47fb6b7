use anyhow::Context;
use clap::Parser;

use puzzle_room::cli::Cli;
use puzzle_room::host::{run_headless, run_windowed};
use puzzle_room::RoomController;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.scene_config()?;
    let mut controller = RoomController::new(&config).context("Failed to set up the room")?;

    if !cli.no_ui {
        return run_windowed(controller, cli.xr.runtime());
    }

    let report = run_headless(&mut controller, &cli.headless_plan(), cli.xr.runtime());
    if cli.dump_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print_summary();
    }

    Ok(())
}
