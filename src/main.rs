use clap::Parser;
use evo_racer::simulation::commands::{Command, CommandQueue};
use evo_racer::simulation::params::Params;
use evo_racer::simulation::race::Simulation;
use macroquad::prelude::*;
use std::path::PathBuf;
use tracing::{error, info, warn};

mod graphics;
mod ui;

/// Watch a population of neural-network cars learn to drive.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML file with parameter overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
}

fn load_params(args: &Args) -> Result<Params, Box<dyn std::error::Error>> {
    let mut params = match &args.config {
        Some(path) => Params::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => Params::default(),
    };
    if args.seed.is_some() {
        params.seed = args.seed;
    }
    params.validate()?;
    Ok(params)
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Evo Racer".to_owned(),
        window_width: 1500,
        window_height: 800,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    evo_racer::init_logging("info");
    let args = Args::parse();

    let started = load_params(&args).and_then(|p| Simulation::new(p).map_err(Into::into));
    let mut sim = match started {
        Ok(sim) => sim,
        Err(e) => {
            error!("failed to start simulation: {}", e);
            return;
        }
    };
    info!(seed = sim.seed(), "viewer started");

    let mut ui_state = ui::UIState::new(sim.params());
    let mut commands = CommandQueue::new();

    loop {
        if is_key_pressed(KeyCode::Space) {
            commands.push(if sim.is_running() {
                Command::Pause
            } else {
                Command::Start
            });
        }

        for command in commands.drain() {
            if let Err(e) = sim.apply(command) {
                warn!(?command, "command rejected: {}", e);
                ui_state.status_message = Some(format!("Rejected: {}", e));
                ui_state.sync(sim.params());
            }
        }

        if let Err(e) = sim.frame() {
            error!("simulation stopped: {}", e);
            ui_state.status_message = Some(format!("Stopped: {}", e));
            sim.pause();
        }

        clear_background(Color::from_rgba(235, 235, 230, 255));

        let view = graphics::TrackView::fit(sim.track(), ui_state.stats_panel_width);
        graphics::draw_track(sim.track(), &view);
        graphics::draw_vehicles(&sim, &view);
        if ui_state.show_rays {
            if let Some(best) = sim.best_vehicle() {
                graphics::draw_sensor_rays(best, &sim, &view);
            }
        }

        ui::draw_ui(&mut ui_state, &sim, &mut commands);
        ui::process_egui();

        next_frame().await
    }
}
