use egui_macroquad::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};
use evo_racer::simulation::commands::{Command, CommandQueue};
use evo_racer::simulation::history::History;
use evo_racer::simulation::race::Simulation;

use super::ui::UIState;

pub(super) fn draw_stats_panel(
    egui_ctx: &egui::Context,
    state: &mut UIState,
    sim: &Simulation,
    commands: &mut CommandQueue,
) {
    egui::SidePanel::right("stats_panel")
        .default_width(state.stats_panel_width)
        .resizable(true)
        .show(egui_ctx, |ui| {
            ui.heading("Evo Racer");
            ui.separator();

            ui.horizontal(|ui| {
                if sim.is_running() {
                    if ui.button("⏸ Pause").clicked() {
                        commands.push(Command::Pause);
                    }
                } else if ui.button("▶ Start").clicked() {
                    commands.push(Command::Start);
                }
                if ui.button("🔄 Reset").clicked() {
                    commands.push(Command::Reset);
                }
            });

            if let Some(ref msg) = state.status_message {
                ui.label(msg);
            }

            ui.separator();

            ui.label("Simulation Speed");
            if ui
                .add(egui::Slider::new(&mut state.ticks_per_frame, 1..=50).text("ticks/frame"))
                .changed()
            {
                commands.push(Command::SetTicksPerFrame(state.ticks_per_frame));
            }

            ui.horizontal(|ui| {
                ui.add(egui::Slider::new(&mut state.population_size, 2..=300).text("cars"));
                if ui.button("Apply").clicked() {
                    commands.push(Command::SetPopulationSize(state.population_size));
                }
            });

            if ui
                .add(egui::Slider::new(&mut state.mutation_rate, 0.0..=1.0).text("mutation"))
                .changed()
            {
                commands.push(Command::SetMutationRate(state.mutation_rate));
            }
            if ui
                .add(egui::Slider::new(&mut state.crossover_rate, 0.0..=1.0).text("crossover"))
                .changed()
            {
                commands.push(Command::SetCrossoverRate(state.crossover_rate));
            }

            ui.checkbox(&mut state.show_rays, "Show sensor rays");
            ui.checkbox(&mut state.show_detail, "Show best car");

            ui.separator();

            ui.label(format!("Generation: {}", sim.generation()));
            ui.label(format!("Tick: {}", sim.tick()));
            ui.label(format!(
                "Alive: {}/{}",
                sim.alive_count(),
                sim.population().len()
            ));
            if let Some(best) = sim.best_vehicle() {
                ui.label(format!(
                    "Best now: {:.2} (car #{}, {} checkpoints)",
                    best.fitness(),
                    best.id,
                    best.checkpoint_index()
                ));
            }
            if let Some(last) = sim.best_of_last_generation() {
                ui.label(format!("Best of last generation: {:.2}", last));
            }
            if let Some(record) = sim.history().best_fitness() {
                ui.label(format!("Record: {:.2}", record));
            }
            ui.label(format!("Seed: {}", sim.seed()));

            if let Some(latest) = sim.history().latest() {
                ui.collapsing("Last Generation", |ui| {
                    ui.label(format!("Mean fitness: {:.2}", latest.mean_fitness));
                    ui.label(format!("Ticks: {}", latest.ticks));
                    ui.label(format!("Collisions: {}", latest.collisions));
                    ui.label(format!("Stagnations: {}", latest.stagnations));
                    ui.label(format!("Timeouts: {}", latest.timeouts));
                    ui.label(format!("Tick limit: {}", latest.limits));
                });
            }

            ui.separator();
            ui.heading("Fitness per Generation");
            draw_fitness_plot(ui, sim.history());
        });
}

fn draw_fitness_plot(ui: &mut egui::Ui, history: &History) {
    if history.is_empty() {
        ui.label("Collecting data...");
        return;
    }

    let best: PlotPoints = history.best_fitness_series().into_iter().collect();
    let mean: PlotPoints = history.mean_fitness_series().into_iter().collect();

    Plot::new("fitness_plot")
        .height(200.0)
        .show_axes([true, true])
        .legend(Legend::default())
        .label_formatter(|name, value| {
            format!("{}\nGeneration: {:.0}\nFitness: {:.2}", name, value.x, value.y)
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(best)
                    .color(egui::Color32::from_rgb(255, 200, 0))
                    .name("Best"),
            );
            plot_ui.line(
                Line::new(mean)
                    .color(egui::Color32::from_rgb(100, 150, 255))
                    .name("Mean"),
            );
        });
}
