use egui_macroquad::egui;
use evo_racer::simulation::fitness::DeathCause;
use evo_racer::simulation::params::Params;
use evo_racer::simulation::vehicle::Vehicle;

pub(super) fn draw_vehicle_detail_panel(
    egui_ctx: &egui::Context,
    vehicle: &Vehicle,
    params: &Params,
) {
    egui::Window::new(format!("Best Car #{}", vehicle.id))
        .default_pos([20.0, 20.0])
        .resizable(true)
        .show(egui_ctx, |ui| {
            ui.label(format!("Generation: {}", vehicle.generation));
            ui.label(format!("Fitness: {:.3}", vehicle.fitness()));
            ui.label(format!(
                "  checkpoints: {}  +  distance score: {:.3}",
                vehicle.checkpoint_index(),
                vehicle.progress.distance_score()
            ));
            ui.label(format!(
                "Distance to next checkpoint: {:.1}",
                vehicle.progress.distance_to_next
            ));
            ui.label(format!("Age: {:.1}", vehicle.progress.age));
            ui.label(format!("Speed: {:.2}", vehicle.body.speed()));
            ui.label(format!(
                "Steer: {:+.2}  Throttle: {:.2}",
                vehicle.controls.steer, vehicle.controls.throttle
            ));
            let status = match vehicle.death {
                None => "racing",
                Some(DeathCause::Collision) => "crashed",
                Some(DeathCause::Stagnation) => "stalled",
                Some(DeathCause::Timeout) => "timed out",
                Some(DeathCause::GenerationLimit) => "stopped at tick limit",
            };
            ui.label(format!("Status: {}", status));

            ui.separator();

            ui.heading("Sensors");
            ui.add_space(8.0);
            draw_sensor_bars(ui, &vehicle.sensors);
            ui.add_space(8.0);

            ui.separator();

            ui.heading("Brain Structure");
            let layout = vehicle.brain.layout();
            ui.label(format!(
                "{} → {} → {} ({} genes)",
                layout.inputs,
                layout.hidden,
                layout.outputs,
                layout.genome_len()
            ));
            let first: Vec<String> = vehicle
                .brain
                .genome()
                .iter()
                .take(6)
                .map(|w| format!("{:+.2}", w))
                .collect();
            ui.label(format!("First weights: {}", first.join(" ")));

            ui.separator();

            ui.heading("Neural Network");
            match &vehicle.last_activations {
                Some(trace) => super::nn::draw_neural_network(ui, &vehicle.brain, trace, params),
                None => {
                    ui.label("Waiting for the first tick...");
                }
            }
        });
}

/// Maps a reading in `[0, 1]` from red (wall close) to green (clear).
fn proximity_color(t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    egui::Color32::from_rgb(((1.0 - t) * 255.0) as u8, (t * 200.0) as u8, 60)
}

fn draw_sensor_bars(ui: &mut egui::Ui, sensors: &[f32]) {
    const BAR_WIDTH: f32 = 18.0;
    const BAR_HEIGHT: f32 = 40.0;
    const BAR_SPACING: f32 = 6.0;

    ui.horizontal(|ui| {
        for &value in sensors {
            let origin = ui.cursor().min;
            ui.painter().rect_filled(
                egui::Rect::from_min_size(origin, egui::vec2(BAR_WIDTH, BAR_HEIGHT)),
                2.0,
                egui::Color32::from_gray(40),
            );
            let filled = BAR_HEIGHT * value.clamp(0.0, 1.0);
            ui.painter().rect_filled(
                egui::Rect::from_min_size(
                    origin + egui::vec2(0.0, BAR_HEIGHT - filled),
                    egui::vec2(BAR_WIDTH, filled),
                ),
                2.0,
                proximity_color(value),
            );
            ui.add_space(BAR_WIDTH + BAR_SPACING);
        }
    });
    ui.add_space(BAR_HEIGHT);
}
