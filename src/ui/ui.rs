use egui_macroquad::egui;
use evo_racer::simulation::commands::CommandQueue;
use evo_racer::simulation::params::Params;
use evo_racer::simulation::race::Simulation;

pub struct UIState {
    pub stats_panel_width: f32,
    pub population_size: usize,
    pub mutation_rate: f32,
    pub crossover_rate: f32,
    pub ticks_per_frame: usize,
    pub show_rays: bool,
    pub show_detail: bool,
    pub status_message: Option<String>,
}

impl UIState {
    pub fn new(params: &Params) -> Self {
        let mut state = Self {
            stats_panel_width: 320.0,
            population_size: 0,
            mutation_rate: 0.0,
            crossover_rate: 0.0,
            ticks_per_frame: 1,
            show_rays: true,
            show_detail: true,
            status_message: None,
        };
        state.sync(params);
        state
    }

    /// Pulls the editable values back from the simulation, e.g. after a
    /// rejected command.
    pub fn sync(&mut self, params: &Params) {
        self.population_size = params.population_size;
        self.mutation_rate = params.mutation_rate;
        self.crossover_rate = params.crossover_rate;
        self.ticks_per_frame = params.ticks_per_frame;
    }
}

pub fn draw_ui(state: &mut UIState, sim: &Simulation, commands: &mut CommandQueue) {
    egui_macroquad::ui(|egui_ctx| {
        let mut visuals = egui::Visuals::dark();
        visuals.override_text_color = Some(egui::Color32::from_rgb(240, 240, 240));
        visuals.widgets.noninteractive.fg_stroke.color = egui::Color32::from_rgb(220, 220, 220);
        egui_ctx.set_visuals(visuals);

        super::stats::draw_stats_panel(egui_ctx, state, sim, commands);

        if state.show_detail {
            if let Some(best) = sim.best_vehicle() {
                super::vehicles::draw_vehicle_detail_panel(egui_ctx, best, sim.params());
            }
        }
    });
}

pub fn process_egui() {
    egui_macroquad::draw();
}
