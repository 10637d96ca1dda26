// UI module - egui panels drawn over the track view

mod nn;
mod stats;
mod ui;
mod vehicles;

pub use ui::{UIState, draw_ui, process_egui};
