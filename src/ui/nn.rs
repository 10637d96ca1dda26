use egui_macroquad::egui;
use evo_racer::simulation::brain::{Activations, Brain};
use evo_racer::simulation::params::Params;

fn input_label(neuron_idx: usize, params: &Params) -> String {
    match neuron_idx.checked_sub(params.num_rays) {
        None => format!("ray {}", neuron_idx),
        Some(0) => "throttle".to_string(),
        Some(_) => "steer".to_string(),
    }
}

fn output_label(neuron_idx: usize) -> &'static str {
    if neuron_idx == 0 { "steer" } else { "throttle" }
}

pub(super) fn draw_neural_network(
    ui: &mut egui::Ui,
    brain: &Brain,
    trace: &Activations,
    params: &Params,
) {
    let layer_activations = [&trace.inputs, &trace.hidden, &trace.outputs];
    let layers = brain.layers();

    let width = 420.0;
    let height = 320.0;
    let (response, painter) = ui.allocate_painter(egui::vec2(width, height), egui::Sense::hover());

    let rect = response.rect;
    let layer_spacing = rect.width() / (layer_activations.len() as f32 + 1.0);
    let neuron_y = |idx: usize, count: usize| {
        rect.top() + rect.height() * (idx as f32 + 1.0) / (count as f32 + 1.0)
    };

    // connections first so neurons are drawn on top
    for (layer_idx, layer) in layers.iter().enumerate() {
        let input_activations = layer_activations[layer_idx];
        let input_count = input_activations.len();
        let output_count = layer_activations[layer_idx + 1].len();

        let x1 = rect.left() + layer_spacing * (layer_idx + 1) as f32;
        let x2 = rect.left() + layer_spacing * (layer_idx + 2) as f32;

        for out_idx in 0..output_count {
            let y2 = neuron_y(out_idx, output_count);
            for in_idx in 0..input_count {
                let y1 = neuron_y(in_idx, input_count);

                let weight = layer.weights[[out_idx, in_idx]];
                let signal = input_activations[in_idx] * weight;
                let signal_strength = signal.abs().min(1.0);

                let base_alpha = (weight.abs().min(1.0) * 100.0) as u8;
                let alpha = base_alpha.max((signal_strength * 200.0) as u8);
                let flow_intensity = (signal_strength * 255.0) as u8;
                let color = if signal > 0.0 {
                    egui::Color32::from_rgba_unmultiplied(0, flow_intensity, 50, alpha)
                } else if signal < 0.0 {
                    egui::Color32::from_rgba_unmultiplied(flow_intensity, 0, 50, alpha)
                } else {
                    egui::Color32::from_rgba_unmultiplied(150, 150, 150, base_alpha)
                };

                painter.line_segment(
                    [egui::pos2(x1, y1), egui::pos2(x2, y2)],
                    egui::Stroke::new(0.6 + signal_strength * 2.0, color),
                );
            }
        }
    }

    let last_layer = layer_activations.len() - 1;
    for (layer_idx, activations) in layer_activations.iter().enumerate() {
        let x = rect.left() + layer_spacing * (layer_idx + 1) as f32;
        let neuron_count = activations.len();

        for (neuron_idx, &activation) in activations.iter().enumerate() {
            let y = neuron_y(neuron_idx, neuron_count);

            // tanh range mapped to [0, 1]
            let normalized = f32::midpoint(activation, 1.0).clamp(0.0, 1.0);
            let color = if activation > 0.1 {
                egui::Color32::from_rgb(255, (normalized * 255.0) as u8, 0)
            } else if activation < -0.1 {
                egui::Color32::from_rgb(0, ((1.0 - normalized) * 255.0) as u8, 255)
            } else {
                egui::Color32::from_rgb(150, 150, 150)
            };

            painter.circle_filled(egui::pos2(x, y), 5.0, color);
            painter.circle_stroke(
                egui::pos2(x, y),
                5.0,
                egui::Stroke::new(1.5, egui::Color32::WHITE),
            );

            let label = if layer_idx == 0 {
                Some((
                    input_label(neuron_idx, params),
                    x - 10.0,
                    egui::Align2::RIGHT_CENTER,
                ))
            } else if layer_idx == last_layer {
                Some((
                    format!("{} {:+.2}", output_label(neuron_idx), activation),
                    x + 10.0,
                    egui::Align2::LEFT_CENTER,
                ))
            } else {
                None
            };
            if let Some((text, text_x, align)) = label {
                painter.text(
                    egui::pos2(text_x, y),
                    align,
                    text,
                    egui::FontId::proportional(9.0),
                    egui::Color32::WHITE,
                );
            }
        }

        let layer_name = match layer_idx {
            0 => "Input",
            i if i == last_layer => "Output",
            _ => "Hidden",
        };
        painter.text(
            egui::pos2(x, rect.bottom() + 5.0),
            egui::Align2::CENTER_TOP,
            layer_name,
            egui::FontId::proportional(11.0),
            egui::Color32::WHITE,
        );
    }
}
