use evo_racer::simulation;
use geo::Coord;
use macroquad::prelude::*;

/// Fits track coordinates into the part of the window left of the side panel.
pub struct TrackView {
    scale: f32,
    offset: Vec2,
    min: Coord<f32>,
}

impl TrackView {
    /// Computes a viewport that shows the whole track with a small margin.
    pub fn fit(track: &simulation::track::Track, panel_width: f32) -> Self {
        let mut min = Coord {
            x: f32::INFINITY,
            y: f32::INFINITY,
        };
        let mut max = Coord {
            x: f32::NEG_INFINITY,
            y: f32::NEG_INFINITY,
        };
        for p in track.inner_wall().iter().chain(track.outer_wall()) {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        let margin = 20.0;
        let avail_w = (screen_width() - panel_width - 2.0 * margin).max(1.0);
        let avail_h = (screen_height() - 2.0 * margin).max(1.0);
        let span_x = (max.x - min.x).max(1.0);
        let span_y = (max.y - min.y).max(1.0);
        let scale = (avail_w / span_x).min(avail_h / span_y);

        Self {
            scale,
            offset: vec2(margin, margin),
            min,
        }
    }
}

trait ToScreen {
    type Output;
    fn to_screen(&self, view: &TrackView) -> Self::Output;
}

impl ToScreen for Coord<f32> {
    type Output = Vec2;
    fn to_screen(&self, view: &TrackView) -> Vec2 {
        view.offset + vec2(self.x - view.min.x, self.y - view.min.y) * view.scale
    }
}

impl ToScreen for f32 {
    type Output = f32;
    fn to_screen(&self, view: &TrackView) -> f32 {
        self * view.scale
    }
}

/// Colour tier of a vehicle by the generation it was born into.
pub fn tier_color(generation: u32) -> Color {
    match generation {
        g if g > 30 => Color::from_rgba(60, 200, 90, 255),
        g if g > 15 => Color::from_rgba(255, 150, 40, 255),
        g if g > 5 => Color::from_rgba(240, 220, 40, 255),
        _ => Color::from_rgba(220, 60, 60, 255),
    }
}

fn draw_polyline(points: &[Coord<f32>], view: &TrackView, thickness: f32, color: Color) {
    let n = points.len();
    for i in 0..n {
        let a = points[i].to_screen(view);
        let b = points[(i + 1) % n].to_screen(view);
        draw_line(a.x, a.y, b.x, b.y, thickness, color);
    }
}

pub fn draw_track(track: &simulation::track::Track, view: &TrackView) {
    draw_polyline(track.inner_wall(), view, 2.0, Color::from_rgba(40, 40, 40, 255));
    draw_polyline(track.outer_wall(), view, 2.0, Color::from_rgba(40, 40, 40, 255));

    for (i, checkpoint) in track.checkpoints().iter().enumerate() {
        let p = checkpoint.to_screen(view);
        let color = if i == 0 {
            Color::from_rgba(0, 160, 0, 200)
        } else {
            Color::from_rgba(0, 100, 255, 120)
        };
        draw_circle_lines(p.x, p.y, 4.0_f32.max(6.0_f32.to_screen(view)), 1.0, color);
    }
}

pub fn draw_vehicles(sim: &simulation::race::Simulation, view: &TrackView) {
    let params = sim.params();
    let length = params.vehicle_length.to_screen(view);
    let width = params.vehicle_width.to_screen(view);

    // dead cars first so the living stay on top
    let (alive, dead): (Vec<_>, Vec<_>) =
        sim.population().iter().partition(|v| v.is_alive());

    for vehicle in dead.iter().chain(alive.iter()) {
        let p = vehicle.body.pos.to_screen(view);
        let mut color = tier_color(vehicle.generation);
        if !vehicle.is_alive() {
            color.a = 0.25;
        }
        draw_rectangle_ex(
            p.x,
            p.y,
            length,
            width,
            DrawRectangleParams {
                offset: vec2(0.5, 0.5),
                rotation: vehicle.body.heading,
                color,
            },
        );
    }
}

/// Draws the sensor fan of `vehicle`, each ray cut at its reading, and marks
/// the checkpoint it is heading for.
pub fn draw_sensor_rays(
    vehicle: &simulation::vehicle::Vehicle,
    sim: &simulation::race::Simulation,
    view: &TrackView,
) {
    let origin = vehicle.body.pos;
    let rays = sim.caster().rays(origin, vehicle.body.heading);
    for (i, ray) in rays.iter().enumerate() {
        let reading = vehicle.sensors.get(i).copied().unwrap_or(1.0);
        let end = origin + (ray.end - origin) * reading;

        let a = origin.to_screen(view);
        let b = end.to_screen(view);
        let color = if reading < 1.0 {
            Color::from_rgba(255, 80, 80, 220)
        } else {
            Color::from_rgba(120, 120, 120, 160)
        };
        draw_line(a.x, a.y, b.x, b.y, 1.0, color);
        if reading < 1.0 {
            draw_circle(b.x, b.y, 2.5, color);
        }
    }

    let next = sim
        .track()
        .next_checkpoint(vehicle.checkpoint_index())
        .to_screen(view);
    draw_circle_lines(next.x, next.y, 8.0, 2.0, Color::from_rgba(255, 200, 0, 255));
}
