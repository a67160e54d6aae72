use crate::core::effects::{get_body_point, Effects, CAR_LENGTH, CAR_WIDTH};
use crate::interfaces::racegame_interface::RacegameInterface;
use eframe::{egui, epi};
use flume::{Receiver, Sender};
use helpers::buffer::RingBuffer;
use helpers::geometry::{closed_edges, Point2d, Segment2d};
use racegame::core::race::RaceEvent;
use racegame::core::state_handler::State;
use racegame::core::track::Track;
use racegame::interfaces::gui_interface::RaceState;
use racegame::interfaces::input::{ControlSignal, GuiCommand};
use racegame::post::race_result::format_time;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

// the speed gauge shows the speed ratio scaled to this value
const HUD_SPEED_SCALE: f64 = 320.0;
const AXES_PADDING: f64 = 60.0;
const CURB_STRIPE_LENGTH: f64 = 15.0;
const CURB_WIDTH: f64 = 12.0;
const CENTERLINE_DASH_LENGTH: f64 = 20.0;
const LINE_WIDTH: f64 = 3.0;
const SKID_MARK_RADIUS: f64 = 3.0;
const NO_FINISH_SQUARES: usize = 12;
const FINISH_SQUARE_DEPTH: f64 = 10.0;

const COLOR_GRASS: egui::Color32 = egui::Color32::from_rgb(26, 77, 26);
const COLOR_ASPHALT: egui::Color32 = egui::Color32::from_rgb(48, 48, 48);
const COLOR_CURB_RED: egui::Color32 = egui::Color32::from_rgb(255, 0, 0);
const COLOR_TIRE: egui::Color32 = egui::Color32::from_rgb(26, 26, 26);
const COLOR_COCKPIT: egui::Color32 = egui::Color32::from_rgb(30, 40, 70);

#[derive(Debug)]
pub struct RacePlot {
    pub racegame_interface: RacegameInterface,
    pub track: Arc<Track>,
    pub effects: Effects,
    pub axes_expansion: [f64; 4],
    pub last_control: ControlSignal,
    pub start_requested: bool,
    pub reset_requested: bool,
    pub prev_reset_count: u32,
    pub prev_update: Instant,
    pub prev_update_durations: RingBuffer<u32>,
}

impl RacePlot {
    pub fn new(rx: Receiver<RaceState>, tx: Sender<GuiCommand>, track: Arc<Track>) -> RacePlot {
        // determine plot area once such that the whole track including its boundaries is visible
        let mut boundary_points = track.outer_boundary.to_owned();
        boundary_points.extend_from_slice(&track.inner_boundary);
        let axes_expansion = get_axes_expansion(&boundary_points, AXES_PADDING);

        RacePlot {
            racegame_interface: RacegameInterface::new(rx, tx),
            track,
            effects: Effects::default(),
            axes_expansion,
            last_control: ControlSignal::default(),
            start_requested: false,
            reset_requested: false,
            prev_reset_count: 0,
            prev_update: Instant::now(),
            prev_update_durations: RingBuffer::new(10),
        }
    }

    fn send(&self, command: GuiCommand) {
        if let Err(e) = self.racegame_interface.send(command) {
            warn!("{:#}", e);
        }
    }

    fn request_reset(&mut self) {
        if !self.reset_requested {
            self.send(GuiCommand::Reset);
            self.reset_requested = true;
        }
    }

    /// The method samples keyboard and pointer, sends changed control signals to the simulation,
    /// and requests the race start (first steering input) or the reset (after the race ended).
    fn handle_input(&mut self, ui: &egui::Ui, canvas: &egui::Rect) {
        let input = ui.input();

        let left = input.key_down(egui::Key::ArrowLeft) || input.key_down(egui::Key::A);
        let right = input.key_down(egui::Key::ArrowRight) || input.key_down(egui::Key::D);
        let throttle = input.key_down(egui::Key::ArrowUp) || input.key_down(egui::Key::W);
        let reset_pressed = input.key_pressed(egui::Key::Enter)
            || input.key_pressed(egui::Key::Space)
            || input.key_pressed(egui::Key::R);

        let pointer_pos = if input.pointer.primary_down() {
            input.pointer.interact_pos()
        } else {
            None
        };
        let analog_steer = match pointer_pos {
            Some(pos) if canvas.contains(pos) => ControlSignal::pointer_offset_to_steer(
                (pos.x - canvas.min.x) as f64,
                canvas.width() as f64,
            ),
            _ => 0.0,
        };

        let control = ControlSignal::new(left, right, analog_steer, throttle);
        let any_input = left || right || throttle || pointer_pos.is_some();

        if control != self.last_control {
            self.send(GuiCommand::Control(control));
            self.last_control = control;
        }

        match self.racegame_interface.race_state.state {
            State::Inert => {
                if any_input && !self.start_requested {
                    self.send(GuiCommand::Start);
                    self.start_requested = true;
                }
            }
            State::Crashed | State::Finished => {
                if reset_pressed {
                    self.request_reset();
                }
            }
            State::Active => {}
        }
    }

    pub fn set_ui_content(&mut self, ui: &mut egui::Ui) -> egui::Response {
        // PREPARATIONS ----------------------------------------------------------------------------
        // get UI handles
        let (response, painter) =
            ui.allocate_painter(ui.available_size_before_wrap_finite(), egui::Sense::drag());

        // use a square canvas such that the track is not distorted
        let side = response.rect.width().min(response.rect.height());
        let canvas = egui::Rect::from_center_size(response.rect.center(), egui::Vec2::splat(side));

        self.handle_input(ui, &canvas);

        // get transformation from x/y to pixels in the window (screen and track coordinates both
        // point downwards in y direction)
        let [x_min, x_max, y_min, y_max] = self.axes_expansion;

        let to_screen = egui::emath::RectTransform::from_to(
            egui::emath::Rect::from_min_max(
                egui::Pos2 {
                    x: x_min as f32,
                    y: y_min as f32,
                },
                egui::Pos2 {
                    x: x_max as f32,
                    y: y_max as f32,
                },
            ),
            canvas,
        );
        let scale = side as f64 / (x_max - x_min);
        let to_pos = |p: &Point2d| {
            to_screen
                * egui::Pos2 {
                    x: p.x as f32,
                    y: p.y as f32,
                }
        };
        let to_width = |width: f64| (width * scale) as f32;

        let race_state = &self.racegame_interface.race_state;

        // create vector for drawn shapes
        let mut shapes = vec![egui::Shape::rect_filled(canvas, 0.0, COLOR_GRASS)];

        // TRACK DRAWING ---------------------------------------------------------------------------
        // add track surface (a thick centerline, the joints are filled with circles)
        let centerline: Vec<egui::Pos2> = self.track.waypoints.iter().map(to_pos).collect();

        for p in centerline.iter() {
            shapes.push(egui::Shape::circle_filled(
                *p,
                to_width(self.track.track_width),
                COLOR_ASPHALT,
            ));
        }
        shapes.push(egui::Shape::closed_line(
            centerline,
            egui::Stroke::new(to_width(2.0 * self.track.track_width), COLOR_ASPHALT),
        ));

        // add skid marks (below everything else on the track)
        for skid_mark in self.effects.skid_marks.iter() {
            shapes.push(egui::Shape::circle_filled(
                to_pos(&skid_mark.pos),
                to_width(SKID_MARK_RADIUS),
                get_color_with_alpha([34, 34, 34], skid_mark.alpha),
            ));
        }

        // add curbs
        for curbs in [&self.track.outer_curbs, &self.track.inner_curbs] {
            for (i, stripe) in get_stripes(curbs, CURB_STRIPE_LENGTH).iter().enumerate() {
                shapes.push(egui::Shape::line_segment(
                    [to_pos(&stripe.p1), to_pos(&stripe.p2)],
                    egui::Stroke::new(
                        to_width(CURB_WIDTH),
                        if i % 2 == 0 {
                            COLOR_CURB_RED
                        } else {
                            egui::Color32::WHITE
                        },
                    ),
                ));
            }
        }

        // add dashed centerline and boundary lines
        for (i, dash) in get_stripes(&self.track.waypoints, CENTERLINE_DASH_LENGTH)
            .iter()
            .enumerate()
        {
            if i % 2 == 0 {
                shapes.push(egui::Shape::line_segment(
                    [to_pos(&dash.p1), to_pos(&dash.p2)],
                    egui::Stroke::new(to_width(LINE_WIDTH), egui::Color32::WHITE),
                ));
            }
        }

        for boundary in [&self.track.outer_boundary, &self.track.inner_boundary] {
            shapes.push(egui::Shape::closed_line(
                boundary.iter().map(to_pos).collect(),
                egui::Stroke::new(to_width(LINE_WIDTH), egui::Color32::WHITE),
            ));
        }

        // add speed lines
        for speed_line in self.effects.speed_lines.iter() {
            let tail = get_body_point(&speed_line.pos, speed_line.angle, -speed_line.length, 0.0);
            shapes.push(egui::Shape::line_segment(
                [to_pos(&speed_line.pos), to_pos(&tail)],
                egui::Stroke::new(
                    to_width(2.0),
                    get_color_with_alpha([255, 255, 255], speed_line.alpha),
                ),
            ));
        }

        // add checkered finish line (two rows of squares)
        let finish_line = &self.track.finish_line;
        let finish_dir = finish_line.direction();
        let finish_angle = finish_dir.angle();

        for i in 0..NO_FINISH_SQUARES {
            let p1 = finish_line.point_at(i as f64 / NO_FINISH_SQUARES as f64);
            let p2 = finish_line.point_at((i + 1) as f64 / NO_FINISH_SQUARES as f64);

            for (row, side) in [-FINISH_SQUARE_DEPTH, FINISH_SQUARE_DEPTH].iter().enumerate() {
                let color = if (i + row) % 2 == 0 {
                    egui::Color32::WHITE
                } else {
                    egui::Color32::BLACK
                };
                shapes.push(egui::Shape::convex_polygon(
                    vec![
                        to_pos(&p1),
                        to_pos(&p2),
                        to_pos(&get_body_point(&p2, finish_angle, 0.0, *side)),
                        to_pos(&get_body_point(&p1, finish_angle, 0.0, *side)),
                    ],
                    color,
                    egui::Stroke::none(),
                ));
            }
        }

        // CAR DRAWING -----------------------------------------------------------------------------
        // add smoke and crash particles
        for particle in self.effects.particles.iter() {
            shapes.push(egui::Shape::circle_filled(
                to_pos(&particle.pos),
                to_width(particle.size),
                get_color_with_alpha(particle.color, particle.alpha),
            ));
        }

        let car_state = &race_state.car_state;
        let car_rect = |center: &Point2d, angle: f64, length: f64, width: f64| {
            [(1.0, 1.0), (1.0, -1.0), (-1.0, -1.0), (-1.0, 1.0)]
                .iter()
                .map(|(f, s)| {
                    to_pos(&get_body_point(
                        center,
                        angle,
                        f * length / 2.0,
                        s * width / 2.0,
                    ))
                })
                .collect::<Vec<egui::Pos2>>()
        };

        // wheels (front wheels are turned by the wheel angle)
        for (forward, side) in [(1.0, -1.0), (1.0, 1.0), (-1.0, -1.0), (-1.0, 1.0)] {
            let wheel_center = get_body_point(
                &car_state.pos,
                car_state.angle,
                forward * CAR_LENGTH / 3.0,
                side * (CAR_WIDTH / 2.0 + 1.0),
            );
            let wheel_angle = if forward > 0.0 {
                car_state.angle + car_state.wheel_angle
            } else {
                car_state.angle
            };
            shapes.push(egui::Shape::convex_polygon(
                car_rect(&wheel_center, wheel_angle, 8.0, 6.0),
                COLOR_TIRE,
                egui::Stroke::none(),
            ));
        }

        // body and cockpit
        shapes.push(egui::Shape::convex_polygon(
            car_rect(&car_state.pos, car_state.angle, CAR_LENGTH, CAR_WIDTH),
            egui::Color32::from_rgb(
                car_state.color.r,
                car_state.color.g,
                car_state.color.b,
            ),
            egui::Stroke::new(1.0, egui::Color32::BLACK),
        ));
        shapes.push(egui::Shape::convex_polygon(
            car_rect(
                &get_body_point(&car_state.pos, car_state.angle, 2.0, 0.0),
                car_state.angle,
                10.0,
                CAR_WIDTH - 6.0,
            ),
            COLOR_COCKPIT,
            egui::Stroke::none(),
        ));

        // UPDATE HUD TEXT IN GUI ------------------------------------------------------------------
        let mut hud_text = format!("Time: {:.2}s\n", race_state.elapsed);

        // writing into a String cannot fail
        let _ = writeln!(&mut hud_text, "Lap: {}", race_state.lap_count);
        let _ = writeln!(&mut hud_text, "Best: {}", format_time(race_state.best_time));
        let _ = writeln!(
            &mut hud_text,
            "Speed: {} km/h",
            get_hud_speed(car_state.speed, race_state.max_speed)
        );

        // calculate current UI update duration, append it to the buffer, and set update time
        self.prev_update_durations
            .push(self.prev_update.elapsed().as_millis() as u32);
        self.prev_update = Instant::now();

        if let Some(avg_duration) = self.prev_update_durations.get_avg() {
            if avg_duration > 0.0 {
                let _ = write!(
                    &mut hud_text,
                    "GUI update frequency: {:.0} Hz",
                    1000.0 / avg_duration
                );
            }
        }

        shapes.push(egui::Shape::text(
            ui.fonts(),
            canvas.left_top() + egui::Vec2::splat(10.0),
            egui::Align2::LEFT_TOP,
            &hud_text,
            egui::TextStyle::Body,
            egui::Color32::WHITE,
        ));

        // show start prompt while the race waits for the first input
        if race_state.state == State::Inert {
            shapes.push(egui::Shape::text(
                ui.fonts(),
                canvas.center(),
                egui::Align2::CENTER_CENTER,
                "Steer with arrow keys, A/D or touch to start",
                egui::TextStyle::Heading,
                egui::Color32::WHITE,
            ));
        }

        // DRAWING ---------------------------------------------------------------------------------
        // update shapes in UI painter and return response
        painter.extend(shapes);
        response
    }

    /// The method shows the modal with the result of the race attempt. Acknowledging it resets
    /// the race.
    fn show_outcome_window(&mut self, ctx: &egui::CtxRef, outcome: RaceEvent) {
        let best_time = self.racegame_interface.race_state.best_time;
        let mut reset_clicked = false;

        egui::Window::new("Race over")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                match outcome {
                    RaceEvent::Finished {
                        lap_time,
                        is_new_best,
                    } => {
                        ui.heading(if is_new_best {
                            "New best time!"
                        } else {
                            "Race complete!"
                        });
                        ui.label(format!("Lap time: {:.2}s", lap_time));
                        ui.label(format!("Best time: {}", format_time(best_time)));
                    }
                    RaceEvent::Crashed { elapsed } => {
                        ui.heading("Crashed!");
                        ui.label(format!("You left the track after {:.2}s", elapsed));
                    }
                }
                reset_clicked = ui.button("Play again").clicked();
            });

        if reset_clicked {
            self.request_reset();
        }
    }
}

impl epi::App for RacePlot {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::CtxRef, _frame: &mut epi::Frame) {
        // update race interface and visual effects (a reset discards all effects)
        let new_effects = self.racegame_interface.update();
        let reset_count = self.racegame_interface.race_state.reset_count;

        if reset_count != self.prev_reset_count {
            self.effects.clear();
            self.start_requested = false;
            self.reset_requested = false;
            self.prev_reset_count = reset_count;
        }

        self.effects.add_events(&new_effects);
        self.effects.update();

        // update UI content
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                self.set_ui_content(ui);
            });
        });

        if let Some(outcome) = self.racegame_interface.race_state.outcome {
            self.show_outcome_window(ctx, outcome);
        }

        // request repaint of the UI
        ctx.request_repaint();
    }

    fn name(&self) -> &str {
        "Racegame"
    }
}

/// get_axes_expansion returns [x_min, x_max, y_min, y_max] of a square plot area that contains
/// all inserted points plus padding.
pub fn get_axes_expansion(points: &[Point2d], padding_size: f64) -> [f64; 4] {
    if points.is_empty() {
        return [-padding_size, padding_size, -padding_size, padding_size];
    }

    // determine min and max x and y values
    let (mut x_min, mut x_max, mut y_min, mut y_max) = points.iter().fold(
        (points[0].x, points[0].x, points[0].y, points[0].y),
        |(x_min, x_max, y_min, y_max), p| {
            (x_min.min(p.x), x_max.max(p.x), y_min.min(p.y), y_max.max(p.y))
        },
    );

    // apply padding
    x_min -= padding_size;
    x_max += padding_size;
    y_min -= padding_size;
    y_max += padding_size;

    // update min and max values such that its a square shape
    let width = x_max - x_min;
    let height = y_max - y_min;

    if width > height {
        let diff = width - height;
        y_min -= diff / 2.0;
        y_max += diff / 2.0;
    } else {
        let diff = height - width;
        x_min -= diff / 2.0;
        x_max += diff / 2.0;
    }

    [x_min, x_max, y_min, y_max]
}

/// get_stripes divides every edge of the closed polyline into stripes of approximately the
/// inserted length (at least one stripe per edge, zero-length edges are skipped).
pub fn get_stripes(points: &[Point2d], stripe_length: f64) -> Vec<Segment2d> {
    let mut stripes = vec![];

    for edge in closed_edges(points).filter(|edge| !edge.is_degenerate()) {
        let no_stripes = ((edge.length() / stripe_length).floor() as usize).max(1);

        for j in 0..no_stripes {
            stripes.push(Segment2d::new(
                edge.point_at(j as f64 / no_stripes as f64),
                edge.point_at((j + 1) as f64 / no_stripes as f64),
            ));
        }
    }

    stripes
}

/// get_hud_speed converts the car speed into the value shown by the speed gauge.
pub fn get_hud_speed(speed: f64, max_speed: f64) -> u32 {
    if max_speed > 0.0 {
        (speed / max_speed * HUD_SPEED_SCALE).round().max(0.0) as u32
    } else {
        0
    }
}

fn get_color_with_alpha(rgb: [u8; 3], alpha: f64) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        rgb[0],
        rgb[1],
        rgb[2],
        (alpha.max(0.0).min(1.0) * 255.0) as u8,
    )
}
