//! Interactive snow pile viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (height-field simulator, drift field, configuration, tick schedule)
//! and implements [`eframe::App`] to render and control it.

use eframe::App;
use glam::Vec2;
use rand::rngs::StdRng;
use snow_core::{
    config::{Config, DriftConfig, PileConfig},
    drift::DriftField,
    simulator::{Simulator, TickReport},
    types::Pointer,
};

use crate::ticker::Ticker;

/// Canvas size used until the first frame reports the real one.
const INITIAL_CANVAS: egui::Vec2 = egui::vec2(960.0, 540.0);

/// Which simulation the canvas shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Height-field pile that grows, melts under the pointer and smooths.
    Pile,
    /// Individual flakes falling onto a grainy pile.
    Drift,
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`Simulator`] and [`DriftField`], plus the [`Config`]
///   that the side panel edits live.
/// - Tick scheduling through [`Ticker`].
/// - eframe/egui callbacks for drawing and pointer input.
///
/// The typical per-frame update is:
/// 1. Resize the simulation to the canvas (a no-op unless the column count changed).
/// 2. Hand the latest pointer sample to the simulator while running.
/// 3. If the ticker reports a due tick, call [`Viewer::step_once`].
/// 4. Render the pile silhouette, outline and any falling flakes.
///
/// ### Fields
/// - `sim` - Height-field pile simulation.
/// - `drift` - Falling-flake simulation.
/// - `cfg` - Configuration edited by the side panel and pushed into `sim` each frame.
/// - `mode` - Which simulation is advanced and drawn.
///
/// - `rng` - Random source shared by both simulations.
/// - `ticker` - Decides on which frames a tick runs; stopped means paused.
///
/// - `canvas` - Last known canvas size in pixels.
/// - `ticks` - Ticks since the last reset or column-count change.
/// - `last_report` - Outcome of the last pile tick (for the status bar).
/// - `last_landed` - Flakes that landed in the last drift tick.
pub struct Viewer {
    sim: Simulator,
    drift: DriftField,
    cfg: Config,
    mode: Mode,

    rng: StdRng,
    ticker: Ticker,

    canvas: egui::Vec2,
    ticks: u64,
    last_report: TickReport,
    last_landed: usize,
}

impl Viewer {
    /// Creates a running viewer.
    ///
    /// ### Parameters
    /// - `cfg` - Validated configuration for both modes.
    /// - `mode` - Simulation shown first.
    /// - `rng` - Random source for growth jitter and flake spawning.
    /// - `tick_interval` - Seconds between simulation ticks.
    pub fn new(cfg: Config, mode: Mode, rng: StdRng, tick_interval: f64) -> Self {
        let mut ticker = Ticker::new(tick_interval);
        ticker.start();

        Self {
            sim: Simulator::new(cfg.pile, INITIAL_CANVAS.x, INITIAL_CANVAS.y),
            drift: DriftField::new(INITIAL_CANVAS.x, INITIAL_CANVAS.y),
            cfg,
            mode,
            rng,
            ticker,
            canvas: INITIAL_CANVAS,
            ticks: 0,
            last_report: TickReport::default(),
            last_landed: 0,
        }
    }

    /// Resumes ticking and input handling.
    fn start(&mut self) {
        if self.ticker.start() {
            log::info!("simulation started");
        }
    }

    /// Pauses ticking and drops the pointer sample. Safe to call repeatedly.
    fn stop(&mut self) {
        if self.ticker.stop() {
            log::info!("simulation stopped");
        }
        self.sim.clear_pointer();
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::info!("switching mode to {mode:?}");
            self.mode = mode;
        }
    }

    /// Clears both simulations without touching configuration or canvas size.
    fn reset(&mut self) {
        self.sim.reset();
        self.sim.clear_pointer();
        self.drift.clear();
        self.ticks = 0;
        self.last_report = TickReport::default();
        self.last_landed = 0;
    }

    /// Adapts both simulations to the canvas size in pixels.
    fn resize(&mut self, size: egui::Vec2) {
        if size.x < 1.0 || size.y < 1.0 {
            log::warn!("degenerate canvas size {}x{}", size.x, size.y);
        }
        self.canvas = size;
        let reset = self.sim.resize(size.x, size.y);
        self.drift.resize(size.x, size.y);
        if reset {
            self.ticks = 0;
        }
    }

    /// Advances the active simulation by a single tick.
    fn step_once(&mut self) {
        match self.mode {
            Mode::Pile => {
                self.last_report = self.sim.advance(&mut self.rng);
            }
            Mode::Drift => {
                self.last_landed = self.drift.advance(&self.cfg.drift, &mut self.rng);
            }
        }
        self.ticks += 1;
    }

    /// Converts a screen position to canvas-local pixels (origin top-left).
    fn screen_to_local(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        Vec2::new(p.x - rect.min.x, p.y - rect.min.y)
    }

    /// Converts a canvas-local position to a screen position.
    fn local_to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        egui::pos2(rect.min.x + p.x, rect.min.y + p.y)
    }

    /// Maps the current hover position into a pointer sample.
    fn pointer_from_hover(&self, hover: Option<egui::Pos2>, rect: egui::Rect) -> Pointer {
        match hover {
            Some(p) => {
                let local = Self::screen_to_local(p, rect);
                Pointer::from_local(local.x, local.y, self.canvas.x, self.canvas.y)
            }
            None => Pointer::absent(),
        }
    }

    /// Surface points of the active pile in canvas-local coordinates.
    fn surface(&self) -> Vec<Vec2> {
        match self.mode {
            Mode::Pile => self
                .sim
                .field()
                .surface_points(self.cfg.pile.base_thickness)
                .collect(),
            Mode::Drift => {
                let h = self.drift.viewport_height();
                self.drift
                    .pile
                    .iter()
                    .enumerate()
                    .map(|(x, &p)| Vec2::new(x as f32, h - p))
                    .collect()
            }
        }
    }

    /// Builds a filled silhouette between the surface and `bottom`.
    ///
    /// Each surface point contributes a top and a bottom vertex; consecutive
    /// columns are joined by two triangles. The pile outline is generally
    /// not convex, so a plain convex polygon would not fill it correctly.
    fn silhouette_mesh(points: &[egui::Pos2], bottom: f32, color: egui::Color32) -> egui::Mesh {
        let mut mesh = egui::Mesh::default();
        for p in points {
            mesh.colored_vertex(*p, color);
            mesh.colored_vertex(egui::pos2(p.x, bottom), color);
        }
        for i in 0..points.len().saturating_sub(1) as u32 {
            let top = 2 * i;
            mesh.add_triangle(top, top + 1, top + 2);
            mesh.add_triangle(top + 1, top + 3, top + 2);
        }
        mesh
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Helper to draw a labeled `f32` [`egui::DragValue`].
    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (run controls, stepping, mode).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let running = self.ticker.is_running();
                if ui
                    .button(if running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    if running {
                        self.stop();
                    } else {
                        self.start();
                    }
                }

                let mut interval = self.ticker.interval();
                if ui
                    .add(
                        egui::DragValue::new(&mut interval)
                            .prefix("dt target = ")
                            .range(crate::ticker::MIN_INTERVAL..=crate::ticker::MAX_INTERVAL)
                            .speed(0.001),
                    )
                    .changed()
                {
                    self.ticker.set_interval(interval);
                }

                if ui.button("Step").clicked() {
                    self.step_once();
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                if ui.selectable_label(self.mode == Mode::Pile, "❄ Pile").clicked() {
                    self.set_mode(Mode::Pile);
                }
                if ui.selectable_label(self.mode == Mode::Drift, "☁ Drift").clicked() {
                    self.set_mode(Mode::Drift);
                }
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.ticker.interval()));
                ui.label(format!("dt last = {:.3} s", self.ticker.last_dt()));
                ui.separator();
                ui.label(format!("ticks = {}", self.ticks));
                ui.label(format!("columns = {}", self.sim.field().len()));
                match self.mode {
                    Mode::Pile => {
                        ui.label(if self.last_report.melted {
                            "melting"
                        } else {
                            "growing"
                        });
                    }
                    Mode::Drift => {
                        ui.label(format!("flakes = {}", self.drift.flakes.len()));
                        ui.label(format!("landed = {}", self.last_landed));
                    }
                }
            });
        });
    }

    /// Builds the right-hand configuration panel.
    ///
    /// Drag ranges keep every value within what [`PileConfig::validate`]
    /// and [`DriftConfig::validate`] accept.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Growth");
                let pile = &mut self.cfg.pile;
                Self::labeled_drag_f32(ui, "growRate:", &mut pile.grow_rate, 0.0..=5.0, 0.005);
                Self::labeled_drag_f32(ui, "maxHeight:", &mut pile.max_height, 1.0..=500.0, 0.5);
                Self::labeled_drag_f32(
                    ui,
                    "baseThickness:",
                    &mut pile.base_thickness,
                    0.0..=200.0,
                    0.5,
                );

                ui.separator();
                ui.label("Melt");
                Self::labeled_drag_f32(ui, "meltRadius:", &mut pile.melt_radius, 1.0..=400.0, 0.5);
                Self::labeled_drag_f32(
                    ui,
                    "meltStrength:",
                    &mut pile.melt_strength,
                    0.0..=1.0,
                    0.005,
                );
                Self::labeled_drag_f32(ui, "meltFalloff:", &mut pile.melt_falloff, 0.0..=10.0, 0.05);
                Self::labeled_drag_f32(ui, "meltBand:", &mut pile.melt_band, 0.0..=1000.0, 1.0);

                ui.separator();
                ui.label("Smoothing");
                Self::labeled_drag_usize(ui, "smoothPasses:", &mut pile.smooth_passes, 0..=20, 1.0);
                Self::labeled_drag_f32(ui, "ease:", &mut pile.ease, 0.01..=1.0, 0.005);

                ui.separator();
                ui.label("Drift");
                let drift = &mut self.cfg.drift;
                Self::labeled_drag_f32(ui, "fallSpeed:", &mut drift.fall_speed, 0.05..=20.0, 0.05);
                Self::labeled_drag_f32(ui, "accRate:", &mut drift.acc_rate, 0.0..=5.0, 0.01);
                Self::labeled_drag_f32(ui, "spawnChance:", &mut drift.spawn_chance, 0.0..=1.0, 0.01);

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config {
                        pile: PileConfig::default(),
                        drift: DriftConfig::default(),
                    };
                }
            });

        self.sim.set_config(self.cfg.pile);
    }

    /// Builds the central panel where the pile is simulated and drawn.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::from_rgb(14, 20, 34)))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                self.resize(rect.size());

                // Input is only observed while running.
                if self.ticker.is_running() {
                    let pointer = self.pointer_from_hover(response.hover_pos(), rect);
                    self.sim.set_pointer(pointer);

                    let now = ctx.input(|i| i.time);
                    if self.ticker.poll(now) {
                        self.step_once();
                    }
                    ctx.request_repaint();
                }

                let mut points: Vec<egui::Pos2> = self
                    .surface()
                    .into_iter()
                    .map(|p| Self::local_to_screen(p, rect))
                    .collect();
                if let Some(last) = points.last().copied() {
                    points.push(egui::pos2(rect.max.x, last.y));
                }

                let fill = egui::Color32::from_rgba_unmultiplied(255, 255, 255, 235);
                painter.add(egui::Shape::mesh(Self::silhouette_mesh(
                    &points,
                    rect.max.y,
                    fill,
                )));

                let outline = egui::Color32::from_rgba_unmultiplied(255, 255, 255, 56);
                painter.add(egui::Shape::line(points, egui::Stroke::new(1.0, outline)));

                if self.mode == Mode::Drift {
                    let flake_color = egui::Color32::from_rgba_unmultiplied(255, 255, 255, 230);
                    for f in &self.drift.flakes {
                        painter.circle_filled(
                            Self::local_to_screen(f.pos, rect),
                            f.radius,
                            flake_color,
                        );
                    }
                }
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.stop();
        }

        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn test_viewer(mode: Mode) -> Viewer {
        Viewer::new(Config::default(), mode, StdRng::seed_from_u64(1), 1.0 / 60.0)
    }

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(20.0, 40.0), egui::vec2(200.0, 100.0))
    }

    #[test]
    fn screen_to_local_and_back_is_roundtrip() {
        let rect = test_rect();
        let p = egui::pos2(57.5, 91.25);

        let local = Viewer::screen_to_local(p, rect);
        assert_eq!(local, Vec2::new(37.5, 51.25));
        assert_eq!(Viewer::local_to_screen(local, rect), p);
    }

    #[test]
    fn hover_maps_to_pointer_sample() {
        let mut viewer = test_viewer(Mode::Pile);
        let rect = test_rect();
        viewer.resize(rect.size());

        let inside = viewer.pointer_from_hover(Some(egui::pos2(120.0, 90.0)), rect);
        assert!(inside.inside);
        assert_eq!(inside.pos, Some(Vec2::new(100.0, 50.0)));

        let outside = viewer.pointer_from_hover(Some(egui::pos2(0.0, 0.0)), rect);
        assert!(!outside.inside);

        assert_eq!(viewer.pointer_from_hover(None, rect), Pointer::absent());
    }

    #[test]
    fn step_once_advances_active_mode_only() {
        let mut viewer = test_viewer(Mode::Pile);
        viewer.step_once();

        assert_eq!(viewer.ticks, 1);
        assert!(viewer.sim.field().target.iter().all(|&t| t > 0.0));

        viewer.cfg.drift.spawn_chance = 1.0;
        viewer.set_mode(Mode::Drift);
        let before = viewer.sim.field().target.clone();
        viewer.step_once();

        assert_eq!(viewer.ticks, 2);
        assert_eq!(viewer.drift.flakes.len(), 1);
        assert_eq!(viewer.sim.field().target, before);
    }

    #[test]
    fn reset_clears_both_simulations() {
        let mut viewer = test_viewer(Mode::Pile);
        viewer.cfg.drift.spawn_chance = 1.0;
        for _ in 0..5 {
            viewer.step_once();
        }
        viewer.set_mode(Mode::Drift);
        viewer.step_once();

        viewer.reset();

        assert_eq!(viewer.ticks, 0);
        assert!(viewer.sim.field().pile.iter().all(|&p| p == 0.0));
        assert!(viewer.drift.flakes.is_empty());
    }

    #[test]
    fn resize_to_new_canvas_resets_columns() {
        let mut viewer = test_viewer(Mode::Pile);
        viewer.step_once();

        viewer.resize(egui::vec2(300.0, 200.0));
        assert_eq!(viewer.sim.field().len(), 300);
        assert_eq!(viewer.drift.pile.len(), 300);
        assert!(viewer.sim.field().pile.iter().all(|&p| p == 0.0));
        assert_eq!(viewer.ticks, 0);
    }

    #[test]
    fn stop_is_idempotent_and_drops_pointer() {
        let mut viewer = test_viewer(Mode::Pile);
        assert!(viewer.ticker.is_running());
        viewer
            .sim
            .set_pointer(Pointer::from_local(10.0, 10.0, 100.0, 100.0));

        viewer.stop();
        viewer.stop();

        assert!(!viewer.ticker.is_running());
        assert_eq!(*viewer.sim.pointer(), Pointer::absent());

        viewer.start();
        assert!(viewer.ticker.is_running());
    }

    #[test]
    fn silhouette_mesh_has_two_triangles_per_segment() {
        let points = [
            egui::pos2(0.0, 10.0),
            egui::pos2(1.0, 8.0),
            egui::pos2(2.0, 9.0),
        ];
        let mesh = Viewer::silhouette_mesh(&points, 20.0, egui::Color32::WHITE);

        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices.len(), 12);
        assert_eq!(mesh.vertices[1].pos, egui::pos2(0.0, 20.0));
    }

    #[test]
    fn drift_surface_measures_from_bottom_without_base_band() {
        let mut viewer = test_viewer(Mode::Drift);
        viewer.resize(egui::vec2(4.0, 50.0));
        viewer.drift.pile[2] = 5.0;

        let surface = viewer.surface();
        assert_eq!(surface.len(), 4);
        assert_eq!(surface[2], Vec2::new(2.0, 45.0));
        assert_eq!(surface[0], Vec2::new(0.0, 50.0));
    }
}
