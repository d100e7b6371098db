//! Interactive 3D aggregation viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`Simulation`] together
//! with camera and timing state, and implements [`eframe::App`] to tick,
//! render and control the simulation through an egui UI.

use crate::camera::{OrbitCamera, Projected};
use eframe::App;
use glam::Vec3;
use log::{info, warn};
use rand::Rng;
use sim_core::{Config, ConfigError, Renderable, Simulation, types::ParticleId};

const ATTACHED_COLOR: egui::Color32 = egui::Color32::from_rgb(51, 51, 255);
const FREE_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 51, 51);
const NEW_COLOR: egui::Color32 = egui::Color32::YELLOW;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`Simulation`] and the [`Config`] used for the next reset.
/// - View state (orbit camera, timing).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running` is `true` and `step_interval` has passed, call [`Viewer::step_once`].
/// 3. Render the boundary cube and the particles, far to near.
///
/// ### Fields
/// - `sim` - Current simulation run.
/// - `cfg` - Parameters edited in the side panel; applied on the next reset.
///
/// - `rng` - Picks a fresh seed for every reset.
///
/// - `running` - Whether the simulation is currently auto-advancing.
/// - `camera` - Orbit camera used to project particles.
///
/// - `last_new_ids` - Particles attached in the last tick (for highlighting).
///
/// - `step_interval` - Target time between automatic ticks (seconds).
/// - `last_step_time` - Time stamp of the last tick (egui time).
/// - `last_step_dt` - Actual time between the last two ticks (for display only).
pub struct Viewer {
    sim: Simulation,
    cfg: Config,

    rng: rand::rngs::ThreadRng,

    running: bool,
    camera: OrbitCamera,

    last_new_ids: Vec<ParticleId>,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a viewer around a fresh simulation.
    ///
    /// The simulation starts paused, ticking at `cfg.tick_interval` once
    /// running, with the camera at `(2, 2, 2)` looking at the cluster seed.
    ///
    /// ### Returns
    /// - `Ok(Viewer)` ready to be passed to `eframe::run_native`.
    /// - `Err(ConfigError)` if `cfg` is not a usable configuration.
    pub fn new(cfg: Config, seed: u64) -> Result<Self, ConfigError> {
        let sim = Simulation::new(cfg, seed)?;

        Ok(Self {
            sim,
            cfg,
            rng: rand::rng(),
            running: false,
            camera: OrbitCamera::default(),
            last_new_ids: Vec::with_capacity(16),
            step_interval: cfg.tick_interval,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        })
    }

    /// Restarts the simulation with the panel's config and a new random seed.
    ///
    /// Camera settings and the tick interval are kept. If the edited config
    /// is invalid the current run continues and the problem is logged.
    fn reset(&mut self) {
        let seed = self.rng.random::<u64>();
        match self.sim.reset(self.cfg, seed) {
            Ok(()) => {
                self.last_new_ids.clear();
                self.running = false;
            }
            Err(e) => warn!("reset rejected: {e}"),
        }
    }

    /// Advances the simulation by a single tick.
    ///
    /// The ids of particles attached in this tick are stored in
    /// `last_new_ids` so they can be highlighted in the next frame.
    fn step_once(&mut self) {
        let was_settled = self.sim.is_settled();
        self.last_new_ids = self.sim.step();

        if !was_settled && self.sim.is_settled() {
            info!("all particles attached after {} ticks", self.sim.tick());
        }
    }

    /// Projects every particle and orders them far to near, so that painting
    /// in order lets nearer discs cover farther ones.
    fn depth_sorted(&self, rect: egui::Rect) -> Vec<(ParticleId, Projected, Renderable)> {
        let mut items: Vec<_> = self
            .sim
            .snapshot()
            .enumerate()
            .filter_map(|(id, r)| {
                self.camera
                    .project(r.pos, r.radius, rect)
                    .map(|proj| (id, proj, r))
            })
            .collect();
        items.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));
        items
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

    /// Builds the top panel UI (run controls, stepping, camera).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.001..=1.0)
                        .speed(0.001),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                if ui.button("Reset camera").clicked() {
                    self.camera = OrbitCamera::default();
                }
            });
        });
    }

    /// Builds the bottom status bar (timing, tick, cluster statistics).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        let stats = self.sim.stats();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("tick = {}", self.sim.tick()));
                ui.label(format!("attached = {}", stats.attached));
                ui.label(format!("free = {}", stats.free));
                ui.label(format!("cluster radius = {:.3}", stats.cluster_radius));
                ui.separator();
                ui.label(format!("seed = {}", self.sim.seed()));
            });
        });
    }

    /// Builds the right-hand configuration panel for simulation parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");
                ui.label("Changes apply on Reset.");

                ui.separator();
                ui.label("Population");
                Self::labeled_drag_usize(
                    ui,
                    "particle_count:",
                    &mut self.cfg.particle_count,
                    0..=5000,
                    1.0,
                );
                Self::labeled_drag_usize(ui, "seed_count:", &mut self.cfg.seed_count, 1..=20, 1.0);

                ui.separator();
                ui.label("Radii");
                Self::labeled_drag_f32(
                    ui,
                    "base_radius:",
                    &mut self.cfg.base_radius,
                    0.001..=0.2,
                    0.001,
                );
                Self::labeled_drag_f32(
                    ui,
                    "seed_radius_factor:",
                    &mut self.cfg.seed_radius_factor,
                    0.1..=10.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "growth_rate:",
                    &mut self.cfg.growth_rate,
                    0.0..=0.1,
                    0.001,
                );

                ui.separator();
                ui.label("Attraction");
                Self::labeled_drag_f32(
                    ui,
                    "attraction_range:",
                    &mut self.cfg.attraction_range,
                    0.0..=2.0,
                    0.005,
                );
                Self::labeled_drag_f32(
                    ui,
                    "attraction_force:",
                    &mut self.cfg.attraction_force,
                    0.0..=0.01,
                    0.0001,
                );
                Self::labeled_drag_f32(
                    ui,
                    "attach_factor:",
                    &mut self.cfg.attach_factor,
                    0.1..=2.0,
                    0.01,
                );

                ui.separator();
                ui.label("Motion");
                Self::labeled_drag_f32(
                    ui,
                    "brownian_amplitude:",
                    &mut self.cfg.brownian_amplitude,
                    0.0..=0.2,
                    0.001,
                );
                Self::labeled_drag_f32(
                    ui,
                    "initial_speed:",
                    &mut self.cfg.initial_speed,
                    0.0..=0.1,
                    0.0005,
                );

                ui.separator();
                ui.label("Boundary");
                Self::labeled_drag_f32(ui, "boundary:", &mut self.cfg.boundary, 0.1..=5.0, 0.05);
                Self::labeled_drag_f32(
                    ui,
                    "spawn_half_extent:",
                    &mut self.cfg.spawn_half_extent,
                    0.1..=5.0,
                    0.05,
                );
                Self::labeled_drag_f32(
                    ui,
                    "bounce_damping:",
                    &mut self.cfg.bounce_damping,
                    0.0..=1.0,
                    0.01,
                );

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                }
            });
    }

    /// Draws the wireframe of the containing cube.
    fn draw_boundary(&self, painter: &egui::Painter, rect: egui::Rect) {
        let b = self.sim.config().boundary;
        let corner = |i: usize| {
            Vec3::new(
                if i & 1 == 0 { -b } else { b },
                if i & 2 == 0 { -b } else { b },
                if i & 4 == 0 { -b } else { b },
            )
        };
        let stroke = egui::Stroke::new(1.0, egui::Color32::DARK_GRAY);

        for i in 0..8 {
            for bit in [1, 2, 4] {
                let j = i | bit;
                if j == i {
                    continue;
                }
                let a = self.camera.project(corner(i), 0.0, rect);
                let c = self.camera.project(corner(j), 0.0, rect);
                if let (Some(a), Some(c)) = (a, c) {
                    painter.line_segment([a.pos, c.pos], stroke);
                }
            }
        }
    }

    /// Builds the central panel where the cluster is drawn and the camera is controlled.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Orbit with drag.
            if response.dragged() {
                let delta = response.drag_delta();
                self.camera.orbit(-delta.x * 0.01, delta.y * 0.01);
            }

            // Zoom with scroll.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 && response.hovered() {
                let factor = (1.0 - scroll * 0.001).clamp(0.5, 2.0);
                self.camera.zoom(factor);
            }

            self.draw_boundary(&painter, rect);

            for (id, proj, r) in self.depth_sorted(rect) {
                let color = if self.last_new_ids.contains(&id) {
                    NEW_COLOR
                } else if r.attached {
                    ATTACHED_COLOR
                } else {
                    FREE_COLOR
                };
                painter.circle_filled(proj.pos, proj.radius.max(1.0), color);
            }

            // Auto-run simulation if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    ///
    /// The tick (if due) runs inside the central panel before anything
    /// there is drawn, so every frame paints a complete post-tick state.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    fn small_cfg() -> Config {
        Config {
            particle_count: 20,
            ..Config::default()
        }
    }

    #[test]
    fn new_viewer_starts_paused_with_seed_only_cluster() {
        let viewer = Viewer::new(small_cfg(), 1).unwrap();

        assert!(!viewer.running);
        assert_eq!(viewer.sim.tick(), 0);
        assert_eq!(viewer.sim.stats().attached, 1);
        assert_eq!(viewer.step_interval, small_cfg().tick_interval);
    }

    #[test]
    fn new_viewer_rejects_invalid_config() {
        let cfg = Config {
            base_radius: -1.0,
            ..small_cfg()
        };
        assert!(Viewer::new(cfg, 1).is_err());
    }

    #[test]
    fn step_once_advances_tick() {
        let mut viewer = Viewer::new(small_cfg(), 2).unwrap();
        viewer.step_once();
        viewer.step_once();
        assert_eq!(viewer.sim.tick(), 2);
    }

    #[test]
    fn step_once_records_new_attachments() {
        // No Brownian motion, no initial drift and a huge attraction range:
        // every particle falls straight onto the cluster.
        let cfg = Config {
            particle_count: 5,
            brownian_amplitude: 0.0,
            initial_speed: 0.0,
            attraction_range: 10.0,
            ..Config::default()
        };
        let mut viewer = Viewer::new(cfg, 3).unwrap();

        let mut seen = Vec::new();
        for _ in 0..2000 {
            viewer.step_once();
            seen.extend(viewer.last_new_ids.iter().copied());
        }

        assert!(!seen.is_empty());
        for id in seen {
            assert!(viewer.sim.store().particles[id].attached);
        }
    }

    #[test]
    fn reset_restores_basic_state() {
        let mut viewer = Viewer::new(small_cfg(), 4).unwrap();
        viewer.step_once();
        viewer.last_new_ids.push(7);
        viewer.running = true;
        viewer.cfg.particle_count = 30;

        viewer.reset();

        assert_eq!(viewer.sim.tick(), 0);
        assert_eq!(viewer.sim.store().len(), 31);
        assert!(viewer.last_new_ids.is_empty());
        assert!(!viewer.running);
    }

    #[test]
    fn reset_keeps_edited_tick_interval() {
        let mut viewer = Viewer::new(small_cfg(), 7).unwrap();
        viewer.step_interval = 0.25;

        viewer.reset();

        assert_eq!(viewer.sim.tick(), 0);
        assert_eq!(viewer.step_interval, 0.25);
    }

    #[test]
    fn reset_with_invalid_config_keeps_current_run() {
        let mut viewer = Viewer::new(small_cfg(), 5).unwrap();
        viewer.step_once();
        viewer.cfg.seed_count = 0;

        viewer.reset();

        assert_eq!(viewer.sim.tick(), 1);
        assert_eq!(viewer.sim.seed(), 5);
    }

    #[test]
    fn depth_sorted_paints_far_to_near() {
        let viewer = Viewer::new(small_cfg(), 6).unwrap();
        let items = viewer.depth_sorted(test_rect());

        assert!(!items.is_empty());
        for pair in items.windows(2) {
            assert!(pair[0].1.depth >= pair[1].1.depth);
        }
    }
}
