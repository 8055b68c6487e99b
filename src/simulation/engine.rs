//! The simulation engine that ties everything together
//!
//! Owns the world state and a run/pause lifecycle, binds to a drawing
//! surface and drives the per-frame sequence: advance time, update
//! vehicles, update metrics, render.

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::metrics::FpsCounter;
use super::scenario::{Scenario, ScenarioLayout};
use super::state::{
    SimulationState, DEFAULT_SCENARIO, MAX_SPEED, MAX_TRAFFIC_DENSITY, MIN_SPEED,
    MIN_TRAFFIC_DENSITY,
};
use super::types::{
    Point, Size, Weather, DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH, MIN_SURFACE_HEIGHT,
    MIN_SURFACE_WIDTH,
};
use super::vehicle::{advance_vehicles, MotionContext, Vehicle, VehicleUpdate};
use crate::render::{self, DrawContext, Surface};

/// Duration of one display refresh at the nominal 60 Hz; one tick
pub const FRAME_DURATION_MS: f64 = 1000.0 / 60.0;

/// Token for a scheduled frame callback.
///
/// Only the most recently requested handle can run a frame; pausing or
/// resetting invalidates it, so callbacks queued before that are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// The simulation engine bound to a drawing surface
pub struct SimulationEngine<S: Surface> {
    surface: S,
    state: SimulationState,
    /// Logical surface size used for layouts, wrapping and drawing
    viewport: Size,
    rng: StdRng,
    pending_frame: Option<FrameHandle>,
    next_frame_id: u64,
    last_frame_ms: Option<f64>,
    fps: FpsCounter,
}

impl<S: Surface> SimulationEngine<S> {
    fn new_internal(mut surface: S, rng: StdRng) -> Result<Self> {
        if !surface.is_attached() {
            bail!("surface is not attached");
        }
        surface
            .context()
            .context("unable to get 2D context from surface")?;

        let mut engine = Self {
            surface,
            state: SimulationState::default(),
            viewport: Size::default(),
            rng,
            pending_frame: None,
            next_frame_id: 0,
            last_frame_ms: None,
            fps: FpsCounter::new(),
        };
        engine.resize();
        engine.load_scenario(DEFAULT_SCENARIO.id());

        info!(
            "Simulation engine ready on a {}x{} surface",
            engine.viewport.width, engine.viewport.height
        );
        Ok(engine)
    }

    /// Bind an engine to `surface`. Fails if the surface is detached or has
    /// no drawing context.
    pub fn new(surface: S) -> Result<Self> {
        Self::new_internal(surface, StdRng::from_os_rng())
    }

    /// Like `new`, with a seeded RNG for reproducible runs
    pub fn with_seed(surface: S, seed: u64) -> Result<Self> {
        Self::new_internal(surface, StdRng::seed_from_u64(seed))
    }

    /// Match the backing buffer to the on-screen size. Simulation state is
    /// left untouched.
    pub fn resize(&mut self) {
        let client = self.surface.client_size();
        let width = if client.width > 0.0 {
            client.width
        } else {
            DEFAULT_SURFACE_WIDTH
        }
        .max(MIN_SURFACE_WIDTH);
        let height = if client.height > 0.0 {
            client.height
        } else {
            DEFAULT_SURFACE_HEIGHT
        }
        .max(MIN_SURFACE_HEIGHT);

        let ratio = self.surface.pixel_ratio();
        let ratio = if ratio > 0.0 { ratio } else { 1.0 };

        self.surface.set_backing_size(
            (width * ratio).round() as u32,
            (height * ratio).round() as u32,
        );
        if let Some(ctx) = self.surface.context() {
            ctx.set_scale(ratio);
        }
        self.viewport = Size::new(width, height);
        debug!("Resized surface to {width}x{height} at {ratio}x");
    }

    /// Enter the running state and return the handle of the pending frame.
    /// Calling it again while running returns the same handle.
    pub fn start(&mut self) -> FrameHandle {
        if !self.state.is_running {
            self.state.is_running = true;
            self.last_frame_ms = None;
            info!("Simulation started");
        }
        match self.pending_frame {
            Some(handle) => handle,
            None => self.request_frame(),
        }
    }

    /// Stop scheduling frames and cancel the pending one
    pub fn pause(&mut self) {
        if self.state.is_running {
            info!("Simulation paused");
        }
        self.state.is_running = false;
        self.pending_frame = None;
    }

    /// Pause, restore every default and reload the active scenario
    pub fn reset(&mut self) {
        self.pause();
        let scenario = std::mem::take(&mut self.state.scenario);
        self.state = SimulationState::default();
        self.fps.reset();
        self.last_frame_ms = None;
        self.load_scenario(&scenario);
        info!("Simulation reset");
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_frame_id);
        self.next_frame_id += 1;
        self.pending_frame = Some(handle);
        handle
    }

    /// The frame the host should run next, if the engine is running
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    /// Run the frame for `handle` at display time `now_ms`.
    ///
    /// Stale handles and frames arriving while paused do nothing and return
    /// false. Otherwise one step runs and the next frame is requested.
    pub fn run_frame(&mut self, handle: FrameHandle, now_ms: f64) -> bool {
        if !self.state.is_running || self.pending_frame != Some(handle) {
            return false;
        }
        self.pending_frame = None;

        let elapsed_ms = self
            .last_frame_ms
            .map_or(0.0, |last| (now_ms - last).max(0.0));
        self.last_frame_ms = Some(now_ms);

        if let Some(fps) = self.fps.record_frame(now_ms) {
            self.state.metrics.fps = fps;
            debug!("fps: {fps}");
        }

        self.advance((elapsed_ms / FRAME_DURATION_MS) as f32);
        self.request_frame();
        true
    }

    /// One simulation step of `delta_ticks` (before the speed multiplier),
    /// followed by a metrics update and a redraw. Ignores the run state, for
    /// hosts that drive time themselves.
    pub fn advance(&mut self, delta_ticks: f32) {
        self.update_vehicles(delta_ticks * self.state.speed);
        self.state
            .metrics
            .update(&self.state.vehicles, self.state.traffic_density, &mut self.rng);
        self.draw();
    }

    fn update_vehicles(&mut self, delta_ticks: f32) {
        let ctx = MotionContext {
            cruise_speed: self.state.cruise_speed(),
            bounds: self.viewport,
            delta_ticks,
        };
        let updates = advance_vehicles(
            &mut self.state.vehicles,
            &self.state.obstacles,
            &self.state.pedestrians,
            &ctx,
        );

        for update in updates {
            if let VehicleUpdate::Avoided { .. } = update {
                self.state.metrics.record_near_miss();
            }
            if update.is_decision() {
                self.state.metrics.sample_decision(&mut self.rng);
            }
        }
    }

    /// Paint the current state onto the surface
    pub fn draw(&mut self) {
        if let Some(ctx) = self.surface.context() {
            render::render(&self.state, &self.viewport, ctx, &mut self.rng);
        }
    }

    pub fn set_speed(&mut self, speed: f32) {
        if !speed.is_finite() {
            warn!("Speed {speed} is not finite, keeping {}", self.state.speed);
            return;
        }
        let clamped = speed.clamp(MIN_SPEED, MAX_SPEED);
        if clamped != speed {
            warn!("Speed {speed} out of range, using {clamped}");
        }
        self.state.speed = clamped;
    }

    /// Set the density and regenerate regular traffic to match it
    pub fn set_traffic_density(&mut self, density: u32) {
        let clamped = density.clamp(MIN_TRAFFIC_DENSITY, MAX_TRAFFIC_DENSITY);
        if clamped != density {
            warn!("Traffic density {density} out of range, using {clamped}");
        }
        self.state.traffic_density = clamped;
        self.regenerate_traffic();
    }

    /// Replace every regular vehicle with `density / 2` fresh ones at random
    /// positions on the road band. AI vehicles are kept as they are.
    fn regenerate_traffic(&mut self) {
        self.state.vehicles.retain(Vehicle::is_ai);

        let count = self.state.traffic_density / 2;
        let size = self.viewport;
        for i in 0..count {
            let position = Point::new(
                self.rng.random::<f32>() * size.width,
                size.height * (0.4 + self.rng.random::<f32>() * 0.2),
            );
            let vx = (self.rng.random::<f32>() - 0.5) * 2.0;
            self.state
                .vehicles
                .push(Vehicle::regular(format!("traffic-{i}"), position, vx, 0.0));
        }
        debug!("Regenerated {count} regular vehicles");
    }

    pub fn set_weather(&mut self, weather: Weather) {
        self.state.weather = weather;
    }

    pub fn toggle_sensor_radius(&mut self) {
        self.state.show_sensor_radius = !self.state.show_sensor_radius;
    }

    pub fn toggle_decision_points(&mut self) {
        self.state.show_decision_points = !self.state.show_decision_points;
    }

    pub fn toggle_path_prediction(&mut self) {
        self.state.show_path_prediction = !self.state.show_path_prediction;
    }

    /// Replace the world with preset `id`. Unknown ids leave it empty.
    pub fn load_scenario(&mut self, id: &str) {
        let layout = match Scenario::from_id(id) {
            Some(scenario) => scenario.layout(&self.viewport, &mut self.rng),
            None => {
                warn!("Unknown scenario '{id}', leaving the world empty");
                ScenarioLayout::default()
            }
        };

        self.state.scenario = id.to_string();
        self.state.vehicles = layout.vehicles;
        self.state.obstacles = layout.obstacles;
        self.state.pedestrians = layout.pedestrians;

        info!(
            "Loaded scenario '{id}': {} vehicles, {} obstacles, {} pedestrians",
            self.state.vehicles.len(),
            self.state.obstacles.len(),
            self.state.pedestrians.len()
        );
    }

    /// Count a collision reported by an outside collaborator
    pub fn record_collision(&mut self) {
        self.state.metrics.collisions += 1;
    }

    /// Owned copy of the whole state; changing it does not affect the engine
    pub fn get_state(&self) -> SimulationState {
        self.state.clone()
    }

    /// Read-only view of the live state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface, e.g. to report a new on-screen size
    /// before calling `resize`
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
