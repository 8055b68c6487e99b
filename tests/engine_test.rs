//! Engine lifecycle tests: construction, run/pause/reset, frame scheduling,
//! resizing and the bounded controls

use av_traffic_sim::render::{RecordingSurface, Surface};
use av_traffic_sim::simulation::{
    Scenario, SimulationEngine, Size, Weather, DEFAULT_SCENARIO, FRAME_DURATION_MS, MAX_SPEED,
    MAX_TRAFFIC_DENSITY, MIN_SPEED, MIN_TRAFFIC_DENSITY,
};

fn test_engine() -> SimulationEngine<RecordingSurface> {
    SimulationEngine::with_seed(RecordingSurface::new(800.0, 400.0), 42)
        .expect("engine should bind to an attached surface")
}

fn regular_x(engine: &SimulationEngine<RecordingSurface>) -> f32 {
    engine
        .state()
        .vehicles
        .iter()
        .find(|v| !v.is_ai())
        .map(|v| v.x)
        .expect("scenario should have a regular vehicle")
}

#[test]
fn test_construction_requires_attached_surface() {
    let err = SimulationEngine::new(RecordingSurface::new(800.0, 400.0).detached())
        .err()
        .expect("detached surface must be rejected");
    assert!(
        err.to_string().contains("not attached"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_construction_requires_drawing_context() {
    let err = SimulationEngine::new(RecordingSurface::new(800.0, 400.0).without_context())
        .err()
        .expect("surface without a context must be rejected");
    assert!(
        err.to_string().contains("2D context"),
        "unexpected error: {err}"
    );
}

#[test]
fn test_new_engine_loads_default_scenario() {
    let engine = test_engine();
    let state = engine.state();

    assert!(!state.is_running);
    assert_eq!(state.scenario, DEFAULT_SCENARIO.id());
    assert_eq!(state.vehicles.len(), 2);
    assert_eq!(state.obstacles.len(), 4);
    assert_eq!(state.pedestrians.len(), 2);
    assert_eq!(state.speed, 1.0);
    assert_eq!(state.traffic_density, 5);
    assert_eq!(state.weather, Weather::Clear);
    assert!(state.show_sensor_radius);
    assert!(state.show_decision_points);
    assert!(!state.show_path_prediction);
    assert_eq!(engine.pending_frame(), None);
}

#[test]
fn test_start_is_idempotent() {
    let mut engine = test_engine();

    let first = engine.start();
    let second = engine.start();

    assert!(engine.state().is_running);
    assert_eq!(first, second, "a second start must not schedule another frame");
    assert_eq!(engine.pending_frame(), Some(first));
}

#[test]
fn test_pause_cancels_pending_frame() {
    let mut engine = test_engine();
    let handle = engine.start();
    engine.pause();

    assert!(!engine.state().is_running);
    assert_eq!(engine.pending_frame(), None);
    assert!(!engine.run_frame(handle, 16.0), "stale frame must be a no-op");

    // Restarting hands out a fresh handle; the old one stays dead
    let fresh = engine.start();
    assert_ne!(fresh, handle);
    assert!(!engine.run_frame(handle, 32.0));
    assert!(engine.run_frame(fresh, 48.0));
}

#[test]
fn test_paused_engine_never_changes() {
    let mut engine = test_engine();
    let handle = engine.start();
    engine.run_frame(handle, 0.0);
    let stale = engine.pending_frame().expect("next frame");
    engine.pause();
    let before = engine.get_state();

    for i in 1..=600 {
        assert!(!engine.run_frame(stale, i as f64 * 1000.0));
    }

    assert_eq!(engine.get_state(), before);
    assert_eq!(engine.pending_frame(), None);
}

#[test]
fn test_pause_while_paused_is_noop() {
    let mut engine = test_engine();
    let before = engine.get_state();
    engine.pause();
    assert_eq!(engine.get_state(), before);
}

#[test]
fn test_each_handle_runs_once() {
    let mut engine = test_engine();
    let handle = engine.start();

    assert!(engine.run_frame(handle, 0.0));
    assert!(!engine.run_frame(handle, 16.0));

    let next = engine.pending_frame().expect("running engine schedules the next frame");
    assert_ne!(next, handle);
    assert!(engine.run_frame(next, 16.0));
}

#[test]
fn test_first_frame_after_start_has_zero_delta() {
    let mut engine = test_engine();
    let start_x = regular_x(&engine);

    let handle = engine.start();
    assert!(engine.run_frame(handle, 5_000.0));
    assert_eq!(regular_x(&engine), start_x);

    let next = engine.pending_frame().expect("next frame");
    assert!(engine.run_frame(next, 5_000.0 + FRAME_DURATION_MS));
    assert!(
        (regular_x(&engine) - (start_x - 1.0)).abs() < 1e-3,
        "one tick at vx=-1 should move one unit left"
    );
}

#[test]
fn test_speed_multiplier_scales_time() {
    let mut engine = test_engine();
    engine.set_speed(2.0);
    let start_x = regular_x(&engine);

    engine.advance(1.0);

    assert!((regular_x(&engine) - (start_x - 2.0)).abs() < 1e-4);
}

#[test]
fn test_long_pause_does_not_jump() {
    let mut engine = test_engine();
    let handle = engine.start();
    engine.run_frame(handle, 0.0);
    engine.pause();

    let start_x = regular_x(&engine);
    let handle = engine.start();
    assert!(engine.run_frame(handle, 60_000.0));
    assert_eq!(regular_x(&engine), start_x);
}

#[test]
fn test_reset_restores_defaults_and_keeps_scenario() {
    let mut engine = test_engine();
    engine.load_scenario(Scenario::HighwayMerge.id());
    engine.set_speed(2.5);
    engine.set_weather(Weather::Snow);
    engine.set_traffic_density(9);
    engine.toggle_sensor_radius();
    engine.toggle_path_prediction();
    engine.record_collision();
    let handle = engine.start();
    for i in 0..120 {
        let handle = engine.pending_frame().unwrap_or(handle);
        engine.run_frame(handle, i as f64 * FRAME_DURATION_MS);
    }

    engine.reset();
    let state = engine.state();

    assert!(!state.is_running);
    assert_eq!(engine.pending_frame(), None);
    assert_eq!(state.scenario, "highway-merge");
    assert_eq!(state.vehicles.len(), 4, "highway preset reloaded");
    assert_eq!(state.speed, 1.0);
    assert_eq!(state.weather, Weather::Clear);
    assert_eq!(state.traffic_density, 5);
    assert!(state.show_sensor_radius);
    assert!(!state.show_path_prediction);
    assert_eq!(state.metrics.near_misses, 0);
    assert_eq!(state.metrics.collisions, 0);
}

#[test]
fn test_resize_uses_pixel_ratio() {
    let surface = RecordingSurface::new(800.0, 400.0).with_pixel_ratio(2.0);
    let engine = SimulationEngine::with_seed(surface, 1).expect("engine");

    assert_eq!(engine.surface().backing_size(), (1600, 800));
    assert_eq!(engine.surface().scale(), 2.0);
    assert_eq!(engine.viewport(), Size::new(800.0, 400.0));
}

#[test]
fn test_resize_keeps_simulation_state() {
    let mut engine = test_engine();
    engine.advance(3.0);
    let before = engine.get_state();

    engine.surface_mut().set_client_size(1000.0, 500.0);
    engine.resize();

    assert_eq!(engine.viewport(), Size::new(1000.0, 500.0));
    assert_eq!(engine.surface().backing_size(), (1000, 500));
    assert_eq!(engine.get_state(), before);
}

#[test]
fn test_resize_enforces_minimum_and_fallback() {
    let mut engine = test_engine();

    engine.surface_mut().set_client_size(200.0, 100.0);
    engine.resize();
    assert_eq!(engine.viewport(), Size::new(400.0, 300.0));

    engine.surface_mut().set_client_size(0.0, 0.0);
    engine.resize();
    assert_eq!(engine.viewport(), Size::new(800.0, 600.0));
    assert_eq!(engine.surface().client_size(), Size::new(0.0, 0.0));
}

#[test]
fn test_get_state_returns_independent_snapshot() {
    let engine = test_engine();

    let mut snapshot = engine.get_state();
    snapshot.vehicles.clear();
    snapshot.speed = 3.0;
    snapshot.metrics.near_misses = 99;

    assert_eq!(engine.state().vehicles.len(), 2);
    assert_eq!(engine.state().speed, 1.0);
    assert_eq!(engine.state().metrics.near_misses, 0);
}

#[test]
fn test_speed_is_clamped() {
    let mut engine = test_engine();

    engine.set_speed(10.0);
    assert_eq!(engine.state().speed, MAX_SPEED);

    engine.set_speed(0.0);
    assert_eq!(engine.state().speed, MIN_SPEED);

    engine.set_speed(1.5);
    assert_eq!(engine.state().speed, 1.5);
}

#[test]
fn test_non_finite_speed_is_ignored() {
    let mut engine = test_engine();
    engine.set_speed(1.5);

    engine.set_speed(f32::NAN);
    assert_eq!(engine.state().speed, 1.5);
    engine.set_speed(f32::INFINITY);
    assert_eq!(engine.state().speed, 1.5);

    engine.advance(1.0);
    assert!(engine
        .state()
        .vehicles
        .iter()
        .all(|v| v.x.is_finite() && v.y.is_finite()));
}

#[test]
fn test_traffic_density_is_clamped() {
    let mut engine = test_engine();

    engine.set_traffic_density(0);
    assert_eq!(engine.state().traffic_density, MIN_TRAFFIC_DENSITY);

    engine.set_traffic_density(25);
    assert_eq!(engine.state().traffic_density, MAX_TRAFFIC_DENSITY);
}

#[test]
fn test_toggles_flip_flags() {
    let mut engine = test_engine();

    engine.toggle_sensor_radius();
    engine.toggle_decision_points();
    engine.toggle_path_prediction();
    let state = engine.state();
    assert!(!state.show_sensor_radius);
    assert!(!state.show_decision_points);
    assert!(state.show_path_prediction);

    engine.toggle_path_prediction();
    assert!(!engine.state().show_path_prediction);
}

#[test]
fn test_weather_slows_cruise_speed() {
    let mut engine = test_engine();
    engine.set_weather(Weather::Fog);
    assert!((engine.state().cruise_speed() - 1.2).abs() < 1e-6);
}

#[test]
fn test_weather_parses_and_cycles() {
    assert_eq!(" Fog ".parse::<Weather>().ok(), Some(Weather::Fog));
    assert!("hail".parse::<Weather>().is_err());
    assert_eq!(Weather::Rain.to_string(), "rain");

    let mut weather = Weather::Clear;
    for expected in [Weather::Rain, Weather::Fog, Weather::Snow, Weather::Clear] {
        weather = weather.next();
        assert_eq!(weather, expected);
    }
}

#[test]
fn test_unknown_scenario_yields_empty_world() {
    let mut engine = test_engine();
    engine.load_scenario("nonexistent");

    let state = engine.state();
    assert_eq!(state.scenario, "nonexistent");
    assert!(state.vehicles.is_empty());
    assert!(state.obstacles.is_empty());
    assert!(state.pedestrians.is_empty());

    // Stepping an empty world is safe
    engine.advance(1.0);
    assert_eq!(engine.state().metrics.avg_speed, 0);
}

#[test]
fn test_fps_metric_measured_from_frame_times() {
    let mut engine = test_engine();
    let mut handle = engine.start();

    // 30 Hz display for a little over a second
    for i in 0..=31 {
        engine.run_frame(handle, i as f64 * 1000.0 / 30.0);
        handle = engine.pending_frame().expect("next frame");
    }

    let fps = engine.state().metrics.fps;
    assert!((29..=32).contains(&fps), "fps was {fps}");
}
