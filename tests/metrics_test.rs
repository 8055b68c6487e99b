//! Metric derivation, density regeneration and the fps counter

use av_traffic_sim::render::RecordingSurface;
use av_traffic_sim::simulation::{
    average_speed, flow_rate, success_rate, CongestionLevel, FpsCounter, Metrics, Point,
    SimulationEngine, Vehicle,
};

fn test_engine() -> SimulationEngine<RecordingSurface> {
    SimulationEngine::with_seed(RecordingSurface::new(800.0, 400.0), 9).expect("engine")
}

#[test]
fn test_metric_defaults() {
    let metrics = Metrics::default();

    assert_eq!(metrics.fps, 60);
    assert_eq!(metrics.memory_usage, "45MB");
    assert_eq!(metrics.near_misses, 0);
    assert_eq!(metrics.collisions, 0);
    assert_eq!(metrics.safety_score, "A+");
    assert_eq!(metrics.congestion_level, CongestionLevel::Low);
}

#[test]
fn test_congestion_tiers() {
    for density in 1..=4 {
        assert_eq!(CongestionLevel::from_density(density), CongestionLevel::Low);
    }
    for density in 5..=7 {
        assert_eq!(CongestionLevel::from_density(density), CongestionLevel::Medium);
    }
    for density in 8..=10 {
        assert_eq!(CongestionLevel::from_density(density), CongestionLevel::High);
    }
    assert_eq!(CongestionLevel::High.to_string(), "High");
}

#[test]
fn test_flow_rate_floor() {
    assert_eq!(flow_rate(1), 95.0);
    assert_eq!(flow_rate(5), 75.0);
    assert_eq!(flow_rate(10), 50.0);
}

#[test]
fn test_success_rate_floor() {
    assert_eq!(success_rate(0), 100.0);
    assert_eq!(success_rate(1), 95.0);
    assert_eq!(success_rate(4), 95.0);
}

#[test]
fn test_average_speed_of_empty_world_is_zero() {
    assert_eq!(average_speed(&[]), 0);
}

#[test]
fn test_average_speed_uses_velocity_magnitude() {
    let mut fast = Vehicle::regular("fast", Point::default(), 3.0, 0.0);
    fast.vy = 4.0;
    let slow = Vehicle::regular("slow", Point::default(), -1.0, 0.0);

    // Mean of 5 and 1, times ten
    assert_eq!(average_speed(&[fast, slow]), 30);
}

#[test]
fn test_tick_recomputes_metrics() {
    let mut engine = test_engine();
    engine.set_traffic_density(8);

    engine.advance(1.0);

    let state = engine.state();
    let metrics = &state.metrics;
    assert_eq!(metrics.avg_speed, average_speed(&state.vehicles));
    assert_eq!(metrics.flow_rate, 60.0);
    assert_eq!(metrics.congestion_level, CongestionLevel::High);
    assert_eq!(metrics.success_rate, 100.0);
    assert!((1.0..3.0).contains(&metrics.processing_time));
}

#[test]
fn test_decision_telemetry_sampled_in_range() {
    let mut engine = test_engine();

    // First tick lands on the first waypoint; later ones are decisions
    for _ in 0..5 {
        engine.advance(1.0);
    }

    let metrics = &engine.state().metrics;
    assert!((10.0..15.0).contains(&metrics.decisions_per_second));
    assert!((100.0..150.0).contains(&metrics.avg_response_time));
}

#[test]
fn test_collisions_only_change_when_recorded() {
    let mut engine = test_engine();
    for _ in 0..50 {
        engine.advance(1.0);
    }
    assert_eq!(engine.state().metrics.collisions, 0);

    engine.record_collision();
    engine.advance(1.0);

    assert_eq!(engine.state().metrics.collisions, 1);
    assert_eq!(engine.state().metrics.success_rate, 95.0);
}

#[test]
fn test_density_regenerates_regular_traffic() {
    let mut engine = test_engine();
    let ai_ids: Vec<String> = engine
        .state()
        .vehicles
        .iter()
        .filter(|v| v.is_ai())
        .map(|v| v.id.clone())
        .collect();

    engine.set_traffic_density(7);

    let state = engine.state();
    assert_eq!(state.traffic_density, 7);
    assert_eq!(state.regular_vehicle_count(), 3);
    let kept_ai: Vec<String> = state
        .vehicles
        .iter()
        .filter(|v| v.is_ai())
        .map(|v| v.id.clone())
        .collect();
    assert_eq!(kept_ai, ai_ids);

    for (i, vehicle) in state.vehicles.iter().filter(|v| !v.is_ai()).enumerate() {
        assert_eq!(vehicle.id, format!("traffic-{i}"));
        assert!((0.0..800.0).contains(&vehicle.x));
        assert!((160.0..=240.0).contains(&vehicle.y));
        assert!((-1.0..=1.0).contains(&vehicle.vx));
        assert_eq!(vehicle.vy, 0.0);
    }
}

#[test]
fn test_lowest_density_removes_regular_traffic() {
    let mut engine = test_engine();

    engine.set_traffic_density(1);

    assert_eq!(engine.state().regular_vehicle_count(), 0);
    assert_eq!(engine.state().ai_vehicle_count(), 1);
}

#[test]
fn test_fps_counter_reports_after_one_second() {
    let mut counter = FpsCounter::new();

    assert_eq!(counter.record_frame(0.0), None);
    assert_eq!(counter.record_frame(500.0), None);
    assert_eq!(counter.record_frame(1000.0), Some(3));

    // A new window starts at the reporting frame
    assert_eq!(counter.record_frame(1500.0), None);
    assert_eq!(counter.record_frame(2000.0), Some(2));

    counter.reset();
    assert_eq!(counter.record_frame(5000.0), None);
}
