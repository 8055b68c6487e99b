//! Scenario preset layouts

use rand::rngs::StdRng;
use rand::SeedableRng;

use av_traffic_sim::render::RecordingSurface;
use av_traffic_sim::simulation::{
    ObstacleKind, Point, Scenario, ScenarioLayout, SimulationEngine, Size,
};

fn layout(scenario: Scenario) -> ScenarioLayout {
    let mut rng = StdRng::seed_from_u64(11);
    scenario.layout(&Size::new(800.0, 400.0), &mut rng)
}

#[test]
fn test_city_intersection_layout() {
    let layout = layout(Scenario::CityIntersection);

    assert_eq!(layout.vehicles.len(), 2);
    assert_eq!(layout.vehicles.iter().filter(|v| v.is_ai()).count(), 1);
    assert_eq!(layout.obstacles.len(), 4);
    assert!(layout
        .obstacles
        .iter()
        .all(|o| o.kind == ObstacleKind::Building));
    assert_eq!(layout.pedestrians.len(), 2);

    let ai = &layout.vehicles[0];
    assert_eq!(ai.id, "ai-1");
    assert_eq!(ai.path.len(), 4);
    assert_eq!(ai.position(), Point::new(80.0, 200.0));
    assert_eq!(ai.sensor_radius, 80.0);

    let regular = &layout.vehicles[1];
    assert_eq!(regular.id, "reg-1");
    assert_eq!(regular.position(), Point::new(560.0, 200.0));
    assert_eq!(regular.vx, -1.0);
    assert!(regular.path.is_empty());
}

#[test]
fn test_highway_merge_layout() {
    let layout = layout(Scenario::HighwayMerge);

    assert_eq!(layout.vehicles.len(), 4);
    assert!(layout.obstacles.is_empty());
    assert!(layout.pedestrians.is_empty());

    let ai = &layout.vehicles[0];
    assert!(ai.is_ai());
    assert_eq!((ai.vx, ai.vy), (2.0, 0.0));
    assert_eq!(ai.sensor_radius, 100.0);

    let ids: Vec<&str> = layout.vehicles[1..].iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["highway-0", "highway-1", "highway-2"]);
    assert!(layout.vehicles[1..].iter().all(|v| v.vx == 2.0 && !v.is_ai()));
}

#[test]
fn test_school_zone_layout() {
    let layout = layout(Scenario::SchoolZone);

    assert_eq!(layout.vehicles.len(), 1);
    assert_eq!(layout.vehicles[0].path.len(), 2);
    assert_eq!(layout.vehicles[0].sensor_radius, 120.0);
    assert_eq!(layout.obstacles.len(), 1);
    assert_eq!(layout.pedestrians.len(), 6);

    for p in &layout.pedestrians {
        assert!((160.0..=640.0).contains(&p.x), "pedestrian x {}", p.x);
        assert!((240.0..=360.0).contains(&p.y), "pedestrian y {}", p.y);
    }
}

#[test]
fn test_construction_zone_layout() {
    let layout = layout(Scenario::ConstructionZone);

    assert_eq!(layout.vehicles.len(), 1);
    assert_eq!(layout.vehicles[0].path.len(), 6);
    assert_eq!(layout.obstacles.len(), 1);
    assert_eq!(layout.obstacles[0].kind, ObstacleKind::Construction);
    assert!(layout.pedestrians.is_empty());
}

#[test]
fn test_layout_scales_with_surface() {
    let mut rng = StdRng::seed_from_u64(0);
    let small = Scenario::CityIntersection.layout(&Size::new(400.0, 300.0), &mut rng);

    assert_eq!(small.vehicles[0].position(), Point::new(40.0, 150.0));
    assert_eq!(small.obstacles[0].width, 40.0);
    assert_eq!(small.obstacles[0].height, 120.0);
}

#[test]
fn test_scenario_ids_round_trip() {
    for scenario in Scenario::ALL {
        assert_eq!(Scenario::from_id(scenario.id()), Some(scenario));
        assert_eq!(scenario.to_string(), scenario.id());
        assert!(!scenario.name().is_empty());
        assert!(!scenario.description().is_empty());
    }
    assert_eq!(Scenario::from_id("nonexistent"), None);
    assert!("school-zone".parse::<Scenario>().is_ok());
    assert!("school zone".parse::<Scenario>().is_err());
}

#[test]
fn test_school_zone_halves_cruise_speed() {
    assert_eq!(Scenario::SchoolZone.speed_factor(), 0.5);
    assert_eq!(Scenario::HighwayMerge.speed_factor(), 1.0);
}

#[test]
fn test_loading_scenario_replaces_world() {
    let mut engine = SimulationEngine::with_seed(RecordingSurface::new(800.0, 400.0), 5)
        .expect("engine");

    for scenario in Scenario::ALL {
        engine.load_scenario(scenario.id());
        let expected = layout(scenario);
        let state = engine.state();
        assert_eq!(state.scenario, scenario.id());
        assert_eq!(state.vehicles.len(), expected.vehicles.len());
        assert_eq!(state.obstacles.len(), expected.obstacles.len());
        assert_eq!(state.pedestrians.len(), expected.pedestrians.len());
    }
}

#[test]
fn test_loading_scenario_keeps_session_settings() {
    let mut engine = SimulationEngine::with_seed(RecordingSurface::new(800.0, 400.0), 5)
        .expect("engine");
    engine.set_speed(2.0);
    engine.start();

    engine.load_scenario("highway-merge");

    assert_eq!(engine.state().speed, 2.0);
    assert!(engine.state().is_running);
}
