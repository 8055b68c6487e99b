//! Back-to-front painting of the simulation state
//!
//! Rendering never mutates the world. The only nondeterminism is the weather
//! layer, whose particles are drawn fresh from the RNG every frame.

use rand::Rng;

use super::{DrawContext, Point, Size, Stroke};
use crate::simulation::{ObstacleKind, Scenario, SimulationState, Vehicle, Weather};

/// Colors used by the renderer
pub mod palette {
    use crate::simulation::Color;

    pub const BACKGROUND: Color = Color::hex(0xF1F5F9);
    pub const ROAD: Color = Color::hex(0x64748B);
    pub const ROAD_MARKING: Color = Color::hex(0xFFFFFF);
    pub const BUILDING: Color = Color::hex(0x94A3B8);
    pub const CONSTRUCTION: Color = Color::hex(0xF59E0B);
    pub const OTHER_OBSTACLE: Color = Color::hex(0x64748B);
    pub const PEDESTRIAN: Color = Color::hex(0x10B981);
    pub const HEADLIGHT: Color = Color::hex(0xFFFFFF);
    pub const SENSOR_RADIUS: Color = Color::hex(0x8B5CF6);
    pub const DECISION_POINT: Color = Color::hex(0xF59E0B);
    pub const PATH_PREDICTION: Color = Color::hex(0x2563EB);
    pub const RAIN: Color = Color::hex(0x3B82F6);
    pub const FOG: Color = Color::rgba(156, 163, 175, 77);
    pub const SNOW: Color = Color::hex(0xFFFFFF);
}

const PEDESTRIAN_RADIUS: f32 = 6.0;
const DECISION_POINT_RADIUS: f32 = 4.0;
const RAIN_DROPS: usize = 50;
const SNOW_FLAKES: usize = 30;
const SNOW_FLAKE_RADIUS: f32 = 2.0;

/// Paint one frame of `state` onto `ctx`
pub fn render<C>(state: &SimulationState, size: &Size, ctx: &mut C, rng: &mut impl Rng)
where
    C: DrawContext + ?Sized,
{
    ctx.clear(*size, palette::BACKGROUND);

    draw_roads(state, size, ctx);
    draw_obstacles(state, ctx);
    draw_pedestrians(state, ctx);
    draw_vehicles(state, ctx);
    draw_weather(state.weather, size, ctx, rng);
}

fn draw_roads<C: DrawContext + ?Sized>(state: &SimulationState, size: &Size, ctx: &mut C) {
    ctx.fill_rect(
        size.at(0.0, 0.4),
        Size::new(size.width, size.height * 0.2),
        palette::ROAD,
    );

    if state.preset() == Some(Scenario::CityIntersection) {
        ctx.fill_rect(
            size.at(0.4, 0.0),
            Size::new(size.width * 0.2, size.height),
            palette::ROAD,
        );
    }

    ctx.stroke_path(
        &[size.at(0.0, 0.5), size.at(1.0, 0.5)],
        &Stroke::dashed(palette::ROAD_MARKING, 2.0, 10.0, 10.0),
    );
}

fn draw_obstacles<C: DrawContext + ?Sized>(state: &SimulationState, ctx: &mut C) {
    for obstacle in &state.obstacles {
        let color = match obstacle.kind {
            ObstacleKind::Building => palette::BUILDING,
            ObstacleKind::Construction => palette::CONSTRUCTION,
            ObstacleKind::Pedestrian => palette::OTHER_OBSTACLE,
        };
        ctx.fill_rect(
            Point::new(obstacle.x, obstacle.y),
            Size::new(obstacle.width, obstacle.height),
            color,
        );
    }
}

fn draw_pedestrians<C: DrawContext + ?Sized>(state: &SimulationState, ctx: &mut C) {
    for pedestrian in &state.pedestrians {
        ctx.fill_circle(*pedestrian, PEDESTRIAN_RADIUS, palette::PEDESTRIAN);
    }
}

/// Corners of the vehicle body rotated to its heading around its center
pub fn vehicle_outline(vehicle: &Vehicle) -> [Point; 4] {
    let (hw, hh) = (vehicle.width / 2.0, vehicle.height / 2.0);
    local_rect(vehicle, -hw, -hh, vehicle.width, vehicle.height)
}

/// Small mark on the leading edge so the heading is visible
pub fn headlight_outline(vehicle: &Vehicle) -> [Point; 4] {
    local_rect(vehicle, vehicle.width / 2.0 - 5.0, -3.0, 5.0, 6.0)
}

fn local_rect(vehicle: &Vehicle, x: f32, y: f32, width: f32, height: f32) -> [Point; 4] {
    let center = vehicle.center();
    [
        Point::new(x, y),
        Point::new(x + width, y),
        Point::new(x + width, y + height),
        Point::new(x, y + height),
    ]
    .map(|corner| corner.rotated_around(&center, vehicle.angle))
}

fn draw_vehicles<C: DrawContext + ?Sized>(state: &SimulationState, ctx: &mut C) {
    for vehicle in &state.vehicles {
        ctx.fill_polygon(&vehicle_outline(vehicle), vehicle.color);
        ctx.fill_polygon(&headlight_outline(vehicle), palette::HEADLIGHT);

        if vehicle.is_ai() {
            draw_ai_overlays(state, vehicle, ctx);
        }
    }
}

fn draw_ai_overlays<C: DrawContext + ?Sized>(state: &SimulationState, vehicle: &Vehicle, ctx: &mut C) {
    let center = vehicle.center();

    if state.show_sensor_radius {
        ctx.stroke_circle(
            center,
            vehicle.sensor_radius,
            &Stroke::dashed(palette::SENSOR_RADIUS, 2.0, 5.0, 5.0),
        );
    }

    if state.show_decision_points {
        for waypoint in &vehicle.path {
            ctx.fill_circle(*waypoint, DECISION_POINT_RADIUS, palette::DECISION_POINT);
        }
    }

    if state.show_path_prediction && !vehicle.path.is_empty() {
        let mut points = Vec::with_capacity(vehicle.path.len() + 1);
        points.push(center);
        points.extend_from_slice(&vehicle.path);
        ctx.stroke_path(&points, &Stroke::dashed(palette::PATH_PREDICTION, 2.0, 3.0, 3.0));
    }
}

fn draw_weather<C: DrawContext + ?Sized>(
    weather: Weather,
    size: &Size,
    ctx: &mut C,
    rng: &mut impl Rng,
) {
    match weather {
        Weather::Clear => {}
        Weather::Rain => {
            let stroke = Stroke::solid(palette::RAIN, 1.0);
            for _ in 0..RAIN_DROPS {
                let start = random_point(size, rng);
                let end = Point::new(start.x + 2.0, start.y + 10.0);
                ctx.stroke_path(&[start, end], &stroke);
            }
        }
        Weather::Fog => ctx.fill_rect(Point::default(), *size, palette::FOG),
        Weather::Snow => {
            for _ in 0..SNOW_FLAKES {
                let flake = random_point(size, rng);
                ctx.fill_circle(flake, SNOW_FLAKE_RADIUS, palette::SNOW);
            }
        }
    }
}

fn random_point(size: &Size, rng: &mut impl Rng) -> Point {
    size.at(rng.random::<f32>(), rng.random::<f32>())
}
