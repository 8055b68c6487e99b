//! Vehicle movement logic for the traffic simulation
//!
//! Two update rules share one entity shape: AI vehicles track waypoints and
//! react to hazards, regular vehicles drift and wrap around horizontally.

use super::sensing::{avoidance_heading, detect_hazards};
use super::types::{
    Color, Obstacle, Point, Size, AVOIDANCE_SPEED_FACTOR, VEHICLE_HEIGHT, VEHICLE_WIDTH,
    WAYPOINT_ARRIVAL_DISTANCE,
};

pub const AI_VEHICLE_COLOR: Color = Color::hex(0x2563EB);
pub const REGULAR_VEHICLE_COLOR: Color = Color::hex(0x64748B);

/// Sensor radius given to regular vehicles (they never use it)
pub const REGULAR_SENSOR_RADIUS: f32 = 50.0;

/// Selects which update rule applies to a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleKind {
    /// Follows a waypoint path with reactive hazard avoidance
    Ai,
    /// Constant velocity with horizontal wrap-around
    Regular,
}

/// What happened to a vehicle during one update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VehicleUpdate {
    /// AI vehicle without a path; nothing changed
    Idle,
    /// Waypoint reached; target advanced and no movement this tick
    WaypointReached { next_index: usize },
    /// No hazard in range; heading set straight at the target
    Steered,
    /// Hazards in range; heading set away from their centroid
    Avoided { hazards: usize },
    /// Regular vehicle moved, possibly wrapping to the other edge
    Drifted { wrapped: bool },
}

impl VehicleUpdate {
    /// True when an AI vehicle made a movement decision this tick
    pub fn is_decision(&self) -> bool {
        matches!(self, VehicleUpdate::Steered | VehicleUpdate::Avoided { .. })
    }
}

/// A vehicle in the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    /// Top-left corner of the unrotated bounding rectangle
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Velocity in units per tick
    pub vx: f32,
    pub vy: f32,
    /// Heading in radians; only used for drawing
    pub angle: f32,
    pub kind: VehicleKind,
    /// Read-only waypoints; empty for regular vehicles
    pub path: Vec<Point>,
    pub target_index: usize,
    pub sensor_radius: f32,
    pub color: Color,
}

impl Vehicle {
    /// AI vehicle parked on the first waypoint of its path
    pub fn ai(id: impl Into<String>, path: Vec<Point>, velocity: Point, sensor_radius: f32) -> Self {
        let start = path.first().copied().unwrap_or_default();
        Self {
            id: id.into(),
            x: start.x,
            y: start.y,
            width: VEHICLE_WIDTH,
            height: VEHICLE_HEIGHT,
            vx: velocity.x,
            vy: velocity.y,
            angle: 0.0,
            kind: VehicleKind::Ai,
            path,
            target_index: 0,
            sensor_radius,
            color: AI_VEHICLE_COLOR,
        }
    }

    pub fn regular(id: impl Into<String>, position: Point, vx: f32, angle: f32) -> Self {
        Self {
            id: id.into(),
            x: position.x,
            y: position.y,
            width: VEHICLE_WIDTH,
            height: VEHICLE_HEIGHT,
            vx,
            vy: 0.0,
            angle,
            kind: VehicleKind::Regular,
            path: Vec::new(),
            target_index: 0,
            sensor_radius: REGULAR_SENSOR_RADIUS,
            color: REGULAR_VEHICLE_COLOR,
        }
    }

    pub fn is_ai(&self) -> bool {
        self.kind == VehicleKind::Ai
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    /// Current waypoint, if the vehicle has a path
    pub fn target(&self) -> Option<Point> {
        self.path.get(self.target_index).copied()
    }

    fn integrate(&mut self, delta_ticks: f32) {
        self.x += self.vx * delta_ticks;
        self.y += self.vy * delta_ticks;
    }

    /// Move with the current velocity, teleporting across the horizontal
    /// bounds once fully off one edge. Y is never bounded.
    fn drift(&mut self, bounds: &Size, delta_ticks: f32) -> VehicleUpdate {
        self.integrate(delta_ticks);

        let mut wrapped = false;
        if self.x < -self.width {
            self.x = bounds.width;
            wrapped = true;
        }
        if self.x > bounds.width {
            self.x = -self.width;
            wrapped = true;
        }
        VehicleUpdate::Drifted { wrapped }
    }

    fn steer_towards(&mut self, target: &Point, cruise_speed: f32) {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > 0.0 {
            self.vx = dx / distance * cruise_speed;
            self.vy = dy / distance * cruise_speed;
            self.angle = self.position().angle_to(target);
        }
    }

    /// Steer away from hazards at reduced speed. A zero-length avoidance
    /// vector leaves velocity and heading untouched.
    fn avoid(&mut self, heading: Option<Point>, cruise_speed: f32) {
        if let Some(heading) = heading {
            let speed = cruise_speed * AVOIDANCE_SPEED_FACTOR;
            self.vx = heading.x * speed;
            self.vy = heading.y * speed;
            self.angle = heading.y.atan2(heading.x);
        }
    }
}

/// Per-tick inputs shared by every vehicle update
#[derive(Debug, Clone, Copy)]
pub struct MotionContext {
    /// Weather- and scenario-adjusted speed for direct steering
    pub cruise_speed: f32,
    /// Logical surface size used for horizontal wrap-around
    pub bounds: Size,
    /// Elapsed ticks, already scaled by the speed multiplier
    pub delta_ticks: f32,
}

/// Advance every vehicle once, in storage order. Vehicles updated earlier in
/// the pass are sensed at their new positions by later ones.
///
/// Returns one `VehicleUpdate` per vehicle, in the same order.
pub fn advance_vehicles(
    vehicles: &mut [Vehicle],
    obstacles: &[Obstacle],
    pedestrians: &[Point],
    ctx: &MotionContext,
) -> Vec<VehicleUpdate> {
    let mut updates = Vec::with_capacity(vehicles.len());

    for index in 0..vehicles.len() {
        let update = match vehicles[index].kind {
            VehicleKind::Regular => vehicles[index].drift(&ctx.bounds, ctx.delta_ticks),
            VehicleKind::Ai => update_ai_vehicle(index, vehicles, obstacles, pedestrians, ctx),
        };
        updates.push(update);
    }

    updates
}

fn update_ai_vehicle(
    index: usize,
    vehicles: &mut [Vehicle],
    obstacles: &[Obstacle],
    pedestrians: &[Point],
    ctx: &MotionContext,
) -> VehicleUpdate {
    let Some(target) = vehicles[index].target() else {
        return VehicleUpdate::Idle;
    };

    // Arrival is a discrete event: advance the target and skip movement
    if vehicles[index].position().distance(&target) < WAYPOINT_ARRIVAL_DISTANCE {
        let vehicle = &mut vehicles[index];
        vehicle.target_index = (vehicle.target_index + 1) % vehicle.path.len();
        return VehicleUpdate::WaypointReached {
            next_index: vehicle.target_index,
        };
    }

    let hazards = detect_hazards(index, vehicles, obstacles, pedestrians);
    let heading = if hazards.is_empty() {
        None
    } else {
        Some(avoidance_heading(&vehicles[index].position(), &hazards))
    };

    let vehicle = &mut vehicles[index];
    let update = match heading {
        Some(heading) => {
            vehicle.avoid(heading, ctx.cruise_speed);
            VehicleUpdate::Avoided {
                hazards: hazards.len(),
            }
        }
        None => {
            vehicle.steer_towards(&target, ctx.cruise_speed);
            VehicleUpdate::Steered
        }
    };

    vehicle.integrate(ctx.delta_ticks);
    update
}
