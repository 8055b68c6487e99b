//! Radius-based hazard detection and the reactive avoidance heading

use super::types::{Obstacle, Point};
use super::vehicle::Vehicle;

/// An entity found inside a vehicle's sensor radius
#[derive(Debug, Clone, PartialEq)]
pub enum Hazard {
    /// Another vehicle, by its index in the vehicle list
    Vehicle { index: usize, center: Point },
    /// A static obstacle, by its index in the obstacle list
    Obstacle { index: usize, center: Point },
    Pedestrian(Point),
}

impl Hazard {
    /// Position used when averaging hazards: the center of rectangular
    /// entities, the raw coordinate of point-like ones
    pub fn position(&self) -> Point {
        match self {
            Hazard::Vehicle { center, .. } | Hazard::Obstacle { center, .. } => *center,
            Hazard::Pedestrian(point) => *point,
        }
    }
}

/// Scan for hazards strictly inside the sensor radius of `vehicles[index]`.
///
/// Other vehicles are measured from their top-left corner, obstacles from
/// their center and pedestrians from their position. The result lists
/// vehicles, then obstacles, then pedestrians, each in storage order.
pub fn detect_hazards(
    index: usize,
    vehicles: &[Vehicle],
    obstacles: &[Obstacle],
    pedestrians: &[Point],
) -> Vec<Hazard> {
    let Some(vehicle) = vehicles.get(index) else {
        return Vec::new();
    };
    let origin = vehicle.position();
    let radius = vehicle.sensor_radius;
    let mut hazards = Vec::new();

    for (other_index, other) in vehicles.iter().enumerate() {
        if other_index != index && origin.distance(&other.position()) < radius {
            hazards.push(Hazard::Vehicle {
                index: other_index,
                center: other.center(),
            });
        }
    }

    for (obstacle_index, obstacle) in obstacles.iter().enumerate() {
        let center = obstacle.center();
        if origin.distance(&center) < radius {
            hazards.push(Hazard::Obstacle {
                index: obstacle_index,
                center,
            });
        }
    }

    hazards.extend(
        pedestrians
            .iter()
            .filter(|pedestrian| origin.distance(pedestrian) < radius)
            .map(|pedestrian| Hazard::Pedestrian(*pedestrian)),
    );

    hazards
}

/// Mean position of the hazards, or `None` for an empty set
pub fn centroid(hazards: &[Hazard]) -> Option<Point> {
    if hazards.is_empty() {
        return None;
    }
    let (sum_x, sum_y) = hazards.iter().fold((0.0, 0.0), |(sx, sy), hazard| {
        let p = hazard.position();
        (sx + p.x, sy + p.y)
    });
    let count = hazards.len() as f32;
    Some(Point::new(sum_x / count, sum_y / count))
}

/// Unit vector pointing from the hazard centroid back towards `position`.
///
/// Returns `None` when there are no hazards or the centroid coincides with
/// the position.
pub fn avoidance_heading(position: &Point, hazards: &[Hazard]) -> Option<Point> {
    let center = centroid(hazards)?;
    let away_x = position.x - center.x;
    let away_y = position.y - center.y;
    let length = (away_x * away_x + away_y * away_y).sqrt();
    if length > 0.0 {
        Some(Point::new(away_x / length, away_y / length))
    } else {
        None
    }
}
