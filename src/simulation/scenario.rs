//! Scenario presets
//!
//! Every preset is laid out in fractions of the surface size so the same
//! scene adapts to any window.

use anyhow::{anyhow, Error};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

use super::types::{Obstacle, ObstacleKind, Point, Size};
use super::vehicle::Vehicle;

/// The named preset configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    CityIntersection,
    HighwayMerge,
    SchoolZone,
    ConstructionZone,
}

/// Entities produced by loading a preset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioLayout {
    pub vehicles: Vec<Vehicle>,
    pub obstacles: Vec<Obstacle>,
    pub pedestrians: Vec<Point>,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::CityIntersection,
        Scenario::HighwayMerge,
        Scenario::SchoolZone,
        Scenario::ConstructionZone,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Scenario::CityIntersection => "city-intersection",
            Scenario::HighwayMerge => "highway-merge",
            Scenario::SchoolZone => "school-zone",
            Scenario::ConstructionZone => "construction-zone",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scenario::CityIntersection => "City Intersection",
            Scenario::HighwayMerge => "Highway Merge",
            Scenario::SchoolZone => "School Zone",
            Scenario::ConstructionZone => "Construction Zone",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Scenario::CityIntersection => "Complex 4-way intersection with traffic lights",
            Scenario::HighwayMerge => "High-speed merging and lane changes",
            Scenario::SchoolZone => "Pedestrians and reduced speed limits",
            Scenario::ConstructionZone => "Dynamic obstacles and lane closures",
        }
    }

    pub fn from_id(id: &str) -> Option<Scenario> {
        Scenario::ALL.into_iter().find(|scenario| scenario.id() == id)
    }

    /// Cruise speed multiplier imposed by the preset
    pub fn speed_factor(self) -> f32 {
        match self {
            Scenario::SchoolZone => 0.5,
            _ => 1.0,
        }
    }

    /// Build the preset's vehicles, obstacles and pedestrians for a surface
    pub fn layout(self, size: &Size, rng: &mut impl Rng) -> ScenarioLayout {
        match self {
            Scenario::CityIntersection => city_intersection(size),
            Scenario::HighwayMerge => highway_merge(size),
            Scenario::SchoolZone => school_zone(size, rng),
            Scenario::ConstructionZone => construction_zone(size),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::from_id(s.trim()).ok_or_else(|| {
            let known: Vec<&str> = Scenario::ALL.iter().map(|s| s.id()).collect();
            anyhow!("unknown scenario '{s}' (expected one of {})", known.join(", "))
        })
    }
}

fn city_intersection(size: &Size) -> ScenarioLayout {
    let path = vec![
        size.at(0.1, 0.5),
        size.at(0.45, 0.5),
        size.at(0.45, 0.2),
        size.at(0.9, 0.2),
    ];
    let vehicles = vec![
        Vehicle::ai("ai-1", path, Point::default(), 80.0),
        Vehicle::regular("reg-1", size.at(0.7, 0.5), -1.0, std::f32::consts::PI),
    ];

    // Four blocks leave a cross-shaped gap for the two roads
    let block_width = size.width * 0.1;
    let block_height = size.height * 0.4;
    let obstacles = [(0.4, 0.0), (0.5, 0.0), (0.4, 0.6), (0.5, 0.6)]
        .into_iter()
        .map(|(fx, fy)| {
            let corner = size.at(fx, fy);
            Obstacle::new(corner.x, corner.y, block_width, block_height, ObstacleKind::Building)
        })
        .collect();

    ScenarioLayout {
        vehicles,
        obstacles,
        pedestrians: vec![size.at(0.42, 0.52), size.at(0.58, 0.48)],
    }
}

fn highway_merge(size: &Size) -> ScenarioLayout {
    let path = vec![
        size.at(0.1, 0.7),
        size.at(0.4, 0.7),
        size.at(0.6, 0.5),
        size.at(0.9, 0.5),
    ];
    let mut vehicles = vec![Vehicle::ai("ai-1", path, Point::new(2.0, 0.0), 100.0)];

    // Evenly spaced lane traffic at uniform speed
    vehicles.extend((0..3).map(|i| {
        Vehicle::regular(
            format!("highway-{i}"),
            size.at(0.3 + i as f32 * 0.2, 0.5),
            2.0,
            0.0,
        )
    }));

    ScenarioLayout {
        vehicles,
        ..Default::default()
    }
}

fn school_zone(size: &Size, rng: &mut impl Rng) -> ScenarioLayout {
    let path = vec![size.at(0.1, 0.5), size.at(0.9, 0.5)];
    let school = size.at(0.3, 0.1);

    // Children wander the pavement below the road
    let pedestrians = (0..6)
        .map(|_| {
            size.at(
                0.2 + rng.random::<f32>() * 0.6,
                0.6 + rng.random::<f32>() * 0.3,
            )
        })
        .collect();

    ScenarioLayout {
        vehicles: vec![Vehicle::ai("ai-1", path, Point::new(0.5, 0.0), 120.0)],
        obstacles: vec![Obstacle::new(
            school.x,
            school.y,
            size.width * 0.4,
            size.height * 0.3,
            ObstacleKind::Building,
        )],
        pedestrians,
    }
}

fn construction_zone(size: &Size) -> ScenarioLayout {
    let path = vec![
        size.at(0.1, 0.5),
        size.at(0.3, 0.5),
        size.at(0.4, 0.3),
        size.at(0.6, 0.3),
        size.at(0.7, 0.5),
        size.at(0.9, 0.5),
    ];
    let site = size.at(0.35, 0.4);

    ScenarioLayout {
        vehicles: vec![Vehicle::ai("ai-1", path, Point::new(1.0, 0.0), 90.0)],
        obstacles: vec![Obstacle::new(
            site.x,
            site.y,
            size.width * 0.3,
            size.height * 0.2,
            ObstacleKind::Construction,
        )],
        pedestrians: Vec::new(),
    }
}
