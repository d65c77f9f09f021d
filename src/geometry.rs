use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Extent of the drawing surface in surface pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Toroidal wrap: past the far side lands on 0, below 0 lands on the far
    /// side. Points exactly on an edge stay put.
    pub fn wrap(&self, p: Point) -> Point {
        Point {
            x: wrap_axis(p.x, self.width),
            y: wrap_axis(p.y, self.height),
        }
    }
}

fn wrap_axis(v: f32, extent: f32) -> f32 {
    if v > extent {
        0.0
    } else if v < 0.0 {
        extent
    } else {
        v
    }
}

/// Viewport edge a star enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Travel direction, in degrees, paired with each edge.
    pub fn travel_angle(self) -> f32 {
        match self {
            Edge::Top => 45.0,
            Edge::Right => 135.0,
            Edge::Bottom => 225.0,
            Edge::Left => 315.0,
        }
    }

    /// Point on this edge at `offset` along it.
    pub fn point_at(self, offset: f32, bounds: Bounds) -> Point {
        match self {
            Edge::Top => Point::new(offset, 0.0),
            Edge::Right => Point::new(bounds.width, offset),
            Edge::Bottom => Point::new(offset, bounds.height),
            Edge::Left => Point::new(0.0, offset),
        }
    }

    /// Length of this edge.
    pub fn span(self, bounds: Bounds) -> f32 {
        match self {
            Edge::Top | Edge::Bottom => bounds.width,
            Edge::Right | Edge::Left => bounds.height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint {
    pub edge: Edge,
    pub position: Point,
    /// Heading implied by the edge. Whether the star uses it is decided by
    /// the configured heading mode.
    pub edge_angle: f32,
}

/// Uniform edge, then a uniform offset along it. Consumes two draws.
pub fn random_start_point(rng: &mut impl RandomSource, bounds: Bounds) -> SpawnPoint {
    let edge = Edge::ALL[rng.index(Edge::ALL.len())];
    let offset = rng.unit() as f32 * edge.span(bounds);
    SpawnPoint {
        edge,
        position: edge.point_at(offset, bounds),
        edge_angle: edge.travel_angle(),
    }
}

/// Uniform heading over the full circle, in degrees.
pub fn random_angle_degrees(rng: &mut impl RandomSource) -> f32 {
    (rng.unit() as f32 * TAU).to_degrees()
}

/// Heading truncated to a whole number of radians before conversion, giving
/// one of seven directions.
pub fn whole_radian_angle_degrees(rng: &mut impl RandomSource) -> f32 {
    (rng.unit() as f32 * TAU).floor().to_degrees()
}

/// One tick of travel: `speed` pixels along `angle_degrees`.
pub fn step(angle_degrees: f32, speed: f32) -> Point {
    let rad = angle_degrees.to_radians();
    Point::new(rad.cos() * speed, rad.sin() * speed)
}
