//! Point-in-polygon tests over integer pixel coordinates.
//!
//! All arithmetic is widened to `i128`, so any `i32` coordinate pair is safe
//! from overflow. Degenerate polygons (fewer than three points, collinear or
//! repeated vertices, self-intersections) never panic; they produce whatever
//! answer the edge walk below yields, which is stable for identical input.

use serde::{Deserialize, Serialize};

/// A pixel coordinate, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [i32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A closed polygon; the last point connects back to the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub points: Vec<Point>,
}

impl Zone {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Edges as `(start, end)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// Where a point sits relative to a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Inside,
    Boundary,
    Outside,
}

/// Whether points lying exactly on a zone edge count as inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundaryRule {
    #[default]
    Inclusive,
    Exclusive,
}

impl BoundaryRule {
    pub fn admits(self, location: Location) -> bool {
        match (self, location) {
            (_, Location::Inside) => true,
            (BoundaryRule::Inclusive, Location::Boundary) => true,
            _ => false,
        }
    }
}

pub fn locate(point: Point, zone: &Zone) -> Location {
    if zone.points.is_empty() {
        return Location::Outside;
    }

    let (px, py) = (i128::from(point.x), i128::from(point.y));
    let mut inside = false;

    for (a, b) in zone.edges() {
        let (ax, ay) = (i128::from(a.x), i128::from(a.y));
        let (bx, by) = (i128::from(b.x), i128::from(b.y));

        if on_segment(px, py, ax, ay, bx, by) {
            return Location::Boundary;
        }

        // Half-open rule on y keeps vertices from being counted twice.
        if (ay > py) != (by > py) {
            // p.x < ax + (py - ay) * (bx - ax) / (by - ay), without division.
            let dy = by - ay;
            let lhs = (px - ax) * dy;
            let rhs = (py - ay) * (bx - ax);
            let left_of_crossing = if dy > 0 { lhs < rhs } else { lhs > rhs };
            if left_of_crossing {
                inside = !inside;
            }
        }
    }

    if inside {
        Location::Inside
    } else {
        Location::Outside
    }
}

fn on_segment(px: i128, py: i128, ax: i128, ay: i128, bx: i128, by: i128) -> bool {
    let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
    cross == 0
        && px >= ax.min(bx)
        && px <= ax.max(bx)
        && py >= ay.min(by)
        && py <= ay.max(by)
}

/// Boundary-inclusive membership.
pub fn contains(point: Point, zone: &Zone) -> bool {
    BoundaryRule::Inclusive.admits(locate(point, zone))
}

/// True as soon as any zone contains the point; false for an empty set.
pub fn any_zone_contains(point: Point, zones: &[Zone]) -> bool {
    zones.iter().any(|zone| contains(point, zone))
}

/// The configured work zones together with their boundary convention.
#[derive(Debug, Clone, Default)]
pub struct ZoneSet {
    zones: Vec<Zone>,
    boundary: BoundaryRule,
}

impl ZoneSet {
    pub fn new(zones: Vec<Zone>, boundary: BoundaryRule) -> Self {
        Self { zones, boundary }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.zones
            .iter()
            .any(|zone| self.boundary.admits(locate(point, zone)))
    }
}
