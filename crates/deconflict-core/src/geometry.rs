//! Geometric toolbox shared by both resolution strategies.

use serde::{Deserialize, Serialize};

use crate::error::DeconflictError;
use crate::models::{Position, Waypoint};

/// An implicitly closed 2D polygon: the last vertex connects back to the
/// first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<[f64; 2]>,
}

impl Polygon {
    /// Build a polygon, rejecting degenerate vertex sets.
    pub fn new(vertices: Vec<[f64; 2]>) -> Result<Self, DeconflictError> {
        if vertices.len() < 3 {
            return Err(DeconflictError::not_found(format!(
                "polygon requires at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[[f64; 2]] {
        &self.vertices
    }

    /// Ray-casting containment test.
    ///
    /// Each edge is tested against a half-open vertical interval
    /// (`(yi > y) != (yj > y)`), so horizontal and zero-length edges never
    /// double-count and the result is independent of traversal direction.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let [xi, yi] = self.vertices[i];
            let [xj, yj] = self.vertices[j];
            if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Axis-aligned bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for &[x, y] in &self.vertices {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        (min_x, min_y, max_x, max_y)
    }
}

/// Axis-aligned search-grid rectangle strictly enclosing an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Discretize a circle into an `n`-vertex polygon, sampling evenly by angle
/// starting at angle 0.
pub fn circle_to_polygon(cx: f64, cy: f64, radius: f64, n: usize) -> Polygon {
    let n = n.max(3);
    let vertices = (0..n)
        .map(|i| {
            let theta = i as f64 * 2.0 * std::f64::consts::PI / n as f64;
            [cx + radius * theta.cos(), cy + radius * theta.sin()]
        })
        .collect();
    Polygon { vertices }
}

/// Last path position before the first one inside the polygon, with its
/// index.
///
/// `None` when the path never enters the polygon, or already starts inside
/// it (there is no position "before" the intrusion to anchor on).
pub fn find_entry_point(polygon: &Polygon, path: &[Waypoint]) -> Option<(usize, Waypoint)> {
    for (i, wp) in path.iter().enumerate() {
        if polygon.contains(wp.x, wp.y) {
            return i.checked_sub(1).map(|prev| (prev, path[prev]));
        }
    }
    None
}

/// First position back outside the polygon after the path has been inside
/// it, with its index.
///
/// When the path never re-exits (obstacle only partially traversed), the
/// final path position is the exit. `None` only for an empty path.
pub fn find_exit_point(polygon: &Polygon, path: &[Waypoint]) -> Option<(usize, Waypoint)> {
    let mut entered = false;
    for (i, wp) in path.iter().enumerate() {
        let inside = polygon.contains(wp.x, wp.y);
        if inside {
            entered = true;
        } else if entered {
            return Some((i, *wp));
        }
    }
    path.last().map(|wp| (path.len() - 1, *wp))
}

/// Derive the search grid for the path-search collaborator.
///
/// Starts from the bounding box of the start/goal pair and grows it outward,
/// each side independently in `step` increments, until it strictly encloses
/// both the polygon's bounding box and the start/goal box on all four sides.
pub fn grid_bounds(polygon: &Polygon, start: Position, goal: Position, step: f64) -> GridBounds {
    let step = step.max(1e-3);
    let (obs_min_x, obs_min_y, obs_max_x, obs_max_y) = polygon.bounding_box();

    // Seed corners: each side still has to clear its own seed, so every
    // side expands at least once.
    let seed_min_x = start.x.min(goal.x);
    let seed_min_y = start.y.min(goal.y);
    let seed_max_x = start.x.max(goal.x);
    let seed_max_y = start.y.max(goal.y);

    let mut min_x = seed_min_x;
    let mut min_y = seed_min_y;
    let mut max_x = seed_max_x;
    let mut max_y = seed_max_y;

    loop {
        let grow_min_x = min_x >= obs_min_x || min_x >= seed_min_x;
        let grow_min_y = min_y >= obs_min_y || min_y >= seed_min_y;
        let grow_max_x = max_x <= obs_max_x || max_x <= seed_max_x;
        let grow_max_y = max_y <= obs_max_y || max_y <= seed_max_y;
        if !(grow_min_x || grow_min_y || grow_max_x || grow_max_y) {
            break;
        }
        if grow_min_x {
            min_x -= step;
        }
        if grow_min_y {
            min_y -= step;
        }
        if grow_max_x {
            max_x += step;
        }
        if grow_max_y {
            max_y += step;
        }
    }

    GridBounds {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}

/// Perpendicular foot of a point on the infinite line through a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Foot of the perpendicular, always computed.
    pub foot: [f64; 2],
    /// Point-to-segment distance; `None` when the foot falls outside the
    /// segment's bounding interval, so callers fall back to vertex distances.
    pub distance: Option<f64>,
}

/// Project `point` onto the line through `a` and `b`.
///
/// The distance is only reported when the foot lies within the segment's
/// bounding interval on both axes (inclusive); "not applicable" is `None`,
/// never a pseudo-distance.
pub fn project_to_segment(point: [f64; 2], a: [f64; 2], b: [f64; 2]) -> SegmentProjection {
    let [x0, y0] = point;
    let [x1, y1] = a;
    let [x2, y2] = b;

    // Line through a and b as la*x + lb*y + lc = 0.
    let la = y2 - y1;
    let lb = x1 - x2;
    let lc = -(la * x1 + lb * y1);
    let denom = la * la + lb * lb;

    if denom <= f64::EPSILON {
        // Zero-length segment: the foot is the endpoint itself.
        let distance = ((x0 - x1).powi(2) + (y0 - y1).powi(2)).sqrt();
        return SegmentProjection {
            foot: a,
            distance: Some(distance),
        };
    }

    let foot = [
        (lb * (lb * x0 - la * y0) - la * lc) / denom,
        (la * (la * y0 - lb * x0) - lb * lc) / denom,
    ];

    let within_x = foot[0] >= x1.min(x2) && foot[0] <= x1.max(x2);
    let within_y = foot[1] >= y1.min(y2) && foot[1] <= y1.max(y2);
    let distance = (within_x && within_y).then(|| {
        ((y2 - y1) * x0 - (x2 - x1) * y0 + x2 * y1 - y2 * x1).abs() / denom.sqrt()
    });

    SegmentProjection { foot, distance }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]).unwrap()
    }

    fn wp(x: f64, y: f64, stamp_s: f64) -> Waypoint {
        Waypoint::new(x, y, 5.0, stamp_s)
    }

    #[test]
    fn polygon_rejects_fewer_than_three_vertices() {
        assert!(Polygon::new(vec![[0.0, 0.0], [1.0, 1.0]]).is_err());
    }

    #[test]
    fn containment_false_outside_bounding_box() {
        let polygon = square();
        assert!(!polygon.contains(-5.0, 5.0));
        assert!(!polygon.contains(5.0, 20.0));
        assert!(!polygon.contains(11.0, -1.0));
    }

    #[test]
    fn containment_true_at_centroid() {
        assert!(square().contains(5.0, 5.0));
    }

    #[test]
    fn containment_independent_of_traversal_direction() {
        let forward = square();
        let mut reversed_vertices = forward.vertices().to_vec();
        reversed_vertices.reverse();
        let reversed = Polygon::new(reversed_vertices).unwrap();

        for &(x, y) in &[(5.0, 5.0), (0.5, 0.5), (9.9, 5.0), (-1.0, 5.0), (5.0, 10.5)] {
            assert_eq!(forward.contains(x, y), reversed.contains(x, y));
        }
    }

    #[test]
    fn entry_point_is_last_position_before_intrusion() {
        let polygon = square();
        let path = vec![
            wp(-10.0, 5.0, 0.0),
            wp(-2.0, 5.0, 10.0),
            wp(5.0, 5.0, 20.0),
            wp(15.0, 5.0, 30.0),
        ];
        let (idx, entry) = find_entry_point(&polygon, &path).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(entry, path[1]);
    }

    #[test]
    fn entry_point_not_found_when_path_misses_polygon() {
        let polygon = square();
        let path = vec![wp(-10.0, 20.0, 0.0), wp(20.0, 20.0, 10.0)];
        assert!(find_entry_point(&polygon, &path).is_none());
    }

    #[test]
    fn entry_point_not_found_when_path_starts_inside() {
        let polygon = square();
        let path = vec![wp(5.0, 5.0, 0.0), wp(20.0, 5.0, 10.0)];
        assert!(find_entry_point(&polygon, &path).is_none());
    }

    #[test]
    fn exit_point_is_first_position_back_outside() {
        let polygon = square();
        let path = vec![
            wp(-10.0, 5.0, 0.0),
            wp(5.0, 5.0, 10.0),
            wp(8.0, 5.0, 20.0),
            wp(15.0, 5.0, 30.0),
            wp(25.0, 5.0, 40.0),
        ];
        let (idx, exit) = find_exit_point(&polygon, &path).unwrap();
        assert_eq!(idx, 3);
        assert_eq!(exit, path[3]);
    }

    #[test]
    fn exit_point_falls_back_to_final_position() {
        let polygon = square();
        // Path ends inside the polygon and never re-exits.
        let path = vec![wp(-10.0, 5.0, 0.0), wp(5.0, 5.0, 10.0)];
        let (idx, exit) = find_exit_point(&polygon, &path).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(exit, path[1]);
    }

    #[test]
    fn exit_fallback_keeps_origin_valued_positions() {
        // A final waypoint at exactly (0, 0) is a real position, not a
        // "not found" marker.
        let polygon = square();
        let path = vec![wp(5.0, 5.0, 0.0), wp(0.0, 0.0, 10.0)];
        let (idx, exit) = find_exit_point(&polygon, &path).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(exit, path[1]);
    }

    #[test]
    fn grid_bounds_strictly_enclose_polygon_and_endpoints() {
        let polygon = square();
        let start = Position::new(-2.0, 5.0, 5.0);
        let goal = Position::new(15.0, 5.0, 5.0);
        let bounds = grid_bounds(&polygon, start, goal, 1.0);

        let (obs_min_x, obs_min_y, obs_max_x, obs_max_y) = polygon.bounding_box();
        assert!(bounds.min_x < obs_min_x);
        assert!(bounds.min_y < obs_min_y);
        assert!(bounds.max_x > obs_max_x);
        assert!(bounds.max_y > obs_max_y);

        assert!(bounds.min_x < start.x.min(goal.x));
        assert!(bounds.min_y < start.y.min(goal.y));
        assert!(bounds.max_x > start.x.max(goal.x));
        assert!(bounds.max_y > start.y.max(goal.y));
    }

    #[test]
    fn circle_discretization_places_vertices_on_circle() {
        let polygon = circle_to_polygon(3.0, -2.0, 5.0, 8);
        let vertices = polygon.vertices();
        assert_eq!(vertices.len(), 8);

        let mut angles = Vec::new();
        for &[x, y] in vertices {
            let r = ((x - 3.0).powi(2) + (y + 2.0).powi(2)).sqrt();
            assert!((r - 5.0).abs() < 1e-9);
            angles.push((y + 2.0).atan2(x - 3.0));
        }

        // First vertex at angle 0, consecutive vertices 2*pi/8 apart.
        assert!(angles[0].abs() < 1e-9);
        let step = 2.0 * std::f64::consts::PI / 8.0;
        for i in 1..angles.len() {
            let delta = (angles[i] - angles[i - 1]).rem_euclid(2.0 * std::f64::consts::PI);
            assert!((delta - step).abs() < 1e-9);
        }
    }

    #[test]
    fn projection_above_midpoint_hits_midpoint() {
        let result = project_to_segment([5.0, 3.0], [0.0, 0.0], [10.0, 0.0]);
        assert!((result.foot[0] - 5.0).abs() < 1e-9);
        assert!(result.foot[1].abs() < 1e-9);
        assert!((result.distance.unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn projection_outside_segment_reports_no_distance() {
        let result = project_to_segment([15.0, 3.0], [0.0, 0.0], [10.0, 0.0]);
        assert!((result.foot[0] - 15.0).abs() < 1e-9);
        assert!(result.foot[1].abs() < 1e-9);
        assert!(result.distance.is_none());
    }
}
