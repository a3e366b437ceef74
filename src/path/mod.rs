//! Spatial query and path-sampling utilities
//!
//! Pure transformations of an ordered 3D waypoint array:
//!
//! - `resample_between_points` - densify a polyline so no gap exceeds a
//!   requested spacing
//! - `points_along_path` - nearest-point-by-arc-length lookup
//! - `build_tube` - triangulated tube geometry around a path for 3D
//!   rendering collaborators
//!
//! None of this touches file I/O or any plotting backend; the tube is plain
//! vertex/triangle data that a renderer can consume directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from path-sampling and geometry building.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("spacing must be a positive finite number, got {0}")]
    InvalidSpacing(f64),

    #[error("path needs at least {needed} points, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("tube needs at least 3 sides, got {0}")]
    TooFewSides(usize),

    #[error("tube radius must be a positive finite number, got {0}")]
    InvalidRadius(f64),

    #[error("scalar array length {scalars} does not match path length {points}")]
    ScalarLengthMismatch { scalars: usize, points: usize },
}

/// A point in 3D space (easting, northing, elevation).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Linear interpolation between two points, `t` in [0, 1].
    pub fn lerp(&self, other: &Point3, t: f64) -> Self {
        Self {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
            z: self.z + t * (other.z - self.z),
        }
    }
}

// ============================================================================
// Polyline densification
// ============================================================================

/// Densify a waypoint sequence so that consecutive points are never farther
/// apart than `spacing`.
///
/// Each segment is subdivided by linear interpolation; every original
/// waypoint appears in the output and shared segment boundaries are not
/// duplicated. Coincident consecutive waypoints collapse to one point.
pub fn resample_between_points(
    points: &[Point3],
    spacing: f64,
) -> Result<Vec<Point3>, PathError> {
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(PathError::InvalidSpacing(spacing));
    }
    if points.is_empty() {
        return Err(PathError::TooFewPoints { needed: 1, got: 0 });
    }

    let mut resampled = Vec::with_capacity(points.len());
    resampled.push(points[0]);

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let dist = a.distance(&b);
        if dist == 0.0 {
            continue;
        }

        // ceil keeps every sub-segment at or below the requested spacing
        let segments = (dist / spacing).ceil().max(1.0) as usize;
        for i in 1..=segments {
            resampled.push(a.lerp(&b, i as f64 / segments as f64));
        }
    }

    Ok(resampled)
}

/// Cumulative arc lengths along a waypoint sequence. The first entry is 0.
pub fn arc_lengths(points: &[Point3]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(points.len());
    let mut total = 0.0;
    lengths.push(0.0);
    for pair in points.windows(2) {
        total += pair[0].distance(&pair[1]);
        lengths.push(total);
    }
    lengths
}

/// For each requested distance, the path point whose cumulative arc length
/// is nearest. Ties break to the earlier (shallower) point.
pub fn points_along_path(
    points: &[Point3],
    distances: &[f64],
) -> Result<Vec<Point3>, PathError> {
    if points.is_empty() {
        return Err(PathError::TooFewPoints { needed: 1, got: 0 });
    }

    let lengths = arc_lengths(points);
    let selected = distances
        .iter()
        .map(|&target| {
            let mut best = 0usize;
            let mut best_gap = (lengths[0] - target).abs();
            for (idx, &length) in lengths.iter().enumerate().skip(1) {
                let gap = (length - target).abs();
                // Strict comparison keeps the shallower point on ties.
                if gap < best_gap {
                    best = idx;
                    best_gap = gap;
                }
            }
            points[best]
        })
        .collect();

    Ok(selected)
}

// ============================================================================
// Tube Geometry
// ============================================================================

/// Triangulated tube around a well path, ready for a 3D renderer.
///
/// `scalars` carries one value per vertex (by default the vertex elevation)
/// for color mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TubeGeometry {
    pub vertices: Vec<Point3>,
    pub triangles: Vec<[u32; 3]>,
    pub scalars: Vec<f64>,
}

impl TubeGeometry {
    /// JSON rendition for rendering collaborators that consume geometry
    /// over a serialization boundary.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Build a tube of the given `radius` around `path` with `sides` vertices
/// per ring.
///
/// `scalars`, when provided, must carry one value per path point and is
/// replicated onto each ring vertex; otherwise the vertex elevation is used.
pub fn build_tube(
    path: &[Point3],
    radius: f64,
    sides: usize,
    scalars: Option<&[f64]>,
) -> Result<TubeGeometry, PathError> {
    if path.len() < 2 {
        return Err(PathError::TooFewPoints {
            needed: 2,
            got: path.len(),
        });
    }
    if sides < 3 {
        return Err(PathError::TooFewSides(sides));
    }
    if !radius.is_finite() || radius <= 0.0 {
        return Err(PathError::InvalidRadius(radius));
    }
    if let Some(scalars) = scalars {
        if scalars.len() != path.len() {
            return Err(PathError::ScalarLengthMismatch {
                scalars: scalars.len(),
                points: path.len(),
            });
        }
    }

    let mut vertices = Vec::with_capacity(path.len() * sides);
    let mut vertex_scalars = Vec::with_capacity(path.len() * sides);

    for (idx, center) in path.iter().enumerate() {
        let tangent = tangent_at(path, idx);
        let (u, v) = ring_frame(tangent);

        for side in 0..sides {
            let angle = std::f64::consts::TAU * side as f64 / sides as f64;
            let (sin, cos) = angle.sin_cos();
            let vertex = Point3::new(
                center.x + radius * (cos * u[0] + sin * v[0]),
                center.y + radius * (cos * u[1] + sin * v[1]),
                center.z + radius * (cos * u[2] + sin * v[2]),
            );
            vertex_scalars.push(scalars.map_or(vertex.z, |s| s[idx]));
            vertices.push(vertex);
        }
    }

    // Two triangles per quad between consecutive rings.
    let sides_u32 = sides as u32;
    let mut triangles = Vec::with_capacity((path.len() - 1) * sides * 2);
    for ring in 0..(path.len() - 1) as u32 {
        let base = ring * sides_u32;
        let next = base + sides_u32;
        for side in 0..sides_u32 {
            let a = base + side;
            let b = base + (side + 1) % sides_u32;
            let c = next + side;
            let d = next + (side + 1) % sides_u32;
            triangles.push([a, b, c]);
            triangles.push([b, d, c]);
        }
    }

    Ok(TubeGeometry {
        vertices,
        triangles,
        scalars: vertex_scalars,
    })
}

/// Path tangent at a vertex: central difference in the interior, one-sided
/// at the ends. Falls back to straight down for coincident neighbors.
fn tangent_at(path: &[Point3], idx: usize) -> [f64; 3] {
    let (a, b) = if idx == 0 {
        (path[0], path[1])
    } else if idx == path.len() - 1 {
        (path[idx - 1], path[idx])
    } else {
        (path[idx - 1], path[idx + 1])
    };

    let d = [b.x - a.x, b.y - a.y, b.z - a.z];
    let norm = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
    if norm == 0.0 {
        return [0.0, 0.0, -1.0];
    }
    [d[0] / norm, d[1] / norm, d[2] / norm]
}

/// Orthonormal frame perpendicular to a tangent, for placing ring vertices.
fn ring_frame(tangent: [f64; 3]) -> ([f64; 3], [f64; 3]) {
    // Pick the reference axis least aligned with the tangent.
    let reference = if tangent[2].abs() < 0.9 {
        [0.0, 0.0, 1.0]
    } else {
        [1.0, 0.0, 0.0]
    };

    let mut u = cross(reference, tangent);
    let norm = (u[0] * u[0] + u[1] * u[1] + u[2] * u[2]).sqrt();
    u = [u[0] / norm, u[1] / norm, u[2] / norm];

    let v = cross(tangent, u);
    (u, v)
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_path() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -10.0),
            Point3::new(0.0, 5.0, -20.0),
        ]
    }

    #[test]
    fn resampled_gaps_never_exceed_spacing() {
        let points = straight_path();
        let resampled = resample_between_points(&points, 1.0).unwrap();

        for pair in resampled.windows(2) {
            assert!(pair[0].distance(&pair[1]) <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn resampling_keeps_every_original_waypoint() {
        let points = straight_path();
        let resampled = resample_between_points(&points, 0.7).unwrap();

        for original in &points {
            assert!(
                resampled.iter().any(|p| p.distance(original) < 1e-9),
                "waypoint {original:?} missing from resampled path"
            );
        }
    }

    #[test]
    fn resampling_does_not_duplicate_boundaries() {
        let points = straight_path();
        let resampled = resample_between_points(&points, 2.0).unwrap();

        for pair in resampled.windows(2) {
            assert!(pair[0].distance(&pair[1]) > 1e-12, "duplicated point");
        }
    }

    #[test]
    fn non_divisible_spacing_still_bounds_gaps() {
        // 2.5-long segment with spacing 1.0 needs 3 subdivisions, not 2.
        let points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.5, 0.0, 0.0)];
        let resampled = resample_between_points(&points, 1.0).unwrap();

        assert_eq!(resampled.len(), 4);
        for pair in resampled.windows(2) {
            assert!(pair[0].distance(&pair[1]) <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn invalid_spacing_is_rejected() {
        let points = straight_path();
        assert!(matches!(
            resample_between_points(&points, 0.0),
            Err(PathError::InvalidSpacing(_))
        ));
        assert!(matches!(
            resample_between_points(&points, -1.0),
            Err(PathError::InvalidSpacing(_))
        ));
    }

    #[test]
    fn coincident_waypoints_collapse() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        let resampled = resample_between_points(&points, 0.5).unwrap();
        assert_eq!(resampled[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(resampled.len(), 3);
    }

    #[test]
    fn arc_lengths_accumulate() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
        ];
        let lengths = arc_lengths(&points);
        assert_eq!(lengths, vec![0.0, 3.0, 7.0]);
    }

    #[test]
    fn nearest_point_ties_break_shallow() {
        // Two vertices at arc lengths 0 and 2; target 1 is equidistant.
        let points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)];
        let selected = points_along_path(&points, &[1.0]).unwrap();
        assert_eq!(selected[0], points[0]);
    }

    #[test]
    fn nearest_point_selects_by_arc_length() {
        let points: Vec<Point3> = (0..=10).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        let selected = points_along_path(&points, &[0.0, 4.2, 9.8]).unwrap();
        assert_eq!(selected[0], points[0]);
        assert_eq!(selected[1], points[4]);
        assert_eq!(selected[2], points[10]);
    }

    #[test]
    fn tube_has_ring_per_path_point() {
        let path = straight_path();
        let tube = build_tube(&path, 5.0, 8, None).unwrap();

        assert_eq!(tube.vertices.len(), path.len() * 8);
        assert_eq!(tube.triangles.len(), (path.len() - 1) * 8 * 2);
        assert_eq!(tube.scalars.len(), tube.vertices.len());
    }

    #[test]
    fn tube_vertices_sit_on_the_ring_radius() {
        let path = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, -10.0)];
        let tube = build_tube(&path, 3.0, 16, None).unwrap();

        // Vertical path: every ring vertex is exactly `radius` from the axis.
        for vertex in &tube.vertices {
            let r = (vertex.x * vertex.x + vertex.y * vertex.y).sqrt();
            assert!((r - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn tube_scalars_follow_path_values() {
        let path = straight_path();
        let scalars = vec![10.0, 20.0, 30.0];
        let tube = build_tube(&path, 1.0, 6, Some(&scalars)).unwrap();

        assert!(tube.scalars[..6].iter().all(|&s| s == 10.0));
        assert!(tube.scalars[12..].iter().all(|&s| s == 30.0));
    }

    #[test]
    fn tube_rejects_mismatched_scalars() {
        let path = straight_path();
        assert!(matches!(
            build_tube(&path, 1.0, 6, Some(&[1.0])),
            Err(PathError::ScalarLengthMismatch { scalars: 1, points: 3 })
        ));
    }

    #[test]
    fn tube_geometry_serializes_to_json() {
        let path = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, -1.0)];
        let tube = build_tube(&path, 1.0, 3, None).unwrap();
        let json = tube.to_json().unwrap();
        assert!(json.contains("\"vertices\""));
        assert!(json.contains("\"triangles\""));
    }
}
