//! # Collision detection
//!
//! Overlap tests between convex polygons using the separating axis theorem,
//! and construction of the polygons for obstacles and the vehicle footprint.
//!
//! All polygons are in view coordinates, where y grows downwards.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::trace;
use nalgebra::{Point2, Rotation2, Vector2};

use comms_if::world::ObstacleRect;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Determine if two convex polygons, given as ordered vertex lists, overlap.
///
/// Polygons which only touch are considered to overlap. Edges of zero length
/// give no axis and are skipped. An empty polygon overlaps nothing.
pub fn intersects(a: &[Point2<f64>], b: &[Point2<f64>]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    axes(a)
        .chain(axes(b))
        .all(|axis| intervals_overlap(project(a, &axis), project(b, &axis)))
}

/// The polygon of an obstacle rectangle.
pub fn rect_polygon(rect: &ObstacleRect) -> Vec<Point2<f64>> {
    rect.corners()
        .iter()
        .map(|c| Point2::new(c[0], c[1]))
        .collect()
}

/// The polygon of the vehicle footprint in view coordinates.
///
/// `centre` is in world coordinates, `phi_deg` is the heading measured
/// anticlockwise from the +x axis in the y-up world frame. `length` and
/// `width` are in world units and are scaled into the view by `scale`.
pub fn footprint(
    centre: Point2<f64>,
    phi_deg: f64,
    length: f64,
    width: f64,
    scale: f64,
) -> Vec<Point2<f64>> {
    // Flipping y turns the world heading into a clockwise view rotation
    let rot = Rotation2::new(-phi_deg.to_radians());
    let forward = rot * Vector2::new(length * scale / 2.0, 0.0);
    let side = rot * Vector2::new(0.0, width * scale / 2.0);
    let c = Point2::new(centre.x * scale, centre.y * scale);

    vec![
        c + forward - side,
        c + forward + side,
        c - forward + side,
        c - forward - side,
    ]
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Unit normals of every non-degenerate edge of a polygon.
fn axes(poly: &[Point2<f64>]) -> impl Iterator<Item = Vector2<f64>> + '_ {
    let n = poly.len();

    (0..n).filter_map(move |i| {
        let edge = poly[(i + 1) % n] - poly[i];
        let normal = Vector2::new(edge.y, -edge.x);

        match normal.try_normalize(0.0) {
            Some(axis) => Some(axis),
            None => {
                trace!("Skipping zero length edge {} of polygon", i);
                None
            }
        }
    })
}

/// Project a polygon onto an axis, returning `(min, max)`.
fn project(poly: &[Point2<f64>], axis: &Vector2<f64>) -> (f64, f64) {
    poly.iter()
        .map(|p| p.coords.dot(axis))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), d| {
            (min.min(d), max.max(d))
        })
}

fn intervals_overlap(a: (f64, f64), b: (f64, f64)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn square(x: f64) -> Vec<Point2<f64>> {
        rect_polygon(&ObstacleRect::new(x, 0.0, 10.0, 10.0))
    }

    #[test]
    fn test_rectangles() {
        let a = square(0.0);

        assert!(!intersects(&a, &square(20.0)));
        assert!(intersects(&a, &square(5.0)));

        // Touching counts
        assert!(intersects(&a, &square(10.0)));
        assert!(!intersects(&a, &square(10.0 + 1e-9)));
    }

    #[test]
    fn test_symmetry() {
        let a = square(0.0);
        let shapes = vec![
            square(5.0),
            square(20.0),
            footprint(Point2::new(3.0, 1.0), 45.0, 4.0, 2.0, 4.0),
            footprint(Point2::new(5.0, 5.0), 10.0, 4.0, 2.0, 1.0),
            vec![
                Point2::new(11.0, 12.0),
                Point2::new(15.0, 8.0),
                Point2::new(16.0, 14.0),
            ],
        ];

        for s in shapes.iter() {
            assert_eq!(intersects(&a, s), intersects(s, &a));
        }
    }

    #[test]
    fn test_needs_both_polygons_axes() {
        // A triangle whose hypotenuse separates it from the square's corner,
        // while every axis of the square shows overlap
        let a = square(0.0);
        let tri = vec![
            Point2::new(11.0, 11.0),
            Point2::new(10.0, 12.5),
            Point2::new(12.5, 10.0),
        ];
        assert!(!intersects(&a, &tri));
        assert!(!intersects(&tri, &a));
    }

    #[test]
    fn test_degenerate() {
        let a = square(0.0);

        // Repeated vertex gives a zero length edge, which is ignored
        let mut b = square(5.0);
        b.insert(1, b[0]);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));

        let mut c = square(20.0);
        c.push(c[3]);
        assert!(!intersects(&a, &c));

        assert!(!intersects(&a, &[]));
        assert!(!intersects(&[], &a));
    }

    #[test]
    fn test_footprint() {
        // Heading 90 in the world points up the view, i.e. -y
        let f = footprint(Point2::new(50.0, 50.0), 90.0, 4.0, 2.0, 4.0);
        assert_eq!(f.len(), 4);

        let front = f[0] + (f[1] - f[0]) / 2.0;
        assert!((front.x - 200.0).abs() < 1e-9);
        assert!((front.y - 192.0).abs() < 1e-9);

        // Width spans 8 view units across the heading
        assert!(((f[1] - f[0]).norm() - 8.0).abs() < 1e-9);
        assert!(((f[2] - f[1]).norm() - 16.0).abs() < 1e-9);
    }
}
