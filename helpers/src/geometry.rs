use approx::ulps_eq;
use serde::{Deserialize, Serialize};

// threshold below which two segments are considered parallel
const PARALLEL_EPS: f64 = 1e-10;
// thresholds for collinear segments (sine of the enclosed angle, lateral distance, overlap)
const COLLINEAR_SIN_EPS: f64 = 1e-9;
const COLLINEAR_DIST_EPS: f64 = 1e-9;
const OVERLAP_EPS: f64 = 1e-9;

// POINT -------------------------------------------------------------------------------------------
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub fn new(x: f64, y: f64) -> Point2d {
        Point2d { x, y }
    }
    pub fn as_vector2d(&self) -> Vector2d {
        Vector2d {
            dx: self.x,
            dy: self.y,
        }
    }
    pub fn shift(&self, other: &Vector2d) -> Point2d {
        self.as_vector2d().add(other).as_point2d()
    }
    /// vector_to returns the vector pointing from self to other.
    pub fn vector_to(&self, other: &Point2d) -> Vector2d {
        other.as_vector2d().sub(&self.as_vector2d())
    }
    pub fn dist(&self, other: &Point2d) -> f64 {
        self.vector_to(other).abs()
    }
}

impl PartialEq for Point2d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.x, other.x) && ulps_eq!(self.y, other.y)
    }
}

// VECTOR ------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default)]
pub struct Vector2d {
    pub dx: f64,
    pub dy: f64,
}

impl Vector2d {
    /// from_angle returns the unit vector for a heading angle in radians.
    pub fn from_angle(angle: f64) -> Vector2d {
        Vector2d {
            dx: angle.cos(),
            dy: angle.sin(),
        }
    }
    pub fn as_point2d(&self) -> Point2d {
        Point2d {
            x: self.dx,
            y: self.dy,
        }
    }
    pub fn sub(&self, other: &Self) -> Vector2d {
        Vector2d {
            dx: self.dx - other.dx,
            dy: self.dy - other.dy,
        }
    }
    pub fn add(&self, other: &Self) -> Vector2d {
        Vector2d {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
        }
    }
    pub fn mult(&self, k: f64) -> Vector2d {
        Vector2d {
            dx: self.dx * k,
            dy: self.dy * k,
        }
    }
    pub fn dot(&self, other: &Self) -> f64 {
        self.dx * other.dx + self.dy * other.dy
    }
    /// convenience function (strictly speaking, the cross product is not defined in a 2D space)
    pub fn cross(&self, other: &Self) -> f64 {
        self.dx * other.dy - self.dy * other.dx
    }
    pub fn abs(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
    pub fn angle(&self) -> f64 {
        self.dy.atan2(self.dx)
    }
    pub fn normal_vector(&self) -> Vector2d {
        Vector2d {
            dx: -self.dy,
            dy: self.dx,
        }
    }
    /// normalized returns None for a zero-length vector.
    pub fn normalized(&self) -> Option<Vector2d> {
        let len = self.abs();

        if len > 0.0 {
            Some(self.mult(1.0 / len))
        } else {
            None
        }
    }
}

impl PartialEq for Vector2d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.dx, other.dx) && ulps_eq!(self.dy, other.dy)
    }
}

// SEGMENT -----------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2d {
    pub p1: Point2d,
    pub p2: Point2d,
}

impl Segment2d {
    pub fn new(p1: Point2d, p2: Point2d) -> Segment2d {
        Segment2d { p1, p2 }
    }
    pub fn direction(&self) -> Vector2d {
        self.p1.vector_to(&self.p2)
    }
    pub fn length(&self) -> f64 {
        self.direction().abs()
    }
    pub fn is_degenerate(&self) -> bool {
        let dir = self.direction();
        dir.dot(&dir) == 0.0
    }
    /// point_at returns the point at the parametric position t (t = 0 -> p1, t = 1 -> p2).
    pub fn point_at(&self, t: f64) -> Point2d {
        self.p1.shift(&self.direction().mult(t))
    }

    /// The method returns the parametric position t in [0, 1] of the point on the segment that
    /// is closest to p, or None if the segment has zero length.
    pub fn project_clamped(&self, p: &Point2d) -> Option<f64> {
        let dir = self.direction();
        let len_sq = dir.dot(&dir);

        if len_sq == 0.0 {
            return None;
        }

        let t = self.p1.vector_to(p).dot(&dir) / len_sq;
        Some(t.max(0.0).min(1.0))
    }

    pub fn closest_point(&self, p: &Point2d) -> Option<Point2d> {
        self.project_clamped(p).map(|t| self.point_at(t))
    }

    pub fn dist_to_point(&self, p: &Point2d) -> Option<f64> {
        self.closest_point(p).map(|c| c.dist(p))
    }

    /// intersects solves both parametric intersection fractions using the determinant of the
    /// direction vectors. Parallel segments never intersect. Touching end points count.
    pub fn intersects(&self, other: &Segment2d) -> bool {
        let (x1, y1, x2, y2) = (self.p1.x, self.p1.y, self.p2.x, self.p2.y);
        let (x3, y3, x4, y4) = (other.p1.x, other.p1.y, other.p2.x, other.p2.y);

        let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
        if denom.abs() < PARALLEL_EPS {
            return false;
        }

        let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / denom;
        let u = -((x1 - x2) * (y1 - y3) - (y1 - y2) * (x1 - x3)) / denom;

        (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
    }

    /// overlaps_collinear checks if both segments lie on a common line and share more than a
    /// single point. Such segments are not reported by intersects since they are parallel.
    pub fn overlaps_collinear(&self, other: &Segment2d) -> bool {
        let dir = self.direction();
        let other_dir = other.direction();
        let (len, other_len) = (dir.abs(), other_dir.abs());

        if len == 0.0 || other_len == 0.0 {
            return false;
        }
        if (dir.cross(&other_dir) / (len * other_len)).abs() > COLLINEAR_SIN_EPS
            || (dir.cross(&self.p1.vector_to(&other.p1)) / len).abs() > COLLINEAR_DIST_EPS
        {
            return false;
        }

        // parametric positions of the other segment's end points along this segment
        let len_sq = len * len;
        let t1 = self.p1.vector_to(&other.p1).dot(&dir) / len_sq;
        let t2 = self.p1.vector_to(&other.p2).dot(&dir) / len_sq;

        (t1.max(t2).min(1.0) - t1.min(t2).max(0.0)) * len > OVERLAP_EPS
    }
}

// POLYGON -----------------------------------------------------------------------------------------
/// point_in_polygon performs an even-odd ray casting test. The polygon is treated as closed.
pub fn point_in_polygon(p: &Point2d, polygon: &[Point2d]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        let (pi, pj) = (&polygon[i], &polygon[j]);

        if (pi.y > p.y) != (pj.y > p.y) && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// closed_edges returns the edges of a closed polyline, including the one from the last point
/// back to the first.
pub fn closed_edges(points: &[Point2d]) -> impl Iterator<Item = Segment2d> + '_ {
    let n = points.len();
    (0..n).map(move |i| Segment2d::new(points[i], points[(i + 1) % n]))
}
