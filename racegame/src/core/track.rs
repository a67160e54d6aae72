use anyhow::Context;
use helpers::general::{argmin, InputValueError};
use helpers::geometry::{closed_edges, Point2d, Segment2d, Vector2d};
use serde::Deserialize;

/// * `name` - Track name
/// * `waypoints` - Centerline waypoints of the closed circuit (at least three distinct points,
/// the last point is implicitly connected to the first one)
/// * `track_width` - Lateral distance between centerline and boundary curves
/// * `collision_margin` - Allowed distance the collision radius stays inside the boundary curves
/// (collision radius = track_width - collision_margin)
/// * `curb_inset` - Lateral distance between boundary curves and curbs (only used for drawing)
/// * `start_idx` - Index of the waypoint the finish line runs through, the track direction at
/// the finish line is given by the edge to the following waypoint
/// * `start_offset` - Distance between finish line and start position of the car (along the
/// track direction)
/// * `finish_line_half_length` - Half length of the finish line segment (defaults to track_width)
#[derive(Debug, Deserialize, Clone)]
pub struct TrackPars {
    pub name: String,
    pub waypoints: Vec<Point2d>,
    pub track_width: f64,
    pub collision_margin: f64,
    pub curb_inset: f64,
    pub start_idx: usize,
    pub start_offset: f64,
    #[serde(default)]
    pub finish_line_half_length: Option<f64>,
}

/// StartPose is the canonical car pose at race start and after every reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartPose {
    pub pos: Point2d,
    pub angle: f64,
}

#[derive(Debug)]
pub struct Track {
    pub name: String,
    pub waypoints: Vec<Point2d>,
    pub track_width: f64,
    pub collision_radius: f64,
    pub length: f64,
    pub outer_boundary: Vec<Point2d>,
    pub inner_boundary: Vec<Point2d>,
    pub outer_curbs: Vec<Point2d>,
    pub inner_curbs: Vec<Point2d>,
    pub finish_line: Segment2d,
    pub start_point: Point2d,
    pub start_pose: StartPose,
}

impl Track {
    pub fn new(track_pars: &TrackPars) -> anyhow::Result<Track> {
        // check input
        let distinct_waypoints = get_distinct_waypoints(&track_pars.waypoints);

        if distinct_waypoints.len() < 3 {
            return Err(InputValueError).context(format!(
                "Track {} must contain at least three distinct waypoints, but contains {}!",
                track_pars.name,
                distinct_waypoints.len()
            ));
        }
        if !(track_pars.track_width > 0.0) {
            return Err(InputValueError).context(format!(
                "track_width is {:.3}, but must be positive!",
                track_pars.track_width
            ));
        }

        let collision_radius = track_pars.track_width - track_pars.collision_margin;

        if !(0.0 < collision_radius && collision_radius <= track_pars.track_width) {
            return Err(InputValueError).context(format!(
                "collision_margin is {:.3}, which is not within the required range \
                [0.0, track_width)!",
                track_pars.collision_margin
            ));
        }
        if !(0.0 <= track_pars.curb_inset && track_pars.curb_inset < track_pars.track_width) {
            return Err(InputValueError).context(
                "curb_inset is not within the required range [0.0, track_width)!",
            );
        }
        if track_pars.start_idx >= track_pars.waypoints.len() {
            return Err(InputValueError).context(format!(
                "start_idx is {}, but the track only contains {} waypoints!",
                track_pars.start_idx,
                track_pars.waypoints.len()
            ));
        }
        if let Some((i, j)) = find_self_intersection(&distinct_waypoints) {
            return Err(InputValueError).context(format!(
                "Track {} is self-intersecting (edges {} and {} of the circuit cross)!",
                track_pars.name, i, j
            ));
        }

        // determine finish line perpendicular to the track direction at the start waypoint
        let start_point = track_pars.waypoints[track_pars.start_idx];
        let next_point =
            track_pars.waypoints[(track_pars.start_idx + 1) % track_pars.waypoints.len()];
        let track_dir = start_point
            .vector_to(&next_point)
            .normalized()
            .ok_or(InputValueError)
            .context("The edge following the start waypoint must not have zero length!")?;
        let perp = track_dir.normal_vector();

        let half_length = track_pars
            .finish_line_half_length
            .unwrap_or(track_pars.track_width);

        if !(half_length > 0.0) {
            return Err(InputValueError).context("finish_line_half_length must be positive!");
        }

        let finish_line = Segment2d::new(
            start_point.shift(&perp.mult(half_length)),
            start_point.shift(&perp.mult(-half_length)),
        );

        // the car starts behind the finish line such that it must drive a full lap to cross it
        let start_pose = StartPose {
            pos: start_point.shift(&track_dir.mult(track_pars.start_offset)),
            angle: track_dir.angle(),
        };

        // inner curves are reversed such that outer and inner curves wind in opposite directions
        let waypoints = track_pars.waypoints.to_owned();
        let width = track_pars.track_width;
        let curb_offset = width - track_pars.curb_inset;

        let mut inner_boundary = build_boundary(&waypoints, -width);
        inner_boundary.reverse();
        let mut inner_curbs = build_boundary(&waypoints, -curb_offset);
        inner_curbs.reverse();

        let length = closed_edges(&waypoints).map(|edge| edge.length()).sum();

        Ok(Track {
            name: track_pars.name.to_owned(),
            outer_boundary: build_boundary(&waypoints, width),
            inner_boundary,
            outer_curbs: build_boundary(&waypoints, curb_offset),
            inner_curbs,
            waypoints,
            track_width: width,
            collision_radius,
            length,
            finish_line,
            start_point,
            start_pose,
        })
    }

    /// The method returns the i-th edge of the closed centerline polygon.
    pub fn get_edge(&self, idx: usize) -> Segment2d {
        let n = self.waypoints.len();
        Segment2d::new(self.waypoints[idx % n], self.waypoints[(idx + 1) % n])
    }

    /// The method returns the index of the closest centerline edge and the distance to it.
    /// Zero-length edges are skipped.
    pub fn get_nearest_edge(&self, pos: &Point2d) -> Option<(usize, f64)> {
        argmin(closed_edges(&self.waypoints).map(|edge| edge.dist_to_point(pos)))
    }

    /// The method returns the point on the centerline that lies dist ahead (in driving
    /// direction) of the projection of pos onto its closest edge.
    pub fn get_point_ahead(&self, pos: &Point2d, dist: f64) -> Point2d {
        let (mut idx, _) = match self.get_nearest_edge(pos) {
            Some(x) => x,
            None => return *pos,
        };

        let mut edge = self.get_edge(idx);
        let mut t = edge.project_clamped(pos).unwrap_or(0.0);
        let mut dist_left = dist.max(0.0) % self.length;

        // walking along all edges once is enough since dist_left is below the track length
        for _ in 0..=self.waypoints.len() {
            let edge_length = edge.length();
            let edge_length_left = edge_length * (1.0 - t);

            if dist_left <= edge_length_left && edge_length > 0.0 {
                return edge.point_at(t + dist_left / edge_length);
            }

            dist_left -= edge_length_left;
            idx = (idx + 1) % self.waypoints.len();
            edge = self.get_edge(idx);
            t = 0.0;
        }

        edge.p1
    }
}

/// build_boundary displaces every waypoint by signed_offset along the averaged unit normal of its
/// incoming and outgoing edge. Zero-length edges do not contribute to the normal, a waypoint
/// without a usable normal is emitted unshifted.
pub fn build_boundary(waypoints: &[Point2d], signed_offset: f64) -> Vec<Point2d> {
    let n = waypoints.len();
    let mut boundary = Vec::with_capacity(n);

    for i in 0..n {
        let cur = waypoints[i];
        let prev = waypoints[(i + n - 1) % n];
        let next = waypoints[(i + 1) % n];

        let normal_sum = [prev.vector_to(&cur), cur.vector_to(&next)]
            .iter()
            .filter_map(|dir| dir.normalized())
            .fold(Vector2d::default(), |sum, dir| sum.add(&dir.normal_vector()));

        match normal_sum.normalized() {
            Some(normal) => boundary.push(cur.shift(&normal.mult(signed_offset))),
            None => boundary.push(cur),
        }
    }

    boundary
}

/// get_distinct_waypoints removes consecutive coincident waypoints (including a last waypoint
/// that coincides with the first one).
fn get_distinct_waypoints(waypoints: &[Point2d]) -> Vec<Point2d> {
    let mut distinct: Vec<Point2d> = Vec::with_capacity(waypoints.len());

    for waypoint in waypoints.iter() {
        if distinct.last() != Some(waypoint) {
            distinct.push(*waypoint);
        }
    }

    while distinct.len() > 1 && distinct.first() == distinct.last() {
        distinct.pop();
    }

    distinct
}

/// find_self_intersection returns the indices of the first pair of edges of the closed polygon
/// that intersect each other. Adjacent edges share an end point, they only count if they run back
/// along each other.
fn find_self_intersection(points: &[Point2d]) -> Option<(usize, usize)> {
    let n = points.len();
    let edges: Vec<Segment2d> = closed_edges(points).collect();

    for i in 0..n {
        for j in i + 1..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);

            if edges[i].overlaps_collinear(&edges[j])
                || (!adjacent && edges[i].intersects(&edges[j]))
            {
                return Some((i, j));
            }
        }
    }

    None
}
