use crate::core::track::Track;
use helpers::general::argmin;
use helpers::geometry::{closed_edges, point_in_polygon, Point2d};
use serde::Deserialize;

/// CollisionModel selects how the car is checked against the track bounds.
///
/// * `Corridor` -> car is on track if its distance to the closest centerline edge does not exceed
/// the collision radius (tolerates non-convex track shapes)
/// * `Containment` -> car is on track if it lies inside the region enclosed by the boundary
/// curves (even-odd rule)
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CollisionModel {
    Corridor,
    Containment,
}

impl Default for CollisionModel {
    fn default() -> Self {
        CollisionModel::Corridor
    }
}

impl CollisionModel {
    pub fn is_on_track(&self, pos: &Point2d, track: &Track) -> bool {
        match self {
            CollisionModel::Corridor => {
                is_on_track_corridor(pos, &track.waypoints, track.collision_radius)
            }
            CollisionModel::Containment => {
                is_on_track_containment(pos, &track.outer_boundary, &track.inner_boundary)
            }
        }
    }
}

/// is_on_track_corridor projects the position onto every edge of the closed waypoint polygon and
/// compares the minimum distance with the collision radius. Zero-length edges are skipped.
pub fn is_on_track_corridor(pos: &Point2d, waypoints: &[Point2d], collision_radius: f64) -> bool {
    match argmin(closed_edges(waypoints).map(|edge| edge.dist_to_point(pos))) {
        Some((_, min_dist)) => min_dist <= collision_radius,
        None => false,
    }
}

/// is_on_track_containment checks if the position lies between both boundary curves.
pub fn is_on_track_containment(
    pos: &Point2d,
    outer_boundary: &[Point2d],
    inner_boundary: &[Point2d],
) -> bool {
    point_in_polygon(pos, outer_boundary) != point_in_polygon(pos, inner_boundary)
}
