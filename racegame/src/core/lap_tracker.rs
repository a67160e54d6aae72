use crate::core::state_handler::RaceSession;
use helpers::geometry::{Point2d, Segment2d, Vector2d};

/// Result of a finish line check for one time step.
///
/// * `left_start_area` - Car is (or already was) far enough away from the start waypoint that
/// finish line crossings are honored
/// * `crossed` - Car crossed the finish line in a valid way within the time step
/// * `lap_complete` - The crossing completes the race
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FinishCheck {
    pub left_start_area: bool,
    pub crossed: bool,
    pub lap_complete: bool,
}

/// LapTracker determines finish line crossings. It does not store any race progress itself, the
/// lap count and the start area guard are kept in the race session.
#[derive(Debug, Clone)]
pub struct LapTracker {
    start_point: Point2d,
    track_dir: Vector2d,
    leave_start_radius: f64,
    min_crossing_speed: f64,
    no_laps: u32,
}

impl LapTracker {
    pub fn new(
        start_point: Point2d,
        track_dir: Vector2d,
        leave_start_radius: f64,
        min_crossing_speed: f64,
        no_laps: u32,
    ) -> LapTracker {
        LapTracker {
            start_point,
            track_dir,
            leave_start_radius,
            min_crossing_speed,
            no_laps,
        }
    }

    /// The method checks if the path driven within the current time step (prev_pos -> cur_pos)
    /// crosses the finish line. A crossing only counts once the car left the start area, if it
    /// is faster than the minimum crossing speed and if it moves in track direction (a car driving
    /// back across the line does not finish the lap). Since the complete path of the time step is
    /// tested, a fast car cannot jump over the line.
    pub fn check_finish(
        &self,
        prev_pos: &Point2d,
        cur_pos: &Point2d,
        speed: f64,
        finish_line: &Segment2d,
        session: &RaceSession,
    ) -> FinishCheck {
        let left_start_area = session.has_left_start_area
            || cur_pos.dist(&self.start_point) > self.leave_start_radius;

        let crossed = left_start_area
            && speed > self.min_crossing_speed
            && prev_pos.vector_to(cur_pos).dot(&self.track_dir) > 0.0
            && Segment2d::new(*prev_pos, *cur_pos).intersects(finish_line);

        FinishCheck {
            left_start_area,
            crossed,
            lap_complete: crossed && session.lap_count + 1 >= self.no_laps,
        }
    }
}
