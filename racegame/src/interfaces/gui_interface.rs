use crate::core::car::EffectEvent;
use crate::core::race::RaceEvent;
use crate::core::state_handler::State;
use helpers::geometry::Point2d;

pub const MAX_GUI_UPDATE_FREQUENCY: f64 = 60.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Default)]
pub struct CarState {
    pub pos: Point2d,
    pub angle: f64,
    pub drift: f64,
    pub wheel_angle: f64,
    pub speed: f64,
    pub speed_ratio: f64,
    pub color: RgbColor,
}

/// RaceState is the snapshot the simulation publishes for the renderer.
///
/// * `effects` - Visual effects collected since the previously published snapshot
/// * `outcome` - Terminal event of the current attempt (shown in the modal until reset)
/// * `reset_count` - Reset generation, the renderer discards its effects when it changes
#[derive(Debug, Clone, Default)]
pub struct RaceState {
    pub car_state: CarState,
    pub state: State,
    pub lap_count: u32,
    pub elapsed: f64,
    pub best_time: Option<f64>,
    pub max_speed: f64,
    pub reset_count: u32,
    pub effects: Vec<EffectEvent>,
    pub outcome: Option<RaceEvent>,
}
