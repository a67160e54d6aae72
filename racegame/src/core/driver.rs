use crate::core::race::Race;
use crate::interfaces::input::{ControlSignal, InputSnapshot};
use helpers::general::wrap_angle;
use serde::Deserialize;

/// * `lookahead` - Distance along the centerline between the car projection and the target point
/// * `steer_gain` - Analog steering value per radian of heading error
#[derive(Debug, Deserialize, Clone)]
pub struct DriverPars {
    pub lookahead: f64,
    pub steer_gain: f64,
}

/// Driver is a pure pursuit autopilot that replaces the human input collaborator in headless
/// simulations. It steers towards a point on the centerline ahead of the car.
#[derive(Debug, Clone)]
pub struct Driver {
    pub label: String,
    lookahead: f64,
    steer_gain: f64,
    requested_start: bool,
}

impl Driver {
    pub fn new(label: &str, driver_pars: &DriverPars) -> Driver {
        Driver {
            label: label.to_owned(),
            lookahead: driver_pars.lookahead,
            steer_gain: driver_pars.steer_gain,
            requested_start: false,
        }
    }

    /// sweep creates no_drivers drivers whose steering gains are spread evenly between 0.5 and
    /// 1.5 times the configured gain. A single driver keeps the configured gain.
    pub fn sweep(driver_pars: &DriverPars, no_drivers: u32) -> Vec<Driver> {
        (0..no_drivers)
            .map(|i| {
                let factor = if no_drivers > 1 {
                    0.5 + i as f64 / (no_drivers - 1) as f64
                } else {
                    1.0
                };
                let steer_gain = driver_pars.steer_gain * factor;

                Driver::new(
                    &format!("autopilot_{:02} (gain {:.2})", i + 1, steer_gain),
                    &DriverPars {
                        lookahead: driver_pars.lookahead,
                        steer_gain,
                    },
                )
            })
            .collect()
    }

    pub fn get_steer_gain(&self) -> f64 {
        self.steer_gain
    }

    /// The method determines the input for the next time step. The start of the race is
    /// requested with the first input.
    pub fn get_input(&mut self, race: &Race) -> InputSnapshot {
        let car = &race.car;
        let target = race.track.get_point_ahead(&car.pos, self.lookahead);

        // the car actually moves along heading plus drift
        let cur_dir = car.angle + car.drift;
        let desired_dir = car.pos.vector_to(&target).angle();
        let steer = wrap_angle(desired_dir - cur_dir) * self.steer_gain;

        let mut input = InputSnapshot::new(ControlSignal::new(false, false, steer, true));

        if !self.requested_start {
            input.start_requested = true;
            self.requested_start = true;
        }

        input
    }
}
