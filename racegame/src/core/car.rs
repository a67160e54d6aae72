use crate::core::track::StartPose;
use crate::interfaces::input::ControlSignal;
use helpers::geometry::{Point2d, Vector2d};
use serde::Deserialize;

/// (s) Time step the tuning constants of the car are calibrated for (one display frame at 60 Hz)
pub const REFERENCE_TIMESTEP: f64 = 1.0 / 60.0;

// steering is disabled below this speed such that the car does not spin while standing still
const MIN_STEER_SPEED: f64 = 0.2;
// analog steering values below this magnitude are ignored
const STEER_DEAD_ZONE: f64 = 0.1;
// turn multiplier = base + speed ratio * scale
const TURN_MULT_BASE: f64 = 0.6;
const TURN_MULT_SCALE: f64 = 0.4;
// drift builds up only when turning hard at high speed
const DRIFT_MIN_TURNING: f64 = 0.5;
const DRIFT_MIN_SPEED_RATIO: f64 = 0.7;
const DRIFT_GAIN: f64 = 0.015;
const DRIFT_RELEASE_FACTOR: f64 = 0.9;
const DRIFT_EFFECT_THRESHOLD: f64 = 0.1;
const SPEED_LINE_MIN_SPEED_RATIO: f64 = 0.7;
const WHEEL_ANGLE_FACTOR: f64 = 0.4;

/// * `max_speed` - (units/tick) Maximum speed
/// * `acceleration` - (units/tick^2) Speed gain per tick while accelerating
/// * `friction` - Speed decay factor per tick while coasting
/// * `turn_speed` - (rad/tick) Heading change per tick for a full steering input
/// * `drift_factor` - Drift decay factor per tick while drifting
/// * `auto_accelerate` - True if the car accelerates automatically once the race is active, false
/// if the throttle signal must be set
/// * `color` - Hex-code of the car color (used for drawing)
#[derive(Debug, Deserialize, Clone)]
pub struct CarPars {
    pub max_speed: f64,
    pub acceleration: f64,
    pub friction: f64,
    pub turn_speed: f64,
    pub drift_factor: f64,
    pub auto_accelerate: bool,
    pub color: String,
}

/// EffectEvent contains advisory events for the rendering collaborator. They do not influence the
/// simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectEvent {
    TireSmoke { pos: Point2d, angle: f64 },
    SkidMark { pos: Point2d, angle: f64 },
    SpeedLine { pos: Point2d, angle: f64 },
    CrashBurst { pos: Point2d },
}

#[derive(Debug, Clone)]
pub struct Car {
    max_speed: f64,
    acceleration: f64,
    friction: f64,
    turn_speed: f64,
    drift_factor: f64,
    pub auto_accelerate: bool,
    pub color: String,
    pub pos: Point2d,
    pub prev_pos: Point2d,
    pub angle: f64,
    pub speed: f64,
    pub drift: f64,
    pub wheel_angle: f64,
}

impl Car {
    pub fn new(car_pars: &CarPars, start_pose: &StartPose) -> Car {
        Car {
            max_speed: car_pars.max_speed,
            acceleration: car_pars.acceleration,
            friction: car_pars.friction,
            turn_speed: car_pars.turn_speed,
            drift_factor: car_pars.drift_factor,
            auto_accelerate: car_pars.auto_accelerate,
            color: car_pars.color.to_owned(),
            pos: start_pose.pos,
            prev_pos: start_pose.pos,
            angle: start_pose.angle,
            speed: 0.0,
            drift: 0.0,
            wheel_angle: 0.0,
        }
    }

    /// The method puts the car back into the canonical start pose at standstill.
    pub fn reset(&mut self, start_pose: &StartPose) {
        self.pos = start_pose.pos;
        self.prev_pos = start_pose.pos;
        self.angle = start_pose.angle;
        self.speed = 0.0;
        self.drift = 0.0;
        self.wheel_angle = 0.0;
    }

    pub fn get_max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn get_speed_ratio(&self) -> f64 {
        self.speed / self.max_speed
    }

    /// The method advances the car state by one time step. Execution order:
    /// 1. Update the speed (accelerate up to the maximum speed or coast).
    /// 2. Turn the car if it is fast enough. Steering authority rises with speed.
    /// 3. Build up drift when turning hard at high speed, let it decay otherwise.
    /// 4. Integrate the position along the heading plus drift.
    ///
    /// The tuning constants are given per reference time step. Other time step sizes scale the
    /// additive terms linearly and the decay factors exponentially.
    pub fn advance(
        &mut self,
        control: &ControlSignal,
        accelerate: bool,
        timestep_size: f64,
        effects: &mut Vec<EffectEvent>,
    ) {
        let k = timestep_size / REFERENCE_TIMESTEP;

        // speed
        if accelerate {
            self.speed = (self.speed + self.acceleration * k).min(self.max_speed);
        } else {
            self.speed *= self.friction.powf(k);
        }

        // turning (discrete and analog inputs are summed and not clamped)
        let speed_ratio = self.get_speed_ratio();
        let turn_multiplier = TURN_MULT_BASE + speed_ratio * TURN_MULT_SCALE;
        let mut turning = 0.0;

        if control.left {
            turning -= 1.0;
        }
        if control.right {
            turning += 1.0;
        }
        if control.analog_steer.abs() > STEER_DEAD_ZONE {
            turning += control.analog_steer;
        }

        if self.speed.abs() > MIN_STEER_SPEED {
            self.angle += turning * self.turn_speed * turn_multiplier * k;

            // drift
            if turning.abs() > DRIFT_MIN_TURNING && speed_ratio > DRIFT_MIN_SPEED_RATIO {
                self.drift += turning * DRIFT_GAIN * k;
                self.drift *= self.drift_factor.powf(k);

                if self.drift.abs() > DRIFT_EFFECT_THRESHOLD {
                    effects.push(EffectEvent::TireSmoke {
                        pos: self.pos,
                        angle: self.angle,
                    });
                    effects.push(EffectEvent::SkidMark {
                        pos: self.pos,
                        angle: self.angle,
                    });
                }
            } else {
                self.drift *= DRIFT_RELEASE_FACTOR.powf(k);
            }
        }

        self.wheel_angle = turning * WHEEL_ANGLE_FACTOR;

        // position (the direction of travel includes the drift)
        let move_angle = self.angle + self.drift;
        self.prev_pos = self.pos;
        self.pos = self
            .pos
            .shift(&Vector2d::from_angle(move_angle).mult(self.speed * k));

        if speed_ratio > SPEED_LINE_MIN_SPEED_RATIO {
            effects.push(EffectEvent::SpeedLine {
                pos: self.pos,
                angle: self.angle,
            });
        }
    }
}
