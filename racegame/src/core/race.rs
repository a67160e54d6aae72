use crate::core::car::{Car, CarPars, EffectEvent};
use crate::core::collision::CollisionModel;
use crate::core::lap_tracker::LapTracker;
use crate::core::state_handler::RaceSession;
use crate::core::track::Track;
use crate::interfaces::input::InputSnapshot;
use crate::interfaces::storage::BestTimeStore;
use crate::post::race_result::{RaceOutcome, RaceResult};
use helpers::geometry::Vector2d;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// * `leave_start_radius` - Distance from the start waypoint the car must exceed before finish
/// line crossings are honored
/// * `min_crossing_speed` - (units/tick) Minimum speed for a valid finish line crossing
/// * `no_laps` - Number of laps of the race (single-lap races only)
/// * `collision_model` - Track bounds check (`corridor` or `containment`)
#[derive(Debug, Deserialize, Clone)]
pub struct RacePars {
    pub leave_start_radius: f64,
    pub min_crossing_speed: f64,
    pub no_laps: u32,
    #[serde(default)]
    pub collision_model: CollisionModel,
}

/// RaceEvent is emitted exactly once per transition into a terminal state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaceEvent {
    Finished { lap_time: f64, is_new_best: bool },
    Crashed { elapsed: f64 },
}

/// Race is the simulation context. It owns the car and the race session, reads the shared track,
/// and is advanced by exactly one caller, once per time step.
#[derive(Debug)]
pub struct Race {
    pub timestep_size: f64,
    pub cur_racetime: f64,
    pub no_ticks: u64,
    pub track: Arc<Track>,
    pub car: Car,
    pub sh: RaceSession,
    pub reset_count: u32,
    lap_tracker: LapTracker,
    collision_model: CollisionModel,
    best_time: Option<f64>,
    best_time_store: Box<dyn BestTimeStore>,
    effects: Vec<EffectEvent>,
    outcome: Option<RaceEvent>,
}

impl Race {
    pub fn new(
        race_pars: &RacePars,
        car_pars: &CarPars,
        track: Arc<Track>,
        timestep_size: f64,
        best_time_store: Box<dyn BestTimeStore>,
    ) -> Race {
        // read best time (a broken store is treated like a missing best time)
        let best_time = match best_time_store.load() {
            Ok(best_time) => best_time,
            Err(e) => {
                warn!("Could not load best time, starting without one: {:#}", e);
                None
            }
        };

        let lap_tracker = LapTracker::new(
            track.start_point,
            Vector2d::from_angle(track.start_pose.angle),
            race_pars.leave_start_radius,
            race_pars.min_crossing_speed,
            race_pars.no_laps,
        );

        Race {
            timestep_size,
            cur_racetime: 0.0,
            no_ticks: 0,
            car: Car::new(car_pars, &track.start_pose),
            track,
            sh: RaceSession::default(),
            reset_count: 0,
            lap_tracker,
            collision_model: race_pars.collision_model,
            best_time,
            best_time_store,
            effects: vec![],
            outcome: None,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// The method simulates one time step. Execution order:
    /// 1. Increment the discretization variable (cur_racetime).
    /// 2. Handle reset and start requests of the input snapshot.
    /// 3. Stop here if the race is in a terminal state (car and timer are frozen).
    /// 4. Update the elapsed time of an active race.
    /// 5. Advance the car state (accelerating only while the race is active).
    /// 6. Check the track bounds -> a car off track crashes.
    /// 7. Check the finish line -> a valid crossing after a full lap finishes the race.
    ///
    /// The method returns the terminal event if the race ended within this time step.
    pub fn simulate_timestep(&mut self, input: &InputSnapshot) -> Option<RaceEvent> {
        // increment discretization variable
        self.cur_racetime += self.timestep_size;
        self.no_ticks += 1;

        // handle state transitions requested by the input collaborator
        if input.reset_requested {
            self.reset_race();
        }
        if input.start_requested {
            self.start_race();
        }

        if self.sh.is_completed() {
            return None;
        }

        // update timer and car
        self.sh.update_elapsed(self.cur_racetime);

        let accelerate =
            self.sh.is_active() && (self.car.auto_accelerate || input.control.throttle);
        self.car.advance(
            &input.control,
            accelerate,
            self.timestep_size,
            &mut self.effects,
        );

        if !self.sh.is_active() {
            return None;
        }

        // check track bounds
        if !self.collision_model.is_on_track(&self.car.pos, &self.track) {
            self.sh.crash();
            self.effects
                .push(EffectEvent::CrashBurst { pos: self.car.pos });

            let event = RaceEvent::Crashed {
                elapsed: self.sh.elapsed,
            };
            info!(
                "Car crashed at ({:.1}, {:.1}) after {:.2}s",
                self.car.pos.x, self.car.pos.y, self.sh.elapsed
            );
            self.outcome = Some(event);
            return Some(event);
        }

        // check finish line
        let finish_check = self.lap_tracker.check_finish(
            &self.car.prev_pos,
            &self.car.pos,
            self.car.speed,
            &self.track.finish_line,
            &self.sh,
        );

        if finish_check.left_start_area && !self.sh.has_left_start_area {
            debug!("Car left the start area after {:.2}s", self.sh.elapsed);
        }
        if finish_check.crossed {
            debug!(
                "Car crossed the finish line after {:.2}s (lap {})",
                self.sh.elapsed,
                self.sh.lap_count + 1
            );
        }

        self.sh.apply_finish_check(&finish_check);

        if finish_check.lap_complete && self.sh.finish() {
            let lap_time = self.sh.elapsed;
            let is_new_best = self.record_lap_time(lap_time);
            let event = RaceEvent::Finished {
                lap_time,
                is_new_best,
            };
            info!(
                "Race finished with a lap time of {:.2}s{}",
                lap_time,
                if is_new_best { " (new best time)" } else { "" }
            );
            self.outcome = Some(event);
            return Some(event);
        }

        None
    }

    // ---------------------------------------------------------------------------------------------
    // STATE TRANSITIONS ---------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// The method starts the race if it is inert (ignored otherwise).
    pub fn start_race(&mut self) {
        if self.sh.start(self.cur_racetime) {
            info!("Race started");
        }
    }

    /// The method returns the race from any state to the inert state with the car in its canonical
    /// start pose. Pending visual effects are discarded.
    pub fn reset_race(&mut self) {
        self.car.reset(&self.track.start_pose);
        self.sh.reset();
        self.effects.clear();
        self.outcome = None;
        self.reset_count += 1;
        info!("Race reset");
    }

    /// The method compares the lap time with the best time and persists it if it is better (or if
    /// no best time exists yet). It returns true for a new best time.
    pub fn record_lap_time(&mut self, lap_time: f64) -> bool {
        let is_new_best = match self.best_time {
            Some(best_time) => lap_time < best_time,
            None => true,
        };

        if is_new_best {
            self.best_time = Some(lap_time);

            if let Err(e) = self.best_time_store.save(lap_time) {
                warn!("Could not save best time: {:#}", e);
            }
        }

        is_new_best
    }

    // ---------------------------------------------------------------------------------------------
    // GETTERS -------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn get_best_time(&self) -> Option<f64> {
        self.best_time
    }

    /// The method returns the terminal event of the current attempt (kept until reset).
    pub fn get_outcome(&self) -> Option<RaceEvent> {
        self.outcome
    }

    /// The method hands the visual effects collected since the previous call to the caller.
    pub fn drain_effects(&mut self) -> Vec<EffectEvent> {
        std::mem::take(&mut self.effects)
    }

    pub fn get_race_result(&self, driver_label: &str) -> RaceResult {
        let outcome = match self.outcome {
            Some(RaceEvent::Finished {
                lap_time,
                is_new_best,
            }) => RaceOutcome::Finished {
                lap_time,
                is_new_best,
            },
            Some(RaceEvent::Crashed { elapsed }) => RaceOutcome::Crashed { elapsed },
            None => RaceOutcome::Unfinished {
                elapsed: self.sh.elapsed,
            },
        };

        RaceResult {
            driver_label: driver_label.to_owned(),
            outcome,
            best_time: self.best_time,
            no_ticks: self.no_ticks,
        }
    }
}
