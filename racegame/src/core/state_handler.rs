use crate::core::lap_tracker::FinishCheck;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Inert,
    Active,
    Crashed,
    Finished,
}

impl Default for State {
    fn default() -> Self {
        State::Inert
    }
}

/// RaceSession contains the statemachine of a race attempt and its bookkeeping (lap count,
/// timing, start area guard).
///
/// Possible statemachine states:
/// * `Inert` -> waiting for the first control input, timer stands at zero
/// * `Active` -> race is running, the elapsed time is updated every time step
/// * `Crashed` -> terminal, car left the track
/// * `Finished` -> terminal, car crossed the finish line after a full lap
///
/// The terminal states can only be left by a reset, which returns the session to `Inert`.
#[derive(Debug, Clone, Default)]
pub struct RaceSession {
    state: State,
    pub lap_count: u32,
    pub start_timestamp: f64,
    pub elapsed: f64,
    pub has_left_start_area: bool,
}

impl RaceSession {
    pub fn get_state(&self) -> State {
        self.state
    }
    pub fn is_active(&self) -> bool {
        self.state == State::Active
    }
    pub fn is_completed(&self) -> bool {
        matches!(self.state, State::Crashed | State::Finished)
    }

    /// The method starts the race at the inserted time stamp. It returns false if the session was
    /// not inert.
    pub fn start(&mut self, now: f64) -> bool {
        if self.state != State::Inert {
            return false;
        }
        self.state = State::Active;
        self.start_timestamp = now;
        self.elapsed = 0.0;
        self.lap_count = 0;
        true
    }

    /// The method recalculates the elapsed time. The timer is frozen outside of state `Active`.
    pub fn update_elapsed(&mut self, now: f64) {
        if self.state == State::Active {
            self.elapsed = now - self.start_timestamp;
        }
    }

    /// The method applies the result of a finish line check. The lap count is only increased
    /// while the race is active.
    pub fn apply_finish_check(&mut self, check: &FinishCheck) {
        if check.left_start_area {
            self.has_left_start_area = true;
        }
        if check.crossed && self.state == State::Active {
            self.lap_count += 1;
        }
    }

    pub fn crash(&mut self) -> bool {
        self.terminate(State::Crashed)
    }

    pub fn finish(&mut self) -> bool {
        self.terminate(State::Finished)
    }

    fn terminate(&mut self, state: State) -> bool {
        if self.state != State::Active {
            return false;
        }
        self.state = state;
        true
    }

    pub fn reset(&mut self) {
        *self = RaceSession::default();
    }
}
