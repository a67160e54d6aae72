use crate::core::car::EffectEvent;
use crate::core::driver::Driver;
use crate::core::race::Race;
use crate::core::track::Track;
use crate::interfaces::gui_interface::{CarState, RaceState, RgbColor, MAX_GUI_UPDATE_FREQUENCY};
use crate::interfaces::input::{ControlSignal, GuiCommand, InputSnapshot};
use crate::interfaces::storage::BestTimeStore;
use crate::post::race_result::RaceResult;
use crate::pre::read_sim_pars::GamePars;
use anyhow::Context;
use flume::{Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// handle_race creates a race on the basis of the inserted parameters and lets the autopilot
/// driver race it until it crashes, finishes or max_race_time is reached. It returns the result
/// for post-processing.
pub fn handle_race(
    game_pars: &GamePars,
    track: Arc<Track>,
    driver: &mut Driver,
    timestep_size: f64,
    max_race_time: f64,
    best_time_store: Box<dyn BestTimeStore>,
) -> RaceResult {
    let mut race = Race::new(
        &game_pars.race_pars,
        &game_pars.car_pars,
        track,
        timestep_size,
        best_time_store,
    );

    while !race.sh.is_completed() && race.cur_racetime < max_race_time {
        let input = driver.get_input(&race);
        race.simulate_timestep(&input);

        // nobody renders the effects in a headless run
        race.drain_effects();
    }

    if !race.sh.is_completed() {
        debug!(
            "{} did not complete the race within {:.1}s",
            driver.label, max_race_time
        );
    }

    race.get_race_result(&driver.label)
}

/// handle_race_realtime simulates the race in real-time for the GUI. Control messages are
/// received via rx and folded into one input snapshot per time step, the race state is sent via
/// tx. The loop runs until the GUI hangs up.
pub fn handle_race_realtime(
    game_pars: &GamePars,
    track: Arc<Track>,
    timestep_size: f64,
    realtime_factor: f64,
    best_time_store: Box<dyn BestTimeStore>,
    rx: &Receiver<GuiCommand>,
    tx: &Sender<RaceState>,
) -> anyhow::Result<()> {
    let mut race = Race::new(
        &game_pars.race_pars,
        &game_pars.car_pars,
        track,
        timestep_size,
        best_time_store,
    );

    // convert hex color to a rgb color
    let tmp_color = race
        .car
        .color
        .parse::<css_color_parser::Color>()
        .context("Could not parse hex color!")?;
    let color = RgbColor {
        r: tmp_color.r,
        g: tmp_color.g,
        b: tmp_color.b,
    };

    let t_timestep = Duration::from_secs_f64(race.timestep_size / realtime_factor);
    let mut control = ControlSignal::default();
    let mut pending_effects = vec![];
    let mut last_reset_count = race.reset_count;
    let mut t_race_update_print = 0.0;
    let mut t_race_update_gui = 0.0;

    info!("Real-time simulation started");

    loop {
        let t_start = Instant::now();

        // collect all commands that arrived since the previous time step
        let mut commands = vec![];

        loop {
            match rx.try_recv() {
                Ok(command) => commands.push(command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("GUI disconnected, stopping real-time simulation");
                    return Ok(());
                }
            }
        }

        let input = InputSnapshot::from_commands(control, commands);
        control = input.control;

        // simulate time step
        let event = race.simulate_timestep(&input);

        if race.reset_count != last_reset_count {
            pending_effects.clear();
            last_reset_count = race.reset_count;
        }
        pending_effects.append(&mut race.drain_effects());

        // print status (with a maximum of 1 Hz)
        if race.sh.is_active() && race.cur_racetime > t_race_update_print + 0.9999 {
            debug!(
                "Simulating... Current lap time is {:.3}s, car speed is {:.2}",
                race.sh.elapsed, race.car.speed
            );
            t_race_update_print = race.cur_racetime;
        }

        // update GUI (terminal events are always sent immediately)
        if event.is_some()
            || race.cur_racetime > t_race_update_gui + 1.0 / MAX_GUI_UPDATE_FREQUENCY - 0.001
        {
            let race_state = get_race_state(&race, color, std::mem::take(&mut pending_effects));

            if tx.send(race_state).is_err() {
                info!("GUI disconnected, stopping real-time simulation");
                return Ok(());
            }
            t_race_update_gui = race.cur_racetime;
        }

        // sleep until time step is finished in real-time as well
        match t_timestep.checked_sub(t_start.elapsed()) {
            Some(t_sleep) => sleep(t_sleep),
            None => warn!("Could not keep up with real-time!"),
        }
    }
}

/// get_race_state creates the snapshot of the current race that is published to the GUI.
pub fn get_race_state(race: &Race, color: RgbColor, effects: Vec<EffectEvent>) -> RaceState {
    RaceState {
        car_state: CarState {
            pos: race.car.pos,
            angle: race.car.angle,
            drift: race.car.drift,
            wheel_angle: race.car.wheel_angle,
            speed: race.car.speed,
            speed_ratio: race.car.get_speed_ratio(),
            color,
        },
        state: race.sh.get_state(),
        lap_count: race.sh.lap_count,
        elapsed: race.sh.elapsed,
        best_time: race.get_best_time(),
        max_speed: race.car.get_max_speed(),
        reset_count: race.reset_count,
        effects,
        outcome: race.get_outcome(),
    }
}
