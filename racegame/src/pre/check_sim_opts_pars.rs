use crate::pre::read_sim_pars::GamePars;
use crate::pre::sim_opts::SimOpts;
use anyhow::Context;
use helpers::general::InputValueError;

/// check_sim_opts_pars assures that the inserted options and parameters are within reasonable
/// limits and raises an error if not. The track geometry itself is checked when the track is
/// created.
pub fn check_sim_opts_pars(sim_opts: &SimOpts, game_pars: &GamePars) -> anyhow::Result<()> {
    // PART 1: SIMULATION OPTIONS
    if !(0.001 <= sim_opts.timestep_size && sim_opts.timestep_size <= 0.1) {
        return Err(InputValueError).context(format!(
            "timestep_size is {:.3}s, which is not within the reasonable range of [0.001, 0.1]s!",
            sim_opts.timestep_size
        ));
    }

    if sim_opts.no_sim_runs < 1 {
        return Err(InputValueError).context(format!(
            "no_sim_runs must be at least equal to one, but is {}!",
            sim_opts.no_sim_runs
        ));
    }

    if sim_opts.gui && sim_opts.no_sim_runs != 1 {
        return Err(InputValueError)
            .context("If gui is activated, no_sim_runs must be equal to one!");
    }

    if sim_opts.gui && !(0.1 <= sim_opts.realtime_factor && sim_opts.realtime_factor <= 10.0) {
        return Err(InputValueError).context(format!(
            "realtime_factor is {:.3}, which is not within the reasonable range of [0.1, 10.0]!",
            sim_opts.realtime_factor
        ));
    }

    if !(sim_opts.max_race_time > 0.0) {
        return Err(InputValueError).context(format!(
            "max_race_time is {:.3}s, but must be positive!",
            sim_opts.max_race_time
        ));
    }

    // PART 2: GAME PARAMETERS
    // CAR -----------------------------------------------------------------------------------------
    let car_pars = &game_pars.car_pars;

    if !(car_pars.max_speed > 0.0 && car_pars.acceleration > 0.0 && car_pars.turn_speed > 0.0) {
        return Err(InputValueError)
            .context("max_speed, acceleration and turn_speed of the car must be positive!");
    }
    if !(0.0 < car_pars.friction && car_pars.friction <= 1.0) {
        return Err(InputValueError).context(format!(
            "friction is {:.3}, which is not within the required range (0.0, 1.0]!",
            car_pars.friction
        ));
    }
    if !(0.0 < car_pars.drift_factor && car_pars.drift_factor <= 1.0) {
        return Err(InputValueError).context(format!(
            "drift_factor is {:.3}, which is not within the required range (0.0, 1.0]!",
            car_pars.drift_factor
        ));
    }

    // RACE ----------------------------------------------------------------------------------------
    let race_pars = &game_pars.race_pars;

    if race_pars.no_laps != 1 {
        return Err(InputValueError).context(format!(
            "no_laps is {}, but only single-lap races are supported!",
            race_pars.no_laps
        ));
    }
    if !(race_pars.leave_start_radius > 0.0) {
        return Err(InputValueError).context("leave_start_radius must be positive!");
    }
    if !(race_pars.min_crossing_speed >= 0.0) {
        return Err(InputValueError).context("min_crossing_speed must not be negative!");
    }

    // DRIVER --------------------------------------------------------------------------------------
    if !(game_pars.driver_pars.lookahead > 0.0 && game_pars.driver_pars.steer_gain > 0.0) {
        return Err(InputValueError)
            .context("lookahead and steer_gain of the autopilot driver must be positive!");
    }

    Ok(())
}
