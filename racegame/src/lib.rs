pub mod core;
pub mod interfaces;
pub mod post;
pub mod pre;

#[cfg(test)]
mod test_utils {
    use crate::core::car::{CarPars, REFERENCE_TIMESTEP};
    use crate::core::race::Race;
    use crate::core::track::{Track, TrackPars};
    use crate::interfaces::storage::MemoryStore;
    use crate::pre::read_sim_pars::{read_game_pars, GamePars};
    use helpers::geometry::Point2d;
    use std::path::Path;
    use std::sync::Arc;

    pub fn get_game_pars() -> GamePars {
        read_game_pars(Path::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../input/parameters/pars_speed_racer.json"
        )))
        .unwrap()
    }

    pub fn get_track() -> Arc<Track> {
        Arc::new(Track::new(&get_game_pars().track_pars).unwrap())
    }

    pub fn create_race(best_time: Option<f64>) -> Race {
        let game_pars = get_game_pars();
        Race::new(
            &game_pars.race_pars,
            &game_pars.car_pars,
            get_track(),
            REFERENCE_TIMESTEP,
            Box::new(MemoryStore::new(best_time)),
        )
    }

    pub fn get_square_track_pars() -> TrackPars {
        TrackPars {
            name: String::from("Square"),
            waypoints: vec![
                Point2d::new(0.0, 0.0),
                Point2d::new(400.0, 0.0),
                Point2d::new(400.0, 400.0),
                Point2d::new(0.0, 400.0),
            ],
            track_width: 80.0,
            collision_margin: 5.0,
            curb_inset: 10.0,
            start_idx: 0,
            start_offset: 80.0,
            finish_line_half_length: None,
        }
    }

    pub fn get_car_pars() -> CarPars {
        get_game_pars().car_pars
    }
}


#[cfg(test)]
mod car_tests {
    use crate::core::car::{Car, EffectEvent, REFERENCE_TIMESTEP};
    use crate::core::track::StartPose;
    use crate::interfaces::input::ControlSignal;
    use crate::test_utils::get_car_pars;
    use approx::{assert_abs_diff_eq, assert_ulps_eq};
    use helpers::geometry::Point2d;

    fn create_car() -> Car {
        Car::new(
            &get_car_pars(),
            &StartPose {
                pos: Point2d::new(0.0, 0.0),
                angle: 0.0,
            },
        )
    }

    #[test]
    fn test_car_standstill_does_not_steer() {
        let mut car = create_car();
        let mut effects = vec![];
        car.advance(
            &ControlSignal::new(true, false, 0.0, false),
            false,
            REFERENCE_TIMESTEP,
            &mut effects,
        );

        assert_ulps_eq!(car.angle, 0.0);
        assert_eq!(car.pos, Point2d::new(0.0, 0.0));
        assert_ulps_eq!(car.wheel_angle, -0.4);
        assert!(effects.is_empty());
    }
    #[test]
    fn test_car_accelerate() {
        let mut car = create_car();
        car.advance(
            &ControlSignal::default(),
            true,
            REFERENCE_TIMESTEP,
            &mut vec![],
        );

        assert_ulps_eq!(car.speed, 0.08);
        assert_ulps_eq!(car.pos.x, 0.08);
        assert_eq!(car.prev_pos, Point2d::new(0.0, 0.0));
    }
    #[test]
    fn test_car_max_speed() {
        let mut car = create_car();
        car.speed = 6.95;
        car.advance(
            &ControlSignal::default(),
            true,
            REFERENCE_TIMESTEP,
            &mut vec![],
        );

        assert_ulps_eq!(car.speed, 7.0);
        assert_ulps_eq!(car.get_speed_ratio(), 1.0);
    }
    #[test]
    fn test_car_coast() {
        let mut car = create_car();
        car.speed = 5.0;
        car.advance(
            &ControlSignal::default(),
            false,
            REFERENCE_TIMESTEP,
            &mut vec![],
        );

        assert_ulps_eq!(car.speed, 4.9);
    }
    #[test]
    fn test_car_steer_and_drift_build_up() {
        let mut car = create_car();
        car.speed = 7.0;
        let mut effects = vec![];
        car.advance(
            &ControlSignal::new(false, true, 0.0, false),
            true,
            REFERENCE_TIMESTEP,
            &mut effects,
        );

        assert_ulps_eq!(car.angle, 0.065);
        assert_abs_diff_eq!(car.drift, 0.015 * 0.94, epsilon = 1e-12);

        // drift is still too small for smoke, but the car is fast enough for speed lines
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], EffectEvent::SpeedLine { .. }));
    }
    #[test]
    fn test_car_drift_effects() {
        let mut car = create_car();
        car.speed = 7.0;
        car.drift = 0.2;
        let mut effects = vec![];
        car.advance(
            &ControlSignal::new(false, true, 0.0, false),
            true,
            REFERENCE_TIMESTEP,
            &mut effects,
        );

        assert_abs_diff_eq!(car.drift, 0.215 * 0.94, epsilon = 1e-12);
        assert!(effects
            .iter()
            .any(|e| matches!(e, EffectEvent::TireSmoke { .. })));
        assert!(effects
            .iter()
            .any(|e| matches!(e, EffectEvent::SkidMark { .. })));
    }
    #[test]
    fn test_car_drift_release() {
        let mut car = create_car();
        car.speed = 7.0;
        car.drift = 0.2;
        car.advance(
            &ControlSignal::default(),
            true,
            REFERENCE_TIMESTEP,
            &mut vec![],
        );

        assert_abs_diff_eq!(car.drift, 0.18, epsilon = 1e-12);

        // the direction of travel includes the drift
        assert_abs_diff_eq!(car.pos.x, 7.0 * 0.18_f64.cos(), epsilon = 1e-9);
        assert_abs_diff_eq!(car.pos.y, 7.0 * 0.18_f64.sin(), epsilon = 1e-9);
    }
    #[test]
    fn test_car_analog_dead_zone() {
        let mut car = create_car();
        car.speed = 3.0;
        car.advance(
            &ControlSignal::from_analog(0.05),
            false,
            REFERENCE_TIMESTEP,
            &mut vec![],
        );
        assert_ulps_eq!(car.angle, 0.0);

        car.advance(
            &ControlSignal::from_analog(-0.5),
            false,
            REFERENCE_TIMESTEP,
            &mut vec![],
        );
        assert!(car.angle < 0.0);
    }
    #[test]
    fn test_car_timestep_scaling() {
        let mut car_a = create_car();
        let mut car_b = create_car();
        car_a.speed = 5.0;
        car_b.speed = 5.0;

        car_a.advance(
            &ControlSignal::default(),
            false,
            REFERENCE_TIMESTEP,
            &mut vec![],
        );
        for _ in 0..2 {
            car_b.advance(
                &ControlSignal::default(),
                false,
                REFERENCE_TIMESTEP / 2.0,
                &mut vec![],
            );
        }

        assert_abs_diff_eq!(car_a.speed, car_b.speed, epsilon = 1e-12);
    }
    #[test]
    fn test_car_reset() {
        let mut car = create_car();
        car.speed = 5.0;
        car.drift = 0.3;
        car.pos = Point2d::new(10.0, 20.0);
        car.reset(&StartPose {
            pos: Point2d::new(1.0, 2.0),
            angle: 0.5,
        });

        assert_eq!(car.pos, Point2d::new(1.0, 2.0));
        assert_eq!(car.prev_pos, Point2d::new(1.0, 2.0));
        assert_ulps_eq!(car.angle, 0.5);
        assert_ulps_eq!(car.speed, 0.0);
        assert_ulps_eq!(car.drift, 0.0);
    }
}


#[cfg(test)]
mod state_handler_tests {
    use crate::core::lap_tracker::FinishCheck;
    use crate::core::state_handler::{RaceSession, State};
    use approx::assert_ulps_eq;

    #[test]
    fn test_state_handler_start_only_from_inert() {
        let mut sh = RaceSession::default();
        assert_eq!(sh.get_state(), State::Inert);

        assert!(sh.start(2.0));
        assert!(sh.is_active());
        assert!(!sh.start(3.0));
        assert_ulps_eq!(sh.start_timestamp, 2.0);
    }
    #[test]
    fn test_state_handler_terminal_states() {
        let mut sh = RaceSession::default();
        assert!(!sh.crash());
        assert!(!sh.finish());

        sh.start(0.0);
        assert!(sh.crash());
        assert!(sh.is_completed());
        assert!(!sh.finish());
        assert_eq!(sh.get_state(), State::Crashed);
    }
    #[test]
    fn test_state_handler_timer_frozen() {
        let mut sh = RaceSession::default();
        sh.update_elapsed(5.0);
        assert_ulps_eq!(sh.elapsed, 0.0);

        sh.start(1.0);
        sh.update_elapsed(3.5);
        assert_ulps_eq!(sh.elapsed, 2.5);

        sh.finish();
        sh.update_elapsed(10.0);
        assert_ulps_eq!(sh.elapsed, 2.5);
    }
    #[test]
    fn test_state_handler_apply_finish_check() {
        let mut sh = RaceSession::default();
        let check = FinishCheck {
            left_start_area: true,
            crossed: true,
            lap_complete: true,
        };

        // crossings do not count while inert
        sh.apply_finish_check(&check);
        assert!(sh.has_left_start_area);
        assert_eq!(sh.lap_count, 0);

        sh.start(0.0);
        sh.apply_finish_check(&check);
        assert_eq!(sh.lap_count, 1);
    }
    #[test]
    fn test_state_handler_reset() {
        let mut sh = RaceSession::default();
        sh.start(1.0);
        sh.update_elapsed(4.0);
        sh.has_left_start_area = true;
        sh.crash();
        sh.reset();

        assert_eq!(sh.get_state(), State::Inert);
        assert_ulps_eq!(sh.elapsed, 0.0);
        assert!(!sh.has_left_start_area);
        assert_eq!(sh.lap_count, 0);
    }
}



#[cfg(test)]
mod storage_tests {
    use crate::core::car::REFERENCE_TIMESTEP;
    use crate::core::race::Race;
    use crate::interfaces::storage::{BestTimeStore, FileStore, BEST_TIME_KEY};
    use crate::test_utils::{get_game_pars, get_track};
    use approx::assert_ulps_eq;
    use std::fs;

    #[test]
    fn test_storage_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
    }
    #[test]
    fn test_storage_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(&dir.path().join("nested"));
        store.save(12.34).unwrap();

        assert_ulps_eq!(store.load().unwrap().unwrap(), 12.34);
        assert_eq!(
            fs::read_to_string(dir.path().join("nested").join(BEST_TIME_KEY)).unwrap(),
            "12.34"
        );
    }
    #[test]
    fn test_storage_invalid_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        fs::write(store.get_filepath(), "fast").unwrap();
        assert!(store.load().is_err());

        fs::write(store.get_filepath(), "-3.0").unwrap();
        assert!(store.load().is_err());
    }
    #[test]
    fn test_storage_race_ignores_broken_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::write(store.get_filepath(), "garbage").unwrap();

        let game_pars = get_game_pars();
        let mut race = Race::new(
            &game_pars.race_pars,
            &game_pars.car_pars,
            get_track(),
            REFERENCE_TIMESTEP,
            Box::new(store),
        );
        assert!(race.get_best_time().is_none());

        // a new lap time overwrites the unusable content
        assert!(race.record_lap_time(20.5));
        assert_ulps_eq!(
            FileStore::new(dir.path()).load().unwrap().unwrap(),
            20.5
        );
    }
}


#[cfg(test)]
mod driver_tests {
    use crate::core::car::REFERENCE_TIMESTEP;
    use crate::core::driver::{Driver, DriverPars};
    use crate::core::handle_race::handle_race;
    use crate::interfaces::storage::MemoryStore;
    use crate::post::race_result::RaceOutcome;
    use crate::test_utils::{create_race, get_game_pars, get_track};
    use approx::{assert_abs_diff_eq, assert_ulps_eq};

    #[test]
    fn test_driver_sweep_gains() {
        let driver_pars = DriverPars {
            lookahead: 120.0,
            steer_gain: 2.0,
        };
        let gains: Vec<f64> = Driver::sweep(&driver_pars, 3)
            .iter()
            .map(|driver| driver.get_steer_gain())
            .collect();
        assert_ulps_eq!(gains[0], 1.0);
        assert_ulps_eq!(gains[1], 2.0);
        assert_ulps_eq!(gains[2], 3.0);

        assert_ulps_eq!(Driver::sweep(&driver_pars, 1)[0].get_steer_gain(), 2.0);
    }
    #[test]
    fn test_driver_requests_start_once() {
        let race = create_race(None);
        let mut driver = Driver::new("test", &get_game_pars().driver_pars);

        let input = driver.get_input(&race);
        assert!(input.start_requested);
        assert!(input.control.throttle);

        // car points straight along the centerline at the start
        assert_abs_diff_eq!(input.control.analog_steer, 0.0, epsilon = 1e-9);

        assert!(!driver.get_input(&race).start_requested);
    }
    #[test]
    fn test_handle_race_max_race_time() {
        let game_pars = get_game_pars();
        let mut driver = Driver::new("test", &game_pars.driver_pars);
        let race_result = handle_race(
            &game_pars,
            get_track(),
            &mut driver,
            REFERENCE_TIMESTEP,
            0.5,
            Box::new(MemoryStore::default()),
        );

        assert!(matches!(race_result.outcome, RaceOutcome::Unfinished { .. }));
        assert!(race_result.no_ticks >= 30);
    }
    #[test]
    fn test_handle_race_autopilot_completes_lap() {
        let game_pars = get_game_pars();
        let mut driver = Driver::new("test", &game_pars.driver_pars);
        let race_result = handle_race(
            &game_pars,
            get_track(),
            &mut driver,
            REFERENCE_TIMESTEP,
            120.0,
            Box::new(MemoryStore::default()),
        );

        match race_result.outcome {
            RaceOutcome::Finished {
                lap_time,
                is_new_best,
            } => {
                assert!(5.0 < lap_time && lap_time < 7.0);
                assert!(is_new_best);
            }
            _ => panic!("Autopilot did not finish the lap: {:?}", race_result.outcome),
        }
    }
}

#[cfg(test)]
mod handle_race_realtime_tests {
    use crate::core::car::REFERENCE_TIMESTEP;
    use crate::core::handle_race::handle_race_realtime;
    use crate::core::state_handler::State;
    use crate::interfaces::input::GuiCommand;
    use crate::interfaces::storage::MemoryStore;
    use crate::test_utils::{get_game_pars, get_track};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_handle_race_realtime_start_and_disconnect() {
        let (tx_command, rx_command) = flume::unbounded();
        let (tx_state, rx_state) = flume::unbounded();
        tx_command.send(GuiCommand::Start).unwrap();

        let game_pars = get_game_pars();
        let track = get_track();
        let handle = thread::spawn(move || {
            handle_race_realtime(
                &game_pars,
                track,
                REFERENCE_TIMESTEP,
                10.0,
                Box::new(MemoryStore::default()),
                &rx_command,
                &tx_state,
            )
        });

        let race_state = rx_state.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(race_state.state, State::Active);
        assert_eq!(race_state.car_state.color.r, 255);

        // hanging up the command channel stops the loop
        drop(tx_command);
        assert!(handle.join().unwrap().is_ok());
    }
}

#[cfg(test)]
mod pre_tests {
    use crate::core::track::Track;
    use crate::pre::check_sim_opts_pars::check_sim_opts_pars;
    use crate::pre::read_sim_pars::read_track_csv;
    use crate::pre::sim_opts::SimOpts;
    use crate::test_utils::get_game_pars;
    use clap::Parser;
    use helpers::geometry::Point2d;
    use std::path::Path;

    #[test]
    fn test_check_sim_opts_pars_defaults() {
        let sim_opts = SimOpts::parse_from(["racegame"]);
        assert!(check_sim_opts_pars(&sim_opts, &get_game_pars()).is_ok());
    }
    #[test]
    fn test_check_sim_opts_pars_invalid_opts() {
        let game_pars = get_game_pars();

        let sim_opts = SimOpts::parse_from(["racegame", "-t", "0.5"]);
        assert!(check_sim_opts_pars(&sim_opts, &game_pars).is_err());

        let sim_opts = SimOpts::parse_from(["racegame", "-g", "-n", "2"]);
        assert!(check_sim_opts_pars(&sim_opts, &game_pars).is_err());

        let sim_opts = SimOpts::parse_from(["racegame", "-g", "-r", "20.0"]);
        assert!(check_sim_opts_pars(&sim_opts, &game_pars).is_err());
    }
    #[test]
    fn test_check_sim_opts_pars_invalid_pars() {
        let sim_opts = SimOpts::parse_from(["racegame"]);

        let mut game_pars = get_game_pars();
        game_pars.race_pars.no_laps = 2;
        assert!(check_sim_opts_pars(&sim_opts, &game_pars).is_err());

        let mut game_pars = get_game_pars();
        game_pars.car_pars.friction = 1.5;
        assert!(check_sim_opts_pars(&sim_opts, &game_pars).is_err());
    }
    #[test]
    fn test_read_track_csv() {
        let waypoints = read_track_csv(Path::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../input/tracks/oval.csv"
        )))
        .unwrap();
        assert_eq!(waypoints.len(), 32);
        assert_eq!(waypoints[0], Point2d::new(500.0, 520.0));

        let mut track_pars = get_game_pars().track_pars;
        track_pars.waypoints = waypoints;
        assert!(Track::new(&track_pars).is_ok());
    }
    #[test]
    fn test_read_track_csv_missing_file() {
        assert!(read_track_csv(Path::new("does/not/exist.csv")).is_err());
    }
}

#[cfg(test)]
mod race_result_tests {
    use crate::post::race_result::{format_time, print_results, RaceOutcome, RaceResult};

    #[test]
    fn test_race_result_format_time() {
        assert_eq!(format_time(None), "--:--");
        assert_eq!(format_time(Some(12.3)), "12.30s");
    }
    #[test]
    fn test_race_result_lap_time() {
        let finished = RaceResult {
            driver_label: String::from("a"),
            outcome: RaceOutcome::Finished {
                lap_time: 5.5,
                is_new_best: true,
            },
            best_time: Some(5.5),
            no_ticks: 330,
        };
        let crashed = RaceResult {
            driver_label: String::from("b"),
            outcome: RaceOutcome::Crashed { elapsed: 2.0 },
            best_time: None,
            no_ticks: 120,
        };

        assert_eq!(finished.get_lap_time(), Some(5.5));
        assert_eq!(crashed.get_lap_time(), None);
        print_results(&[finished, crashed]);
    }
}
