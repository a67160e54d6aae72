use clap::Parser;
use gui::core::gui::RacePlot;
use racegame::core::driver::Driver;
use racegame::core::handle_race::{handle_race, handle_race_realtime};
use racegame::core::track::Track;
use racegame::interfaces::storage::{BestTimeStore, FileStore, MemoryStore};
use racegame::post::race_result::{print_results, RaceResult};
use racegame::pre::check_sim_opts_pars::check_sim_opts_pars;
use racegame::pre::read_sim_pars::{read_game_pars, read_track_csv};
use racegame::pre::sim_opts::SimOpts;
use rayon::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::filter::EnvFilter;

// set maximum number of concurrently running jobs in case of running more than a single simulation
const MAX_NO_CONCURRENT_JOBS: usize = 200;

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments and set up logging
    let sim_opts: SimOpts = SimOpts::parse();

    let log_level = if sim_opts.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(log_level.into()))
        .init();

    // read game parameters (the waypoints can be replaced by a track file)
    let mut game_pars = read_game_pars(sim_opts.parfile_path.as_path())?;

    if let Some(trackfile_path) = &sim_opts.trackfile_path {
        game_pars.track_pars.waypoints = read_track_csv(trackfile_path)?;
        info!(
            "Loaded {} waypoints from {}",
            game_pars.track_pars.waypoints.len(),
            trackfile_path.display()
        );
    }

    // check simulation options and parameters, and create the track (shared by all races)
    check_sim_opts_pars(&sim_opts, &game_pars)?;
    let track = Arc::new(Track::new(&game_pars.track_pars)?);

    info!(
        "Simulating {} (centerline length {:.0}) with a time step size of {:.4}s",
        track.name, track.length, sim_opts.timestep_size
    );

    let file_store = FileStore::new(&sim_opts.best_time_dir);

    // EXECUTION -----------------------------------------------------------------------------------
    if !sim_opts.gui {
        // NON-GUI CASE ----------------------------------------------------------------------------
        // autopilot runs compare against the stored best time but never overwrite it
        let best_time = match file_store.load() {
            Ok(best_time) => best_time,
            Err(e) => {
                warn!("Could not load best time: {:#}", e);
                None
            }
        };

        let t_start = Instant::now();
        let mut drivers = Driver::sweep(&game_pars.driver_pars, sim_opts.no_sim_runs);
        let mut race_results: Vec<RaceResult> = Vec::with_capacity(drivers.len());

        if drivers.len() == 1 {
            // SINGLE THREAD -----------------------------------------------------------------------
            race_results.push(handle_race(
                &game_pars,
                Arc::clone(&track),
                &mut drivers[0],
                sim_opts.timestep_size,
                sim_opts.max_race_time,
                Box::new(MemoryStore::new(best_time)),
            ));
        } else {
            // MULTIPLE THREADS --------------------------------------------------------------------
            for drivers_chunk in drivers.chunks_mut(MAX_NO_CONCURRENT_JOBS) {
                race_results.par_extend(drivers_chunk.par_iter_mut().map(|driver| {
                    handle_race(
                        &game_pars,
                        Arc::clone(&track),
                        driver,
                        sim_opts.timestep_size,
                        sim_opts.max_race_time,
                        Box::new(MemoryStore::new(best_time)),
                    )
                }));
            }
        }

        info!(
            "Execution time (total): {}ms",
            t_start.elapsed().as_millis()
        );

        // POST-PROCESSING -------------------------------------------------------------------------
        print_results(&race_results);
    } else {
        // GUI CASE --------------------------------------------------------------------------------
        // create channels for the communication between GUI and simulation
        let (tx_state, rx_state) = flume::unbounded();
        let (tx_command, rx_command) = flume::unbounded();

        // create a separate thread for the simulation (executed in real-time)
        let game_pars_thread = game_pars.clone();
        let track_thread = Arc::clone(&track);
        let timestep_size = sim_opts.timestep_size;
        let realtime_factor = sim_opts.realtime_factor;

        let _ = thread::spawn(move || {
            if let Err(e) = handle_race_realtime(
                &game_pars_thread,
                track_thread,
                timestep_size,
                realtime_factor,
                Box::new(file_store),
                &rx_command,
                &tx_state,
            ) {
                error!("Real-time simulation failed: {:#}", e);
            }
        });

        // start GUI (must be done in the main thread)
        let gui = RacePlot::new(rx_state, tx_command, track);
        let native_options = eframe::NativeOptions::default();
        eframe::run_native(Box::new(gui), native_options);
    }

    Ok(())
}
