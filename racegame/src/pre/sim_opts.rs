use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "racegame",
    about = "A top-down single-lap racing game with a time-discrete physics core"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging
    #[clap(short, long)]
    pub debug: bool,

    /// Activate GUI (race is then played in real-time with the inserted real-time factor)
    #[clap(short, long)]
    pub gui: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set number of headless autopilot runs (must be one in case the GUI is activated)
    #[clap(short, long, default_value = "1")]
    pub no_sim_runs: u32,

    /// Set path to the game parameter file
    #[clap(short, long, default_value = "input/parameters/pars_speed_racer.json")]
    pub parfile_path: PathBuf,

    /// Set path to a track CSV file (columns x_m, y_m) replacing the waypoints of the parameter
    /// file
    #[clap(long)]
    pub trackfile_path: Option<PathBuf>,

    /// Set real-time factor (only relevant in case the GUI is activated)
    #[clap(short, long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set simulation timestep size in seconds, should be in the range [0.001, 0.1]
    #[clap(short, long, default_value = "0.016666666666666666")]
    pub timestep_size: f64,

    /// Set maximum race time in seconds after which a headless run is aborted
    #[clap(short, long, default_value = "120.0")]
    pub max_race_time: f64,

    /// Set directory in which the best lap time is stored
    #[clap(short, long, default_value = ".racegame")]
    pub best_time_dir: PathBuf,
}
