pub mod car;
pub mod collision;
pub mod driver;
pub mod handle_race;
pub mod lap_tracker;
pub mod race;
pub mod state_handler;
pub mod track;
