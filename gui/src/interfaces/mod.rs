pub mod racegame_interface;
