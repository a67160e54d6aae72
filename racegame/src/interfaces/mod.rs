pub mod gui_interface;
pub mod input;
pub mod storage;
