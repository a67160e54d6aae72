pub mod effects;
pub mod gui;
