pub mod config;
pub mod day_clock;
pub mod daylight;
pub mod gate;
