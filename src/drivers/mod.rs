//! Consumer tasks and the output devices they drive, plus task spawning.

pub mod alarm;
pub mod display;
pub mod indicator;
pub mod matrix;
pub mod task_pin;
