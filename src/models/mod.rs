// Module exports for models

pub mod calendar_source;
pub mod color;
pub mod config;
pub mod day_status;
pub mod geometry;
pub mod month_slot;
