// Service module exports

pub mod background;
pub mod canvas;
pub mod classifier;
pub mod container;
pub mod event_index;
pub mod icalendar;
pub mod layout;
pub mod month_index;
pub mod output;
pub mod stats;
pub mod wallpaper;
