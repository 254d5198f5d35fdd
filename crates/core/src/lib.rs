//! Domain layer for the study planner: validated entities, interval
//! semantics, and pure progress/time-window aggregations.

#![forbid(unsafe_code)]

pub mod model;
pub mod stats;
pub mod time;

pub use time::Clock;
