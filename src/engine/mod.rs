//! Core engine — the init → move → feedback run loop.

pub mod runner;

pub use runner::Robot;
