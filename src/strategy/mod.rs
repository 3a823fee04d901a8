//! Move-selection strategy.
//!
//! The selector balances exploitation (revisit a cell that has paid well)
//! against exploration (sweep forward through unseen territory at a fixed
//! stride).

pub mod selector;

pub use selector::{CellSelector, SelectorConfig};
