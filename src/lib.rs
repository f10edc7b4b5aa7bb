//! Experiment Inspector: load a long-format CSV of experiment metrics and
//! reshape it into per-metric series for side-by-side comparison.
//!
//! The `data` module is the UI-independent core. `state` and `color` hold
//! the viewer state consumed by the egui front end in the binary.

pub mod color;
pub mod data;
pub mod state;
