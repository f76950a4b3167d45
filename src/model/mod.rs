//! Yield & die model - pure functions over explicit parameters
//!
//! Every function here is synchronous and side-effect free. Degenerate
//! inputs produce sentinel values (usually 0) instead of errors.

pub mod constants;
pub mod economics;
pub mod geometry;
pub mod repair;
pub mod yield_model;

pub use economics::cost_per_good_die;
pub use geometry::{efficiency, effective_diameter, good_dies, gross_dies, usable_wafer_area};
pub use repair::effective_yield;
pub use yield_model::{compute_yield, compute_yield_adjusted, YieldModel};
