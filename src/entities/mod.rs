//! Entity type definitions
//!
//! Value records exchanged between the yield model and its consumers:
//!
//! - [`Scenario`] - process parameters plus repair and cost inputs, evaluated
//!   into a [`WaferSummary`]
//! - [`WaferMap`] - die grid layout with simulated pass/fail sampling
//! - [`Sweep`] - yield curves for every model across one parameter

pub mod scenario;
pub mod sweep;
pub mod wafer_map;

pub use scenario::{ProcessParameters, Scenario, ScenarioError, WaferSummary};
pub use sweep::{Sweep, SweepPoint, SweepVariable, MAX_SWEEP_STEPS};
pub use wafer_map::{DieSite, DieState, SampledWafer, WaferMap, WaferMapError};
