//! YieldMaster: wafer yield and die economics
//!
//! Estimates die yield with Poisson, Murphy and negative binomial defect
//! models, counts gross and good dies on a wafer, and turns wafer cost into
//! cost per good die. The [`model`] functions are pure; [`entities`] wraps
//! them into scenarios, sweeps and simulated wafer maps for the `ym` CLI.

pub mod cli;
pub mod core;
pub mod entities;
pub mod model;
pub mod schema;
pub mod yaml;
