//! Parameter sweeps - yield curves for every model across one variable
//!
//! A sweep holds the scenario fixed, varies a single parameter over an
//! evenly spaced range and records the yield under each model together with
//! the die counts for the scenario's own model. The rows feed charts and
//! CSV exports.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::scenario::{ProcessParameters, Scenario};
use crate::model::{compute_yield_adjusted, effective_yield, good_dies, gross_dies, YieldModel};

/// Most points a single sweep will evaluate
pub const MAX_SWEEP_STEPS: usize = 100_000;

/// Parameter varied by a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SweepVariable {
    /// Defect density (defects/cm²)
    D0,
    /// Die area (mm²)
    DieArea,
    /// Repairable share of the die (%)
    Repair,
    /// Edge exclusion width (mm)
    EdgeExclusion,
}

impl SweepVariable {
    pub fn label(&self) -> &'static str {
        match self {
            SweepVariable::D0 => "d0",
            SweepVariable::DieArea => "die_area_mm2",
            SweepVariable::Repair => "repair_pct",
            SweepVariable::EdgeExclusion => "edge_exclusion_mm",
        }
    }
}

impl std::fmt::Display for SweepVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sweep definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sweep {
    pub variable: SweepVariable,
    pub start: f64,
    pub end: f64,
    pub steps: usize,
}

/// One row of a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Value of the swept variable
    pub value: f64,

    /// Poisson yield
    pub poisson: f64,

    /// Murphy yield
    pub murphy: f64,

    /// Negative binomial yield
    pub negative_binomial: f64,

    /// Gross dies at this value
    pub gross_dies: u64,

    /// Good dies under the scenario's model
    pub good_dies: u64,
}

impl Sweep {
    pub fn new(variable: SweepVariable, start: f64, end: f64, steps: usize) -> Self {
        Self {
            variable,
            start,
            end,
            steps,
        }
    }

    /// Evenly spaced values from `start` to `end` inclusive
    pub fn values(&self) -> Vec<f64> {
        match self.steps {
            0 => Vec::new(),
            1 => vec![self.start],
            n => {
                let step = (self.end - self.start) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        if i == n - 1 {
                            self.end
                        } else {
                            self.start + step * i as f64
                        }
                    })
                    .collect()
            }
        }
    }

    /// Evaluate the sweep against a base scenario
    pub fn run(&self, base: &Scenario) -> Vec<SweepPoint> {
        self.values()
            .into_iter()
            .map(|value| self.point(base, value))
            .collect()
    }

    fn point(&self, base: &Scenario, value: f64) -> SweepPoint {
        let mut scenario = base.clone();
        match self.variable {
            SweepVariable::D0 => scenario.process.d0 = value,
            SweepVariable::DieArea => scenario.process.die_area_mm2 = value,
            SweepVariable::Repair => scenario.repair_pct = Some(value),
            SweepVariable::EdgeExclusion => scenario.process.edge_exclusion_mm = value,
        }

        let p = &scenario.process;
        let yield_for = |model: YieldModel| match self.variable {
            SweepVariable::Repair => {
                let params = ProcessParameters {
                    model,
                    ..p.clone()
                };
                effective_yield(&params, value)
            }
            _ => compute_yield_adjusted(
                model,
                p.d0,
                p.die_area_mm2,
                p.alpha,
                p.pattern_density,
                p.process_maturity,
            ),
        };

        let gross = gross_dies(p.diameter_mm, p.die_area_mm2, p.edge_exclusion_mm);

        SweepPoint {
            value,
            poisson: yield_for(YieldModel::Poisson),
            murphy: yield_for(YieldModel::Murphy),
            negative_binomial: yield_for(YieldModel::NegativeBinomial),
            gross_dies: gross,
            good_dies: good_dies(gross, yield_for(p.model)),
        }
    }
}
