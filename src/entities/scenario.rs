//! Scenario entity - process parameters for a single-wafer yield snapshot
//!
//! A scenario is an immutable record of everything the yield model needs.
//! It is read from YAML, overridden from the command line and evaluated into
//! a [`WaferSummary`]; nothing about it is stored between runs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::constants::{
    DEFAULT_EDGE_EXCLUSION_MM, DEFAULT_FAB_UTILIZATION, DEFAULT_PATTERN_DENSITY,
    DEFAULT_PROCESS_MATURITY,
};
use crate::model::{
    compute_yield_adjusted, cost_per_good_die, effective_yield, efficiency, good_dies, gross_dies,
    YieldModel,
};
use crate::yaml::diagnostics::YamlSyntaxError;

/// 300 mm wafer
pub const DEFAULT_DIAMETER_MM: f64 = 300.0;

/// 10 × 10 mm die
pub const DEFAULT_DIE_AREA_MM2: f64 = 100.0;

/// Defects per cm²
pub const DEFAULT_D0: f64 = 0.5;

/// Negative binomial cluster factor
pub const DEFAULT_ALPHA: f64 = 2.0;

/// Wafer and defect parameters consumed by the yield model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessParameters {
    /// Wafer diameter in mm
    pub diameter_mm: f64,

    /// Die area in mm²
    pub die_area_mm2: f64,

    /// Defect density in defects/cm²
    pub d0: f64,

    /// Cluster factor for the negative binomial model
    pub alpha: f64,

    /// Yield model
    pub model: YieldModel,

    /// Critical-area ratio (0-1)
    pub pattern_density: f64,

    /// Systematic yield ceiling (0-1)
    pub process_maturity: f64,

    /// Unusable rim width in mm
    pub edge_exclusion_mm: f64,
}

impl Default for ProcessParameters {
    fn default() -> Self {
        Self {
            diameter_mm: DEFAULT_DIAMETER_MM,
            die_area_mm2: DEFAULT_DIE_AREA_MM2,
            d0: DEFAULT_D0,
            alpha: DEFAULT_ALPHA,
            model: YieldModel::default(),
            pattern_density: DEFAULT_PATTERN_DENSITY,
            process_maturity: DEFAULT_PROCESS_MATURITY,
            edge_exclusion_mm: DEFAULT_EDGE_EXCLUSION_MM,
        }
    }
}

impl ProcessParameters {
    /// Die yield for these parameters, with every correction applied
    pub fn yield_rate(&self) -> f64 {
        compute_yield_adjusted(
            self.model,
            self.d0,
            self.die_area_mm2,
            self.alpha,
            self.pattern_density,
            self.process_maturity,
        )
    }

    /// Gross die count after edge exclusion
    pub fn gross_dies(&self) -> u64 {
        gross_dies(self.diameter_mm, self.die_area_mm2, self.edge_exclusion_mm)
    }

    /// True when the edge exclusion leaves no usable wafer
    pub fn is_degenerate(&self) -> bool {
        self.diameter_mm <= 2.0 * self.edge_exclusion_mm
    }
}

/// Process parameters plus the optional repair and cost inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    #[serde(flatten)]
    pub process: ProcessParameters,

    /// Share of the die area covered by redundancy repair, in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair_pct: Option<f64>,

    /// Cost of one processed wafer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wafer_cost: Option<f64>,

    /// Fab utilization (0-1)
    pub fab_utilization: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            process: ProcessParameters::default(),
            repair_pct: None,
            wafer_cost: None,
            fab_utilization: DEFAULT_FAB_UTILIZATION,
        }
    }
}

/// Errors reading a scenario file
#[derive(Debug, Error, miette::Diagnostic)]
pub enum ScenarioError {
    #[error("Cannot read scenario file {path}")]
    #[diagnostic(code(ym::scenario::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] YamlSyntaxError),
}

impl Scenario {
    /// Parse a scenario from YAML. Missing fields take their defaults.
    pub fn from_yaml(source: &str, filename: &str) -> Result<Self, YamlSyntaxError> {
        serde_yml::from_str(source)
            .map_err(|e| YamlSyntaxError::from_serde_error(&e, source, filename))
    }

    /// Load a scenario file
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_yaml(&content, &path.display().to_string())?)
    }

    /// Apply the fields present in a YAML document on top of this scenario.
    ///
    /// Keys missing from the document keep their current value instead of
    /// falling back to the built-in defaults.
    pub fn overlay_yaml(&self, source: &str, filename: &str) -> Result<Self, YamlSyntaxError> {
        if source.trim().is_empty() {
            return Ok(self.clone());
        }

        let to_err = |e: serde_yml::Error| YamlSyntaxError::from_serde_error(&e, source, filename);
        let overlay: serde_yml::Value = serde_yml::from_str(source).map_err(to_err)?;
        if overlay.is_null() {
            return Ok(self.clone());
        }

        // Parse once as a scenario so type errors and non-mapping documents
        // carry a source location
        Self::from_yaml(source, filename)?;
        let serde_yml::Value::Mapping(overlay) = overlay else {
            return Ok(self.clone());
        };

        let mut merged = match serde_yml::to_value(self).map_err(to_err)? {
            serde_yml::Value::Mapping(map) => map,
            _ => serde_yml::Mapping::new(),
        };
        for (key, value) in overlay {
            merged.insert(key, value);
        }
        serde_yml::from_value(serde_yml::Value::Mapping(merged)).map_err(to_err)
    }

    /// Load a scenario file on top of this scenario
    pub fn load_over(&self, path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.overlay_yaml(&content, &path.display().to_string())?)
    }

    /// The same scenario under a different yield model
    pub fn with_model(&self, model: YieldModel) -> Self {
        let mut scenario = self.clone();
        scenario.process.model = model;
        scenario
    }

    /// Run the full model: yield, die counts, efficiency, repair and cost
    pub fn evaluate(&self) -> WaferSummary {
        let p = &self.process;

        let yield_rate = p.yield_rate();
        let total_dies = p.gross_dies();
        let good = good_dies(total_dies, yield_rate);
        let efficiency = efficiency(
            total_dies,
            p.die_area_mm2,
            p.diameter_mm,
            p.edge_exclusion_mm,
        );

        WaferSummary {
            model: p.model,
            yield_rate,
            total_dies,
            good_dies: good,
            efficiency,
            effective_yield: self.repair_pct.map(|pct| effective_yield(p, pct)),
            cost_per_good_die: self
                .wafer_cost
                .map(|cost| cost_per_good_die(cost, good, self.fab_utilization)),
        }
    }

    /// Evaluate the scenario under every known model
    pub fn compare_models(&self) -> Vec<WaferSummary> {
        YieldModel::KNOWN
            .iter()
            .map(|&model| self.with_model(model).evaluate())
            .collect()
    }
}

/// Result of evaluating a scenario, at full precision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaferSummary {
    /// Model the summary was computed with
    pub model: YieldModel,

    /// Die yield (0-1)
    pub yield_rate: f64,

    /// Gross dies on the wafer
    pub total_dies: u64,

    /// Expected defect-free dies
    pub good_dies: u64,

    /// Die area / usable wafer area
    pub efficiency: f64,

    /// Repair-adjusted yield, when a repair percentage was given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_yield: Option<f64>,

    /// Cost per good die, when a wafer cost was given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_good_die: Option<f64>,
}

impl WaferSummary {
    /// Dies expected to fail
    pub fn bad_dies(&self) -> u64 {
        self.total_dies.saturating_sub(self.good_dies)
    }
}
