//! Defect-limited yield models
//!
//! All models take the mean number of fatal defects per die
//! (`D0 × critical area`) and return the probability that a die survives.
//! Supports Poisson, the Murphy closed-form approximation and the negative
//! binomial (Seeds) clustering model.
//!
//! Nothing here validates its inputs: negative densities, zero cluster
//! factors or out-of-range fractions flow through the floating-point
//! arithmetic and produce whatever the formula yields.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

use super::constants::{mm2_to_cm2, DEFAULT_PATTERN_DENSITY, DEFAULT_PROCESS_MATURITY};

/// Defect-density model used to turn `D0 × A` into a yield
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YieldModel {
    /// Random, unclustered defects: `Y = e^(-D0·A)`
    #[default]
    Poisson,
    /// Murphy approximation: `Y = (1 / (1 + D0·A))²`
    Murphy,
    /// Negative binomial / Seeds: `Y = (1 + D0·A/α)^(-α)`
    #[serde(
        rename = "nb",
        alias = "negative-binomial",
        alias = "negative_binomial",
        alias = "seeds"
    )]
    NegativeBinomial,
    /// Any unrecognised identifier; always yields zero
    #[serde(other)]
    Unknown,
}

impl YieldModel {
    /// The models that produce a meaningful yield, in display order
    pub const KNOWN: [YieldModel; 3] = [
        YieldModel::Poisson,
        YieldModel::Murphy,
        YieldModel::NegativeBinomial,
    ];

    /// Short identifier used in files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            YieldModel::Poisson => "poisson",
            YieldModel::Murphy => "murphy",
            YieldModel::NegativeBinomial => "nb",
            YieldModel::Unknown => "unknown",
        }
    }

    /// Human readable model name
    pub fn label(&self) -> &'static str {
        match self {
            YieldModel::Poisson => "Poisson",
            YieldModel::Murphy => "Murphy",
            YieldModel::NegativeBinomial => "Negative Binomial",
            YieldModel::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, YieldModel::Unknown)
    }

    /// Probability of a die escaping random defects, given the expected
    /// number of fatal defects per die (`product = D0·A`).
    ///
    /// `alpha` is only read by the negative binomial model.
    pub fn random_yield(&self, product: f64, alpha: f64) -> f64 {
        match self {
            YieldModel::Poisson => (-product).exp(),
            YieldModel::Murphy => {
                if product == 0.0 {
                    1.0
                } else {
                    (1.0 / (1.0 + product)).powi(2)
                }
            }
            YieldModel::NegativeBinomial => (1.0 + product / alpha).powf(-alpha),
            YieldModel::Unknown => 0.0,
        }
    }
}

impl std::fmt::Display for YieldModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for YieldModel {
    type Err = Infallible;

    /// Never fails: unrecognised identifiers map to [`YieldModel::Unknown`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "poisson" => YieldModel::Poisson,
            "murphy" => YieldModel::Murphy,
            "nb" | "negative-binomial" | "negative_binomial" | "seeds" => {
                YieldModel::NegativeBinomial
            }
            _ => YieldModel::Unknown,
        })
    }
}

/// Die yield with neutral pattern density and process maturity
pub fn compute_yield(model: YieldModel, d0: f64, area_mm2: f64, alpha: f64) -> f64 {
    compute_yield_adjusted(
        model,
        d0,
        area_mm2,
        alpha,
        DEFAULT_PATTERN_DENSITY,
        DEFAULT_PROCESS_MATURITY,
    )
}

/// Die yield including critical-area and systematic-yield corrections
///
/// * `d0` - defect density in defects/cm²
/// * `area_mm2` - die area in mm²
/// * `alpha` - cluster factor (negative binomial only)
/// * `pattern_density` - fraction of the die that is defect sensitive
/// * `process_maturity` - systematic yield ceiling, applied multiplicatively
pub fn compute_yield_adjusted(
    model: YieldModel,
    d0: f64,
    area_mm2: f64,
    alpha: f64,
    pattern_density: f64,
    process_maturity: f64,
) -> f64 {
    let critical_area_cm2 = mm2_to_cm2(area_mm2 * pattern_density);
    let product = d0 * critical_area_cm2;

    model.random_yield(product, alpha) * process_maturity
}
