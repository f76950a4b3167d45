//! Repair-adjusted yield
//!
//! Redundancy is modelled by shrinking the fatal area: a defect that lands
//! in the repairable share of the die is assumed to be fixed.

use super::yield_model::compute_yield;
use crate::entities::scenario::ProcessParameters;

/// Yield after redundancy repair of `repair_pct` percent of the die area
///
/// Pattern density and process maturity are not applied on
/// either branch; the repair estimate uses the plain model.
/// `repair_pct` above 100 gives a negative fatal area and is passed through.
pub fn effective_yield(params: &ProcessParameters, repair_pct: f64) -> f64 {
    if repair_pct.is_nan() || repair_pct <= 0.0 {
        return compute_yield(params.model, params.d0, params.die_area_mm2, params.alpha);
    }

    let fatal_area = params.die_area_mm2 * (1.0 - repair_pct / 100.0);
    compute_yield(params.model, params.d0, fatal_area, params.alpha)
}
