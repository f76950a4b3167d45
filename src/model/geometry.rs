//! Die geometry - gross/good die counts and wafer area utilization
//!
//! Gross dies are a plain area ratio (usable wafer area / die area); no
//! grid-packing loss is modelled. Counts are floored so that the number of
//! good dies can never exceed the gross count for yields in `[0, 1]`.

use std::f64::consts::PI;

/// Wafer diameter left after removing the edge exclusion ring on both sides
pub fn effective_diameter(diameter_mm: f64, edge_exclusion_mm: f64) -> f64 {
    diameter_mm - 2.0 * edge_exclusion_mm
}

/// Usable wafer area in mm², or `None` for a degenerate wafer
pub fn usable_wafer_area(diameter_mm: f64, edge_exclusion_mm: f64) -> Option<f64> {
    let diameter = effective_diameter(diameter_mm, edge_exclusion_mm);
    if diameter <= 0.0 {
        return None;
    }

    let radius = diameter / 2.0;
    Some(PI * radius.powi(2))
}

/// Estimate the gross number of dies on a wafer
///
/// Returns 0 when the edge exclusion consumes the whole wafer. A ratio that
/// is not a finite, non-negative number (zero or negative die area) also
/// counts as no dies.
pub fn gross_dies(diameter_mm: f64, die_area_mm2: f64, edge_exclusion_mm: f64) -> u64 {
    let Some(wafer_area) = usable_wafer_area(diameter_mm, edge_exclusion_mm) else {
        return 0;
    };

    let ratio = (wafer_area / die_area_mm2).floor();
    if !ratio.is_finite() || ratio < 0.0 {
        return 0;
    }
    ratio as u64
}

/// Expected number of defect-free dies
///
/// Always floors; negative or NaN products saturate to 0.
pub fn good_dies(gross_dies: u64, yield_rate: f64) -> u64 {
    (gross_dies as f64 * yield_rate).floor() as u64
}

/// Ratio of total die area to usable wafer area
///
/// `gross_dies` is taken as given and not re-derived, so callers must pass
/// a count computed for the same geometry.
pub fn efficiency(
    gross_dies: u64,
    die_area_mm2: f64,
    diameter_mm: f64,
    edge_exclusion_mm: f64,
) -> f64 {
    let Some(wafer_area) = usable_wafer_area(diameter_mm, edge_exclusion_mm) else {
        return 0.0;
    };
    if wafer_area == 0.0 {
        return 0.0;
    }

    (gross_dies as f64 * die_area_mm2) / wafer_area
}
