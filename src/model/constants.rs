//! Shared numeric constants for the yield and die model
//!
//! The neutral defaults are identities: passing them reproduces the plain
//! (uncorrected) form of every formula.

/// Square millimetres per square centimetre. Die areas are given in mm²,
/// defect densities in defects/cm².
pub const MM2_PER_CM2: f64 = 100.0;

/// Fraction of the die area that is sensitive to fatal defects
pub const DEFAULT_PATTERN_DENSITY: f64 = 1.0;

/// Systematic yield ceiling
pub const DEFAULT_PROCESS_MATURITY: f64 = 1.0;

/// Unusable rim width in mm
pub const DEFAULT_EDGE_EXCLUSION_MM: f64 = 0.0;

/// Fab utilization used to spread the wafer cost
pub const DEFAULT_FAB_UTILIZATION: f64 = 1.0;

/// Convert an area in mm² to cm²
pub fn mm2_to_cm2(area_mm2: f64) -> f64 {
    area_mm2 / MM2_PER_CM2
}
