//! Yield economics - cost per good die (CPGD)

/// Cost per good die, spreading the wafer cost over the good dies
///
/// A fab running below full utilization carries its fixed costs on fewer
/// wafers, so the effective wafer cost is `wafer_cost / fab_utilization`.
/// Non-positive utilization falls back to the raw wafer cost. Returns 0 when
/// there are no good dies.
pub fn cost_per_good_die(wafer_cost: f64, good_dies: u64, fab_utilization: f64) -> f64 {
    if good_dies == 0 {
        return 0.0;
    }

    let effective_wafer_cost = if fab_utilization > 0.0 {
        wafer_cost / fab_utilization
    } else {
        wafer_cost
    };

    effective_wafer_cost / good_dies as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_per_good_die() {
        assert_eq!(cost_per_good_die(5000.0, 500, 1.0), 10.0);
        assert_eq!(cost_per_good_die(4280.0, 428, 1.0), 10.0);
    }

    #[test]
    fn test_no_good_dies_is_zero() {
        assert_eq!(cost_per_good_die(5000.0, 0, 1.0), 0.0);
        assert_eq!(cost_per_good_die(5000.0, 0, 0.0), 0.0);
    }

    #[test]
    fn test_low_utilization_raises_cost() {
        assert_eq!(cost_per_good_die(5000.0, 500, 0.5), 20.0);
        assert!(cost_per_good_die(5000.0, 500, 0.8) > cost_per_good_die(5000.0, 500, 1.0));
    }

    #[test]
    fn test_non_positive_utilization_uses_raw_cost() {
        let raw = cost_per_good_die(5000.0, 500, 1.0);
        assert_eq!(cost_per_good_die(5000.0, 500, 0.0), raw);
        assert_eq!(cost_per_good_die(5000.0, 500, -0.3), raw);
    }
}
