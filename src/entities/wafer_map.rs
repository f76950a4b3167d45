//! Wafer map - die grid layout and simulated pass/fail sampling
//!
//! The map lays square dies of side `sqrt(die_area)` on a grid anchored at
//! the wafer's bounding box and keeps every cell whose centre falls inside
//! the wafer. It is a visualization aid: the count is independent from
//! [`crate::model::gross_dies`] and may differ from it.
//!
//! Each site is drawn good or bad with one Bernoulli trial at the yield
//! rate. The random source is supplied by the caller, so a seeded RNG gives
//! a reproducible map.

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

/// Largest grid side (in cells) the map will lay out
pub const MAX_GRID_DIM: usize = 2000;

#[derive(Debug, Error, miette::Diagnostic)]
pub enum WaferMapError {
    #[error("Wafer map grid would be {columns} cells wide (limit {limit})")]
    #[diagnostic(
        code(ym::map::too_dense),
        help("Increase the die area or reduce the wafer diameter for the map view")
    )]
    GridTooDense { columns: usize, limit: usize },
}

/// One grid cell on the wafer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DieSite {
    /// Grid column (x index)
    pub column: usize,

    /// Grid row (y index)
    pub row: usize,

    /// Die centre relative to the wafer centre, mm
    pub center_x_mm: f64,

    /// Die centre relative to the wafer centre, mm
    pub center_y_mm: f64,
}

/// Outcome of sampling a die
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DieState {
    Good,
    Bad,
}

/// Die placement for a wafer
#[derive(Debug, Clone)]
pub struct WaferMap {
    diameter_mm: f64,
    pitch_mm: f64,
    columns: usize,
    sites: Vec<DieSite>,
}

impl WaferMap {
    /// Lay out dies for a wafer of `diameter_mm` with dies of `die_area_mm2`
    ///
    /// Non-positive or non-finite geometry gives an empty map.
    pub fn layout(diameter_mm: f64, die_area_mm2: f64) -> Result<Self, WaferMapError> {
        let pitch = die_area_mm2.sqrt();
        let radius = diameter_mm / 2.0;

        let usable = pitch.is_finite() && pitch > 0.0 && radius.is_finite() && radius > 0.0;
        if !usable {
            return Ok(Self {
                diameter_mm,
                pitch_mm: pitch,
                columns: 0,
                sites: Vec::new(),
            });
        }

        // Cells start at -r and step by the pitch while still left of +r
        let span = (2.0 * radius / pitch).ceil();
        if span > MAX_GRID_DIM as f64 {
            return Err(WaferMapError::GridTooDense {
                columns: span as usize,
                limit: MAX_GRID_DIM,
            });
        }
        let columns = span as usize;

        let mut sites = Vec::new();
        for row in 0..columns {
            let center_y = -radius + row as f64 * pitch + pitch / 2.0;
            for column in 0..columns {
                let center_x = -radius + column as f64 * pitch + pitch / 2.0;
                if center_x.hypot(center_y) <= radius {
                    sites.push(DieSite {
                        column,
                        row,
                        center_x_mm: center_x,
                        center_y_mm: center_y,
                    });
                }
            }
        }

        Ok(Self {
            diameter_mm,
            pitch_mm: pitch,
            columns,
            sites,
        })
    }

    pub fn diameter_mm(&self) -> f64 {
        self.diameter_mm
    }

    /// Die side length in mm
    pub fn pitch_mm(&self) -> f64 {
        self.pitch_mm
    }

    /// Grid side length in cells (the grid is square)
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn sites(&self) -> &[DieSite] {
        &self.sites
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Draw every site good with probability `yield_rate`
    ///
    /// Yields outside `[0, 1]` are accepted: at or below 0 every die fails,
    /// at or above 1 every die passes.
    pub fn sample<R: Rng + ?Sized>(&self, yield_rate: f64, rng: &mut R) -> SampledWafer<'_> {
        let states = self
            .sites
            .iter()
            .map(|_| {
                let u: f64 = rng.random();
                if u < yield_rate {
                    DieState::Good
                } else {
                    DieState::Bad
                }
            })
            .collect();

        SampledWafer { map: self, states }
    }
}

/// A wafer map with one sampled state per site
#[derive(Debug, Clone)]
pub struct SampledWafer<'a> {
    map: &'a WaferMap,
    states: Vec<DieState>,
}

impl<'a> SampledWafer<'a> {
    pub fn map(&self) -> &'a WaferMap {
        self.map
    }

    pub fn states(&self) -> &[DieState] {
        &self.states
    }

    /// Sites paired with their sampled state
    pub fn dies(&self) -> impl Iterator<Item = (&DieSite, DieState)> + '_ {
        self.map.sites.iter().zip(self.states.iter().copied())
    }

    pub fn good_count(&self) -> usize {
        self.states.iter().filter(|s| **s == DieState::Good).count()
    }

    pub fn bad_count(&self) -> usize {
        self.states.len() - self.good_count()
    }

    /// Fraction of sampled dies that passed (0 for an empty map)
    pub fn observed_yield(&self) -> f64 {
        if self.states.is_empty() {
            0.0
        } else {
            self.good_count() as f64 / self.states.len() as f64
        }
    }

    /// Dense grid, row-major; `None` marks cells off the wafer
    pub fn grid(&self) -> Vec<Vec<Option<DieState>>> {
        let n = self.map.columns;
        let mut grid = vec![vec![None; n]; n];
        for (site, state) in self.dies() {
            grid[site.row][site.column] = Some(state);
        }
        grid
    }

    /// Plain-text rendering: `#` good, `x` bad, space off-wafer
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in self.grid() {
            let line: String = row
                .iter()
                .map(|cell| match cell {
                    Some(DieState::Good) => '#',
                    Some(DieState::Bad) => 'x',
                    None => ' ',
                })
                .collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_small_grid_all_inside() {
        // r = 10, pitch 10: four cells centred at (±5, ±5)
        let map = WaferMap::layout(20.0, 100.0).unwrap();
        assert_eq!(map.columns(), 2);
        assert_eq!(map.site_count(), 4);
    }

    #[test]
    fn test_grid_is_anchored_not_centred() {
        // r = 14, pitch 10: centres at -9, 1, 11 on both axes
        let map = WaferMap::layout(28.0, 100.0).unwrap();
        assert_eq!(map.columns(), 3);
        assert_eq!(map.site_count(), 6);
        assert!(!map
            .sites()
            .iter()
            .any(|s| s.center_x_mm > 10.0 && s.center_y_mm > 10.0));
    }

    #[test]
    fn test_reference_wafer_close_to_gross_count() {
        let map = WaferMap::layout(300.0, 100.0).unwrap();
        assert_eq!(map.columns(), 30);
        assert!(map.sites().iter().all(|s| s.center_x_mm.hypot(s.center_y_mm) <= 150.0));
        // Symmetric grid: every quadrant holds the same number of dies
        assert_eq!(map.site_count() % 4, 0);
        let gross = crate::model::gross_dies(300.0, 100.0, 0.0) as i64;
        assert!((map.site_count() as i64 - gross).abs() < 40);
    }

    #[test]
    fn test_degenerate_geometry_is_empty() {
        for (diameter, area) in [(0.0, 100.0), (300.0, 0.0), (-300.0, 100.0), (300.0, -4.0)] {
            let map = WaferMap::layout(diameter, area).unwrap();
            assert_eq!(map.site_count(), 0, "{diameter} / {area}");
            assert_eq!(map.columns(), 0);
        }
    }

    #[test]
    fn test_too_dense_grid_is_rejected() {
        let err = WaferMap::layout(300.0, 0.0001).unwrap_err();
        assert!(matches!(err, WaferMapError::GridTooDense { .. }));
    }

    #[test]
    fn test_sampling_extremes() {
        let map = WaferMap::layout(300.0, 100.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let all_good = map.sample(1.0, &mut rng);
        assert_eq!(all_good.good_count(), map.site_count());

        let all_bad = map.sample(0.0, &mut rng);
        assert_eq!(all_bad.good_count(), 0);
        assert_eq!(all_bad.bad_count(), map.site_count());

        let negative = map.sample(-0.5, &mut rng);
        assert_eq!(negative.good_count(), 0);
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let map = WaferMap::layout(300.0, 100.0).unwrap();
        let a = map.sample(0.6, &mut StdRng::seed_from_u64(42));
        let b = map.sample(0.6, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.states(), b.states());
    }

    #[test]
    fn test_observed_yield_tracks_rate() {
        let map = WaferMap::layout(300.0, 4.0).unwrap();
        let sampled = map.sample(0.6, &mut StdRng::seed_from_u64(1));
        assert!((sampled.observed_yield() - 0.6).abs() < 0.05);
    }

    #[test]
    fn test_text_rendering() {
        let map = WaferMap::layout(28.0, 100.0).unwrap();
        let sampled = map.sample(1.0, &mut StdRng::seed_from_u64(0));
        assert_eq!(sampled.to_text(), "##\n###\n #\n");
    }
}
