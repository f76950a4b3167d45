//! Configuration management with layered hierarchy
//!
//! Sources, lowest priority first:
//! 1. Built-in defaults
//! 2. Global user config (`~/.config/ym/config.yaml`)
//! 3. Project config (nearest `.ym/config.yaml` above the working directory)
//! 4. `YM_*` environment variables
//!
//! Config values only seed a scenario; scenario files and command-line
//! flags still override them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::entities::Scenario;
use crate::model::YieldModel;

/// Directory holding project-level configuration
pub const PROJECT_DIR: &str = ".ym";

/// Width of the text wafer map when not configured
pub const DEFAULT_MAP_COLUMNS: usize = 120;

/// Layered configuration
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default yield model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<YieldModel>,

    /// Default cluster factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,

    /// Default edge exclusion in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_exclusion_mm: Option<f64>,

    /// Default wafer cost
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wafer_cost: Option<f64>,

    /// Default fab utilization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fab_utilization: Option<f64>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Widest wafer map (in die columns) drawn in the terminal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_columns: Option<usize>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut paths = Vec::new();
        paths.extend(Self::global_config_path());
        paths.extend(Self::project_config_path(&cwd));

        let mut config = Self::load_files(&paths);
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Merge the given files in order; missing or invalid files are skipped
    pub fn load_files(paths: &[PathBuf]) -> Self {
        let mut config = Config::default();

        for path in paths {
            if !path.exists() {
                continue;
            }
            if let Ok(contents) = std::fs::read_to_string(path) {
                if let Ok(layer) = serde_yml::from_str::<Config>(&contents) {
                    config.merge(layer);
                }
            }
        }

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "ym")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Find the nearest project config by walking up from `start`
    pub fn project_config_path(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(PROJECT_DIR).join("config.yaml");
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Apply `YM_*` overrides using the given variable lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("YM_MODEL") {
            // Parsing never fails; unknown names become YieldModel::Unknown
            self.model = model.parse().ok();
        }
        if let Some(alpha) = lookup("YM_ALPHA").and_then(|v| v.parse().ok()) {
            self.alpha = Some(alpha);
        }
        if let Some(cost) = lookup("YM_WAFER_COST").and_then(|v| v.parse().ok()) {
            self.wafer_cost = Some(cost);
        }
        if let Some(util) = lookup("YM_FAB_UTILIZATION").and_then(|v| v.parse().ok()) {
            self.fab_utilization = Some(util);
        }
        if let Some(format) = lookup("YM_FORMAT") {
            self.default_format = Some(format);
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.model.is_some() {
            self.model = other.model;
        }
        if other.alpha.is_some() {
            self.alpha = other.alpha;
        }
        if other.edge_exclusion_mm.is_some() {
            self.edge_exclusion_mm = other.edge_exclusion_mm;
        }
        if other.wafer_cost.is_some() {
            self.wafer_cost = other.wafer_cost;
        }
        if other.fab_utilization.is_some() {
            self.fab_utilization = other.fab_utilization;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.map_columns.is_some() {
            self.map_columns = other.map_columns;
        }
    }

    /// Seed a scenario with the configured defaults
    pub fn base_scenario(&self) -> Scenario {
        let mut scenario = Scenario::default();
        if let Some(model) = self.model {
            scenario.process.model = model;
        }
        if let Some(alpha) = self.alpha {
            scenario.process.alpha = alpha;
        }
        if let Some(edge) = self.edge_exclusion_mm {
            scenario.process.edge_exclusion_mm = edge;
        }
        if self.wafer_cost.is_some() {
            scenario.wafer_cost = self.wafer_cost;
        }
        if let Some(util) = self.fab_utilization {
            scenario.fab_utilization = util;
        }
        scenario
    }

    pub fn map_columns(&self) -> usize {
        self.map_columns.unwrap_or(DEFAULT_MAP_COLUMNS)
    }
}
