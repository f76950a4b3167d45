//! Shared utilities for CLI commands

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::cli::output::Reporter;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::entities::Scenario;
use crate::model::YieldModel;

/// Process and cost parameters shared by every computing command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ScenarioArgs {
    /// Scenario file (YAML) to start from
    #[arg(long, short = 'p', value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Wafer diameter (mm)
    #[arg(long, value_name = "MM", allow_negative_numbers = true)]
    pub diameter: Option<f64>,

    /// Die area (mm²)
    #[arg(long = "die-area", value_name = "MM2", allow_negative_numbers = true)]
    pub die_area: Option<f64>,

    /// Defect density D0 (defects/cm²)
    #[arg(long, value_name = "PER_CM2", allow_negative_numbers = true)]
    pub d0: Option<f64>,

    /// Cluster factor for the negative binomial model
    #[arg(long, allow_negative_numbers = true)]
    pub alpha: Option<f64>,

    /// Yield model: poisson, murphy or nb
    #[arg(long, short = 'm')]
    pub model: Option<YieldModel>,

    /// Fraction of the die area that is defect-sensitive (0-1)
    #[arg(long = "pattern-density", allow_negative_numbers = true)]
    pub pattern_density: Option<f64>,

    /// Process maturity multiplier (0-1)
    #[arg(long = "process-maturity", allow_negative_numbers = true)]
    pub process_maturity: Option<f64>,

    /// Unusable ring at the wafer edge (mm)
    #[arg(long = "edge-exclusion", value_name = "MM", allow_negative_numbers = true)]
    pub edge_exclusion: Option<f64>,

    /// Repairable share of the die area (percent)
    #[arg(long, value_name = "PCT", allow_negative_numbers = true)]
    pub repair: Option<f64>,

    /// Processed wafer cost
    #[arg(long = "wafer-cost", allow_negative_numbers = true)]
    pub wafer_cost: Option<f64>,

    /// Fab utilization (0-1)
    #[arg(long = "fab-utilization", allow_negative_numbers = true)]
    pub fab_utilization: Option<f64>,
}

impl ScenarioArgs {
    /// Build the scenario: config defaults, then the `--params` file, then flags
    pub fn resolve(&self, config: &Config) -> Result<Scenario> {
        let mut scenario = config.base_scenario();
        if let Some(path) = &self.params {
            scenario = scenario.load_over(path)?;
        }
        self.apply(&mut scenario);
        Ok(scenario)
    }

    fn apply(&self, scenario: &mut Scenario) {
        let p = &mut scenario.process;
        if let Some(v) = self.diameter {
            p.diameter_mm = v;
        }
        if let Some(v) = self.die_area {
            p.die_area_mm2 = v;
        }
        if let Some(v) = self.d0 {
            p.d0 = v;
        }
        if let Some(v) = self.alpha {
            p.alpha = v;
        }
        if let Some(v) = self.model {
            p.model = v;
        }
        if let Some(v) = self.pattern_density {
            p.pattern_density = v;
        }
        if let Some(v) = self.process_maturity {
            p.process_maturity = v;
        }
        if let Some(v) = self.edge_exclusion {
            p.edge_exclusion_mm = v;
        }
        if self.repair.is_some() {
            scenario.repair_pct = self.repair;
        }
        if self.wafer_cost.is_some() {
            scenario.wafer_cost = self.wafer_cost;
        }
        if let Some(v) = self.fab_utilization {
            scenario.fab_utilization = v;
        }
    }
}

/// Load config and resolve the scenario, warning about an unrecognised model
pub fn load_scenario(args: &ScenarioArgs, global: &GlobalOpts) -> Result<(Config, Scenario)> {
    let config = Config::load();
    let scenario = args.resolve(&config)?;
    let reporter = Reporter::new(global);

    if !scenario.process.model.is_known() {
        reporter.warn(format!(
            "Unknown yield model; yield is reported as 0 (expected one of: {})",
            YieldModel::KNOWN
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if scenario.process.is_degenerate() {
        reporter.warn(format!(
            "Edge exclusion of {} mm leaves no usable area on a {} mm wafer; die counts are 0",
            scenario.process.edge_exclusion_mm, scenario.process.diameter_mm
        ));
    }
    if let Some(path) = &args.params {
        reporter.detail(format!("Scenario loaded from {}", path.display()));
    }

    Ok((config, scenario))
}

/// Resolve `--format auto` against the configured default format
pub fn effective_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    match config.default_format.as_deref().map(str::to_ascii_lowercase) {
        Some(f) if f == "yaml" => OutputFormat::Yaml,
        Some(f) if f == "json" => OutputFormat::Json,
        Some(f) if f == "tsv" => OutputFormat::Tsv,
        Some(f) if f == "csv" => OutputFormat::Csv,
        Some(f) if f == "md" || f == "markdown" => OutputFormat::Md,
        _ => OutputFormat::Auto,
    }
}

/// Write content to a file, or to stdout when no path is given
pub fn write_output(content: &str, output: Option<&PathBuf>, reporter: &Reporter) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            reporter.success(format!(
                "Output written to {}",
                style(path.display()).cyan()
            ));
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes()).into_diagnostic()?;
        }
    }
    Ok(())
}
