//! `ym report` command - Markdown yield report

use chrono::Utc;
use miette::Result;
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::calc::summary_markdown;
use crate::cli::commands::compare::comparison_table;
use crate::cli::commands::utils::{load_scenario, write_output, ScenarioArgs};
use crate::cli::helpers::{format_count, format_money, format_percent};
use crate::cli::output::Reporter;
use crate::cli::GlobalOpts;
use crate::entities::{Scenario, Sweep, SweepVariable};

/// Points in the defect-density sensitivity table
const SENSITIVITY_STEPS: usize = 5;

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Report title
    #[arg(long, default_value = "Wafer Yield Report")]
    pub title: String,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run(args: ReportArgs, global: &GlobalOpts) -> Result<()> {
    let (_, scenario) = load_scenario(&args.scenario, global)?;
    let reporter = Reporter::new(global);

    reporter.status("Generating yield report...");
    let content = generate_report(&args.title, &scenario);
    write_output(&content, args.output.as_ref(), &reporter)
}

/// Render the full report for a scenario
pub fn generate_report(title: &str, scenario: &Scenario) -> String {
    let summary = scenario.evaluate();
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", title));
    output.push_str(&format!(
        "*Generated: {}*\n\n",
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));

    output.push_str("## Parameters\n\n");
    output.push_str(&parameters_table(scenario));
    output.push_str("\n\n");

    output.push_str("## Key Figures\n\n");
    output.push_str(&summary_markdown(&summary));
    output.push_str("\n\n");

    output.push_str("## Model Comparison\n\n");
    output.push_str(
        &comparison_table(&scenario.compare_models())
            .with(Style::markdown())
            .to_string(),
    );
    output.push_str("\n\n");

    // Sensitivity from a perfect process up to twice the current D0
    let d0 = scenario.process.d0;
    if d0.is_finite() && d0 > 0.0 {
        output.push_str("## Defect Density Sensitivity\n\n");
        let points = Sweep::new(SweepVariable::D0, 0.0, d0 * 2.0, SENSITIVITY_STEPS).run(scenario);
        let mut builder = Builder::default();
        builder.push_record(["D0 (/cm²)", "Poisson", "Murphy", "Neg. Binomial", "Good dies"]);
        for p in &points {
            builder.push_record([
                format!("{:.3}", p.value),
                format_percent(p.poisson, 1),
                format_percent(p.murphy, 1),
                format_percent(p.negative_binomial, 1),
                format_count(p.good_dies),
            ]);
        }
        output.push_str(&builder.build().with(Style::markdown()).to_string());
        output.push_str("\n\n");
    }

    if !scenario.process.model.is_known() {
        output.push_str("> **Note:** the selected yield model is not recognised; yield is reported as 0.\n");
    }

    output
}

fn parameters_table(scenario: &Scenario) -> String {
    let p = &scenario.process;
    let mut builder = Builder::default();
    builder.push_record(["Parameter", "Value"]);
    builder.push_record(["Wafer diameter".to_string(), format!("{} mm", p.diameter_mm)]);
    builder.push_record(["Edge exclusion".to_string(), format!("{} mm", p.edge_exclusion_mm)]);
    builder.push_record(["Die area".to_string(), format!("{} mm²", p.die_area_mm2)]);
    builder.push_record(["Defect density (D0)".to_string(), format!("{} /cm²", p.d0)]);
    builder.push_record(["Yield model".to_string(), p.model.label().to_string()]);
    if p.model == crate::model::YieldModel::NegativeBinomial {
        builder.push_record(["Cluster factor (α)".to_string(), p.alpha.to_string()]);
    }
    builder.push_record(["Pattern density".to_string(), p.pattern_density.to_string()]);
    builder.push_record(["Process maturity".to_string(), p.process_maturity.to_string()]);
    if let Some(pct) = scenario.repair_pct {
        builder.push_record(["Repairable area".to_string(), format!("{}%", pct)]);
    }
    if let Some(cost) = scenario.wafer_cost {
        builder.push_record(["Wafer cost".to_string(), format_money(cost)]);
        builder.push_record([
            "Fab utilization".to_string(),
            format_percent(scenario.fab_utilization, 0),
        ]);
    }
    builder.build().with(Style::markdown()).to_string()
}
