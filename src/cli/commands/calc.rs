//! `ym calc` command - KPI summary for one scenario

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::utils::{effective_format, load_scenario, ScenarioArgs};
use crate::cli::helpers::{format_count, format_money, format_percent};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::{Scenario, WaferSummary};

#[derive(clap::Args, Debug)]
pub struct CalcArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

/// Machine-readable calc output
#[derive(Debug, Serialize)]
struct CalcOutput<'a> {
    scenario: &'a Scenario,
    summary: &'a WaferSummary,
}

pub fn run(args: CalcArgs, global: &GlobalOpts) -> Result<()> {
    let (config, scenario) = load_scenario(&args.scenario, global)?;
    let summary = scenario.evaluate();

    let output = CalcOutput {
        scenario: &scenario,
        summary: &summary,
    };

    match effective_format(global, &config) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&output).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Tsv => print_delimited(&summary, b'\t')?,
        OutputFormat::Csv => print_delimited(&summary, b',')?,
        OutputFormat::Md => println!("{}", summary_markdown(&summary)),
        OutputFormat::Auto => print_dashboard(&scenario, &summary),
    }

    Ok(())
}

/// Full-precision `metric,value` rows
pub(crate) fn summary_rows(summary: &WaferSummary) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("model", summary.model.as_str().to_string()),
        ("yield_rate", summary.yield_rate.to_string()),
        ("total_dies", summary.total_dies.to_string()),
        ("good_dies", summary.good_dies.to_string()),
        ("bad_dies", summary.bad_dies().to_string()),
        ("efficiency", summary.efficiency.to_string()),
    ];
    if let Some(y) = summary.effective_yield {
        rows.push(("effective_yield", y.to_string()));
    }
    if let Some(c) = summary.cost_per_good_die {
        rows.push(("cost_per_good_die", c.to_string()));
    }
    rows
}

fn print_delimited(summary: &WaferSummary, delimiter: u8) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(std::io::stdout());
    wtr.write_record(["metric", "value"]).into_diagnostic()?;
    for (key, value) in summary_rows(summary) {
        wtr.write_record([key, value.as_str()]).into_diagnostic()?;
    }
    wtr.flush().into_diagnostic()?;
    Ok(())
}

/// KPI table in Markdown, rounded for reading
pub(crate) fn summary_markdown(summary: &WaferSummary) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value"]);
    builder.push_record(["Model".to_string(), summary.model.label().to_string()]);
    builder.push_record(["Yield".to_string(), format_percent(summary.yield_rate, 2)]);
    builder.push_record(["Good dies".to_string(), format_count(summary.good_dies)]);
    builder.push_record(["Gross dies".to_string(), format_count(summary.total_dies)]);
    builder.push_record(["Bad dies".to_string(), format_count(summary.bad_dies())]);
    builder.push_record([
        "Wafer efficiency".to_string(),
        format_percent(summary.efficiency, 1),
    ]);
    if let Some(y) = summary.effective_yield {
        builder.push_record(["Effective yield (repair)".to_string(), format_percent(y, 2)]);
    }
    if let Some(c) = summary.cost_per_good_die {
        builder.push_record(["Cost per good die".to_string(), format_money(c)]);
    }
    builder.build().with(Style::markdown()).to_string()
}

fn print_dashboard(scenario: &Scenario, summary: &WaferSummary) {
    let p = &scenario.process;

    println!("{}", style("Wafer Yield Summary").bold().underlined());
    println!("{}", "═".repeat(48));
    println!(
        "  {:<22} {} mm wafer, {} mm² die",
        style("Geometry:").dim(),
        p.diameter_mm,
        p.die_area_mm2
    );
    println!(
        "  {:<22} {} (D0 {} /cm²)",
        style("Model:").dim(),
        p.model.label(),
        p.d0
    );
    println!();

    let yield_style = if summary.yield_rate >= 0.8 {
        style(format_percent(summary.yield_rate, 2)).green().bold()
    } else if summary.yield_rate >= 0.5 {
        style(format_percent(summary.yield_rate, 2)).yellow().bold()
    } else {
        style(format_percent(summary.yield_rate, 2)).red().bold()
    };
    println!("  {:<22} {}", "Yield:", yield_style);
    println!(
        "  {:<22} {} / {}",
        "Good / gross dies:",
        style(format_count(summary.good_dies)).green(),
        format_count(summary.total_dies)
    );
    println!(
        "  {:<22} {}",
        "Wafer efficiency:",
        format_percent(summary.efficiency, 1)
    );
    if let Some(y) = summary.effective_yield {
        println!(
            "  {:<22} {} ({}% repairable)",
            "Effective yield:",
            style(format_percent(y, 2)).cyan(),
            scenario.repair_pct.unwrap_or_default()
        );
    }
    if let Some(c) = summary.cost_per_good_die {
        println!("  {:<22} {}", "Cost per good die:", format_money(c));
    }
    println!("{}", "═".repeat(48));
}
