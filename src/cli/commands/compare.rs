//! `ym compare` command - one scenario under every yield model

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style, Table};

use crate::cli::commands::utils::{effective_format, load_scenario, ScenarioArgs};
use crate::cli::helpers::{format_count, format_money, format_percent};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::WaferSummary;

#[derive(clap::Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run(args: CompareArgs, global: &GlobalOpts) -> Result<()> {
    let (config, scenario) = load_scenario(&args.scenario, global)?;
    let summaries = scenario.compare_models();

    match effective_format(global, &config) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&summaries).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&summaries).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Tsv => print_delimited(&summaries, b'\t')?,
        OutputFormat::Csv => print_delimited(&summaries, b',')?,
        OutputFormat::Md => {
            println!("{}", comparison_table(&summaries).with(Style::markdown()));
        }
        OutputFormat::Auto => {
            println!(
                "{} {} mm wafer, {} mm² die, D0 {} /cm², α {}",
                style("◆").cyan(),
                scenario.process.diameter_mm,
                scenario.process.die_area_mm2,
                scenario.process.d0,
                scenario.process.alpha
            );
            println!();
            println!("{}", comparison_table(&summaries).with(Style::rounded()));
        }
    }

    Ok(())
}

fn print_delimited(summaries: &[WaferSummary], delimiter: u8) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(std::io::stdout());
    wtr.write_record([
        "model",
        "yield_rate",
        "good_dies",
        "total_dies",
        "efficiency",
        "effective_yield",
        "cost_per_good_die",
    ])
    .into_diagnostic()?;
    for s in summaries {
        wtr.write_record([
            s.model.as_str().to_string(),
            s.yield_rate.to_string(),
            s.good_dies.to_string(),
            s.total_dies.to_string(),
            s.efficiency.to_string(),
            s.effective_yield.map(|v| v.to_string()).unwrap_or_default(),
            s.cost_per_good_die.map(|v| v.to_string()).unwrap_or_default(),
        ])
        .into_diagnostic()?;
    }
    wtr.flush().into_diagnostic()?;
    Ok(())
}

/// Model comparison table; optional columns appear only when populated
pub(crate) fn comparison_table(summaries: &[WaferSummary]) -> Table {
    let with_repair = summaries.iter().any(|s| s.effective_yield.is_some());
    let with_cost = summaries.iter().any(|s| s.cost_per_good_die.is_some());

    let mut header = vec!["Model", "Yield", "Good dies", "Gross dies", "Efficiency"];
    if with_repair {
        header.push("Effective yield");
    }
    if with_cost {
        header.push("Cost/good die");
    }

    let mut builder = Builder::default();
    builder.push_record(header);
    for s in summaries {
        let mut row = vec![
            s.model.label().to_string(),
            format_percent(s.yield_rate, 2),
            format_count(s.good_dies),
            format_count(s.total_dies),
            format_percent(s.efficiency, 1),
        ];
        if with_repair {
            row.push(s.effective_yield.map(|v| format_percent(v, 2)).unwrap_or_default());
        }
        if with_cost {
            row.push(s.cost_per_good_die.map(format_money).unwrap_or_default());
        }
        builder.push_record(row);
    }

    builder.build()
}
