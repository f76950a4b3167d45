//! `ym sweep` command - yield curves across one parameter

use console::style;
use miette::{bail, IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style, Table};

use crate::cli::commands::utils::{effective_format, load_scenario, ScenarioArgs};
use crate::cli::helpers::{format_count, format_percent};
use crate::cli::output::Reporter;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::{Sweep, SweepPoint, SweepVariable, MAX_SWEEP_STEPS};

#[derive(clap::Args, Debug)]
pub struct SweepArgs {
    /// Parameter to vary
    #[arg(long, value_enum)]
    pub over: SweepVariable,

    /// First value of the range
    #[arg(long, allow_negative_numbers = true)]
    pub from: f64,

    /// Last value of the range
    #[arg(long, allow_negative_numbers = true)]
    pub to: f64,

    /// Number of evenly spaced points (including both ends)
    #[arg(long, default_value_t = 11)]
    pub steps: usize,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

#[derive(Debug, Serialize)]
struct SweepOutput<'a> {
    sweep: &'a Sweep,
    points: &'a [SweepPoint],
}

pub fn run(args: SweepArgs, global: &GlobalOpts) -> Result<()> {
    check_steps(args.steps)?;

    let (config, scenario) = load_scenario(&args.scenario, global)?;
    let sweep = Sweep::new(args.over, args.from, args.to, args.steps);
    let points = sweep.run(&scenario);

    Reporter::new(global).detail(format!(
        "Swept {} from {} to {} in {} steps ({} model for die counts)",
        sweep.variable,
        sweep.start,
        sweep.end,
        sweep.steps,
        scenario.process.model
    ));

    match effective_format(global, &config) {
        OutputFormat::Json => {
            let output = SweepOutput {
                sweep: &sweep,
                points: &points,
            };
            println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            let output = SweepOutput {
                sweep: &sweep,
                points: &points,
            };
            print!("{}", serde_yml::to_string(&output).into_diagnostic()?);
        }
        OutputFormat::Csv => write_points(&points, sweep.variable, b',')?,
        OutputFormat::Tsv => write_points(&points, sweep.variable, b'\t')?,
        OutputFormat::Md => {
            let mut table = points_table(&points, sweep.variable);
            println!("{}", table.with(Style::markdown()));
        }
        OutputFormat::Auto => {
            println!(
                "{} Yield vs {}",
                style("◆").cyan(),
                style(sweep.variable.label()).bold()
            );
            println!();
            let mut table = points_table(&points, sweep.variable);
            println!("{}", table.with(Style::rounded()));
        }
    }

    Ok(())
}

fn check_steps(steps: usize) -> Result<()> {
    if steps == 0 {
        bail!("--steps must be at least 1");
    }
    if steps > MAX_SWEEP_STEPS {
        bail!(
            "--steps {} exceeds the limit of {} points per sweep",
            steps,
            MAX_SWEEP_STEPS
        );
    }
    Ok(())
}

/// Write the series with the `csv` crate; the value column is named after the variable
fn write_points(points: &[SweepPoint], variable: SweepVariable, delimiter: u8) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(std::io::stdout());
    wtr.write_record([
        variable.label(),
        "poisson",
        "murphy",
        "negative_binomial",
        "gross_dies",
        "good_dies",
    ])
    .into_diagnostic()?;
    for p in points {
        wtr.write_record([
            p.value.to_string(),
            p.poisson.to_string(),
            p.murphy.to_string(),
            p.negative_binomial.to_string(),
            p.gross_dies.to_string(),
            p.good_dies.to_string(),
        ])
        .into_diagnostic()?;
    }
    wtr.flush().into_diagnostic()?;
    Ok(())
}

fn points_table(points: &[SweepPoint], variable: SweepVariable) -> Table {
    let mut builder = Builder::default();
    builder.push_record([
        variable.label(),
        "Poisson",
        "Murphy",
        "Neg. Binomial",
        "Gross dies",
        "Good dies",
    ]);
    for p in points {
        builder.push_record([
            format!("{:.4}", p.value),
            format_percent(p.poisson, 2),
            format_percent(p.murphy, 2),
            format_percent(p.negative_binomial, 2),
            format_count(p.gross_dies),
            format_count(p.good_dies),
        ]);
    }
    builder.build()
}
