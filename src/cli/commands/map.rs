//! `ym map` command - simulated wafer map in the terminal

use console::style;
use miette::{bail, IntoDiagnostic, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::cli::commands::utils::{effective_format, load_scenario, ScenarioArgs};
use crate::cli::helpers::{format_count, format_percent};
use crate::cli::output::Reporter;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::{DieSite, DieState, SampledWafer, WaferMap};

#[derive(clap::Args, Debug)]
pub struct MapArgs {
    /// Seed for a reproducible map
    #[arg(long)]
    pub seed: Option<u64>,

    /// Refuse to draw maps wider than this many dies (defaults to config `map_columns`)
    #[arg(long = "max-columns")]
    pub max_columns: Option<usize>,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

#[derive(Debug, Serialize)]
struct MapOutput<'a> {
    diameter_mm: f64,
    pitch_mm: f64,
    columns: usize,
    yield_rate: f64,
    good: usize,
    bad: usize,
    dies: Vec<MapDie<'a>>,
}

#[derive(Debug, Serialize)]
struct MapDie<'a> {
    #[serde(flatten)]
    site: &'a DieSite,
    state: DieState,
}

pub fn run(args: MapArgs, global: &GlobalOpts) -> Result<()> {
    let (config, scenario) = load_scenario(&args.scenario, global)?;
    let reporter = Reporter::new(global);
    let format = effective_format(global, &config);

    let map = WaferMap::layout(scenario.process.diameter_mm, scenario.process.die_area_mm2)?;

    // Terminal width only matters for the drawn map
    let max_columns = args.max_columns.unwrap_or_else(|| config.map_columns());
    if matches!(format, OutputFormat::Auto | OutputFormat::Md) && map.columns() > max_columns {
        bail!(
            "Wafer map is {} dies wide (limit {}); raise --max-columns or use --format json",
            map.columns(),
            max_columns
        );
    }

    let yield_rate = scenario.process.yield_rate();
    let sampled = match args.seed {
        Some(seed) => {
            reporter.detail(format!("Using seed {}", seed));
            map.sample(yield_rate, &mut StdRng::seed_from_u64(seed))
        }
        None => map.sample(yield_rate, &mut rand::rng()),
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&map_output(&sampled, yield_rate)).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!(
                "{}",
                serde_yml::to_string(&map_output(&sampled, yield_rate)).into_diagnostic()?
            );
        }
        OutputFormat::Csv => write_sites(&sampled, b',')?,
        OutputFormat::Tsv => write_sites(&sampled, b'\t')?,
        OutputFormat::Md => {
            println!("```");
            print!("{}", sampled.to_text());
            println!("```");
            println!();
            println!("{}", summary_line(&sampled, yield_rate));
        }
        OutputFormat::Auto => {
            print_map(&sampled);
            println!();
            println!("{}", summary_line(&sampled, yield_rate));
        }
    }

    Ok(())
}

fn map_output<'a>(sampled: &'a SampledWafer<'a>, yield_rate: f64) -> MapOutput<'a> {
    let map = sampled.map();
    MapOutput {
        diameter_mm: map.diameter_mm(),
        pitch_mm: map.pitch_mm(),
        columns: map.columns(),
        yield_rate,
        good: sampled.good_count(),
        bad: sampled.bad_count(),
        dies: sampled
            .dies()
            .map(|(site, state)| MapDie { site, state })
            .collect(),
    }
}

fn write_sites(sampled: &SampledWafer<'_>, delimiter: u8) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(std::io::stdout());
    wtr.write_record(["column", "row", "center_x_mm", "center_y_mm", "state"])
        .into_diagnostic()?;
    for (site, state) in sampled.dies() {
        let state = match state {
            DieState::Good => "good",
            DieState::Bad => "bad",
        };
        wtr.write_record([
            site.column.to_string(),
            site.row.to_string(),
            site.center_x_mm.to_string(),
            site.center_y_mm.to_string(),
            state.to_string(),
        ])
        .into_diagnostic()?;
    }
    wtr.flush().into_diagnostic()?;
    Ok(())
}

fn print_map(sampled: &SampledWafer<'_>) {
    for row in sampled.grid() {
        let mut line = String::new();
        for cell in row {
            match cell {
                Some(DieState::Good) => line.push_str(&style("■").green().to_string()),
                Some(DieState::Bad) => line.push_str(&style("■").red().to_string()),
                None => line.push(' '),
            }
        }
        println!("{}", line.trim_end());
    }
}

fn summary_line(sampled: &SampledWafer<'_>, yield_rate: f64) -> String {
    format!(
        "{} good  {} bad  of {} sites  (simulated {}, model {})",
        style(format_count(sampled.good_count() as u64)).green(),
        style(format_count(sampled.bad_count() as u64)).red(),
        format_count(sampled.map().site_count() as u64),
        format_percent(sampled.observed_yield(), 1),
        format_percent(yield_rate, 1)
    )
}
