//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    calc::CalcArgs, compare::CompareArgs, completions::CompletionsArgs, config::ConfigCommands,
    init::InitArgs, map::MapArgs, report::ReportArgs, sweep::SweepArgs,
};

#[derive(Parser)]
#[command(name = "ym")]
#[command(author, version, about = "YieldMaster wafer yield toolkit")]
#[command(long_about = "Estimate semiconductor wafer yield, die counts and cost per good die with Poisson, Murphy and negative binomial defect models.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a new wafer scenario file
    Init(InitArgs),

    /// Yield, die counts, efficiency and cost for one scenario
    Calc(CalcArgs),

    /// Evaluate a scenario under every yield model
    Compare(CompareArgs),

    /// Yield curves across a range of one parameter
    Sweep(SweepArgs),

    /// Draw a simulated wafer map
    Map(MapArgs),

    /// Generate a Markdown yield report
    Report(ReportArgs),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable output (tables and styled text)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
