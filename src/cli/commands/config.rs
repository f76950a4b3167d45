//! `ym config` command - inspect configuration

use clap::Subcommand;
use console::style;
use miette::{bail, IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

/// Config keys with their descriptions
const CONFIG_KEYS: [(&str, &str); 7] = [
    ("model", "Default yield model (poisson, murphy, nb)"),
    ("alpha", "Default cluster factor for the negative binomial model"),
    ("edge_exclusion_mm", "Default edge exclusion in mm"),
    ("wafer_cost", "Default processed wafer cost"),
    ("fab_utilization", "Default fab utilization (0-1)"),
    ("default_format", "Output format used for --format auto"),
    ("map_columns", "Widest wafer map drawn by `ym map`"),
];

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    if let Some(key) = args.key {
        let value = serde_yml::to_value(&config).into_diagnostic()?;
        if !CONFIG_KEYS.iter().any(|(k, _)| *k == key) {
            bail!("Unknown config key '{}' (see `ym config keys`)", key);
        }
        match value.get(key.as_str()) {
            Some(serde_yml::Value::String(s)) => println!("{}", s),
            Some(v) => print!("{}", serde_yml::to_string(v).into_diagnostic()?),
            None => println!("{}", style("(not set)").dim()),
        }
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&config).into_diagnostic()?);
        }
        _ => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();
            let value = serde_yml::to_value(&config).into_diagnostic()?;
            for (key, _) in CONFIG_KEYS {
                let shown = match value.get(key) {
                    Some(serde_yml::Value::String(s)) => s.clone(),
                    Some(v) => serde_yml::to_string(v)
                        .into_diagnostic()?
                        .trim_end()
                        .to_string(),
                    None => style("(not set)").dim().to_string(),
                };
                println!("  {:<20} {}", style(key).cyan(), shown);
            }
            println!();
            println!("{}", style("Config Sources (in priority order):").dim());
            println!("  1. Environment variables (YM_MODEL, YM_ALPHA, YM_WAFER_COST, YM_FAB_UTILIZATION, YM_FORMAT)");
            println!("  2. Project config (.ym/config.yaml)");
            println!("  3. Global config (~/.config/ym/config.yaml)");
        }
    }

    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", style("Configuration file paths:").bold());
    println!();

    match Config::global_config_path() {
        Some(path) => {
            println!("  {} {}", style("Global:").cyan(), path.display());
            if path.exists() {
                println!("          {}", style("(exists)").green());
            } else {
                println!("          {}", style("(not created)").dim());
            }
        }
        None => println!(
            "  {} {}",
            style("Global:").cyan(),
            style("(no home directory)").dim()
        ),
    }

    println!();
    let cwd = std::env::current_dir().into_diagnostic()?;
    match Config::project_config_path(&cwd) {
        Some(path) => println!("  {} {}", style("Project:").cyan(), path.display()),
        None => println!(
            "  {} {}",
            style("Project:").cyan(),
            style("(no .ym/config.yaml found)").dim()
        ),
    }

    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();
    for (key, description) in CONFIG_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }
    Ok(())
}
