//! `ym init` command - write a new scenario file

use console::style;
use miette::{bail, IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::commands::utils::{load_scenario, ScenarioArgs};
use crate::cli::output::Reporter;
use crate::cli::GlobalOpts;
use crate::schema::{ScenarioWizard, TemplateContext, TemplateGenerator};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Scenario file to create
    #[arg(default_value = "scenario.yaml")]
    pub file: PathBuf,

    /// Overwrite the file if it already exists
    #[arg(long)]
    pub force: bool,

    /// Prompt for each parameter
    #[arg(long, short = 'i')]
    pub interactive: bool,

    /// Title written into the file header
    #[arg(long, short = 't', default_value = "Baseline")]
    pub title: String,

    /// Starting values (flags and --params seed the template)
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let reporter = Reporter::new(global);

    if args.file.exists() && !args.force {
        bail!(
            "{} already exists; use {} to overwrite",
            args.file.display(),
            "ym init --force"
        );
    }

    let (_, base) = load_scenario(&args.scenario, global)?;

    let (title, scenario) = if args.interactive {
        let result = ScenarioWizard::new().run(base)?;
        (result.title, result.scenario)
    } else {
        (args.title.clone(), base)
    };

    let generator = TemplateGenerator::new()?;
    let ctx = TemplateContext::new(title).with_scenario(scenario);
    let yaml = generator.generate_scenario(&ctx)?;

    if let Some(parent) = args.file.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).into_diagnostic()?;
            reporter.detail(format!("Created directory {}", parent.display()));
        }
    }
    std::fs::write(&args.file, yaml).into_diagnostic()?;

    reporter.success(format!(
        "Created scenario {}",
        style(args.file.display()).cyan()
    ));
    if !global.quiet {
        eprintln!();
        eprintln!("Next steps:");
        eprintln!(
            "  {} Evaluate the scenario",
            style(format!("ym calc --params {}", args.file.display())).yellow()
        );
        eprintln!(
            "  {} Compare yield models",
            style(format!("ym compare --params {}", args.file.display())).yellow()
        );
    }

    Ok(())
}
