//! Interactive wizard for scenario creation
//!
//! Prompts for each process parameter, offering the current value as the
//! default so that pressing enter keeps it.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::entities::Scenario;
use crate::model::YieldModel;

/// Title and scenario collected by the wizard
#[derive(Debug)]
pub struct WizardResult {
    pub title: String,
    pub scenario: Scenario,
}

pub struct ScenarioWizard {
    theme: ColorfulTheme,
}

impl ScenarioWizard {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    /// Run the wizard starting from `base`
    pub fn run(&self, base: Scenario) -> Result<WizardResult> {
        println!();
        println!("{} Creating new wafer scenario", style("◆").cyan());
        println!("{}", style("─".repeat(50)).dim());
        println!();

        let title: String = Input::with_theme(&self.theme)
            .with_prompt("Title")
            .default("Baseline".to_string())
            .interact_text()
            .into_diagnostic()?;

        let mut scenario = base;
        let p = &mut scenario.process;

        p.diameter_mm = self.prompt_number("Wafer diameter (mm)", p.diameter_mm)?;
        p.edge_exclusion_mm = self.prompt_number("Edge exclusion (mm)", p.edge_exclusion_mm)?;
        p.die_area_mm2 = self.prompt_number("Die area (mm²)", p.die_area_mm2)?;
        p.d0 = self.prompt_number("Defect density D0 (/cm²)", p.d0)?;

        let labels: Vec<&str> = YieldModel::KNOWN.iter().map(|m| m.label()).collect();
        let current = YieldModel::KNOWN
            .iter()
            .position(|m| *m == p.model)
            .unwrap_or(0);
        let choice = Select::with_theme(&self.theme)
            .with_prompt("Yield model")
            .items(&labels)
            .default(current)
            .interact()
            .into_diagnostic()?;
        p.model = YieldModel::KNOWN[choice];

        if p.model == YieldModel::NegativeBinomial {
            p.alpha = self.prompt_number("Cluster factor α", p.alpha)?;
        }

        p.pattern_density = self.prompt_number("Pattern density (0-1)", p.pattern_density)?;
        p.process_maturity = self.prompt_number("Process maturity (0-1)", p.process_maturity)?;

        scenario.wafer_cost =
            self.prompt_optional("Wafer cost (blank to skip)", scenario.wafer_cost)?;
        if scenario.wafer_cost.is_some() {
            scenario.fab_utilization =
                self.prompt_number("Fab utilization (0-1)", scenario.fab_utilization)?;
        }
        scenario.repair_pct =
            self.prompt_optional("Repairable area % (blank to skip)", scenario.repair_pct)?;

        println!();
        println!("{} Values collected!", style("✓").green());

        Ok(WizardResult { title, scenario })
    }

    fn prompt_number(&self, prompt: &str, default: f64) -> Result<f64> {
        Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_text()
            .into_diagnostic()
    }

    fn prompt_optional(&self, prompt: &str, default: Option<f64>) -> Result<Option<f64>> {
        let raw: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default.map(|v| v.to_string()).unwrap_or_default())
            .allow_empty(true)
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                if input.trim().is_empty() || input.trim().parse::<f64>().is_ok() {
                    Ok(())
                } else {
                    Err("Enter a number or leave blank".to_string())
                }
            })
            .interact_text()
            .into_diagnostic()?;

        Ok(raw.trim().parse().ok())
    }
}

impl Default for ScenarioWizard {
    fn default() -> Self {
        Self::new()
    }
}
