//! Template generation for new scenario files

use chrono::{DateTime, Utc};
use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::entities::Scenario;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const SCENARIO_TEMPLATE: &str = "scenario.yaml.tera";

/// Context for template generation
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub title: String,
    pub created: DateTime<Utc>,
    pub scenario: Scenario,
}

impl TemplateContext {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            created: Utc::now(),
            scenario: Scenario::default(),
        }
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenario = scenario;
        self
    }
}

/// Template generator using Tera
pub struct TemplateGenerator {
    tera: Tera,
}

#[derive(Debug, Error, miette::Diagnostic)]
pub enum TemplateError {
    #[error("Template rendering error: {0}")]
    RenderError(String),
}

impl TemplateGenerator {
    /// Create a new template generator with embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Generate a scenario file
    pub fn generate_scenario(&self, ctx: &TemplateContext) -> Result<String, TemplateError> {
        let s = &ctx.scenario;
        let p = &s.process;

        let mut context = tera::Context::new();
        context.insert("title", &ctx.title);
        context.insert("created_date", &ctx.created.format("%Y-%m-%d").to_string());
        context.insert("diameter_mm", &p.diameter_mm);
        context.insert("edge_exclusion_mm", &p.edge_exclusion_mm);
        context.insert("die_area_mm2", &p.die_area_mm2);
        context.insert("pattern_density", &p.pattern_density);
        context.insert("model", p.model.as_str());
        context.insert("d0", &p.d0);
        context.insert("alpha", &p.alpha);
        context.insert("process_maturity", &p.process_maturity);
        context.insert("has_repair", &s.repair_pct.is_some());
        context.insert("repair_pct", &s.repair_pct.unwrap_or_default());
        context.insert("has_wafer_cost", &s.wafer_cost.is_some());
        context.insert("wafer_cost", &s.wafer_cost.unwrap_or_default());
        context.insert("fab_utilization", &s.fab_utilization);

        if self
            .tera
            .get_template_names()
            .any(|n| n == SCENARIO_TEMPLATE)
        {
            self.tera
                .render(SCENARIO_TEMPLATE, &context)
                .map_err(|e| TemplateError::RenderError(e.to_string()))
        } else {
            Ok(self.hardcoded_scenario_template(ctx))
        }
    }

    fn hardcoded_scenario_template(&self, ctx: &TemplateContext) -> String {
        let s = &ctx.scenario;
        let p = &s.process;

        let repair = match s.repair_pct {
            Some(pct) => format!("repair_pct: {pct:?}"),
            None => "# repair_pct: 10.0".to_string(),
        };
        let cost = match s.wafer_cost {
            Some(cost) => format!("wafer_cost: {cost:?}"),
            None => "# wafer_cost: 5000.0".to_string(),
        };

        format!(
            r#"# Wafer scenario: {title}
# Created by ym - YieldMaster on {created}

diameter_mm: {diameter:?}
edge_exclusion_mm: {edge:?}
die_area_mm2: {area:?}
pattern_density: {density:?}
model: {model}
d0: {d0:?}
alpha: {alpha:?}
process_maturity: {maturity:?}
{repair}
{cost}
fab_utilization: {util:?}
"#,
            title = ctx.title,
            created = ctx.created.format("%Y-%m-%d"),
            diameter = p.diameter_mm,
            edge = p.edge_exclusion_mm,
            area = p.die_area_mm2,
            density = p.pattern_density,
            model = p.model,
            d0 = p.d0,
            alpha = p.alpha,
            maturity = p.process_maturity,
            repair = repair,
            cost = cost,
            util = s.fab_utilization,
        )
    }
}
