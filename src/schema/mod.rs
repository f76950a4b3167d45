//! Schema system - scenario templates and the interactive wizard

pub mod template;
pub mod wizard;

pub use template::{TemplateContext, TemplateGenerator};
pub use wizard::{ScenarioWizard, WizardResult};
