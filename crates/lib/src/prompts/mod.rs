//! # Prompt Templates
//!
//! Stage instructions are plain-text templates with `{name}` slots. The pipeline
//! only ever talks to this module through [`render`], so stage sequencing stays
//! independent of the wording sent to the model.

pub mod stages;

use crate::pipeline::RoleDescriptor;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Named values bound into a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    values: HashMap<&'static str, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.values.insert(name, value.into());
        self
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("valid regex"));

/// Replaces every bound `{name}` in `template` in a single pass.
///
/// Unbound placeholders are left as they are, and substituted text is never
/// scanned again.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Renders each rule against `vars` and joins them as `- rule` lines.
pub fn bullet_list<'a, I>(rules: I, vars: &TemplateVars) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    rules
        .into_iter()
        .filter(|r| !r.trim().is_empty())
        .map(|r| format!("- {}", render(r, vars)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The system prompt that conditions a stage on its role.
pub fn role_system_prompt(role: &RoleDescriptor) -> String {
    let vars = TemplateVars::new()
        .with("role", role.role.trim())
        .with("goal", role.goal.trim())
        .with("backstory", role.backstory.trim());
    render(stages::ROLE_SYSTEM_PROMPT, &vars)
}
