//! Prompt templates and the renderer seam.
//!
//! The system prompt for a conversation is rendered exactly once, when the
//! history is created. [`TemplateRenderer`] is the bundled implementation:
//! `{{ variable }}` substitution from [`PromptVars`], strict about unknown
//! names and malformed syntax. Hosts with a richer templating engine inject
//! their own [`PromptRenderer`].

use std::collections::BTreeMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error::TemplateError;

/// Leading fragment rendered ahead of the instructions.
pub const BASE_PROMPT: &str = "The current time is {{ now }}.\n";

/// Instructions used when no prompt override is configured.
pub const DEFAULT_INSTRUCTIONS: &str = "\
You are a voice assistant for {{ assistant_name }}.
Answer questions about the world truthfully.
Answer in plain text. Keep it simple and to the point.";

/// Named values available to prompt templates.
#[derive(Debug, Clone, Default)]
pub struct PromptVars {
    values: BTreeMap<String, String>,
}

impl PromptVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one variable, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Renders a prompt template against a set of variables.
#[async_trait]
pub trait PromptRenderer: Send + Sync {
    async fn render(&self, template: &str, vars: &PromptVars) -> Result<String, TemplateError>;
}

/// Bundled renderer: `{{ variable }}` substitution only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

#[async_trait]
impl PromptRenderer for TemplateRenderer {
    async fn render(&self, template: &str, vars: &PromptVars) -> Result<String, TemplateError> {
        substitute(template, vars)
    }
}

static VAR_PATTERN: OnceLock<Regex> = OnceLock::new();

fn var_pattern() -> &'static Regex {
    VAR_PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid placeholder pattern")
    })
}

fn substitute(template: &str, vars: &PromptVars) -> Result<String, TemplateError> {
    if template.contains("{%") {
        return Err(TemplateError::Syntax(
            "template directives ('{%') are not supported".to_string(),
        ));
    }

    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;
    for caps in var_pattern().captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        rendered.push_str(&template[last..whole.start()]);
        match vars.get(name.as_str()) {
            Some(value) => rendered.push_str(value),
            None => return Err(TemplateError::UnknownVariable(name.as_str().to_string())),
        }
        last = whole.end();
    }
    rendered.push_str(&template[last..]);

    if rendered.contains("{{") || rendered.contains("}}") {
        return Err(TemplateError::Syntax(
            "unbalanced template braces".to_string(),
        ));
    }
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> PromptVars {
        PromptVars::new()
            .with("assistant_name", "Test Home")
            .with("user_name", "Alice")
    }

    #[test]
    fn substitutes_known_variables() {
        let out = substitute("Hi {{ user_name }}, this is {{ assistant_name }}.", &vars());
        assert_eq!(out.unwrap(), "Hi Alice, this is Test Home.");
    }

    #[test]
    fn whitespace_inside_braces_is_tolerated() {
        let out = substitute("{{user_name}} and {{  user_name  }}", &vars());
        assert_eq!(out.unwrap(), "Alice and Alice");
    }

    #[test]
    fn unknown_variable_is_an_error() {
        let err = substitute("Hello {{ user_nam }}", &vars()).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownVariable(name) if name == "user_nam"));
    }

    #[test]
    fn directives_are_rejected() {
        let err = substitute("{% if morning %}Good morning{% endif %}", &vars()).unwrap_err();
        assert!(matches!(err, TemplateError::Syntax(_)));
    }

    #[test]
    fn unmatched_braces_are_rejected() {
        let err = substitute("Hello {{ user_name", &vars()).unwrap_err();
        assert!(matches!(err, TemplateError::Syntax(_)));
    }

    #[test]
    fn default_instructions_render_with_standard_vars() {
        let vars = PromptVars::new()
            .with("now", "2024-05-24 12:00:00")
            .with("assistant_name", "Test Home");
        let template = format!("{BASE_PROMPT}{DEFAULT_INSTRUCTIONS}");
        let out = substitute(&template, &vars).unwrap();
        assert!(out.starts_with("The current time is 2024-05-24 12:00:00."));
        assert!(out.contains("voice assistant for Test Home"));
    }
}
