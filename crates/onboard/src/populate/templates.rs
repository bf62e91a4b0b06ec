//! Template classification and rendering.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{OnboardError, OnboardResult};
use crate::extract::AppInfo;

/// File suffixes rendered through the template engine. Everything else is
/// byte-copied unmodified.
pub const TEMPLATE_SUFFIXES: &[&str] = &[".js", ".json", ".md", ".yaml", ".yml", ".env.example"];

/// Check whether a file should be rendered as a template.
#[must_use]
pub fn is_template_file(filename: &str) -> bool {
    TEMPLATE_SUFFIXES
        .iter()
        .any(|suffix| filename.ends_with(suffix))
}

/// The fixed variable set supplied to every template file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVars {
    pub app_name: String,
    pub description: String,
    pub language: String,
    pub author: String,
    pub repository_url: String,
    pub image_name: String,
    pub image_tag: String,
    pub ingress_host: String,
}

impl TemplateVars {
    /// Build the variable set for an application owned by `username`.
    #[must_use]
    pub fn new(app: &AppInfo, username: &str) -> Self {
        Self {
            app_name: app.name.clone(),
            description: app.description.clone(),
            language: app.language.clone(),
            author: app.author.clone(),
            repository_url: format!("https://github.com/{username}/{}-source", app.name),
            image_name: format!("{username}/{}", app.name),
            image_tag: "latest".to_string(),
            ingress_host: format!("{}.local", app.name),
        }
    }
}

/// Templating collaborator.
pub trait TemplateRenderer: Send + Sync {
    /// Render template source text against the variable set. Substitution is
    /// best-effort: unresolved placeholders are not an error.
    fn render(&self, source: &str, vars: &TemplateVars) -> OnboardResult<String>;
}

/// Handlebars implementation of the templating collaborator.
pub struct HandlebarsRenderer {
    handlebars: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Create a new renderer. Strict mode stays off so unknown placeholders
    /// render empty instead of failing the file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: Handlebars::new(),
        }
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, source: &str, vars: &TemplateVars) -> OnboardResult<String> {
        self.handlebars
            .render_template(source, vars)
            .map_err(|e| OnboardError::Render {
                name: "file".to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AppInfo {
        AppInfo {
            name: "inventory-api".to_string(),
            description: "inventory service".to_string(),
            language: "NodeJS".to_string(),
            author: "AI Agent".to_string(),
        }
    }

    #[test]
    fn test_is_template_file() {
        assert!(is_template_file("index.js"));
        assert!(is_template_file("package.json"));
        assert!(is_template_file("README.md"));
        assert!(is_template_file("deployment.yaml"));
        assert!(is_template_file("values.yml"));
        assert!(is_template_file(".env.example"));

        assert!(!is_template_file("logo.png"));
        assert!(!is_template_file("Dockerfile"));
        assert!(!is_template_file("main.rs"));
    }

    #[test]
    fn test_vars_derive_fields() {
        let vars = TemplateVars::new(&app(), "octocat");
        assert_eq!(
            vars.repository_url,
            "https://github.com/octocat/inventory-api-source"
        );
        assert_eq!(vars.image_name, "octocat/inventory-api");
        assert_eq!(vars.image_tag, "latest");
        assert_eq!(vars.ingress_host, "inventory-api.local");
    }

    #[test]
    fn test_render_substitutes_all_recognized_placeholders() {
        let renderer = HandlebarsRenderer::new();
        let vars = TemplateVars::new(&app(), "octocat");

        let source = "name: {{appName}}\nimage: {{imageName}}:{{imageTag}}\nhost: {{ingressHost}}\nby: {{author}}";
        let rendered = renderer.render(source, &vars).unwrap();

        assert_eq!(
            rendered,
            "name: inventory-api\nimage: octocat/inventory-api:latest\nhost: inventory-api.local\nby: AI Agent"
        );
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_render_is_best_effort_for_unknown_placeholders() {
        let renderer = HandlebarsRenderer::new();
        let vars = TemplateVars::new(&app(), "octocat");

        let rendered = renderer.render("{{appName}} {{notAVariable}}!", &vars).unwrap();
        assert_eq!(rendered, "inventory-api !");
    }
}
