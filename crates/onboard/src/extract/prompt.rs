//! Prompt template management for intent extraction.

use anyhow::Result;
use handlebars::Handlebars;
use serde::Serialize;

/// Manages Handlebars prompt templates.
pub struct PromptManager {
    handlebars: Handlebars<'static>,
}

impl PromptManager {
    /// Create a new prompt manager with embedded templates.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_template_string("extract", EXTRACT_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    /// Render a template with the given data.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        let result = self.handlebars.render(template, data)?;
        Ok(result)
    }
}

/// System prompt for the extraction call.
pub const SYSTEM_PROMPT: &str = "You extract structured application metadata from \
developer requests. Always respond with a single valid JSON object and no \
additional text.";

/// Intent extraction prompt template.
const EXTRACT_TEMPLATE: &str = r#"Extract application information from this developer request: "{{request}}"

Return a JSON object with:
- name: application name (lowercase, hyphenated)
- description: brief description of what this application does
- language: programming language (default to "NodeJS" if not specified)
- author: developer name (default to "AI Agent" if not specified)

Examples:
Input: "I need to deploy my new NodeJS service called inventory-api"
Output: {"name": "inventory-api", "description": "NodeJS service for inventory management", "language": "NodeJS", "author": "AI Agent"}

Input: "Create a React frontend called user-dashboard"
Output: {"name": "user-dashboard", "description": "React frontend for user dashboard", "language": "React", "author": "AI Agent"}

Now process this request: "{{request}}"

Respond only with valid JSON, no additional text.
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_embeds_request() {
        let prompts = PromptManager::new().unwrap();
        let data = serde_json::json!({ "request": "deploy a service called billing" });

        let rendered = prompts.render("extract", &data).unwrap();
        assert!(rendered.contains("deploy a service called billing"));
        assert!(rendered.contains("Respond only with valid JSON"));
    }
}
