//! Intent extraction - turns a free-text request into a structured [`AppInfo`].
//!
//! Extraction is model-first with a deterministic fallback: the language model
//! is asked for a JSON object, and any failure on that path (network, bad
//! JSON, unusable name) degrades to the ordered pattern table in
//! [`patterns`]. The pipeline always proceeds with *some* valid `AppInfo`.

mod patterns;
mod prompt;

pub use patterns::{match_name, name_patterns, NamePattern};
pub use prompt::PromptManager;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{OnboardError, OnboardResult, StageOutcome};
use crate::llm::{extract_json_payload, ChatMessage, GenerateOptions, LanguageModel};

/// Placeholder name when neither the model nor the pattern table yields one.
pub const DEFAULT_NAME: &str = "new-app";

/// Default runtime tag when the request does not specify one.
pub const DEFAULT_LANGUAGE: &str = "NodeJS";

/// Default author identity.
pub const DEFAULT_AUTHOR: &str = "AI Agent";

/// Default description when the model omits one.
const DEFAULT_DESCRIPTION: &str = "New application created by AI agent";

/// Application information extracted from a natural-language request.
///
/// Constructed once per onboarding run and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    /// Lowercase, hyphenated identifier (`^[a-z0-9-]+$`). Used as a DNS-safe
    /// token in repository names, manifest names, and ingress hostnames.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Runtime/language tag.
    pub language: String,
    /// Author identity.
    pub author: String,
}

/// Normalize a raw token into a DNS-safe application name.
///
/// Lowercases, maps whitespace and underscores to hyphens, drops everything
/// outside `[a-z0-9-]`, collapses hyphen runs, and trims edge hyphens.
/// Returns `None` when nothing usable remains.
#[must_use]
pub fn normalize_name(raw: &str) -> Option<String> {
    let mut name = String::with_capacity(raw.len());

    for ch in raw.trim().to_lowercase().chars() {
        match ch {
            'a'..='z' | '0'..='9' => name.push(ch),
            '-' | '_' | ' ' | '\t' => {
                if !name.ends_with('-') {
                    name.push('-');
                }
            }
            _ => {}
        }
    }

    let name = name.trim_matches('-').to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Raw model response for parsing.
#[derive(Debug, Deserialize)]
struct RawAppInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    author: Option<String>,
}

/// Extracts an [`AppInfo`] from a natural-language request.
pub struct IntentExtractor {
    model: Arc<dyn LanguageModel>,
    prompts: PromptManager,
}

impl IntentExtractor {
    /// Create a new extractor over the given language model.
    pub fn new(model: Arc<dyn LanguageModel>) -> OnboardResult<Self> {
        let prompts = PromptManager::new().map_err(|e| OnboardError::Render {
            name: "extract".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { model, prompts })
    }

    /// Extract application information from a request.
    ///
    /// Never fatal: model failures degrade to the pattern table.
    pub async fn extract(&self, request: &str) -> StageOutcome<AppInfo> {
        match self.extract_via_model(request).await {
            Ok(app) => {
                tracing::info!(name = %app.name, language = %app.language, "Extracted app info via model");
                StageOutcome::Ok(app)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Model extraction failed, using pattern fallback");
                let app = fallback_extract(request);
                StageOutcome::Degraded(app, format!("model extraction failed: {e}"))
            }
        }
    }

    async fn extract_via_model(&self, request: &str) -> OnboardResult<AppInfo> {
        let prompt_data = serde_json::json!({ "request": request });
        let user_prompt =
            self.prompts
                .render("extract", &prompt_data)
                .map_err(|e| OnboardError::Render {
                    name: "extract".to_string(),
                    reason: e.to_string(),
                })?;

        let messages = vec![
            ChatMessage::system(prompt::SYSTEM_PROMPT),
            ChatMessage::user(user_prompt),
        ];
        let options = GenerateOptions {
            temperature: Some(0.1),
            max_tokens: Some(500),
            json_mode: true,
        };

        let response = self.model.generate(&messages, &options).await?;

        let raw: RawAppInfo = serde_json::from_str(extract_json_payload(&response)).map_err(
            |e| OnboardError::LanguageModel {
                reason: format!("failed to parse model response as JSON: {e}"),
            },
        )?;

        // A response without a usable name is a failed extraction, not a
        // default - the pattern table gets a shot at the original text.
        let name = raw
            .name
            .as_deref()
            .and_then(normalize_name)
            .ok_or_else(|| OnboardError::LanguageModel {
                reason: "model response contained no usable name".to_string(),
            })?;

        Ok(AppInfo {
            name,
            description: raw
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            language: raw
                .language
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            author: raw
                .author
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        })
    }
}

/// Deterministic extraction used when the model path fails.
#[must_use]
pub fn fallback_extract(request: &str) -> AppInfo {
    let name = match_name(request)
        .and_then(|(label, raw)| {
            let normalized = normalize_name(&raw);
            tracing::debug!(pattern = label, raw = %raw, "Fallback pattern matched");
            normalized
        })
        .unwrap_or_else(|| DEFAULT_NAME.to_string());

    AppInfo {
        name,
        description: format!(
            "Application created from request: {}",
            truncate_request(request)
        ),
        language: DEFAULT_LANGUAGE.to_string(),
        author: DEFAULT_AUTHOR.to_string(),
    }
}

/// Truncate the request echo, respecting UTF-8 character boundaries.
fn truncate_request(text: &str) -> String {
    const MAX_CHARS: usize = 100;

    let char_count = text.chars().count();
    if char_count <= MAX_CHARS {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(MAX_CHARS).collect();
        format!("{truncated}...")
    }
}
