//! Configuration for the onboarding agent.
//!
//! All configuration is read once at startup into an [`AgentConfig`] that is
//! passed by reference to each component. Required variables are validated
//! eagerly; the error lists every missing key at once.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{OnboardError, OnboardResult};

/// Default OpenRouter model for intent extraction.
pub const DEFAULT_OPENROUTER_MODEL: &str = "anthropic/claude-3-sonnet";

/// Default OpenRouter API base URL.
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default namespace the ArgoCD Application is created in.
pub const DEFAULT_ARGOCD_NAMESPACE: &str = "argocd";

/// Default ArgoCD project.
pub const DEFAULT_ARGOCD_PROJECT: &str = "default";

/// Default git author identity for template commits.
pub const DEFAULT_GIT_AUTHOR_NAME: &str = "AI Onboarding Agent";

/// Default git author email for template commits.
pub const DEFAULT_GIT_AUTHOR_EMAIL: &str = "agent@example.com";

/// Default timeout for git/kubectl subprocesses, in seconds.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 120;

/// Configuration for the onboarding agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// GitHub personal access token.
    pub github_token: String,
    /// GitHub username owning the provisioned repositories.
    pub github_username: String,
    /// OpenRouter API key for intent extraction.
    pub openrouter_api_key: String,
    /// OpenRouter model identifier.
    pub openrouter_model: String,
    /// OpenRouter API base URL.
    pub openrouter_base_url: String,
    /// Template tree for the application source repository.
    pub source_template_path: PathBuf,
    /// Template tree for the GitOps repository.
    pub gitops_template_path: PathBuf,
    /// Namespace the ArgoCD Application manifest is created in.
    pub argocd_namespace: String,
    /// ArgoCD project for the application.
    pub argocd_project: String,
    /// git author name used for template commits.
    pub git_author_name: String,
    /// git author email used for template commits.
    pub git_author_email: String,
    /// Timeout applied to git and kubectl subprocesses.
    pub command_timeout: Duration,
}

impl AgentConfig {
    /// Create configuration from environment variables.
    ///
    /// # Required Environment Variables
    /// - `GITHUB_TOKEN`: GitHub personal access token
    /// - `GITHUB_USERNAME`: owner of the provisioned repositories
    /// - `OPENROUTER_API_KEY`: OpenRouter API key
    /// - `SOURCE_TEMPLATE_PATH`: template tree for the source repository
    /// - `GITOPS_TEMPLATE_PATH`: template tree for the GitOps repository
    ///
    /// # Optional Environment Variables
    /// - `OPENROUTER_MODEL`, `OPENROUTER_BASE_URL`
    /// - `ARGOCD_NAMESPACE`, `ARGOCD_PROJECT`
    /// - `GIT_AUTHOR_NAME`, `GIT_AUTHOR_EMAIL`
    /// - `ONBOARD_COMMAND_TIMEOUT_SECS`
    pub fn from_env() -> OnboardResult<Self> {
        const REQUIRED: &[&str] = &[
            "GITHUB_TOKEN",
            "GITHUB_USERNAME",
            "OPENROUTER_API_KEY",
            "SOURCE_TEMPLATE_PATH",
            "GITOPS_TEMPLATE_PATH",
        ];

        let missing: Vec<String> = REQUIRED
            .iter()
            .filter(|var| std::env::var(var).map_or(true, |v| v.is_empty()))
            .map(|var| (*var).to_string())
            .collect();

        if !missing.is_empty() {
            return Err(OnboardError::MissingConfig { missing });
        }

        let env = |var: &str| std::env::var(var).unwrap_or_default();

        let command_timeout_secs = std::env::var("ONBOARD_COMMAND_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS);

        Ok(Self {
            github_token: env("GITHUB_TOKEN"),
            github_username: env("GITHUB_USERNAME"),
            openrouter_api_key: env("OPENROUTER_API_KEY"),
            openrouter_model: std::env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_MODEL.to_string()),
            openrouter_base_url: std::env::var("OPENROUTER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            source_template_path: PathBuf::from(env("SOURCE_TEMPLATE_PATH")),
            gitops_template_path: PathBuf::from(env("GITOPS_TEMPLATE_PATH")),
            argocd_namespace: std::env::var("ARGOCD_NAMESPACE")
                .unwrap_or_else(|_| DEFAULT_ARGOCD_NAMESPACE.to_string()),
            argocd_project: std::env::var("ARGOCD_PROJECT")
                .unwrap_or_else(|_| DEFAULT_ARGOCD_PROJECT.to_string()),
            git_author_name: std::env::var("GIT_AUTHOR_NAME")
                .unwrap_or_else(|_| DEFAULT_GIT_AUTHOR_NAME.to_string()),
            git_author_email: std::env::var("GIT_AUTHOR_EMAIL")
                .unwrap_or_else(|_| DEFAULT_GIT_AUTHOR_EMAIL.to_string()),
            command_timeout: Duration::from_secs(command_timeout_secs),
        })
    }
}
