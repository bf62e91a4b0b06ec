//! Onboarding flow - orchestrates extract, provision, populate, and register.
//!
//! The pipeline is strictly sequential. Intra-stage fallbacks surface as
//! `Degraded` outcomes and are logged; the first stage-fatal error stops the
//! run. The flow itself never fails: callers always receive a well-formed
//! [`OnboardingResult`], partially filled on failure.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::AgentConfig;
use crate::deploy::{ClusterClient, KubectlClient, Registrar};
use crate::error::{OnboardResult, StageOutcome};
use crate::extract::{AppInfo, IntentExtractor};
use crate::llm::{LanguageModel, OpenRouterClient};
use crate::populate::{GitCli, HandlebarsRenderer, Populator, TemplateRenderer, Vcs};
use crate::provision::{GithubHost, Provisioner, RepoHost, RepositoryInfo};

/// Aggregate outcome of one onboarding run.
#[derive(Debug, Serialize)]
pub struct OnboardingResult {
    /// Whether the whole pipeline completed.
    pub success: bool,
    /// Extracted application information, if extraction ran.
    pub app: Option<AppInfo>,
    /// Provisioned repositories, if provisioning produced a usable pair.
    pub repositories: Option<RepositoryInfo>,
    /// Whether the ArgoCD application was registered.
    pub deployment_registered: bool,
    /// Stage-labeled error description on failure.
    pub error: Option<String>,
    /// When the run started.
    pub timestamp: DateTime<Utc>,
}

impl OnboardingResult {
    fn started() -> Self {
        Self {
            success: false,
            app: None,
            repositories: None,
            deployment_registered: false,
            error: None,
            timestamp: Utc::now(),
        }
    }

    fn failed(mut self, stage: &str, reason: impl std::fmt::Display) -> Self {
        self.error = Some(format!("{stage}: {reason}"));
        self
    }
}

/// The onboarding pipeline over its five collaborators.
pub struct OnboardingFlow {
    config: AgentConfig,
    extractor: IntentExtractor,
    provisioner: Provisioner,
    populator: Populator,
    registrar: Registrar,
}

impl OnboardingFlow {
    /// Build the flow with the real collaborators (OpenRouter, GitHub, git,
    /// handlebars, kubectl) from configuration.
    pub fn new(config: AgentConfig) -> OnboardResult<Self> {
        let model: Arc<dyn LanguageModel> = Arc::new(OpenRouterClient::new(
            &config.openrouter_api_key,
            &config.openrouter_model,
            &config.openrouter_base_url,
        )?);
        let host: Arc<dyn RepoHost> = Arc::new(GithubHost::new(
            &config.github_token,
            &config.github_username,
        )?);
        let vcs: Arc<dyn Vcs> = Arc::new(GitCli::new(
            &config.git_author_name,
            &config.git_author_email,
            config.command_timeout,
        ));
        let renderer: Arc<dyn TemplateRenderer> = Arc::new(HandlebarsRenderer::new());
        let cluster: Arc<dyn ClusterClient> = Arc::new(KubectlClient::new(config.command_timeout));

        Self::with_collaborators(config, model, host, vcs, renderer, cluster)
    }

    /// Build the flow over explicit collaborators. Test doubles implement the
    /// same traits the real collaborators do.
    pub fn with_collaborators(
        config: AgentConfig,
        model: Arc<dyn LanguageModel>,
        host: Arc<dyn RepoHost>,
        vcs: Arc<dyn Vcs>,
        renderer: Arc<dyn TemplateRenderer>,
        cluster: Arc<dyn ClusterClient>,
    ) -> OnboardResult<Self> {
        let extractor = IntentExtractor::new(model)?;
        let provisioner = Provisioner::new(host, &config.github_username);
        let populator = Populator::new(vcs, renderer, &config.github_username);
        let registrar = Registrar::new(cluster, &config.argocd_namespace, &config.argocd_project);

        Ok(Self {
            config,
            extractor,
            provisioner,
            populator,
            registrar,
        })
    }

    /// Run the complete onboarding flow for a natural-language request.
    pub async fn run(&self, request: &str) -> OnboardingResult {
        tracing::info!(request = %request, "Starting onboarding flow");

        let mut result = OnboardingResult::started();

        // Step 1: Extract application information (never fatal)
        let app = match self.extractor.extract(request).await.into_parts() {
            Ok((app, degraded)) => {
                if let Some(reason) = degraded {
                    tracing::warn!(reason = %reason, "Extraction degraded");
                }
                app
            }
            Err(reason) => {
                return result.failed("intent extraction", reason);
            }
        };
        tracing::info!(app = %app.name, "Extracted app info");
        result.app = Some(app.clone());

        // Step 2: Create the repository pair
        let repos = match self.provisioner.provision(&app).await.into_parts() {
            Ok((repos, degraded)) => {
                if let Some(reason) = degraded {
                    tracing::warn!(reason = %reason, "Provisioning degraded");
                }
                repos
            }
            Err(reason) => {
                return result.failed("repository provisioning", reason);
            }
        };
        tracing::info!(
            source = %repos.source_repo_url,
            gitops = %repos.gitops_repo_url,
            "Provisioned repositories"
        );
        result.repositories = Some(repos.clone());

        // Step 3: Populate the source repository
        if let Err(e) = self
            .populator
            .populate(
                &repos.source_repo_url,
                &self.config.source_template_path,
                &app,
            )
            .await
        {
            return result.failed("source repository population", e);
        }

        // Step 4: Populate the GitOps repository
        if let Err(e) = self
            .populator
            .populate(
                &repos.gitops_repo_url,
                &self.config.gitops_template_path,
                &app,
            )
            .await
        {
            return result.failed("gitops repository population", e);
        }

        // Step 5: Register the ArgoCD application
        if let Err(e) = self.registrar.register(&app, &repos.gitops_repo_url).await {
            return result.failed("deployment registration", e);
        }
        result.deployment_registered = true;

        result.success = true;
        tracing::info!(app = %app.name, "Onboarding flow completed successfully");
        result
    }
}
