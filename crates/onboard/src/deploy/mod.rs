//! Deployment registration - submits an ArgoCD Application manifest to the
//! cluster control plane.

mod kubectl;
mod manifest;

pub use kubectl::KubectlClient;
pub use manifest::render_application;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::OnboardResult;
use crate::extract::AppInfo;

/// Cluster control-plane collaborator.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Apply a declarative manifest (idempotent upsert). Returns the control
    /// plane's output for diagnostics.
    async fn apply_manifest(&self, manifest: &str) -> OnboardResult<String>;
}

/// Registers applications with the GitOps controller.
pub struct Registrar {
    cluster: Arc<dyn ClusterClient>,
    namespace: String,
    project: String,
}

impl Registrar {
    /// Create a new registrar targeting the given ArgoCD namespace/project.
    pub fn new(
        cluster: Arc<dyn ClusterClient>,
        namespace: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            cluster,
            namespace: namespace.into(),
            project: project.into(),
        }
    }

    /// Render and submit the Application manifest for `app`.
    pub async fn register(&self, app: &AppInfo, gitops_repo_url: &str) -> OnboardResult<()> {
        tracing::info!(app = %app.name, "Creating ArgoCD application");

        let manifest = render_application(app, gitops_repo_url, &self.namespace, &self.project);

        let output = self.cluster.apply_manifest(&manifest).await?;
        tracing::info!(output = %output, "ArgoCD application created");

        Ok(())
    }
}
