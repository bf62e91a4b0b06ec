//! Repository provisioning - creates or discovers the paired source/gitops
//! repositories for an application.
//!
//! Degradation ladder: create both repos; on an already-exists conflict, look
//! the existing pair up by name; if lookup also fails, construct the expected
//! URLs deterministically from the configured username. Only a non-conflict
//! hosting error is fatal.

mod github;

pub use github::GithubHost;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::error::StageOutcome;
use crate::extract::AppInfo;

/// Identifier used when the hosting provider could not be queried.
pub const UNKNOWN_REPO_ID: &str = "unknown";

/// Errors from the repository hosting collaborator.
///
/// The already-exists condition is signaled distinctly so the provisioner can
/// fall back to lookup instead of failing the stage.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("repository already exists")]
    AlreadyExists,

    #[error("hosting API error: {0}")]
    Api(String),
}

/// A remote repository as reported by the hosting provider.
#[derive(Debug, Clone)]
pub struct RemoteRepo {
    /// Clone-able transport URL.
    pub clone_url: String,
    /// Provider identifier.
    pub id: String,
}

/// Repository hosting collaborator.
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Create a repository owned by the configured identity, auto-initialized
    /// with a README.
    async fn create_repo(&self, name: &str, description: &str) -> Result<RemoteRepo, HostError>;

    /// Look up an existing repository by name.
    async fn get_repo(&self, name: &str) -> Result<RemoteRepo, HostError>;
}

/// Result of provisioning the repository pair.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryInfo {
    /// Clone URL of the `{name}-source` repository.
    pub source_repo_url: String,
    /// Clone URL of the `{name}-gitops` repository.
    pub gitops_repo_url: String,
    /// Provider id of the source repository, or "unknown".
    pub source_repo_id: String,
    /// Provider id of the gitops repository, or "unknown".
    pub gitops_repo_id: String,
}

/// Provisions the paired repositories for an application.
pub struct Provisioner {
    host: Arc<dyn RepoHost>,
    username: String,
}

impl Provisioner {
    /// Create a new provisioner.
    pub fn new(host: Arc<dyn RepoHost>, username: impl Into<String>) -> Self {
        Self {
            host,
            username: username.into(),
        }
    }

    /// Create or discover the `{name}-source` / `{name}-gitops` pair.
    pub async fn provision(&self, app: &AppInfo) -> StageOutcome<RepositoryInfo> {
        let source_name = format!("{}-source", app.name);
        let gitops_name = format!("{}-gitops", app.name);

        tracing::info!(app = %app.name, "Creating repositories");

        let created = self.create_pair(app, &source_name, &gitops_name).await;

        match created {
            Ok(info) => StageOutcome::Ok(info),
            Err(HostError::AlreadyExists) => {
                tracing::info!(app = %app.name, "Repositories already exist, looking up");
                match self.lookup_pair(&source_name, &gitops_name).await {
                    Ok(info) => StageOutcome::Degraded(
                        info,
                        "repositories already existed; reused existing pair".to_string(),
                    ),
                    Err(e) => {
                        tracing::warn!(error = %e, "Lookup failed, constructing URLs");
                        StageOutcome::Degraded(
                            self.constructed_info(&app.name),
                            format!("lookup of existing repositories failed: {e}"),
                        )
                    }
                }
            }
            Err(HostError::Api(reason)) => {
                tracing::error!(error = %reason, "Repository creation failed");
                StageOutcome::Fatal(format!("repository creation failed: {reason}"))
            }
        }
    }

    async fn create_pair(
        &self,
        app: &AppInfo,
        source_name: &str,
        gitops_name: &str,
    ) -> Result<RepositoryInfo, HostError> {
        let source = self
            .host
            .create_repo(source_name, &format!("Source code for {}", app.description))
            .await?;
        tracing::info!(url = %source.clone_url, "Created source repo");

        let gitops = self
            .host
            .create_repo(
                gitops_name,
                &format!("GitOps configuration for {}", app.description),
            )
            .await?;
        tracing::info!(url = %gitops.clone_url, "Created gitops repo");

        Ok(RepositoryInfo {
            source_repo_url: source.clone_url,
            gitops_repo_url: gitops.clone_url,
            source_repo_id: source.id,
            gitops_repo_id: gitops.id,
        })
    }

    async fn lookup_pair(
        &self,
        source_name: &str,
        gitops_name: &str,
    ) -> Result<RepositoryInfo, HostError> {
        let source = self.host.get_repo(source_name).await?;
        let gitops = self.host.get_repo(gitops_name).await?;

        Ok(RepositoryInfo {
            source_repo_url: source.clone_url,
            gitops_repo_url: gitops.clone_url,
            source_repo_id: source.id,
            gitops_repo_id: gitops.id,
        })
    }

    fn constructed_info(&self, name: &str) -> RepositoryInfo {
        RepositoryInfo {
            source_repo_url: format!("https://github.com/{}/{name}-source.git", self.username),
            gitops_repo_url: format!("https://github.com/{}/{name}-gitops.git", self.username),
            source_repo_id: UNKNOWN_REPO_ID.to_string(),
            gitops_repo_id: UNKNOWN_REPO_ID.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StageOutcome;
    use std::sync::Mutex;

    /// Host double with scripted create/get behavior.
    struct ScriptedHost {
        create_result: fn(&str) -> Result<RemoteRepo, HostError>,
        get_result: fn(&str) -> Result<RemoteRepo, HostError>,
        create_calls: Mutex<Vec<String>>,
    }

    impl ScriptedHost {
        fn new(
            create_result: fn(&str) -> Result<RemoteRepo, HostError>,
            get_result: fn(&str) -> Result<RemoteRepo, HostError>,
        ) -> Self {
            Self {
                create_result,
                get_result,
                create_calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RepoHost for ScriptedHost {
        async fn create_repo(
            &self,
            name: &str,
            _description: &str,
        ) -> Result<RemoteRepo, HostError> {
            self.create_calls.lock().unwrap().push(name.to_string());
            (self.create_result)(name)
        }

        async fn get_repo(&self, name: &str) -> Result<RemoteRepo, HostError> {
            (self.get_result)(name)
        }
    }

    fn created(name: &str) -> Result<RemoteRepo, HostError> {
        Ok(RemoteRepo {
            clone_url: format!("https://github.com/octocat/{name}.git"),
            id: "1234".to_string(),
        })
    }

    fn app() -> AppInfo {
        AppInfo {
            name: "inventory-api".to_string(),
            description: "inventory service".to_string(),
            language: "NodeJS".to_string(),
            author: "AI Agent".to_string(),
        }
    }

    #[tokio::test]
    async fn test_provision_creates_pair() {
        let host = Arc::new(ScriptedHost::new(created, |_| {
            Err(HostError::Api("unused".into()))
        }));
        let provisioner = Provisioner::new(host.clone(), "octocat");

        let outcome = provisioner.provision(&app()).await;
        let (info, degraded) = outcome.into_parts().unwrap();

        assert!(degraded.is_none());
        assert!(info.source_repo_url.contains("inventory-api-source"));
        assert!(info.gitops_repo_url.contains("inventory-api-gitops"));
        assert_eq!(info.source_repo_id, "1234");
        assert_eq!(
            *host.create_calls.lock().unwrap(),
            vec!["inventory-api-source", "inventory-api-gitops"]
        );
    }

    #[tokio::test]
    async fn test_conflict_falls_back_to_lookup() {
        let host = Arc::new(ScriptedHost::new(
            |_| Err(HostError::AlreadyExists),
            |name| {
                Ok(RemoteRepo {
                    clone_url: format!("https://github.com/octocat/{name}.git"),
                    id: "99".to_string(),
                })
            },
        ));
        let provisioner = Provisioner::new(host, "octocat");

        let outcome = provisioner.provision(&app()).await;
        let (info, degraded) = outcome.into_parts().unwrap();

        assert!(degraded.is_some());
        assert!(info.source_repo_url.contains("inventory-api-source"));
        assert!(info.gitops_repo_url.contains("inventory-api-gitops"));
        assert_eq!(info.gitops_repo_id, "99");
    }

    #[tokio::test]
    async fn test_failed_lookup_constructs_urls() {
        let host = Arc::new(ScriptedHost::new(
            |_| Err(HostError::AlreadyExists),
            |_| Err(HostError::Api("not found".into())),
        ));
        let provisioner = Provisioner::new(host, "octocat");

        let outcome = provisioner.provision(&app()).await;
        let (info, degraded) = outcome.into_parts().unwrap();

        assert!(degraded.is_some());
        assert_eq!(
            info.source_repo_url,
            "https://github.com/octocat/inventory-api-source.git"
        );
        assert_eq!(
            info.gitops_repo_url,
            "https://github.com/octocat/inventory-api-gitops.git"
        );
        assert_eq!(info.source_repo_id, UNKNOWN_REPO_ID);
        assert_eq!(info.gitops_repo_id, UNKNOWN_REPO_ID);
    }

    #[tokio::test]
    async fn test_generic_error_is_fatal() {
        let host = Arc::new(ScriptedHost::new(
            |_| Err(HostError::Api("rate limited".into())),
            |_| Err(HostError::Api("unused".into())),
        ));
        let provisioner = Provisioner::new(host, "octocat");

        let outcome = provisioner.provision(&app()).await;
        match outcome {
            StageOutcome::Fatal(reason) => assert!(reason.contains("rate limited")),
            other => panic!("expected fatal outcome, got {other:?}"),
        }
    }
}
