//! GitHub repository hosting using octocrab.

use async_trait::async_trait;
use octocrab::Octocrab;

use crate::error::{OnboardError, OnboardResult};

use super::{HostError, RemoteRepo, RepoHost};

/// GitHub implementation of the hosting collaborator.
pub struct GithubHost {
    client: Octocrab,
    username: String,
}

impl GithubHost {
    /// Create a new host client with the given token.
    pub fn new(token: &str, username: impl Into<String>) -> OnboardResult<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| OnboardError::RepoHost {
                reason: format!("failed to create GitHub client: {e}"),
            })?;

        Ok(Self {
            client,
            username: username.into(),
        })
    }

    fn map_error(e: octocrab::Error) -> HostError {
        match e {
            octocrab::Error::GitHub { source, .. } => {
                // 422 is GitHub's "name already exists on this account"
                if source.status_code.as_u16() == 422 {
                    HostError::AlreadyExists
                } else {
                    HostError::Api(format!(
                        "{} ({})",
                        source.message,
                        source.status_code.as_u16()
                    ))
                }
            }
            other => HostError::Api(other.to_string()),
        }
    }

    fn remote_repo(repo: &octocrab::models::Repository) -> RemoteRepo {
        RemoteRepo {
            clone_url: repo
                .clone_url
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            id: repo.id.to_string(),
        }
    }
}

#[async_trait]
impl RepoHost for GithubHost {
    async fn create_repo(&self, name: &str, description: &str) -> Result<RemoteRepo, HostError> {
        tracing::debug!(repo = %name, "Creating repository");

        let body = serde_json::json!({
            "name": name,
            "description": description,
            "private": false,
            "auto_init": true,
        });

        let repo: octocrab::models::Repository = self
            .client
            .post("/user/repos", Some(&body))
            .await
            .map_err(Self::map_error)?;

        Ok(Self::remote_repo(&repo))
    }

    async fn get_repo(&self, name: &str) -> Result<RemoteRepo, HostError> {
        tracing::debug!(owner = %self.username, repo = %name, "Looking up repository");

        let repo = self
            .client
            .repos(&self.username, name)
            .get()
            .await
            .map_err(Self::map_error)?;

        Ok(Self::remote_repo(&repo))
    }
}
