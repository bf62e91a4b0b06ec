//! Git operations using shell commands.
//!
//! Uses tokio::process::Command for async git operations with captured
//! stdout/stderr and a bounded timeout per command.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{OnboardError, OnboardResult};
use crate::process::run_with_timeout;

/// Version-control collaborator.
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Clone a repository into the target directory.
    async fn clone_repo(&self, url: &str, target_dir: &Path) -> OnboardResult<()>;

    /// Stage all changes and commit. An empty diff is not an error.
    async fn commit_all(&self, repo_dir: &Path, message: &str) -> OnboardResult<()>;

    /// Push to the remote's default branch.
    async fn push(&self, repo_dir: &Path) -> OnboardResult<()>;
}

/// Handles git operations via shell commands.
pub struct GitCli {
    author_name: String,
    author_email: String,
    timeout: Duration,
}

impl GitCli {
    /// Create a new git runner with the given author identity.
    pub fn new(
        author_name: impl Into<String>,
        author_email: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            author_name: author_name.into(),
            author_email: author_email.into(),
            timeout,
        }
    }

    async fn run(
        &self,
        operation: &str,
        args: &[&str],
        current_dir: Option<&Path>,
    ) -> OnboardResult<Output> {
        let mut command = Command::new("git");
        command.args(args);
        if let Some(dir) = current_dir {
            command.current_dir(dir);
        }

        let output =
            run_with_timeout(&mut command, &format!("git {operation}"), self.timeout).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OnboardError::Git {
                operation: operation.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(output)
    }

    /// Configure git user for the repository.
    async fn configure_user(&self, repo_dir: &Path) -> OnboardResult<()> {
        self.run(
            "config",
            &["config", "user.name", &self.author_name],
            Some(repo_dir),
        )
        .await?;
        self.run(
            "config",
            &["config", "user.email", &self.author_email],
            Some(repo_dir),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Vcs for GitCli {
    async fn clone_repo(&self, url: &str, target_dir: &Path) -> OnboardResult<()> {
        tracing::debug!(url = %url, target = %target_dir.display(), "Cloning repository");

        let target = target_dir.to_string_lossy();
        self.run("clone", &["clone", url, &target], None).await?;

        self.configure_user(target_dir).await
    }

    async fn commit_all(&self, repo_dir: &Path, message: &str) -> OnboardResult<()> {
        tracing::debug!(dir = %repo_dir.display(), "Committing changes");

        self.run("add", &["add", "-A"], Some(repo_dir)).await?;

        let status = self
            .run("status", &["status", "--porcelain"], Some(repo_dir))
            .await?;
        if status.stdout.is_empty() {
            tracing::info!("No changes to commit, skipping commit");
            return Ok(());
        }

        self.run("commit", &["commit", "-m", message], Some(repo_dir))
            .await?;
        Ok(())
    }

    async fn push(&self, repo_dir: &Path) -> OnboardResult<()> {
        tracing::debug!(dir = %repo_dir.display(), "Pushing to remote");

        self.run("push", &["push"], Some(repo_dir)).await?;
        Ok(())
    }
}

/// Derive the repository directory name from a clone URL.
#[must_use]
pub fn repo_dir_name(repo_url: &str) -> String {
    repo_url
        .trim_end_matches('/')
        .trim_end_matches(".git")
        .rsplit('/')
        .next()
        .unwrap_or("repo")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_dir_name() {
        assert_eq!(
            repo_dir_name("https://github.com/octocat/inventory-api-source.git"),
            "inventory-api-source"
        );
        assert_eq!(
            repo_dir_name("https://github.com/octocat/inventory-api-gitops"),
            "inventory-api-gitops"
        );
        assert_eq!(repo_dir_name("https://github.com/octocat/repo/"), "repo");
    }
}
