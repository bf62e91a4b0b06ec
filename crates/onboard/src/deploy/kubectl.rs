//! Manifest submission via kubectl.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{OnboardError, OnboardResult};
use crate::process::run_with_timeout;

use super::ClusterClient;

/// Applies manifests with the kubectl CLI.
///
/// Cluster credentials are ambient: kubectl picks up `KUBECONFIG` or the
/// default context on its own.
pub struct KubectlClient {
    timeout: Duration,
}

impl KubectlClient {
    /// Create a new client using ambient credentials.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ClusterClient for KubectlClient {
    async fn apply_manifest(&self, manifest: &str) -> OnboardResult<String> {
        // Scoped temp file: deleted on drop whether apply succeeds or not
        let mut manifest_file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()?;
        manifest_file.write_all(manifest.as_bytes())?;
        manifest_file.flush()?;

        let mut command = Command::new("kubectl");
        command.arg("apply").arg("-f").arg(manifest_file.path());

        let output = run_with_timeout(&mut command, "kubectl apply", self.timeout).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OnboardError::ManifestApply {
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
