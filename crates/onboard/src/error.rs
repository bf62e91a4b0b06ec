//! Error types and stage outcomes for the onboarding agent.

use thiserror::Error;

/// Errors surfaced by onboarding stages.
#[derive(Error, Debug)]
pub enum OnboardError {
    #[error("Missing required environment variables: {missing:?}")]
    MissingConfig { missing: Vec<String> },

    #[error("Language model request failed: {reason}")]
    LanguageModel { reason: String },

    #[error("Repository hosting error: {reason}")]
    RepoHost { reason: String },

    #[error("Template root does not exist: {path}")]
    TemplateRootMissing { path: String },

    #[error("Template rendering failed for '{name}': {reason}")]
    Render { name: String, reason: String },

    #[error("git {operation} failed: {stderr}")]
    Git { operation: String, stderr: String },

    #[error("kubectl apply failed: {stderr}")]
    ManifestApply { stderr: String },

    #[error("Command '{command}' timed out after {seconds}s")]
    CommandTimeout { command: String, seconds: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias used throughout the crate.
pub type OnboardResult<T> = Result<T, OnboardError>;

/// Tagged outcome of a pipeline stage.
///
/// Fallback paths produce `Degraded` instead of an error so the flow keeps
/// going while still recording what the stage had to skip. `Fatal` stops the
/// pipeline at that stage.
#[derive(Debug, Clone)]
pub enum StageOutcome<T> {
    /// Stage completed on its primary path.
    Ok(T),
    /// Stage completed on a fallback path.
    Degraded(T, String),
    /// Stage failed; the pipeline stops here.
    Fatal(String),
}

impl<T> StageOutcome<T> {
    /// Split into the produced value (if any) and the degradation reason.
    pub fn into_parts(self) -> Result<(T, Option<String>), String> {
        match self {
            StageOutcome::Ok(value) => Ok((value, None)),
            StageOutcome::Degraded(value, reason) => Ok((value, Some(reason))),
            StageOutcome::Fatal(reason) => Err(reason),
        }
    }

    /// Whether the stage produced a usable value.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !matches!(self, StageOutcome::Fatal(_))
    }
}
