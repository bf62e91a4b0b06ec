//! Bounded subprocess execution.

use std::process::Output;
use std::time::Duration;

use tokio::process::Command;

use crate::error::{OnboardError, OnboardResult};

/// Run a command to completion with captured output, bounded by `timeout`.
///
/// The child is killed when the deadline elapses; callers get a
/// [`OnboardError::CommandTimeout`] carrying `label` for diagnostics.
pub(crate) async fn run_with_timeout(
    command: &mut Command,
    label: &str,
    timeout: Duration,
) -> OnboardResult<Output> {
    command.kill_on_drop(true);

    let output = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| OnboardError::CommandTimeout {
            command: label.to_string(),
            seconds: timeout.as_secs(),
        })??;

    Ok(output)
}
