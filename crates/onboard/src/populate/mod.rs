//! Template population - clones a repository, renders a template tree into
//! it, and pushes the result.
//!
//! A render failure in a single file falls back to a raw copy of that file;
//! stage-level failure is reserved for operations that make the whole
//! repository unusable (missing template root, clone/commit/push errors).

mod git;
mod templates;

pub use git::{repo_dir_name, GitCli, Vcs};
pub use templates::{
    is_template_file, HandlebarsRenderer, TemplateRenderer, TemplateVars, TEMPLATE_SUFFIXES,
};

use std::path::Path;
use std::sync::Arc;

use crate::error::{OnboardError, OnboardResult};
use crate::extract::AppInfo;

/// Populates a repository from a template tree.
pub struct Populator {
    vcs: Arc<dyn Vcs>,
    renderer: Arc<dyn TemplateRenderer>,
    username: String,
}

impl Populator {
    /// Create a new populator.
    pub fn new(
        vcs: Arc<dyn Vcs>,
        renderer: Arc<dyn TemplateRenderer>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            vcs,
            renderer,
            username: username.into(),
        }
    }

    /// Clone `repo_url`, render `template_root` into it, commit, and push.
    ///
    /// The scratch clone lives in a per-invocation temp directory that is
    /// removed on every exit path.
    pub async fn populate(
        &self,
        repo_url: &str,
        template_root: &Path,
        app: &AppInfo,
    ) -> OnboardResult<()> {
        if !template_root.exists() {
            return Err(OnboardError::TemplateRootMissing {
                path: template_root.display().to_string(),
            });
        }

        tracing::info!(
            repo = %repo_url,
            template = %template_root.display(),
            "Populating repository from template"
        );

        let work_dir = tempfile::tempdir()?;
        let clone_dir = work_dir.path().join(repo_dir_name(repo_url));

        self.vcs.clone_repo(repo_url, &clone_dir).await?;

        let vars = TemplateVars::new(app, &self.username);
        self.render_tree(template_root, &clone_dir, &vars)?;

        let message = format!("Initial commit for {}\n\n{}", app.name, app.description);
        self.vcs.commit_all(&clone_dir, &message).await?;
        self.vcs.push(&clone_dir).await?;

        tracing::info!(repo = %repo_url, "Successfully populated repository");
        Ok(())
    }

    /// Mirror the template tree into the clone, rendering eligible files.
    fn render_tree(
        &self,
        template_root: &Path,
        clone_dir: &Path,
        vars: &TemplateVars,
    ) -> OnboardResult<()> {
        for entry in walkdir::WalkDir::new(template_root)
            .into_iter()
            .filter_map(Result::ok)
        {
            let rel_path = entry
                .path()
                .strip_prefix(template_root)
                .unwrap_or(entry.path());
            if rel_path.as_os_str().is_empty() {
                continue;
            }
            let target = clone_dir.join(rel_path);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target)?;
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let file_name = entry.file_name().to_string_lossy();
            if is_template_file(&file_name) {
                self.render_file(entry.path(), &target, vars)?;
            } else {
                std::fs::copy(entry.path(), &target)?;
            }
        }

        Ok(())
    }

    /// Render one file; fall back to a raw copy if rendering fails.
    fn render_file(&self, source: &Path, target: &Path, vars: &TemplateVars) -> OnboardResult<()> {
        let render_attempt = std::fs::read_to_string(source)
            .map_err(OnboardError::from)
            .and_then(|content| self.renderer.render(&content, vars));

        match render_attempt {
            Ok(rendered) => {
                std::fs::write(target, rendered)?;
            }
            Err(e) => {
                tracing::warn!(
                    file = %source.display(),
                    error = %e,
                    "Template rendering failed, copying file as-is"
                );
                std::fs::copy(source, target)?;
            }
        }

        Ok(())
    }
}
