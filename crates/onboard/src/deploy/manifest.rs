//! ArgoCD Application manifest generation.

use crate::extract::AppInfo;

/// Template for the ArgoCD Application manifest.
const APPLICATION_TEMPLATE: &str = r"apiVersion: argoproj.io/v1alpha1
kind: Application
metadata:
  name: {{APP_NAME}}
  namespace: {{NAMESPACE}}
  labels:
    app: {{APP_NAME}}
    created-by: ai-onboarding-agent
spec:
  project: {{PROJECT}}
  source:
    repoURL: {{GITOPS_REPO_URL}}
    targetRevision: HEAD
    path: .
  destination:
    server: https://kubernetes.default.svc
    namespace: default
  syncPolicy:
    automated:
      prune: true
      selfHeal: true
    syncOptions:
    - CreateNamespace=true
    - PrunePropagationPolicy=foreground
    - PruneLast=true
    retry:
      limit: 5
      backoff:
        duration: 5s
        factor: 2
        maxDuration: 3m
";

/// Render the Application manifest for an app and its gitops repository.
#[must_use]
pub fn render_application(
    app: &AppInfo,
    gitops_repo_url: &str,
    namespace: &str,
    project: &str,
) -> String {
    APPLICATION_TEMPLATE
        .replace("{{APP_NAME}}", &app.name)
        .replace("{{NAMESPACE}}", namespace)
        .replace("{{PROJECT}}", project)
        .replace("{{GITOPS_REPO_URL}}", gitops_repo_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AppInfo {
        AppInfo {
            name: "inventory-api".to_string(),
            description: "inventory service".to_string(),
            language: "NodeJS".to_string(),
            author: "AI Agent".to_string(),
        }
    }

    #[test]
    fn test_manifest_substitution() {
        let manifest = render_application(
            &app(),
            "https://github.com/octocat/inventory-api-gitops.git",
            "argocd",
            "default",
        );

        assert!(manifest.contains("name: inventory-api"));
        assert!(manifest.contains("app: inventory-api"));
        assert!(manifest.contains("created-by: ai-onboarding-agent"));
        assert!(manifest.contains("namespace: argocd"));
        assert!(manifest.contains("project: default"));
        assert!(manifest
            .contains("repoURL: https://github.com/octocat/inventory-api-gitops.git"));
        assert!(manifest.contains("targetRevision: HEAD"));
        assert!(!manifest.contains("{{"));
    }

    #[test]
    fn test_manifest_is_valid_yaml() {
        let manifest = render_application(
            &app(),
            "https://github.com/octocat/inventory-api-gitops.git",
            "argocd",
            "default",
        );

        let doc: serde_yaml::Value = serde_yaml::from_str(&manifest).unwrap();
        assert_eq!(doc["kind"], "Application");
        assert_eq!(doc["metadata"]["name"], "inventory-api");
        assert_eq!(doc["metadata"]["labels"]["app"], "inventory-api");
        assert_eq!(
            doc["spec"]["source"]["repoURL"],
            "https://github.com/octocat/inventory-api-gitops.git"
        );
        assert_eq!(doc["spec"]["syncPolicy"]["automated"]["prune"], true);
        assert_eq!(doc["spec"]["syncPolicy"]["retry"]["limit"], 5);
    }
}
