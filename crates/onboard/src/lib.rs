//! Developer onboarding agent.
//!
//! This crate provides:
//! - Natural-language intent extraction (OpenRouter with a pattern fallback)
//! - Paired GitHub repository provisioning (source + gitops)
//! - Template-based repository population with handlebars rendering
//! - ArgoCD application registration via kubectl apply

pub mod config;
pub mod deploy;
pub mod error;
pub mod extract;
pub mod flow;
pub mod llm;
pub mod populate;
mod process;
pub mod provision;

// Re-export main types
pub use config::AgentConfig;
pub use error::{OnboardError, OnboardResult, StageOutcome};
pub use extract::{AppInfo, IntentExtractor};
pub use flow::{OnboardingFlow, OnboardingResult};
pub use populate::Populator;
pub use provision::{Provisioner, RepositoryInfo};
