//! Onboarding CLI - provisions and deploys a new application from a
//! natural-language request.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use onboard::extract::IntentExtractor;
use onboard::flow::OnboardingFlow;
use onboard::llm::OpenRouterClient;
use onboard::AgentConfig;

/// Onboarding agent - from request to running GitOps deployment.
#[derive(Parser)]
#[command(name = "onboard")]
#[command(about = "Developer onboarding automation agent")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full onboarding flow for a request
    Run {
        /// Natural-language request, e.g. "deploy a NodeJS service called inventory-api"
        request: String,
    },

    /// Extract application info only (prints JSON, useful for prompt debugging)
    Extract {
        /// Natural-language request
        request: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("onboard=debug,info")
    } else {
        EnvFilter::new("onboard=info,warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run { request } => run_flow(&request).await,
        Commands::Extract { request } => run_extract(&request).await,
    }
}

async fn run_flow(request: &str) -> Result<()> {
    let config = AgentConfig::from_env()?;
    let flow = OnboardingFlow::new(config)?;

    let result = flow.run(request).await;

    if result.success {
        println!("\n🎉 Onboarding completed successfully!");
        if let Some(app) = &result.app {
            println!("📦 App: {}", app.name);
            println!("📝 Description: {}", app.description);
        }
        if let Some(repos) = &result.repositories {
            println!("🔗 Source Repository: {}", repos.source_repo_url);
            println!("⚙️  GitOps Repository: {}", repos.gitops_repo_url);
        }
        println!("🚀 Deployment registered: {}", result.deployment_registered);
        println!("\n📊 Check the ArgoCD UI for deployment status");
        Ok(())
    } else {
        let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
        eprintln!("\n❌ Onboarding failed: {reason}");
        std::process::exit(1);
    }
}

async fn run_extract(request: &str) -> Result<()> {
    let config = AgentConfig::from_env()?;

    let model = Arc::new(OpenRouterClient::new(
        &config.openrouter_api_key,
        &config.openrouter_model,
        &config.openrouter_base_url,
    )?);
    let extractor = IntentExtractor::new(model)?;

    let (app, degraded) = match extractor.extract(request).await.into_parts() {
        Ok(parts) => parts,
        Err(reason) => anyhow::bail!("extraction failed: {reason}"),
    };

    if let Some(reason) = degraded {
        eprintln!("⚠️  Degraded extraction: {reason}");
    }
    println!("{}", serde_json::to_string_pretty(&app)?);

    Ok(())
}
