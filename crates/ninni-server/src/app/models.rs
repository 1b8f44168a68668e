use anyhow::{Context, Result};
use colored::Colorize;
use ninni_llm_api::{ClientFactory, GenerateRequest, LlmClient, LlmError, ModelInfo};
use ninni_models::{GenerationConfig, Turn};
use std::sync::Arc;
use std::time::Duration;

use crate::app::setup::{resolve_api_key, resolve_model};
use crate::cli::ModelsArgs;

const PROBE_PROMPT: &str = "Hello, just say hi back";
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// List models visible to the configured key, optionally probing one
pub async fn run_models_mode(args: &ModelsArgs) -> Result<()> {
    let provider = &args.provider;
    let api_key = resolve_api_key(provider);
    if api_key.is_none() {
        println!(
            "{}",
            format!("⚠️  No API key found; set --api-key or {}", provider.backend.api_key_env()).yellow()
        );
    }

    let client = ClientFactory::create(
        provider.backend,
        api_key,
        resolve_model(provider),
        provider.api_url.clone(),
        Some(PROBE_TIMEOUT),
    )
    .context("Failed to create LLM client")?;

    println!("{}", format!("🔍 Listing {} models...", client.backend()).bright_cyan());
    let models = match client.list_models().await {
        Ok(models) => models,
        Err(err @ LlmError::Unsupported(_)) => {
            println!("{}", err.to_string().yellow());
            Vec::new()
        }
        Err(err) => return Err(err).context("Failed to list models"),
    };

    for model in &models {
        print_model(model);
    }
    println!("{}", format!("{} models", models.len()).bright_black());

    if args.probe {
        let target = models
            .iter()
            .find(|model| model.supports_generate_content())
            .map(|model| model.name.clone());
        probe(args, client, target).await?;
    }

    Ok(())
}

fn print_model(model: &ModelInfo) {
    let display = model.display_name.as_deref().unwrap_or("-");
    println!("  {} {}", model.name.bright_green(), format!("({})", display).bright_black());
    if !model.supported_generation_methods.is_empty() {
        println!(
            "    {}",
            model.supported_generation_methods.join(", ").bright_black()
        );
    }
}

async fn probe(args: &ModelsArgs, client: Arc<dyn LlmClient>, target: Option<String>) -> Result<()> {
    let provider = &args.provider;
    let client = match target {
        Some(name) if name != client.model() => ClientFactory::create(
            provider.backend,
            resolve_api_key(provider),
            name,
            provider.api_url.clone(),
            Some(PROBE_TIMEOUT),
        )?,
        _ => client,
    };

    println!(
        "{}",
        format!("🧪 Probing {} with \"{}\"", client.model(), PROBE_PROMPT).bright_cyan()
    );

    let history = [Turn::user(PROBE_PROMPT)];
    let config = GenerationConfig::default();
    let response = client
        .generate(GenerateRequest {
            system_instruction: None,
            history: &history,
            config: &config,
        })
        .await
        .context("Probe request failed")?;

    println!("{} {}", "✅ Reply:".green().bold(), response.text);
    if let Some(usage) = response.usage {
        println!(
            "{}",
            format!(
                "   tokens: {} prompt + {} completion = {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            )
            .bright_black()
        );
    }

    Ok(())
}
