//! Provider listing command handler.

use anyhow::Result;

use crate::config::ConfigManager;
use crate::ui::Style;

/// Prints configured providers to stdout.
///
/// If `specific_provider` is provided, shows detailed information for that provider.
/// Otherwise, lists all configured providers with their endpoints and models.
pub fn print_providers(specific_provider: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new();
    let config = manager.load_or_default()?;

    if config.providers.is_empty() {
        println!("No providers configured.");
        println!(
            "Add providers to {}",
            Style::secondary(manager.config_path().display())
        );
        return Ok(());
    }

    let default_provider = config.assistant.provider.as_deref();

    if let Some(provider_name) = specific_provider {
        let Some(provider) = config.providers.get(provider_name) else {
            anyhow::bail!("Provider '{provider_name}' not found");
        };

        let is_default = default_provider == Some(provider_name);
        println!(
            "{} {}{}",
            Style::header("Provider:"),
            Style::value(provider_name),
            if is_default {
                format!(" {}", Style::default_marker())
            } else {
                String::new()
            }
        );
        println!("  endpoint = {}", provider.endpoint);
        println!("  flavor   = {}", provider.flavor.as_str());
        println!(
            "  complete = {}",
            provider
                .completion_path
                .as_deref()
                .unwrap_or(provider.flavor.default_completion_path())
        );
        println!(
            "  health   = {}",
            provider
                .health_path
                .as_deref()
                .unwrap_or(provider.flavor.default_health_path())
        );
        if provider.requires_api_key() {
            let has_key = provider.get_api_key().is_some();
            println!(
                "  api_key  = {}",
                if has_key { "(set)" } else { "(not set)" }
            );
        }
        if provider.models.is_empty() {
            println!("  models   = (none configured)");
        } else {
            println!("  models:");
            for model in &provider.models {
                println!("    - {model}");
            }
        }
    } else {
        println!("{}\n", Style::header("Configured providers:"));
        let mut names: Vec<_> = config.providers.keys().collect();
        names.sort_unstable();
        for name in names {
            let provider = &config.providers[name];
            let is_default = default_provider == Some(name.as_str());
            println!(
                "  {}{}",
                Style::value(name),
                if is_default {
                    format!(" {}", Style::default_marker())
                } else {
                    String::new()
                }
            );
            println!(
                "    endpoint: {} ({})",
                provider.endpoint,
                provider.flavor.as_str()
            );
            if !provider.models.is_empty() {
                println!("    models: {}", provider.models.join(", "));
            }
        }
    }

    Ok(())
}
