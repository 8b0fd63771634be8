//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Select, Text};

use crate::assistant::SUPPORTED_LANGUAGES;
use crate::config::{ConfigFile, ConfigManager};
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command to edit default settings.
///
/// Lets the user pick the default provider, model and answer language.
/// Other `[assistant]` settings are left as they are.
pub fn run_configure() -> Result<()> {
    handle_prompt_cancellation(run_configure_inner)
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new();
    let mut config = manager.load_or_default()?;

    if config.providers.is_empty() {
        bail!(
            "No providers configured.\n\n\
             Add a [providers.<name>] section to {} first.",
            manager.config_path().display()
        );
    }

    print_current_defaults(&config);

    let mut provider_names: Vec<String> = config.providers.keys().cloned().collect();
    provider_names.sort_unstable();
    let provider = select_provider(&provider_names, config.assistant.provider.as_deref())?;

    let available_models = config
        .providers
        .get(&provider)
        .map(|p| p.models.clone())
        .unwrap_or_default();
    let model = select_model(&available_models, config.assistant.model.as_deref())?;

    let language = select_language(config.assistant.language.as_deref())?;

    config.assistant.provider = Some(provider);
    config.assistant.model = Some(model);
    config.assistant.language = Some(language);

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn print_current_defaults(config: &ConfigFile) {
    let show = |value: Option<&str>| value.map_or_else(|| Style::secondary("(not set)"), Style::value);

    println!("{}", Style::header("Current defaults"));
    println!(
        "  {}  {}",
        Style::label("provider"),
        show(config.assistant.provider.as_deref())
    );
    println!(
        "  {}     {}",
        Style::label("model"),
        show(config.assistant.model.as_deref())
    );
    println!(
        "  {}  {}",
        Style::label("language"),
        show(config.assistant.language.as_deref())
    );
    println!();
}

fn select_provider(providers: &[String], default: Option<&str>) -> Result<String> {
    let default_index = default
        .and_then(|d| providers.iter().position(|p| p == d))
        .unwrap_or(0);

    let selection = Select::new("Default provider:", providers.to_vec())
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(selection)
}

fn select_model(available_models: &[String], default: Option<&str>) -> Result<String> {
    if available_models.is_empty() {
        let mut prompt = Text::new("Default model:").with_help_message("Enter the model name");

        if let Some(d) = default {
            prompt = prompt.with_default(d);
        }

        let model = prompt.prompt()?;

        if model.trim().is_empty() {
            bail!("Model name cannot be empty");
        }

        Ok(model.trim().to_string())
    } else {
        let default_index = default
            .and_then(|d| available_models.iter().position(|m| m == d))
            .unwrap_or(0);

        let selection = Select::new("Default model:", available_models.to_vec())
            .with_starting_cursor(default_index)
            .prompt()?;

        Ok(selection)
    }
}

fn select_language(default: Option<&str>) -> Result<String> {
    let options: Vec<String> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, name)| format!("{code} - {name}"))
        .collect();

    let default_index = default
        .and_then(|d| SUPPORTED_LANGUAGES.iter().position(|(code, _)| *code == d))
        .unwrap_or(0);

    let selection = Select::new("Answer language:", options)
        .with_starting_cursor(default_index)
        .prompt()?;

    // Options are formatted as "code - Name"
    let code = selection.split(" - ").next().unwrap_or(&selection);

    Ok(code.to_string())
}
