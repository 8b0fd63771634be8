#![allow(clippy::unwrap_used)]
//! Config priority contract tests.
//!
//! CLI options take priority over config file settings.
//! Priority order (highest to lowest):
//! 1. CLI arguments
//! 2. Config file defaults
//! 3. Built-in defaults

use std::collections::HashMap;
use std::time::Duration;

use illunare_assistant::assistant::{ApiFlavor, Language};
use illunare_assistant::config::{
    AssistantDefaults, ConfigFile, ProviderConfig, ResolveOptions, resolve_config,
};

fn provider(endpoint: &str, models: &[&str]) -> ProviderConfig {
    ProviderConfig {
        endpoint: endpoint.to_string(),
        flavor: ApiFlavor::Ollama,
        api_key: Some("test_key".to_string()),
        api_key_env: None,
        models: models.iter().map(ToString::to_string).collect(),
        completion_path: None,
        health_path: None,
    }
}

fn make_config_with_defaults() -> ConfigFile {
    let mut providers = HashMap::new();
    providers.insert(
        "test_provider".to_string(),
        provider("http://test.local", &["test_model", "config_model"]),
    );

    ConfigFile {
        assistant: AssistantDefaults {
            provider: Some("test_provider".to_string()),
            model: Some("config_model".to_string()),
            language: Some("pt-BR".to_string()),
            timeout_secs: Some(3),
            ..AssistantDefaults::default()
        },
        providers,
    }
}

#[test]
fn test_config_values_used_when_cli_not_specified() {
    let resolved =
        resolve_config(&ResolveOptions::default(), &make_config_with_defaults()).unwrap();

    assert_eq!(resolved.provider_name, "test_provider");
    assert_eq!(resolved.session.model, "config_model");
    assert_eq!(resolved.session.language, Language::Portuguese);
    assert_eq!(resolved.session.timeout, Duration::from_secs(3));
    assert_eq!(resolved.session.endpoint.api_key.as_deref(), Some("test_key"));
}

#[test]
fn test_cli_language_overrides_config_language() {
    let options = ResolveOptions {
        language: Some("en".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &make_config_with_defaults()).unwrap();
    assert_eq!(resolved.session.language, Language::English);
}

#[test]
fn test_cli_model_overrides_config_model() {
    let options = ResolveOptions {
        model: Some("cli_model".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &make_config_with_defaults()).unwrap();
    assert_eq!(resolved.session.model, "cli_model");
}

#[test]
fn test_cli_provider_overrides_config_provider() {
    let mut config = make_config_with_defaults();
    config.providers.insert(
        "other_provider".to_string(),
        ProviderConfig {
            flavor: ApiFlavor::OpenAi,
            ..provider("http://other.local", &["other_model"])
        },
    );

    let options = ResolveOptions {
        provider: Some("other_provider".to_string()),
        ..ResolveOptions::default()
    };

    let resolved = resolve_config(&options, &config).unwrap();
    assert_eq!(resolved.provider_name, "other_provider");
    assert_eq!(resolved.session.endpoint.url, "http://other.local");
    assert_eq!(resolved.session.endpoint.flavor, ApiFlavor::OpenAi);
    assert_eq!(resolved.session.models, vec!["other_model".to_string()]);
}

#[test]
fn test_invalid_cli_language_returns_error() {
    let options = ResolveOptions {
        language: Some("klingon".to_string()),
        ..ResolveOptions::default()
    };

    assert!(resolve_config(&options, &make_config_with_defaults()).is_err());
}

#[test]
fn test_all_cli_options_override_config() {
    let mut config = make_config_with_defaults();
    config.providers.insert(
        "cli_provider".to_string(),
        provider("http://cli.local", &["cli_model"]),
    );

    let options = ResolveOptions {
        provider: Some("cli_provider".to_string()),
        model: Some("cli_specified_model".to_string()),
        language: Some("en".to_string()),
    };

    let resolved = resolve_config(&options, &config).unwrap();
    assert_eq!(resolved.provider_name, "cli_provider");
    assert_eq!(resolved.session.model, "cli_specified_model");
    assert_eq!(resolved.session.language, Language::English);
    // Tuning that has no CLI option still comes from the file
    assert_eq!(resolved.session.timeout, Duration::from_secs(3));
}
