use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::assistant::{
    ApiFlavor, DEFAULT_CONTEXT_MESSAGES, DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_TRANSCRIPT,
    DEFAULT_PROBE_INTERVAL, DEFAULT_TIMEOUT, EndpointConfig, GenerationOptions, Language,
    SessionConfig,
};
use crate::history::{DEFAULT_HISTORY_KEY, DEFAULT_LANGUAGE_KEY};
use crate::ui::Style;
use crate::{fs as atomic_fs, paths};

/// Default settings in the `[assistant]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantDefaults {
    /// Default provider name.
    pub provider: Option<String>,
    /// Default model name.
    pub model: Option<String>,
    /// Answer language (`en` or `pt-BR`). Falls back to `LANG` when unset.
    pub language: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Seconds between health probes in chat mode. `0` disables probing.
    pub probe_interval_secs: Option<u64>,
    pub context_messages: Option<usize>,
    pub max_transcript: Option<usize>,
    pub history_limit: Option<usize>,
    pub history_key: Option<String>,
    /// Sampling parameters; missing keys keep their defaults.
    pub options: Option<GenerationOptions>,
}

/// An inference endpoint the assistant can talk to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the endpoint.
    pub endpoint: String,
    /// Wire schema (`ollama` or `openai`).
    #[serde(default)]
    pub flavor: ApiFlavor,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Models available on this endpoint.
    #[serde(default)]
    pub models: Vec<String>,
    /// Overrides the flavor's completion path.
    #[serde(default)]
    pub completion_path: Option<String>,
    /// Overrides the flavor's health-check path.
    #[serde(default)]
    pub health_path: Option<String>,
}

impl ProviderConfig {
    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/illunare-ai/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub assistant: AssistantDefaults,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Configuration after merging CLI arguments, the config file and built-in defaults.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider_name: String,
    pub session: SessionConfig,
    /// `None` when periodic probing is disabled.
    pub probe_interval: Option<Duration>,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values.
///
/// # Errors
///
/// Returns an error if the provider or model is missing, the provider is not
/// configured, a required API key is absent, or a value is invalid.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let defaults = &config_file.assistant;

    let provider_name = options
        .provider
        .as_ref()
        .or(defaults.provider.as_ref())
        .cloned()
        .ok_or_else(|| {
            anyhow!(
                "Missing required configuration: 'provider'\n\n\
                 Please provide it via:\n  \
                 - CLI option: illunare-ai --provider <name>\n  \
                 - Config file: ~/.config/illunare-ai/config.toml"
            )
        })?;

    let provider_config = config_file.providers.get(&provider_name).ok_or_else(|| {
        let mut available: Vec<_> = config_file.providers.keys().map(String::as_str).collect();
        available.sort_unstable();
        if available.is_empty() {
            anyhow!(
                "Provider '{provider_name}' not found\n\n\
                 No providers configured. Add providers to ~/.config/illunare-ai/config.toml"
            )
        } else {
            anyhow!(
                "Provider '{provider_name}' not found\n\n\
                 Available providers:\n  \
                 - {}\n\n\
                 Add providers to ~/.config/illunare-ai/config.toml",
                available.join("\n  - ")
            )
        }
    })?;

    let model = options
        .model
        .as_ref()
        .or(defaults.model.as_ref())
        .or_else(|| provider_config.models.first())
        .cloned()
        .ok_or_else(|| {
            anyhow!(
                "Missing required configuration: 'model'\n\n\
                 Please provide it via:\n  \
                 - CLI option: illunare-ai --model <name>\n  \
                 - Config file: ~/.config/illunare-ai/config.toml"
            )
        })?;

    if !provider_config.models.is_empty() && !provider_config.models.contains(&model) {
        eprintln!(
            "{} Model '{}' is not in the configured models list for '{}'\n\
             Configured models: {}\n\
             Proceeding anyway...\n",
            Style::warning("Warning:"),
            model,
            provider_name,
            provider_config.models.join(", ")
        );
    }

    let language = match options.language.as_ref().or(defaults.language.as_ref()) {
        Some(code) => code.parse::<Language>()?,
        None => Language::from_env(),
    };

    let api_key = provider_config.get_api_key();
    if provider_config.requires_api_key() && api_key.is_none() {
        let env_var = provider_config.api_key_env.as_deref().unwrap_or("API_KEY");
        bail!(
            "Provider '{provider_name}' requires an API key\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key in ~/.config/illunare-ai/config.toml"
        );
    }

    let session = SessionConfig {
        endpoint: EndpointConfig {
            url: provider_config.endpoint.clone(),
            flavor: provider_config.flavor,
            completion_path: provider_config.completion_path.clone(),
            health_path: provider_config.health_path.clone(),
            api_key,
        },
        model,
        models: provider_config.models.clone(),
        language,
        options: defaults.options.unwrap_or_default(),
        timeout: defaults
            .timeout_secs
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
        context_messages: defaults.context_messages.unwrap_or(DEFAULT_CONTEXT_MESSAGES),
        max_transcript: defaults.max_transcript.unwrap_or(DEFAULT_MAX_TRANSCRIPT),
        history_limit: defaults.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
        history_key: defaults
            .history_key
            .clone()
            .unwrap_or_else(|| DEFAULT_HISTORY_KEY.to_string()),
        language_key: DEFAULT_LANGUAGE_KEY.to_string(),
    };
    session
        .validate()
        .with_context(|| format!("Invalid configuration for provider '{provider_name}'"))?;

    let probe_interval = match defaults.probe_interval_secs {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => Some(DEFAULT_PROBE_INTERVAL),
    };

    Ok(ResolvedConfig {
        provider_name,
        session,
        probe_interval,
    })
}

/// Manages loading and saving the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Configuration lives at `$XDG_CONFIG_HOME/illunare-ai/config.toml`
    /// or `~/.config/illunare-ai/config.toml`.
    pub fn new() -> Self {
        Self::with_path(paths::config_dir().join("config.toml"))
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        toml::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })
    }

    /// Loads the config file, or an empty configuration if there is none yet.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
        atomic_fs::atomic_write(&self.config_path, &contents)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
