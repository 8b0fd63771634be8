//! Configuration file handling and option resolution.

mod manager;

pub use manager::{
    AssistantDefaults, ConfigFile, ConfigManager, ProviderConfig, ResolveOptions, ResolvedConfig,
    resolve_config,
};
