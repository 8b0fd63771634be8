//! Subcommand implementations.

/// One-shot question handler.
pub mod ask;

/// Chat mode command handler.
pub mod chat;

/// Configure command handler.
pub mod configure;

/// Offline answer command handler.
pub mod fallback;

/// Saved conversation command handler.
pub mod history;

/// Endpoint health check command handler.
pub mod probe;

/// Provider listing command handler.
pub mod providers;

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::assistant::{ChatSession, HttpBackend};
use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::history::SqliteStore;

/// Options shared by every command that talks to an endpoint.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
}

impl SessionOptions {
    fn resolve(&self) -> Result<ResolvedConfig> {
        let manager = ConfigManager::new();
        let config_file = manager.load_or_default()?;
        let options = ResolveOptions {
            provider: self.provider.clone(),
            model: self.model.clone(),
            language: self.language.clone(),
        };
        resolve_config(&options, &config_file)
    }
}

/// Builds a session over HTTP with its transcript and language restored from
/// the history database. An explicit `--lang` replaces the saved language.
fn open_session(options: &SessionOptions) -> Result<(ResolvedConfig, ChatSession)> {
    let resolved = options.resolve()?;
    let backend = HttpBackend::new(&resolved.session.endpoint)?;
    let store = SqliteStore::new().context("Failed to open the history database")?;
    let session = ChatSession::restore(resolved.session.clone(), backend, Arc::new(store))?;
    if options.language.is_some() {
        session.set_language(resolved.session.language);
    }
    Ok((resolved, session))
}
