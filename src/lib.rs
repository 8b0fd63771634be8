//! # illunare-ai - Terminal Documentation Assistant
//!
//! Chat with a self-hosted model (Ollama or any OpenAI-compatible endpoint)
//! about Illunare's products. When the endpoint is down or slow, questions are
//! still answered from a built-in set of offline responses in English or
//! Brazilian Portuguese.
//!
//! ## Quick Start
//!
//! ```bash
//! # Interactive chat (the default command)
//! illunare-ai
//!
//! # One-shot question
//! illunare-ai ask "How do I integrate the industrial protocol adapter?"
//!
//! # Is the endpoint up?
//! illunare-ai probe
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/illunare-ai/config.toml`:
//!
//! ```toml
//! [assistant]
//! provider = "local"
//! model = "deepseek-r1"
//! language = "pt-BR"
//!
//! [providers.local]
//! endpoint = "http://localhost:11434"
//! flavor = "ollama"
//! models = ["deepseek-r1", "deepseek-r3"]
//! ```

/// Chat session core: transcript, connection state, inference and fallback.
pub mod assistant;

/// Interactive chat mode.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and provider settings.
pub mod config;

/// File system utilities.
pub mod fs;

/// Transcript persistence.
pub mod history;

/// XDG-style path utilities for configuration and history.
pub mod paths;

/// Terminal UI components (spinner, colors).
pub mod ui;
