//! Interactive chat mode.
//!
//! Provides a REPL-style interface with slash commands on top of
//! [`crate::assistant::ChatSession`].

/// Slash command parsing and autocomplete.
pub mod command;
mod repl;
mod ui;

pub use repl::ChatRepl;
