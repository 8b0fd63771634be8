//! Consistent styling utilities for CLI output.

use owo_colors::OwoColorize;
use std::fmt::Display;

use crate::assistant::{ConnectionState, Role};

/// Styles for different semantic elements.
pub struct Style;

impl Style {
    /// Section headers ("Configuration", "Available commands")
    pub fn header<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    /// Labels/keys ("provider", "model")
    pub fn label<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Primary values (provider and model names)
    pub fn value<T: Display>(text: T) -> String {
        format!("{}", text.cyan())
    }

    /// Secondary info (endpoints, descriptions)
    pub fn secondary<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    pub fn success<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    pub fn error<T: Display>(text: T) -> String {
        format!("{}", text.red().bold())
    }

    pub fn warning<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    /// Slash commands ("/status", "/help")
    pub fn command<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    /// Language codes
    pub fn code<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    pub fn hint<T: Display>(text: T) -> String {
        format!("{}", text.dimmed().italic())
    }

    pub fn default_marker() -> String {
        format!("{}", "(default)".dimmed())
    }

    pub fn version<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Speaker prefix for a transcript line.
    pub fn role(role: Role) -> String {
        match role {
            Role::User => format!("{}", "you".blue().bold()),
            Role::Assistant => format!("{}", "assistant".magenta().bold()),
        }
    }

    /// Connection state, colored by health.
    pub fn connection(state: ConnectionState) -> String {
        match state {
            ConnectionState::Connected => Self::success(state),
            ConnectionState::Connecting => Self::warning(state),
            ConnectionState::Degraded => format!("{}", state.red()),
            ConnectionState::Disconnected => Self::secondary(state),
        }
    }
}
