//! Assistant languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

/// Language used for canned answers, the welcome message and the system instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en", alias = "en-US")]
    English,
    #[serde(rename = "pt-BR", alias = "pt")]
    Portuguese,
}

/// Supported language codes and their names.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("pt-BR", "Português")];

impl Language {
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Portuguese => "pt-BR",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Portuguese => "Português",
        }
    }

    /// Returns the other language.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::English => Self::Portuguese,
            Self::Portuguese => Self::English,
        }
    }

    /// Maps a locale tag such as `pt_BR.UTF-8` or `en-US` to a language.
    ///
    /// Anything that is not Portuguese falls back to English.
    pub fn from_locale(tag: &str) -> Self {
        if tag.trim().to_ascii_lowercase().starts_with("pt") {
            Self::Portuguese
        } else {
            Self::English
        }
    }

    /// Detects the language from the `LANG` environment variable.
    pub fn from_env() -> Self {
        std::env::var("LANG").map_or(Self::English, |tag| Self::from_locale(&tag))
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Self::English),
            "pt" | "pt-br" | "portuguese" | "português" => Ok(Self::Portuguese),
            _ => Err(ConfigError::UnknownLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
