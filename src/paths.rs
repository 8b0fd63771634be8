//! XDG-style locations for the config file and the history database.
//!
//! XDG variables win over OS-specific locations on every platform.

use std::path::PathBuf;

const APP_DIR: &str = "illunare-ai";

/// `$XDG_CONFIG_HOME/illunare-ai`, or `~/.config/illunare-ai`.
pub fn config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// `$XDG_CACHE_HOME/illunare-ai`, or `~/.cache/illunare-ai`.
pub fn cache_dir() -> PathBuf {
    xdg_dir("XDG_CACHE_HOME", ".cache")
}

fn xdg_dir(var: &str, home_fallback: &str) -> PathBuf {
    std::env::var_os(var)
        .filter(|value| !value.is_empty())
        .map_or_else(
            || home_dir().join(home_fallback).join(APP_DIR),
            |base| PathBuf::from(base).join(APP_DIR),
        )
}

/// Home directory, or the current directory when it cannot be determined.
fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_env<T>(var: &str, value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let original = std::env::var_os(var);
        // SAFETY: tests touching the environment are serialized
        unsafe {
            match value {
                Some(v) => std::env::set_var(var, v),
                None => std::env::remove_var(var),
            }
        }

        let result = f();

        unsafe {
            match original {
                Some(v) => std::env::set_var(var, v),
                None => std::env::remove_var(var),
            }
        }
        result
    }

    #[test]
    #[serial]
    fn test_config_dir_default() {
        let dir = with_env("XDG_CONFIG_HOME", None, config_dir);
        assert!(dir.ends_with(".config/illunare-ai"));
    }

    #[test]
    #[serial]
    fn test_config_dir_xdg_override() {
        let dir = with_env("XDG_CONFIG_HOME", Some("/custom/config"), config_dir);
        assert_eq!(dir, PathBuf::from("/custom/config/illunare-ai"));
    }

    #[test]
    #[serial]
    fn test_empty_xdg_value_is_ignored() {
        let dir = with_env("XDG_CACHE_HOME", Some(""), cache_dir);
        assert!(dir.ends_with(".cache/illunare-ai"));
    }

    #[test]
    #[serial]
    fn test_cache_dir_xdg_override() {
        let dir = with_env("XDG_CACHE_HOME", Some("/custom/cache"), cache_dir);
        assert_eq!(dir, PathBuf::from("/custom/cache/illunare-ai"));
    }
}
