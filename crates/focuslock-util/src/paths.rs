//! Config file location
//!
//! `$FOCUSLOCK_CONFIG` wins; otherwise `$XDG_CONFIG_HOME/focuslock/config.toml`,
//! then `~/.config/focuslock/config.toml`.

use std::path::PathBuf;

/// Overrides the config file path when set
pub const FOCUSLOCK_CONFIG_ENV: &str = "FOCUSLOCK_CONFIG";

const APP_DIR: &str = "focuslock";
const CONFIG_FILENAME: &str = "config.toml";

pub fn default_config_path() -> PathBuf {
    match std::env::var_os(FOCUSLOCK_CONFIG_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => config_path_without_env(),
    }
}

/// The XDG location, ignoring `FOCUSLOCK_CONFIG`
pub fn config_path_without_env() -> PathBuf {
    config_home().join(APP_DIR).join(CONFIG_FILENAME)
}

fn config_home() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }

    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".config"),
        // No home directory: keep the path relative to the working directory
        None => PathBuf::from(".config"),
    }
}
