//! Configuration parsing and validation for focuslock
//!
//! A versioned TOML file supplies keyword sets, grant limits, reply phrases
//! and the starting context. Every section is optional. Validation reports
//! all problems at once.

mod policy;
mod schema;
mod validation;

pub use policy::*;
pub use schema::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("config_version {0} is not supported")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Read, parse and validate a config file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Policy> {
    parse_config(&std::fs::read_to_string(path)?)
}

/// Load configuration, falling back to built-in defaults when the file does not exist
pub fn load_config_or_default(path: impl AsRef<Path>) -> ConfigResult<Policy> {
    let path = path.as_ref();
    if !path.exists() {
        info!(config_path = %path.display(), "No config file, using built-in defaults");
        return Ok(Policy::default());
    }
    load_config(path)
}

pub fn parse_config(content: &str) -> ConfigResult<Policy> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    match validate_config(&raw) {
        errors if errors.is_empty() => {
            debug!("Configuration validated");
            Ok(Policy::from_raw(raw))
        }
        errors => Err(ConfigError::ValidationFailed { errors }),
    }
}

pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_minimal_config() {
        let policy = parse_config("config_version = 1").unwrap();
        assert_eq!(policy.limits, GrantLimits::default());
        assert_eq!(policy.keywords, Keywords::default());
    }

    #[test]
    fn parse_full_config() {
        let config = r#"
            config_version = 1

            [service]
            tick_interval_ms = 500
            auto_current_time = false

            [context]
            unlock_scene_desc = "回复工作消息、查看今日待办"
            supplementary_tips = "使用完记得活动一下肩颈，喝口水～"

            [limits]
            max_minutes = 90

            [phrases]
            encouragement = ["加油"]
        "#;

        let policy = parse_config(config).unwrap();
        assert_eq!(policy.service.tick_interval.as_millis(), 500);
        assert!(!policy.service.auto_current_time);
        assert_eq!(policy.context.unlock_scene_desc, "回复工作消息、查看今日待办");
        assert_eq!(policy.limits.max_minutes, 90.0);
        assert_eq!(policy.limits.suggested_minutes, 60);
        assert_eq!(policy.phrases.encouragement, vec!["加油".to_string()]);
    }

    #[test]
    fn example_config_is_valid() {
        let policy = parse_config(include_str!("../config.example.toml")).unwrap();
        assert_eq!(policy.limits, GrantLimits::default());
        assert_eq!(policy.phrases, Phrases::default());
        assert_eq!(policy.context.user_info, "你是一位正在准备重要汇报的产品经理。");
    }

    #[test]
    fn reject_wrong_version() {
        let result = parse_config("config_version = 99");
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(99))));
    }

    #[test]
    fn reject_invalid_config() {
        let config = r#"
            config_version = 1
            [limits]
            max_minutes = -5
        "#;

        let result = parse_config(config);
        assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "config_version = 1\n[limits]\nmin_goal_chars = 4").unwrap();

        let policy = load_config(file.path()).unwrap();
        assert_eq!(policy.limits.min_goal_chars, 4);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let policy = load_config_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(policy.limits, GrantLimits::default());

        assert!(matches!(
            load_config(dir.path().join("absent.toml")),
            Err(ConfigError::ReadError(_))
        ));
    }
}
