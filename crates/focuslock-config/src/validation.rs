//! Configuration validation

use crate::schema::{RawConfig, RawKeywords};
use thiserror::Error;

/// Longest allowed expiry check interval; expiry must resolve within a second
pub const MAX_TICK_INTERVAL_MS: u64 = 1000;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Keyword list '{list}': {message}")]
    KeywordError { list: &'static str, message: String },

    #[error("Invalid limit '{field}': {message}")]
    InvalidLimit { field: &'static str, message: String },

    #[error("Phrase list '{list}': {message}")]
    PhraseError { list: &'static str, message: String },

    #[error("Service config error: {0}")]
    ServiceError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_keywords(&config.keywords));

    // Limits
    if let Some(max) = config.limits.max_minutes
        && (!max.is_finite() || max <= 0.0)
    {
        errors.push(ValidationError::InvalidLimit {
            field: "max_minutes",
            message: format!("must be a positive number, got {}", max),
        });
    }

    if let Some(suggested) = config.limits.suggested_minutes {
        if suggested == 0 {
            errors.push(ValidationError::InvalidLimit {
                field: "suggested_minutes",
                message: "must be greater than 0".into(),
            });
        }

        let max = config.limits.max_minutes.unwrap_or(120.0);
        if max.is_finite() && f64::from(suggested) > max {
            errors.push(ValidationError::InvalidLimit {
                field: "suggested_minutes",
                message: format!("{} exceeds max_minutes {}", suggested, max),
            });
        }
    }

    // Phrases
    if let Some(phrases) = &config.phrases.encouragement {
        if phrases.is_empty() {
            errors.push(ValidationError::PhraseError {
                list: "encouragement",
                message: "needs at least one phrase".into(),
            });
        }
        if phrases.iter().any(|p| p.trim().is_empty()) {
            errors.push(ValidationError::PhraseError {
                list: "encouragement",
                message: "phrases cannot be blank".into(),
            });
        }
    }

    // Service
    if let Some(ms) = config.service.tick_interval_ms
        && (ms == 0 || ms > MAX_TICK_INTERVAL_MS)
    {
        errors.push(ValidationError::ServiceError(format!(
            "tick_interval_ms must be between 1 and {}, got {}",
            MAX_TICK_INTERVAL_MS, ms
        )));
    }

    errors
}

fn validate_keywords(keywords: &RawKeywords) -> Vec<ValidationError> {
    let lists: [(&'static str, &Option<Vec<String>>); 6] = [
        ("goal", &keywords.goal),
        ("deny", &keywords.deny),
        ("urgent", &keywords.urgent),
        ("positive", &keywords.positive),
        ("completion", &keywords.completion),
        ("extend", &keywords.extend),
    ];

    let mut errors = Vec::new();
    for (list, words) in lists {
        let Some(words) = words else { continue };

        // A blank keyword would match every input
        if words.iter().any(|w| w.trim().is_empty()) {
            errors.push(ValidationError::KeywordError {
                list,
                message: "keywords cannot be blank".into(),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> RawConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        let errors = validate_config(&parse("config_version = 1"));
        assert!(errors.is_empty());
    }

    #[test]
    fn blank_keyword_rejected() {
        let config = parse(
            r#"
            config_version = 1
            [keywords]
            deny = ["游戏", " "]
            "#,
        );

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::KeywordError { list: "deny", .. }
        )));
    }

    #[test]
    fn suggested_above_max_rejected() {
        let config = parse(
            r#"
            config_version = 1
            [limits]
            max_minutes = 30
            suggested_minutes = 60
            "#,
        );

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ValidationError::InvalidLimit { field: "suggested_minutes", .. }
        ));
    }

    #[test]
    fn tick_interval_capped_at_one_second() {
        let config = parse(
            r#"
            config_version = 1
            [service]
            tick_interval_ms = 5000
            "#,
        );

        let errors = validate_config(&config);
        assert!(matches!(errors[0], ValidationError::ServiceError(_)));
    }

    #[test]
    fn empty_encouragement_rejected() {
        let config = parse(
            r#"
            config_version = 1
            [phrases]
            encouragement = []
            "#,
        );

        let errors = validate_config(&config);
        assert!(matches!(
            errors[0],
            ValidationError::PhraseError { list: "encouragement", .. }
        ));
    }
}
