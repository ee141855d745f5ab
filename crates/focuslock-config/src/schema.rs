//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Driver settings
    #[serde(default)]
    pub service: RawServiceConfig,

    /// Initial context settings
    #[serde(default)]
    pub context: RawContext,

    /// Keyword sets used by the intent classifier and deviation checker
    #[serde(default)]
    pub keywords: RawKeywords,

    /// Grant limits
    #[serde(default)]
    pub limits: RawLimits,

    /// Reply phrases
    #[serde(default)]
    pub phrases: RawPhrases,
}

/// Driver-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// How often the expiry check runs, in milliseconds (max 1000)
    pub tick_interval_ms: Option<u64>,

    /// Refresh `context.current_time` from the clock before every turn
    pub auto_current_time: Option<bool>,
}

/// Initial context text
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawContext {
    pub current_time: Option<String>,
    pub unlock_scene_desc: Option<String>,
    pub supplementary_tips: Option<String>,
    pub user_info: Option<String>,
}

/// Keyword overrides. Omitted lists keep the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawKeywords {
    /// Words that make a request look purposeful
    pub goal: Option<Vec<String>>,

    /// Entertainment and leisure terms
    pub deny: Option<Vec<String>>,

    /// Words that override the deny list and the duration ceiling
    pub urgent: Option<Vec<String>>,

    /// On-task markers in screenshot descriptions
    pub positive: Option<Vec<String>>,

    /// Words meaning the task is finished
    pub completion: Option<Vec<String>>,

    /// Words asking for more time
    pub extend: Option<Vec<String>>,
}

/// Grant limits
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawLimits {
    /// Longest grant without an urgent keyword, in minutes
    pub max_minutes: Option<f64>,

    /// Duration suggested when a request exceeds `max_minutes`
    pub suggested_minutes: Option<u32>,

    /// Requests longer than this many characters count as having a goal
    pub min_goal_chars: Option<usize>,
}

/// Phrase overrides
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPhrases {
    /// Encouragement appended to grants when no supplementary tip is set
    pub encouragement: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_sections() {
        let config: RawConfig = toml::from_str("config_version = 1").unwrap();
        assert!(config.keywords.deny.is_none());
        assert!(config.limits.max_minutes.is_none());
        assert!(config.service.tick_interval_ms.is_none());
    }

    #[test]
    fn parse_keyword_overrides() {
        let toml_str = r#"
            config_version = 1

            [keywords]
            deny = ["游戏", "直播"]
            urgent = ["紧急"]

            [limits]
            max_minutes = 90
            suggested_minutes = 45
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.keywords.deny.as_ref().unwrap().len(), 2);
        assert_eq!(config.limits.max_minutes, Some(90.0));
        assert_eq!(config.limits.suggested_minutes, Some(45));
        assert!(config.keywords.goal.is_none());
    }
}
