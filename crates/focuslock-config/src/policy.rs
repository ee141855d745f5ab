//! Validated policy structures

use crate::schema::{RawConfig, RawContext, RawKeywords, RawLimits, RawPhrases, RawServiceConfig};
use focuslock_api::ContextSettings;
use std::time::Duration;

const DEFAULT_GOAL_KEYWORDS: &[&str] = &[
    "工作", "学习", "复习", "作业", "论文", "报告", "家人", "消息", "会议", "演讲", "演示", "面试",
    "购物", "支付", "导航", "备忘", "记账", "健身", "打车",
];

const DEFAULT_DENY_KEYWORDS: &[&str] = &[
    "刷", "游戏", "b站", "b 站", "抖音", "微博", "短视频", "视频", "摸鱼", "放松", "追剧", "小说",
    "娱乐",
];

const DEFAULT_URGENT_KEYWORDS: &[&str] = &[
    "紧急", "立刻", "马上", "重要", "deadline", "急用", "加急", "救", "医院", "家人",
];

const DEFAULT_POSITIVE_MARKERS: &[&str] = &["只", "正在", "专注", "处理", "回复", "记录"];

const DEFAULT_COMPLETION_KEYWORDS: &[&str] = &["完成", "结束", "搞定", "处理好了", "用完"];

const DEFAULT_EXTEND_KEYWORDS: &[&str] = &["延长", "再给", "多用", "继续用", "再用", "还能用"];

const DEFAULT_SCENE: &str = "回复工作消息、查看今日待办";
const DEFAULT_TIPS: &str = "使用完记得活动一下肩颈，喝口水～";
const DEFAULT_PERSONA: &str = "你是一位正在准备重要汇报的产品经理。";

const DEFAULT_ENCOURAGEMENT: &[&str] = &[
    "记得深呼吸一下再继续～",
    "保持节奏，做完这一轮就可以休息啦。",
    "我在这儿陪你，一起完成目标。",
];

/// Validated policy ready for use by the core engine
#[derive(Debug, Clone)]
pub struct Policy {
    /// Driver configuration
    pub service: ServiceConfig,

    /// Context the session starts with
    pub context: ContextSettings,

    pub keywords: Keywords,

    pub limits: GrantLimits,

    pub phrases: Phrases,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            context: default_context(),
            keywords: Keywords::default(),
            limits: GrantLimits::default(),
            phrases: Phrases::default(),
        }
    }
}

impl Policy {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            service: ServiceConfig::from_raw(raw.service),
            context: convert_context(raw.context),
            keywords: Keywords::from_raw(raw.keywords),
            limits: GrantLimits::from_raw(raw.limits),
            phrases: Phrases::from_raw(raw.phrases),
        }
    }
}

/// Driver configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Expiry check resolution
    pub tick_interval: Duration,
    pub auto_current_time: bool,
}

impl ServiceConfig {
    fn from_raw(raw: RawServiceConfig) -> Self {
        let defaults = Self::default();
        Self {
            tick_interval: raw
                .tick_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
            auto_current_time: raw.auto_current_time.unwrap_or(defaults.auto_current_time),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1000),
            auto_current_time: true,
        }
    }
}

/// Keyword sets consulted by the intent classifier and deviation checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keywords {
    pub goal: Vec<String>,
    pub deny: Vec<String>,
    pub urgent: Vec<String>,
    pub positive: Vec<String>,
    pub completion: Vec<String>,
    pub extend: Vec<String>,
}

impl Keywords {
    fn from_raw(raw: RawKeywords) -> Self {
        let defaults = Self::default();
        Self {
            goal: raw.goal.unwrap_or(defaults.goal),
            deny: lowercased(raw.deny).unwrap_or(defaults.deny),
            urgent: lowercased(raw.urgent).unwrap_or(defaults.urgent),
            positive: raw.positive.unwrap_or(defaults.positive),
            completion: raw.completion.unwrap_or(defaults.completion),
            extend: raw.extend.unwrap_or(defaults.extend),
        }
    }
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            goal: owned(DEFAULT_GOAL_KEYWORDS),
            deny: owned(DEFAULT_DENY_KEYWORDS),
            urgent: owned(DEFAULT_URGENT_KEYWORDS),
            positive: owned(DEFAULT_POSITIVE_MARKERS),
            completion: owned(DEFAULT_COMPLETION_KEYWORDS),
            extend: owned(DEFAULT_EXTEND_KEYWORDS),
        }
    }
}

/// Limits applied before a grant
#[derive(Debug, Clone, PartialEq)]
pub struct GrantLimits {
    /// Requests above this need an urgent keyword
    pub max_minutes: f64,
    pub suggested_minutes: u32,
    pub min_goal_chars: usize,
}

impl GrantLimits {
    fn from_raw(raw: RawLimits) -> Self {
        let defaults = Self::default();
        Self {
            max_minutes: raw.max_minutes.unwrap_or(defaults.max_minutes),
            suggested_minutes: raw.suggested_minutes.unwrap_or(defaults.suggested_minutes),
            min_goal_chars: raw.min_goal_chars.unwrap_or(defaults.min_goal_chars),
        }
    }
}

impl Default for GrantLimits {
    fn default() -> Self {
        Self {
            max_minutes: 120.0,
            suggested_minutes: 60,
            min_goal_chars: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrases {
    pub encouragement: Vec<String>,
}

impl Phrases {
    fn from_raw(raw: RawPhrases) -> Self {
        Self {
            encouragement: raw
                .encouragement
                .unwrap_or_else(|| owned(DEFAULT_ENCOURAGEMENT)),
        }
    }
}

impl Default for Phrases {
    fn default() -> Self {
        Self {
            encouragement: owned(DEFAULT_ENCOURAGEMENT),
        }
    }
}

/// Starting context when no config overrides it. `current_time` is left
/// empty for the engine to fill from the clock.
fn default_context() -> ContextSettings {
    ContextSettings {
        current_time: String::new(),
        unlock_scene_desc: DEFAULT_SCENE.to_string(),
        supplementary_tips: DEFAULT_TIPS.to_string(),
        user_info: DEFAULT_PERSONA.to_string(),
    }
}

// Omitted fields keep the default; an empty string clears one
fn convert_context(raw: RawContext) -> ContextSettings {
    let defaults = default_context();
    ContextSettings {
        current_time: raw.current_time.unwrap_or(defaults.current_time),
        unlock_scene_desc: raw.unlock_scene_desc.unwrap_or(defaults.unlock_scene_desc),
        supplementary_tips: raw.supplementary_tips.unwrap_or(defaults.supplementary_tips),
        user_info: raw.user_info.unwrap_or(defaults.user_info),
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

// Deny and urgent matching runs against lower-cased text
fn lowercased(words: Option<Vec<String>>) -> Option<Vec<String>> {
    words.map(|list| list.into_iter().map(|w| w.to_lowercase()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builtin_sets() {
        let policy = Policy::default();
        assert_eq!(policy.keywords.goal.len(), DEFAULT_GOAL_KEYWORDS.len());
        assert!(policy.keywords.deny.contains(&"b站".to_string()));
        assert_eq!(policy.phrases.encouragement.len(), 3);
        assert_eq!(policy.limits.max_minutes, 120.0);
        assert_eq!(policy.service.tick_interval, Duration::from_secs(1));
        assert_eq!(policy.context.unlock_scene_desc(), Some(DEFAULT_SCENE));
        assert_eq!(policy.context.supplementary_tips(), Some(DEFAULT_TIPS));
        assert_eq!(policy.context.user_info(), Some(DEFAULT_PERSONA));
        assert_eq!(policy.context.current_time(), None);
    }

    #[test]
    fn context_fields_fall_back_individually() {
        let raw: RawConfig = toml::from_str(
            r#"
            config_version = 1

            [context]
            user_info = "学生"
            supplementary_tips = ""
            "#,
        )
        .unwrap();

        let policy = Policy::from_raw(raw);
        assert_eq!(policy.context.user_info, "学生");
        assert_eq!(policy.context.supplementary_tips(), None);
        assert_eq!(policy.context.unlock_scene_desc(), Some(DEFAULT_SCENE));
    }

    #[test]
    fn overrides_replace_only_given_lists() {
        let raw: RawConfig = toml::from_str(
            r#"
            config_version = 1

            [keywords]
            deny = ["Bilibili"]
            "#,
        )
        .unwrap();

        let policy = Policy::from_raw(raw);
        assert_eq!(policy.keywords.deny, vec!["bilibili".to_string()]);
        assert_eq!(policy.keywords.goal, Keywords::default().goal);
    }
}
