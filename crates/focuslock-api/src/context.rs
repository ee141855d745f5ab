//! Caller-supplied context settings

use serde::{Deserialize, Serialize};

/// Free-text context the caller attaches to every turn.
///
/// All fields are caller-mutable. A blank field is treated as not configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    /// Pre-formatted current time, e.g. `2024年05月01日（周三）14:05`
    pub current_time: String,

    /// What the device may be used for while unlocked
    pub unlock_scene_desc: String,

    /// Supplementary reminder appended to grants
    pub supplementary_tips: String,

    /// User persona text
    pub user_info: String,
}

impl ContextSettings {
    pub fn current_time(&self) -> Option<&str> {
        non_blank(&self.current_time)
    }

    pub fn unlock_scene_desc(&self) -> Option<&str> {
        non_blank(&self.unlock_scene_desc)
    }

    pub fn supplementary_tips(&self) -> Option<&str> {
        non_blank(&self.supplementary_tips)
    }

    pub fn user_info(&self) -> Option<&str> {
        non_blank(&self.user_info)
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_unset() {
        let ctx = ContextSettings {
            current_time: "  ".into(),
            unlock_scene_desc: "回复工作消息".into(),
            supplementary_tips: String::new(),
            user_info: " 产品经理 ".into(),
        };

        assert_eq!(ctx.current_time(), None);
        assert_eq!(ctx.unlock_scene_desc(), Some("回复工作消息"));
        assert_eq!(ctx.supplementary_tips(), None);
        assert_eq!(ctx.user_info(), Some("产品经理"));
    }
}
