//! Screenshot deviation checks

use focuslock_api::{Allowance, DeviationCheck};
use focuslock_config::Keywords;

use crate::contains_keyword;

const NO_DESCRIPTION_MESSAGE: &str = "还没有截图描述，我会继续帮你观察～";
const NOTHING_PERMITTED_MESSAGE: &str = "当前并没有开放的使用权限，我先帮你锁回专注模式哦。";
const DEVIATION_MESSAGE: &str =
    "这张截图看起来和刚才的目标有些偏差了，先帮你锁一下手机，我们再确认下需求。";
const ON_TASK_MESSAGE: &str = "未偏离";

const TOKEN_SEPARATORS: &[char] = &['，', '。', '！', '？', ',', '.', '!', '?', ':', '；', ';'];

/// Split text on common punctuation and whitespace into non-empty segments
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || TOKEN_SEPARATORS.contains(&c))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Compare a behaviour description against the active allowance.
///
/// Entertainment terms in the description always count as a deviation.
/// Otherwise the description is on task when any token carries a positive
/// marker or any multi-character token appears in the allowance scenario.
pub fn check_deviation(
    description: &str,
    allowance: Option<&Allowance>,
    keywords: &Keywords,
) -> DeviationCheck {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return DeviationCheck::ok(NO_DESCRIPTION_MESSAGE);
    }

    let Some(allowance) = allowance else {
        return DeviationCheck::deviation(NOTHING_PERMITTED_MESSAGE);
    };

    let combined = format!("{} {}", allowance.scenario, trimmed);
    let tokens = tokenize(&combined);

    let has_positive = tokens
        .iter()
        .any(|token| contains_keyword(token, &keywords.positive));
    let matches_scenario = tokens
        .iter()
        .any(|token| token.chars().count() > 1 && allowance.scenario.contains(token));
    let entertainment = contains_keyword(&trimmed.to_lowercase(), &keywords.deny);

    if entertainment || (!has_positive && !matches_scenario) {
        DeviationCheck::deviation(DEVIATION_MESSAGE)
    } else {
        DeviationCheck::ok(ON_TASK_MESSAGE)
    }
}
