//! Plain-text rendering for the terminal driver

use chrono::{DateTime, Local};
use focuslock_api::{Allowance, ContextSettings, ConversationMessage, LockAction, LockStatus, Role};
use focuslock_util::{format_clock_time, format_countdown, format_message_time};
use std::time::Duration;

const NO_TASK: &str = "等待申请";
const EMPTY_FIELD: &str = "(未设置)";

/// One conversation entry, e.g. `[14:05] 助手：好的 [解锁]`
pub fn render_message(message: &ConversationMessage) -> String {
    let speaker = match message.role {
        Role::User => "我",
        Role::Assistant => "助手",
    };

    let marker = match message.action {
        Some(LockAction::Unlock) => " [解锁]",
        Some(LockAction::Lock) => " [锁定]",
        None => "",
    };

    format!(
        "[{}] {}：{}{}",
        format_message_time(&message.created_at),
        speaker,
        message.content,
        marker
    )
}

/// Status block: clock, lock state, current task and remaining time
pub fn render_status(
    now: &DateTime<Local>,
    status: LockStatus,
    allowance: Option<&Allowance>,
    remaining: Option<Duration>,
) -> String {
    let mut lines = vec![
        format!("时间：{}", format_clock_time(now)),
        format!("状态：{}", status.label()),
    ];

    let task = allowance
        .map(|a| a.scenario.trim())
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_TASK);
    lines.push(format!("当前任务：{}", task));

    if let Some(remaining) = remaining {
        lines.push(format!("剩余时间：{}", format_countdown(remaining)));
    }

    lines.join("\n")
}

pub fn render_context(context: &ContextSettings) -> String {
    let field = |value: Option<&str>| value.unwrap_or(EMPTY_FIELD).to_string();

    [
        format!("time    {}", field(context.current_time())),
        format!("scene   {}", field(context.unlock_scene_desc())),
        format!("tips    {}", field(context.supplementary_tips())),
        format!("persona {}", field(context.user_info())),
    ]
    .join("\n")
}
