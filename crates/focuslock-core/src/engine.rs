//! Focus engine: drives one conversation session
//!
//! Owns the message history, context settings and allowance lifecycle, and
//! applies the reply policy and deviation verdicts to them.

use chrono::{DateTime, Local};
use focuslock_api::{
    Allowance, AssistantReply, ContextSettings, ConversationMessage, DeviationCheck, LockAction,
    LockStatus,
};
use focuslock_config::{Keywords, Policy};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;
use tracing::{debug, info};

use crate::{AllowanceLifecycle, CoreEvent, LockReason, ReplyEngine, check_deviation};

pub const GREETING: &str = "嗨～我是你的专注伙伴，需要解锁的话先告诉我你的目标哦。";
const EXPIRED_MESSAGE: &str = "这轮约定的使用时间到了，我先帮你锁回专注模式，有需要再叫我哦。";
const MANUAL_LOCK_MESSAGE: &str = "好的，已经帮你锁回专注模式啦，需要时再来找我。";

/// Result of one user turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: AssistantReply,
    pub events: Vec<CoreEvent>,
}

/// Result of one screenshot check
#[derive(Debug, Clone)]
pub struct ScreenshotOutcome {
    pub check: DeviationCheck,
    pub event: Option<CoreEvent>,
}

/// The focus engine
pub struct FocusEngine {
    replies: ReplyEngine,
    keywords: Keywords,
    auto_current_time: bool,
    context: ContextSettings,
    history: Vec<ConversationMessage>,
    lifecycle: AllowanceLifecycle,
    rng: StdRng,
}

impl FocusEngine {
    /// Create an engine with an entropy-seeded phrase picker
    pub fn new(policy: &Policy, now: DateTime<Local>) -> Self {
        Self::with_rng(policy, StdRng::from_entropy(), now)
    }

    /// Create an engine with a deterministic phrase picker
    pub fn with_seed(policy: &Policy, seed: u64, now: DateTime<Local>) -> Self {
        Self::with_rng(policy, StdRng::seed_from_u64(seed), now)
    }

    fn with_rng(policy: &Policy, rng: StdRng, now: DateTime<Local>) -> Self {
        info!(
            goal_keywords = policy.keywords.goal.len(),
            deny_keywords = policy.keywords.deny.len(),
            max_minutes = policy.limits.max_minutes,
            "Focus engine initialized"
        );

        Self {
            replies: ReplyEngine::new(policy),
            keywords: policy.keywords.clone(),
            auto_current_time: policy.service.auto_current_time,
            context: policy.context.clone(),
            history: initial_history(now),
            lifecycle: AllowanceLifecycle::new(),
            rng,
        }
    }

    pub fn history(&self) -> &[ConversationMessage] {
        &self.history
    }

    pub fn context(&self) -> &ContextSettings {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ContextSettings {
        &mut self.context
    }

    /// Stop (or resume) refreshing `current_time` from the clock on each turn
    pub fn set_auto_current_time(&mut self, enabled: bool) {
        self.auto_current_time = enabled;
    }

    pub fn status(&self) -> LockStatus {
        self.lifecycle.status()
    }

    pub fn allowance(&self) -> Option<&Allowance> {
        self.lifecycle.allowance()
    }

    pub fn remaining(&self, now: DateTime<Local>) -> Option<Duration> {
        self.lifecycle.remaining(now)
    }

    /// Process one user message and apply the resulting transition
    pub fn submit(&mut self, text: &str, now: DateTime<Local>) -> TurnOutcome {
        let trimmed = text.trim();

        if self.auto_current_time {
            self.context.current_time = focuslock_util::format_context_time(&now);
        }

        if !trimmed.is_empty() {
            self.history.push(ConversationMessage::user(trimmed, now));
        }

        let reply = self.replies.decide(
            trimmed,
            &self.history,
            &self.context,
            self.lifecycle.allowance(),
            self.lifecycle.is_unlocked(),
            &mut self.rng,
        );

        debug!(kind = ?reply.kind, action = ?reply.action, "Reply decided");

        self.history.push(
            ConversationMessage::assistant(reply.reply.clone(), reply.action, now)
                .with_duration_prompt(reply.prompts_for_duration()),
        );
        if let Some(question) = &reply.follow_up_question {
            self.history.push(ConversationMessage::assistant(question.clone(), None, now));
        }

        let mut events = Vec::new();
        if let Some(allowance) = reply.granted() {
            events.push(self.lifecycle.grant(allowance.clone(), now));
        } else if reply.action == Some(LockAction::Lock)
            && let Some(event) = self.lifecycle.lock(LockReason::Completed)
        {
            events.push(event);
        }

        TurnOutcome { reply, events }
    }

    /// Check a screenshot description and lock on deviation
    pub fn analyze_screenshot(
        &mut self,
        description: &str,
        now: DateTime<Local>,
    ) -> ScreenshotOutcome {
        let check = check_deviation(description, self.lifecycle.allowance(), &self.keywords);

        let (action, event) = if check.is_deviation() {
            (Some(LockAction::Lock), self.lifecycle.lock(LockReason::Deviation))
        } else {
            (None, None)
        };

        info!(deviation = check.is_deviation(), "Screenshot analyzed");

        self.history
            .push(ConversationMessage::assistant(check.message.clone(), action, now));

        ScreenshotOutcome { check, event }
    }

    /// Expiry check, called from the recurring tick
    pub fn tick(&mut self, now: DateTime<Local>) -> Option<CoreEvent> {
        let event = self.lifecycle.check_expiry(now)?;

        self.history.push(ConversationMessage::assistant(
            EXPIRED_MESSAGE,
            Some(LockAction::Lock),
            now,
        ));

        Some(event)
    }

    /// Explicit lock request. Returns `None` when already locked.
    pub fn lock(&mut self, now: DateTime<Local>) -> Option<CoreEvent> {
        let event = self.lifecycle.lock(LockReason::Manual)?;

        self.history.push(ConversationMessage::assistant(
            MANUAL_LOCK_MESSAGE,
            Some(LockAction::Lock),
            now,
        ));

        Some(event)
    }

    /// Start over: greeting-only history, locked, context kept
    pub fn reset(&mut self, now: DateTime<Local>) {
        self.history = initial_history(now);
        self.lifecycle = AllowanceLifecycle::new();

        info!("Session reset");
    }
}

fn initial_history(now: DateTime<Local>) -> Vec<ConversationMessage> {
    vec![ConversationMessage::assistant(GREETING, None, now)]
}
