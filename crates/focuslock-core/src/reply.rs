//! Reply policy: decide whether to grant, deny, or ask for clarification

use focuslock_api::{
    Allowance, AssistantReply, ContextSettings, ConversationMessage, ReplyKind, Role,
};
use focuslock_config::{GrantLimits, Policy};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::{IntentClassifier, IntentSignals, parse_duration};

const EMPTY_INPUT_REPLY: &str = "我还没听清楚呢，可以再描述下你想做什么吗？";
const COMPLETED_REPLY: &str = "辛苦啦，今天这段任务完成得很好，我先帮你锁回专注模式。";
const OFF_PLAN_REPLY: &str = "这个理由好像有点偏离今天的计划啦，不如先坚持一下，再回来休息？";
const NEEDS_GOAL_REPLY: &str = "能具体说下你想处理的事情吗？我想确认一下它和你的今日目标是否一致。";
const ASK_DURATION_REPLY: &str = "大概需要多长时间呢？我想帮你守好节奏。";
const ASK_DURATION_AGAIN_REPLY: &str = "还是没抓到时间安排呢，大概需要多久比较合适？";
const GENERIC_SCENE_REMINDER: &str = "记得只聚焦在刚才提到的事情上。";

/// The reply policy engine.
///
/// `decide` is a pure function of its inputs plus the injected random source,
/// which only picks the encouragement phrase.
#[derive(Debug, Clone)]
pub struct ReplyEngine {
    classifier: IntentClassifier,
    limits: GrantLimits,
    encouragement: Vec<String>,
}

impl ReplyEngine {
    pub fn new(policy: &Policy) -> Self {
        Self {
            classifier: IntentClassifier::new(policy.keywords.clone(), &policy.limits),
            limits: policy.limits.clone(),
            encouragement: policy.phrases.encouragement.clone(),
        }
    }

    pub fn encouragement(&self) -> &[String] {
        &self.encouragement
    }

    /// Decide how to answer one user message.
    ///
    /// `history` is the conversation so far; only its most recent assistant
    /// message is consulted.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        user_text: &str,
        history: &[ConversationMessage],
        context: &ContextSettings,
        current_allowance: Option<&Allowance>,
        is_unlocked: bool,
        rng: &mut R,
    ) -> AssistantReply {
        let trimmed = user_text.trim();
        if trimmed.is_empty() {
            return AssistantReply::say(ReplyKind::EmptyInput, EMPTY_INPUT_REPLY);
        }

        let signals = self.classifier.classify(trimmed);
        let mut extending = false;

        if is_unlocked && let Some(allowance) = current_allowance {
            if signals.completion {
                return AssistantReply::lock(ReplyKind::Completed, COMPLETED_REPLY);
            }

            if !signals.extend {
                return AssistantReply::say(
                    ReplyKind::StillUnlocked,
                    format!(
                        "手机现在还在解锁中，用于「{}」。如果需要调整或延长，跟我说明一下就好。",
                        allowance.scenario
                    ),
                );
            }

            debug!(scenario = %allowance.scenario, "Extension requested, re-evaluating");
            extending = true;
        }

        self.evaluate_request(trimmed, signals, extending, history, context, rng)
    }

    fn evaluate_request<R: Rng + ?Sized>(
        &self,
        trimmed: &str,
        signals: IntentSignals,
        extending: bool,
        history: &[ConversationMessage],
        context: &ContextSettings,
        rng: &mut R,
    ) -> AssistantReply {
        if signals.is_off_plan() {
            return AssistantReply::say(ReplyKind::OffPlan, OFF_PLAN_REPLY);
        }

        // An extension inherits the purpose stated for the running allowance.
        // The same short text from a locked device still gets NeedsGoal.
        if !signals.goal && !extending {
            return AssistantReply::say(ReplyKind::NeedsGoal, NEEDS_GOAL_REPLY);
        }

        let Some(minutes) = parse_duration(trimmed).filter(|m| *m > 0.0) else {
            let hint = if previously_asked_for_duration(history) {
                ASK_DURATION_AGAIN_REPLY
            } else {
                ASK_DURATION_REPLY
            };
            return AssistantReply::say(ReplyKind::NeedsDuration, hint);
        };

        if minutes > self.limits.max_minutes && !signals.urgent {
            return AssistantReply::say(
                ReplyKind::TooLong,
                format!(
                    "这次时长有点久了，要不我们拆成一小段一小段来完成？先申请 {} 分钟以内的吧。",
                    self.limits.suggested_minutes
                ),
            );
        }

        let allowance = Allowance {
            scenario: trimmed.to_string(),
            duration_minutes: Some(minutes),
            expires_at: None,
            notes: context.supplementary_tips().map(str::to_string),
        };

        let reply = self.compose_grant(minutes, context, rng);
        debug!(minutes, urgent = signals.urgent, "Grant composed");

        AssistantReply::unlock(reply, allowance)
    }

    fn compose_grant<R: Rng + ?Sized>(
        &self,
        minutes: f64,
        context: &ContextSettings,
        rng: &mut R,
    ) -> String {
        let time_info = context
            .current_time()
            .map(|t| format!("现在是 {}。", t))
            .unwrap_or_default();
        let scene_reminder = context
            .unlock_scene_desc()
            .map(|scene| format!("记得把手机用在：{}。", scene))
            .unwrap_or_else(|| GENERIC_SCENE_REMINDER.to_string());
        let persona = context
            .user_info()
            .map(|info| format!("与你的身份设定「{}」保持一致。", info))
            .unwrap_or_default();
        let tip = match context.supplementary_tips() {
            Some(tips) => format!("另外 {}", tips),
            None => self
                .encouragement
                .choose(rng)
                .cloned()
                .unwrap_or_default(),
        };

        let head = format!("好的，为你解锁 {} 分钟。{}{}", minutes, time_info, scene_reminder);
        [head, persona, tip]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn previously_asked_for_duration(history: &[ConversationMessage]) -> bool {
    history
        .iter()
        .rev()
        .find(|msg| msg.role == Role::Assistant)
        .is_some_and(|msg| msg.prompted_for_duration)
}
