//! Conversation, allowance and reply types

use chrono::{DateTime, Local};
use focuslock_util::MessageId;
use serde::{Deserialize, Deserializer, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// State transition requested by a reply or recorded on a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockAction {
    Unlock,
    Lock,
}

/// Device status as seen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockStatus {
    Locked,
    Unlocked,
}

impl LockStatus {
    /// Status pill text
    pub fn label(self) -> &'static str {
        match self {
            LockStatus::Locked => "🔒 已锁定",
            LockStatus::Unlocked => "🔓 使用中",
        }
    }
}

/// A single entry in the conversation history. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Local>,
    pub action: Option<LockAction>,
    /// Set when an assistant message asked the user how long they need
    #[serde(default)]
    pub prompted_for_duration: bool,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>, created_at: DateTime<Local>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::User,
            content: content.into(),
            created_at,
            action: None,
            prompted_for_duration: false,
        }
    }

    pub fn assistant(
        content: impl Into<String>,
        action: Option<LockAction>,
        created_at: DateTime<Local>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Assistant,
            content: content.into(),
            created_at,
            action,
            prompted_for_duration: false,
        }
    }

    /// Mark this assistant message as a duration prompt
    pub fn with_duration_prompt(mut self, prompted: bool) -> Self {
        self.prompted_for_duration = prompted;
        self
    }
}

/// The active grant permitting unlocked use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allowance {
    /// Free-text description of the permitted activity
    pub scenario: String,
    pub duration_minutes: Option<f64>,
    /// Sole authority for auto-expiry once set
    pub expires_at: Option<DateTime<Local>>,
    pub notes: Option<String>,
}

impl Allowance {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            duration_minutes: None,
            expires_at: None,
            notes: None,
        }
    }
}

/// Which decision rule produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    EmptyInput,
    Completed,
    StillUnlocked,
    OffPlan,
    NeedsGoal,
    NeedsDuration,
    TooLong,
    Granted,
}

/// Output of the reply policy for one user turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub kind: ReplyKind,
    pub reply: String,
    pub follow_up_question: Option<String>,
    pub action: Option<LockAction>,
    /// `Some(Some(_))` carries a new grant, `Some(None)` clears the allowance.
    /// Serialized as absent / `null` / object respectively.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub allowance: Option<Option<Allowance>>,
}

/// A present field (even `null`) becomes `Some`; a missing one falls back to `default`
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<Allowance>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Allowance>::deserialize(deserializer).map(Some)
}

impl AssistantReply {
    /// A reply with no state change
    pub fn say(kind: ReplyKind, reply: impl Into<String>) -> Self {
        Self {
            kind,
            reply: reply.into(),
            follow_up_question: None,
            action: None,
            allowance: None,
        }
    }

    pub fn lock(kind: ReplyKind, reply: impl Into<String>) -> Self {
        Self {
            kind,
            reply: reply.into(),
            follow_up_question: None,
            action: Some(LockAction::Lock),
            allowance: Some(None),
        }
    }

    pub fn unlock(reply: impl Into<String>, allowance: Allowance) -> Self {
        Self {
            kind: ReplyKind::Granted,
            reply: reply.into(),
            follow_up_question: None,
            action: Some(LockAction::Unlock),
            allowance: Some(Some(allowance)),
        }
    }

    /// The allowance granted by this reply, if any
    pub fn granted(&self) -> Option<&Allowance> {
        match (&self.action, &self.allowance) {
            (Some(LockAction::Unlock), Some(Some(allowance))) => Some(allowance),
            _ => None,
        }
    }

    pub fn prompts_for_duration(&self) -> bool {
        self.kind == ReplyKind::NeedsDuration
    }
}

/// Verdict of a screenshot deviation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationResult {
    Ok,
    Deviation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviationCheck {
    pub result: DeviationResult,
    pub message: String,
}

impl DeviationCheck {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            result: DeviationResult::Ok,
            message: message.into(),
        }
    }

    pub fn deviation(message: impl Into<String>) -> Self {
        Self {
            result: DeviationResult::Deviation,
            message: message.into(),
        }
    }

    pub fn is_deviation(&self) -> bool {
        self.result == DeviationResult::Deviation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granted_requires_unlock_action() {
        let reply = AssistantReply::unlock("ok", Allowance::new("写报告"));
        assert_eq!(reply.granted().map(|a| a.scenario.as_str()), Some("写报告"));

        let lock = AssistantReply::lock(ReplyKind::Completed, "done");
        assert!(lock.granted().is_none());
        assert_eq!(lock.allowance, Some(None));
    }

    #[test]
    fn reply_allowance_survives_json() {
        let lock = AssistantReply::lock(ReplyKind::Completed, "done");
        let json = serde_json::to_value(&lock).unwrap();
        assert!(json["allowance"].is_null());
        let parsed: AssistantReply = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.allowance, Some(None));

        let say = AssistantReply::say(ReplyKind::EmptyInput, "?");
        let json = serde_json::to_value(&say).unwrap();
        assert!(json.get("allowance").is_none());
        let parsed: AssistantReply = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.allowance, None);

        let grant = AssistantReply::unlock("ok", Allowance::new("写报告"));
        let text = serde_json::to_string(&grant).unwrap();
        let parsed: AssistantReply = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, grant);
    }

    #[test]
    fn message_serializes_with_snake_case_tags() {
        let msg = ConversationMessage::assistant("hi", Some(LockAction::Lock), Local::now());
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["action"], "lock");
        assert_eq!(json["prompted_for_duration"], false);
    }
}
