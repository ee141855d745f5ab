//! Terminal input parsing

use focuslock_api::ContextSettings;
use focuslock_util::{FocusError, Result};
use std::str::FromStr;

/// One line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: a user message to the assistant
    Say(String),
    /// `/shot <description>`
    Screenshot(String),
    Lock,
    Status,
    History,
    Reset,
    ShowContext,
    Set { field: ContextField, value: String },
    Help,
    Quit,
}

/// Context fields editable with `/set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextField {
    Time,
    Scene,
    Tips,
    Persona,
}

impl ContextField {
    pub fn apply(self, context: &mut ContextSettings, value: String) {
        match self {
            ContextField::Time => context.current_time = value,
            ContextField::Scene => context.unlock_scene_desc = value,
            ContextField::Tips => context.supplementary_tips = value,
            ContextField::Persona => context.user_info = value,
        }
    }
}

impl FromStr for ContextField {
    type Err = FocusError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "time" => Ok(ContextField::Time),
            "scene" => Ok(ContextField::Scene),
            "tips" => Ok(ContextField::Tips),
            "persona" => Ok(ContextField::Persona),
            other => Err(FocusError::UnknownContextField(other.to_string())),
        }
    }
}

pub const HELP_TEXT: &str = "\
Type a message to talk to the assistant, or use a command:
  /shot <description>   check a screenshot description against the allowance
  /lock                 lock now
  /status               show lock status, current task and remaining time
  /history              show the conversation
  /context              show context settings
  /set <field> <text>   set a context field (time, scene, tips, persona)
  /reset                start a new session
  /help                 show this help
  /quit                 exit";

/// Parse one line of terminal input
pub fn parse_command(line: &str) -> Result<Command> {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Command::Say(trimmed.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "shot" => {
            if arg.is_empty() {
                return Err(FocusError::missing_argument(name, "a screenshot description"));
            }
            Ok(Command::Screenshot(arg.to_string()))
        }
        "lock" => Ok(Command::Lock),
        "status" => Ok(Command::Status),
        "history" => Ok(Command::History),
        "reset" => Ok(Command::Reset),
        "context" => Ok(Command::ShowContext),
        "set" => {
            let (field, value) = arg
                .split_once(char::is_whitespace)
                .map(|(f, v)| (f, v.trim()))
                .unwrap_or((arg, ""));
            if field.is_empty() {
                return Err(FocusError::missing_argument(name, "a field and a value"));
            }
            Ok(Command::Set {
                field: field.parse()?,
                value: value.to_string(),
            })
        }
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(FocusError::UnknownCommand(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            parse_command("  写报告20分钟 ").unwrap(),
            Command::Say("写报告20分钟".into())
        );
    }

    #[test]
    fn screenshot_requires_description() {
        assert_eq!(
            parse_command("/shot 正在回复消息").unwrap(),
            Command::Screenshot("正在回复消息".into())
        );
        assert!(matches!(
            parse_command("/shot"),
            Err(FocusError::MissingArgument { .. })
        ));
    }

    #[test]
    fn set_parses_field_and_value() {
        assert_eq!(
            parse_command("/set scene 回复工作消息、查看今日待办").unwrap(),
            Command::Set {
                field: ContextField::Scene,
                value: "回复工作消息、查看今日待办".into(),
            }
        );
        // Empty value clears the field
        assert_eq!(
            parse_command("/set tips").unwrap(),
            Command::Set {
                field: ContextField::Tips,
                value: String::new(),
            }
        );
        assert!(matches!(
            parse_command("/set mood happy"),
            Err(FocusError::UnknownContextField(_))
        ));
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(matches!(
            parse_command("/dance"),
            Err(FocusError::UnknownCommand(name)) if name == "dance"
        ));
    }

    #[test]
    fn apply_sets_context_field() {
        let mut ctx = ContextSettings::default();
        ContextField::Persona.apply(&mut ctx, "学生".into());
        assert_eq!(ctx.user_info, "学生");
    }
}
