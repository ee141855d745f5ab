//! Intent classification against keyword sets

use focuslock_config::{GrantLimits, Keywords};

/// Returns true if `text` contains any of `keywords`
pub fn contains_keyword(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|word| text.contains(word.as_str()))
}

/// Keyword signals extracted from one user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntentSignals {
    /// The user says the permitted task is finished
    pub completion: bool,
    /// The user asks for more time
    pub extend: bool,
    /// Entertainment or leisure terms
    pub deny: bool,
    /// Urgency that overrides the deny list and the duration ceiling
    pub urgent: bool,
    /// The request states a purpose
    pub goal: bool,
}

impl IntentSignals {
    /// Deny terms without an urgent reason
    pub fn is_off_plan(&self) -> bool {
        self.deny && !self.urgent
    }
}

/// Scores free text against the configured keyword sets
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    keywords: Keywords,
    min_goal_chars: usize,
}

impl IntentClassifier {
    pub fn new(keywords: Keywords, limits: &GrantLimits) -> Self {
        Self {
            keywords,
            min_goal_chars: limits.min_goal_chars,
        }
    }

    /// Classify a trimmed user message.
    ///
    /// Deny and urgent terms are matched against the lower-cased text, the
    /// rest against the text as typed.
    pub fn classify(&self, trimmed: &str) -> IntentSignals {
        let normalized = trimmed.to_lowercase();

        IntentSignals {
            completion: contains_keyword(trimmed, &self.keywords.completion),
            extend: contains_keyword(trimmed, &self.keywords.extend),
            deny: contains_keyword(&normalized, &self.keywords.deny),
            urgent: contains_keyword(&normalized, &self.keywords.urgent),
            goal: contains_keyword(trimmed, &self.keywords.goal)
                || trimmed.chars().count() > self.min_goal_chars,
        }
    }
}
