//! Core events emitted by the allowance lifecycle

use chrono::{DateTime, Local};

/// Why an allowance ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReason {
    /// The user said the task is finished
    Completed,
    /// Explicit lock request
    Manual,
    /// A screenshot description deviated from the scenario
    Deviation,
    /// The allowance ran out
    Expired,
}

/// Events emitted by the core
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// An allowance was granted (or replaced, when `extended`)
    Unlocked {
        scenario: String,
        duration_minutes: Option<f64>,
        expires_at: Option<DateTime<Local>>,
        extended: bool,
    },

    /// The allowance was cleared
    Locked {
        scenario: String,
        reason: LockReason,
    },
}
