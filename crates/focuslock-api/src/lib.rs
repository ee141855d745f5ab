//! Shared data model for focuslock
//!
//! This crate defines the values exchanged between the core and its caller:
//! - Conversation messages and roles
//! - Allowances and lock status
//! - Assistant replies and deviation verdicts
//! - Caller-supplied context settings

mod context;
mod types;

pub use context::*;
pub use types::*;
