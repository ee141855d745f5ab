//! Core reply policy and allowance state machine for focuslock
//!
//! This crate is the heart of focuslock, containing:
//! - Duration extraction from free text (numeric and Chinese numerals)
//! - Intent classification against configured keyword sets
//! - The reply policy (grant, deny, or ask for clarification)
//! - Screenshot deviation checks
//! - Allowance lifecycle (Locked <-> Unlocked) with idempotent expiry

mod allowance;
mod deviation;
mod duration;
mod engine;
mod events;
mod intent;
mod reply;

pub use allowance::*;
pub use deviation::*;
pub use duration::*;
pub use engine::*;
pub use events::*;
pub use intent::*;
pub use reply::*;
