//! Shared utilities for focuslock
//!
//! Message ids, the (optionally mocked) wall clock, display formats for
//! dates and countdowns, input errors and the default config path.

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
