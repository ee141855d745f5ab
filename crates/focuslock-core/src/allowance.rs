//! Allowance lifecycle state machine

use chrono::{DateTime, Local};
use focuslock_api::{Allowance, LockStatus};
use std::time::Duration;
use tracing::{info, warn};

use crate::{CoreEvent, LockReason};

/// Lifecycle state. Holding the allowance inside `Unlocked` keeps
/// `status == Unlocked` equivalent to `allowance.is_some()`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LockState {
    #[default]
    Locked,
    Unlocked(Allowance),
}

/// Tracks the active allowance and its expiry
#[derive(Debug, Clone, Default)]
pub struct AllowanceLifecycle {
    state: LockState,

    /// Expiry instant already turned into a lock, so repeated checks don't refire
    expiry_handled: Option<DateTime<Local>>,
}

impl AllowanceLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> LockStatus {
        match self.state {
            LockState::Locked => LockStatus::Locked,
            LockState::Unlocked(_) => LockStatus::Unlocked,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, LockState::Unlocked(_))
    }

    pub fn allowance(&self) -> Option<&Allowance> {
        match &self.state {
            LockState::Locked => None,
            LockState::Unlocked(allowance) => Some(allowance),
        }
    }

    /// Apply a granted allowance, replacing any active one.
    ///
    /// `expires_at` is computed from `duration_minutes`; without a positive
    /// duration the allowance never auto-expires.
    pub fn grant(&mut self, mut allowance: Allowance, now: DateTime<Local>) -> CoreEvent {
        allowance.expires_at = allowance
            .duration_minutes
            .filter(|minutes| *minutes > 0.0)
            .map(|minutes| compute_expiry(now, minutes));

        if self.expiry_handled != allowance.expires_at {
            self.expiry_handled = None;
        }

        let extended = self.is_unlocked();
        let event = CoreEvent::Unlocked {
            scenario: allowance.scenario.clone(),
            duration_minutes: allowance.duration_minutes,
            expires_at: allowance.expires_at,
            extended,
        };

        match allowance.expires_at {
            Some(expires_at) => info!(
                scenario = %allowance.scenario,
                expires_at = %expires_at,
                extended,
                "Allowance granted"
            ),
            None => info!(
                scenario = %allowance.scenario,
                extended,
                "Allowance granted (no expiry)"
            ),
        }

        self.state = LockState::Unlocked(allowance);
        event
    }

    /// Clear the active allowance. Returns `None` when already locked.
    pub fn lock(&mut self, reason: LockReason) -> Option<CoreEvent> {
        let LockState::Unlocked(allowance) = std::mem::take(&mut self.state) else {
            return None;
        };

        info!(scenario = %allowance.scenario, reason = ?reason, "Allowance cleared");

        Some(CoreEvent::Locked {
            scenario: allowance.scenario,
            reason,
        })
    }

    /// Lock if the active allowance has reached its expiry.
    ///
    /// Fires at most once per expiry instant, however often it is called.
    pub fn check_expiry(&mut self, now: DateTime<Local>) -> Option<CoreEvent> {
        let expires_at = self.allowance()?.expires_at?;
        if now < expires_at || self.expiry_handled == Some(expires_at) {
            return None;
        }

        self.expiry_handled = Some(expires_at);
        self.lock(LockReason::Expired)
    }

    /// Time left on the active allowance; zero once reached.
    /// `None` when locked or the allowance has no expiry.
    pub fn remaining(&self, now: DateTime<Local>) -> Option<Duration> {
        let expires_at = self.allowance()?.expires_at?;
        Some(
            expires_at
                .signed_duration_since(now)
                .to_std()
                .unwrap_or(Duration::ZERO),
        )
    }
}

fn compute_expiry(now: DateTime<Local>, minutes: f64) -> DateTime<Local> {
    let millis = (minutes * 60_000.0).round();
    let expiry = chrono::Duration::try_milliseconds(millis as i64)
        .filter(|_| millis.is_finite())
        .and_then(|delta| now.checked_add_signed(delta));

    match expiry {
        Some(at) => at,
        None => {
            // Unrepresentable expiry counts as already expired
            warn!(minutes, "Allowance expiry out of range, expiring immediately");
            now
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
    }

    fn allowance(minutes: Option<f64>) -> Allowance {
        Allowance {
            scenario: "写周报".into(),
            duration_minutes: minutes,
            expires_at: None,
            notes: None,
        }
    }

    #[test]
    fn starts_locked() {
        let lifecycle = AllowanceLifecycle::new();
        assert_eq!(lifecycle.status(), LockStatus::Locked);
        assert!(lifecycle.allowance().is_none());
    }

    #[test]
    fn grant_sets_expiry() {
        let mut lifecycle = AllowanceLifecycle::new();
        let now = base_time();

        let event = lifecycle.grant(allowance(Some(15.0)), now);
        assert!(matches!(event, CoreEvent::Unlocked { extended: false, .. }));
        assert_eq!(lifecycle.status(), LockStatus::Unlocked);

        let expires_at = lifecycle.allowance().unwrap().expires_at.unwrap();
        assert_eq!(expires_at, now + chrono::Duration::minutes(15));
        assert_eq!(lifecycle.remaining(now), Some(Duration::from_secs(900)));
    }

    #[test]
    fn half_minute_grant() {
        let mut lifecycle = AllowanceLifecycle::new();
        let now = base_time();
        lifecycle.grant(allowance(Some(0.5)), now);
        assert_eq!(lifecycle.remaining(now), Some(Duration::from_secs(30)));
    }

    #[test]
    fn grant_without_duration_never_expires() {
        let mut lifecycle = AllowanceLifecycle::new();
        let now = base_time();
        lifecycle.grant(allowance(None), now);

        assert!(lifecycle.allowance().unwrap().expires_at.is_none());
        assert!(lifecycle.check_expiry(now + chrono::Duration::days(30)).is_none());
        assert!(lifecycle.is_unlocked());
        assert_eq!(lifecycle.remaining(now), None);
    }

    #[test]
    fn expiry_fires_exactly_once() {
        let mut lifecycle = AllowanceLifecycle::new();
        let now = base_time();
        lifecycle.grant(allowance(Some(1.0)), now);

        assert!(lifecycle.check_expiry(now + chrono::Duration::seconds(59)).is_none());

        let at = now + chrono::Duration::seconds(60);
        let event = lifecycle.check_expiry(at);
        assert!(matches!(
            event,
            Some(CoreEvent::Locked { reason: LockReason::Expired, .. })
        ));
        assert_eq!(lifecycle.status(), LockStatus::Locked);

        assert!(lifecycle.check_expiry(at).is_none());
        assert!(lifecycle.check_expiry(at + chrono::Duration::hours(1)).is_none());
    }

    #[test]
    fn extension_replaces_expiry() {
        let mut lifecycle = AllowanceLifecycle::new();
        let now = base_time();
        lifecycle.grant(allowance(Some(10.0)), now);

        let later = now + chrono::Duration::minutes(8);
        let event = lifecycle.grant(allowance(Some(15.0)), later);
        assert!(matches!(event, CoreEvent::Unlocked { extended: true, .. }));

        // The first expiry passes without locking
        assert!(lifecycle.check_expiry(now + chrono::Duration::minutes(11)).is_none());
        assert!(lifecycle.check_expiry(later + chrono::Duration::minutes(15)).is_some());
    }

    #[test]
    fn regrant_after_expiry_can_expire_again() {
        let mut lifecycle = AllowanceLifecycle::new();
        let now = base_time();
        lifecycle.grant(allowance(Some(1.0)), now);
        assert!(lifecycle.check_expiry(now + chrono::Duration::minutes(1)).is_some());

        let later = now + chrono::Duration::minutes(5);
        lifecycle.grant(allowance(Some(1.0)), later);
        assert!(lifecycle.check_expiry(later + chrono::Duration::minutes(1)).is_some());
    }

    #[test]
    fn remaining_saturates_at_zero() {
        let mut lifecycle = AllowanceLifecycle::new();
        let now = base_time();
        lifecycle.grant(allowance(Some(1.0)), now);
        assert_eq!(
            lifecycle.remaining(now + chrono::Duration::minutes(3)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn lock_when_locked_is_noop() {
        let mut lifecycle = AllowanceLifecycle::new();
        assert!(lifecycle.lock(LockReason::Manual).is_none());
    }

    #[test]
    fn out_of_range_duration_expires_immediately() {
        let mut lifecycle = AllowanceLifecycle::new();
        let now = base_time();
        lifecycle.grant(allowance(Some(f64::MAX)), now);

        assert_eq!(lifecycle.allowance().unwrap().expires_at, Some(now));
        assert!(lifecycle.check_expiry(now).is_some());
    }
}
