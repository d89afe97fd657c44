//! Daily quota governor.
//!
//! Each of [`QuotaGovernor::check`], [`QuotaGovernor::record`] and
//! [`QuotaGovernor::status`] is atomic under an internal lock, and each one
//! rolls the counter over first if the UTC date changed since the last call.
//!
//! `check` and `record` are separate calls with a backend round trip between
//! them, so that gap is not atomic. Concurrent requests that all pass `check`
//! before any of them records can push the day's count past the limit by at
//! most the number of requests in flight. That overshoot is accepted.

use crate::clock::{Clock, SystemClock};
use chrono::NaiveDate;
use databank_core::{AppError, AppResult};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Limit used when none is configured.
pub const DEFAULT_DAILY_LIMIT: u32 = 100;

/// Outcome of a pre-flight quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaCheck {
    pub allowed: bool,
    pub remaining: u32,
    pub limit: u32,
}

/// Current usage for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    pub remaining: u32,
    pub limit: u32,
    pub used: u32,
}

#[derive(Debug)]
struct QuotaState {
    count: u32,
    day: NaiveDate,
}

/// Bounds successful answers per UTC day.
pub struct QuotaGovernor {
    limit: u32,
    clock: Arc<dyn Clock>,
    state: Mutex<QuotaState>,
}

impl QuotaGovernor {
    /// Governor on the system clock.
    pub fn new(limit: u32) -> AppResult<Self> {
        Self::with_clock(limit, Arc::new(SystemClock))
    }

    /// Governor on an injected clock. `limit` must be positive.
    pub fn with_clock(limit: u32, clock: Arc<dyn Clock>) -> AppResult<Self> {
        if limit == 0 {
            return Err(AppError::Config(
                "Daily limit must be a positive integer".to_string(),
            ));
        }

        let day = clock.today();
        Ok(Self {
            limit,
            clock,
            state: Mutex::new(QuotaState { count: 0, day }),
        })
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Whether another request may be answered today.
    pub fn check(&self) -> QuotaCheck {
        let state = self.current_state();

        if state.count >= self.limit {
            return QuotaCheck {
                allowed: false,
                remaining: 0,
                limit: self.limit,
            };
        }

        QuotaCheck {
            allowed: true,
            remaining: self.limit - state.count,
            limit: self.limit,
        }
    }

    /// Charge one successful answer.
    pub fn record(&self) {
        let mut state = self.current_state();
        state.count = state.count.saturating_add(1);

        if state.count > self.limit {
            tracing::warn!(
                used = state.count,
                limit = self.limit,
                "Concurrent requests pushed usage past the daily limit"
            );
        } else {
            tracing::debug!(used = state.count, limit = self.limit, "Recorded quota usage");
        }
    }

    /// Read-only view of today's usage.
    pub fn status(&self) -> QuotaStatus {
        let state = self.current_state();
        QuotaStatus {
            remaining: self.limit.saturating_sub(state.count),
            limit: self.limit,
            used: state.count,
        }
    }

    /// Lock the state, resetting it first if the date has changed.
    fn current_state(&self) -> MutexGuard<'_, QuotaState> {
        let today = self.clock.today();
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());

        if state.day != today {
            tracing::info!(
                previous_day = %state.day,
                day = %today,
                used = state.count,
                "New day, resetting quota"
            );
            state.count = 0;
            state.day = today;
        }

        state
    }
}
