//! Sliding-window SMS rate limiting
//!
//! One gate instance lives for the whole process (created with the app
//! state); windows are per normalized destination number. Emergency sends
//! bypass the gate entirely: a life-safety message is never suppressed by a
//! limiter meant for notification spam, and it is not recorded against the
//! window either.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use vitalguard_shared::errors::ChannelError;

/// Per-destination sliding-window limiter
///
/// Shared mutable state: dispatch tasks for many contacts may race on the
/// same number, so the window map sits behind a single mutex. Lock hold
/// times are a few map operations; contention is not a concern at emergency
/// fan-out sizes.
pub struct RateGate {
    limit: usize,
    window: Duration,
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateGate {
    /// Gate with the default 60-second window
    pub fn new(limit: usize) -> Self {
        Self::with_window(limit, Duration::from_secs(60))
    }

    pub fn with_window(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Admit or reject one send to `number` (already normalized).
    ///
    /// Emergency sends are always admitted and never recorded. For normal
    /// sends, timestamps older than the window are pruned, then the send is
    /// admitted and recorded while the window holds fewer than `limit`
    /// entries.
    pub fn admit(&self, number: &str, emergency: bool) -> Result<(), ChannelError> {
        if emergency {
            return Ok(());
        }

        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let entries = windows.entry(number.to_string()).or_default();

        while entries
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            entries.pop_front();
        }

        if entries.len() >= self.limit {
            return Err(ChannelError::RateLimited(format!(
                "{number} exceeded {} sends per {}s",
                self.limit,
                self.window.as_secs()
            )));
        }

        entries.push_back(now);
        Ok(())
    }

    /// Drop all windows. Test hook; never called on the live path.
    pub fn reset(&self) {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Normalize a raw phone number to `+<country code><subscriber>` form.
///
/// The same normalization must run everywhere a number is used as a rate
/// key, otherwise the window fragments per formatting variant.
pub fn normalize_phone(raw: &str, default_country_code: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let digits = if let Some(rest) = digits.strip_prefix('0') {
        // local format: leading zero stands in for the country code
        format!("{default_country_code}{rest}")
    } else if digits.len() == 10 {
        format!("{default_country_code}{digits}")
    } else {
        digits
    };

    format!("+{digits}")
}
