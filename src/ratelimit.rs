// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Persisted submission rate limiting.
//!
//! Accepted submissions are recorded as epoch-millisecond timestamps under a
//! single storage key. Two limits apply inside a rolling retention window
//! (24h by default):
//! 1. At most `max_submissions_per_session` accepted submissions
//! 2. At least `rate_limit_delay_ms` between two submissions
//!
//! Storage problems never block a visitor: an unreadable record counts as
//! empty and a failed write is logged and dropped.

use crate::clock::Timestamp;
use crate::config::RateLimitConfig;
use crate::error::StorageError;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Persisted submission history, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    #[serde(default)]
    pub submissions: Vec<Timestamp>,
}

impl RateLimitRecord {
    /// Drop entries at least `retention_ms` old.
    pub fn prune(&mut self, now: Timestamp, retention_ms: i64) {
        self.submissions
            .retain(|&t| now.saturating_sub(t) < retention_ms);
    }

    /// Keep only the newest `cap` entries.
    pub fn truncate_oldest(&mut self, cap: usize) {
        if self.submissions.len() > cap {
            let excess = self.submissions.len() - cap;
            self.submissions.drain(..excess);
        }
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Submission is allowed
    Allowed {
        /// Submissions left in the retention window, this one included
        remaining: usize,
    },
    /// Submission is rate limited
    Limited {
        reason: RateLimitReason,
        /// Time until the blocking entry stops counting
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Reason for rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateLimitReason {
    /// Maximum submissions reached inside the retention window
    CapReached,
    /// Last submission is more recent than the minimum delay
    TooSoon,
}

impl std::fmt::Display for RateLimitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CapReached => write!(f, "Submission limit reached"),
            Self::TooSoon => write!(f, "Previous submission too recent"),
        }
    }
}

/// Rate limiter over a [`KeyValueStore`].
pub struct RateLimitStore<S> {
    config: RateLimitConfig,
    store: S,
}

impl<S: KeyValueStore> RateLimitStore<S> {
    pub fn new(config: RateLimitConfig, store: S) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn retention_ms(&self) -> i64 {
        i64::try_from(self.config.retention_ms).unwrap_or(i64::MAX)
    }

    fn delay_ms(&self) -> i64 {
        i64::try_from(self.config.rate_limit_delay_ms).unwrap_or(i64::MAX)
    }

    fn try_load(&self) -> Result<RateLimitRecord, StorageError> {
        match self.store.get(&self.config.storage_key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(RateLimitRecord::default()),
        }
    }

    /// Load the stored record. Any failure yields an empty record.
    pub fn load(&self) -> RateLimitRecord {
        self.try_load().unwrap_or_else(|e| {
            warn!(key = %self.config.storage_key, error = %e, "Unreadable rate limit record, treating as empty");
            RateLimitRecord::default()
        })
    }

    /// Read-modify-write the stored record. Write failures are logged and
    /// otherwise ignored.
    fn update<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut RateLimitRecord),
    {
        let mut record = self.load();
        mutate(&mut record);
        let saved = serde_json::to_string(&record)
            .map_err(StorageError::from)
            .and_then(|raw| self.store.set(&self.config.storage_key, &raw));
        if let Err(e) = saved {
            warn!(key = %self.config.storage_key, error = %e, "Could not persist rate limit record");
        }
    }

    /// Check whether another submission is allowed at `now`.
    ///
    /// The cap is checked before the delay. Pruning applies to this read
    /// only and is not written back.
    pub fn check(&self, now: Timestamp) -> RateLimitResult {
        let mut record = self.load();
        let retention = self.retention_ms();
        record.prune(now, retention);

        let count = record.submissions.len();
        let max = self.config.max_submissions_per_session;
        if count >= max {
            let oldest = record.submissions.first().copied().unwrap_or(now);
            let retry_after = remaining_ms(retention, now.saturating_sub(oldest));
            warn!(count, max, ?retry_after, "Submission limit reached");
            return RateLimitResult::Limited {
                reason: RateLimitReason::CapReached,
                retry_after,
            };
        }

        if let Some(&last) = record.submissions.last() {
            let since_last = now.saturating_sub(last);
            let delay = self.delay_ms();
            if since_last < delay {
                let retry_after = remaining_ms(delay, since_last);
                warn!(?retry_after, "Previous submission too recent");
                return RateLimitResult::Limited {
                    reason: RateLimitReason::TooSoon,
                    retry_after,
                };
            }
        }

        debug!(count, max, "Rate limit check passed");
        RateLimitResult::Allowed {
            remaining: max - count,
        }
    }

    /// Whether another submission is allowed at `now`.
    pub fn is_allowed(&self, now: Timestamp) -> bool {
        self.check(now).is_allowed()
    }

    /// Record an accepted submission at `now`.
    ///
    /// Expired entries and entries beyond the cap are dropped in the same
    /// write, so the stored history never exceeds the cap.
    pub fn record(&mut self, now: Timestamp) {
        let retention = self.retention_ms();
        let max = self.config.max_submissions_per_session;
        self.update(|record| {
            record.prune(now, retention);
            record.submissions.push(now);
            record.truncate_oldest(max);
        });
        debug!(at = now, "Submission recorded");
    }
}

fn remaining_ms(window: i64, elapsed: i64) -> Duration {
    Duration::from_millis(u64::try_from(window.saturating_sub(elapsed)).unwrap_or(0))
}
