// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Form fill timing.
//!
//! Scripts submit a form within milliseconds of loading it; people do not.
//! The monitor stamps the load time once and measures the fill duration at
//! submit time. There is no upper bound: slow visitors are never penalised.

use crate::clock::Timestamp;
use crate::config::TimingConfig;
use crate::form::FormSurface;
use tracing::debug;

/// Records the form load time for one page lifetime.
#[derive(Debug, Clone)]
pub struct TimingMonitor {
    config: TimingConfig,
    loaded_at: Option<Timestamp>,
}

impl TimingMonitor {
    pub fn new(config: TimingConfig) -> Self {
        Self {
            config,
            loaded_at: None,
        }
    }

    /// Capture the load time. Later calls return the first value unchanged.
    pub fn record_load(&mut self, now: Timestamp) -> Timestamp {
        *self.loaded_at.get_or_insert_with(|| {
            debug!(loaded_at = now, "Form load time recorded");
            now
        })
    }

    /// Capture the load time and copy it into the hidden timestamp field,
    /// when the form has one.
    pub fn record_load_into<F: FormSurface + ?Sized>(
        &mut self,
        now: Timestamp,
        form: &mut F,
        timestamp_field: &str,
    ) -> Timestamp {
        let loaded_at = self.record_load(now);
        if form.set_field_value(timestamp_field, &loaded_at.to_string()) {
            debug!(field = timestamp_field, loaded_at, "Timestamp field written");
        }
        loaded_at
    }

    pub fn loaded_at(&self) -> Option<Timestamp> {
        self.loaded_at
    }

    /// Milliseconds elapsed since load. Unrecorded load counts as epoch 0.
    pub fn fill_duration(&self, now: Timestamp) -> u64 {
        elapsed_since(self.loaded_at.unwrap_or(0), now)
    }

    /// Whether a fill duration is below the minimum.
    pub fn is_too_fast(&self, fill_duration_ms: u64) -> bool {
        fill_duration_ms < self.config.min_fill_time_ms
    }
}

/// `now - load_ts`, clamped at zero.
pub fn elapsed_since(load_ts: Timestamp, now: Timestamp) -> u64 {
    u64::try_from(now.saturating_sub(load_ts)).unwrap_or(0)
}
