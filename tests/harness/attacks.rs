// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submitter profiles for abuse simulation.

/// What a simulated submitter puts in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    /// Plausible request from a real address
    Clean,
    /// Real address, spammy message
    Spam,
    /// Disposable or abuse-listed address
    Disposable,
    /// Address that is not an email at all
    Malformed,
}

/// Simulated submitter behaviour.
#[derive(Debug, Clone)]
pub struct SubmitterProfile {
    /// Number of submit events
    pub submissions: usize,
    /// Time between two submit events in milliseconds
    pub interval_ms: i64,
    /// Time spent filling the form before each submit
    pub fill_duration_ms: u64,
    /// Whether the hidden honeypot field gets filled
    pub fills_honeypot: bool,
    /// Form content
    pub content: Content,
    /// Whether delivery completes before the next submit event
    pub waits_for_delivery: bool,
}

impl Default for SubmitterProfile {
    fn default() -> Self {
        Self {
            submissions: 20,
            interval_ms: 10_000,
            fill_duration_ms: 8_000,
            fills_honeypot: false,
            content: Content::Clean,
            waits_for_delivery: true,
        }
    }
}

/// Predefined profiles.
impl SubmitterProfile {
    /// Script posting the form as soon as it loads.
    pub fn instant_script() -> Self {
        Self {
            submissions: 100,
            interval_ms: 50,
            fill_duration_ms: 300,
            ..Default::default()
        }
    }

    /// Naive crawler filling every input it finds.
    pub fn honeypot_filler() -> Self {
        Self {
            submissions: 50,
            fills_honeypot: true,
            ..Default::default()
        }
    }

    /// Bot that waits like a human but posts spam.
    pub fn patient_spammer() -> Self {
        Self {
            submissions: 30,
            interval_ms: 61_000,
            fill_duration_ms: 12_000,
            content: Content::Spam,
            ..Default::default()
        }
    }

    /// Sender rotating throwaway addresses.
    pub fn disposable_sender() -> Self {
        Self {
            submissions: 30,
            interval_ms: 61_000,
            content: Content::Disposable,
            ..Default::default()
        }
    }

    /// Sender typing garbage into the email field.
    pub fn malformed_sender() -> Self {
        Self {
            submissions: 9,
            content: Content::Malformed,
            ..Default::default()
        }
    }

    /// Legitimate-looking content posted over and over.
    pub fn repeat_flood() -> Self {
        Self {
            submissions: 50,
            interval_ms: 10_000,
            ..Default::default()
        }
    }

    /// A double click while delivery is still running.
    pub fn double_click() -> Self {
        Self {
            submissions: 10,
            interval_ms: 120_000,
            waits_for_delivery: false,
            ..Default::default()
        }
    }

    /// Occasional visitor, one message every eight hours.
    pub fn slow_drip() -> Self {
        Self {
            submissions: 12,
            interval_ms: 8 * 60 * 60 * 1000,
            ..Default::default()
        }
    }
}
