// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission validation pipeline.
//!
//! Checks run in a fixed order and the first failure decides:
//! 1. a submission is already in flight
//! 2. the honeypot field is filled
//! 3. the form was filled too fast
//! 4. the rate limit forbids another submission
//! 5. the email address is invalid or suspicious
//! 6. the message looks like spam
//! 7. the message is too short
//!
//! Only an accepted submission writes anything: it is recorded in the rate
//! limit history and marks the guard busy until the caller reports that
//! delivery finished.

use crate::classifier::{ContentClassifier, ReasonTag, Verdict};
use crate::clock::{Clock, Timestamp};
use crate::config::Config;
use crate::error::Result;
use crate::form::FormSurface;
use crate::phone::format_phone_number;
use crate::presenter::ErrorPresenter;
use crate::ratelimit::{RateLimitReason, RateLimitResult, RateLimitStore};
use crate::storage::KeyValueStore;
use crate::timing::TimingMonitor;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// One submit event, read from the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionAttempt {
    pub fill_duration_ms: u64,
    pub honeypot_value: String,
    pub email: String,
    pub message: String,
}

/// Why a submission was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Submission already in progress")]
    DuplicateSubmit,

    #[error("Honeypot field filled")]
    BotHoneypot,

    #[error("Form filled in {elapsed_ms} ms")]
    TooFast { elapsed_ms: u64 },

    #[error("Rate limited: {reason}")]
    RateLimited {
        reason: RateLimitReason,
        retry_after: Duration,
    },

    #[error("Invalid email: {0}")]
    InvalidEmail(ReasonTag),

    #[error("Spam content: {0}")]
    SpamContent(ReasonTag),

    #[error("Message too short: {length} characters")]
    TooShort { length: usize },
}

impl Rejection {
    /// Stable identifier of the rejection kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::DuplicateSubmit => "duplicate-submit",
            Self::BotHoneypot => "bot-honeypot",
            Self::TooFast { .. } => "too-fast",
            Self::RateLimited { .. } => "rate-limited",
            Self::InvalidEmail(_) => "invalid-email",
            Self::SpamContent(_) => "spam-content",
            Self::TooShort { .. } => "too-short",
        }
    }

    /// Classifier reason, for rejections that carry one.
    pub fn reason(&self) -> Option<ReasonTag> {
        match self {
            Self::InvalidEmail(reason) | Self::SpamContent(reason) => Some(*reason),
            Self::TooShort { .. } => Some(ReasonTag::TooShort),
            _ => None,
        }
    }
}

/// Outcome of the pipeline for one submit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected(Rejection),
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Decision::Accepted => None,
            Decision::Rejected(r) => Some(r),
        }
    }
}

/// How the downstream delivery of an accepted submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed,
}

/// Guards one contact form instance.
pub struct FormGuard<S, C> {
    config: Config,
    clock: C,
    timing: TimingMonitor,
    rate_limit: RateLimitStore<S>,
    classifier: ContentClassifier,
    presenter: ErrorPresenter,
    submitting: bool,
}

impl<S: KeyValueStore, C: Clock> FormGuard<S, C> {
    /// Build a guard and record the form load time.
    pub fn new(config: Config, store: S, clock: C) -> Result<Self> {
        let classifier = ContentClassifier::new(&config.classifier)?;
        let mut timing = TimingMonitor::new(config.timing.clone());
        timing.record_load(clock.now_ms());

        Ok(Self {
            rate_limit: RateLimitStore::new(config.rate_limit.clone(), store),
            presenter: ErrorPresenter::new(config.presenter.clone()),
            timing,
            classifier,
            clock,
            config,
            submitting: false,
        })
    }

    /// Build a guard for a rendered form, writing the load time into its
    /// hidden timestamp field.
    pub fn attach<F: FormSurface + ?Sized>(
        form: &mut F,
        config: Config,
        store: S,
        clock: C,
    ) -> Result<Self> {
        let mut guard = Self::new(config, store, clock)?;
        let now = guard.clock.now_ms();
        let loaded_at =
            guard
                .timing
                .record_load_into(now, form, &guard.config.fields.timestamp);
        info!(loaded_at, "Form protection enabled");
        Ok(guard)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn loaded_at(&self) -> Option<Timestamp> {
        self.timing.loaded_at()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn rate_limit(&self) -> &RateLimitStore<S> {
        &self.rate_limit
    }

    pub fn classifier(&self) -> &ContentClassifier {
        &self.classifier
    }

    pub fn presenter(&self) -> &ErrorPresenter {
        &self.presenter
    }

    /// Build the attempt for a submit event at `now`. Missing fields read
    /// as empty.
    pub fn read_attempt<F: FormSurface + ?Sized>(&self, form: &F, now: Timestamp) -> SubmissionAttempt {
        let fields = &self.config.fields;
        let value = |id: &str| form.field_value(id).unwrap_or_default();
        SubmissionAttempt {
            fill_duration_ms: self.timing.fill_duration(now),
            honeypot_value: value(&fields.honeypot),
            email: value(&fields.email),
            message: value(&fields.message),
        }
    }

    /// Run the checks on an attempt. On acceptance the submission is
    /// recorded and the guard becomes busy.
    pub fn evaluate(&mut self, attempt: &SubmissionAttempt, now: Timestamp) -> Decision {
        match self.first_rejection(attempt, now) {
            Some(rejection) => Decision::Rejected(rejection),
            None => {
                self.rate_limit.record(now);
                self.submitting = true;
                info!(fill_ms = attempt.fill_duration_ms, "Submission accepted");
                Decision::Accepted
            }
        }
    }

    fn first_rejection(&self, attempt: &SubmissionAttempt, now: Timestamp) -> Option<Rejection> {
        if self.submitting {
            debug!("Submission already in progress");
            return Some(Rejection::DuplicateSubmit);
        }

        if !attempt.honeypot_value.is_empty() {
            warn!("Bot detected via honeypot");
            return Some(Rejection::BotHoneypot);
        }

        if self.timing.is_too_fast(attempt.fill_duration_ms) {
            warn!(fill_ms = attempt.fill_duration_ms, "Submission too fast");
            return Some(Rejection::TooFast {
                elapsed_ms: attempt.fill_duration_ms,
            });
        }

        if let RateLimitResult::Limited {
            reason,
            retry_after,
        } = self.rate_limit.check(now)
        {
            return Some(Rejection::RateLimited {
                reason,
                retry_after,
            });
        }

        if let Verdict::Rejected(reason) = self.classifier.classify_email(&attempt.email) {
            warn!(email = %attempt.email, %reason, "Email rejected");
            return Some(Rejection::InvalidEmail(reason));
        }

        if let Verdict::Rejected(reason) = self.classifier.classify_message(&attempt.message) {
            warn!(%reason, "Spam content detected");
            return Some(Rejection::SpamContent(reason));
        }

        let length = attempt.message.trim().chars().count();
        if length < self.config.pipeline.min_message_chars {
            debug!(length, "Message too short");
            return Some(Rejection::TooShort { length });
        }

        None
    }

    /// Handle a submit event on `form`. The caller cancels the event when
    /// the decision is a rejection, and otherwise hands the submission to
    /// delivery and later calls [`FormGuard::complete_submission`].
    pub fn handle_submit<F: FormSurface + ?Sized>(&mut self, form: &mut F) -> Decision {
        let now = self.clock.now_ms();
        let attempt = self.read_attempt(form, now);
        let decision = self.evaluate(&attempt, now);
        match &decision {
            Decision::Accepted => form.set_submit_busy(true),
            Decision::Rejected(rejection) => self.present(form, rejection, now),
        }
        decision
    }

    fn present<F: FormSurface + ?Sized>(&mut self, form: &mut F, rejection: &Rejection, now: Timestamp) {
        let messages = &self.config.messages;
        let fields = &self.config.fields;
        match rejection {
            Rejection::DuplicateSubmit => {}
            Rejection::BotHoneypot => {
                self.presenter.show_banner(form, &messages.bot_honeypot, now);
            }
            Rejection::TooFast { .. } => {
                self.presenter.show_banner(form, &messages.too_fast, now);
            }
            Rejection::RateLimited { .. } => {
                self.presenter.show_banner(form, &messages.rate_limited, now);
            }
            Rejection::SpamContent(_) => {
                self.presenter.show_banner(form, &messages.spam_content, now);
            }
            Rejection::InvalidEmail(_) => {
                self.presenter
                    .show_field_error(form, &fields.email, &messages.invalid_email);
                form.focus(&fields.email);
            }
            Rejection::TooShort { .. } => {
                self.presenter
                    .show_field_error(form, &fields.message, &messages.too_short);
                form.focus(&fields.message);
            }
        }
    }

    /// Delivery of the accepted submission finished, successfully or not.
    pub fn complete_submission<F: FormSurface + ?Sized>(&mut self, form: &mut F, outcome: DeliveryOutcome) {
        if !self.submitting {
            debug!(?outcome, "No submission in progress");
            return;
        }
        self.submitting = false;
        form.set_submit_busy(false);
        match outcome {
            DeliveryOutcome::Delivered => info!("Submission delivered"),
            DeliveryOutcome::Failed => warn!("Submission delivery failed"),
        }
    }

    /// The email field lost focus: flag an invalid address right away.
    pub fn handle_email_blur<F: FormSurface + ?Sized>(&mut self, form: &mut F) -> Verdict {
        let id = self.config.fields.email.clone();
        let email = form.field_value(&id).unwrap_or_default();
        if email.is_empty() {
            return Verdict::Ok;
        }
        let verdict = self.classifier.classify_email(&email);
        if !verdict.is_ok() {
            let message = self.config.messages.email_blur.clone();
            self.presenter.show_field_error(form, &id, &message);
        }
        verdict
    }

    /// A field value changed: drop its annotation, and reformat the phone
    /// number.
    pub fn handle_field_input<F: FormSurface + ?Sized>(&mut self, form: &mut F, field: &str) {
        self.presenter.clear_field_error(form, field);
        if field == self.config.fields.phone {
            if let Some(formatted) = form.field_value(field).as_deref().and_then(format_phone_number) {
                form.set_field_value(field, &formatted);
            }
        }
    }

    /// Any user interaction with the form dismisses the banner.
    pub fn handle_interaction<F: FormSurface + ?Sized>(&mut self, form: &mut F) {
        self.presenter.dismiss_any(form);
    }

    /// Expire the banner once its lifetime is over.
    pub fn tick<F: FormSurface + ?Sized>(&mut self, form: &mut F) {
        let now = self.clock.now_ms();
        self.presenter.tick(form, now);
    }
}
