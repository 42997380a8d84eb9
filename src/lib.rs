// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Form Guard
//!
//! Abuse prevention for a public contact form, using only what the form
//! host can observe:
//!
//! - Honeypot field detection
//! - Minimum fill time (5s default)
//! - Persisted rate limiting (3 per 24h, 60s apart by default)
//! - Email format and known-abuse pattern checks
//! - Spam keyword, link count and repeated character checks
//! - Minimum message length
//!
//! Storage failures degrade to allowing the submission.

pub mod classifier;
pub mod clock;
pub mod config;
pub mod error;
pub mod form;
pub mod phone;
pub mod pipeline;
pub mod presenter;
pub mod ratelimit;
pub mod storage;
pub mod timing;

pub use classifier::{ContentClassifier, ReasonTag, Verdict};
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use config::Config;
pub use form::{FormSurface, MemoryForm};
pub use pipeline::{Decision, DeliveryOutcome, FormGuard, Rejection, SubmissionAttempt};
pub use ratelimit::{RateLimitResult, RateLimitStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
