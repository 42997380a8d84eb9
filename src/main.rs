// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Form Guard replay tool
//!
//! Replays recorded contact form submissions through the guard against a
//! file-backed rate limit store and prints one JSON decision per line.
//!
//! ## Input
//!
//! Newline-delimited JSON, one submission per line:
//!
//! ```json
//! {"email":"jane@example.com","message":"Hello, a quote please","honeypot":"","fill_duration_ms":8000,"at_ms":1700000000000}
//! ```
//!
//! `at_ms` defaults to the current time. Each accepted submission is treated
//! as delivered before the next line is read.
//!
//! ## Configuration
//!
//! - `--config`: JSON config file (all sections optional)
//! - `MIN_FILL_TIME_MS`, `RATE_LIMIT_DELAY_MS`, `MAX_SUBMISSIONS_PER_SESSION`,
//!   `STORAGE_KEY`: environment overrides

use anyhow::Context;
use clap::Parser;
use contact_form_guard::{
    Clock, Config, Decision, DeliveryOutcome, FileStore, FormGuard, MemoryForm, SubmissionAttempt,
    SystemClock,
};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "contact-form-guard", about = "Replay contact form submissions through the abuse guard")]
struct Args {
    /// Directory holding the persisted rate limit record
    #[arg(long, default_value = ".contact-form-guard")]
    store: PathBuf,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Submissions file (newline-delimited JSON); stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct SubmissionLine {
    #[serde(default)]
    email: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    honeypot: String,
    fill_duration_ms: u64,
    #[serde(default)]
    at_ms: Option<i64>,
}

impl From<SubmissionLine> for SubmissionAttempt {
    fn from(line: SubmissionLine) -> Self {
        Self {
            fill_duration_ms: line.fill_duration_ms,
            honeypot_value: line.honeypot,
            email: line.email,
            message: line.message,
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries decisions.
    tracing_subscriber::registry()
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).context("loading configuration")?;
    info!(
        store = %args.store.display(),
        min_fill_time_ms = config.timing.min_fill_time_ms,
        rate_limit_delay_ms = config.rate_limit.rate_limit_delay_ms,
        max_submissions = config.rate_limit.max_submissions_per_session,
        "Starting submission replay"
    );

    let clock = SystemClock;
    let mut guard = FormGuard::new(config, FileStore::new(&args.store), clock)?;
    let mut scratch = MemoryForm::new();

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let (mut accepted, mut rejected) = (0usize, 0usize);

    for (index, line) in reader.lines().enumerate() {
        let line = line.context("reading submissions")?;
        if line.trim().is_empty() {
            continue;
        }
        let number = index + 1;

        let submission: SubmissionLine = match serde_json::from_str(&line) {
            Ok(s) => s,
            Err(e) => {
                warn!(line = number, error = %e, "Skipping malformed submission");
                writeln!(out, "{}", serde_json::json!({ "line": number, "error": e.to_string() }))?;
                continue;
            }
        };

        let now = submission.at_ms.unwrap_or_else(|| clock.now_ms());
        let attempt = SubmissionAttempt::from(submission);
        let report = match guard.evaluate(&attempt, now) {
            Decision::Accepted => {
                accepted += 1;
                guard.complete_submission(&mut scratch, DeliveryOutcome::Delivered);
                serde_json::json!({ "line": number, "decision": "accepted" })
            }
            Decision::Rejected(rejection) => {
                rejected += 1;
                serde_json::json!({
                    "line": number,
                    "decision": "rejected",
                    "rejection": rejection.tag(),
                    "reason": rejection.reason().map(|r| r.as_str()),
                    "detail": rejection.to_string(),
                })
            }
        };
        writeln!(out, "{report}")?;
    }

    info!(accepted, rejected, "Replay finished");
    Ok(())
}
