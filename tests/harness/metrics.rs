// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for abuse simulation results.

use contact_form_guard::{Decision, Rejection};
use std::collections::HashMap;
use std::time::Duration;

/// Collects decisions during a simulation.
#[derive(Debug, Default)]
pub struct SimulationMetrics {
    /// Count of submissions by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Count of submissions by email address
    per_email: HashMap<String, usize>,
    /// Evaluation latency samples (microseconds)
    latencies: Vec<u64>,
}

/// Possible outcomes for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Accepted,
    Duplicate,
    Honeypot,
    TooFast,
    RateLimited,
    InvalidEmail,
    SpamContent,
    TooShort,
}

impl From<&Decision> for Outcome {
    fn from(decision: &Decision) -> Self {
        match decision {
            Decision::Accepted => Outcome::Accepted,
            Decision::Rejected(rejection) => match rejection {
                Rejection::DuplicateSubmit => Outcome::Duplicate,
                Rejection::BotHoneypot => Outcome::Honeypot,
                Rejection::TooFast { .. } => Outcome::TooFast,
                Rejection::RateLimited { .. } => Outcome::RateLimited,
                Rejection::InvalidEmail(_) => Outcome::InvalidEmail,
                Rejection::SpamContent(_) => Outcome::SpamContent,
                Rejection::TooShort { .. } => Outcome::TooShort,
            },
        }
    }
}

impl SimulationMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decision.
    pub fn record(&mut self, decision: &Decision, email: &str, latency: Duration) {
        *self.outcomes.entry(Outcome::from(decision)).or_insert(0) += 1;
        *self.per_email.entry(email.to_string()).or_insert(0) += 1;
        self.latencies.push(latency.as_micros() as u64);
    }

    /// Get total submission count.
    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Get block rate (ratio of rejected to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (total - self.count(Outcome::Accepted)) as f64 / total as f64
    }

    /// Get median latency in microseconds.
    pub fn median_latency_us(&self) -> u64 {
        if self.latencies.is_empty() {
            return 0;
        }
        let mut sorted = self.latencies.clone();
        sorted.sort_unstable();
        sorted[sorted.len() / 2]
    }

    /// Get number of distinct email addresses used.
    pub fn unique_emails(&self) -> usize {
        self.per_email.len()
    }

    /// Generate a summary report.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total: self.total(),
            accepted: self.count(Outcome::Accepted),
            duplicate: self.count(Outcome::Duplicate),
            honeypot: self.count(Outcome::Honeypot),
            too_fast: self.count(Outcome::TooFast),
            rate_limited: self.count(Outcome::RateLimited),
            content_rejected: self.count(Outcome::InvalidEmail)
                + self.count(Outcome::SpamContent)
                + self.count(Outcome::TooShort),
            block_rate: self.block_rate(),
            median_latency_us: self.median_latency_us(),
            unique_emails: self.unique_emails(),
        }
    }
}

/// Summary report of a simulation.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total: usize,
    pub accepted: usize,
    pub duplicate: usize,
    pub honeypot: usize,
    pub too_fast: usize,
    pub rate_limited: usize,
    pub content_rejected: usize,
    pub block_rate: f64,
    pub median_latency_us: u64,
    pub unique_emails: usize,
}

impl std::fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Simulation Report ===")?;
        writeln!(f, "Submissions:       {}", self.total)?;
        writeln!(f, "Accepted:          {}", self.accepted)?;
        writeln!(f, "Duplicate:         {}", self.duplicate)?;
        writeln!(f, "Honeypot:          {}", self.honeypot)?;
        writeln!(f, "Too Fast:          {}", self.too_fast)?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Content Rejected:  {}", self.content_rejected)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f, "Median Latency:    {} us", self.median_latency_us)?;
        writeln!(f, "Unique Emails:     {}", self.unique_emails)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_rate() {
        let mut metrics = SimulationMetrics::new();
        for _ in 0..3 {
            metrics.record(&Decision::Accepted, "a@example.com", Duration::ZERO);
        }
        for _ in 0..7 {
            metrics.record(
                &Decision::Rejected(Rejection::BotHoneypot),
                "a@example.com",
                Duration::ZERO,
            );
        }
        assert!((metrics.block_rate() - 0.7).abs() < 0.01);
        assert_eq!(metrics.unique_emails(), 1);
    }
}
