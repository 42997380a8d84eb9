// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Content classification for contact form submissions.
//!
//! Two independent judgments, each an ordered rule list where the first
//! matching rule decides the reason:
//!
//! Email:
//! 1. `invalid-format` unless shaped `local@domain.tld`
//! 2. `suspicious-domain-or-pattern` on the first configured pattern match
//! 3. `invalid-format` when the top-level domain is too short
//!
//! Message:
//! 1. `spam-keyword` on the first configured keyword found
//! 2. `excess-links` when there are too many http(s) links
//! 3. `repeated-characters` when one character repeats too many times in a row

use crate::config::ClassifierConfig;
use crate::error::{ConfigError, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reason attached to a classification verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonTag {
    Ok,
    InvalidFormat,
    SuspiciousDomainOrPattern,
    TooShort,
    SpamKeyword,
    ExcessLinks,
    RepeatedCharacters,
}

impl ReasonTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::InvalidFormat => "invalid-format",
            Self::SuspiciousDomainOrPattern => "suspicious-domain-or-pattern",
            Self::TooShort => "too-short",
            Self::SpamKeyword => "spam-keyword",
            Self::ExcessLinks => "excess-links",
            Self::RepeatedCharacters => "repeated-characters",
        }
    }
}

impl std::fmt::Display for ReasonTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    Rejected(ReasonTag),
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        matches!(self, Verdict::Ok)
    }

    pub fn reason(&self) -> ReasonTag {
        match self {
            Verdict::Ok => ReasonTag::Ok,
            Verdict::Rejected(reason) => *reason,
        }
    }
}

/// Compiled classification rules.
#[derive(Debug, Clone)]
pub struct ContentClassifier {
    email_shape: Regex,
    email_rules: Vec<(Regex, ReasonTag)>,
    spam_keywords: Vec<String>,
    link: Regex,
    max_links: usize,
    repeated_char_run: usize,
    min_tld_len: usize,
}

impl ContentClassifier {
    /// Compile the configured rules.
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        let email_rules = config
            .suspicious_email_patterns
            .iter()
            .map(|rule| compile(&rule.pattern).map(|re| (re, rule.reason)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            email_shape: compile(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?,
            email_rules,
            spam_keywords: config
                .spam_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            link: compile(r"https?://")?,
            max_links: config.max_links,
            repeated_char_run: config.repeated_char_run,
            min_tld_len: config.min_tld_len,
        })
    }

    /// Judge an email address.
    pub fn classify_email(&self, email: &str) -> Verdict {
        if !self.email_shape.is_match(email) {
            debug!(email = %email, "Email malformed");
            return Verdict::Rejected(ReasonTag::InvalidFormat);
        }

        if let Some((pattern, reason)) = self
            .email_rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(email))
        {
            debug!(email = %email, pattern = %pattern.as_str(), "Suspicious email");
            return Verdict::Rejected(*reason);
        }

        let tld = email
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .and_then(|domain| domain.rsplit('.').next())
            .unwrap_or("");
        if tld.chars().count() < self.min_tld_len {
            debug!(email = %email, tld = %tld, "Top-level domain too short");
            return Verdict::Rejected(ReasonTag::InvalidFormat);
        }

        Verdict::Ok
    }

    /// Judge a free-text message.
    pub fn classify_message(&self, message: &str) -> Verdict {
        let lower = message.to_lowercase();
        if let Some(keyword) = self.spam_keywords.iter().find(|k| lower.contains(k.as_str())) {
            debug!(keyword = %keyword, "Spam keyword found");
            return Verdict::Rejected(ReasonTag::SpamKeyword);
        }

        let links = self.link.find_iter(message).count();
        if links > self.max_links {
            debug!(links, max = self.max_links, "Too many links");
            return Verdict::Rejected(ReasonTag::ExcessLinks);
        }

        if has_repeated_run(message, self.repeated_char_run) {
            debug!(run = self.repeated_char_run, "Repeated characters found");
            return Verdict::Rejected(ReasonTag::RepeatedCharacters);
        }

        Verdict::Ok
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Whether some character occurs `run` times in a row. Line terminators
/// never count and break a run.
fn has_repeated_run(text: &str, run: usize) -> bool {
    let mut prev = None;
    let mut count = 0usize;
    for c in text.chars() {
        if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
            prev = None;
            count = 0;
            continue;
        }
        if prev == Some(c) {
            count += 1;
        } else {
            prev = Some(c);
            count = 1;
        }
        if count >= run {
            return true;
        }
    }
    false
}
