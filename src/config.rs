// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact form guard.
//!
//! Defaults reproduce the thresholds and rule lists the contact form has
//! always shipped with. Every section can be overridden from a JSON file and
//! the main thresholds from environment variables.

use crate::classifier::ReasonTag;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Fill-time policy
    #[serde(default)]
    pub timing: TimingConfig,

    /// Persisted submission rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Email and message classification rules
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Structural checks owned by the pipeline
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Error feedback
    #[serde(default)]
    pub presenter: PresenterConfig,

    /// Form element identifiers
    #[serde(default)]
    pub fields: FieldConfig,

    /// User-facing feedback texts
    #[serde(default)]
    pub messages: MessageConfig,
}

/// Fill-time policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Minimum time between form render and submit, in milliseconds (default: 5000)
    #[serde(default = "default_min_fill_time_ms")]
    pub min_fill_time_ms: u64,
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Minimum delay between two accepted submissions in milliseconds (default: 60000)
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Maximum accepted submissions inside the retention window (default: 3)
    #[serde(default = "default_max_submissions")]
    pub max_submissions_per_session: usize,

    /// How long a recorded submission counts, in milliseconds (default: 24h)
    #[serde(default = "default_retention_ms")]
    pub retention_ms: u64,

    /// Storage key holding the submission record
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

/// One suspicious-email rule. Rules are evaluated in order, first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    /// Case-insensitive regular expression
    pub pattern: String,

    /// Reason reported when the rule matches
    #[serde(default = "default_pattern_reason")]
    pub reason: ReasonTag,
}

/// Content classification rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Known-abuse email patterns
    #[serde(default = "default_email_patterns")]
    pub suspicious_email_patterns: Vec<PatternRule>,

    /// Spam keywords, matched as lower-cased substrings in list order
    #[serde(default = "default_spam_keywords")]
    pub spam_keywords: Vec<String>,

    /// Maximum number of http(s) links in a message (default: 2)
    #[serde(default = "default_max_links")]
    pub max_links: usize,

    /// Run length at which a repeated character is flagged (default: 6)
    #[serde(default = "default_repeated_run")]
    pub repeated_char_run: usize,

    /// Minimum length of the top-level domain (default: 2)
    #[serde(default = "default_min_tld_len")]
    pub min_tld_len: usize,
}

/// Structural checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum trimmed message length in characters (default: 10)
    #[serde(default = "default_min_message_chars")]
    pub min_message_chars: usize,
}

/// Error feedback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenterConfig {
    /// Global banner lifetime in milliseconds (default: 5000)
    #[serde(default = "default_banner_dismiss_ms")]
    pub banner_dismiss_ms: u64,
}

/// Element identifiers of the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default = "default_email_field")]
    pub email: String,

    #[serde(default = "default_message_field")]
    pub message: String,

    /// Hidden field that humans never fill
    #[serde(default = "default_honeypot_field")]
    pub honeypot: String,

    /// Hidden field receiving the form load timestamp
    #[serde(default = "default_timestamp_field")]
    pub timestamp: String,

    #[serde(default = "default_phone_field")]
    pub phone: String,
}

/// Texts shown to the user for each rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    #[serde(default = "default_msg_honeypot")]
    pub bot_honeypot: String,

    #[serde(default = "default_msg_too_fast")]
    pub too_fast: String,

    #[serde(default = "default_msg_rate_limited")]
    pub rate_limited: String,

    #[serde(default = "default_msg_invalid_email")]
    pub invalid_email: String,

    /// Shown when the email field loses focus with an invalid address
    #[serde(default = "default_msg_email_blur")]
    pub email_blur: String,

    #[serde(default = "default_msg_spam")]
    pub spam_content: String,

    #[serde(default = "default_msg_too_short")]
    pub too_short: String,
}

// Default value functions
fn default_min_fill_time_ms() -> u64 {
    5000
}

fn default_rate_limit_delay_ms() -> u64 {
    60_000
}

fn default_max_submissions() -> usize {
    3
}

fn default_retention_ms() -> u64 {
    24 * 60 * 60 * 1000
}

fn default_storage_key() -> String {
    "vprr_form_submissions".to_string()
}

fn default_pattern_reason() -> ReasonTag {
    ReasonTag::SuspiciousDomainOrPattern
}

fn default_email_patterns() -> Vec<PatternRule> {
    [
        "test@test",
        "admin@",
        "spam",
        r"\.ru$",
        r"\.cn$",
        "@mailinator",
        "@tempmail",
        "@throwaway",
        "@guerrillamail",
        "@10minutemail",
    ]
    .into_iter()
    .map(|pattern| PatternRule {
        pattern: pattern.to_string(),
        reason: default_pattern_reason(),
    })
    .collect()
}

fn default_spam_keywords() -> Vec<String> {
    [
        "viagra",
        "cialis",
        "casino",
        "lottery",
        "winner",
        "bitcoin",
        "crypto",
        "investment opportunity",
        "make money fast",
        "click here",
        "free money",
        "nigerian prince",
        "inheritance",
        "million dollars",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_max_links() -> usize {
    2
}

fn default_repeated_run() -> usize {
    6
}

fn default_min_tld_len() -> usize {
    2
}

fn default_min_message_chars() -> usize {
    10
}

fn default_banner_dismiss_ms() -> u64 {
    5000
}

fn default_email_field() -> String {
    "contact-email".to_string()
}

fn default_message_field() -> String {
    "contact-message".to_string()
}

fn default_honeypot_field() -> String {
    "bot-field".to_string()
}

fn default_timestamp_field() -> String {
    "form-timestamp".to_string()
}

fn default_phone_field() -> String {
    "contact-telephone".to_string()
}

fn default_msg_honeypot() -> String {
    "Something went wrong. Please try again.".to_string()
}

fn default_msg_too_fast() -> String {
    "Please take the time to fill in the form properly.".to_string()
}

fn default_msg_rate_limited() -> String {
    "You sent a message recently. Please wait before trying again.".to_string()
}

fn default_msg_invalid_email() -> String {
    "Please enter a valid email address.".to_string()
}

fn default_msg_email_blur() -> String {
    "Invalid email address".to_string()
}

fn default_msg_spam() -> String {
    "Your message was flagged as unwanted. Please rephrase it.".to_string()
}

fn default_msg_too_short() -> String {
    "Your message is too short. Briefly describe your project.".to_string()
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_fill_time_ms: default_min_fill_time_ms(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            max_submissions_per_session: default_max_submissions(),
            retention_ms: default_retention_ms(),
            storage_key: default_storage_key(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            suspicious_email_patterns: default_email_patterns(),
            spam_keywords: default_spam_keywords(),
            max_links: default_max_links(),
            repeated_char_run: default_repeated_run(),
            min_tld_len: default_min_tld_len(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_message_chars: default_min_message_chars(),
        }
    }
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            banner_dismiss_ms: default_banner_dismiss_ms(),
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            email: default_email_field(),
            message: default_message_field(),
            honeypot: default_honeypot_field(),
            timestamp: default_timestamp_field(),
            phone: default_phone_field(),
        }
    }
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            bot_honeypot: default_msg_honeypot(),
            too_fast: default_msg_too_fast(),
            rate_limited: default_msg_rate_limited(),
            invalid_email: default_msg_invalid_email(),
            email_blur: default_msg_email_blur(),
            spam_content: default_msg_spam(),
            too_short: default_msg_too_short(),
        }
    }
}

impl TimingConfig {
    /// Get the minimum fill duration
    pub fn min_fill_time(&self) -> Duration {
        Duration::from_millis(self.min_fill_time_ms)
    }
}

impl RateLimitConfig {
    /// Get the delay between submissions
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_delay_ms)
    }

    /// Get the retention window
    pub fn retention(&self) -> Duration {
        Duration::from_millis(self.retention_ms)
    }
}

impl PresenterConfig {
    /// Get the banner lifetime
    pub fn banner_lifetime(&self) -> Duration {
        Duration::from_millis(self.banner_dismiss_ms)
    }
}

impl Config {
    /// Load configuration from an optional JSON file, then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Read configuration from a JSON file. Missing sections take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Override thresholds from environment variables.
    ///
    /// - `MIN_FILL_TIME_MS`
    /// - `RATE_LIMIT_DELAY_MS`
    /// - `MAX_SUBMISSIONS_PER_SESSION`
    /// - `STORAGE_KEY`
    pub fn apply_env(&mut self) {
        if let Some(v) = env_parse("MIN_FILL_TIME_MS") {
            self.timing.min_fill_time_ms = v;
        }
        if let Some(v) = env_parse("RATE_LIMIT_DELAY_MS") {
            self.rate_limit.rate_limit_delay_ms = v;
        }
        if let Some(v) = env_parse("MAX_SUBMISSIONS_PER_SESSION") {
            self.rate_limit.max_submissions_per_session = v;
        }
        if let Ok(key) = std::env::var("STORAGE_KEY") {
            if !key.trim().is_empty() {
                self.rate_limit.storage_key = key;
            }
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => {
            debug!(key, value = %raw, "Config override from environment");
            Some(v)
        }
        Err(_) => {
            warn!(key, value = %raw, "Ignoring invalid environment override");
            None
        }
    }
}
