// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Transient error feedback on the contact form.
//!
//! Two channels, usable together:
//! - one global banner, replaced by the next one, dismissed after a delay
//!   or on the next interaction
//! - one annotation per field, replaced by the next one on the same field,
//!   cleared when the field value changes
//!
//! Banner timers are deadlines checked by [`ErrorPresenter::tick`]. Each
//! banner has its own id, so a stale timer never removes a newer banner.

use crate::clock::Timestamp;
use crate::config::PresenterConfig;
use crate::form::FormSurface;
use std::collections::BTreeSet;
use tracing::debug;

/// Identifies one displayed banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BannerId(u64);

#[derive(Debug, Clone, Copy)]
struct ActiveBanner {
    id: BannerId,
    expires_at: Timestamp,
}

/// Renders validation feedback into a [`FormSurface`].
#[derive(Debug, Clone)]
pub struct ErrorPresenter {
    config: PresenterConfig,
    banner: Option<ActiveBanner>,
    next_id: u64,
    annotated: BTreeSet<String>,
}

impl ErrorPresenter {
    pub fn new(config: PresenterConfig) -> Self {
        Self {
            config,
            banner: None,
            next_id: 0,
            annotated: BTreeSet::new(),
        }
    }

    /// Show the global banner, replacing any previous one.
    pub fn show_banner<F: FormSurface + ?Sized>(
        &mut self,
        form: &mut F,
        message: &str,
        now: Timestamp,
    ) -> BannerId {
        if self.banner.take().is_some() {
            form.remove_banner();
        }
        self.next_id += 1;
        let id = BannerId(self.next_id);
        let lifetime = i64::try_from(self.config.banner_dismiss_ms).unwrap_or(i64::MAX);
        form.insert_banner(message);
        self.banner = Some(ActiveBanner {
            id,
            expires_at: now.saturating_add(lifetime),
        });
        debug!(banner = id.0, text = message, "Banner shown");
        id
    }

    /// Dismiss a specific banner. No-op when it was already replaced.
    pub fn dismiss_banner<F: FormSurface + ?Sized>(&mut self, form: &mut F, id: BannerId) -> bool {
        match self.banner {
            Some(active) if active.id == id => {
                self.banner = None;
                form.remove_banner();
                debug!(banner = id.0, "Banner dismissed");
                true
            }
            _ => false,
        }
    }

    /// Dismiss whatever banner is showing.
    pub fn dismiss_any<F: FormSurface + ?Sized>(&mut self, form: &mut F) {
        if let Some(active) = self.banner {
            self.dismiss_banner(form, active.id);
        }
    }

    /// Dismiss the banner if its lifetime is over.
    pub fn tick<F: FormSurface + ?Sized>(&mut self, form: &mut F, now: Timestamp) {
        if let Some(active) = self.banner {
            if now >= active.expires_at {
                self.dismiss_banner(form, active.id);
            }
        }
    }

    pub fn active_banner(&self) -> Option<BannerId> {
        self.banner.map(|b| b.id)
    }

    /// Annotate a field, replacing its previous annotation.
    pub fn show_field_error<F: FormSurface + ?Sized>(
        &mut self,
        form: &mut F,
        field: &str,
        message: &str,
    ) {
        form.remove_field_error(field);
        form.insert_field_error(field, message);
        self.annotated.insert(field.to_string());
        debug!(field, text = message, "Field error shown");
    }

    /// Remove a field annotation.
    pub fn clear_field_error<F: FormSurface + ?Sized>(&mut self, form: &mut F, field: &str) {
        if self.annotated.remove(field) {
            debug!(field, "Field error cleared");
        }
        form.remove_field_error(field);
    }

    pub fn has_field_error(&self, field: &str) -> bool {
        self.annotated.contains(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::MemoryForm;

    fn presenter() -> ErrorPresenter {
        ErrorPresenter::new(PresenterConfig::default())
    }

    #[test]
    fn test_banner_replaced_by_next() {
        let mut form = MemoryForm::new();
        let mut presenter = presenter();

        let first = presenter.show_banner(&mut form, "first", 0);
        let second = presenter.show_banner(&mut form, "second", 1_000);
        assert_ne!(first, second);
        assert_eq!(form.banner(), Some("second"));

        // The first banner's timer fires: the second one stays.
        assert!(!presenter.dismiss_banner(&mut form, first));
        assert_eq!(form.banner(), Some("second"));
    }

    #[test]
    fn test_banner_expires_after_lifetime() {
        let mut form = MemoryForm::new();
        let mut presenter = presenter();
        presenter.show_banner(&mut form, "oops", 10_000);

        presenter.tick(&mut form, 14_999);
        assert_eq!(form.banner(), Some("oops"));
        presenter.tick(&mut form, 15_000);
        assert_eq!(form.banner(), None);
        assert!(presenter.active_banner().is_none());
    }

    #[test]
    fn test_replacing_banner_restarts_lifetime() {
        let mut form = MemoryForm::new();
        let mut presenter = presenter();
        presenter.show_banner(&mut form, "first", 0);
        presenter.show_banner(&mut form, "second", 4_000);

        presenter.tick(&mut form, 5_000);
        assert_eq!(form.banner(), Some("second"));
        presenter.tick(&mut form, 9_000);
        assert_eq!(form.banner(), None);
    }

    #[test]
    fn test_dismiss_any() {
        let mut form = MemoryForm::new();
        let mut presenter = presenter();
        presenter.dismiss_any(&mut form);
        presenter.show_banner(&mut form, "oops", 0);
        presenter.dismiss_any(&mut form);
        assert_eq!(form.banner(), None);
    }

    #[test]
    fn test_field_errors_one_per_field() {
        let mut form = MemoryForm::new();
        let mut presenter = presenter();

        presenter.show_field_error(&mut form, "contact-email", "bad");
        presenter.show_field_error(&mut form, "contact-email", "still bad");
        presenter.show_field_error(&mut form, "contact-message", "short");

        assert_eq!(form.field_error("contact-email"), Some("still bad"));
        assert_eq!(form.field_error_count(), 2);

        presenter.clear_field_error(&mut form, "contact-email");
        assert!(form.field_error("contact-email").is_none());
        assert!(!presenter.has_field_error("contact-email"));
        assert!(presenter.has_field_error("contact-message"));
    }

    #[test]
    fn test_channels_are_independent() {
        let mut form = MemoryForm::new();
        let mut presenter = presenter();
        presenter.show_field_error(&mut form, "contact-email", "bad");
        presenter.show_banner(&mut form, "oops", 0);
        presenter.tick(&mut form, 5_000);
        assert_eq!(form.field_error("contact-email"), Some("bad"));
    }
}
