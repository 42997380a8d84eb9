// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The form the guard attaches to.
//!
//! [`FormSurface`] is the boundary to whatever renders the contact form:
//! field access by element id, the insertion points for error feedback,
//! and the submit button state.

use std::collections::BTreeMap;

/// Rendered contact form.
pub trait FormSurface {
    /// Current value of a field, `None` when the form has no such field.
    fn field_value(&self, id: &str) -> Option<String>;

    /// Overwrite a field value. Returns `false` when the field does not exist.
    fn set_field_value(&mut self, id: &str, value: &str) -> bool;

    /// Insert the global error banner at the top of the form.
    fn insert_banner(&mut self, message: &str);

    /// Remove the global error banner if present.
    fn remove_banner(&mut self);

    /// Attach an error annotation after a field.
    fn insert_field_error(&mut self, id: &str, message: &str);

    /// Remove the error annotation of a field if present.
    fn remove_field_error(&mut self, id: &str);

    /// Move input focus to a field.
    fn focus(&mut self, id: &str);

    /// Disable the submit button while a submission is in flight.
    fn set_submit_busy(&mut self, busy: bool);
}

/// In-memory form, for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryForm {
    fields: BTreeMap<String, String>,
    banner: Option<String>,
    field_errors: BTreeMap<String, String>,
    focused: Option<String>,
    submit_busy: bool,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field declaration.
    pub fn with_field(mut self, id: &str, value: &str) -> Self {
        self.fields.insert(id.to_string(), value.to_string());
        self
    }

    /// The standard contact form layout with every field empty.
    pub fn contact(fields: &crate::config::FieldConfig) -> Self {
        Self::new()
            .with_field(&fields.email, "")
            .with_field(&fields.message, "")
            .with_field(&fields.honeypot, "")
            .with_field(&fields.timestamp, "")
            .with_field(&fields.phone, "")
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn field_error(&self, id: &str) -> Option<&str> {
        self.field_errors.get(id).map(String::as_str)
    }

    pub fn field_error_count(&self) -> usize {
        self.field_errors.len()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn is_submit_busy(&self) -> bool {
        self.submit_busy
    }
}

impl FormSurface for MemoryForm {
    fn field_value(&self, id: &str) -> Option<String> {
        self.fields.get(id).cloned()
    }

    fn set_field_value(&mut self, id: &str, value: &str) -> bool {
        match self.fields.get_mut(id) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }

    fn insert_banner(&mut self, message: &str) {
        self.banner = Some(message.to_string());
    }

    fn remove_banner(&mut self) {
        self.banner = None;
    }

    fn insert_field_error(&mut self, id: &str, message: &str) {
        self.field_errors.insert(id.to_string(), message.to_string());
    }

    fn remove_field_error(&mut self, id: &str) {
        self.field_errors.remove(id);
    }

    fn focus(&mut self, id: &str) {
        self.focused = Some(id.to_string());
    }

    fn set_submit_busy(&mut self, busy: bool) {
        self.submit_busy = busy;
    }
}
