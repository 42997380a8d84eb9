// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Live formatting of the phone field as French digit pairs.

const MAX_DIGITS: usize = 10;

/// Format a phone number as `06 12 34 56 78`.
///
/// Non-digits are dropped, a leading `33` country code becomes `0`, and
/// digits beyond the tenth are ignored. Returns `None` when the input holds
/// no digit at all, in which case the field is left untouched.
pub fn format_phone_number(input: &str) -> Option<String> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }

    let digits = match digits.strip_prefix("33") {
        Some(rest) => format!("0{rest}"),
        None => digits,
    };

    let mut formatted = String::with_capacity(MAX_DIGITS + MAX_DIGITS / 2);
    for (i, c) in digits.chars().take(MAX_DIGITS).enumerate() {
        if i > 0 && i % 2 == 0 {
            formatted.push(' ');
        }
        formatted.push(c);
    }
    Some(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_pairs() {
        assert_eq!(format_phone_number("0612345678").as_deref(), Some("06 12 34 56 78"));
        assert_eq!(format_phone_number("061").as_deref(), Some("06 1"));
    }

    #[test]
    fn test_strips_non_digits_and_country_code() {
        assert_eq!(
            format_phone_number("+33 6 12 34 56 78").as_deref(),
            Some("06 12 34 56 78")
        );
        assert_eq!(format_phone_number("06.12.34").as_deref(), Some("06 12 34"));
    }

    #[test]
    fn test_truncates_to_ten_digits() {
        assert_eq!(
            format_phone_number("061234567899").as_deref(),
            Some("06 12 34 56 78")
        );
    }

    #[test]
    fn test_no_digits_leaves_value() {
        assert_eq!(format_phone_number(""), None);
        assert_eq!(format_phone_number("abc"), None);
    }
}
