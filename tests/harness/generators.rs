// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for abuse simulation.

/// Generate distinct plausible email addresses.
pub fn generate_emails(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("visitor{}@mail-{}.example.com", i, i % 7))
        .collect()
}

/// Generate throwaway or abuse-listed email addresses.
pub fn generate_disposable_emails(count: usize) -> Vec<String> {
    const DOMAINS: &[&str] = &[
        "mailinator.com",
        "tempmail.org",
        "throwaway.email",
        "guerrillamail.com",
        "10minutemail.com",
    ];
    (0..count)
        .map(|i| format!("bot{}@{}", i, DOMAINS[i % DOMAINS.len()]))
        .collect()
}

/// Generate plausible contact requests.
pub fn generate_clean_messages(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("Hello, could you send me a quote for project number {i}?"))
        .collect()
}

/// Typical spam bodies.
pub fn generate_spam_messages() -> Vec<&'static str> {
    vec![
        "Earn big at our CASINO tonight",
        "You are the lucky WINNER of our draw",
        "Invest in crypto now",
        "Click here for free money",
        "see http://a.example http://b.example http://c.example",
        "AMAZING OFFER!!!!!!!!",
    ]
}

/// Strings that are not email addresses.
pub fn generate_malformed_emails() -> Vec<&'static str> {
    vec![
        "",
        "   ",
        "plainaddress",
        "@no-local.com",
        "no-domain@",
        "two@@ats.com",
        "spaces in@example.com",
        "no-tld@example",
        "short-tld@example.c",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_emails_unique() {
        let emails = generate_emails(100);
        let unique: std::collections::HashSet<_> = emails.iter().collect();
        assert_eq!(unique.len(), 100);
    }
}
