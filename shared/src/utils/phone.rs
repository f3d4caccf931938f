//! Phone number utilities
//!
//! The orchestrator does not judge phone numbers itself (the provider is the
//! authority); these helpers exist for log masking, for the mock provider's
//! acceptance rule, and for client-side normalization of user input.

use once_cell::sync::Lazy;
use regex::Regex;

// International phone number regex (E.164 format)
static E164_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]\d{6,14}$").expect("E.164 pattern is a valid regex"));

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is in E.164 format after normalization
pub fn is_valid_e164(phone: &str) -> bool {
    E164_REGEX.is_match(&normalize_phone_number(phone))
}

/// Mask a phone number for logging (e.g., +15****4567)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}
