//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Chinese mobile number, no country code
pub const CHINA_MOBILE_PATTERN: &str = r"^1[3-9]\d{9}$";

/// International number in E.164 format
pub const E164_PATTERN: &str = r"^\+[1-9]\d{1,14}$";

static CHINA_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(CHINA_MOBILE_PATTERN).expect("china mobile pattern compiles")
});

static E164_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(E164_PATTERN).expect("e164 pattern compiles")
});

/// Ready-made pattern for mainland China mobile numbers
pub fn china_mobile() -> Regex {
    CHINA_MOBILE_REGEX.clone()
}

/// Ready-made pattern for E.164 numbers
pub fn e164() -> Regex {
    E164_REGEX.clone()
}

/// Remove common formatting characters, keeping digits and `+`
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Mask a phone number for logs (e.g., 138****5678)
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
