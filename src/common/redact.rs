//! PII redaction for log fields
//!
//! Emails keep the first two characters of the local part plus the domain.
//! Phone-like values (7 or more digits, optional leading `+`) keep the first
//! three and last two characters. Anything else is returned unchanged.

const MASK: &str = "***";
const MIN_PHONE_DIGITS: usize = 7;

/// Redact an email address or phone number
pub fn redact(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    if let Some((local, domain)) = value.split_once('@') {
        let kept: String = local.chars().take(2).collect();
        return format!("{}{}@{}", kept, MASK, domain);
    }

    if is_phone_like(value) {
        // Phone-like values are ASCII, so byte slicing is safe.
        return format!("{}{}{}", &value[..3], MASK, &value[value.len() - 2..]);
    }

    value.to_string()
}

/// Redact an optional field
pub fn redact_opt(value: Option<&str>) -> Option<String> {
    value.map(redact)
}

fn is_phone_like(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    digits.len() >= MIN_PHONE_DIGITS && digits.bytes().all(|b| b.is_ascii_digit())
}
