use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::models::{EMAIL_NOT_DETECTED, PHONE_NOT_DETECTED};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email pattern")
});

/// Phone shapes in priority order: international-prefixed grouped digits,
/// XXX-XXX-XXXX, (XXX) XXX-XXXX, generic international.
static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\+\d{1,3}[-.\s]?)?(\(?\d{3}\)?[-.\s]?)?\d{3}[-.\s]?\d{4}",
        r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}",
        r"\(\d{3}\)\s*\d{3}[-.\s]?\d{4}",
        r"\+\d{1,3}\s*\d{3,}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid phone pattern"))
    .collect()
});

pub fn extract_email(text: &str) -> String {
    EMAIL
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| EMAIL_NOT_DETECTED.to_string())
}

/// First pattern with any match wins. The whole match is returned, so an optional
/// country-code or area-code group is kept together with the digits that follow it.
pub fn extract_phone(text: &str) -> String {
    PHONE_PATTERNS
        .iter()
        .find_map(|re| re.find(text))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| PHONE_NOT_DETECTED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_first_match() {
        let text = "Contact: jane.doe+cv@mail.example.org or backup@example.com";
        assert_eq!(extract_email(text), "jane.doe+cv@mail.example.org");
    }

    #[test]
    fn test_email_sentinel() {
        assert_eq!(extract_email("no address here"), EMAIL_NOT_DETECTED);
        assert_eq!(extract_email(""), EMAIL_NOT_DETECTED);
    }

    #[test]
    fn test_phone_plain_dashed() {
        assert_eq!(extract_phone("Call 555-123-4567 today"), "555-123-4567");
    }

    #[test]
    fn test_phone_international_prefix_kept() {
        assert_eq!(extract_phone("Tel: +44 207-946-0958"), "+44 207-946-0958");
    }

    #[test]
    fn test_phone_parenthesized_area_code() {
        assert_eq!(extract_phone("Phone (555) 123-4567"), "(555) 123-4567");
    }

    #[test]
    fn test_phone_generic_international_fallback() {
        assert_eq!(extract_phone("WhatsApp +91 98765"), "+91 98765");
    }

    #[test]
    fn test_phone_sentinel() {
        assert_eq!(extract_phone("Graduated 2015 - 2019"), PHONE_NOT_DETECTED);
    }
}
