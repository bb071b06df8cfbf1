use std::sync::LazyLock;

use regex::Regex;

static INDIAN_MOBILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\+91)?[6789]\d{9}$").expect("indian mobile pattern must compile")
});

const UNKNOWN_INDIAN_NUMBER: &str = "+91-XXXXXXXXXX";

/// Normalizes a phone number to `+91-XXXXXXXXXX`.
///
/// All non-digits are dropped and only the last ten digits are kept, so an
/// existing `+91` / `91` prefix is absorbed. Missing input yields the placeholder.
pub fn format_indian_phone(phone: Option<&str>) -> String {
    let Some(phone) = phone.filter(|p| !p.is_empty()) else {
        return UNKNOWN_INDIAN_NUMBER.to_string();
    };

    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    let start = digits.len().saturating_sub(10);
    let last_ten: String = digits[start..].iter().collect();

    format!("+91-{last_ten}")
}

/// `+91` optional, then ten digits starting with 6–9. Spaces and hyphens are ignored.
pub fn is_valid_indian_phone(phone: &str) -> bool {
    let cleaned: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    INDIAN_MOBILE.is_match(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_plain_ten_digits() {
        assert_eq!(format_indian_phone(Some("9876543210")), "+91-9876543210");
    }

    #[test]
    fn test_format_strips_country_code_and_symbols() {
        assert_eq!(format_indian_phone(Some("+91 (98765) 43-210")), "+91-9876543210");
        assert_eq!(format_indian_phone(Some("919876543210")), "+91-9876543210");
    }

    #[test]
    fn test_format_missing_number() {
        assert_eq!(format_indian_phone(None), "+91-XXXXXXXXXX");
        assert_eq!(format_indian_phone(Some("")), "+91-XXXXXXXXXX");
    }

    #[test]
    fn test_format_short_number_kept_as_is() {
        assert_eq!(format_indian_phone(Some("12-34")), "+91-1234");
    }

    #[test]
    fn test_valid_indian_numbers() {
        assert!(is_valid_indian_phone("9876543210"));
        assert!(is_valid_indian_phone("+91-98765-43210"));
        assert!(is_valid_indian_phone("+91 6123456789"));
    }

    #[test]
    fn test_invalid_indian_numbers() {
        assert!(!is_valid_indian_phone("5876543210"));
        assert!(!is_valid_indian_phone("98765"));
        assert!(!is_valid_indian_phone("+44 7911123456"));
    }
}
