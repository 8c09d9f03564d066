//! E.164 validation and the US-centric reformatting heuristic used by capability lookups.

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;

static E164: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\+[1-9][0-9]{1,14}$").unwrap_or_else(|e| unreachable!("E.164 pattern: {e}"))
});

/// Returns `true` if `phone_number` is `+` followed by 2-15 digits, the first in `1-9`.
pub fn is_valid_e164(phone_number: &str) -> bool {
	E164.is_match(phone_number)
}

/// Best-effort conversion to E.164.
///
/// Separators are dropped first. Numbers that are then E.164 are returned unchanged; 10-digit
/// numbers get `+1`; 11-digit numbers starting with `1` get `+`. Anything else returns `None`
/// and callers fall back to the original string.
pub fn format_phone_number(phone_number: &str) -> Option<String> {
	let cleaned =
		phone_number.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect::<String>();

	if is_valid_e164(&cleaned) {
		return Some(cleaned);
	}

	let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);

	match digits.len() {
		10 => Some(format!("+1{digits}")),
		11 if digits.starts_with('1') => Some(format!("+{digits}")),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn e164_requires_plus_and_leading_non_zero() {
		assert!(is_valid_e164("+12345678901"));
		assert!(is_valid_e164("+44"));
		assert!(is_valid_e164("+123456789012345"));
		assert!(!is_valid_e164("+1234567890123456"));
		assert!(!is_valid_e164("+4"));
		assert!(!is_valid_e164("+0123456789"));
		assert!(!is_valid_e164("12345678901"));
		assert!(!is_valid_e164("invalid-number"));
		assert!(!is_valid_e164("+1 234 567 8901"));
	}

	#[test]
	fn formatting_applies_us_heuristic() {
		assert_eq!(format_phone_number("+12345678901").as_deref(), Some("+12345678901"));
		assert_eq!(format_phone_number("(234) 567-8901").as_deref(), Some("+12345678901"));
		assert_eq!(format_phone_number("1-234-567-8901").as_deref(), Some("+12345678901"));
		assert_eq!(format_phone_number("+44 20 7946 0958").as_deref(), Some("+442079460958"));
	}

	#[test]
	fn formatting_gives_up_on_ambiguous_numbers() {
		assert_eq!(format_phone_number("0044 20 7946 0958"), None);
		assert_eq!(format_phone_number("invalid-number"), None);
		assert_eq!(format_phone_number(""), None);
	}
}
