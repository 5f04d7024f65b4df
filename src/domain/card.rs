//! Card number validation.

/// Validates a card number with the mod-10 (Luhn) checksum.
///
/// Spaces are accepted as group separators and ignored. Any other non-digit
/// character, an empty string, or a string made only of spaces is rejected.
pub fn validate(card_number: &str) -> bool {
    let mut sum = 0u32;
    let mut digits = 0usize;

    for c in card_number.chars().rev() {
        if c == ' ' {
            continue;
        }
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if digits % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        digits += 1;
    }

    digits > 0 && sum % 10 == 0
}

/// Returns true when the string is non-empty and made only of digits and spaces.
///
/// This is the format check alone, without the checksum.
pub fn is_well_formed(card_number: &str) -> bool {
    card_number.chars().any(|c| c.is_ascii_digit())
        && card_number.chars().all(|c| c.is_ascii_digit() || c == ' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_card() {
        assert!(validate("4111 1111 1111 1111"));
        assert!(validate("4111111111111111"));
        assert!(validate("5500 0000 0000 0004"));
    }

    #[test]
    fn test_altered_digit_fails_checksum() {
        assert!(!validate("4111 1111 1111 1121"));
    }

    #[test]
    fn test_non_numeric_characters() {
        assert!(!validate("4111 1111 A111 1111"));
        assert!(!validate("4111-1111-1111-1111"));
        assert!(!validate("４111 1111 1111 1111"));
    }

    #[test]
    fn test_empty_and_blank() {
        assert!(!validate(""));
        assert!(!validate("    "));
    }

    #[test]
    fn test_well_formed_ignores_checksum() {
        assert!(is_well_formed("1234567890"));
        assert!(!validate("1234567890"));
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("12a4"));
    }
}
