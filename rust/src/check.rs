//! Check-character computation and validation.
//!
//! The check character is a transcription checksum, not a MAC: the sum of all
//! code points modulo 36, written as one uppercase base-36 digit.

use crate::config::Delimiter;

/// Compute the check character for `s`.
pub fn compute_check_char(s: &str) -> char {
    let sum: u64 = s.chars().map(|c| u64::from(u32::from(c))).sum();
    let digit = (sum % 36) as u32;
    // digit < 36 so from_digit cannot fail
    char::from_digit(digit, 36)
        .unwrap_or('0')
        .to_ascii_uppercase()
}

/// Check that the trailing character of `id` matches the rest of it.
///
/// The delimiter is detected by probing for `-`, `_`, `|`, `.` and `#` in that
/// order, anywhere in `id`. An id whose payload contains a delimiter other
/// than the one it was generated with is split on the wrong character and
/// fails validation. Malformed input yields `false`.
pub fn validate_check_char(id: &str) -> bool {
    let Some((body, claimed)) = split_check_char(id) else {
        return false;
    };

    let mut chars = claimed.chars();
    let (Some(claimed), None) = (chars.next(), chars.next()) else {
        return false;
    };

    compute_check_char(body) == claimed
}

fn detect_delimiter(id: &str) -> Option<Delimiter> {
    Delimiter::DETECTION_ORDER
        .into_iter()
        .find(|d| id.contains(d.as_char()))
}

// Splits into (id without check character, claimed check character).
fn split_check_char(id: &str) -> Option<(&str, &str)> {
    let (body, claimed) = match detect_delimiter(id) {
        Some(delim) => id.rsplit_once(delim.as_char())?,
        None => {
            let (idx, _) = id.char_indices().next_back()?;
            id.split_at(idx)
        }
    };
    if body.is_empty() {
        return None;
    }
    Some((body, claimed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_maps_to_zero() {
        assert_eq!(compute_check_char(""), '0');
    }

    #[test]
    fn known_values() {
        // 'A' = 65, 65 % 36 = 29 -> 'T'
        assert_eq!(compute_check_char("A"), 'T');
        // 'I' + 'D' = 73 + 68 = 141, 141 % 36 = 33 -> 'X'
        assert_eq!(compute_check_char("ID"), 'X');
        // '0' = 48, 48 % 36 = 12 -> 'C'
        assert_eq!(compute_check_char("0"), 'C');
    }

    #[test]
    fn deterministic() {
        let s = "ID-20260207-K3J9QZ0AB12C";
        assert_eq!(compute_check_char(s), compute_check_char(s));
    }

    #[test]
    fn non_ascii_input_is_total() {
        let c = compute_check_char("ñ-東京-🙂");
        assert!(c.is_ascii_digit() || c.is_ascii_uppercase());
    }

    #[test]
    fn validates_delimited_ids() {
        for delim in ["-", "_", "|", ".", "#"] {
            let body = format!("ID{delim}20260207{delim}ABCDEFGH1234");
            let id = format!("{body}{delim}{}", compute_check_char(&body));
            assert!(validate_check_char(&id), "{id}");
        }
    }

    #[test]
    fn validates_undelimited_ids() {
        let body = "ID20260207ABCDEFGH1234";
        let id = format!("{body}{}", compute_check_char(body));
        assert!(validate_check_char(&id));
    }

    #[test]
    fn rejects_corrupted_check_char() {
        let body = "ID-20260207-ABCDEFGH1234";
        let good = compute_check_char(body);
        let bad = if good == 'A' { 'B' } else { 'A' };
        assert!(!validate_check_char(&format!("{body}-{bad}")));
        assert!(!validate_check_char(&format!("{body}-!")));
    }

    #[test]
    fn rejects_corrupted_body() {
        let body = "ID-20260207-ABCDEFGH1234";
        let id = format!("{body}-{}", compute_check_char(body));
        let tampered = id.replacen("ABC", "ABD", 1);
        assert!(!validate_check_char(&tampered));
    }

    #[test]
    fn malformed_input_is_false() {
        for id in ["", "X", "-", "-0", "--", "ID-", "ID-12"] {
            assert!(!validate_check_char(id), "{id:?}");
        }
    }

    #[test]
    fn detection_order_prefers_dash() {
        // Generated with '_' but the prefix contains '-': split on '-' instead.
        let body = "my-app_ABCDEFGH";
        let id = format!("{body}_{}", compute_check_char(body));
        assert_eq!(detect_delimiter(&id), Some(Delimiter::Dash));
        assert!(!validate_check_char(&id));
    }
}
