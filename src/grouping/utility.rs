use std::cmp::Ordering;

/// Returns `true` if `s` is one or more ASCII decimal digits and nothing else.
pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Returns `true` if a digit string denotes zero (e.g. `"0"`, `"000"`).
pub fn is_zero(digits: &str) -> bool {
    digits.bytes().all(|b| b == b'0')
}

/// Compares two digit strings by numeric value without parsing them.
///
/// Leading zeros are ignored, so `"007"` and `"7"` compare equal. Works for
/// values of any length.
pub fn cmp_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
