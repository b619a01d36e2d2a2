use once_cell::sync::Lazy;
use regex::Regex;

// Mobile numbers: 0 / 84 / +84 prefix, a 3/5/7/8/9 carrier digit, 8 more digits
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\+?84|0)[35789][0-9]{8}$").expect("phone pattern is valid"));

/// Parse a search string as a phone number.
///
/// Spaces are stripped and the number is coerced to an integer, so
/// `"0901 234 567"` becomes `901234567`. Returns `None` for anything that is
/// not a phone number.
pub fn normalize_phone(text: &str) -> Option<i64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if !PHONE_RE.is_match(&compact) {
        return None;
    }
    compact.trim_start_matches('+').parse::<i64>().ok()
}
