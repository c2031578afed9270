//! Text helpers for registry free-text fields

use chrono::NaiveDate;

/// Marker the registry writes into free-text fields that carry no data
pub const ABSENT_MARKER: &str = "ВІДСУТНІЙ";

/// Parse a registry date written as `dd.mm.yyyy`.
///
/// Returns `None` for empty or unparsable input; the registry export is
/// inconsistent enough that a bad date must not fail the record.
pub fn parse_registry_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(text, "%d.%m.%Y").ok()
}

/// First whitespace-delimited word of a string
pub fn first_word(text: &str) -> &str {
    text.trim().split_whitespace().next().unwrap_or("")
}

/// Everything after the first whitespace-delimited word
pub fn cut_first_word(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.find(char::is_whitespace) {
        Some(pos) => trimmed[pos..].trim_start(),
        None => "",
    }
}

/// Truncate to at most `max` characters (not bytes)
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// True when a free-text field is empty or normalized to the absent marker
pub fn is_absent(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.ends_with(ABSENT_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registry_date() {
        assert_eq!(
            parse_registry_date("28.02.2007"),
            NaiveDate::from_ymd_opt(2007, 2, 28)
        );
        assert_eq!(parse_registry_date(""), None);
        assert_eq!(parse_registry_date("not a date"), None);
        assert_eq!(parse_registry_date("31.02.2007"), None);
    }

    #[test]
    fn test_first_and_cut_first_word() {
        let registration = "12.05.1998 № 1 234-р";
        assert_eq!(first_word(registration), "12.05.1998");
        assert_eq!(cut_first_word(registration), "№ 1 234-р");
        assert_eq!(cut_first_word("single"), "");
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        // Cyrillic chars are two bytes each; a byte slice would panic
        let name = "підприємство";
        assert_eq!(truncate_chars(name, 6), "підпри");
        assert_eq!(truncate_chars(name, 500), name);
    }

    #[test]
    fn test_is_absent() {
        assert!(is_absent(""));
        assert!(is_absent("   "));
        assert!(is_absent("ВІДСУТНІЙ"));
        assert!(is_absent("ЗАСНОВНИК ВІДСУТНІЙ"));
        assert!(!is_absent("Іванов Іван"));
    }
}
