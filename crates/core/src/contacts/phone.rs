/// Normalize a phone number to bare digits: the leading `+`, spaces, and
/// any other separators are dropped. Idempotent.
pub fn normalize_phone(raw: &str) -> String {
    raw.trim().chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_plus_and_separators() {
        assert_eq!(normalize_phone("+59170012345"), "59170012345");
        assert_eq!(normalize_phone("+54 911 5555 0000"), "549115550000");
        assert_eq!(normalize_phone("  70012346 "), "70012346");
        assert_eq!(normalize_phone("(591) 700-12347"), "59170012347");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["+59165258002", "+54 911 5555 0000", "abc", "", "70 01 23 46"] {
            let once = normalize_phone(raw);
            assert_eq!(normalize_phone(&once), once);
        }
    }

    #[test]
    fn non_numeric_input_normalizes_to_empty() {
        assert_eq!(normalize_phone("sin teléfono"), "");
    }
}
