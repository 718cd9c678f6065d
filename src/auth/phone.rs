/// Normalizes a Russian phone number into the canonical display form
/// `+7 (XXX) XXX-XX-XX` used as the unique lookup key.
///
/// Strips every non-digit, maps a leading `8` to the `+7` country prefix
/// and a bare `7` to `+7`. Anything that does not end up as `+7` plus ten
/// digits is returned verbatim: callers must tolerate non-canonical phone
/// strings stored as-is.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let with_prefix = if let Some(rest) = digits.strip_prefix('8') {
        format!("+7{rest}")
    } else if digits.starts_with('7') {
        format!("+{digits}")
    } else {
        digits
    };

    if with_prefix.len() == 12 {
        format!(
            "+7 ({}) {}-{}-{}",
            &with_prefix[2..5],
            &with_prefix[5..8],
            &with_prefix[8..10],
            &with_prefix[10..12]
        )
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_plain_eleven_digit_number() {
        assert_eq!(normalize_phone("79991234567"), "+7 (999) 123-45-67");
    }

    #[test]
    fn maps_leading_eight_to_country_prefix() {
        assert_eq!(normalize_phone("89991234567"), "+7 (999) 123-45-67");
    }

    #[test]
    fn strips_separators() {
        assert_eq!(normalize_phone("+7 999 123 45 67"), "+7 (999) 123-45-67");
        assert_eq!(normalize_phone("8-999-123-45-67"), "+7 (999) 123-45-67");
    }

    #[test]
    fn unexpected_length_passes_through_unchanged() {
        assert_eq!(normalize_phone("12345"), "12345");
        assert_eq!(normalize_phone("not a phone"), "not a phone");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_phone("89991234567");
        assert_eq!(normalize_phone(&once), once);

        let odd = normalize_phone("12345");
        assert_eq!(normalize_phone(&odd), odd);
    }
}
