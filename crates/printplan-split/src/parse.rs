//! Raw quantity text as typed into the form ("12,500") ↔ integers.

/// Parse a quantity field. Thousands separators are stripped first; empty,
/// negative, fractional or otherwise malformed text yields 0.
pub fn parse_quantity(raw: &str, separators: &str) -> u64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !separators.contains(*c))
        .collect();
    cleaned.parse::<u64>().unwrap_or(0)
}

/// Group digits in threes for display.
pub fn format_quantity(value: u64, separator: Option<char>) -> String {
    let digits = value.to_string();
    let Some(sep) = separator else {
        return digits;
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_separators() {
        assert_eq!(parse_quantity("12,500", ","), 12_500);
        assert_eq!(parse_quantity(" 1,000,000 ", ","), 1_000_000);
        assert_eq!(parse_quantity("1.250", ".,"), 1_250);
        assert_eq!(parse_quantity("150", ""), 150);
    }

    #[test]
    fn test_parse_invalid_is_zero() {
        assert_eq!(parse_quantity("", ","), 0);
        assert_eq!(parse_quantity("-40", ","), 0);
        assert_eq!(parse_quantity("12.5", ","), 0);
        assert_eq!(parse_quantity("lots", ","), 0);
    }

    #[test]
    fn test_format_groups_digits() {
        assert_eq!(format_quantity(0, Some(',')), "0");
        assert_eq!(format_quantity(999, Some(',')), "999");
        assert_eq!(format_quantity(1_000, Some(',')), "1,000");
        assert_eq!(format_quantity(12_345_678, Some(',')), "12,345,678");
        assert_eq!(format_quantity(12_345, None), "12345");
    }

    #[test]
    fn test_formatted_text_parses_back() {
        let text = format_quantity(2_500_000, Some(','));
        assert_eq!(parse_quantity(&text, ","), 2_500_000);
    }
}
