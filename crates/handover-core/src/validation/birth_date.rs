use chrono::NaiveDate;

const BIRTH_DATE_FORMAT: &str = "%d.%m.%Y";

/// Insert dots into a birth date while it is being typed (`DD.MM.YYYY`).
///
/// Non-digits are dropped and at most eight digits are kept.
pub fn format_birth_date(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(8)
        .collect();

    match digits.len() {
        0..=2 => digits,
        3..=4 => format!("{}.{}", &digits[..2], &digits[2..]),
        _ => format!("{}.{}.{}", &digits[..2], &digits[2..4], &digits[4..]),
    }
}

/// Parse a `DD.MM.YYYY` birth date that is not later than `today`.
pub fn parse_birth_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(input.trim(), BIRTH_DATE_FORMAT).ok()?;
    (date <= today).then_some(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_birth_date_progressive() {
        assert_eq!(format_birth_date(""), "");
        assert_eq!(format_birth_date("1"), "1");
        assert_eq!(format_birth_date("12"), "12");
        assert_eq!(format_birth_date("120"), "12.0");
        assert_eq!(format_birth_date("1203"), "12.03");
        assert_eq!(format_birth_date("12031"), "12.03.1");
        assert_eq!(format_birth_date("12031985"), "12.03.1985");
    }

    #[test]
    fn test_format_birth_date_drops_noise() {
        assert_eq!(format_birth_date("12/03/1985"), "12.03.1985");
        assert_eq!(format_birth_date("12.03.19851234"), "12.03.1985");
    }

    #[test]
    fn test_parse_birth_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(
            parse_birth_date("12.03.1985", today),
            NaiveDate::from_ymd_opt(1985, 3, 12)
        );
        assert_eq!(parse_birth_date("31.02.1985", today), None);
        assert_eq!(parse_birth_date("19.10.2026", today), None);
        assert_eq!(parse_birth_date("1985-03-12", today), None);
    }
}
