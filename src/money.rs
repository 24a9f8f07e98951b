//! Prices are stored as integer minor units (hundredths).

/// Highest price a product may carry: one billion whole units.
pub const MAX_PRICE: i64 = 100_000_000_000;

/// `price × quantity`, or `None` when it does not fit in an `i64`.
pub fn line_total(price: i64, quantity: i32) -> Option<i64> {
    price.checked_mul(i64::from(quantity))
}

/// Render minor units as `1234.50`.
pub fn format_price(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Parse `12`, `12.5` or `12.50` into minor units. Negative or malformed input yields `None`.
pub fn parse_price(input: &str) -> Option<i64> {
    let input = input.trim();
    let (whole, frac) = match input.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input, ""),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = whole.parse().ok()?;
    let cents: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };
    whole.checked_mul(100)?.checked_add(cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(format_price(120000), "1200.00");
        assert_eq!(format_price(5), "0.05");
        assert_eq!(format_price(-150), "-1.50");
    }

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_price("12"), Some(1200));
        assert_eq!(parse_price("12.5"), Some(1250));
        assert_eq!(parse_price(" 12.05 "), Some(1205));
        assert_eq!(parse_price("0.99"), Some(99));
    }

    #[test]
    fn line_total_reports_overflow() {
        assert_eq!(line_total(1250, 3), Some(3750));
        assert_eq!(line_total(i64::MAX / 2 + 1, 2), None);
        assert_eq!(line_total(MAX_PRICE, 1_000), Some(100_000_000_000_000));
        assert_eq!(line_total(MAX_PRICE, i32::MAX), None);
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("-3"), None);
        assert_eq!(parse_price("1.234"), None);
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price(".50"), None);
        assert_eq!(parse_price("99999999999999999999"), None);
    }
}
