use std::str::FromStr;

use jiff::civil::{Date, DateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{Error, Result};

/// Reduce a feed date to `YYYY-MM-DD`.
///
/// Anything already shaped like `YYYY-MM-DD...` is cut to its first 10 characters without
/// further validation. Other text must be an ISO 8601 date or date-time; the date is kept as
/// written, without converting between offsets.
pub fn normalize_date(raw: &str) -> Result<String> {
    let s = raw.trim();
    let chars: Vec<char> = s.chars().collect();
    if chars.len() >= 10 && chars[4] == '-' && chars[7] == '-' {
        return Ok(chars[..10].iter().collect());
    }

    // Civil parsing accepts a numeric offset but rejects the `Z` designator
    let s = s.replace('Z', "+00:00");
    let date = match s.parse::<DateTime>() {
        Ok(dt) => dt.date(),
        Err(_) => s.parse::<Date>().map_err(|source| Error::Date {
            text: raw.to_string(),
            source,
        })?,
    };
    Ok(date.to_string())
}

/// Parse a rate value that may use a comma as decimal separator.
pub fn normalize_value(raw: &str) -> Result<f64> {
    let text = raw.trim().replace(',', ".");
    let invalid = |reason: String| Error::Value {
        text: raw.to_string(),
        reason,
    };

    match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
        Ok(value) => value
            .to_f64()
            .ok_or_else(|| invalid("not representable as f64".to_string())),
        // Magnitudes beyond 28 decimal digits still parse as binary floats
        Err(e) => text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_prefix() {
        assert_eq!(normalize_date("2024-01-15").unwrap(), "2024-01-15");
        assert_eq!(normalize_date("2024-01-15T10:30:00Z").unwrap(), "2024-01-15");
        assert_eq!(
            normalize_date(" 2024-03-01T00:00:00+01:00 ").unwrap(),
            "2024-03-01"
        );
        // The prefix is taken as-is
        assert_eq!(normalize_date("9999-99-99 whatever").unwrap(), "9999-99-99");
    }

    #[test]
    fn test_date_fallback() {
        assert_eq!(
            normalize_date("+002024-03-01T10:15:00Z").unwrap(),
            "2024-03-01"
        );
        assert_eq!(normalize_date("+002024-03-01").unwrap(), "2024-03-01");
    }

    #[test]
    fn test_date_invalid() {
        assert!(matches!(normalize_date("1 March 2024"), Err(Error::Date { .. })));
        assert!(matches!(normalize_date("   "), Err(Error::Date { .. })));
    }

    #[test]
    fn test_value() {
        assert_eq!(normalize_value("1,25").unwrap(), 1.25);
        assert_eq!(normalize_value("1.25").unwrap(), 1.25);
        assert_eq!(normalize_value(" -0,5 ").unwrap(), -0.5);
        assert_eq!(normalize_value("1,50").unwrap(), 1.5);
    }

    #[test]
    fn test_value_out_of_decimal_range() {
        assert_eq!(normalize_value("1e30").unwrap(), 1e30);
        assert_eq!(normalize_value("1,5e-40").unwrap(), 1.5e-40);
        assert!(matches!(normalize_value("1e400"), Err(Error::Value { .. })));
        assert!(matches!(normalize_value("inf"), Err(Error::Value { .. })));
        assert!(matches!(normalize_value("NaN"), Err(Error::Value { .. })));
    }

    #[test]
    fn test_value_invalid() {
        assert!(matches!(normalize_value("abc"), Err(Error::Value { .. })));
        assert!(matches!(normalize_value(""), Err(Error::Value { .. })));
        assert!(matches!(normalize_value("1,2,3"), Err(Error::Value { .. })));
    }
}
