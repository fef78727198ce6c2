//! Literal parsing and rendering helpers shared by the setters.

use crate::error::{BindError, BindResult};
use crate::range::IntType;

/// Parses a boolean literal.
///
/// Accepts `1/t/T/y/Y` as true and `0/f/F/n/N` as false, plus the words
/// `on/off/yes/no/true/false` in any case.
pub fn parse_bool(s: &str) -> BindResult<bool> {
    match s {
        "1" | "t" | "T" | "y" | "Y" => return Ok(true),
        "0" | "f" | "F" | "n" | "N" => return Ok(false),
        _ => {}
    }
    match s.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        _ => Err(BindError::parse(s, "bool", "not a boolean literal")),
    }
}

/// Parses an integer literal with automatic base detection.
///
/// `0x`/`0X` prefixes select base 16; a leading `0` followed by further
/// digits selects base 8; everything else parses in base 10.
pub fn parse_int_auto(s: &str, destination: &'static str) -> BindResult<i128> {
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (digits, radix) = detect_radix(body);
    if digits.is_empty() {
        return Err(BindError::parse(s, destination, "empty integer literal"));
    }
    let magnitude = i128::from_str_radix(digits, radix)
        .map_err(|e| BindError::parse(s, destination, e.to_string()))?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn detect_radix(s: &str) -> (&str, u32) {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    }
}

/// Parses an integer literal and range-checks it against `ty`.
pub fn parse_checked_int(s: &str, ty: IntType) -> BindResult<i128> {
    let value = parse_int_auto(s, ty.name())?;
    ty.check(value)?;
    Ok(value)
}

/// Renders a float the way the engine's string destinations expect.
///
/// Special values render as the literals `NaN`, `+Inf` and `-Inf`.
/// Ordinary values use fixed-point notation inside roughly `[1e-4, 1e7)`
/// and scientific notation outside it.
#[must_use]
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let magnitude = f.abs();
    if magnitude == 0.0 || (magnitude >= 1e-4 && magnitude < 1e7) {
        format!("{f}")
    } else {
        format!("{f:e}")
    }
}

/// Returns the literal name of a special float, if `f` is one.
#[must_use]
pub fn special_float_literal(f: f64) -> Option<&'static str> {
    if f.is_nan() {
        Some("NaN")
    } else if f.is_infinite() {
        Some(if f > 0.0 { "+Inf" } else { "-Inf" })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_short_forms() {
        for s in ["1", "t", "T", "y", "Y"] {
            assert!(parse_bool(s).unwrap(), "{s}");
        }
        for s in ["0", "f", "F", "n", "N"] {
            assert!(!parse_bool(s).unwrap(), "{s}");
        }
    }

    #[test]
    fn test_parse_bool_words_case_insensitive() {
        for s in ["on", "ON", "yes", "Yes", "true", "TRUE"] {
            assert!(parse_bool(s).unwrap(), "{s}");
        }
        for s in ["off", "OFF", "no", "No", "false", "FALSE"] {
            assert!(!parse_bool(s).unwrap(), "{s}");
        }
    }

    #[test]
    fn test_parse_bool_rejects_garbage() {
        assert!(parse_bool("maybe").is_err());
        assert!(parse_bool("").is_err());
        assert!(parse_bool("2").is_err());
    }

    #[test]
    fn test_base_detection() {
        assert_eq!(parse_int_auto("42", "i64").unwrap(), 42);
        assert_eq!(parse_int_auto("0x1F", "i64").unwrap(), 31);
        assert_eq!(parse_int_auto("0X1f", "i64").unwrap(), 31);
        assert_eq!(parse_int_auto("010", "i64").unwrap(), 8);
        assert_eq!(parse_int_auto("0", "i64").unwrap(), 0);
        assert_eq!(parse_int_auto("-42", "i64").unwrap(), -42);
        assert_eq!(parse_int_auto("+42", "i64").unwrap(), 42);
        assert_eq!(parse_int_auto("-0x10", "i64").unwrap(), -16);
    }

    #[test]
    fn test_malformed_integers() {
        assert!(parse_int_auto("", "i64").is_err());
        assert!(parse_int_auto("abc", "i64").is_err());
        // A leading zero selects octal, so 8 and 9 are invalid digits.
        assert!(parse_int_auto("08", "i64").is_err());
        assert!(parse_int_auto("0x", "i64").is_err());
        assert!(parse_int_auto("1.5", "i64").is_err());
    }

    #[test]
    fn test_parse_checked_int_ranges() {
        assert_eq!(parse_checked_int("127", IntType::I8).unwrap(), 127);
        assert!(parse_checked_int("128", IntType::I8).is_err());
        assert!(parse_checked_int("-1", IntType::U8).is_err());
    }

    #[test]
    fn test_format_float_fixed_and_scientific() {
        assert_eq!(format_float(0.0), "0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(1234.25), "1234.25");
        assert_eq!(format_float(1e-4), "0.0001");
        assert!(format_float(1e-5).contains('e'));
        assert!(format_float(1e7).contains('e'));
        assert_eq!(format_float(9_999_999.0), "9999999");
    }

    #[test]
    fn test_format_float_specials() {
        assert_eq!(format_float(f64::NAN), "NaN");
        assert_eq!(format_float(f64::INFINITY), "+Inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_special_float_literal() {
        assert_eq!(special_float_literal(f64::NAN), Some("NaN"));
        assert_eq!(special_float_literal(f64::INFINITY), Some("+Inf"));
        assert_eq!(special_float_literal(f64::NEG_INFINITY), Some("-Inf"));
        assert_eq!(special_float_literal(1.0), None);
    }
}
