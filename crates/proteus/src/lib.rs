//! # Proteus
//!
//! **Request-Value Binding Layer for the Themis Platform**
//!
//! Proteus turns loosely-typed request values (header, query, path and
//! cookie strings, decoded body fragments) into strongly-typed fields,
//! then normalizes them through declarative formatter chains:
//!
//! - **Closed coercion model** – every destination shape is a variant of
//!   a tagged slot, so unsupported combinations fail at compile time
//! - **Checked conversions** – integer range violations and unrepresentable
//!   floats are errors, never silent wraparound
//! - **Formatter chains** – `trim_space,lower,truncate=64` style rules for
//!   strings, numbers, instants and vectors
//! - **Layout inference** – time literals are parsed against a cached set
//!   of common layouts, no format string required
//!
//! ## Quick Start
//!
//! ```rust
//! use proteus::prelude::*;
//!
//! // Coerce a raw query value into a typed field.
//! let mut page_size: u16 = 0;
//! set_string(&mut page_size, "25").unwrap();
//! assert_eq!(page_size, 25);
//!
//! // Normalize a user-supplied string through a formatter chain.
//! let formatter = StringFormatter::new();
//! let mut tag = "  RustLang  ".to_string();
//! formatter.format("trim_space,kebab", &mut tag).unwrap();
//! assert_eq!(tag, "rust-lang");
//! ```
//!
//! ## Architecture
//!
//! A bound field passes through a fixed two-stage pipeline:
//!
//! ```text
//! raw value → coercion (proteus-core) → formatter chain (proteus-format) → field
//! ```
//!
//! Coercion failures and formatter failures share one error type,
//! [`BindError`](proteus_core::BindError), so callers report both stages
//! uniformly.

#![doc(html_root_url = "https://docs.rs/proteus/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export the coercion engine
pub use proteus_core as core;

// Re-export the formatter chain engine
pub use proteus_format as format;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use proteus::prelude::*;
/// ```
pub mod prelude {
    pub use proteus_core::{
        element_slot, parse_time, set, set_float, set_int, set_slice_string, set_string,
        BindError, BindResult, Bindable, SeqBind, SliceJoinOptions, Slot, Value,
    };

    // Re-export the formatter families and the rule grammar
    pub use proteus_format::{
        parse_rules, NumericFormatter, Rule, RuleChain, SliceFormatter, SliceSlot,
        StringFormatter, TimeFormatter,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use chrono::{DateTime, FixedOffset};

    // Coerce-then-format, the pipeline a binding layer runs per field.
    #[test]
    fn test_coerce_then_format_string_field() {
        let mut username = String::new();
        set_string(&mut username, "  Ada LOVELACE  ").unwrap();

        let formatter = StringFormatter::new();
        formatter
            .format("trim_space,lower,truncate=6", &mut username)
            .unwrap();
        assert_eq!(username, "ada lo");
    }

    #[test]
    fn test_coerce_then_clamp_numeric_field() {
        let mut limit: u32 = 0;
        set_string(&mut limit, "500").unwrap();

        let formatter = NumericFormatter::new();
        formatter.format("max=100", &mut limit).unwrap();
        assert_eq!(limit, 100);
    }

    #[test]
    fn test_coerce_then_normalize_time_field() {
        let mut since: DateTime<FixedOffset> = DateTime::UNIX_EPOCH.fixed_offset();
        set_string(&mut since, "2024-08-28T10:30:45-07:00").unwrap();

        let formatter = TimeFormatter::new();
        formatter.format("timezone=UTC,truncate=hour", &mut since).unwrap();
        assert_eq!(since.to_rfc3339(), "2024-08-28T17:00:00+00:00");
    }

    #[test]
    fn test_repeated_values_into_slice_field() {
        let mut tags: Vec<String> = Vec::new();
        let values = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        set_slice_string(&mut tags, values, &SliceJoinOptions::default()).unwrap();

        let formatter = SliceFormatter::new();
        formatter.format("unique,sort", &mut tags).unwrap();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_errors_share_one_type_across_stages() {
        let mut n: i8 = 0;
        let coerce_err = set_string(&mut n, "1000").unwrap_err();
        assert_eq!(coerce_err.error_code(), "VALUE_OUT_OF_RANGE");

        let formatter = StringFormatter::new();
        let mut s = "x".to_string();
        let format_err = formatter.format("nonexistent", &mut s).unwrap_err();
        assert_eq!(format_err.error_code(), "FORMATTER_NOT_FOUND");
    }
}
