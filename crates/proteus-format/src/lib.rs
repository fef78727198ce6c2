//! # Proteus Format
//!
//! Formatter chain engine for the Proteus binding layer.
//!
//! A formatter applies an ordered chain of named operations to a value
//! that has already been coerced to its destination type. Chains are
//! written in a compact rule grammar:
//!
//! ```text
//! rule     := token (',' token)*
//! token    := name ['=' argument]
//! argument := subarg (':' subarg)*
//! ```
//!
//! Four families cover the supported target shapes:
//!
//! | Family | Target | Example chain |
//! |--------|--------|---------------|
//! | [`StringFormatter`] | `&mut String` | `trim_space,lower,truncate=64` |
//! | [`NumericFormatter`] | any integer or float | `min=0,max=100` |
//! | [`TimeFormatter`] | `&mut DateTime<FixedOffset>` | `timezone=UTC,truncate=hour` |
//! | [`SliceFormatter`] | supported vectors | `compact,unique,sort` |
//!
//! Every family resolves operation names against its own registry.
//! Unknown names abort the chain with
//! [`BindError::FormatterNotFound`](proteus_core::BindError::FormatterNotFound),
//! and a failing operation leaves the partially-transformed value in
//! place. Custom operations registered through a family's builder may
//! shadow the built-ins.
//!
//! ## Example
//!
//! ```rust
//! use proteus_format::StringFormatter;
//!
//! let formatter = StringFormatter::new();
//! let mut name = "  AdaLovelace  ".to_string();
//! formatter.format("trim_space,snake", &mut name).unwrap();
//! assert_eq!(name, "ada_lovelace");
//! ```

#![doc(html_root_url = "https://docs.rs/proteus-format/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod numeric;
mod registry;
mod rule;
mod slice;
mod string;
mod time;

pub use numeric::{NumericFormatter, NumericFormatterBuilder, NumericOp, NumericSlot};
pub use registry::Registry;
pub use rule::{parse_rules, Rule, RuleChain};
pub use slice::{SliceFormatter, SliceFormatterBuilder, SliceOp, SliceSlot};
pub use string::{StringFormatter, StringFormatterBuilder, StringOp};
pub use time::{TimeFormatter, TimeFormatterBuilder, TimeOp};
