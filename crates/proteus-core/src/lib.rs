//! # Proteus Core
//!
//! Value coercion engine and time format resolver for the Proteus binding
//! layer.
//!
//! The engine converts loosely-typed request values (strings from
//! headers/query/path/cookies, decoded body fragments) into strongly-typed
//! destination fields. Dispatch runs over a closed tagged model: every
//! supported destination shape is a [`Slot`] variant, and every source
//! shape is a [`Value`] variant, so the compiler enforces that each
//! combination is handled.
//!
//! ## Entry points
//!
//! | Function | Source |
//! |----------|--------|
//! | [`set`] | any [`Value`] |
//! | [`set_string`] | a raw string |
//! | [`set_int`] | an integer of any width/signedness |
//! | [`set_float`] | a float of either width |
//! | [`set_slice_string`] | repeated raw string values |
//! | [`parse_time`] | a time literal in any common layout |
//!
//! ## Example
//!
//! ```rust
//! use proteus_core::{set_string, BindError};
//!
//! let mut limit: u32 = 0;
//! set_string(&mut limit, "25").unwrap();
//! assert_eq!(limit, 25);
//!
//! // Range violations name the value, the type and the bounds.
//! let mut small: i8 = 0;
//! let err = set_string(&mut small, "1000").unwrap_err();
//! assert!(matches!(err, BindError::Range { .. }));
//! ```
//!
//! All operations are synchronous and non-blocking. The only shared
//! mutable state is the time-format cache inside [`TimeResolver`], which
//! is safe for concurrent readers and writers.

#![doc(html_root_url = "https://docs.rs/proteus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod coerce;
mod error;
mod parse;
mod range;
mod slot;
mod time;
mod value;

pub use coerce::{
    element_slot, set, set_float, set_int, set_slice_string, set_string, SliceJoinOptions,
};
pub use error::{BindError, BindResult};
pub use parse::{format_float, parse_bool, parse_checked_int, parse_int_auto};
pub use range::IntType;
pub use slot::{Bindable, SeqBind, Slot};
pub use time::{parse_time, resolver, TimeResolver};
pub use value::Value;
