//! Source value model.
//!
//! [`Value`] is the tagged union over every loosely-typed shape the
//! request-extraction layer can hand to the coercion engine: strings from
//! headers/query/path/cookies, decoded body fragments, and already-typed
//! values. Integer and float inputs of any width collapse into the widest
//! carrier via the `From` impls.

use chrono::{DateTime, FixedOffset};

/// A loosely-typed source value awaiting coercion.
///
/// Values are ephemeral: created by the extraction layer and consumed by a
/// single [`set`](crate::set) call.
///
/// # Example
///
/// ```
/// use proteus_core::{set, Value};
///
/// let mut count: u32 = 0;
/// set(&mut count, Value::from(7_i64)).unwrap();
/// assert_eq!(count, 7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value; coerces to the destination's zero value.
    Null,
    /// A raw string.
    Str(String),
    /// A signed integer of any original width.
    Int(i64),
    /// An unsigned integer too large for `i64`.
    Uint(u64),
    /// A float of any original width.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// A slice of raw strings (repeated query/header values).
    StrList(Vec<String>),
    /// A slice of arbitrary values.
    List(Vec<Value>),
    /// An already-parsed instant.
    Time(DateTime<FixedOffset>),
}

impl Value {
    /// Returns a short name for this value's kind, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Uint(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::StrList(_) => "string slice",
            Self::List(_) => "slice",
            Self::Time(_) => "time",
        }
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::StrList(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Self::Time(t)
    }
}

macro_rules! value_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Self::Int(i64::from(n))
                }
            }
        )*
    };
}

value_from_signed!(i8, i16, i32, i64);

macro_rules! value_from_small_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Self::Int(i64::from(n))
                }
            }
        )*
    };
}

value_from_small_unsigned!(u8, u16, u32);

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        // Stay in the signed carrier when possible so equality between
        // logically equal sources holds.
        i64::try_from(n).map_or(Self::Uint(n), Self::Int)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths_collapse_into_carriers() {
        assert_eq!(Value::from(5_i8), Value::Int(5));
        assert_eq!(Value::from(5_u16), Value::Int(5));
        assert_eq!(Value::from(5_u64), Value::Int(5));
        assert_eq!(Value::from(u64::MAX), Value::Uint(u64::MAX));
        assert_eq!(Value::from(1.5_f32), Value::Float(1.5));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::from("x").kind(), "string");
        assert_eq!(Value::from(vec!["a".to_string()]).kind(), "string slice");
    }

    #[test]
    fn test_default_is_null() {
        assert!(Value::default().is_null());
    }
}
