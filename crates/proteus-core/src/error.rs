//! Error types for the Proteus binding engines.
//!
//! This module provides [`BindError`], the single error type shared by the
//! coercion engine, the time format resolver, and the formatter chain
//! engine. Errors are always returned as values; nothing in the engines
//! panics or retries.

use thiserror::Error;

/// Result type alias using [`BindError`].
pub type BindResult<T> = Result<T, BindError>;

/// Error produced while coercing or formatting a field value.
///
/// The set of variants is closed: every failure either engine can produce
/// falls into exactly one of these categories. Callers decide whether a
/// per-field failure aborts the whole binding operation or is collected
/// and reported field by field.
///
/// # Example
///
/// ```
/// use proteus_core::{set_int, BindError};
///
/// let mut dest: i8 = 0;
/// let err = set_int(&mut dest, 400).unwrap_err();
/// assert!(matches!(err, BindError::Range { .. }));
/// assert!(err.to_string().contains("400"));
/// assert!(err.to_string().contains("i8"));
/// ```
#[derive(Error, Debug)]
pub enum BindError {
    /// No value was found for the requested field.
    #[error("no data found for field")]
    NoData,

    /// A nil/absent value was supplied where a concrete value was required.
    #[error("nil value provided where a value was required")]
    NilValue,

    /// The destination cannot be written to.
    ///
    /// Under Rust ownership most of the original not-a-pointer and
    /// not-addressable cases are unrepresentable; the variant remains for
    /// the request-extraction boundary.
    #[error("destination is not settable")]
    NotSettable,

    /// The destination/source combination has no defined conversion, or an
    /// operation is not defined for the destination kind.
    #[error("{what} is not supported for {destination} destination")]
    NotSupported {
        /// Source type or operation name.
        what: String,
        /// Destination type name.
        destination: String,
    },

    /// An indexed access fell outside the collection bounds.
    #[error("field index {index} out of bounds (len {len})")]
    FieldIndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The collection length.
        len: usize,
    },

    /// A numeric value falls outside the destination's representable range.
    #[error("value {value} out of range for {destination} (valid range {min}..={max})")]
    Range {
        /// The attempted value, rendered as text.
        value: String,
        /// Destination type name.
        destination: &'static str,
        /// Lower bound of the destination type.
        min: i128,
        /// Upper bound of the destination type.
        max: i128,
    },

    /// NaN or an infinity was converted toward an integer destination.
    ///
    /// Deliberately distinct from [`BindError::Range`] so the message names
    /// the special value rather than a generic overflow.
    #[error("cannot convert {literal} to {destination}")]
    SpecialFloat {
        /// `"NaN"`, `"+Inf"` or `"-Inf"`.
        literal: &'static str,
        /// Destination type name.
        destination: &'static str,
    },

    /// A literal could not be interpreted at all.
    #[error("cannot parse {literal:?} as {destination}: {reason}")]
    Parse {
        /// The offending literal.
        literal: String,
        /// Destination type name.
        destination: &'static str,
        /// Parser diagnostic.
        reason: String,
    },

    /// A slice-wide operation failed on one element.
    #[error("slice element {index}: {source}")]
    SliceIteration {
        /// Index of the offending element.
        index: usize,
        /// The per-element failure.
        #[source]
        source: Box<BindError>,
    },

    /// A rule-chain token named an operation absent from the registry.
    #[error("formatter {name:?} not found for {family} tag")]
    FormatterNotFound {
        /// The formatter family (`string`, `numeric`, `time`, `slice`).
        family: &'static str,
        /// The unresolved operation name.
        name: String,
    },
}

impl BindError {
    /// Creates a [`BindError::NotSupported`] error.
    #[must_use]
    pub fn not_supported(what: impl Into<String>, destination: impl Into<String>) -> Self {
        Self::NotSupported {
            what: what.into(),
            destination: destination.into(),
        }
    }

    /// Creates a [`BindError::Parse`] error.
    #[must_use]
    pub fn parse(
        literal: impl Into<String>,
        destination: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Parse {
            literal: literal.into(),
            destination,
            reason: reason.into(),
        }
    }

    /// Wraps a per-element failure with the offending index.
    #[must_use]
    pub fn slice_iteration(index: usize, source: BindError) -> Self {
        Self::SliceIteration {
            index,
            source: Box::new(source),
        }
    }

    /// Creates a [`BindError::FormatterNotFound`] error.
    #[must_use]
    pub fn formatter_not_found(family: &'static str, name: impl Into<String>) -> Self {
        Self::FormatterNotFound {
            family,
            name: name.into(),
        }
    }

    /// Returns the stable error code for this error, suitable for error
    /// envelopes built by the surrounding request layer.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoData => "NO_DATA",
            Self::NilValue => "NIL_VALUE",
            Self::NotSettable => "NOT_SETTABLE",
            Self::NotSupported { .. } => "NOT_SUPPORTED",
            Self::FieldIndexOutOfBounds { .. } => "FIELD_INDEX_OUT_OF_BOUNDS",
            Self::Range { .. } => "VALUE_OUT_OF_RANGE",
            Self::SpecialFloat { .. } => "SPECIAL_FLOAT",
            Self::Parse { .. } => "PARSE_FAILED",
            Self::SliceIteration { .. } => "SLICE_ITERATION_FAILED",
            Self::FormatterNotFound { .. } => "FORMATTER_NOT_FOUND",
        }
    }
}
