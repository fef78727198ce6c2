//! Numeric range checking.
//!
//! Pure functions validating that an integer value fits the bit width and
//! signedness of a destination type. The valid range for a signed type of
//! width `b` is `[-2^(b-1), 2^(b-1)-1]`; for an unsigned type it is
//! `[0, 2^b-1]`. The check is shared by every numeric setter and by the
//! numeric formatter's clamp argument parsing.

use crate::error::{BindError, BindResult};

/// An integer destination type, identified by width and signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntType {
    /// 8-bit signed.
    I8,
    /// 16-bit signed.
    I16,
    /// 32-bit signed.
    I32,
    /// 64-bit signed.
    I64,
    /// Native-width signed.
    Isize,
    /// 8-bit unsigned.
    U8,
    /// 16-bit unsigned.
    U16,
    /// 32-bit unsigned.
    U32,
    /// 64-bit unsigned.
    U64,
    /// Native-width unsigned.
    Usize,
}

impl IntType {
    /// Returns the bit width of this type.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::I8 | Self::U8 => 8,
            Self::I16 | Self::U16 => 16,
            Self::I32 | Self::U32 => 32,
            Self::I64 | Self::U64 => 64,
            Self::Isize => isize::BITS,
            Self::Usize => usize::BITS,
        }
    }

    /// Returns true for signed types.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::Isize
        )
    }

    /// Returns the Rust name of this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
        }
    }

    /// Returns the smallest representable value.
    #[must_use]
    pub const fn min(self) -> i128 {
        if self.is_signed() {
            -(1i128 << (self.bits() - 1))
        } else {
            0
        }
    }

    /// Returns the largest representable value.
    #[must_use]
    pub const fn max(self) -> i128 {
        if self.is_signed() {
            (1i128 << (self.bits() - 1)) - 1
        } else {
            (1i128 << self.bits()) - 1
        }
    }

    /// Validates that `value` fits this type.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Range`] naming the attempted value, the
    /// destination type and the valid bounds.
    pub fn check(self, value: i128) -> BindResult<()> {
        if value < self.min() || value > self.max() {
            return Err(self.range_error(value));
        }
        Ok(())
    }

    /// Builds the [`BindError::Range`] error for `value`.
    #[must_use]
    pub fn range_error(self, value: i128) -> BindError {
        BindError::Range {
            value: value.to_string(),
            destination: self.name(),
            min: self.min(),
            max: self.max(),
        }
    }
}
