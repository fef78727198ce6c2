//! Destination field model.
//!
//! The coercion engine never reflects over arbitrary types. Instead every
//! supported destination shape appears as one variant of the closed
//! [`Slot`] enum, and dispatch is an exhaustive match the compiler checks.
//! [`Bindable`] is the seam that turns a concrete field into its slot;
//! its `Option<T>` impl performs pointer auto-initialization (allocate the
//! zero pointee on first write).

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use num_complex::Complex;

use crate::value::Value;

/// A writable reference to a destination field of a known kind.
///
/// A slot is only ever written once per coercion call; setters either
/// fully write the slot or return an error before touching it.
pub enum Slot<'a> {
    /// String destination.
    Str(&'a mut String),
    /// Boolean destination.
    Bool(&'a mut bool),
    /// 8-bit signed integer destination.
    I8(&'a mut i8),
    /// 16-bit signed integer destination.
    I16(&'a mut i16),
    /// 32-bit signed integer destination.
    I32(&'a mut i32),
    /// 64-bit signed integer destination.
    I64(&'a mut i64),
    /// Native-width signed integer destination.
    Isize(&'a mut isize),
    /// 8-bit unsigned integer destination.
    U8(&'a mut u8),
    /// 16-bit unsigned integer destination.
    U16(&'a mut u16),
    /// 32-bit unsigned integer destination.
    U32(&'a mut u32),
    /// 64-bit unsigned integer destination.
    U64(&'a mut u64),
    /// Native-width unsigned integer destination.
    Usize(&'a mut usize),
    /// 32-bit float destination.
    F32(&'a mut f32),
    /// 64-bit float destination.
    F64(&'a mut f64),
    /// Complex destination with 32-bit parts.
    C32(&'a mut Complex<f32>),
    /// Complex destination with 64-bit parts.
    C64(&'a mut Complex<f64>),
    /// Instant destination.
    Time(&'a mut DateTime<FixedOffset>),
    /// Raw byte buffer destination; takes string input verbatim.
    Bytes(&'a mut Vec<u8>),
    /// Slice-of-strings destination.
    StrList(&'a mut Vec<String>),
    /// Slice destination of any other supported element kind.
    Seq(&'a mut dyn SeqBind),
    /// String-keyed map destination.
    StrMap(&'a mut BTreeMap<String, String>),
    /// Open destination; stores the source value verbatim.
    Any(&'a mut Value),
    /// Slice-of-any destination.
    AnyList(&'a mut Vec<Value>),
}

impl Slot<'_> {
    /// Returns a short name for the destination kind, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Bool(_) => "bool",
            Self::I8(_) => "i8",
            Self::I16(_) => "i16",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::Isize(_) => "isize",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::Usize(_) => "usize",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::C32(_) => "complex<f32>",
            Self::C64(_) => "complex<f64>",
            Self::Time(_) => "time",
            Self::Bytes(_) => "bytes",
            Self::StrList(_) => "string list",
            Self::Seq(_) => "sequence",
            Self::StrMap(_) => "string map",
            Self::Any(_) => "any",
            Self::AnyList(_) => "any list",
        }
    }

    /// Writes the zero value for the destination kind.
    pub fn clear(&mut self) {
        match self {
            Self::Str(d) => d.clear(),
            Self::Bool(d) => **d = false,
            Self::I8(d) => **d = 0,
            Self::I16(d) => **d = 0,
            Self::I32(d) => **d = 0,
            Self::I64(d) => **d = 0,
            Self::Isize(d) => **d = 0,
            Self::U8(d) => **d = 0,
            Self::U16(d) => **d = 0,
            Self::U32(d) => **d = 0,
            Self::U64(d) => **d = 0,
            Self::Usize(d) => **d = 0,
            Self::F32(d) => **d = 0.0,
            Self::F64(d) => **d = 0.0,
            Self::C32(d) => **d = Complex::new(0.0, 0.0),
            Self::C64(d) => **d = Complex::new(0.0, 0.0),
            Self::Time(d) => **d = DateTime::UNIX_EPOCH.fixed_offset(),
            Self::Bytes(d) => d.clear(),
            Self::StrList(d) => d.clear(),
            Self::Seq(d) => d.clear(),
            Self::StrMap(d) => d.clear(),
            Self::Any(d) => **d = Value::Null,
            Self::AnyList(d) => d.clear(),
        }
    }
}

/// A destination field the coercion engine can write to.
///
/// Implemented for every supported scalar, for `Vec`s of those scalars,
/// for `BTreeMap<String, String>`, for [`Value`] (the open "any" slot),
/// and for `Option<T>` of any of the above. The `Option` impl is the
/// allocate-on-write pointer helper: obtaining the slot materializes the
/// zero pointee, and `clear` resets the field to `None`.
///
/// # Example
///
/// ```
/// use proteus_core::set_string;
///
/// let mut maybe: Option<u16> = None;
/// set_string(&mut maybe, "8080").unwrap();
/// assert_eq!(maybe, Some(8080));
/// ```
pub trait Bindable {
    /// Returns the zero value for this type.
    fn zero() -> Self
    where
        Self: Sized;

    /// Returns the writable slot for this field.
    fn slot(&mut self) -> Slot<'_>;

    /// Writes the zero value.
    fn clear(&mut self);
}

macro_rules! bindable_scalar {
    ($($ty:ty => $variant:ident, $zero:expr;)*) => {
        $(
            impl Bindable for $ty {
                fn zero() -> Self {
                    $zero
                }

                fn slot(&mut self) -> Slot<'_> {
                    Slot::$variant(self)
                }

                fn clear(&mut self) {
                    *self = $zero;
                }
            }
        )*
    };
}

bindable_scalar! {
    String => Str, String::new();
    bool => Bool, false;
    i8 => I8, 0;
    i16 => I16, 0;
    i32 => I32, 0;
    i64 => I64, 0;
    isize => Isize, 0;
    u8 => U8, 0;
    u16 => U16, 0;
    u32 => U32, 0;
    u64 => U64, 0;
    usize => Usize, 0;
    f32 => F32, 0.0;
    f64 => F64, 0.0;
    Complex<f32> => C32, Complex::new(0.0, 0.0);
    Complex<f64> => C64, Complex::new(0.0, 0.0);
}

impl Bindable for DateTime<FixedOffset> {
    fn zero() -> Self {
        DateTime::UNIX_EPOCH.fixed_offset()
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Time(self)
    }

    fn clear(&mut self) {
        *self = Self::zero();
    }
}

impl Bindable for Value {
    fn zero() -> Self {
        Self::Null
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Any(self)
    }

    fn clear(&mut self) {
        *self = Self::Null;
    }
}

impl Bindable for Vec<u8> {
    fn zero() -> Self {
        Vec::new()
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Bytes(self)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl Bindable for Vec<String> {
    fn zero() -> Self {
        Vec::new()
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::StrList(self)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl Bindable for Vec<Value> {
    fn zero() -> Self {
        Vec::new()
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::AnyList(self)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

macro_rules! bindable_seq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Bindable for Vec<$ty> {
                fn zero() -> Self {
                    Vec::new()
                }

                fn slot(&mut self) -> Slot<'_> {
                    Slot::Seq(self)
                }

                fn clear(&mut self) {
                    Vec::clear(self);
                }
            }
        )*
    };
}

bindable_seq!(
    bool,
    i8,
    i16,
    i32,
    i64,
    isize,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    Complex<f32>,
    Complex<f64>,
    DateTime<FixedOffset>,
);

impl Bindable for BTreeMap<String, String> {
    fn zero() -> Self {
        BTreeMap::new()
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::StrMap(self)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self);
    }
}

impl<T: Bindable> Bindable for Option<T> {
    fn zero() -> Self {
        None
    }

    fn slot(&mut self) -> Slot<'_> {
        self.get_or_insert_with(T::zero).slot()
    }

    fn clear(&mut self) {
        *self = None;
    }
}

/// Element-wise access to a slice destination.
///
/// Implemented for `Vec<T>` of every [`Bindable`] element type; used by
/// the coercion engine to recurse into sequence destinations without a
/// per-element-kind variant explosion.
pub trait SeqBind {
    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns true if there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all elements.
    fn clear(&mut self);

    /// Appends a zero element and returns its slot.
    fn push_zero(&mut self) -> Slot<'_>;

    /// Shortens the sequence to `len` elements.
    fn truncate(&mut self, len: usize);

    /// Removes the first `n` elements, committing a staged replacement.
    fn drain_prefix(&mut self, n: usize);

    /// Returns the slot for the element at `index`, if in bounds.
    fn element_slot(&mut self, index: usize) -> Option<Slot<'_>>;
}

impl<T: Bindable> SeqBind for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn push_zero(&mut self) -> Slot<'_> {
        self.push(T::zero());
        let idx = Vec::len(self) - 1;
        self[idx].slot()
    }

    fn truncate(&mut self, len: usize) {
        Vec::truncate(self, len);
    }

    fn drain_prefix(&mut self, n: usize) {
        let n = n.min(Vec::len(self));
        self.drain(..n);
    }

    fn element_slot(&mut self, index: usize) -> Option<Slot<'_>> {
        self.get_mut(index).map(Bindable::slot)
    }
}
