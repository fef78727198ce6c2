//! The value coercion engine.
//!
//! Converts loosely-typed source values into strongly-typed destination
//! fields. Dispatch is an exhaustive match over the destination [`Slot`]
//! and the source shape; unmatched combinations fail with
//! [`BindError::NotSupported`]. Writes are atomic from the caller's
//! perspective: a setter either fully writes the destination or returns
//! an error without observable partial mutation.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use num_complex::Complex;
use tracing::trace;

use crate::error::{BindError, BindResult};
use crate::parse::{format_float, parse_bool, parse_checked_int, special_float_literal};
use crate::range::IntType;
use crate::slot::{Bindable, SeqBind, Slot};
use crate::time;
use crate::value::Value;

/// Options for [`set_slice_string`].
#[derive(Debug, Clone)]
pub struct SliceJoinOptions {
    /// Separator used when joining into a string destination.
    pub separator: String,
}

impl Default for SliceJoinOptions {
    fn default() -> Self {
        Self {
            separator: ",".to_string(),
        }
    }
}

impl SliceJoinOptions {
    /// Creates options with a custom join separator.
    #[must_use]
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

/// Assigns a source [`Value`] to a destination field.
///
/// `Value::Null` zeroes the destination. `Option` destinations are
/// allocated on write; `set(dest, Value::Null)` resets them to `None`.
///
/// # Example
///
/// ```
/// use proteus_core::{set, Value};
///
/// let mut port: Option<u16> = None;
/// set(&mut port, Value::from("8080")).unwrap();
/// assert_eq!(port, Some(8080));
///
/// set(&mut port, Value::Null).unwrap();
/// assert_eq!(port, None);
/// ```
pub fn set<B: Bindable + ?Sized>(dest: &mut B, value: Value) -> BindResult<()> {
    if value.is_null() {
        dest.clear();
        return Ok(());
    }
    set_slot(dest.slot(), value)
}

/// Assigns a raw string to a destination field, parsing as needed.
///
/// An empty string writes the destination's zero value; slice
/// destinations become empty collections rather than erroring.
///
/// # Example
///
/// ```
/// use proteus_core::set_string;
///
/// let mut flags: Vec<bool> = Vec::new();
/// set_string(&mut flags, "yes, no, on").unwrap();
/// assert_eq!(flags, vec![true, false, true]);
/// ```
pub fn set_string<B: Bindable + ?Sized>(dest: &mut B, s: &str) -> BindResult<()> {
    set_string_slot(dest.slot(), s)
}

/// Assigns an integer of any width and signedness to a destination field.
///
/// Numeric destinations are range-checked; string destinations receive
/// the decimal rendering; boolean destinations receive `value > 0`.
pub fn set_int<B: Bindable + ?Sized>(dest: &mut B, value: impl Into<i128>) -> BindResult<()> {
    set_int_slot(dest.slot(), value.into())
}

/// Assigns a float of either width to a destination field.
///
/// NaN and the infinities propagate losslessly into float and complex
/// destinations, render as the literals `NaN`/`+Inf`/`-Inf` in string
/// destinations, and fail with [`BindError::SpecialFloat`] for integer
/// destinations.
pub fn set_float<B: Bindable + ?Sized>(dest: &mut B, value: impl Into<f64>) -> BindResult<()> {
    set_float_slot(dest.slot(), value.into())
}

/// Assigns a slice of raw strings to a destination field.
///
/// String destinations join the elements with the configured separator;
/// slice destinations of other element kinds re-parse each element, and
/// the whole call fails without observable partial mutation if any
/// element fails.
pub fn set_slice_string<B: Bindable + ?Sized>(
    dest: &mut B,
    values: Vec<String>,
    options: &SliceJoinOptions,
) -> BindResult<()> {
    set_slice_slot(dest.slot(), values, options)
}

/// Returns the writable slot for a sequence element by index.
///
/// # Errors
///
/// Returns [`BindError::FieldIndexOutOfBounds`] when `index` is past the
/// end of the sequence.
pub fn element_slot<S: SeqBind + ?Sized>(seq: &mut S, index: usize) -> BindResult<Slot<'_>> {
    let len = seq.len();
    seq.element_slot(index)
        .ok_or(BindError::FieldIndexOutOfBounds { index, len })
}

fn unsupported(what: &str, slot: &Slot<'_>) -> BindError {
    trace!(source = what, destination = slot.type_name(), "unsupported coercion");
    BindError::not_supported(what, slot.type_name())
}

fn set_slot(slot: Slot<'_>, value: Value) -> BindResult<()> {
    match value {
        Value::Null => {
            let mut slot = slot;
            slot.clear();
            Ok(())
        }
        Value::Str(s) => set_string_slot(slot, &s),
        Value::Int(n) => set_int_slot(slot, i128::from(n)),
        Value::Uint(n) => set_int_slot(slot, i128::from(n)),
        Value::Float(f) => set_float_slot(slot, f),
        Value::Bool(b) => set_bool_slot(slot, b),
        Value::StrList(values) => set_slice_slot(slot, values, &SliceJoinOptions::default()),
        Value::List(items) => set_list_slot(slot, items),
        Value::Time(t) => set_time_slot(slot, t),
    }
}

fn set_string_slot(slot: Slot<'_>, s: &str) -> BindResult<()> {
    if s.is_empty() {
        let mut slot = slot;
        slot.clear();
        return Ok(());
    }
    match slot {
        Slot::Str(d) => *d = s.to_string(),
        Slot::Bool(d) => *d = parse_bool(s)?,
        Slot::I8(d) => *d = parse_checked_int(s, IntType::I8)? as i8,
        Slot::I16(d) => *d = parse_checked_int(s, IntType::I16)? as i16,
        Slot::I32(d) => *d = parse_checked_int(s, IntType::I32)? as i32,
        Slot::I64(d) => *d = parse_checked_int(s, IntType::I64)? as i64,
        Slot::Isize(d) => *d = parse_checked_int(s, IntType::Isize)? as isize,
        Slot::U8(d) => *d = parse_checked_int(s, IntType::U8)? as u8,
        Slot::U16(d) => *d = parse_checked_int(s, IntType::U16)? as u16,
        Slot::U32(d) => *d = parse_checked_int(s, IntType::U32)? as u32,
        Slot::U64(d) => *d = parse_checked_int(s, IntType::U64)? as u64,
        Slot::Usize(d) => *d = parse_checked_int(s, IntType::Usize)? as usize,
        Slot::F32(d) => {
            *d = s
                .parse::<f32>()
                .map_err(|e| BindError::parse(s, "f32", e.to_string()))?;
        }
        Slot::F64(d) => {
            *d = s
                .parse::<f64>()
                .map_err(|e| BindError::parse(s, "f64", e.to_string()))?;
        }
        Slot::C32(d) => {
            *d = s
                .parse::<Complex<f32>>()
                .map_err(|e| BindError::parse(s, "complex<f32>", e.to_string()))?;
        }
        Slot::C64(d) => {
            *d = s
                .parse::<Complex<f64>>()
                .map_err(|e| BindError::parse(s, "complex<f64>", e.to_string()))?;
        }
        Slot::Time(d) => *d = time::parse_time(s)?,
        Slot::Bytes(d) => *d = s.as_bytes().to_vec(),
        Slot::StrList(d) => {
            *d = s.split(',').map(|part| part.trim().to_string()).collect();
        }
        Slot::Seq(seq) => set_string_seq(seq, s)?,
        Slot::StrMap(d) => *d = parse_string_map(s)?,
        Slot::Any(d) => *d = Value::Str(s.to_string()),
        Slot::AnyList(d) => {
            *d = s
                .split(',')
                .map(|part| Value::Str(part.trim().to_string()))
                .collect();
        }
    }
    Ok(())
}

/// Comma-splits into a sequence destination, coercing each element.
///
/// New elements are staged after the existing ones and the replacement is
/// committed only once every element parses, so a failing element leaves
/// the destination untouched.
fn set_string_seq(seq: &mut dyn SeqBind, s: &str) -> BindResult<()> {
    let base = seq.len();
    for (index, part) in s.split(',').enumerate() {
        let element = seq.push_zero();
        if let Err(source) = set_string_slot(element, part.trim()) {
            seq.truncate(base);
            return Err(BindError::slice_iteration(index, source));
        }
    }
    seq.drain_prefix(base);
    Ok(())
}

fn parse_string_map(s: &str) -> BindResult<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for pair in s.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once(':').ok_or_else(|| {
            BindError::parse(pair, "string map", "pair is missing the ':' delimiter")
        })?;
        map.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(map)
}

fn set_int_slot(slot: Slot<'_>, n: i128) -> BindResult<()> {
    match slot {
        Slot::Str(d) => *d = n.to_string(),
        Slot::Bool(d) => *d = n > 0,
        Slot::I8(d) => {
            IntType::I8.check(n)?;
            *d = n as i8;
        }
        Slot::I16(d) => {
            IntType::I16.check(n)?;
            *d = n as i16;
        }
        Slot::I32(d) => {
            IntType::I32.check(n)?;
            *d = n as i32;
        }
        Slot::I64(d) => {
            IntType::I64.check(n)?;
            *d = n as i64;
        }
        Slot::Isize(d) => {
            IntType::Isize.check(n)?;
            *d = n as isize;
        }
        Slot::U8(d) => {
            IntType::U8.check(n)?;
            *d = n as u8;
        }
        Slot::U16(d) => {
            IntType::U16.check(n)?;
            *d = n as u16;
        }
        Slot::U32(d) => {
            IntType::U32.check(n)?;
            *d = n as u32;
        }
        Slot::U64(d) => {
            IntType::U64.check(n)?;
            *d = n as u64;
        }
        Slot::Usize(d) => {
            IntType::Usize.check(n)?;
            *d = n as usize;
        }
        Slot::F32(d) => *d = n as f32,
        Slot::F64(d) => *d = n as f64,
        Slot::C32(d) => *d = Complex::new(n as f32, 0.0),
        Slot::C64(d) => *d = Complex::new(n as f64, 0.0),
        Slot::Any(d) => {
            *d = i64::try_from(n).map_or_else(
                |_| u64::try_from(n).map_or(Value::Float(n as f64), Value::Uint),
                Value::Int,
            );
        }
        other => return Err(unsupported("integer", &other)),
    }
    Ok(())
}

fn set_float_slot(slot: Slot<'_>, f: f64) -> BindResult<()> {
    match slot {
        Slot::Str(d) => *d = format_float(f),
        Slot::Bool(d) => *d = f > 0.0,
        Slot::I8(d) => *d = float_to_int(f, IntType::I8)? as i8,
        Slot::I16(d) => *d = float_to_int(f, IntType::I16)? as i16,
        Slot::I32(d) => *d = float_to_int(f, IntType::I32)? as i32,
        Slot::I64(d) => *d = float_to_int(f, IntType::I64)? as i64,
        Slot::Isize(d) => *d = float_to_int(f, IntType::Isize)? as isize,
        Slot::U8(d) => *d = float_to_int(f, IntType::U8)? as u8,
        Slot::U16(d) => *d = float_to_int(f, IntType::U16)? as u16,
        Slot::U32(d) => *d = float_to_int(f, IntType::U32)? as u32,
        Slot::U64(d) => *d = float_to_int(f, IntType::U64)? as u64,
        Slot::Usize(d) => *d = float_to_int(f, IntType::Usize)? as usize,
        Slot::F32(d) => *d = f as f32,
        Slot::F64(d) => *d = f,
        Slot::C32(d) => *d = Complex::new(f as f32, 0.0),
        Slot::C64(d) => *d = Complex::new(f, 0.0),
        Slot::Any(d) => *d = Value::Float(f),
        other => return Err(unsupported("float", &other)),
    }
    Ok(())
}

/// Validates a float for an integer destination.
///
/// Special values fail with [`BindError::SpecialFloat`] naming the value;
/// finite values are range-checked against the destination width.
fn float_to_int(f: f64, ty: IntType) -> BindResult<f64> {
    if let Some(literal) = special_float_literal(f) {
        return Err(BindError::SpecialFloat {
            literal,
            destination: ty.name(),
        });
    }
    if f < ty.min() as f64 || f > ty.max() as f64 {
        return Err(BindError::Range {
            value: format_float(f),
            destination: ty.name(),
            min: ty.min(),
            max: ty.max(),
        });
    }
    Ok(f)
}

fn set_bool_slot(slot: Slot<'_>, b: bool) -> BindResult<()> {
    match slot {
        Slot::Bool(d) => *d = b,
        Slot::Str(d) => *d = if b { "true" } else { "false" }.to_string(),
        Slot::I8(d) => *d = i8::from(b),
        Slot::I16(d) => *d = i16::from(b),
        Slot::I32(d) => *d = i32::from(b),
        Slot::I64(d) => *d = i64::from(b),
        Slot::Isize(d) => *d = isize::from(b),
        Slot::U8(d) => *d = u8::from(b),
        Slot::U16(d) => *d = u16::from(b),
        Slot::U32(d) => *d = u32::from(b),
        Slot::U64(d) => *d = u64::from(b),
        Slot::Usize(d) => *d = usize::from(b),
        Slot::F32(d) => *d = if b { 1.0 } else { 0.0 },
        Slot::F64(d) => *d = if b { 1.0 } else { 0.0 },
        Slot::Any(d) => *d = Value::Bool(b),
        other => return Err(unsupported("bool", &other)),
    }
    Ok(())
}

fn set_time_slot(slot: Slot<'_>, t: DateTime<FixedOffset>) -> BindResult<()> {
    match slot {
        Slot::Time(d) => *d = t,
        Slot::Str(d) => *d = t.to_rfc3339(),
        Slot::Any(d) => *d = Value::Time(t),
        other => return Err(unsupported("time", &other)),
    }
    Ok(())
}

fn set_list_slot(slot: Slot<'_>, items: Vec<Value>) -> BindResult<()> {
    match slot {
        Slot::Seq(seq) => {
            let base = seq.len();
            for (index, item) in items.into_iter().enumerate() {
                let element = seq.push_zero();
                if let Err(source) = set_slot(element, item) {
                    seq.truncate(base);
                    return Err(BindError::slice_iteration(index, source));
                }
            }
            seq.drain_prefix(base);
        }
        Slot::StrList(d) => {
            let mut staged = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                let mut rendered = String::new();
                set_slot(Slot::Str(&mut rendered), item)
                    .map_err(|source| BindError::slice_iteration(index, source))?;
                staged.push(rendered);
            }
            *d = staged;
        }
        Slot::AnyList(d) => *d = items,
        Slot::Any(d) => *d = Value::List(items),
        other => return Err(unsupported("slice", &other)),
    }
    Ok(())
}

fn set_slice_slot(
    slot: Slot<'_>,
    values: Vec<String>,
    options: &SliceJoinOptions,
) -> BindResult<()> {
    match slot {
        Slot::Str(d) => *d = values.join(&options.separator),
        Slot::StrList(d) => *d = values,
        Slot::Bytes(d) => {
            let mut staged = Vec::with_capacity(values.len());
            for (index, value) in values.iter().enumerate() {
                let byte = parse_checked_int(value.trim(), IntType::U8)
                    .map_err(|source| BindError::slice_iteration(index, source))?;
                staged.push(byte as u8);
            }
            *d = staged;
        }
        Slot::Seq(seq) => {
            let base = seq.len();
            for (index, value) in values.iter().enumerate() {
                let element = seq.push_zero();
                if let Err(source) = set_string_slot(element, value.trim()) {
                    seq.truncate(base);
                    return Err(BindError::slice_iteration(index, source));
                }
            }
            seq.drain_prefix(base);
        }
        Slot::AnyList(d) => *d = values.into_iter().map(Value::Str).collect(),
        Slot::Any(d) => *d = Value::StrList(values),
        other => return Err(unsupported("string slice", &other)),
    }
    Ok(())
}
