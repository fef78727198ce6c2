//! Numeric formatter family.
//!
//! Operates on a [`NumericSlot`] naming the destination's exact width, so
//! clamp arguments are parsed and range-checked in that width before any
//! comparison happens.

use std::sync::Arc;

use proteus_core::{BindError, BindResult, IntType};

use crate::registry::Registry;
use crate::rule::{parse_rules, Rule};

/// A writable reference to a numeric target of known width.
pub enum NumericSlot<'a> {
    /// 8-bit signed target.
    I8(&'a mut i8),
    /// 16-bit signed target.
    I16(&'a mut i16),
    /// 32-bit signed target.
    I32(&'a mut i32),
    /// 64-bit signed target.
    I64(&'a mut i64),
    /// Native-width signed target.
    Isize(&'a mut isize),
    /// 8-bit unsigned target.
    U8(&'a mut u8),
    /// 16-bit unsigned target.
    U16(&'a mut u16),
    /// 32-bit unsigned target.
    U32(&'a mut u32),
    /// 64-bit unsigned target.
    U64(&'a mut u64),
    /// Native-width unsigned target.
    Usize(&'a mut usize),
    /// 32-bit float target.
    F32(&'a mut f32),
    /// 64-bit float target.
    F64(&'a mut f64),
}

macro_rules! numeric_slot_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for NumericSlot<'a> {
                fn from(target: &'a mut $ty) -> Self {
                    Self::$variant(target)
                }
            }
        )*
    };
}

numeric_slot_from! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

/// Boxed operation applied to a numeric target.
pub type NumericOp =
    dyn for<'a, 'b> Fn(&'a mut NumericSlot<'b>, &Rule) -> BindResult<()> + Send + Sync;

/// Applies named transformation chains to numeric values in place.
///
/// # Example
///
/// ```
/// use proteus_format::NumericFormatter;
///
/// let formatter = NumericFormatter::new();
/// let mut n: i64 = 5;
/// formatter.format("min=10,max=100", &mut n).unwrap();
/// assert_eq!(n, 10);
/// ```
pub struct NumericFormatter {
    registry: Registry<NumericOp>,
}

impl Default for NumericFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl NumericFormatter {
    /// Creates a formatter with the built-in operations.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts a builder for registering custom operations.
    #[must_use]
    pub fn builder() -> NumericFormatterBuilder {
        NumericFormatterBuilder {
            registry: default_registry(),
        }
    }

    /// Applies the rule chain to `target`, left to right.
    ///
    /// # Errors
    ///
    /// Aborts at the first unknown or failing operation, leaving the
    /// partially-transformed value in place.
    pub fn format<'a, T>(&self, rules: &str, target: &'a mut T) -> BindResult<()>
    where
        &'a mut T: Into<NumericSlot<'a>>,
    {
        let mut slot = target.into();
        for rule in parse_rules(rules) {
            let op = self.registry.lookup(&rule.name)?;
            op(&mut slot, &rule)?;
        }
        Ok(())
    }
}

/// Builder for [`NumericFormatter`].
pub struct NumericFormatterBuilder {
    registry: Registry<NumericOp>,
}

impl NumericFormatterBuilder {
    /// Registers a custom operation under `name`.
    #[must_use]
    pub fn operation<F>(mut self, name: impl Into<String>, op: F) -> Self
    where
        F: for<'a, 'b> Fn(&'a mut NumericSlot<'b>, &Rule) -> BindResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.registry.insert(name, Arc::new(op));
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> NumericFormatter {
        NumericFormatter {
            registry: self.registry.seal(),
        }
    }
}

fn default_registry() -> Registry<NumericOp> {
    let mut r: Registry<NumericOp> = Registry::new("numeric");
    r.insert("min", Arc::new(op_min));
    r.insert("max", Arc::new(op_max));
    r.insert("abs", Arc::new(op_abs));
    r.insert("round", Arc::new(op_round));
    r.insert("ceil", Arc::new(op_ceil));
    r.insert("floor", Arc::new(op_floor));
    r
}

/// Parses a clamp argument in the destination's exact width.
fn int_arg<T: TryFrom<i128>>(rule: &Rule, ty: IntType) -> BindResult<T> {
    let raw = rule.require_arg(0)?;
    let value = raw
        .parse::<i128>()
        .map_err(|e| BindError::parse(raw, ty.name(), e.to_string()))?;
    ty.check(value)?;
    T::try_from(value).map_err(|_| ty.range_error(value))
}

fn float_arg<T: std::str::FromStr>(rule: &Rule, name: &'static str) -> BindResult<T> {
    let raw = rule.require_arg(0)?;
    raw.parse::<T>()
        .map_err(|_| BindError::parse(raw, name, "invalid float literal"))
}

fn clamp_int<T: PartialOrd + TryFrom<i128>>(
    target: &mut T,
    ty: IntType,
    rule: &Rule,
    lower: bool,
) -> BindResult<()> {
    let bound: T = int_arg(rule, ty)?;
    if lower {
        if *target < bound {
            *target = bound;
        }
    } else if *target > bound {
        *target = bound;
    }
    Ok(())
}

fn clamp_float<T: PartialOrd + std::str::FromStr>(
    target: &mut T,
    name: &'static str,
    rule: &Rule,
    lower: bool,
) -> BindResult<()> {
    let bound: T = float_arg(rule, name)?;
    if lower {
        if *target < bound {
            *target = bound;
        }
    } else if *target > bound {
        *target = bound;
    }
    Ok(())
}

fn clamp(slot: &mut NumericSlot<'_>, rule: &Rule, lower: bool) -> BindResult<()> {
    match slot {
        NumericSlot::I8(d) => clamp_int(*d, IntType::I8, rule, lower),
        NumericSlot::I16(d) => clamp_int(*d, IntType::I16, rule, lower),
        NumericSlot::I32(d) => clamp_int(*d, IntType::I32, rule, lower),
        NumericSlot::I64(d) => clamp_int(*d, IntType::I64, rule, lower),
        NumericSlot::Isize(d) => clamp_int(*d, IntType::Isize, rule, lower),
        NumericSlot::U8(d) => clamp_int(*d, IntType::U8, rule, lower),
        NumericSlot::U16(d) => clamp_int(*d, IntType::U16, rule, lower),
        NumericSlot::U32(d) => clamp_int(*d, IntType::U32, rule, lower),
        NumericSlot::U64(d) => clamp_int(*d, IntType::U64, rule, lower),
        NumericSlot::Usize(d) => clamp_int(*d, IntType::Usize, rule, lower),
        NumericSlot::F32(d) => clamp_float(*d, "f32", rule, lower),
        NumericSlot::F64(d) => clamp_float(*d, "f64", rule, lower),
    }
}

fn op_min(slot: &mut NumericSlot<'_>, rule: &Rule) -> BindResult<()> {
    clamp(slot, rule, true)
}

fn op_max(slot: &mut NumericSlot<'_>, rule: &Rule) -> BindResult<()> {
    clamp(slot, rule, false)
}

fn abs_int<T: Copy + Into<i128> + TryFrom<i128>>(target: &mut T, ty: IntType) -> BindResult<()> {
    let magnitude = (*target).into().abs();
    ty.check(magnitude)?;
    *target = T::try_from(magnitude).map_err(|_| ty.range_error(magnitude))?;
    Ok(())
}

fn op_abs(slot: &mut NumericSlot<'_>, _rule: &Rule) -> BindResult<()> {
    match slot {
        NumericSlot::I8(d) => abs_int(*d, IntType::I8)?,
        NumericSlot::I16(d) => abs_int(*d, IntType::I16)?,
        NumericSlot::I32(d) => abs_int(*d, IntType::I32)?,
        NumericSlot::I64(d) => abs_int(*d, IntType::I64)?,
        NumericSlot::Isize(d) => {
            let magnitude = (**d as i128).abs();
            IntType::Isize.check(magnitude)?;
            **d = magnitude as isize;
        }
        // Unsigned targets are already non-negative.
        NumericSlot::U8(_)
        | NumericSlot::U16(_)
        | NumericSlot::U32(_)
        | NumericSlot::U64(_)
        | NumericSlot::Usize(_) => {}
        NumericSlot::F32(d) => **d = d.abs(),
        NumericSlot::F64(d) => **d = d.abs(),
    }
    Ok(())
}

fn rounding(
    slot: &mut NumericSlot<'_>,
    name: &str,
    apply32: fn(f32) -> f32,
    apply64: fn(f64) -> f64,
) -> BindResult<()> {
    match slot {
        NumericSlot::F32(d) => {
            **d = apply32(**d);
            Ok(())
        }
        NumericSlot::F64(d) => {
            **d = apply64(**d);
            Ok(())
        }
        _ => Err(BindError::not_supported(name, "integer")),
    }
}

fn op_round(slot: &mut NumericSlot<'_>, _rule: &Rule) -> BindResult<()> {
    rounding(slot, "round", f32::round, f64::round)
}

fn op_ceil(slot: &mut NumericSlot<'_>, _rule: &Rule) -> BindResult<()> {
    rounding(slot, "ceil", f32::ceil, f64::ceil)
}

fn op_floor(slot: &mut NumericSlot<'_>, _rule: &Rule) -> BindResult<()> {
    rounding(slot, "floor", f32::floor, f64::floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scenario() {
        let formatter = NumericFormatter::new();

        let mut n: i64 = 5;
        formatter.format("min=10,max=100", &mut n).unwrap();
        assert_eq!(n, 10);

        let mut n: i64 = 150;
        formatter.format("min=10,max=100", &mut n).unwrap();
        assert_eq!(n, 100);

        let mut n: i64 = 50;
        formatter.format("min=10,max=100", &mut n).unwrap();
        assert_eq!(n, 50);
    }

    #[test]
    fn test_clamp_argument_parsed_in_destination_width() {
        let formatter = NumericFormatter::new();
        let mut n: i8 = 5;
        // 300 overflows i8: the argument itself is rejected.
        let err = formatter.format("min=300", &mut n).unwrap_err();
        assert!(matches!(err, BindError::Range { .. }));
        assert_eq!(n, 5);
    }

    #[test]
    fn test_clamp_floats() {
        let formatter = NumericFormatter::new();
        let mut f: f64 = 0.25;
        formatter.format("min=0.5,max=2.0", &mut f).unwrap();
        assert!((f - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_abs() {
        let formatter = NumericFormatter::new();

        let mut n: i32 = -42;
        formatter.format("abs", &mut n).unwrap();
        assert_eq!(n, 42);

        let mut f: f64 = -1.5;
        formatter.format("abs", &mut f).unwrap();
        assert!((f - 1.5).abs() < f64::EPSILON);

        // i8::MIN has no representable absolute value.
        let mut edge: i8 = i8::MIN;
        assert!(formatter.format("abs", &mut edge).is_err());
        assert_eq!(edge, i8::MIN);
    }

    #[test]
    fn test_rounding_float_only() {
        let formatter = NumericFormatter::new();

        let mut f: f64 = 2.5;
        formatter.format("round", &mut f).unwrap();
        assert!((f - 3.0).abs() < f64::EPSILON);

        let mut f: f64 = 2.1;
        formatter.format("ceil", &mut f).unwrap();
        assert!((f - 3.0).abs() < f64::EPSILON);

        let mut f: f64 = 2.9;
        formatter.format("floor", &mut f).unwrap();
        assert!((f - 2.0).abs() < f64::EPSILON);

        let mut n: i64 = 2;
        let err = formatter.format("round", &mut n).unwrap_err();
        assert!(matches!(err, BindError::NotSupported { .. }));
    }

    #[test]
    fn test_unknown_operation_names_numeric_family() {
        let formatter = NumericFormatter::new();
        let mut n: i64 = 1;
        let err = formatter.format("wobble", &mut n).unwrap_err();
        assert!(matches!(
            err,
            BindError::FormatterNotFound { family: "numeric", .. }
        ));
    }

    #[test]
    fn test_custom_operation() {
        let formatter = NumericFormatter::builder()
            .operation("double", |slot: &mut NumericSlot<'_>, _: &Rule| {
                if let NumericSlot::I64(d) = slot {
                    **d *= 2;
                }
                Ok(())
            })
            .build();
        let mut n: i64 = 21;
        formatter.format("double", &mut n).unwrap();
        assert_eq!(n, 42);
    }
}
