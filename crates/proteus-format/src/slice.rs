//! Slice formatter family.
//!
//! Reshapes homogeneous vectors in place: deduplication, ordering,
//! zero-value removal, and length capping.

use std::sync::Arc;

use proteus_core::{BindError, BindResult};

use crate::registry::Registry;
use crate::rule::{parse_rules, Rule};

/// Borrowed view over a supported slice target.
pub enum SliceSlot<'a> {
    /// A vector of strings.
    Str(&'a mut Vec<String>),
    /// A vector of signed integers.
    Int(&'a mut Vec<i64>),
    /// A vector of floats.
    Float(&'a mut Vec<f64>),
    /// A vector of booleans.
    Bool(&'a mut Vec<bool>),
}

impl SliceSlot<'_> {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "Vec<String>",
            Self::Int(_) => "Vec<i64>",
            Self::Float(_) => "Vec<f64>",
            Self::Bool(_) => "Vec<bool>",
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Str(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Bool(v) => v.len(),
        }
    }

    fn truncate(&mut self, len: usize) {
        match self {
            Self::Str(v) => v.truncate(len),
            Self::Int(v) => v.truncate(len),
            Self::Float(v) => v.truncate(len),
            Self::Bool(v) => v.truncate(len),
        }
    }
}

macro_rules! slice_slot_from {
    ($($elem:ty => $variant:ident),+ $(,)?) => {
        $(
            impl<'a> From<&'a mut Vec<$elem>> for SliceSlot<'a> {
                fn from(v: &'a mut Vec<$elem>) -> Self {
                    SliceSlot::$variant(v)
                }
            }
        )+
    };
}

slice_slot_from! {
    String => Str,
    i64 => Int,
    f64 => Float,
    bool => Bool,
}

/// Boxed operation applied to a slice target.
pub type SliceOp = dyn for<'a, 'b> Fn(&'a mut SliceSlot<'b>, &Rule) -> BindResult<()> + Send + Sync;

/// Applies named reshaping chains to vectors.
///
/// # Example
///
/// ```
/// use proteus_format::SliceFormatter;
///
/// let formatter = SliceFormatter::new();
/// let mut tags = vec!["b".to_string(), "a".to_string(), "b".to_string()];
/// formatter.format("unique,sort", &mut tags).unwrap();
/// assert_eq!(tags, vec!["a", "b"]);
/// ```
pub struct SliceFormatter {
    registry: Registry<SliceOp>,
}

impl Default for SliceFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SliceFormatter {
    /// Creates a formatter with the built-in operations.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts a builder for registering custom operations.
    #[must_use]
    pub fn builder() -> SliceFormatterBuilder {
        SliceFormatterBuilder {
            registry: default_registry(),
        }
    }

    /// Applies the rule chain to `target`, left to right.
    ///
    /// # Errors
    ///
    /// Aborts at the first unknown or failing operation, leaving the
    /// partially-transformed vector in place.
    pub fn format<'a, T>(&self, rules: &str, target: &'a mut T) -> BindResult<()>
    where
        &'a mut T: Into<SliceSlot<'a>>,
    {
        let mut slot = target.into();
        for rule in parse_rules(rules) {
            let op = self.registry.lookup(&rule.name)?;
            op(&mut slot, &rule)?;
        }
        Ok(())
    }
}

/// Builder for [`SliceFormatter`].
pub struct SliceFormatterBuilder {
    registry: Registry<SliceOp>,
}

impl SliceFormatterBuilder {
    /// Registers a custom operation under `name`.
    #[must_use]
    pub fn operation<F>(mut self, name: impl Into<String>, op: F) -> Self
    where
        F: for<'a, 'b> Fn(&'a mut SliceSlot<'b>, &Rule) -> BindResult<()> + Send + Sync + 'static,
    {
        self.registry.insert(name, Arc::new(op));
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> SliceFormatter {
        SliceFormatter {
            registry: self.registry.seal(),
        }
    }
}

fn default_registry() -> Registry<SliceOp> {
    let mut r: Registry<SliceOp> = Registry::new("slice");
    r.insert("unique", Arc::new(op_unique));
    r.insert("sort", Arc::new(op_sort));
    r.insert("sort_desc", Arc::new(op_sort_desc));
    r.insert("compact", Arc::new(op_compact));
    r.insert("limit", Arc::new(op_limit));
    r
}

/// Keeps the first occurrence of each element, preserving order.
fn dedup_stable<T: PartialEq + Clone>(v: &mut Vec<T>) {
    let mut seen: Vec<T> = Vec::with_capacity(v.len());
    v.retain(|item| {
        if seen.contains(item) {
            false
        } else {
            seen.push(item.clone());
            true
        }
    });
}

fn op_unique(slot: &mut SliceSlot<'_>, _rule: &Rule) -> BindResult<()> {
    match slot {
        SliceSlot::Str(v) => dedup_stable(v),
        SliceSlot::Int(v) => dedup_stable(v),
        SliceSlot::Float(v) => dedup_stable(v),
        SliceSlot::Bool(v) => dedup_stable(v),
    }
    Ok(())
}

fn sort_slot(slot: &mut SliceSlot<'_>, descending: bool) -> BindResult<()> {
    match slot {
        SliceSlot::Str(v) => v.sort(),
        SliceSlot::Int(v) => v.sort_unstable(),
        SliceSlot::Float(v) => v.sort_unstable_by(f64::total_cmp),
        SliceSlot::Bool(_) => {
            return Err(BindError::not_supported("sort", slot.type_name()));
        }
    }
    if descending {
        match slot {
            SliceSlot::Str(v) => v.reverse(),
            SliceSlot::Int(v) => v.reverse(),
            SliceSlot::Float(v) => v.reverse(),
            SliceSlot::Bool(_) => unreachable!(),
        }
    }
    Ok(())
}

fn op_sort(slot: &mut SliceSlot<'_>, _rule: &Rule) -> BindResult<()> {
    sort_slot(slot, false)
}

fn op_sort_desc(slot: &mut SliceSlot<'_>, _rule: &Rule) -> BindResult<()> {
    sort_slot(slot, true)
}

/// Drops zero-valued elements: empty strings, `0`, `0.0`, and `false`.
fn op_compact(slot: &mut SliceSlot<'_>, _rule: &Rule) -> BindResult<()> {
    match slot {
        SliceSlot::Str(v) => v.retain(|s| !s.is_empty()),
        SliceSlot::Int(v) => v.retain(|&n| n != 0),
        SliceSlot::Float(v) => v.retain(|&f| f != 0.0),
        SliceSlot::Bool(v) => v.retain(|&b| b),
    }
    Ok(())
}

fn op_limit(slot: &mut SliceSlot<'_>, rule: &Rule) -> BindResult<()> {
    let raw = rule.require_arg(0)?;
    let count: i64 = raw
        .parse()
        .map_err(|_| BindError::parse(raw, "limit count", "not an integer"))?;
    let cap = usize::try_from(count).unwrap_or(0);
    if cap < slot.len() {
        slot.truncate(cap);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_unique_keeps_first_occurrence() {
        let formatter = SliceFormatter::new();
        let mut v = strings(&["b", "a", "b", "c", "a"]);
        formatter.format("unique", &mut v).unwrap();
        assert_eq!(v, strings(&["b", "a", "c"]));
    }

    #[test]
    fn test_unique_then_sort_scenario() {
        let formatter = SliceFormatter::new();
        let mut v = strings(&["b", "a", "b"]);
        formatter.format("unique,sort", &mut v).unwrap();
        assert_eq!(v, strings(&["a", "b"]));
    }

    #[test]
    fn test_sort_desc_integers() {
        let formatter = SliceFormatter::new();
        let mut v = vec![3i64, 1, 2];
        formatter.format("sort_desc", &mut v).unwrap();
        assert_eq!(v, vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_floats_total_order() {
        let formatter = SliceFormatter::new();
        let mut v = vec![2.5f64, -1.0, 0.5];
        formatter.format("sort", &mut v).unwrap();
        assert_eq!(v, vec![-1.0, 0.5, 2.5]);
    }

    #[test]
    fn test_sort_bools_not_supported() {
        let formatter = SliceFormatter::new();
        let mut v = vec![true, false];
        let err = formatter.format("sort", &mut v).unwrap_err();
        assert!(matches!(err, BindError::NotSupported { .. }));
    }

    #[test]
    fn test_compact_drops_zero_values() {
        let formatter = SliceFormatter::new();

        let mut s = strings(&["a", "", "b"]);
        formatter.format("compact", &mut s).unwrap();
        assert_eq!(s, strings(&["a", "b"]));

        let mut n = vec![0i64, 7, 0, 9];
        formatter.format("compact", &mut n).unwrap();
        assert_eq!(n, vec![7, 9]);

        let mut b = vec![true, false, true];
        formatter.format("compact", &mut b).unwrap();
        assert_eq!(b, vec![true, true]);
    }

    #[test]
    fn test_limit_caps_length() {
        let formatter = SliceFormatter::new();
        let mut v = vec![1i64, 2, 3, 4];
        formatter.format("limit=2", &mut v).unwrap();
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn test_limit_negative_empties() {
        let formatter = SliceFormatter::new();
        let mut v = vec![1i64, 2];
        formatter.format("limit=-1", &mut v).unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn test_limit_larger_than_length_is_noop() {
        let formatter = SliceFormatter::new();
        let mut v = vec![1i64, 2];
        formatter.format("limit=10", &mut v).unwrap();
        assert_eq!(v, vec![1, 2]);
    }

    #[test]
    fn test_unique_sort_compact_idempotent() {
        let formatter = SliceFormatter::new();
        let mut v = strings(&["b", "", "a", "b"]);
        formatter.format("compact,unique,sort", &mut v).unwrap();
        let once = v.clone();
        formatter.format("compact,unique,sort", &mut v).unwrap();
        assert_eq!(v, once);
    }

    #[test]
    fn test_custom_operation() {
        let formatter = SliceFormatter::builder()
            .operation("double_each", |slot: &mut SliceSlot<'_>, _rule: &Rule| {
                if let SliceSlot::Int(v) = slot {
                    for n in v.iter_mut() {
                        *n *= 2;
                    }
                }
                Ok(())
            })
            .build();
        let mut v = vec![1i64, 2];
        formatter.format("double_each,limit=1", &mut v).unwrap();
        assert_eq!(v, vec![2]);
    }
}
