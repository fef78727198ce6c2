//! Time formatter family.
//!
//! Operates on `&mut DateTime<FixedOffset>` targets. Zone changes
//! re-express the same instant; truncation and day-boundary operations
//! work in the value's current zone.

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone};
use chrono_tz::Tz;
use proteus_core::{BindError, BindResult};

use crate::registry::Registry;
use crate::rule::{parse_rules, Rule};

/// Boxed operation applied to a time target.
pub type TimeOp = dyn Fn(&mut DateTime<FixedOffset>, &Rule) -> BindResult<()> + Send + Sync;

/// Applies named transformation chains to instants.
///
/// # Example
///
/// ```
/// use proteus_format::TimeFormatter;
/// use chrono::DateTime;
///
/// let formatter = TimeFormatter::new();
/// let mut t = DateTime::parse_from_rfc3339("2024-08-28T10:30:45-07:00").unwrap();
/// formatter.format("timezone=UTC,truncate=hour", &mut t).unwrap();
/// assert_eq!(t.to_rfc3339(), "2024-08-28T17:00:00+00:00");
/// ```
pub struct TimeFormatter {
    registry: Registry<TimeOp>,
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeFormatter {
    /// Creates a formatter with the built-in operations.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts a builder for registering custom operations.
    #[must_use]
    pub fn builder() -> TimeFormatterBuilder {
        TimeFormatterBuilder {
            registry: default_registry(),
        }
    }

    /// Applies the rule chain to `target`, left to right.
    ///
    /// # Errors
    ///
    /// Aborts at the first unknown or failing operation, leaving the
    /// partially-transformed instant in place.
    pub fn format(&self, rules: &str, target: &mut DateTime<FixedOffset>) -> BindResult<()> {
        for rule in parse_rules(rules) {
            let op = self.registry.lookup(&rule.name)?;
            op(target, &rule)?;
        }
        Ok(())
    }
}

/// Builder for [`TimeFormatter`].
pub struct TimeFormatterBuilder {
    registry: Registry<TimeOp>,
}

impl TimeFormatterBuilder {
    /// Registers a custom operation under `name`.
    #[must_use]
    pub fn operation<F>(mut self, name: impl Into<String>, op: F) -> Self
    where
        F: Fn(&mut DateTime<FixedOffset>, &Rule) -> BindResult<()> + Send + Sync + 'static,
    {
        self.registry.insert(name, Arc::new(op));
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> TimeFormatter {
        TimeFormatter {
            registry: self.registry.seal(),
        }
    }
}

fn default_registry() -> Registry<TimeOp> {
    let mut r: Registry<TimeOp> = Registry::new("time");
    r.insert("timezone", Arc::new(op_timezone));
    r.insert("truncate", Arc::new(op_truncate));
    r.insert("start_of_day", Arc::new(op_start_of_day));
    r.insert("end_of_day", Arc::new(op_end_of_day));
    r
}

fn op_timezone(t: &mut DateTime<FixedOffset>, rule: &Rule) -> BindResult<()> {
    let name = rule.require_arg(0)?;
    let tz: Tz = name
        .parse()
        .map_err(|_| BindError::parse(name, "timezone", "unknown IANA zone name"))?;
    *t = t.with_timezone(&tz).fixed_offset();
    Ok(())
}

fn op_truncate(t: &mut DateTime<FixedOffset>, rule: &Rule) -> BindResult<()> {
    let raw = rule.require_arg(0)?;
    let granularity = match raw {
        "hour" => Duration::hours(1),
        "minute" => Duration::minutes(1),
        "second" => Duration::seconds(1),
        literal => {
            let parsed = humantime::parse_duration(literal).map_err(|e| {
                BindError::parse(literal, "truncate duration", e.to_string())
            })?;
            Duration::from_std(parsed).map_err(|_| {
                BindError::parse(literal, "truncate duration", "duration too large")
            })?
        }
    };
    let step = granularity
        .num_nanoseconds()
        .filter(|&n| n > 0)
        .ok_or_else(|| {
            BindError::parse(raw, "truncate duration", "granularity must be positive")
        })?;
    let nanos = t.timestamp_nanos_opt().ok_or_else(|| {
        BindError::parse(raw, "truncate duration", "instant out of nanosecond range")
    })?;
    *t -= Duration::nanoseconds(nanos.rem_euclid(step));
    Ok(())
}

fn start_of_day(t: DateTime<FixedOffset>) -> BindResult<DateTime<FixedOffset>> {
    let midnight = t.date_naive().and_time(NaiveTime::MIN);
    t.offset()
        .from_local_datetime(&midnight)
        .single()
        .ok_or_else(|| {
            BindError::parse(
                midnight.to_string(),
                "time",
                "midnight is not representable in this zone",
            )
        })
}

fn op_start_of_day(t: &mut DateTime<FixedOffset>, _rule: &Rule) -> BindResult<()> {
    *t = start_of_day(*t)?;
    Ok(())
}

/// One nanosecond before the next midnight, in the value's current zone.
fn op_end_of_day(t: &mut DateTime<FixedOffset>, _rule: &Rule) -> BindResult<()> {
    *t = start_of_day(*t)? + Duration::days(1) - Duration::nanoseconds(1);
    Ok(())
}
