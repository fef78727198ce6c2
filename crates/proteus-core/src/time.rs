//! Time literal parsing with a cached layout resolver.
//!
//! Incoming time strings arrive in a handful of well-known layouts. The
//! resolver first consults a bounded cache keyed by the exact literal,
//! then classifies the string's shape to try the most likely layouts, and
//! finally falls back to an exhaustive ordered search. The cache is a pure
//! performance optimization: disabling it changes nothing observable.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::{BindError, BindResult};

/// Default maximum number of cached literal-to-layout entries.
const DEFAULT_CACHE_CAPACITY: usize = 256;

/// A candidate time layout.
enum Layout {
    /// RFC3339, with or without fractional seconds.
    Rfc3339,
    /// RFC2822, covering RFC1123 and RFC822 with named or numeric zones.
    Rfc2822,
    /// A chrono format string carrying an explicit zone offset.
    Zoned(&'static str),
    /// A chrono format string with no zone; resolved in UTC.
    Naive(&'static str),
    /// A date-only chrono format string; midnight UTC.
    Date(&'static str),
}

impl Layout {
    fn parse(&self, s: &str) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Rfc3339 => DateTime::parse_from_rfc3339(s).ok(),
            Self::Rfc2822 => DateTime::parse_from_rfc2822(s).ok(),
            Self::Zoned(fmt) => DateTime::parse_from_str(s, fmt).ok(),
            Self::Naive(fmt) => NaiveDateTime::parse_from_str(s, fmt)
                .ok()
                .map(|n| Utc.from_utc_datetime(&n).fixed_offset()),
            Self::Date(fmt) => NaiveDate::parse_from_str(s, fmt)
                .ok()
                .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)).fixed_offset()),
        }
    }
}

/// Ordered exhaustive layout list; earlier entries are more common.
static LAYOUTS: &[Layout] = &[
    Layout::Rfc3339,
    Layout::Zoned("%Y-%m-%dT%H:%M:%S%.f%:z"),
    Layout::Rfc2822,
    Layout::Zoned("%a, %d %b %Y %H:%M:%S %z"),
    Layout::Zoned("%d %b %y %H:%M %z"),
    Layout::Naive("%A, %d-%b-%y %H:%M:%S GMT"),
    Layout::Date("%Y-%m-%d"),
    Layout::Naive("%Y-%m-%d %H:%M:%S"),
    Layout::Zoned("%Y-%m-%d %H:%M:%S %z"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S"),
    Layout::Date("%m/%d/%Y"),
    Layout::Naive("%m/%d/%Y %H:%M:%S"),
];

const LIKELY_DATE_ONLY: &[usize] = &[6];
const LIKELY_RFC3339: &[usize] = &[0, 1, 9];
const LIKELY_DATE_TIME: &[usize] = &[7, 8];
const LIKELY_US_DATE: &[usize] = &[10, 11];

/// Classifies a literal into the layout indices most likely to parse it.
fn likely_layouts(s: &str) -> &'static [usize] {
    let b = s.as_bytes();
    if b.len() == 10 && b[4] == b'-' && b[7] == b'-' {
        LIKELY_DATE_ONLY
    } else if b.len() >= 19 && b[4] == b'-' && b[7] == b'-' && b[10] == b'T' {
        LIKELY_RFC3339
    } else if b.len() >= 19 && b[4] == b'-' && b[7] == b'-' && b[10] == b' ' {
        LIKELY_DATE_TIME
    } else if b.len() >= 10 && b[2] == b'/' && b[5] == b'/' {
        LIKELY_US_DATE
    } else {
        &[]
    }
}

/// Heuristic, cached string-to-time parser.
///
/// Safe for concurrent use: lookups take the shared read path, insertions
/// the exclusive write path. The cache is bounded; when it reaches its
/// configured capacity it is cleared rather than growing without limit.
///
/// # Example
///
/// ```
/// use proteus_core::TimeResolver;
///
/// let resolver = TimeResolver::new();
/// let t = resolver.parse("2024-08-28T10:30:45-07:00").unwrap();
/// assert_eq!(t.timestamp(), 1_724_866_245);
/// ```
pub struct TimeResolver {
    cache: RwLock<HashMap<String, usize>>,
    max_entries: usize,
}

impl Default for TimeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeResolver {
    /// Creates a resolver with the default cache capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a resolver whose cache holds at most `max_entries` literals.
    #[must_use]
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            max_entries,
        }
    }

    /// Parses a time literal.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Parse`] naming the literal when no known
    /// layout matches.
    pub fn parse(&self, s: &str) -> BindResult<DateTime<FixedOffset>> {
        if let Some(id) = self.cache.read().get(s).copied() {
            if let Some(t) = LAYOUTS[id].parse(s) {
                trace!(literal = s, layout = id, "time layout cache hit");
                return Ok(t);
            }
        }

        for &id in likely_layouts(s) {
            if let Some(t) = LAYOUTS[id].parse(s) {
                self.remember(s, id);
                return Ok(t);
            }
        }

        for (id, layout) in LAYOUTS.iter().enumerate() {
            if let Some(t) = layout.parse(s) {
                self.remember(s, id);
                return Ok(t);
            }
        }

        Err(BindError::parse(s, "time", "no known layout matched"))
    }

    fn remember(&self, literal: &str, id: usize) {
        let mut cache = self.cache.write();
        if cache.len() >= self.max_entries {
            debug!(
                entries = cache.len(),
                "time layout cache full, clearing"
            );
            cache.clear();
        }
        cache.insert(literal.to_string(), id);
        trace!(literal, layout = id, "time layout cached");
    }

    #[cfg(test)]
    fn cache_len(&self) -> usize {
        self.cache.read().len()
    }
}

static SHARED: OnceLock<TimeResolver> = OnceLock::new();

/// Returns the process-wide shared resolver.
pub fn resolver() -> &'static TimeResolver {
    SHARED.get_or_init(TimeResolver::new)
}

/// Parses a time literal using the shared resolver.
///
/// # Errors
///
/// Returns [`BindError::Parse`] when no known layout matches.
pub fn parse_time(s: &str) -> BindResult<DateTime<FixedOffset>> {
    resolver().parse(s)
}
