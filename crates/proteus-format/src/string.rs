//! String formatter family.
//!
//! Operates on `&mut String` targets. The chain aborts at the first
//! unknown or failing operation, leaving the target in the state the
//! prior successful operations produced.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use proteus_core::{BindError, BindResult};

use crate::registry::Registry;
use crate::rule::{parse_rules, Rule};

/// Boxed operation applied to a string target.
pub type StringOp = dyn Fn(&mut String, &Rule) -> BindResult<()> + Send + Sync;

/// Characters kept verbatim by `url_encode`, matching query escaping.
const URL_UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Applies named transformation chains to string values.
///
/// # Example
///
/// ```
/// use proteus_format::StringFormatter;
///
/// let formatter = StringFormatter::new();
/// let mut value = "  hello world  ".to_string();
/// formatter.format("trim_space,title", &mut value).unwrap();
/// assert_eq!(value, "Hello World");
/// ```
pub struct StringFormatter {
    registry: Registry<StringOp>,
}

impl Default for StringFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl StringFormatter {
    /// Creates a formatter with the built-in operations.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts a builder for registering custom operations.
    ///
    /// Custom operations may shadow built-in names.
    #[must_use]
    pub fn builder() -> StringFormatterBuilder {
        StringFormatterBuilder {
            registry: default_registry(),
        }
    }

    /// Applies the rule chain to `target`, left to right.
    ///
    /// # Errors
    ///
    /// Aborts at the first unknown or failing operation; earlier
    /// operations' effects remain on `target` (callers needing atomicity
    /// snapshot beforehand).
    pub fn format(&self, rules: &str, target: &mut String) -> BindResult<()> {
        for rule in parse_rules(rules) {
            let op = self.registry.lookup(&rule.name)?;
            op(target, &rule)?;
        }
        Ok(())
    }
}

/// Builder for [`StringFormatter`].
pub struct StringFormatterBuilder {
    registry: Registry<StringOp>,
}

impl StringFormatterBuilder {
    /// Registers a custom operation under `name`.
    #[must_use]
    pub fn operation<F>(mut self, name: impl Into<String>, op: F) -> Self
    where
        F: Fn(&mut String, &Rule) -> BindResult<()> + Send + Sync + 'static,
    {
        self.registry.insert(name, Arc::new(op));
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> StringFormatter {
        StringFormatter {
            registry: self.registry.seal(),
        }
    }
}

fn default_registry() -> Registry<StringOp> {
    let mut r: Registry<StringOp> = Registry::new("string");
    r.insert("trim_space", Arc::new(op_trim_space));
    r.insert("upper", Arc::new(op_upper));
    r.insert("lower", Arc::new(op_lower));
    r.insert("title", Arc::new(op_title));
    r.insert("snake", Arc::new(op_snake));
    r.insert("kebab", Arc::new(op_kebab));
    r.insert("camel", Arc::new(op_camel));
    r.insert("base64_encode", Arc::new(op_base64_encode));
    r.insert("base64_decode", Arc::new(op_base64_decode));
    r.insert("url_encode", Arc::new(op_url_encode));
    r.insert("url_decode", Arc::new(op_url_decode));
    r.insert("escape_html", Arc::new(op_escape_html));
    r.insert("reverse", Arc::new(op_reverse));
    r.insert("trim_prefix", Arc::new(op_trim_prefix));
    r.insert("trim_suffix", Arc::new(op_trim_suffix));
    r.insert("truncate", Arc::new(op_truncate));
    r.insert("replace", Arc::new(op_replace));
    r.insert("substr", Arc::new(op_substr));
    r.insert("pad_left", Arc::new(op_pad_left));
    r.insert("pad_right", Arc::new(op_pad_right));
    r
}

fn op_trim_space(s: &mut String, _rule: &Rule) -> BindResult<()> {
    let trimmed = s.trim();
    if trimmed.len() != s.len() {
        *s = trimmed.to_string();
    }
    Ok(())
}

fn op_upper(s: &mut String, _rule: &Rule) -> BindResult<()> {
    *s = s.to_uppercase();
    Ok(())
}

fn op_lower(s: &mut String, _rule: &Rule) -> BindResult<()> {
    *s = s.to_lowercase();
    Ok(())
}

fn op_title(s: &mut String, _rule: &Rule) -> BindResult<()> {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            out.push(ch);
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.push(ch);
        }
    }
    *s = out;
    Ok(())
}

fn op_snake(s: &mut String, _rule: &Rule) -> BindResult<()> {
    *s = delimit_uppercase(s, '_');
    Ok(())
}

fn op_kebab(s: &mut String, _rule: &Rule) -> BindResult<()> {
    *s = delimit_uppercase(s, '-');
    Ok(())
}

fn delimit_uppercase(s: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push(delimiter);
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

fn op_camel(s: &mut String, _rule: &Rule) -> BindResult<()> {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = false;
    for ch in s.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    *s = out;
    Ok(())
}

fn op_base64_encode(s: &mut String, _rule: &Rule) -> BindResult<()> {
    *s = BASE64.encode(s.as_bytes());
    Ok(())
}

/// Fail-soft: a malformed or non-UTF-8 payload leaves the original string
/// unchanged rather than erroring.
fn op_base64_decode(s: &mut String, _rule: &Rule) -> BindResult<()> {
    if let Ok(bytes) = BASE64.decode(s.as_bytes()) {
        if let Ok(decoded) = String::from_utf8(bytes) {
            *s = decoded;
        }
    }
    Ok(())
}

fn op_url_encode(s: &mut String, _rule: &Rule) -> BindResult<()> {
    let encoded = utf8_percent_encode(s, URL_UNRESERVED).to_string();
    // Query escaping renders spaces as '+'.
    *s = encoded.replace("%20", "+");
    Ok(())
}

/// Fail-soft, like [`op_base64_decode`].
fn op_url_decode(s: &mut String, _rule: &Rule) -> BindResult<()> {
    let spaced = s.replace('+', " ");
    if let Ok(decoded) = percent_decode_str(&spaced).decode_utf8() {
        *s = decoded.into_owned();
    }
    Ok(())
}

fn op_escape_html(s: &mut String, _rule: &Rule) -> BindResult<()> {
    if s.contains(['<', '>']) {
        *s = s.replace('<', "&lt;").replace('>', "&gt;");
    }
    Ok(())
}

fn op_reverse(s: &mut String, _rule: &Rule) -> BindResult<()> {
    *s = s.chars().rev().collect();
    Ok(())
}

fn op_trim_prefix(s: &mut String, rule: &Rule) -> BindResult<()> {
    let prefix = rule.require_arg(0)?;
    if let Some(rest) = s.strip_prefix(prefix) {
        *s = rest.to_string();
    }
    Ok(())
}

fn op_trim_suffix(s: &mut String, rule: &Rule) -> BindResult<()> {
    let suffix = rule.require_arg(0)?;
    if let Some(rest) = s.strip_suffix(suffix) {
        *s = rest.to_string();
    }
    Ok(())
}

fn op_truncate(s: &mut String, rule: &Rule) -> BindResult<()> {
    let raw = rule.require_arg(0)?;
    let length = raw
        .parse::<i64>()
        .map_err(|e| BindError::parse(raw, "truncate length", e.to_string()))?;
    if length < 0 {
        return Err(BindError::parse(
            raw,
            "truncate length",
            "negative length",
        ));
    }
    let mut length = length as usize;
    if length >= s.len() {
        return Ok(());
    }
    while !s.is_char_boundary(length) {
        length -= 1;
    }
    s.truncate(length);
    Ok(())
}

fn op_replace(s: &mut String, rule: &Rule) -> BindResult<()> {
    let old = rule.require_arg(0)?;
    let new = rule.arg(1).unwrap_or("");
    let count = match rule.arg(2) {
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|e| BindError::parse(raw, "replace count", e.to_string()))?,
        None => -1,
    };
    *s = if count < 0 {
        s.replace(old, new)
    } else {
        s.replacen(old, new, count as usize)
    };
    Ok(())
}

fn op_substr(s: &mut String, rule: &Rule) -> BindResult<()> {
    let raw_start = rule.require_arg(0)?;
    let start = raw_start
        .parse::<i64>()
        .map_err(|e| BindError::parse(raw_start, "substr start", e.to_string()))?;
    let end = match rule.arg(1) {
        Some(raw) if !raw.is_empty() => raw
            .parse::<i64>()
            .map_err(|e| BindError::parse(raw, "substr end", e.to_string()))?,
        _ => s.len() as i64,
    };
    // Out-of-range offsets yield an empty result rather than an error.
    if start < 0 || start as usize >= s.len() || end <= start {
        s.clear();
        return Ok(());
    }
    let mut start = start as usize;
    let mut end = (end as usize).min(s.len());
    while !s.is_char_boundary(start) {
        start -= 1;
    }
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    *s = s[start..end].to_string();
    Ok(())
}

fn op_pad_left(s: &mut String, rule: &Rule) -> BindResult<()> {
    pad(s, rule, true)
}

fn op_pad_right(s: &mut String, rule: &Rule) -> BindResult<()> {
    pad(s, rule, false)
}

fn pad(s: &mut String, rule: &Rule, left: bool) -> BindResult<()> {
    let raw = rule.require_arg(0)?;
    let width = raw
        .parse::<usize>()
        .map_err(|e| BindError::parse(raw, "pad width", e.to_string()))?;
    let fill = rule
        .arg(1)
        .and_then(|a| a.chars().next())
        .unwrap_or(' ');
    let current = s.chars().count();
    if current >= width {
        return Ok(());
    }
    let padding: String = std::iter::repeat(fill).take(width - current).collect();
    if left {
        *s = padding + s;
    } else {
        s.push_str(&padding);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(rules: &str, input: &str) -> String {
        let mut s = input.to_string();
        StringFormatter::new().format(rules, &mut s).unwrap();
        s
    }

    #[test]
    fn test_trim_space_is_idempotent() {
        assert_eq!(apply("trim_space", "  x  "), "x");
        assert_eq!(apply("trim_space,trim_space", "  x  "), "x");
    }

    #[test]
    fn test_case_operations() {
        assert_eq!(apply("upper", "abc"), "ABC");
        assert_eq!(apply("lower", "ABC"), "abc");
        assert_eq!(apply("title", "hello wide world"), "Hello Wide World");
    }

    #[test]
    fn test_snake_kebab_camel() {
        assert_eq!(apply("snake", "userName"), "user_name");
        assert_eq!(apply("snake", "UserName"), "user_name");
        assert_eq!(apply("kebab", "userName"), "user-name");
        assert_eq!(apply("camel", "user_name"), "userName");
    }

    #[test]
    fn test_base64_round_and_fail_soft() {
        assert_eq!(apply("base64_encode", "hello"), "aGVsbG8=");
        assert_eq!(apply("base64_decode", "aGVsbG8="), "hello");
        // Fail-soft: malformed input passes through unchanged.
        assert_eq!(apply("base64_decode", "not base64!!!"), "not base64!!!");
    }

    #[test]
    fn test_url_encode_decode() {
        assert_eq!(apply("url_encode", "a b&c"), "a+b%26c");
        assert_eq!(apply("url_decode", "a+b%26c"), "a b&c");
        // Fail-soft: a dangling escape passes through unchanged.
        assert_eq!(apply("url_decode", "100%"), "100%");
    }

    #[test]
    fn test_escape_html_only_angle_brackets() {
        assert_eq!(
            apply("escape_html", "<b>& 'ok'</b>"),
            "&lt;b&gt;& 'ok'&lt;/b&gt;"
        );
    }

    #[test]
    fn test_reverse_is_char_aware() {
        assert_eq!(apply("reverse", "héllo"), "olléh");
    }

    #[test]
    fn test_trim_prefix_suffix() {
        assert_eq!(apply("trim_prefix=ab", "abcd"), "cd");
        assert_eq!(apply("trim_prefix=zz", "abcd"), "abcd");
        assert_eq!(apply("trim_suffix=cd", "abcd"), "ab");

        let mut s = "abcd".to_string();
        assert!(StringFormatter::new()
            .format("trim_prefix=", &mut s)
            .is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(apply("truncate=3", "abcdef"), "abc");
        assert_eq!(apply("truncate=10", "abc"), "abc");
        // Byte offsets never split a character.
        assert_eq!(apply("truncate=3", "héllo"), "hé");

        let mut s = "abc".to_string();
        assert!(StringFormatter::new()
            .format("truncate=-1", &mut s)
            .is_err());
    }

    #[test]
    fn test_replace_with_optional_count() {
        assert_eq!(apply("replace=a:b", "aaa"), "bbb");
        assert_eq!(apply("replace=a:b:2", "aaa"), "bba");
        assert_eq!(apply("replace=a:", "aaa"), "");
    }

    #[test]
    fn test_substr() {
        assert_eq!(apply("substr=1:3", "abcdef"), "bc");
        assert_eq!(apply("substr=2", "abcdef"), "cdef");
        assert_eq!(apply("substr=10", "abc"), "");
        assert_eq!(apply("substr=3:2", "abcdef"), "");
        assert_eq!(apply("substr=1:100", "abc"), "bc");
    }

    #[test]
    fn test_substr_negative_offsets_yield_empty() {
        assert_eq!(apply("substr=-1", "abc"), "");
        assert_eq!(apply("substr=-5:2", "abc"), "");
        assert_eq!(apply("substr=1:-1", "abc"), "");
    }

    #[test]
    fn test_pad_scenarios() {
        assert_eq!(apply("pad_left=10:_", "text"), "______text");
        assert_eq!(apply("pad_left=3:_", "text"), "text");
        assert_eq!(apply("pad_right=6", "text"), "text  ");
    }

    #[test]
    fn test_default_registry_resolves_distinct_builtins() {
        // One chain crossing several registered operations.
        assert_eq!(apply("upper,reverse,lower,pad_right=4:x", "ab"), "baxx");
    }

    #[test]
    fn test_chain_short_circuits_with_partial_state() {
        let formatter = StringFormatter::new();
        let mut s = "  x  ".to_string();
        let err = formatter
            .format("trim_space,nonexistent,upper", &mut s)
            .unwrap_err();
        assert!(matches!(
            err,
            BindError::FormatterNotFound { family: "string", .. }
        ));
        // The first step ran; the one after the failure never did.
        assert_eq!(s, "x");
    }

    #[test]
    fn test_custom_operation_and_shadowing() {
        let formatter = StringFormatter::builder()
            .operation("shout", |s: &mut String, _: &Rule| {
                s.push('!');
                Ok(())
            })
            .operation("upper", |s: &mut String, _: &Rule| {
                *s = s.to_lowercase();
                Ok(())
            })
            .build();

        let mut s = "Hi".to_string();
        formatter.format("shout,upper", &mut s).unwrap();
        assert_eq!(s, "hi!");

        // Registrations are scoped to the instance they were built into.
        let mut other = "Hi".to_string();
        assert!(StringFormatter::new().format("shout", &mut other).is_err());
    }
}
