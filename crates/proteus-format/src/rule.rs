//! Rule grammar shared by every formatter family.
//!
//! A rule string is a comma-separated chain of tokens. Each token is a
//! name with an optional `=`-separated argument, and the argument may
//! carry `:`-separated positional sub-arguments:
//!
//! ```text
//! rule     := token (',' token)*
//! token    := name ['=' argument]
//! argument := subarg (':' subarg)*
//! ```

use proteus_core::{BindError, BindResult};
use smallvec::SmallVec;

/// One parsed formatter operation: a name and its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The operation name looked up in the family registry.
    pub name: String,
    /// Positional sub-arguments, possibly empty.
    pub args: Vec<String>,
}

impl Rule {
    /// Returns the argument at `index`, if present.
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Returns the non-empty argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Parse`] when the argument is absent or empty.
    pub fn require_arg(&self, index: usize) -> BindResult<&str> {
        self.arg(index)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| {
                BindError::parse(
                    &self.name,
                    "formatter rule",
                    format!("missing required argument {index}"),
                )
            })
    }
}

/// An ordered formatter chain, applied left to right.
///
/// Chains are short in practice; the inline capacity avoids a heap
/// allocation for the common case.
pub type RuleChain = SmallVec<[Rule; 4]>;

/// Parses a rule string into its chain of operations.
///
/// Empty tokens are skipped, so `""` and `"a,,b"` behave as expected.
#[must_use]
pub fn parse_rules(raw: &str) -> RuleChain {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((name, argument)) => Rule {
                name: name.trim().to_string(),
                args: argument.split(':').map(str::to_string).collect(),
            },
            None => Rule {
                name: token.to_string(),
                args: Vec::new(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_names() {
        let chain = parse_rules("trim_space,upper");
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].name, "trim_space");
        assert!(chain[0].args.is_empty());
        assert_eq!(chain[1].name, "upper");
    }

    #[test]
    fn test_parse_single_argument() {
        let chain = parse_rules("limit=5");
        assert_eq!(chain[0].name, "limit");
        assert_eq!(chain[0].arg(0), Some("5"));
    }

    #[test]
    fn test_parse_positional_sub_arguments() {
        let chain = parse_rules("replace=old:new:2");
        assert_eq!(chain[0].args, vec!["old", "new", "2"]);

        let chain = parse_rules("pad_left=10:_");
        assert_eq!(chain[0].args, vec!["10", "_"]);
    }

    #[test]
    fn test_parse_skips_empty_tokens() {
        assert!(parse_rules("").is_empty());
        let chain = parse_rules("trim_space,,upper");
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_trailing_equals_yields_empty_argument() {
        let chain = parse_rules("trim_prefix=");
        assert_eq!(chain[0].arg(0), Some(""));
        assert!(chain[0].require_arg(0).is_err());
    }

    #[test]
    fn test_require_arg_missing() {
        let chain = parse_rules("truncate");
        assert!(chain[0].require_arg(0).is_err());
    }
}
