// src/cli/parser.rs

use crate::cli::switches::{Arity, Switch};
use std::collections::HashMap;
use thiserror::Error;

/// A malformed command line. Parsing stops at the first offense; nothing is
/// silently ignored.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("Invalid arg '{0}' used.")]
    UnknownArgument(String),
    #[error("'{short}'/'{long}' requires an argument.")]
    MissingValue { short: String, long: String },
}

/// The value recorded for one switch, shaped by its arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// A no-argument switch was present.
    Flag,
    /// An optional-argument switch, with or without its single value.
    Optional(Option<String>),
    /// A required-argument switch and its value.
    Required(String),
}

/// The transient result of one parse pass over argv.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    values: HashMap<&'static str, OptionValue>,
    /// `Some` iff a literal `--` separator was seen. Everything after it is
    /// kept verbatim, in order, for the built target.
    extras: Option<Vec<String>>,
}

impl ParsedOptions {
    /// Whether a no-argument switch was present.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(OptionValue::Flag))
    }

    /// The value of a required-argument switch, if it was given.
    pub fn required_value(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(OptionValue::Required(value)) => Some(value),
            _ => None,
        }
    }

    /// The state of an optional-argument switch: `None` when absent,
    /// `Some(None)` when given bare, `Some(Some(_))` when given a value.
    pub fn optional_value(&self, name: &str) -> Option<Option<&str>> {
        match self.values.get(name) {
            Some(OptionValue::Optional(value)) => Some(value.as_deref()),
            _ => None,
        }
    }

    /// The pass-through tokens captured after `--`, if the separator was seen.
    pub fn extras(&self) -> Option<&[String]> {
        self.extras.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.extras.is_none()
    }
}

/// Parses an argument vector against the switch registry.
///
/// Tokens are scanned left to right. A literal `--` ends switch matching:
/// every remaining token becomes an extra. Otherwise each token must match a
/// switch's long or short form, consuming a following value token according
/// to the switch's arity. An option never consumes a switch-like token as
/// its value.
pub fn parse(switches: &[Switch], args: &[String]) -> Result<ParsedOptions, UsageError> {
    let mut options = ParsedOptions::default();
    let mut tokens = args.iter().map(String::as_str).peekable();

    while let Some(token) = tokens.next() {
        if token == "--" {
            options.extras = Some(tokens.map(str::to_string).collect());
            break;
        }

        let switch = switches
            .iter()
            .find(|switch| switch.matches(token))
            .ok_or_else(|| UsageError::UnknownArgument(token.to_string()))?;

        let value = match switch.arity {
            Arity::NoArgument => OptionValue::Flag,
            Arity::OptionalArgument => OptionValue::Optional(take_value(&mut tokens)),
            Arity::RequiredArgument => match take_value(&mut tokens) {
                Some(value) => OptionValue::Required(value),
                None => {
                    return Err(UsageError::MissingValue {
                        short: switch.short.clone(),
                        long: switch.long.clone(),
                    });
                }
            },
        };
        options.values.insert(switch.name, value);
    }

    Ok(options)
}

/// Consumes the next token as a value iff it exists and is not switch-like.
fn take_value<'a>(
    tokens: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>,
) -> Option<String> {
    match tokens.peek() {
        Some(next) if !Switch::is_switch_like(next) => tokens.next().map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::switches::{self, registry};

    fn to_args(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn parse_args(args: &[&str]) -> Result<ParsedOptions, UsageError> {
        parse(&registry(), &to_args(args))
    }

    #[test]
    fn test_empty_argv_parses_to_nothing() {
        let parsed = parse_args(&[]).unwrap();
        assert!(parsed.is_empty());
        assert!(parsed.extras().is_none());
    }

    #[test]
    fn test_no_argument_switch_records_presence() {
        let parsed = parse_args(&["--help"]).unwrap();
        assert!(parsed.flag(switches::HELP));
        assert!(!parsed.flag(switches::SHOW_TESTS));
    }

    #[test]
    fn test_long_and_short_forms_are_equivalent() {
        let by_long = parse_args(&["--target", "app"]).unwrap();
        let by_short = parse_args(&["-t", "app"]).unwrap();
        assert_eq!(by_long, by_short);
        assert_eq!(by_long.required_value(switches::TARGET), Some("app"));
    }

    #[test]
    fn test_unknown_argument_is_a_usage_error() {
        assert_eq!(
            parse_args(&["bogus"]),
            Err(UsageError::UnknownArgument("bogus".to_string()))
        );
        // Also when it only appears after valid switches.
        assert_eq!(
            parse_args(&["-h", "bogus"]),
            Err(UsageError::UnknownArgument("bogus".to_string()))
        );
    }

    #[test]
    fn test_required_switch_as_final_token_fails() {
        assert_eq!(
            parse_args(&["--target"]),
            Err(UsageError::MissingValue {
                short: "-t".to_string(),
                long: "--target".to_string(),
            })
        );
    }

    #[test]
    fn test_required_switch_cannot_consume_another_switch() {
        assert_eq!(
            parse_args(&["-t", "-r"]),
            Err(UsageError::MissingValue {
                short: "-t".to_string(),
                long: "--target".to_string(),
            })
        );
    }

    #[test]
    fn test_optional_switch_bare_records_empty_value() {
        let parsed = parse_args(&["-r"]).unwrap();
        assert_eq!(parsed.optional_value(switches::RUN), Some(None));
    }

    #[test]
    fn test_optional_switch_consumes_plain_follower() {
        let parsed = parse_args(&["-r", "yes"]).unwrap();
        assert_eq!(parsed.optional_value(switches::RUN), Some(Some("yes")));
    }

    #[test]
    fn test_optional_switch_does_not_consume_switch_like_follower() {
        let parsed = parse_args(&["-r", "-tm"]).unwrap();
        assert_eq!(parsed.optional_value(switches::RUN), Some(None));
        assert_eq!(parsed.optional_value(switches::TEST_MODE), Some(None));
    }

    #[test]
    fn test_extras_are_collected_after_separator() {
        let parsed = parse_args(&["-t", "build_all", "--", "--flag", "value"]).unwrap();
        assert_eq!(parsed.required_value(switches::TARGET), Some("build_all"));
        assert_eq!(
            parsed.extras(),
            Some(&["--flag".to_string(), "value".to_string()][..])
        );
    }

    #[test]
    fn test_extras_are_never_switch_matched() {
        // "bogus" after the separator must not be rejected.
        let parsed = parse_args(&["--", "bogus", "-t"]).unwrap();
        assert_eq!(
            parsed.extras(),
            Some(&["bogus".to_string(), "-t".to_string()][..])
        );
    }

    #[test]
    fn test_no_separator_means_no_extras() {
        let parsed = parse_args(&["-t", "app", "-r", "yes"]).unwrap();
        assert!(parsed.extras().is_none());
    }

    #[test]
    fn test_bare_separator_records_empty_extras() {
        let parsed = parse_args(&["--"]).unwrap();
        assert_eq!(parsed.extras(), Some(&[][..]));
    }

    #[test]
    fn test_later_occurrence_wins() {
        let parsed = parse_args(&["-t", "first", "-t", "second"]).unwrap();
        assert_eq!(parsed.required_value(switches::TARGET), Some("second"));
    }
}
