//! Textual step invocations for the top-level dispatcher.
//!
//! An invocation is a step name followed by whitespace-separated
//! arguments, e.g. `summary [1,2,3] label="total" precision=2`. Values
//! parse as JSON and fall back to plain strings; `key=value` tokens are
//! keyword arguments.

use crate::error::{ReportError, Result};
use crate::signature::Args;
use serde_json::Value;

/// A step name with its call arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub step: String,
    pub args: Args,
}

impl Invocation {
    pub fn new(step: impl Into<String>, args: Args) -> Self {
        Self {
            step: step.into(),
            args,
        }
    }

    /// Parse `name arg... key=value...`.
    pub fn parse(text: &str) -> Result<Self> {
        let tokens = tokenize(text)?;
        let mut tokens = tokens.into_iter();
        let step = tokens
            .next()
            .ok_or_else(|| ReportError::InvalidArgument("empty invocation".to_string()))?;
        if !is_identifier(&step) {
            return Err(ReportError::InvalidArgument(format!(
                "'{step}' is not a step name"
            )));
        }

        let mut args = Args::new();
        let mut saw_keyword = false;
        for token in tokens {
            match split_keyword(&token) {
                Some((key, raw)) => {
                    saw_keyword = true;
                    args = args.kwarg(key, parse_value(raw));
                }
                None if saw_keyword => {
                    return Err(ReportError::InvalidArgument(format!(
                        "positional argument '{token}' follows keyword argument"
                    )));
                }
                None => args = args.arg(parse_value(&token)),
            }
        }
        Ok(Self { step, args })
    }
}

impl std::str::FromStr for Invocation {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// JSON value of `raw`, or the raw text as a string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn split_keyword(token: &str) -> Option<(&str, &str)> {
    let (key, value) = token.split_once('=')?;
    is_identifier(key).then_some((key, value))
}

/// Split on whitespace outside brackets, braces and double quotes.
fn tokenize(text: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                current.push(c);
            }
            '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ']' | '}' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    ReportError::InvalidArgument(format!("unbalanced '{c}' in invocation"))
                })?;
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if in_string || depth != 0 {
        return Err(ReportError::InvalidArgument(format!(
            "unterminated value in invocation '{text}'"
        )));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_positional_and_keyword() {
        let inv = Invocation::parse("f 5 y=2").unwrap();
        assert_eq!(inv.step, "f");
        assert_eq!(inv.args, Args::new().arg(5).kwarg("y", 2));
    }

    #[test]
    fn test_parse_structured_values() {
        let inv: Invocation = r#"summary [1, 2, 3] label="grand total" opts={"a": [1]}"#
            .parse()
            .unwrap();
        assert_eq!(inv.args.positional(), &[json!([1, 2, 3])]);
        assert_eq!(
            inv.args.keyword(),
            &[
                ("label".to_string(), json!("grand total")),
                ("opts".to_string(), json!({"a": [1]})),
            ]
        );
    }

    #[test]
    fn test_bare_words_are_strings() {
        let inv = Invocation::parse("greet world name=bob").unwrap();
        assert_eq!(inv.args.positional(), &[json!("world")]);
        assert_eq!(inv.args.keyword()[0].1, json!("bob"));
    }

    #[test]
    fn test_name_only() {
        let inv = Invocation::parse("  overview  ").unwrap();
        assert_eq!(inv.step, "overview");
        assert!(inv.args.is_empty());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(Invocation::parse("").is_err());
        assert!(Invocation::parse("9lives").is_err());
        assert!(Invocation::parse("f [1, 2").is_err());
        assert!(Invocation::parse("f ]").is_err());
        assert!(Invocation::parse(r#"f "open"#).is_err());
        assert!(Invocation::parse("f x=1 2").is_err());
    }

    #[test]
    fn test_equals_inside_value_is_positional() {
        let inv = Invocation::parse(r#"f "a=b""#).unwrap();
        assert_eq!(inv.args.positional(), &[json!("a=b")]);
    }
}
