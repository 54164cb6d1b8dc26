//! Step signatures and argument binding.
//!
//! A [`Signature`] declares a step's parameters in order, with optional
//! defaults. [`Signature::bind`] maps call arguments onto it the way a
//! function call would: positionals first, then keywords, then defaults.

use crate::error::{ReportError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    /// Value used when the caller omits the parameter.
    pub default: Option<Value>,
}

impl Param {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Declared name and parameter list of a step.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    name: String,
    params: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Declare a required parameter.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: None,
        });
        self
    }

    /// Declare an optional parameter with a default value.
    pub fn optional(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: Some(default.into()),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Reject duplicate names and required parameters after optional ones.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ReportError::InvalidArgument(
                "step name must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        let mut saw_optional = false;
        for param in &self.params {
            if !seen.insert(param.name.as_str()) {
                return Err(ReportError::InvalidArgument(format!(
                    "{}: parameter '{}' declared twice",
                    self.name, param.name
                )));
            }
            if param.is_required() && saw_optional {
                return Err(ReportError::InvalidArgument(format!(
                    "{}: required parameter '{}' follows an optional one",
                    self.name, param.name
                )));
            }
            saw_optional |= !param.is_required();
        }
        Ok(())
    }

    /// Bind `args` to the declared parameters and apply defaults.
    pub fn bind(&self, args: &Args) -> Result<BoundArgs> {
        if args.positional.len() > self.params.len() {
            return Err(ReportError::InvalidArgument(format!(
                "{}() takes {} argument(s) but {} were given",
                self.name,
                self.params.len(),
                args.positional.len()
            )));
        }

        let mut slots: Vec<Option<Value>> = vec![None; self.params.len()];
        for (slot, value) in slots.iter_mut().zip(&args.positional) {
            *slot = Some(value.clone());
        }

        for (key, value) in &args.keyword {
            let index = self
                .params
                .iter()
                .position(|p| &p.name == key)
                .ok_or_else(|| {
                    ReportError::InvalidArgument(format!(
                        "{}() got an unexpected keyword argument '{}'",
                        self.name, key
                    ))
                })?;
            if slots[index].is_some() {
                return Err(ReportError::InvalidArgument(format!(
                    "{}() got multiple values for argument '{}'",
                    self.name, key
                )));
            }
            slots[index] = Some(value.clone());
        }

        let mut values = Vec::with_capacity(self.params.len());
        for (param, slot) in self.params.iter().zip(slots) {
            let value = slot.or_else(|| param.default.clone()).ok_or_else(|| {
                ReportError::InvalidArgument(format!(
                    "{}() missing required argument '{}'",
                    self.name, param.name
                ))
            })?;
            values.push((param.name.clone(), value));
        }

        Ok(BoundArgs {
            name: self.name.clone(),
            values,
        })
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match &param.default {
                Some(default) => write!(f, "{}={}", param.name, default)?,
                None => f.write_str(&param.name)?,
            }
        }
        f.write_str(")")
    }
}

/// Call arguments as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keyword: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument.
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.push((key.into(), value.into()));
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword(&self) -> &[(String, Value)] {
        &self.keyword
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

/// Arguments bound to a signature, in declaration order, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgs {
    name: String,
    values: Vec<(String, Value)>,
}

impl BoundArgs {
    /// Name of the step these arguments were bound for.
    pub fn step_name(&self) -> &str {
        &self.name
    }

    /// Human-readable call title, e.g. `f(x=5, y=2)`.
    pub fn title(&self) -> String {
        let rendered: Vec<String> = self
            .values
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        format!("{}({})", self.name, rendered.join(", "))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Value of `name`, failing if the step never declared it.
    pub fn require(&self, name: &str) -> Result<&Value> {
        self.get(name).ok_or_else(|| {
            ReportError::InvalidArgument(format!("{}: no parameter '{}'", self.name, name))
        })
    }

    pub fn get_i64(&self, name: &str) -> Result<i64> {
        let value = self.require(name)?;
        value.as_i64().ok_or_else(|| self.type_error(name, "an integer", value))
    }

    pub fn get_f64(&self, name: &str) -> Result<f64> {
        let value = self.require(name)?;
        value.as_f64().ok_or_else(|| self.type_error(name, "a number", value))
    }

    pub fn get_str(&self, name: &str) -> Result<&str> {
        let value = self.require(name)?;
        value.as_str().ok_or_else(|| self.type_error(name, "a string", value))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        let value = self.require(name)?;
        value.as_bool().ok_or_else(|| self.type_error(name, "a boolean", value))
    }

    /// Deserialize `name` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.require(name)?;
        serde_json::from_value(value.clone()).map_err(|e| {
            ReportError::InvalidArgument(format!("{}: parameter '{}': {}", self.name, name, e))
        })
    }

    fn type_error(&self, name: &str, expected: &str, got: &Value) -> ReportError {
        ReportError::InvalidArgument(format!(
            "{}: parameter '{}' must be {}, got {}",
            self.name, name, expected, got
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn f_signature() -> Signature {
        Signature::new("f").param("x").optional("y", 2)
    }

    #[test]
    fn test_positional_with_default() {
        let bound = f_signature().bind(&Args::new().arg(5)).unwrap();
        assert_eq!(bound.title(), "f(x=5, y=2)");
        assert_eq!(bound.get_i64("y").unwrap(), 2);
    }

    #[test]
    fn test_keyword_binding_keeps_declaration_order() {
        let args = Args::new().kwarg("y", 7).kwarg("x", "a");
        let bound = f_signature().bind(&args).unwrap();
        assert_eq!(bound.title(), r#"f(x="a", y=7)"#);
    }

    #[test]
    fn test_missing_required() {
        let err = f_signature().bind(&Args::new()).unwrap_err();
        assert!(matches!(err, ReportError::InvalidArgument(m) if m.contains("missing required argument 'x'")));
    }

    #[test]
    fn test_too_many_positional() {
        let err = f_signature()
            .bind(&Args::new().arg(1).arg(2).arg(3))
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidArgument(_)));
    }

    #[test]
    fn test_unknown_and_duplicate_keywords() {
        assert!(f_signature().bind(&Args::new().kwarg("z", 1)).is_err());
        let err = f_signature()
            .bind(&Args::new().arg(1).kwarg("x", 2))
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidArgument(m) if m.contains("multiple values")));
    }

    #[test]
    fn test_empty_signature_title() {
        let bound = Signature::new("overview").bind(&Args::new()).unwrap();
        assert_eq!(bound.title(), "overview()");
    }

    #[test]
    fn test_typed_getters() {
        let sig = Signature::new("g")
            .param("values")
            .optional("label", "total")
            .optional("ratio", 0.5)
            .optional("flag", false);
        let bound = sig.bind(&Args::new().arg(json!([1, 2, 3]))).unwrap();
        assert_eq!(bound.get_as::<Vec<i64>>("values").unwrap(), vec![1, 2, 3]);
        assert_eq!(bound.get_str("label").unwrap(), "total");
        assert_eq!(bound.get_f64("ratio").unwrap(), 0.5);
        assert!(!bound.get_bool("flag").unwrap());
        assert!(bound.get_i64("label").is_err());
        assert!(bound.require("missing").is_err());
        assert_eq!(
            bound.title(),
            r#"g(values=[1,2,3], label="total", ratio=0.5, flag=false)"#
        );
    }

    #[test]
    fn test_validate_signature() {
        assert!(f_signature().validate().is_ok());
        assert!(Signature::new("h").optional("a", 1).param("b").validate().is_err());
        assert!(Signature::new("h").param("a").param("a").validate().is_err());
        assert!(Signature::new(" ").validate().is_err());
    }

    #[test]
    fn test_signature_display() {
        assert_eq!(f_signature().to_string(), "f(x, y=2)");
    }
}
