//! Expected values and deep equality.
//!
//! An [`ExpectedValue`] is either a literal JSON value or a pattern object
//! that carries its own match predicate (regex, "string containing", partial
//! object/array shapes). Matchers compare observed `serde_json::Value`s
//! against it wherever exact equality is too strict.

use regex::Regex;
use serde_json::{Map, Value};

use crate::result::EsperarResult;

/// A value a matcher can compare an observed value against
#[derive(Debug, Clone)]
pub enum ExpectedValue {
    /// Literal deep equality
    Eq(Value),
    /// Whole-value regex match against the observed string
    Regex(Regex),
    /// Observed string must contain this substring
    StringContaining(String),
    /// Observed object must contain these keys with matching values
    ObjectContaining(Map<String, Value>),
    /// Observed array must contain a match for every entry
    ArrayContaining(Vec<ExpectedValue>),
    /// Matches anything
    Any,
}

impl ExpectedValue {
    /// Literal expected value
    #[must_use]
    pub fn eq(value: impl Into<Value>) -> Self {
        Self::Eq(value.into())
    }

    /// Literal expected string
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Eq(Value::String(value.into()))
    }

    /// Regex pattern expected value
    pub fn regex(pattern: &str) -> EsperarResult<Self> {
        Ok(Self::Regex(Regex::new(pattern)?))
    }

    /// "String containing" pattern
    #[must_use]
    pub fn string_containing(needle: impl Into<String>) -> Self {
        Self::StringContaining(needle.into())
    }

    /// Check an observed value against this expected value
    #[must_use]
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            Self::Eq(expected) => expected == actual,
            Self::Regex(re) => actual.as_str().is_some_and(|s| re.is_match(s)),
            Self::StringContaining(needle) => {
                actual.as_str().is_some_and(|s| s.contains(needle.as_str()))
            }
            Self::ObjectContaining(expected) => actual.as_object().is_some_and(|obj| {
                expected
                    .iter()
                    .all(|(k, v)| obj.get(k).is_some_and(|actual_v| actual_v == v))
            }),
            Self::ArrayContaining(expected) => actual.as_array().is_some_and(|items| {
                expected
                    .iter()
                    .all(|e| items.iter().any(|item| e.matches(item)))
            }),
            Self::Any => true,
        }
    }

    /// Render the expected value for diff output.
    ///
    /// Literals render as themselves; pattern objects render as a labeled
    /// string so a failed diff names the pattern instead of showing nothing.
    #[must_use]
    pub fn render(&self) -> Value {
        match self {
            Self::Eq(v) => v.clone(),
            Self::Regex(re) => Value::String(format!("/{}/", re.as_str())),
            Self::StringContaining(s) => Value::String(format!("StringContaining {s:?}")),
            Self::ObjectContaining(map) => Value::Object(map.clone()),
            Self::ArrayContaining(items) => {
                Value::Array(items.iter().map(ExpectedValue::render).collect())
            }
            Self::Any => Value::String("Anything".to_string()),
        }
    }

    /// Expected string payload, when there is one (drives text normalization)
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Eq(Value::String(s)) | Self::StringContaining(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Deep equality between an observed value and an expected value.
///
/// Thin named wrapper so call sites read as the comparison they perform.
#[must_use]
pub fn deep_equals(actual: &Value, expected: &ExpectedValue) -> bool {
    expected.matches(actual)
}

/// Stringify a non-string observed value (the `asString` modifier)
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod literal {
        use super::*;

        #[test]
        fn test_scalar_equality() {
            assert!(ExpectedValue::eq(5).matches(&json!(5)));
            assert!(!ExpectedValue::eq(5).matches(&json!(6)));
            assert!(ExpectedValue::text("a").matches(&json!("a")));
        }

        #[test]
        fn test_structural_equality() {
            let expected = ExpectedValue::eq(json!({"a": [1, 2], "b": null}));
            assert!(expected.matches(&json!({"b": null, "a": [1, 2]})));
            assert!(!expected.matches(&json!({"a": [1], "b": null})));
        }
    }

    mod patterns {
        use super::*;

        #[test]
        fn test_regex() {
            let expected = ExpectedValue::regex("^foo.*bar$").unwrap();
            assert!(expected.matches(&json!("foo middle bar")));
            assert!(!expected.matches(&json!("bar foo")));
            assert!(!expected.matches(&json!(42)));
        }

        #[test]
        fn test_string_containing() {
            let expected = ExpectedValue::string_containing("tag");
            assert!(expected.matches(&json!("add-tags")));
            assert!(!expected.matches(&json!("remove")));
        }

        #[test]
        fn test_object_containing() {
            let Value::Object(map) = json!({"method": "POST"}) else {
                unreachable!()
            };
            let expected = ExpectedValue::ObjectContaining(map);
            assert!(expected.matches(&json!({"method": "POST", "url": "https://x"})));
            assert!(!expected.matches(&json!({"method": "GET"})));
        }

        #[test]
        fn test_array_containing() {
            let expected = ExpectedValue::ArrayContaining(vec![
                ExpectedValue::eq(1),
                ExpectedValue::string_containing("b"),
            ]);
            assert!(expected.matches(&json!([3, 1, "abc"])));
            assert!(!expected.matches(&json!([1, "xyz"])));
        }

        #[test]
        fn test_any() {
            assert!(ExpectedValue::Any.matches(&json!(null)));
            assert!(ExpectedValue::Any.matches(&json!({"a": 1})));
        }
    }

    mod rendering {
        use super::*;

        #[test]
        fn test_render_literal_is_identity() {
            assert_eq!(ExpectedValue::eq(json!([1, 2])).render(), json!([1, 2]));
        }

        #[test]
        fn test_render_patterns_are_labeled() {
            let re = ExpectedValue::regex("ab+").unwrap();
            assert_eq!(re.render(), json!("/ab+/"));
            assert_eq!(
                ExpectedValue::string_containing("x").render(),
                json!("StringContaining \"x\"")
            );
        }

        #[test]
        fn test_stringify() {
            assert_eq!(stringify(&json!("abc")), "abc");
            assert_eq!(stringify(&json!(42)), "42");
            assert_eq!(stringify(&json!(true)), "true");
        }
    }
}
