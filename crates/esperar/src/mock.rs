//! Network mocks and recorded-call filters.
//!
//! A mock is a collaborator exposing the ordered sequence of request/response
//! records it has intercepted. Filters select calls by literal value, regex,
//! pattern, or membership in an allowed set. A malformed filter entry (wrong
//! value type for the field) is reported through a side-channel warning and
//! matches nothing, so the assertion fails gracefully instead of crashing.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::result::{EsperarError, EsperarResult};
use crate::value::ExpectedValue;

/// One recorded request/response pair on a network mock
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockCall {
    /// Request URL
    pub url: String,
    /// Request method
    pub method: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body
    pub post_data: Option<Value>,
    /// Response body
    pub body: Option<Value>,
    /// Response status code
    pub status_code: u16,
}

impl MockCall {
    /// Render the call for diff output
    #[must_use]
    pub fn render(&self) -> Value {
        json!({
            "url": self.url,
            "method": self.method,
            "headers": self.headers,
            "postData": self.post_data,
            "body": self.body,
            "statusCode": self.status_code,
        })
    }
}

/// A network mock exposing its recorded calls.
///
/// Reads are asynchronous and fallible like element reads; the poller
/// tolerates transient failures while a wait budget remains.
#[async_trait]
pub trait NetworkMock: Send + Sync + fmt::Debug {
    /// The ordered sequence of recorded calls, oldest first
    async fn calls(&self) -> EsperarResult<Vec<MockCall>>;

    /// Subject description for message headlines
    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// One filter entry: literal, regex, pattern object, or an allowed set
#[derive(Debug, Clone)]
pub enum FilterValue {
    /// Literal value, compared by deep equality
    Value(Value),
    /// Regex over the field's string form
    Regex(Regex),
    /// Pattern object carrying its own predicate
    Pattern(ExpectedValue),
    /// Membership in a set of allowed strings
    OneOf(Vec<String>),
}

impl FilterValue {
    /// Allowed-set filter from loosely typed values.
    ///
    /// # Errors
    ///
    /// [`EsperarError::InvalidFilter`] when an entry is not a string.
    pub fn one_of(values: &[Value]) -> EsperarResult<Self> {
        let mut set = Vec::with_capacity(values.len());
        for value in values {
            match value {
                Value::String(s) => set.push(s.clone()),
                other => {
                    return Err(EsperarError::InvalidFilter {
                        message: format!("allowed-set entries must be strings, got {other}"),
                    })
                }
            }
        }
        Ok(Self::OneOf(set))
    }

    /// Render the filter entry for the expected side of a diff
    #[must_use]
    pub fn render(&self) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Regex(re) => Value::String(format!("/{}/", re.as_str())),
            Self::Pattern(p) => p.render(),
            Self::OneOf(set) => Value::Array(set.iter().cloned().map(Value::String).collect()),
        }
    }

    /// Match a string field (url, method)
    fn matches_str(&self, actual: &str, field: &str) -> bool {
        match self {
            Self::Value(Value::String(expected)) => expected == actual,
            Self::Value(other) => {
                warn!(field, value = %other, "unsupported filter value type, treating as no match");
                false
            }
            Self::Regex(re) => re.is_match(actual),
            Self::Pattern(p) => p.matches(&Value::String(actual.to_string())),
            Self::OneOf(set) => set.iter().any(|allowed| allowed == actual),
        }
    }

    /// Match a structured field (headers, bodies, status code)
    fn matches_value(&self, actual: &Value, field: &str) -> bool {
        match self {
            Self::Value(expected) => expected == actual,
            Self::Regex(re) => actual.as_str().is_some_and(|s| re.is_match(s)),
            Self::Pattern(p) => p.matches(actual),
            Self::OneOf(_) => {
                warn!(field, "allowed-set filter on a structured field, treating as no match");
                false
            }
        }
    }
}

/// Filter over recorded calls for the requested-with matcher family.
///
/// Every set field must match; unset fields match anything.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    /// Request URL filter
    pub url: Option<FilterValue>,
    /// Request method filter
    pub method: Option<FilterValue>,
    /// Request headers filter
    pub headers: Option<FilterValue>,
    /// Request body filter
    pub post_data: Option<FilterValue>,
    /// Response body filter
    pub response: Option<FilterValue>,
    /// Response status code filter
    pub status_code: Option<FilterValue>,
}

impl RequestFilter {
    /// Empty filter, matching every call
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by request URL
    #[must_use]
    pub fn url(mut self, url: FilterValue) -> Self {
        self.url = Some(url);
        self
    }

    /// Filter by request method
    #[must_use]
    pub fn method(mut self, method: FilterValue) -> Self {
        self.method = Some(method);
        self
    }

    /// Filter by a set of allowed request methods
    #[must_use]
    pub fn methods(mut self, methods: &[&str]) -> Self {
        self.method = Some(FilterValue::OneOf(
            methods.iter().map(ToString::to_string).collect(),
        ));
        self
    }

    /// Filter by request headers
    #[must_use]
    pub fn headers(mut self, headers: FilterValue) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Filter by request body
    #[must_use]
    pub fn post_data(mut self, post_data: FilterValue) -> Self {
        self.post_data = Some(post_data);
        self
    }

    /// Filter by response body
    #[must_use]
    pub fn response(mut self, response: FilterValue) -> Self {
        self.response = Some(response);
        self
    }

    /// Filter by response status code
    #[must_use]
    pub fn status_code(mut self, code: u16) -> Self {
        self.status_code = Some(FilterValue::Value(json!(code)));
        self
    }

    /// Whether a recorded call satisfies every set field
    #[must_use]
    pub fn matches(&self, call: &MockCall) -> bool {
        if let Some(url) = &self.url {
            if !url.matches_str(&call.url, "url") {
                return false;
            }
        }
        if let Some(method) = &self.method {
            if !method.matches_str(&call.method, "method") {
                return false;
            }
        }
        if let Some(headers) = &self.headers {
            let actual = json!(call.headers);
            if !headers.matches_value(&actual, "headers") {
                return false;
            }
        }
        if let Some(post_data) = &self.post_data {
            let actual = call.post_data.clone().unwrap_or(Value::Null);
            if !post_data.matches_value(&actual, "postData") {
                return false;
            }
        }
        if let Some(response) = &self.response {
            let actual = call.body.clone().unwrap_or(Value::Null);
            if !response.matches_value(&actual, "response") {
                return false;
            }
        }
        if let Some(status_code) = &self.status_code {
            if !status_code.matches_value(&json!(call.status_code), "statusCode") {
                return false;
            }
        }
        true
    }

    /// Render the set fields for the expected side of a diff
    #[must_use]
    pub fn render(&self) -> Value {
        let mut map = serde_json::Map::new();
        let fields: [(&str, &Option<FilterValue>); 6] = [
            ("url", &self.url),
            ("method", &self.method),
            ("headers", &self.headers),
            ("postData", &self.post_data),
            ("response", &self.response),
            ("statusCode", &self.status_code),
        ];
        for (key, entry) in fields {
            if let Some(filter) = entry {
                map.insert(key.to_string(), filter.render());
            }
        }
        Value::Object(map)
    }
}
