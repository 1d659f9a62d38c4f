//! Esperar: Polling Assertion Matchers for Browser-Automation Objects
//!
//! Esperar (Spanish: "to wait/expect") extends a host assertion framework
//! with matchers for remote element handles, element collections, and
//! network mocks. Remote state is eventually consistent, so every matcher
//! runs through one polling engine: an async condition is evaluated
//! repeatedly under a wall-clock deadline, per-element outcomes are
//! aggregated with negation-aware semantics, and failures render diff-style
//! two-part messages.
//!
//! # Architecture
//!
//! ```text
//! matcher (to_have_text, to_be_displayed, ...)
//!     │  builds a per-element check + message spec
//!     ▼
//! refetch ──► reduce ──► poll_until ──► AssertionResult
//! (stale       (per-element  (deadline loop,   (pass + lazy
//!  collections) AND, order-   single negation   message via the
//!               preserving)   fold)             diff formatter)
//! ```
//!
//! The remote automation client is a collaborator, consumed through the
//! [`subject::Element`] and [`mock::NetworkMock`] traits; this crate ships
//! no driver of its own.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapter;
pub mod assert;
pub mod format;
pub mod matchers;
pub mod mock;
pub mod options;
pub mod poll;
pub mod reduce;
pub mod refetch;
pub mod result;
pub mod subject;
pub mod value;

#[cfg(test)]
mod testkit;

pub use adapter::{BoxedMatcher, Comparator, ComparedResult, HostKind, Registry};
pub use assert::{AssertionContext, AssertionResult};
pub use format::MessageSpec;
pub use mock::{FilterValue, MockCall, NetworkMock, RequestFilter};
pub use options::{defaults, init_defaults, CountBound, Defaults, ExpectOpts, PollPolicy};
pub use poll::{poll_until, ConditionOutcome, PollOutcome};
pub use reduce::{collapse_singleton, reduce, Checked, Reduced};
pub use refetch::refetch_if_stale;
pub use result::{EsperarError, EsperarResult};
pub use subject::{
    Element, ElementList, ElementQuery, FindStrategy, Finder, PageRoot, Selector, Subject,
};
pub use value::{deep_equals, stringify, ExpectedValue};

/// Commonly used items for writing assertions against remote subjects
pub mod prelude {
    pub use crate::assert::{AssertionContext, AssertionResult};
    pub use crate::matchers::content::{
        to_have_attribute, to_have_children, to_have_element_class, to_have_property,
        to_have_text, to_have_value,
    };
    pub use crate::matchers::requested::{
        to_be_requested, to_be_requested_times, to_be_requested_with,
        to_be_requested_with_response,
    };
    pub use crate::matchers::state::{
        to_be_clickable, to_be_displayed, to_be_enabled, to_be_focused, to_be_selected, to_exist,
    };
    pub use crate::mock::{FilterValue, NetworkMock, RequestFilter};
    pub use crate::options::{CountBound, ExpectOpts};
    pub use crate::result::{EsperarError, EsperarResult};
    pub use crate::subject::{Element, Subject};
    pub use crate::value::ExpectedValue;
}
