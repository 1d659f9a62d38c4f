//! Assertion results and the explicit assertion context.
//!
//! Negation is folded exactly once, by the poller; the builder takes the
//! poller's boolean as-is. The failure message is a lazy closure so value
//! stringification never runs on the success path.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::format::{format_message, MessageSpec};
use crate::options::ExpectOpts;

/// Explicit per-assertion context, threaded through every matcher call.
///
/// Replaces implicit call-receiver state: a matcher invoked without a
/// context gets the default (non-negated) one instead of inheriting ambient
/// globals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssertionContext {
    /// The assertion tests for absence of the state
    pub is_not: bool,
}

impl AssertionContext {
    /// Context for a plain assertion
    #[must_use]
    pub const fn new() -> Self {
        Self { is_not: false }
    }

    /// Context for a negated (`.not`) assertion
    #[must_use]
    pub const fn negated() -> Self {
        Self { is_not: true }
    }

    /// Normalize an optional context, defaulting rather than leaking
    /// whatever the host happened to bind
    #[must_use]
    pub fn normalize(context: Option<Self>) -> Self {
        context.unwrap_or_default()
    }
}

/// The result contract every matcher returns: pass plus a lazy message
#[derive(Clone)]
pub struct AssertionResult {
    pass: bool,
    message: Arc<dyn Fn() -> String + Send + Sync>,
}

impl AssertionResult {
    /// Build a result from a pass flag and a lazy message producer
    pub fn new(pass: bool, message: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Self {
            pass,
            message: Arc::new(message),
        }
    }

    /// Whether the (negation-folded) condition held
    #[must_use]
    pub const fn pass(&self) -> bool {
        self.pass
    }

    /// Render the failure message (evaluated on demand)
    #[must_use]
    pub fn message(&self) -> String {
        (self.message)()
    }
}

impl fmt::Debug for AssertionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionResult")
            .field("pass", &self.pass)
            .finish_non_exhaustive()
    }
}

/// Combine a poll result with the message ingredients.
///
/// `pass` is the poller's already negation-folded boolean; no inversion
/// happens here. The message closure owns clones of its inputs so the
/// result can outlive the assertion call.
#[must_use]
pub fn build(
    pass: bool,
    spec: MessageSpec,
    expected: Value,
    actual: Value,
    opts: &ExpectOpts,
) -> AssertionResult {
    let opts = opts.clone();
    AssertionResult::new(pass, move || {
        format_message(&spec, &expected, &actual, &opts)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_context_normalize_defaults_instead_of_leaking() {
        assert_eq!(AssertionContext::normalize(None), AssertionContext::new());
        assert_eq!(
            AssertionContext::normalize(Some(AssertionContext::negated())),
            AssertionContext::negated()
        );
    }

    #[test]
    fn test_message_is_lazy() {
        let rendered = Arc::new(AtomicUsize::new(0));
        let rendered_clone = Arc::clone(&rendered);
        let result = AssertionResult::new(true, move || {
            rendered_clone.fetch_add(1, Ordering::SeqCst);
            "never read on the success path".to_string()
        });
        assert!(result.pass());
        assert_eq!(rendered.load(Ordering::SeqCst), 0);
        let _ = result.message();
        assert_eq!(rendered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_build_does_not_reapply_negation() {
        let spec = MessageSpec::new("$(`.a`)", "be", "displayed").negated(true);
        let result = build(
            true,
            spec,
            json!(true),
            json!(true),
            &ExpectOpts::new(),
        );
        // the poller already folded `.not`; build passes it through
        assert!(result.pass());
        assert!(result.message().contains("not to be displayed"));
    }
}
