//! Assertion options and process-wide defaults.
//!
//! Options are read once at matcher entry and stay immutable for the
//! duration of one assertion call. The process-wide defaults are set at most
//! once and merged in through the pure [`ExpectOpts::with_defaults`].

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

/// Default wait budget for polling assertions (3 seconds)
pub const DEFAULT_WAIT_MS: u64 = 3_000;

/// Default interval between poll attempts (100ms)
pub const DEFAULT_INTERVAL_MS: u64 = 100;

/// Process-lifetime polling defaults, initialized at most once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    /// Wait budget in milliseconds (0 = single attempt)
    pub wait_ms: u64,
    /// Interval between attempts in milliseconds
    pub interval_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            wait_ms: DEFAULT_WAIT_MS,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

static DEFAULTS: OnceLock<Defaults> = OnceLock::new();

/// Install process-wide defaults. Returns false if defaults were already set.
pub fn init_defaults(defaults: Defaults) -> bool {
    DEFAULTS.set(defaults).is_ok()
}

/// Get the process-wide defaults (built-in values if never initialized)
#[must_use]
pub fn defaults() -> Defaults {
    DEFAULTS.get().copied().unwrap_or_default()
}

/// Deadline/interval policy for one assertion call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait budget in milliseconds (0 = single attempt, no retry)
    pub wait_ms: u64,
    /// Interval between attempts in milliseconds (ignored when wait is 0)
    pub interval_ms: u64,
}

impl PollPolicy {
    /// Wait budget as a Duration
    #[must_use]
    pub const fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }

    /// Poll interval as a Duration
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// True when this policy allows exactly one attempt
    #[must_use]
    pub const fn is_single_attempt(&self) -> bool {
        self.wait_ms == 0
    }
}

/// Options accepted by every matcher.
///
/// `wait`/`interval` drive the poller; the remaining fields are comparison
/// modifiers consumed by the per-matcher condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectOpts {
    /// Milliseconds to keep polling (None = process default, 0 = single attempt)
    pub wait: Option<u64>,
    /// Milliseconds between attempts (None = process default)
    pub interval: Option<u64>,
    /// Caller-supplied text prepended to the generated message
    pub message: Option<String>,
    /// When set together with `message`, only the custom message is rendered
    pub suppress_default_message: bool,
    /// Substring / membership comparison instead of equality
    pub containing: bool,
    /// Case-insensitive string comparison
    pub ignore_case: bool,
    /// Trim observed text before comparing (text matchers default to true)
    pub trim: Option<bool>,
    /// Stringify non-string observed values before comparing
    pub as_string: bool,
}

impl ExpectOpts {
    /// Create options with every field unset
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wait budget in milliseconds
    #[must_use]
    pub const fn with_wait(mut self, wait_ms: u64) -> Self {
        self.wait = Some(wait_ms);
        self
    }

    /// Set the poll interval in milliseconds
    #[must_use]
    pub const fn with_interval(mut self, interval_ms: u64) -> Self {
        self.interval = Some(interval_ms);
        self
    }

    /// Set the custom message prefix
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Replace the generated message with the custom one entirely
    #[must_use]
    pub const fn suppressing_default_message(mut self) -> Self {
        self.suppress_default_message = true;
        self
    }

    /// Enable substring / membership comparison
    #[must_use]
    pub const fn containing(mut self) -> Self {
        self.containing = true;
        self
    }

    /// Enable case-insensitive comparison
    #[must_use]
    pub const fn ignoring_case(mut self) -> Self {
        self.ignore_case = true;
        self
    }

    /// Control trimming of observed text
    #[must_use]
    pub const fn with_trim(mut self, trim: bool) -> Self {
        self.trim = Some(trim);
        self
    }

    /// Stringify non-string observed values before comparing
    #[must_use]
    pub const fn as_string(mut self) -> Self {
        self.as_string = true;
        self
    }

    /// Pure merge of process defaults into unset wait/interval fields
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        let d = defaults();
        self.wait = Some(self.wait.unwrap_or(d.wait_ms));
        self.interval = Some(self.interval.unwrap_or(d.interval_ms));
        self
    }

    /// Effective wait budget in milliseconds
    #[must_use]
    pub fn wait_ms(&self) -> u64 {
        self.wait.unwrap_or_else(|| defaults().wait_ms)
    }

    /// Effective poll interval in milliseconds
    #[must_use]
    pub fn interval_ms(&self) -> u64 {
        self.interval.unwrap_or_else(|| defaults().interval_ms)
    }

    /// Effective trim flag (text matchers default to trimming)
    #[must_use]
    pub fn trim_or(&self, default: bool) -> bool {
        self.trim.unwrap_or(default)
    }

    /// Poll policy for this call, with defaults folded in
    #[must_use]
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            wait_ms: self.wait_ms(),
            interval_ms: self.interval_ms(),
        }
    }
}

/// Bounds on a count (children, recorded mock calls)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountBound {
    /// Exact count
    pub eq: Option<u64>,
    /// Inclusive lower bound
    pub gte: Option<u64>,
    /// Inclusive upper bound
    pub lte: Option<u64>,
}

impl CountBound {
    /// Exact count
    #[must_use]
    pub const fn exactly(n: u64) -> Self {
        Self {
            eq: Some(n),
            gte: None,
            lte: None,
        }
    }

    /// Inclusive lower bound
    #[must_use]
    pub const fn at_least(n: u64) -> Self {
        Self {
            eq: None,
            gte: Some(n),
            lte: None,
        }
    }

    /// Inclusive upper bound
    #[must_use]
    pub const fn at_most(n: u64) -> Self {
        Self {
            eq: None,
            gte: None,
            lte: Some(n),
        }
    }

    /// Combine with an upper bound
    #[must_use]
    pub const fn and_at_most(mut self, n: u64) -> Self {
        self.lte = Some(n);
        self
    }

    /// Check a count against the bound. An empty bound means "at least one".
    #[must_use]
    pub fn matches(&self, count: u64) -> bool {
        if let Some(eq) = self.eq {
            return count == eq;
        }
        if self.gte.is_none() && self.lte.is_none() {
            return count >= 1;
        }
        self.gte.map_or(true, |n| count >= n) && self.lte.map_or(true, |n| count <= n)
    }
}

impl std::fmt::Display for CountBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(eq) = self.eq {
            return write!(f, "{eq}");
        }
        match (self.gte, self.lte) {
            (Some(g), Some(l)) => write!(f, ">= {g} && <= {l}"),
            (Some(g), None) => write!(f, ">= {g}"),
            (None, Some(l)) => write!(f, "<= {l}"),
            (None, None) => write!(f, ">= 1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod expect_opts {
        use super::*;

        #[test]
        fn test_defaults_unset() {
            let opts = ExpectOpts::new();
            assert_eq!(opts.wait, None);
            assert_eq!(opts.wait_ms(), DEFAULT_WAIT_MS);
            assert_eq!(opts.interval_ms(), DEFAULT_INTERVAL_MS);
        }

        #[test]
        fn test_with_defaults_is_pure_merge() {
            let opts = ExpectOpts::new().with_wait(0).with_defaults();
            assert_eq!(opts.wait, Some(0));
            assert_eq!(opts.interval, Some(DEFAULT_INTERVAL_MS));
        }

        #[test]
        fn test_builder_chain() {
            let opts = ExpectOpts::new()
                .with_wait(500)
                .with_interval(25)
                .with_message("custom")
                .containing()
                .ignoring_case()
                .with_trim(false)
                .as_string();
            assert_eq!(opts.wait_ms(), 500);
            assert_eq!(opts.interval_ms(), 25);
            assert_eq!(opts.message.as_deref(), Some("custom"));
            assert!(opts.containing);
            assert!(opts.ignore_case);
            assert_eq!(opts.trim, Some(false));
            assert!(opts.as_string);
        }

        #[test]
        fn test_poll_policy_single_attempt() {
            let policy = ExpectOpts::new().with_wait(0).poll_policy();
            assert!(policy.is_single_attempt());
        }

        #[test]
        fn test_trim_default_for_text() {
            assert!(ExpectOpts::new().trim_or(true));
            assert!(!ExpectOpts::new().with_trim(false).trim_or(true));
        }
    }

    mod count_bound {
        use super::*;

        #[test]
        fn test_exactly() {
            let bound = CountBound::exactly(2);
            assert!(bound.matches(2));
            assert!(!bound.matches(1));
            assert_eq!(bound.to_string(), "2");
        }

        #[test]
        fn test_at_most() {
            let bound = CountBound::at_most(1);
            assert!(bound.matches(0));
            assert!(bound.matches(1));
            assert!(!bound.matches(2));
            assert_eq!(bound.to_string(), "<= 1");
        }

        #[test]
        fn test_at_least() {
            let bound = CountBound::at_least(1);
            assert!(!bound.matches(0));
            assert!(bound.matches(3));
            assert_eq!(bound.to_string(), ">= 1");
        }

        #[test]
        fn test_range() {
            let bound = CountBound::at_least(1).and_at_most(3);
            assert!(bound.matches(2));
            assert!(!bound.matches(4));
            assert_eq!(bound.to_string(), ">= 1 && <= 3");
        }

        #[test]
        fn test_empty_bound_means_at_least_one() {
            let bound = CountBound::default();
            assert!(!bound.matches(0));
            assert!(bound.matches(1));
            assert_eq!(bound.to_string(), ">= 1");
        }
    }
}
