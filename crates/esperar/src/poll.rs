//! Condition Poller.
//!
//! Repeatedly evaluates an async condition under a wall-clock deadline,
//! tolerating transient errors between attempts. Negation is owned here and
//! applied exactly once: waiting for absence flips the success test, not the
//! condition itself, so "wait for the dialog to disappear" reuses the same
//! loop as "wait for the button to appear".

use futures::future::BoxFuture;
use tokio::time::Instant;

use crate::options::PollPolicy;
use crate::result::{EsperarError, EsperarResult};

/// Aggregated outcome of evaluating a condition over a collection in one attempt.
///
/// `per_element` entries record, in input order, whether each element
/// satisfied the framing the caller chose for this assertion (see
/// [`crate::reduce::reduce`]); `success` is their conjunction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    /// True only if every element satisfied the condition
    pub success: bool,
    /// Per-element results, in input order
    pub per_element: Vec<bool>,
}

impl PollOutcome {
    /// Outcome over an empty collection (never retried, never successful)
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            success: false,
            per_element: Vec::new(),
        }
    }
}

/// What a poll condition yields per attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionOutcome {
    /// Single boolean condition
    Bool(bool),
    /// Aggregated per-collection outcome
    Outcome(PollOutcome),
}

/// One attempt's outcome folded into loop-control terms
struct Folded {
    /// The externally visible boolean, negation already applied
    value: bool,
    /// Stop the loop (success for this framing)
    stop: bool,
    /// Terminal regardless of remaining wait budget (empty collection)
    terminal: bool,
}

fn fold(outcome: ConditionOutcome, negate: bool) -> Folded {
    match outcome {
        ConditionOutcome::Bool(b) => {
            let value = negate != b;
            Folded {
                value,
                stop: value,
                terminal: false,
            }
        }
        ConditionOutcome::Outcome(po) => {
            if po.per_element.is_empty() {
                // An empty collection can never satisfy a presence check, so
                // the un-negated condition value is false; the single
                // negation fold still applies on the way out.
                Folded {
                    value: negate,
                    stop: true,
                    terminal: true,
                }
            } else {
                Folded {
                    value: po.success,
                    stop: po.success,
                    terminal: false,
                }
            }
        }
    }
}

/// Poll `condition` until it succeeds (under the given negation framing) or
/// the wait budget elapses.
///
/// - `wait == 0`: exactly one attempt; errors propagate immediately.
/// - `wait > 0`: errors are remembered and retried; if the deadline passes
///   and the last attempt still errored, that error is returned instead of a
///   generic timeout.
/// - An empty-collection outcome is terminal on any attempt: no retry, even
///   with budget remaining.
/// - The interval sleep runs only between attempts, never before the first
///   or after the terminating one.
///
/// # Errors
///
/// Returns the condition's error for single-attempt calls, or the final
/// attempt's error when polling ends while the condition is still failing
/// with an error.
pub async fn poll_until<'a, F>(
    condition: F,
    negate: bool,
    policy: &PollPolicy,
) -> EsperarResult<bool>
where
    F: Fn() -> BoxFuture<'a, EsperarResult<ConditionOutcome>> + 'a,
{
    if policy.is_single_attempt() {
        let outcome = condition().await?;
        return Ok(fold(outcome, negate).value);
    }

    let start = Instant::now();
    let deadline = policy.wait();
    let mut last_value = false;
    // assigned on every iteration before the deadline check can break
    let mut last_error: Option<EsperarError>;

    loop {
        match condition().await {
            Ok(outcome) => {
                let folded = fold(outcome, negate);
                if folded.terminal || folded.stop {
                    return Ok(folded.value);
                }
                last_value = folded.value;
                last_error = None;
            }
            Err(err) => {
                // Remote objects can be transiently unavailable; keep polling
                last_error = Some(err);
            }
        }

        if start.elapsed() >= deadline {
            break;
        }
        tokio::time::sleep(policy.interval()).await;
    }

    match last_error {
        Some(err) => Err(err),
        None => Ok(last_value),
    }
}
