//! The matcher catalogue.
//!
//! Matchers are thin call-sites of the core engine: each one builds a
//! per-element check, runs it through the shared poll wiring, and assembles
//! the result message. State matchers live in [`state`], content matchers in
//! [`content`], network-mock matchers in [`requested`].

pub mod content;
pub mod requested;
pub mod state;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::options::ExpectOpts;
use crate::poll::{poll_until, ConditionOutcome};
use crate::reduce::{reduce, Checked};
use crate::refetch::refetch_if_stale;
use crate::result::EsperarResult;
use crate::subject::{Element, Subject};

/// Received-value placeholder when a collection resolved to zero elements
pub(crate) const NO_ELEMENTS: &str = "no elements found";

/// What one polled element assertion produced
pub(crate) struct Polled {
    /// Negation-folded pass flag from the poller
    pub pass: bool,
    /// Collapsed observed values for the diff body
    pub received: Value,
}

/// Shared wiring for every element matcher: per attempt, refetch a stale
/// collection, evaluate the check over each element in order, and hand the
/// aggregated outcome to the poller. The reducer folds the target framing
/// (`!is_not`); the poller applies negation only to the terminal
/// empty-collection case.
pub(crate) async fn poll_elements<C>(
    subject: &Subject,
    is_not: bool,
    opts: &ExpectOpts,
    check: &C,
) -> EsperarResult<Polled>
where
    C: Fn(Arc<dyn Element>) -> BoxFuture<'static, EsperarResult<Checked>> + Sync,
{
    let policy = opts.poll_policy();
    let target = !is_not;
    let received: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));

    let pass = poll_until(
        || {
            let received = Arc::clone(&received);
            async move {
                let elements = match subject {
                    Subject::Element(el) => vec![Arc::clone(el)],
                    Subject::Collection(list) => refetch_if_stale(list, policy.wait_ms, false)
                        .await?
                        .items()
                        .to_vec(),
                };
                let reduced = reduce(&elements, |el| check(el), target).await?;
                *received.lock().await = reduced.received;
                Ok(ConditionOutcome::Outcome(reduced.outcome))
            }
            .boxed()
        },
        is_not,
        &policy,
    )
    .await?;

    let received = received
        .lock()
        .await
        .take()
        .unwrap_or_else(|| Value::String(NO_ELEMENTS.to_string()));
    Ok(Polled { pass, received })
}
