//! Network-mock matchers: call counts and recorded-call filters.
//!
//! Mocks poll the same way elements do, but there is no refetch step: the
//! mock re-reads its recorded calls on every attempt. The requested-with
//! family never waits when negated (`wait` is forced to 0 under `.not`),
//! matching the established behavior for proving the absence of a call.

use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::assert::{build, AssertionContext, AssertionResult};
use crate::format::MessageSpec;
use crate::mock::{MockCall, NetworkMock, RequestFilter};
use crate::options::{CountBound, ExpectOpts};
use crate::poll::{poll_until, ConditionOutcome};
use crate::reduce::collapse_singleton;
use crate::result::EsperarResult;

/// Received-value placeholder when the mock recorded no calls
pub(crate) const NO_CALLS: &str = "was not called";

/// Expect the mock to have been requested at least once
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_be_requested(
    mock: &dyn NetworkMock,
    ctx: &AssertionContext,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    count_calls(mock, ctx, CountBound::at_least(1), opts, "").await
}

/// Expect the mock's recorded call count to satisfy the bound
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_be_requested_times(
    mock: &dyn NetworkMock,
    ctx: &AssertionContext,
    bound: CountBound,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    let label = format!("{bound} times");
    count_calls(mock, ctx, bound, opts, &label).await
}

async fn count_calls(
    mock: &dyn NetworkMock,
    ctx: &AssertionContext,
    bound: CountBound,
    opts: ExpectOpts,
    extra_label: &str,
) -> EsperarResult<AssertionResult> {
    let opts = opts.with_defaults();
    let policy = opts.poll_policy();
    let observed = Arc::new(Mutex::new(0_u64));

    let pass = poll_until(
        || {
            let observed = Arc::clone(&observed);
            async move {
                let count = mock.calls().await?.len() as u64;
                *observed.lock().await = count;
                Ok(ConditionOutcome::Bool(bound.matches(count)))
            }
            .boxed()
        },
        ctx.is_not,
        &policy,
    )
    .await?;

    let count = *observed.lock().await;
    let spec = MessageSpec::new(mock.describe(), "be", "requested")
        .negated(ctx.is_not)
        .with_extra_label(extra_label);
    Ok(build(
        pass,
        spec,
        Value::String(bound.to_string()),
        Value::from(count),
        &opts,
    ))
}

/// Expect some recorded call to satisfy the request filter.
///
/// Under `.not` the wait budget is forced to 0: absence of a call is proven
/// with a single attempt, never awaited.
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_be_requested_with(
    mock: &dyn NetworkMock,
    ctx: &AssertionContext,
    filter: RequestFilter,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    filter_calls(mock, ctx, filter, opts, "requested with").await
}

/// Expect some recorded call to satisfy a filter over request and response
/// fields.
///
/// Shares the forced single attempt under `.not` with
/// [`to_be_requested_with`].
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_be_requested_with_response(
    mock: &dyn NetworkMock,
    ctx: &AssertionContext,
    filter: RequestFilter,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    filter_calls(mock, ctx, filter, opts, "requested with response").await
}

async fn filter_calls(
    mock: &dyn NetworkMock,
    ctx: &AssertionContext,
    filter: RequestFilter,
    opts: ExpectOpts,
    expectation: &str,
) -> EsperarResult<AssertionResult> {
    let mut opts = opts.with_defaults();
    if ctx.is_not {
        opts.wait = Some(0);
    }
    let policy = opts.poll_policy();
    let observed: Arc<Mutex<Value>> = Arc::new(Mutex::new(Value::String(NO_CALLS.to_string())));

    let pass = poll_until(
        || {
            let observed = Arc::clone(&observed);
            let filter = &filter;
            async move {
                let calls = mock.calls().await?;
                let matched = calls.iter().find(|call| filter.matches(call));
                *observed.lock().await = render_calls(&calls, matched);
                Ok(ConditionOutcome::Bool(matched.is_some()))
            }
            .boxed()
        },
        ctx.is_not,
        &policy,
    )
    .await?;

    let received = observed.lock().await.clone();
    let spec = MessageSpec::new(mock.describe(), "be", expectation).negated(ctx.is_not);
    Ok(build(pass, spec, filter.render(), received, &opts))
}

/// The received side of the diff: the matching call when there is one, all
/// recorded calls (collapsed) when none matched, a placeholder when the mock
/// was never called.
fn render_calls(calls: &[MockCall], matched: Option<&MockCall>) -> Value {
    if let Some(call) = matched {
        return call.render();
    }
    collapse_singleton(calls.iter().map(MockCall::render).collect())
        .unwrap_or_else(|| Value::String(NO_CALLS.to_string()))
}
