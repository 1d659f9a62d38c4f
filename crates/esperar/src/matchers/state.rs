//! Element state matchers: displayed, enabled, selected, focused, clickable,
//! existing. All share one probe shape: read a boolean off the element and
//! expect it to be true (or false under `.not`).

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;

use crate::assert::{build, AssertionContext, AssertionResult};
use crate::format::MessageSpec;
use crate::matchers::poll_elements;
use crate::options::ExpectOpts;
use crate::reduce::Checked;
use crate::result::EsperarResult;
use crate::subject::{Element, Subject};

async fn probe_state<F>(
    subject: &Subject,
    ctx: &AssertionContext,
    opts: ExpectOpts,
    verb: &'static str,
    expectation: &'static str,
    read: F,
) -> EsperarResult<AssertionResult>
where
    F: Fn(Arc<dyn Element>) -> BoxFuture<'static, EsperarResult<bool>> + Sync,
{
    let opts = opts.with_defaults();
    let check = move |el: Arc<dyn Element>| {
        let state = read(el);
        async move {
            let raw = state.await?;
            Ok(Checked::new(raw, Value::Bool(raw)))
        }
        .boxed()
    };
    let polled = poll_elements(subject, ctx.is_not, &opts, &check).await?;
    let spec = MessageSpec::new(subject.describe(), verb, expectation).negated(ctx.is_not);
    Ok(build(
        polled.pass,
        spec,
        Value::Bool(true),
        polled.received,
        &opts,
    ))
}

/// Expect the element(s) to be displayed
///
/// # Errors
///
/// Remote read errors per the polling rules (propagated for `wait == 0`,
/// re-thrown when the deadline ends on an erroring attempt).
pub async fn to_be_displayed(
    subject: &Subject,
    ctx: &AssertionContext,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    probe_state(subject, ctx, opts, "be", "displayed", |el| {
        async move { el.is_displayed().await }.boxed()
    })
    .await
}

/// Expect the element(s) to be enabled
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_be_enabled(
    subject: &Subject,
    ctx: &AssertionContext,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    probe_state(subject, ctx, opts, "be", "enabled", |el| {
        async move { el.is_enabled().await }.boxed()
    })
    .await
}

/// Expect the element(s) to be selected/checked
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_be_selected(
    subject: &Subject,
    ctx: &AssertionContext,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    probe_state(subject, ctx, opts, "be", "selected", |el| {
        async move { el.is_selected().await }.boxed()
    })
    .await
}

/// Expect the element(s) to have focus
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_be_focused(
    subject: &Subject,
    ctx: &AssertionContext,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    probe_state(subject, ctx, opts, "be", "focused", |el| {
        async move { el.is_focused().await }.boxed()
    })
    .await
}

/// Expect the element(s) to be clickable
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_be_clickable(
    subject: &Subject,
    ctx: &AssertionContext,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    probe_state(subject, ctx, opts, "be", "clickable", |el| {
        async move { el.is_clickable().await }.boxed()
    })
    .await
}

/// Expect the element(s) to exist in the DOM
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_exist(
    subject: &Subject,
    ctx: &AssertionContext,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    probe_state(subject, ctx, opts, "exist", "", |el| {
        async move { el.is_existing().await }.boxed()
    })
    .await
}
