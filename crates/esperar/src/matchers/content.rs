//! Element content matchers: text, attribute, property, value, class,
//! children count.
//!
//! Text comparison honors the option modifiers: `trim` (text defaults to
//! trimming), `ignore_case`, `containing`, and `as_string`. The observed
//! value shown in the diff is the trimmed original-case string; case folding
//! applies only to the comparison.

use futures::FutureExt;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::assert::{build, AssertionContext, AssertionResult};
use crate::format::MessageSpec;
use crate::matchers::poll_elements;
use crate::options::{CountBound, ExpectOpts};
use crate::reduce::Checked;
use crate::result::EsperarResult;
use crate::subject::{Element, ElementQuery, Selector, Subject};
use crate::value::{stringify, ExpectedValue};

/// Compare an observed string against an expected value under the option
/// modifiers. `containing` (or a string-containing pattern) switches string
/// expectations to substring matching.
fn text_matches(actual: &str, expected: &ExpectedValue, opts: &ExpectOpts) -> bool {
    match expected.as_text() {
        Some(text) => {
            let (actual, text) = if opts.ignore_case {
                (actual.to_lowercase(), text.to_lowercase())
            } else {
                (actual.to_string(), text.to_string())
            };
            if opts.containing || matches!(expected, ExpectedValue::StringContaining(_)) {
                actual.contains(&text)
            } else {
                actual == text
            }
        }
        None => {
            let probe = if opts.ignore_case {
                actual.to_lowercase()
            } else {
                actual.to_string()
            };
            expected.matches(&Value::String(probe))
        }
    }
}

/// Expect the element(s) to have the given visible text.
///
/// Observed text is trimmed before comparison unless `trim: false`.
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_have_text(
    subject: &Subject,
    ctx: &AssertionContext,
    expected: ExpectedValue,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    let opts = opts.with_defaults();
    let trim = opts.trim_or(true);
    let check = {
        let expected = expected.clone();
        let opts = opts.clone();
        move |el: Arc<dyn Element>| {
            let expected = expected.clone();
            let opts = opts.clone();
            async move {
                let raw = el.get_text().await?;
                let shown = if trim { raw.trim().to_string() } else { raw };
                let ok = text_matches(&shown, &expected, &opts);
                Ok(Checked::new(ok, Value::String(shown)))
            }
            .boxed()
        }
    };
    let polled = poll_elements(subject, ctx.is_not, &opts, &check).await?;
    let spec = MessageSpec::new(subject.describe(), "have", "text")
        .negated(ctx.is_not)
        .containing(opts.containing);
    Ok(build(polled.pass, spec, expected.render(), polled.received, &opts))
}

/// Expect the element(s) to have an attribute, optionally with a value.
///
/// With `expected == None` the assertion checks bare presence.
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_have_attribute(
    subject: &Subject,
    ctx: &AssertionContext,
    name: &str,
    expected: Option<ExpectedValue>,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    let opts = opts.with_defaults();
    let check = {
        let name = name.to_string();
        let expected = expected.clone();
        let opts = opts.clone();
        move |el: Arc<dyn Element>| {
            let name = name.clone();
            let expected = expected.clone();
            let opts = opts.clone();
            async move {
                let attr = el.get_attribute(&name).await?;
                match (&expected, attr) {
                    (None, attr) => Ok(Checked::new(attr.is_some(), Value::Bool(attr.is_some()))),
                    (Some(expected), Some(attr)) => {
                        let ok = text_matches(&attr, expected, &opts);
                        Ok(Checked::new(ok, Value::String(attr)))
                    }
                    (Some(_), None) => Ok(Checked::new(false, Value::Null)),
                }
            }
            .boxed()
        }
    };
    let polled = poll_elements(subject, ctx.is_not, &opts, &check).await?;
    let spec = MessageSpec::new(subject.describe(), "have", "attribute")
        .negated(ctx.is_not)
        .containing(opts.containing)
        .with_extra_label(format!("{name:?}"));
    let rendered = expected.map_or(Value::Bool(true), |e| e.render());
    Ok(build(polled.pass, spec, rendered, polled.received, &opts))
}

/// Expect the element(s) to have a DOM property, optionally with a value.
///
/// `as_string` stringifies the observed property before comparison.
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_have_property(
    subject: &Subject,
    ctx: &AssertionContext,
    name: &str,
    expected: Option<ExpectedValue>,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    let opts = opts.with_defaults();
    let check = {
        let name = name.to_string();
        let expected = expected.clone();
        let opts = opts.clone();
        move |el: Arc<dyn Element>| {
            let name = name.clone();
            let expected = expected.clone();
            let opts = opts.clone();
            async move {
                let mut observed = el.get_property(&name).await?;
                if opts.as_string {
                    observed = Value::String(stringify(&observed));
                }
                let ok = match &expected {
                    None => !observed.is_null(),
                    Some(expected) => match observed.as_str() {
                        Some(s) => text_matches(s, expected, &opts),
                        None => expected.matches(&observed),
                    },
                };
                Ok(Checked::new(ok, observed))
            }
            .boxed()
        }
    };
    let polled = poll_elements(subject, ctx.is_not, &opts, &check).await?;
    let spec = MessageSpec::new(subject.describe(), "have", "property")
        .negated(ctx.is_not)
        .containing(opts.containing)
        .with_extra_label(format!("{name:?}"));
    let rendered = expected.map_or_else(|| Value::String("any value".to_string()), |e| e.render());
    Ok(build(polled.pass, spec, rendered, polled.received, &opts))
}

/// Expect the element(s) to have the given form value.
///
/// Unlike text, the value is not trimmed by default.
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_have_value(
    subject: &Subject,
    ctx: &AssertionContext,
    expected: ExpectedValue,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    let opts = opts.with_defaults();
    let trim = opts.trim_or(false);
    let check = {
        let expected = expected.clone();
        let opts = opts.clone();
        move |el: Arc<dyn Element>| {
            let expected = expected.clone();
            let opts = opts.clone();
            async move {
                let raw = el.get_value().await?;
                let shown = if trim { raw.trim().to_string() } else { raw };
                let ok = text_matches(&shown, &expected, &opts);
                Ok(Checked::new(ok, Value::String(shown)))
            }
            .boxed()
        }
    };
    let polled = poll_elements(subject, ctx.is_not, &opts, &check).await?;
    let spec = MessageSpec::new(subject.describe(), "have", "value")
        .negated(ctx.is_not)
        .containing(opts.containing);
    Ok(build(polled.pass, spec, expected.render(), polled.received, &opts))
}

/// Expect the element(s) to carry the given class token.
///
/// The `class` attribute is split on whitespace; the expectation must match
/// one whole token (or a substring of one with `containing`).
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_have_element_class(
    subject: &Subject,
    ctx: &AssertionContext,
    expected: ExpectedValue,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    let opts = opts.with_defaults();
    let check = {
        let expected = expected.clone();
        let opts = opts.clone();
        move |el: Arc<dyn Element>| {
            let expected = expected.clone();
            let opts = opts.clone();
            async move {
                let classes = el.get_attribute("class").await?.unwrap_or_default();
                let ok = classes
                    .split_whitespace()
                    .any(|token| text_matches(token, &expected, &opts));
                Ok(Checked::new(ok, Value::String(classes)))
            }
            .boxed()
        }
    };
    let polled = poll_elements(subject, ctx.is_not, &opts, &check).await?;
    let spec = MessageSpec::new(subject.describe(), "have", "class")
        .negated(ctx.is_not)
        .containing(opts.containing);
    Ok(build(polled.pass, spec, expected.render(), polled.received, &opts))
}

/// Expect each element to have a child count within the bound.
///
/// Children are counted per element with a fresh `./*` query on every
/// attempt, so an element that starts childless keeps polling as long as the
/// subject itself is non-empty.
///
/// # Errors
///
/// Remote read errors per the polling rules.
pub async fn to_have_children(
    subject: &Subject,
    ctx: &AssertionContext,
    bound: CountBound,
    opts: ExpectOpts,
) -> EsperarResult<AssertionResult> {
    let opts = opts.with_defaults();
    let check = move |el: Arc<dyn Element>| {
        async move {
            let query = ElementQuery::all(Selector::xpath("./*"));
            let count = el.find_all(&query).await?.len() as u64;
            Ok(Checked::new(bound.matches(count), json!(count)))
        }
        .boxed()
    };
    let polled = poll_elements(subject, ctx.is_not, &opts, &check).await?;
    let spec = MessageSpec::new(subject.describe(), "have", "children").negated(ctx.is_not);
    Ok(build(
        polled.pass,
        spec,
        Value::String(bound.to_string()),
        polled.received,
        &opts,
    ))
}
