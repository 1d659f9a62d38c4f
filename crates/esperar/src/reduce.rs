//! Collection Reducer.
//!
//! Evaluates a per-element async condition over an ordered sequence of
//! remote elements and reduces the results into one [`PollOutcome`], keeping
//! the observed values for diff rendering. The reducer does not know about
//! negation; the caller passes the target truth value for this assertion's
//! framing and the poller owns the negation fold.

use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

use crate::poll::PollOutcome;
use crate::result::EsperarResult;
use crate::subject::Element;

/// One element's condition result plus the observed value it was based on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checked {
    /// Whether the raw condition held for this element
    pub result: bool,
    /// The observed value used for comparison
    pub value: Value,
}

impl Checked {
    /// Build a checked result
    #[must_use]
    pub const fn new(result: bool, value: Value) -> Self {
        Self { result, value }
    }
}

/// Aggregated reduction over a collection for one poll attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduced {
    /// Per-element outcome handed to the poller
    pub outcome: PollOutcome,
    /// Observed values collapsed for diff rendering (None for empty input)
    pub received: Option<Value>,
}

/// Evaluate `condition` for every element, in input order, and reduce.
///
/// `target` is the truth value each raw result must equal for the attempt to
/// count as success (`true` for a plain assertion, `false` when the caller
/// has chosen the negated framing). Result order always matches input order
/// so diff rendering lines up positionally with the subject collection.
///
/// An empty input short-circuits: the condition is never invoked and the
/// outcome is the terminal empty [`PollOutcome`].
///
/// # Errors
///
/// Propagates the first element read error; the poller decides whether to
/// tolerate it.
pub async fn reduce<'a, F>(
    elements: &'a [Arc<dyn Element>],
    condition: F,
    target: bool,
) -> EsperarResult<Reduced>
where
    F: Fn(Arc<dyn Element>) -> BoxFuture<'a, EsperarResult<Checked>>,
{
    if elements.is_empty() {
        return Ok(Reduced {
            outcome: PollOutcome::empty(),
            received: None,
        });
    }

    let mut per_element = Vec::with_capacity(elements.len());
    let mut values = Vec::with_capacity(elements.len());
    for element in elements {
        let checked = condition(Arc::clone(element)).await?;
        per_element.push(checked.result == target);
        values.push(checked.value);
    }

    let success = per_element.iter().all(|&matched| matched);
    Ok(Reduced {
        outcome: PollOutcome {
            success,
            per_element,
        },
        received: collapse_singleton(values),
    })
}

/// De-duplicate observed values (keeping first-occurrence order) and unwrap
/// a single distinct value to a bare scalar.
///
/// This drives scalar-vs-array diff rendering: a collection whose elements
/// all observed the same value reads as one value, while disagreeing
/// elements render as an ordered array that preserves their positions.
#[must_use]
pub fn collapse_singleton(values: Vec<Value>) -> Option<Value> {
    let mut distinct: Vec<Value> = Vec::with_capacity(values.len());
    for value in values {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }
    match distinct.len() {
        0 => None,
        1 => distinct.pop(),
        _ => Some(Value::Array(distinct)),
    }
}
