//! Remote-Collection Refetcher.
//!
//! Element collections can change size between poll attempts. When a
//! collection resolved to zero elements and a wait budget remains, the
//! original query is re-issued against the same parent with the same
//! selector, strategy, and props, so the fresh collection is structurally
//! equivalent and later message rendering keeps the original path.

use std::sync::Arc;

use crate::result::EsperarResult;
use crate::subject::ElementList;

/// Re-resolve a collection when it is stale.
///
/// Triggers only when `wait_ms > 0` and the collection is empty (or `force`
/// requests a full refetch). Single-attempt assertions (`wait == 0`) never
/// pay the refetch cost and take the subject as-is.
///
/// # Errors
///
/// Propagates query errors to the poller's per-attempt handling: tolerated
/// while retrying, fatal for single-attempt calls.
pub async fn refetch_if_stale(
    list: &ElementList,
    wait_ms: u64,
    force: bool,
) -> EsperarResult<ElementList> {
    if wait_ms == 0 || (!list.is_empty() && !force) {
        return Ok(list.clone());
    }
    let items = list.parent().find_all(list.query()).await?;
    Ok(ElementList::new(
        items,
        list.query().clone(),
        Arc::clone(list.parent()),
    ))
}
