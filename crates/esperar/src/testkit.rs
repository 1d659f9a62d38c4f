//! Scripted test doubles for the remote-automation client.
//!
//! Only compiled for tests. A [`FakeElement`] answers reads from fixed
//! values or from scripted per-call sequences; a [`FakeRoot`] replays
//! batches of query results so refetch behavior can be exercised.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::mock::{MockCall, NetworkMock};
use crate::result::{EsperarError, EsperarResult};
use crate::subject::{Element, ElementList, ElementQuery, Finder, Subject};

/// A scripted remote element
#[derive(Debug, Default)]
pub struct FakeElement {
    path: String,
    displayed: bool,
    enabled: bool,
    selected: bool,
    focused: bool,
    clickable: bool,
    existing: bool,
    text: String,
    html: String,
    attributes: HashMap<String, String>,
    properties: HashMap<String, Value>,
    children: Mutex<Vec<Arc<dyn Element>>>,
    displayed_script: Mutex<Vec<bool>>,
    read_errors_remaining: AtomicUsize,
    reads: AtomicUsize,
}

impl FakeElement {
    /// New element with the given selector-path description
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            existing: true,
            ..Self::default()
        }
    }

    pub fn displayed(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    pub fn existing(mut self, existing: bool) -> Self {
        self.existing = existing;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn property(mut self, name: &str, value: Value) -> Self {
        self.properties.insert(name.to_string(), value);
        self
    }

    pub fn children(self, children: Vec<Arc<dyn Element>>) -> Self {
        *self.children.lock().unwrap() = children;
        self
    }

    /// Script successive `is_displayed` answers; the last entry repeats
    pub fn displayed_sequence(self, sequence: Vec<bool>) -> Self {
        *self.displayed_script.lock().unwrap() = sequence;
        self
    }

    /// Fail the next `n` reads with a remote error before answering normally
    pub fn failing_first(self, n: usize) -> Self {
        self.read_errors_remaining.store(n, Ordering::SeqCst);
        self
    }

    /// Number of reads performed so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn into_subject(self) -> Subject {
        Subject::Element(Arc::new(self))
    }

    fn record_read(&self) -> EsperarResult<()> {
        let n = self.reads.fetch_add(1, Ordering::SeqCst);
        let failures = self.read_errors_remaining.load(Ordering::SeqCst);
        if n < failures {
            return Err(EsperarError::remote("element not attached"));
        }
        Ok(())
    }
}

#[async_trait]
impl Finder for FakeElement {
    async fn find_all(&self, _query: &ElementQuery) -> EsperarResult<Vec<Arc<dyn Element>>> {
        self.record_read()?;
        Ok(self.children.lock().unwrap().clone())
    }

    fn describe(&self) -> String {
        self.path.clone()
    }
}

#[async_trait]
impl Element for FakeElement {
    async fn is_displayed(&self) -> EsperarResult<bool> {
        self.record_read()?;
        let mut script = self.displayed_script.lock().unwrap();
        if script.is_empty() {
            return Ok(self.displayed);
        }
        if script.len() == 1 {
            return Ok(script[0]);
        }
        Ok(script.remove(0))
    }

    async fn is_enabled(&self) -> EsperarResult<bool> {
        self.record_read()?;
        Ok(self.enabled)
    }

    async fn is_selected(&self) -> EsperarResult<bool> {
        self.record_read()?;
        Ok(self.selected)
    }

    async fn is_focused(&self) -> EsperarResult<bool> {
        self.record_read()?;
        Ok(self.focused)
    }

    async fn is_clickable(&self) -> EsperarResult<bool> {
        self.record_read()?;
        Ok(self.clickable)
    }

    async fn is_existing(&self) -> EsperarResult<bool> {
        self.record_read()?;
        Ok(self.existing)
    }

    async fn get_attribute(&self, name: &str) -> EsperarResult<Option<String>> {
        self.record_read()?;
        Ok(self.attributes.get(name).cloned())
    }

    async fn get_property(&self, name: &str) -> EsperarResult<Value> {
        self.record_read()?;
        Ok(self.properties.get(name).cloned().unwrap_or(Value::Null))
    }

    async fn get_text(&self) -> EsperarResult<String> {
        self.record_read()?;
        Ok(self.text.clone())
    }

    async fn get_html(&self, _include_selector_tag: bool) -> EsperarResult<String> {
        self.record_read()?;
        Ok(self.html.clone())
    }
}

/// A page root replaying scripted batches of query results
#[derive(Debug, Default)]
pub struct FakeRoot {
    batches: Mutex<Vec<Vec<Arc<dyn Element>>>>,
    queries: AtomicUsize,
}

impl FakeRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next query; the last batch repeats
    pub fn then_find(self, batch: Vec<Arc<dyn Element>>) -> Self {
        self.batches.lock().unwrap().push(batch);
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Finder for FakeRoot {
    async fn find_all(&self, _query: &ElementQuery) -> EsperarResult<Vec<Arc<dyn Element>>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let mut batches = self.batches.lock().unwrap();
        if batches.is_empty() {
            return Ok(Vec::new());
        }
        if batches.len() == 1 {
            return Ok(batches[0].clone());
        }
        Ok(batches.remove(0))
    }

    fn describe(&self) -> String {
        String::new()
    }
}

/// An `ElementList` subject over the given elements, rooted at a fresh page
pub fn list_of(elements: Vec<Arc<dyn Element>>, query: ElementQuery) -> ElementList {
    let root = Arc::new(FakeRoot::new().then_find(elements.clone()));
    ElementList::new(elements, query, root)
}

/// A network mock replaying scripted batches of recorded calls
#[derive(Debug, Default)]
pub struct FakeMock {
    batches: Mutex<Vec<Vec<MockCall>>>,
    polls: AtomicUsize,
    read_errors_remaining: AtomicUsize,
}

impl FakeMock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the calls the next read will see; the last batch repeats
    pub fn then_calls(self, batch: Vec<MockCall>) -> Self {
        self.batches.lock().unwrap().push(batch);
        self
    }

    /// Fail the next `n` reads with a remote error before answering normally
    pub fn failing_first(self, n: usize) -> Self {
        self.read_errors_remaining.store(n, Ordering::SeqCst);
        self
    }

    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkMock for FakeMock {
    async fn calls(&self) -> EsperarResult<Vec<MockCall>> {
        let n = self.polls.fetch_add(1, Ordering::SeqCst);
        if n < self.read_errors_remaining.load(Ordering::SeqCst) {
            return Err(EsperarError::remote("mock backend unavailable"));
        }
        let mut batches = self.batches.lock().unwrap();
        if batches.is_empty() {
            return Ok(Vec::new());
        }
        if batches.len() == 1 {
            return Ok(batches[0].clone());
        }
        Ok(batches.remove(0))
    }
}
