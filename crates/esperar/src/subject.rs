//! Subjects under test: remote element handles and element collections.
//!
//! The remote browser-automation client is a collaborator, not an
//! implementation detail of this crate; it is consumed through the
//! [`Element`] trait. Every read is asynchronous and fallible because it is
//! network-backed.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::result::EsperarResult;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g., "button.primary")
    Css(String),
    /// XPath selector
    XPath(String),
    /// Text content selector
    Text(String),
    /// Test ID selector (data-testid attribute)
    TestId(String),
    /// Opaque selector function, carried by label only
    Custom(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// The raw selector text
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) | Self::Text(s) | Self::TestId(s) | Self::Custom(s) => {
                s.as_str()
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strategy used to issue an element query ("foundWith")
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindStrategy {
    /// Single-element query
    Single,
    /// Multi-element query
    All,
    /// Host-specific custom strategy, by name
    Custom(String),
}

impl fmt::Display for FindStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "$"),
            Self::All => write!(f, "$$"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// The query that produced (and can re-produce) an element collection.
///
/// Invariant: a refetch reuses the same selector, strategy, and props so the
/// fresh collection is structurally equivalent to the stale one.
#[derive(Debug, Clone)]
pub struct ElementQuery {
    /// Selector the collection was found with
    pub selector: Selector,
    /// Strategy used to issue the query
    pub found_with: FindStrategy,
    /// Extra query parameters, passed through verbatim on refetch
    pub props: Vec<Value>,
}

impl ElementQuery {
    /// A `$$`-style query for a selector
    #[must_use]
    pub fn all(selector: Selector) -> Self {
        Self {
            selector,
            found_with: FindStrategy::All,
            props: Vec::new(),
        }
    }

    /// A `$`-style query for a selector
    #[must_use]
    pub fn single(selector: Selector) -> Self {
        Self {
            selector,
            found_with: FindStrategy::Single,
            props: Vec::new(),
        }
    }

    /// Render as `strategy(`selector`)` for subject descriptions
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{}(`{}`)", self.found_with, self.selector)
    }
}

/// Anything elements can be queried from: a page root or another element
#[async_trait]
pub trait Finder: Send + Sync + fmt::Debug {
    /// Issue an element query, returning matches in document order
    async fn find_all(&self, query: &ElementQuery) -> EsperarResult<Vec<Arc<dyn Element>>>;

    /// Description used as the leading segment of a selector path.
    /// Page roots return an empty string.
    fn describe(&self) -> String;
}

/// A remote DOM element handle.
///
/// All reads go over the wire and may fail transiently; the poller tolerates
/// those failures while a wait budget remains.
#[async_trait]
pub trait Element: Finder {
    /// Whether the element is displayed
    async fn is_displayed(&self) -> EsperarResult<bool>;

    /// Whether the element is enabled
    async fn is_enabled(&self) -> EsperarResult<bool>;

    /// Whether the element is selected/checked
    async fn is_selected(&self) -> EsperarResult<bool>;

    /// Whether the element has focus
    async fn is_focused(&self) -> EsperarResult<bool>;

    /// Whether the element is clickable
    async fn is_clickable(&self) -> EsperarResult<bool>;

    /// Whether the element exists in the DOM
    async fn is_existing(&self) -> EsperarResult<bool>;

    /// Read an attribute; None when the attribute is absent
    async fn get_attribute(&self, name: &str) -> EsperarResult<Option<String>>;

    /// Read a DOM property
    async fn get_property(&self, name: &str) -> EsperarResult<Value>;

    /// Read the visible text
    async fn get_text(&self) -> EsperarResult<String>;

    /// Read the HTML, optionally including the element's own tag
    async fn get_html(&self, include_selector_tag: bool) -> EsperarResult<String>;

    /// Read the form value (defaults to the `value` property)
    async fn get_value(&self) -> EsperarResult<String> {
        let value = self.get_property("value").await?;
        match value {
            Value::String(s) => Ok(s),
            Value::Null => Ok(String::new()),
            other => Ok(other.to_string()),
        }
    }
}

/// An ordered collection of remote elements plus the query that produced it
#[derive(Debug, Clone)]
pub struct ElementList {
    items: Vec<Arc<dyn Element>>,
    query: ElementQuery,
    parent: Arc<dyn Finder>,
}

impl ElementList {
    /// Create a collection from resolved items and their originating query
    #[must_use]
    pub fn new(items: Vec<Arc<dyn Element>>, query: ElementQuery, parent: Arc<dyn Finder>) -> Self {
        Self {
            items,
            query,
            parent,
        }
    }

    /// Resolved elements, in document order
    #[must_use]
    pub fn items(&self) -> &[Arc<dyn Element>] {
        &self.items
    }

    /// Number of resolved elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the collection resolved to zero elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The query used to obtain this collection
    #[must_use]
    pub fn query(&self) -> &ElementQuery {
        &self.query
    }

    /// The parent the query was issued against
    #[must_use]
    pub fn parent(&self) -> &Arc<dyn Finder> {
        &self.parent
    }

    /// Selector-path description, outer-to-inner, joined with `.`
    #[must_use]
    pub fn describe(&self) -> String {
        join_path(&self.parent.describe(), &self.query.describe())
    }

    /// Path description of one element of the collection, as `segment[index]`
    #[must_use]
    pub fn describe_index(&self, index: usize) -> String {
        format!("{}[{index}]", self.describe())
    }
}

/// Join a parent path with a child segment, skipping empty page-root prefixes
#[must_use]
pub fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}.{segment}")
    }
}

/// The value under test: one element or an ordered collection
#[derive(Debug, Clone)]
pub enum Subject {
    /// A single remote element handle
    Element(Arc<dyn Element>),
    /// A collection of remote elements with refetch metadata
    Collection(ElementList),
}

impl Subject {
    /// Wrap the subject as an ordered sequence of elements
    #[must_use]
    pub fn elements(&self) -> Vec<Arc<dyn Element>> {
        match self {
            Self::Element(el) => vec![Arc::clone(el)],
            Self::Collection(list) => list.items().to_vec(),
        }
    }

    /// Subject description for message headlines
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Element(el) => el.describe(),
            Self::Collection(list) => list.describe(),
        }
    }
}

/// A page root that re-issues queries against a fixed resolver function.
///
/// Library consumers adapt their automation client by implementing
/// [`Finder`]/[`Element`]; this type covers the common "page object" case.
pub struct PageRoot<F> {
    resolve: F,
}

impl<F> fmt::Debug for PageRoot<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRoot").finish_non_exhaustive()
    }
}

impl<F> PageRoot<F>
where
    F: Fn(&ElementQuery) -> EsperarResult<Vec<Arc<dyn Element>>> + Send + Sync,
{
    /// Create a page root from a synchronous resolver
    pub fn new(resolve: F) -> Self {
        Self { resolve }
    }
}

#[async_trait]
impl<F> Finder for PageRoot<F>
where
    F: Fn(&ElementQuery) -> EsperarResult<Vec<Arc<dyn Element>>> + Send + Sync,
{
    async fn find_all(&self, query: &ElementQuery) -> EsperarResult<Vec<Arc<dyn Element>>> {
        (self.resolve)(query)
    }

    fn describe(&self) -> String {
        String::new()
    }
}
