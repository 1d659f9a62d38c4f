//! Framework Adapter.
//!
//! Presents the one core engine to two host calling conventions: a direct
//! style where the matcher receives an [`AssertionContext`] and returns the
//! lazy-message [`AssertionResult`], and a compare/negativeCompare style
//! where negation is fixed per entry point and the message is rendered
//! eagerly to a string. The host kind is selected exactly once at
//! initialization and threaded explicitly; it is never re-detected per call.

use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;

use crate::assert::{AssertionContext, AssertionResult};
use crate::result::{EsperarError, EsperarResult};

/// The host assertion framework flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// Direct convention: context carries `is_not`, result message is lazy
    Jest,
    /// Compare convention: `compare`/`negative_compare` entry points,
    /// message rendered eagerly to a string
    Jasmine,
}

impl HostKind {
    /// Select the host kind from what is present in the environment.
    ///
    /// # Errors
    ///
    /// Returns [`EsperarError::HostInit`] when no supported host is
    /// available; callers handle this explicitly instead of the library
    /// logging and limping on.
    pub fn detect(jest_present: bool, jasmine_present: bool) -> EsperarResult<Self> {
        match (jest_present, jasmine_present) {
            (true, _) => Ok(Self::Jest),
            (false, true) => Ok(Self::Jasmine),
            (false, false) => Err(EsperarError::HostInit {
                message: "no supported assertion host found (expected Jest or Jasmine)"
                    .to_string(),
            }),
        }
    }
}

/// A registered matcher: async, type-erased, bound to its subject and
/// arguments by the host glue, parameterized only by the assertion context
pub type BoxedMatcher =
    Arc<dyn Fn(AssertionContext) -> BoxFuture<'static, EsperarResult<AssertionResult>> + Send + Sync>;

/// Matcher registry for one host, selected once at initialization
pub struct Registry {
    kind: HostKind,
    matchers: HashMap<String, BoxedMatcher>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("matchers", &self.matchers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    /// Create an empty registry for a host kind
    #[must_use]
    pub fn new(kind: HostKind) -> Self {
        Self {
            kind,
            matchers: HashMap::new(),
        }
    }

    /// Detect the host and create the registry in one step
    ///
    /// # Errors
    ///
    /// Propagates [`HostKind::detect`] failures.
    pub fn init(jest_present: bool, jasmine_present: bool) -> EsperarResult<Self> {
        Ok(Self::new(HostKind::detect(jest_present, jasmine_present)?))
    }

    /// The host kind this registry was initialized for
    #[must_use]
    pub const fn kind(&self) -> HostKind {
        self.kind
    }

    /// Register a matcher under its exposed name
    pub fn register(&mut self, name: impl Into<String>, matcher: BoxedMatcher) {
        self.matchers.insert(name.into(), matcher);
    }

    /// Registered matcher names
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.matchers.keys().map(String::as_str).collect()
    }

    fn lookup(&self, name: &str) -> EsperarResult<&BoxedMatcher> {
        self.matchers
            .get(name)
            .ok_or_else(|| EsperarError::UnknownMatcher {
                name: name.to_string(),
            })
    }

    /// Direct convention: invoke a matcher with an optional context.
    ///
    /// A missing context (the host bound nothing) is treated as the empty
    /// default context, never as ambient global state.
    ///
    /// # Errors
    ///
    /// Unknown matcher name, or whatever the matcher itself returns.
    pub async fn call_direct(
        &self,
        name: &str,
        context: Option<AssertionContext>,
    ) -> EsperarResult<AssertionResult> {
        let matcher = self.lookup(name)?;
        matcher(AssertionContext::normalize(context)).await
    }

    /// Compare convention: wrap a matcher into a [`Comparator`]
    ///
    /// # Errors
    ///
    /// Unknown matcher name.
    pub fn comparator(&self, name: &str) -> EsperarResult<Comparator> {
        Ok(Comparator {
            matcher: Arc::clone(self.lookup(name)?),
        })
    }
}

/// A matcher's result in the compare convention: message already rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparedResult {
    /// Whether the assertion passed under the fixed negation
    pub pass: bool,
    /// Eagerly rendered message (the compare convention has no thunks)
    pub message: String,
}

/// Compare/negativeCompare wrapper around one registered matcher
#[derive(Clone)]
pub struct Comparator {
    matcher: BoxedMatcher,
}

impl std::fmt::Debug for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Comparator").finish_non_exhaustive()
    }
}

impl Comparator {
    /// Invoke the matcher with negation fixed to false
    ///
    /// # Errors
    ///
    /// Whatever the matcher itself returns.
    pub async fn compare(&self) -> EsperarResult<ComparedResult> {
        self.run(AssertionContext::new()).await
    }

    /// Invoke the matcher with negation fixed to true
    ///
    /// # Errors
    ///
    /// Whatever the matcher itself returns.
    pub async fn negative_compare(&self) -> EsperarResult<ComparedResult> {
        self.run(AssertionContext::negated()).await
    }

    async fn run(&self, context: AssertionContext) -> EsperarResult<ComparedResult> {
        let result = (self.matcher)(context).await?;
        Ok(ComparedResult {
            pass: result.pass(),
            message: result.message(),
        })
    }
}
