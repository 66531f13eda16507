//! The filter contract

use async_trait::async_trait;
use callfilter_common::Verdict;

/// One asynchronous check contributing to the verdict for a call.
///
/// Implementations must never fail: any internal error resolves to the
/// permissive verdict so a flaky checker cannot block all calls. A filter
/// resolves exactly once and is never reused across calls.
#[async_trait]
pub trait CallFilter: Send + Sync {
    /// Produce this filter's verdict, given the merged verdict of all of
    /// its dependencies (the permissive default when it has none).
    async fn start_lookup(&self, prior: Verdict) -> Verdict;

    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Release any external service connection this filter holds.
    ///
    /// Called when the graph times out with this filter's lookup still
    /// outstanding. Lookups without an explicit cancel operation run to
    /// completion and their late results are discarded.
    async fn cancel(&self) {}
}

/// Passthrough filter backing the synthetic start and completion nodes.
pub(crate) struct PassthroughFilter {
    name: &'static str,
}

impl PassthroughFilter {
    pub(crate) fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl CallFilter for PassthroughFilter {
    async fn start_lookup(&self, prior: Verdict) -> Verdict {
        prior
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
