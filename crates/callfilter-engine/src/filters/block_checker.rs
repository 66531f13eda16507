//! Blocked-number filter
//!
//! Asks the blocked-number directory whether the caller is on the block
//! list, or matches one of the categorical blocks (unknown, restricted,
//! pay phone, not-in-contacts).

use crate::filter::CallFilter;
use async_trait::async_trait;
use callfilter_common::{
    BlockStatus, FilterResult, IncomingCall, NumberPresentation, Verdict,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Blocked-number directory collaborator.
#[async_trait]
pub trait BlockedNumberDirectory: Send + Sync {
    /// Check whether calls from this number/presentation are blocked.
    async fn check(
        &self,
        number: &str,
        presentation: NumberPresentation,
    ) -> FilterResult<BlockStatus>;
}

/// Rejects calls the blocked-number directory says to block.
///
/// Blocked calls are still written to the call log but raise no
/// notification.
pub struct BlockCheckerFilter {
    call: IncomingCall,
    directory: Arc<dyn BlockedNumberDirectory>,
}

impl BlockCheckerFilter {
    /// Create the filter for one call.
    pub fn new(call: IncomingCall, directory: Arc<dyn BlockedNumberDirectory>) -> Self {
        Self { call, directory }
    }
}

#[async_trait]
impl CallFilter for BlockCheckerFilter {
    async fn start_lookup(&self, _prior: Verdict) -> Verdict {
        let number = self.call.number.as_deref().unwrap_or("");
        match self.directory.check(number, self.call.presentation).await {
            Ok(status) if status.is_blocked() => {
                debug!(call_id = %self.call.id, status = ?status, "number blocked by directory");
                Verdict::builder()
                    .allow_call(false)
                    .reject(true)
                    .show_notification(false)
                    .block_reason(status.block_reason())
                    .build()
            }
            Ok(_) => Verdict::permissive(),
            Err(e) => {
                warn!(call_id = %self.call.id, error = %e, "block check failed, allowing call");
                Verdict::permissive()
            }
        }
    }

    fn name(&self) -> &'static str {
        "block_checker"
    }
}
