//! Direct-to-voicemail filter
//!
//! Asks the caller-info/contacts lookup whether the caller's contact is
//! flagged to route straight to voicemail.

use crate::filter::CallFilter;
use async_trait::async_trait;
use callfilter_common::{BlockReason, CallerInfo, FilterResult, IncomingCall, Verdict};
use std::sync::Arc;
use tracing::warn;

/// Caller-info/contacts lookup collaborator.
#[async_trait]
pub trait CallerInfoLookup: Send + Sync {
    /// Look up contact information for the caller.
    async fn lookup(&self, call: &IncomingCall) -> FilterResult<CallerInfo>;
}

/// Rejects calls whose contact is flagged direct-to-voicemail.
pub struct DirectToVoicemailFilter {
    call: IncomingCall,
    lookup: Arc<dyn CallerInfoLookup>,
}

impl DirectToVoicemailFilter {
    /// Create the filter for one call.
    pub fn new(call: IncomingCall, lookup: Arc<dyn CallerInfoLookup>) -> Self {
        Self { call, lookup }
    }
}

#[async_trait]
impl CallFilter for DirectToVoicemailFilter {
    async fn start_lookup(&self, _prior: Verdict) -> Verdict {
        match self.lookup.lookup(&self.call).await {
            Ok(info) if info.send_to_voicemail => Verdict::builder()
                .allow_call(false)
                .reject(true)
                .block_reason(BlockReason::DirectToVoicemail)
                .contact_exists(info.contact_exists)
                .build(),
            Ok(info) => Verdict::builder()
                .contact_exists(info.contact_exists)
                .build(),
            Err(e) => {
                warn!(call_id = %self.call.id, error = %e, "caller-info lookup failed, allowing call");
                Verdict::permissive()
            }
        }
    }

    fn name(&self) -> &'static str {
        "direct_to_voicemail"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callfilter_common::{FilterError, NumberPresentation};

    struct FixedLookup(FilterResult<CallerInfo>);

    #[async_trait]
    impl CallerInfoLookup for FixedLookup {
        async fn lookup(&self, _call: &IncomingCall) -> FilterResult<CallerInfo> {
            match &self.0 {
                Ok(info) => Ok(*info),
                Err(_) => Err(FilterError::LookupFailed("no contacts provider".into())),
            }
        }
    }

    fn call() -> IncomingCall {
        IncomingCall::new(NumberPresentation::Allowed).with_number("+15550002222")
    }

    #[tokio::test]
    async fn test_send_to_voicemail_rejects() {
        let filter = DirectToVoicemailFilter::new(
            call(),
            Arc::new(FixedLookup(Ok(CallerInfo {
                contact_exists: true,
                send_to_voicemail: true,
            }))),
        );
        let verdict = filter.start_lookup(Verdict::permissive()).await;
        assert!(!verdict.allow_call);
        assert!(verdict.reject);
        assert_eq!(verdict.block_reason, BlockReason::DirectToVoicemail);
        assert!(verdict.contact_exists);
    }

    #[tokio::test]
    async fn test_plain_contact_carries_contact_exists() {
        let filter = DirectToVoicemailFilter::new(
            call(),
            Arc::new(FixedLookup(Ok(CallerInfo {
                contact_exists: true,
                send_to_voicemail: false,
            }))),
        );
        let verdict = filter.start_lookup(Verdict::permissive()).await;
        assert!(verdict.allow_call);
        assert!(verdict.contact_exists);
        assert_eq!(verdict.block_reason, BlockReason::None);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_fail_open() {
        let filter = DirectToVoicemailFilter::new(
            call(),
            Arc::new(FixedLookup(Err(FilterError::LookupFailed("boom".into())))),
        );
        let verdict = filter.start_lookup(Verdict::permissive()).await;
        assert_eq!(verdict, Verdict::permissive());
    }
}
