//! Third-party call-screening filter
//!
//! Binds to an external call-screening service and maps its response onto a
//! verdict. The service lives in another process; the binding protocol is
//! behind [`ScreeningServiceConnection`].

use crate::filter::CallFilter;
use async_trait::async_trait;
use callfilter_common::{BlockReason, FilterResult, IncomingCall, ScreeningResponse, Verdict};
use std::sync::Arc;
use tracing::{debug, warn};

/// Connection to one call-screening service.
#[async_trait]
pub trait ScreeningServiceConnection: Send + Sync {
    /// Send the call to the service and wait for its single response.
    async fn screen(&self, call: &IncomingCall) -> FilterResult<ScreeningResponse>;

    /// Tear down the binding. Safe to call with a screen in flight.
    async fn unbind(&self);
}

/// Which role the screening app holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageType {
    /// Carrier-provided screening app
    Carrier,
    /// App the user picked for screening
    UserChosen,
    /// The default dialer app
    DefaultDialer,
}

/// Delegates the verdict to a third-party call-screening service.
///
/// When an earlier stage has already disallowed the call, the service is
/// not consulted and the prior verdict passes through unchanged.
pub struct CallScreeningServiceFilter {
    call: IncomingCall,
    connection: Arc<dyn ScreeningServiceConnection>,
    package_name: String,
    app_name: Option<String>,
    package_type: PackageType,
}

impl CallScreeningServiceFilter {
    /// Create the filter for one call.
    pub fn new(
        call: IncomingCall,
        connection: Arc<dyn ScreeningServiceConnection>,
        package_name: &str,
        app_name: Option<String>,
        package_type: PackageType,
    ) -> Self {
        Self {
            call,
            connection,
            package_name: package_name.into(),
            app_name,
            package_type,
        }
    }
}

#[async_trait]
impl CallFilter for CallScreeningServiceFilter {
    async fn start_lookup(&self, prior: Verdict) -> Verdict {
        if !prior.allow_call {
            debug!(
                call_id = %self.call.id,
                package = %self.package_name,
                "call already disallowed, skipping screening service"
            );
            return prior;
        }

        match self.connection.screen(&self.call).await {
            Ok(ScreeningResponse::Allow) => prior,
            Ok(ScreeningResponse::Disallow {
                reject,
                add_to_call_log,
                show_notification,
                component_id,
            }) => Verdict::builder()
                .allow_call(false)
                .reject(reject)
                .add_to_call_log(add_to_call_log)
                .show_notification(show_notification)
                .block_reason(BlockReason::CallScreeningService)
                .screening_app_name(self.app_name.clone())
                .screening_component_id(Some(component_id))
                .build(),
            Ok(ScreeningResponse::Silence) => {
                prior.combine(&Verdict::builder().silence(true).build())
            }
            Ok(ScreeningResponse::ScreenFurther) => prior.combine(
                &Verdict::builder()
                    .screen_via_audio(true)
                    .screening_app_name(self.app_name.clone())
                    .screening_component_id(Some(self.package_name.clone()))
                    .build(),
            ),
            Err(e) => {
                warn!(
                    call_id = %self.call.id,
                    package = %self.package_name,
                    error = %e,
                    "screening service unavailable, allowing call"
                );
                Verdict::permissive()
            }
        }
    }

    fn name(&self) -> &'static str {
        match self.package_type {
            PackageType::Carrier => "call_screening.carrier",
            PackageType::UserChosen => "call_screening.user_chosen",
            PackageType::DefaultDialer => "call_screening.default_dialer",
        }
    }

    async fn cancel(&self) {
        debug!(call_id = %self.call.id, package = %self.package_name, "unbinding screening service");
        self.connection.unbind().await;
    }
}
