//! Standard filter pipeline
//!
//! Reproduces the stock wiring used for every incoming call: the voicemail
//! and block-list checks run first and feed the carrier screener (when a
//! carrier app is installed), which feeds the user-chosen or default-dialer
//! screener.

use crate::filters::{
    BlockCheckerFilter, BlockedNumberDirectory, CallScreeningServiceFilter, CallerInfoLookup,
    DirectToVoicemailFilter, PackageType, ScreeningServiceConnection,
};
use crate::graph::{FilterGraph, FilterGraphListener, GraphConfig};
use callfilter_common::IncomingCall;
use std::sync::Arc;

/// Identity and connection of one screening app.
pub struct ScreenerBinding {
    /// Connection used to reach the service
    pub connection: Arc<dyn ScreeningServiceConnection>,
    /// Package name of the screening app
    pub package_name: String,
    /// Human-readable label, for verdict attribution
    pub app_name: Option<String>,
    /// Role the app holds
    pub package_type: PackageType,
}

/// Build the standard graph for one incoming call:
///
/// ```text
/// voicemail ──┐
///             ├──► carrier screener ──► user/default screener
/// block ──────┘
/// ```
///
/// Without a carrier screener the voicemail and block checks feed the
/// user/default screener directly.
pub fn standard_graph(
    call: IncomingCall,
    listener: Arc<dyn FilterGraphListener>,
    config: GraphConfig,
    caller_info: Arc<dyn CallerInfoLookup>,
    directory: Arc<dyn BlockedNumberDirectory>,
    carrier: Option<ScreenerBinding>,
    user: ScreenerBinding,
) -> FilterGraph {
    let mut graph = FilterGraph::new(call.clone(), listener, config);

    let voicemail = graph.add_filter(Arc::new(DirectToVoicemailFilter::new(
        call.clone(),
        caller_info,
    )));
    let block = graph.add_filter(Arc::new(BlockCheckerFilter::new(call.clone(), directory)));
    let user = graph.add_filter(Arc::new(CallScreeningServiceFilter::new(
        call.clone(),
        user.connection,
        &user.package_name,
        user.app_name,
        user.package_type,
    )));

    match carrier {
        Some(binding) => {
            let carrier = graph.add_filter(Arc::new(CallScreeningServiceFilter::new(
                call,
                binding.connection,
                &binding.package_name,
                binding.app_name,
                binding.package_type,
            )));
            graph.add_edge(voicemail, carrier);
            graph.add_edge(block, carrier);
            graph.add_edge(carrier, user);
        }
        None => {
            graph.add_edge(voicemail, user);
            graph.add_edge(block, user);
        }
    }

    graph
}
