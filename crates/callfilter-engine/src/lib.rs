//! Asynchronous call-filtering decision engine
//!
//! Runs several independent "should this call be allowed?" checks as a
//! dependency graph, merges their verdicts under strict precedence rules,
//! and bounds the whole decision with a timeout so a slow or unresponsive
//! check can never stall an incoming call.
//!
//! # Architecture
//!
//! ```text
//!            ┌───────┐
//!            │ start │ (permissive seed)
//!            └───┬───┘
//!      ┌─────────┼──────────┐
//!      ▼         ▼          ▼
//! ┌─────────┐ ┌───────┐ ┌──────────┐
//! │voicemail│ │ block │ │ screening│   external lookups run concurrently
//! └────┬────┘ └───┬───┘ └────┬─────┘
//!      └─────────┬┴───────────┘
//!                ▼
//!          ┌────────────┐
//!          │ completion │──► listener.on_complete(verdict), exactly once
//!          └────────────┘
//! ```
//!
//! Graph bookkeeping runs on a single scheduler task fed by a channel;
//! lookups post their results back onto it. A one-shot timer delivers the
//! best aggregate computed so far if the graph cannot finish in time.

pub mod filter;
pub mod filters;
pub mod graph;
pub mod pipeline;

pub use filter::CallFilter;
pub use filters::{
    BlockCheckerFilter, BlockedNumberDirectory, CallScreeningServiceFilter, CallerInfoLookup,
    DirectToVoicemailFilter, PackageType, ScreeningServiceConnection,
};
pub use graph::{FilterGraph, FilterGraphListener, FilterHandle, GraphConfig, GraphStats};
pub use pipeline::{standard_graph, ScreenerBinding};
