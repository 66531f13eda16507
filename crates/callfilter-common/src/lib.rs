//! Shared types for the call-filtering decision engine
//!
//! This crate provides the value objects exchanged between the filter graph
//! and its collaborators:
//! - Incoming-call descriptors
//! - Filtering verdicts and the verdict merge algorithm
//! - Lookup request/response types for external directories and screeners
//! - Error handling

#![warn(missing_docs)]

pub mod call;
pub mod error;
pub mod lookup;
pub mod verdict;

pub use call::{IncomingCall, NumberPresentation};
pub use error::{FilterError, FilterResult};
pub use lookup::{BlockStatus, CallerInfo, ScreeningResponse};
pub use verdict::{BlockReason, Verdict, VerdictBuilder};
