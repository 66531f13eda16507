//! Incoming-call descriptor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the caller's number is presented to the callee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberPresentation {
    /// Number is available and may be shown
    Allowed,
    /// Caller withheld the number
    Restricted,
    /// Network could not determine the number
    Unknown,
    /// Call originates from a pay phone
    PayPhone,
}

impl Default for NumberPresentation {
    fn default() -> Self {
        Self::Allowed
    }
}

/// One incoming call, as seen by the filtering engine.
///
/// A fresh descriptor is created per call; filter graphs never share or
/// reuse them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingCall {
    /// Unique id for this call attempt
    pub id: Uuid,
    /// Caller's number, if presented
    pub number: Option<String>,
    /// Number presentation
    pub presentation: NumberPresentation,
    /// When the call reached the engine
    pub received_at: DateTime<Utc>,
}

impl IncomingCall {
    /// Create a descriptor for a new call attempt.
    pub fn new(presentation: NumberPresentation) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: None,
            presentation,
            received_at: Utc::now(),
        }
    }

    /// Set the caller's number
    pub fn with_number(mut self, number: &str) -> Self {
        self.number = Some(number.into());
        self
    }
}
