//! Request/response types for external lookup collaborators
//!
//! The engine consumes, but does not implement, three collaborators: the
//! blocked-number directory, the caller-info/contacts lookup, and third-party
//! call-screening services. These are the narrow answer types they return.

use crate::verdict::BlockReason;
use serde::{Deserialize, Serialize};

/// Answer from the blocked-number directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStatus {
    /// Number is not blocked
    NotBlocked,
    /// Number is on the block list
    BlockedNumber,
    /// Calls from unknown numbers are blocked
    UnknownNumber,
    /// Calls with restricted presentation are blocked
    RestrictedNumber,
    /// Calls from pay phones are blocked
    PayPhone,
    /// Calls from numbers not in contacts are blocked
    NotInContacts,
}

impl BlockStatus {
    /// Map the directory answer onto a verdict block reason.
    pub fn block_reason(&self) -> BlockReason {
        match self {
            Self::NotBlocked => BlockReason::None,
            Self::BlockedNumber => BlockReason::BlockedNumber,
            Self::UnknownNumber => BlockReason::UnknownNumber,
            Self::RestrictedNumber => BlockReason::RestrictedNumber,
            Self::PayPhone => BlockReason::PayPhone,
            Self::NotInContacts => BlockReason::NotInContacts,
        }
    }

    /// True when the directory wants the call blocked.
    pub fn is_blocked(&self) -> bool {
        !matches!(self, Self::NotBlocked)
    }
}

/// Answer from the caller-info/contacts lookup.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CallerInfo {
    /// The caller matches an existing contact
    pub contact_exists: bool,
    /// The contact is flagged to route straight to voicemail
    pub send_to_voicemail: bool,
}

/// Answer from a third-party call-screening service.
///
/// A well-behaved service calls back exactly one of these; binding failure
/// or disconnection yields no response at all and the wrapping filter
/// resolves permissive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreeningResponse {
    /// Let the call through unchanged
    Allow,
    /// Block the call
    Disallow {
        /// Actively reject rather than silently drop
        reject: bool,
        /// Keep a call-log entry for the blocked call
        add_to_call_log: bool,
        /// Post a missed-call notification
        show_notification: bool,
        /// Component of the screening service, for attribution
        component_id: String,
    },
    /// Deliver the call but silence the ringer
    Silence,
    /// Hand the call to the service for audio screening
    ScreenFurther,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_status_maps_to_reason() {
        assert_eq!(BlockStatus::NotBlocked.block_reason(), BlockReason::None);
        assert_eq!(
            BlockStatus::BlockedNumber.block_reason(),
            BlockReason::BlockedNumber
        );
        assert!(!BlockStatus::NotBlocked.is_blocked());
        assert!(BlockStatus::PayPhone.is_blocked());
    }
}
