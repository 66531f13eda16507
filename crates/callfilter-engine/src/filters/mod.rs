//! Concrete filters wrapping the external lookup collaborators

pub mod block_checker;
pub mod direct_to_voicemail;
pub mod screening;

pub use block_checker::{BlockCheckerFilter, BlockedNumberDirectory};
pub use direct_to_voicemail::{CallerInfoLookup, DirectToVoicemailFilter};
pub use screening::{CallScreeningServiceFilter, PackageType, ScreeningServiceConnection};
