//! Filtering verdicts and the verdict merge algorithm
//!
//! A `Verdict` is one filter's (or the combined) judgement about an incoming
//! call. Verdicts are immutable once built; the graph narrows an aggregate by
//! folding `combine` over its nodes' results.

use serde::{Deserialize, Serialize};

/// Why a call was blocked, if it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockReason {
    /// Not blocked
    None,
    /// Number is on the user's block list
    BlockedNumber,
    /// Unknown numbers are blocked
    UnknownNumber,
    /// Restricted-presentation numbers are blocked
    RestrictedNumber,
    /// Pay phones are blocked
    PayPhone,
    /// Numbers not in contacts are blocked
    NotInContacts,
    /// Contact is flagged direct-to-voicemail
    DirectToVoicemail,
    /// A call-screening service disallowed the call
    CallScreeningService,
}

impl Default for BlockReason {
    fn default() -> Self {
        Self::None
    }
}

impl BlockReason {
    /// True for reasons sourced from the blocked-number directory.
    ///
    /// Provider reasons take top precedence when verdicts are combined.
    pub fn is_provider_reason(&self) -> bool {
        matches!(
            self,
            Self::BlockedNumber
                | Self::UnknownNumber
                | Self::RestrictedNumber
                | Self::PayPhone
                | Self::NotInContacts
        )
    }
}

/// Immutable judgement about whether and how to deliver a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Deliver the call normally
    pub allow_call: bool,
    /// Actively reject the call
    pub reject: bool,
    /// Deliver but silence the ringer
    pub silence: bool,
    /// Record the call in the call log
    pub add_to_call_log: bool,
    /// Post a notification for the call
    pub show_notification: bool,
    /// Hand the call to a screener for audio processing
    pub screen_via_audio: bool,
    /// Caller matches an existing contact
    pub contact_exists: bool,
    /// Block classification
    pub block_reason: BlockReason,
    /// Label of the screening app responsible, when one is
    pub screening_app_name: Option<String>,
    /// Component id of the screening service responsible
    pub screening_component_id: Option<String>,
}

impl Verdict {
    /// The permissive verdict: allow, log, notify, nothing else.
    ///
    /// This is the seed of every aggregate fold and the fail-open answer of
    /// every filter whose collaborator misbehaves.
    pub fn permissive() -> Self {
        Self {
            allow_call: true,
            reject: false,
            silence: false,
            add_to_call_log: true,
            show_notification: true,
            screen_via_audio: false,
            contact_exists: false,
            block_reason: BlockReason::None,
            screening_app_name: None,
            screening_component_id: None,
        }
    }

    /// Start building a verdict from the permissive defaults.
    pub fn builder() -> VerdictBuilder {
        VerdictBuilder::default()
    }

    /// Merge two verdicts into one.
    ///
    /// Boolean fields always merge the same way: `allow_call`,
    /// `add_to_call_log` and `show_notification` narrow via AND; `reject`,
    /// `silence`, `screen_via_audio` and `contact_exists` widen via OR.
    ///
    /// The block reason and attribution follow a precedence ladder, first
    /// match wins:
    /// 1. a provider reason on either side (attribution cleared)
    /// 2. direct-to-voicemail on either side (attribution cleared)
    /// 3. a screening-service rejection on either side (attribution copied
    ///    from the matching side)
    /// 4. screen-via-audio on either side (reason stays `None`, attribution
    ///    copied from the side that set the flag)
    /// 5. otherwise reason `None`, attribution cleared
    ///
    /// When both sides match the same tier, `self` wins. That makes
    /// `combine` non-commutative on ties; callers that care about
    /// attribution rely on left-operand priority, so the asymmetry is
    /// deliberate and must not be "fixed".
    pub fn combine(&self, other: &Verdict) -> Verdict {
        let mut merged = Verdict {
            allow_call: self.allow_call && other.allow_call,
            reject: self.reject || other.reject,
            silence: self.silence || other.silence,
            add_to_call_log: self.add_to_call_log && other.add_to_call_log,
            show_notification: self.show_notification && other.show_notification,
            screen_via_audio: self.screen_via_audio || other.screen_via_audio,
            contact_exists: self.contact_exists || other.contact_exists,
            block_reason: BlockReason::None,
            screening_app_name: None,
            screening_component_id: None,
        };

        if self.block_reason.is_provider_reason() {
            merged.block_reason = self.block_reason;
        } else if other.block_reason.is_provider_reason() {
            merged.block_reason = other.block_reason;
        } else if self.block_reason == BlockReason::DirectToVoicemail
            || other.block_reason == BlockReason::DirectToVoicemail
        {
            merged.block_reason = BlockReason::DirectToVoicemail;
        } else if self.reject && self.block_reason == BlockReason::CallScreeningService {
            merged.block_reason = BlockReason::CallScreeningService;
            merged.screening_app_name = self.screening_app_name.clone();
            merged.screening_component_id = self.screening_component_id.clone();
        } else if other.reject && other.block_reason == BlockReason::CallScreeningService {
            merged.block_reason = BlockReason::CallScreeningService;
            merged.screening_app_name = other.screening_app_name.clone();
            merged.screening_component_id = other.screening_component_id.clone();
        } else if self.screen_via_audio {
            merged.screening_app_name = self.screening_app_name.clone();
            merged.screening_component_id = self.screening_component_id.clone();
        } else if other.screen_via_audio {
            merged.screening_app_name = other.screening_app_name.clone();
            merged.screening_component_id = other.screening_component_id.clone();
        }

        merged
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Self::permissive()
    }
}

/// Builder for [`Verdict`], starting from the permissive defaults.
#[derive(Debug, Clone)]
pub struct VerdictBuilder {
    verdict: Verdict,
}

impl Default for VerdictBuilder {
    fn default() -> Self {
        Self {
            verdict: Verdict::permissive(),
        }
    }
}

impl VerdictBuilder {
    /// Set whether the call is allowed
    pub fn allow_call(mut self, allow: bool) -> Self {
        self.verdict.allow_call = allow;
        self
    }

    /// Set whether the call is actively rejected
    pub fn reject(mut self, reject: bool) -> Self {
        self.verdict.reject = reject;
        self
    }

    /// Set whether the ringer is silenced
    pub fn silence(mut self, silence: bool) -> Self {
        self.verdict.silence = silence;
        self
    }

    /// Set whether the call is recorded in the call log
    pub fn add_to_call_log(mut self, add: bool) -> Self {
        self.verdict.add_to_call_log = add;
        self
    }

    /// Set whether a notification is posted
    pub fn show_notification(mut self, show: bool) -> Self {
        self.verdict.show_notification = show;
        self
    }

    /// Set whether the call is screened via audio
    pub fn screen_via_audio(mut self, screen: bool) -> Self {
        self.verdict.screen_via_audio = screen;
        self
    }

    /// Set whether the caller matches a contact
    pub fn contact_exists(mut self, exists: bool) -> Self {
        self.verdict.contact_exists = exists;
        self
    }

    /// Set the block classification
    pub fn block_reason(mut self, reason: BlockReason) -> Self {
        self.verdict.block_reason = reason;
        self
    }

    /// Attribute the verdict to a screening app by label
    pub fn screening_app_name(mut self, name: Option<String>) -> Self {
        self.verdict.screening_app_name = name;
        self
    }

    /// Attribute the verdict to a screening service component
    pub fn screening_component_id(mut self, component: Option<String>) -> Self {
        self.verdict.screening_component_id = component;
        self
    }

    /// Finish the verdict
    pub fn build(self) -> Verdict {
        self.verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screening_rejection(app: &str, component: &str) -> Verdict {
        Verdict::builder()
            .allow_call(false)
            .reject(true)
            .block_reason(BlockReason::CallScreeningService)
            .screening_app_name(Some(app.into()))
            .screening_component_id(Some(component.into()))
            .build()
    }

    #[test]
    fn test_builder_defaults_are_permissive() {
        assert_eq!(Verdict::builder().build(), Verdict::permissive());
    }

    #[test]
    fn test_combine_permissive_identity() {
        let p = Verdict::permissive();
        assert_eq!(p.combine(&p), p);
    }

    #[test]
    fn test_boolean_merge_matrix() {
        let a = Verdict::builder()
            .allow_call(false)
            .reject(true)
            .add_to_call_log(false)
            .build();
        let b = Verdict::builder()
            .silence(true)
            .show_notification(false)
            .contact_exists(true)
            .build();

        let merged = a.combine(&b);
        assert!(!merged.allow_call);
        assert!(merged.reject);
        assert!(merged.silence);
        assert!(!merged.add_to_call_log);
        assert!(!merged.show_notification);
        assert!(merged.contact_exists);
    }

    #[test]
    fn test_provider_reason_wins_regardless_of_order() {
        let blocked = Verdict::builder()
            .allow_call(false)
            .reject(true)
            .block_reason(BlockReason::BlockedNumber)
            .build();
        let plain = Verdict::permissive();

        assert_eq!(
            blocked.combine(&plain).block_reason,
            BlockReason::BlockedNumber
        );
        assert_eq!(
            plain.combine(&blocked).block_reason,
            BlockReason::BlockedNumber
        );
    }

    #[test]
    fn test_provider_reason_left_tiebreak() {
        let a = Verdict::builder()
            .block_reason(BlockReason::PayPhone)
            .build();
        let b = Verdict::builder()
            .block_reason(BlockReason::NotInContacts)
            .build();

        assert_eq!(a.combine(&b).block_reason, BlockReason::PayPhone);
        assert_eq!(b.combine(&a).block_reason, BlockReason::NotInContacts);
    }

    #[test]
    fn test_provider_reason_clears_attribution() {
        let blocked = Verdict::builder()
            .allow_call(false)
            .block_reason(BlockReason::BlockedNumber)
            .build();
        let screened = screening_rejection("Screener", "com.example/.Screener");

        let merged = blocked.combine(&screened);
        assert_eq!(merged.block_reason, BlockReason::BlockedNumber);
        assert_eq!(merged.screening_app_name, None);
        assert_eq!(merged.screening_component_id, None);
    }

    #[test]
    fn test_voicemail_beats_screening_service() {
        let voicemail = Verdict::builder()
            .allow_call(false)
            .reject(true)
            .block_reason(BlockReason::DirectToVoicemail)
            .build();
        let screened = screening_rejection("Screener", "com.example/.Screener");

        assert_eq!(
            screened.combine(&voicemail).block_reason,
            BlockReason::DirectToVoicemail
        );
        assert_eq!(
            voicemail.combine(&screened).block_reason,
            BlockReason::DirectToVoicemail
        );
    }

    #[test]
    fn test_screening_attribution_left_priority() {
        let a = screening_rejection("First", "com.first/.S");
        let b = screening_rejection("Second", "com.second/.S");

        let merged = a.combine(&b);
        assert_eq!(merged.block_reason, BlockReason::CallScreeningService);
        assert_eq!(merged.screening_app_name.as_deref(), Some("First"));
        assert_eq!(merged.screening_component_id.as_deref(), Some("com.first/.S"));

        let merged = b.combine(&a);
        assert_eq!(merged.screening_app_name.as_deref(), Some("Second"));
    }

    #[test]
    fn test_screening_rejection_attribution_survives_permissive_side() {
        let screened = screening_rejection("Screener", "com.example/.Screener");
        let plain = Verdict::permissive();

        let merged = plain.combine(&screened);
        assert_eq!(merged.block_reason, BlockReason::CallScreeningService);
        assert_eq!(merged.screening_app_name.as_deref(), Some("Screener"));
        assert!(!merged.allow_call);
        assert!(merged.reject);
    }

    #[test]
    fn test_screen_via_audio_attribution() {
        let audio = Verdict::builder()
            .screen_via_audio(true)
            .screening_app_name(Some("Audio".into()))
            .screening_component_id(Some("com.audio/.S".into()))
            .build();
        let plain = Verdict::permissive();

        let merged = plain.combine(&audio);
        assert_eq!(merged.block_reason, BlockReason::None);
        assert!(merged.screen_via_audio);
        assert_eq!(merged.screening_app_name.as_deref(), Some("Audio"));
    }

    #[test]
    fn test_no_special_reason_clears_attribution() {
        let stray = Verdict::builder()
            .screening_app_name(Some("Stray".into()))
            .build();
        let merged = stray.combine(&Verdict::permissive());
        assert_eq!(merged.screening_app_name, None);
        assert_eq!(merged.block_reason, BlockReason::None);
    }
}
