use thiserror::Error;

pub type Result<T> = std::result::Result<T, KeyphraseError>;

/// Errors returned by the share codec, the quiz generator and the
/// create-wallet flow.
#[derive(Debug, Error, PartialEq)]
pub enum KeyphraseError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Unsupported number of recovery words: {0}")]
    UnsupportedWordCount(usize),

    #[error("Unsupported wordlist language: {0}")]
    UnsupportedLanguage(String),

    #[error("Unsupported share version: {0}")]
    UnsupportedVersion(String),

    #[error("Invalid share scheme: threshold {threshold} of {total} shares")]
    InvalidScheme { threshold: usize, total: usize },

    #[error("Invalid share: {0}")]
    InvalidShare(String),

    #[error("Shares come from different splits")]
    MixedShares,

    #[error("Insufficient shares: need {needed}, have {have}")]
    InsufficientShares { needed: usize, have: usize },

    #[error("Share split failed: {0}")]
    Split(String),

    #[error("Share reconstruction failed: {0}")]
    Reconstruct(String),

    #[error("Checklist of {checks} words requested from {total} words")]
    InvalidChecklistSize { checks: usize, total: usize },

    #[error("Word index {index} is outside of a {total}-word keyphrase")]
    WordOutOfRange { index: usize, total: usize },

    #[error("Quiz group {0} does not exist")]
    UnknownGroup(usize),

    #[error("Keyphrase is not reconstructible from the current shares")]
    NotReconstructible,

    #[error("Cannot {action} at step {step}")]
    InvalidStep { action: &'static str, step: String },

    #[error("Invalid balance: {0}")]
    InvalidBalance(String),

    #[error("Unknown signer event: {0}")]
    UnknownEvent(String),

    #[error("Invalid payload for {event}: {reason}")]
    InvalidEventPayload { event: String, reason: String },
}
